use actix_web::{web, HttpResponse};

use wd_core::repositories::LockoutStorage;

use crate::dto::IpQuery;
use crate::handlers::error::handle_domain_error;

use super::AppState;

/// Handler for DELETE /api/v1/lockout/users/{user_id}
///
/// Removes the bucket record, lifting any active lock.
///
/// ## Success (204 No Content)
///
/// ## Errors
/// - 503 Service Unavailable: Lockout store failure
pub async fn clear_lockout<S>(
    path: web::Path<String>,
    query: web::Query<IpQuery>,
    state: web::Data<AppState<S>>,
) -> HttpResponse
where
    S: LockoutStorage + 'static,
{
    let user_id = path.into_inner();
    let spec = state.lockout.spec_for_user(&user_id);

    match state
        .lockout
        .service()
        .clear_attempts(&spec, query.contributor())
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(&error),
    }
}
