use actix_web::{web, HttpResponse};

use wd_core::repositories::LockoutStorage;

use crate::dto::{IpQuery, LockoutStatusResponse};
use crate::handlers::error::handle_domain_error;

use super::AppState;

/// Handler for GET /api/v1/lockout/users/{user_id}
///
/// Reports the stored attempt count and lock of a user's authentication
/// bucket without counting an attempt.
///
/// # Query
/// * `ip` - Source IP; only relevant with `per_user_per_ip` lockout
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "user_id": "u1",
///     "bucket": "AccountAuthentication:u1",
///     "enabled": true,
///     "attempts": 3,
///     "locked_until": "2009-11-10T23:00:13Z",
///     "is_locked": true
/// }
/// ```
///
/// ## Errors
/// - 503 Service Unavailable: Lockout store failure
pub async fn lockout_status<S>(
    path: web::Path<String>,
    query: web::Query<IpQuery>,
    state: web::Data<AppState<S>>,
) -> HttpResponse
where
    S: LockoutStorage + 'static,
{
    let user_id = path.into_inner();
    let ip = query.contributor();
    let spec = state.lockout.spec_for_user(&user_id);
    let service = state.lockout.service();

    let record = match service.get_record(&spec, ip).await {
        Ok(record) => record,
        Err(error) => return handle_domain_error(&error),
    };

    // Locked state is decided by the store clock, not ours
    let is_locked = match service.check(&spec, ip).await {
        Ok(()) => false,
        Err(error) if error.is_lockout() => true,
        Err(error) => return handle_domain_error(&error),
    };

    HttpResponse::Ok().json(LockoutStatusResponse {
        user_id,
        bucket: spec.key(),
        enabled: spec.enabled(),
        attempts: record.map(|r| r.attempts).unwrap_or(0),
        locked_until: record.and_then(|r| r.locked_until()),
        is_locked,
    })
}
