use actix_web::{web, HttpRequest, HttpResponse};

use wd_core::repositories::LockoutStorage;

use crate::dto::{AttemptResponse, RecordAttemptRequest};
use crate::handlers::error::handle_domain_error;

use super::AppState;

/// Handler for POST /api/v1/lockout/users/{user_id}/attempts
///
/// Counts one failed authentication with the given method.
///
/// # Request Body
///
/// ```json
/// {
///     "method": "password",
///     "ip": "10.0.0.1"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "locked_until": null
/// }
/// ```
///
/// ## Errors
/// - 429 Too Many Requests: User is locked out, `details.until` holds the unlock time
/// - 503 Service Unavailable: Lockout store failure
pub async fn record_attempt<S>(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<RecordAttemptRequest>,
    state: web::Data<AppState<S>>,
) -> HttpResponse
where
    S: LockoutStorage + 'static,
{
    let user_id = path.into_inner();
    let request = body.into_inner();
    let ip = request
        .ip
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_default();

    match state
        .lockout
        .make_attempt(&user_id, &ip, request.method)
        .await
    {
        Ok(result) => HttpResponse::Ok().json(AttemptResponse {
            locked_until: result.locked_until,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
