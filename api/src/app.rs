//! Application factory
//!
//! Builds the Actix-web application around the lockout state.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, HttpResponse,
};

use wd_core::repositories::LockoutStorage;

use crate::routes::lockout::{
    attempt::record_attempt, clear::clear_lockout, status::lockout_status, AppState,
};

/// Create and configure the application
pub fn create_app<S>(
    app_state: web::Data<AppState<S>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: LockoutStorage + 'static,
{
    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/lockout/users/{user_id}")
                    .route("", web::get().to(lockout_status::<S>))
                    .route("", web::delete().to(clear_lockout::<S>))
                    .route("/attempts", web::post().to(record_attempt::<S>)),
            ),
        )
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "warden-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
