//! Static bearer-token guard for the admin surfaces.
//!
//! There are no user accounts or sessions; a single `admin_token` from the
//! configuration gates the analytics endpoints and admin-side mutations.
//! When no token is configured the guard is open, which is the development
//! and test mode.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tracing::warn;

use crate::{config::AppConfig, errors::ServiceError};

/// Rejects admin requests that do not carry the configured bearer token.
///
/// Missing `Authorization` header yields 401, a wrong token 403.
pub async fn admin_guard(
    State(config): State<AppConfig>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let Some(expected) = config.admin_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    match supplied {
        None => Err(ServiceError::Unauthorized(
            "Missing bearer token".to_string(),
        )),
        Some(token) if token == expected => Ok(next.run(request).await),
        Some(_) => {
            warn!(path = %request.uri().path(), "admin token rejected");
            Err(ServiceError::Forbidden("Invalid admin token".to_string()))
        }
    }
}

/// Extension methods for Router to gate admin route groups.
pub trait AdminRouterExt {
    fn with_admin_guard(self, config: &AppConfig) -> Self;
}

impl<S> AdminRouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_admin_guard(self, config: &AppConfig) -> Self {
        self.layer(middleware::from_fn_with_state(config.clone(), admin_guard))
    }
}
