use axum::{
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use tracing::debug;

use crate::models::caller::Role;
use crate::models::message::ErrorResponse;
use crate::services::jwt_service::{verify_token, AuthKeys};

/// Authenticates the patient-facing chat surface.
pub async fn patient_auth_middleware<B>(
    keys: Extension<AuthKeys>,
    req: Request<B>,
    next: Next<B>,
) -> Response {
    authenticate(Role::Patient, keys, req, next).await
}

/// Authenticates the provider-facing chat surface.
pub async fn provider_auth_middleware<B>(
    keys: Extension<AuthKeys>,
    req: Request<B>,
    next: Next<B>,
) -> Response {
    authenticate(Role::Provider, keys, req, next).await
}

/// Verifies the bearer token and requires its role claim to match the
/// surface. On success the verified caller is inserted into the request
/// extensions for the handlers.
async fn authenticate<B>(
    expected: Role,
    Extension(keys): Extension<AuthKeys>,
    mut req: Request<B>,
    next: Next<B>,
) -> Response {
    let Some(token) = bearer_token(&req) else {
        return reject("Not Authorized Login Again");
    };

    match verify_token(&keys, token) {
        Some(caller) if caller.role == expected => {
            debug!("authenticated {} {}", caller.role.as_str(), caller.id);
            req.extensions_mut().insert(caller);
            next.run(req).await
        }
        Some(caller) => {
            debug!(
                "{} token rejected on the {} surface",
                caller.role.as_str(),
                expected.as_str()
            );
            reject("Not Authorized Login Again")
        }
        None => reject("Not Authorized Login Again"),
    }
}

fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn reject(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))).into_response()
}
