//! Authentication endpoints

use axum::Json;

use crate::models::UserClaims;

use super::AuthenticatedUser;

/// Claims of the bearer token in use
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token claims", body = UserClaims),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<UserClaims> {
    Json(claims)
}
