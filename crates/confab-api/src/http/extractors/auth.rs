//! Bearer-token authentication extractor.
//!
//! Extracts the token from `Authorization: Bearer <token>`, verifies its
//! signature and expiry, and loads the referenced user. Every failure mode
//! (missing header, malformed header, bad signature, expired token, deleted
//! user) produces the same 401 so a probing client learns nothing.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use confab_types::error::AuthError;
use confab_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated user. Extracting this runs token verification.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;

        let user = state.auth_service.authenticate(&token).await?;

        Ok(CurrentUser(user))
    }
}

/// Pull the token out of the `Authorization: Bearer <token>` header.
fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let header = parts
        .headers
        .get("authorization")
        .ok_or(AppError::Auth(AuthError::Unauthorized))?;

    let value = header
        .to_str()
        .map_err(|_| AppError::Auth(AuthError::Unauthorized))?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Auth(AuthError::Unauthorized))?;

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/chats");
        if let Some(value) = value {
            builder = builder.header("authorization", value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_extract_bearer_happy_path() {
        let parts = parts_with_auth(Some("Bearer abc.def"));
        assert_eq!(extract_bearer(&parts).unwrap(), "abc.def");
    }

    #[test]
    fn test_extract_bearer_rejects_missing_and_malformed() {
        for value in [None, Some("abc.def"), Some("Basic abc"), Some("Bearer ")] {
            let parts = parts_with_auth(value);
            assert!(matches!(
                extract_bearer(&parts).unwrap_err(),
                AppError::Auth(AuthError::Unauthorized)
            ));
        }
    }
}
