use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::auth::{
    claims::{AuthUser, TokenType},
    decode_token,
};

/// Implements extraction of `AuthUser` from request headers.
///
/// Requires a Bearer access token in the `Authorization` header, signed with
/// the configured `JWT_SECRET`. Refresh tokens are not accepted here.
///
/// # Errors
/// - Returns `401 Unauthorized` if the header is missing, malformed, or the token is invalid or expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| (StatusCode::UNAUTHORIZED, "Missing or invalid Authorization header"))?;

        let claims = decode_token(bearer.token())
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        if claims.token_type != TokenType::Access {
            return Err((StatusCode::UNAUTHORIZED, "Invalid or expired token"));
        }

        Ok(AuthUser(claims))
    }
}
