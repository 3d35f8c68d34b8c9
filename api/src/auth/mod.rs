pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims, TokenType};

use chrono::{Duration, Utc};
use db::models::user::Role;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error as JwtError,
};
use util::config;

fn issue(
    student_id: &str,
    email: &str,
    role: Role,
    token_type: TokenType,
    lifetime: Duration,
) -> Result<(String, String), JwtError> {
    let now = Utc::now();
    let expiry = now + lifetime;

    let claims = Claims {
        sub: student_id.to_string(),
        email: email.to_string(),
        role,
        token_type,
        exp: expiry.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}

/// Generates a short-lived access token and its RFC 3339 expiry.
pub fn generate_access_token(student_id: &str, email: &str, role: Role) -> Result<(String, String), JwtError> {
    issue(
        student_id,
        email,
        role,
        TokenType::Access,
        Duration::minutes(config::access_token_minutes()),
    )
}

/// Generates a refresh token and its RFC 3339 expiry.
pub fn generate_refresh_token(student_id: &str, email: &str, role: Role) -> Result<(String, String), JwtError> {
    issue(
        student_id,
        email,
        role,
        TokenType::Refresh,
        Duration::days(config::refresh_token_days()),
    )
}

/// Verifies signature and expiry (HS256).
pub fn decode_token(token: &str) -> Result<Claims, JwtError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}
