#[cfg(test)]
mod tests {
    use api::auth::{
        claims::{AuthUser, Claims, TokenType},
        generate_access_token, generate_refresh_token,
    };
    use axum::{extract::FromRequestParts, http::{Request, StatusCode}};
    use db::models::user::Role;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serial_test::serial;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn parts_with(authorization: Option<String>) -> axum::http::request::Parts {
        let mut builder = Request::builder();
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    #[serial]
    async fn test_valid_access_token() {
        let (token, _) = generate_access_token("251001-0001", "a@campus.test", Role::Faculty).unwrap();
        let mut parts = parts_with(Some(format!("Bearer {token}")));

        let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(claims.sub, "251001-0001");
        assert_eq!(claims.role, Role::Faculty);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[tokio::test]
    #[serial]
    async fn test_refresh_token_is_not_an_access_token() {
        let (token, _) = generate_refresh_token("251001-0001", "a@campus.test", Role::Student).unwrap();
        let mut parts = parts_with(Some(format!("Bearer {token}")));

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_header() {
        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err, (StatusCode::UNAUTHORIZED, "Missing or invalid Authorization header"));
    }

    #[tokio::test]
    #[serial]
    async fn test_wrong_secret() {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as usize;
        let claims = Claims {
            sub: "251001-0001".into(),
            email: "a@campus.test".into(),
            role: Role::Superadmin,
            token_type: TokenType::Access,
            exp: now + 3600,
            iat: now,
        };
        let forged = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"not-the-configured-secret"),
        )
        .unwrap();
        let mut parts = parts_with(Some(format!("Bearer {forged}")));

        let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err, (StatusCode::UNAUTHORIZED, "Invalid or expired token"));
    }

    #[tokio::test]
    #[serial]
    async fn test_expired_token() {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as usize;
        let claims = Claims {
            sub: "251001-0001".into(),
            email: "a@campus.test".into(),
            role: Role::Student,
            token_type: TokenType::Access,
            exp: now - 3600,
            iat: now - 7200,
        };
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(util::config::jwt_secret().as_bytes()),
        )
        .unwrap();
        let mut parts = parts_with(Some(format!("Bearer {expired}")));

        assert!(AuthUser::from_request_parts(&mut parts, &()).await.is_err());
    }
}
