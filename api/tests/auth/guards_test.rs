#[cfg(test)]
mod tests {
    use api::auth::guards::{allow_authenticated, allow_staff, allow_superadmin};
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn,
        routing::get,
    };
    use api::auth::{AuthUser, generate_access_token};
    use db::models::user::Role;
    use serial_test::serial;
    use tower::ServiceExt;

    async fn whoami(Extension(AuthUser(claims)): Extension<AuthUser>) -> String {
        claims.sub
    }

    fn guarded() -> Router {
        Router::new()
            .route("/any", get(whoami).route_layer(from_fn(allow_authenticated)))
            .route("/staff", get(whoami).route_layer(from_fn(allow_staff)))
            .route("/root", get(whoami).route_layer(from_fn(allow_superadmin)))
    }

    async fn status_for(path: &str, role: Option<Role>) -> StatusCode {
        let mut builder = Request::builder().uri(path);
        if let Some(role) = role {
            let (token, _) = generate_access_token("G-1", "g1@campus.test", role).unwrap();
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let response = guarded()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    /// Test Case: Anonymous requests are rejected by every guard
    #[tokio::test]
    #[serial]
    async fn test_anonymous_rejected() {
        for path in ["/any", "/staff", "/root"] {
            assert_eq!(status_for(path, None).await, StatusCode::UNAUTHORIZED, "{path}");
        }
    }

    /// Test Case: Role matrix across the three guards
    #[tokio::test]
    #[serial]
    async fn test_role_matrix() {
        let cases = [
            (Role::Student, [StatusCode::OK, StatusCode::FORBIDDEN, StatusCode::FORBIDDEN]),
            (Role::Faculty, [StatusCode::OK, StatusCode::OK, StatusCode::FORBIDDEN]),
            (Role::Admin, [StatusCode::OK, StatusCode::OK, StatusCode::FORBIDDEN]),
            (Role::Superadmin, [StatusCode::OK, StatusCode::OK, StatusCode::OK]),
        ];

        for (role, expected) in cases {
            for (path, want) in ["/any", "/staff", "/root"].into_iter().zip(expected) {
                assert_eq!(status_for(path, Some(role)).await, want, "{role} on {path}");
            }
        }
    }
}
