#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, json_request, make_test_app, seed_user};
    use api::auth::generate_refresh_token;
    use axum::http::StatusCode;
    use db::models::user::{Model as UserModel, Role};
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    fn registration(email: &str) -> serde_json::Value {
        json!({
            "email": email,
            "password": "securepassword123",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "course": "bsit",
            "year_level": "2"
        })
    }

    /// Test Case: Register, verify with the emailed code, then log in
    #[tokio::test]
    #[serial]
    async fn test_register_verify_login_flow() {
        let (app, state) = make_test_app().await;

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/register", None, Some(registration("ada@campus.test"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["role"], "student");
        assert_eq!(json["data"]["course"], "BSIT");
        assert_eq!(json["data"]["is_verified"], false);
        let student_id = json["data"]["student_id"].as_str().unwrap().to_string();
        assert_eq!(student_id.len(), 11);

        // Unverified accounts cannot log in yet.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"identifier": &student_id, "password": "securepassword123"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let stored = UserModel::find_by_email(state.db(), "ada@campus.test").await.unwrap().unwrap();
        let code = stored.verification_code.clone().unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/verify",
                None,
                Some(json!({"email": "ada@campus.test", "code": code})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["is_verified"], true);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"identifier": "ada@campus.test", "password": "securepassword123"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Login successful");
        assert_eq!(json["data"]["user"]["student_id"], student_id.as_str());
        assert!(json["data"]["access_token"].as_str().is_some());
        assert!(json["data"]["refresh_token"].as_str().is_some());
    }

    /// Test Case: Registration with an invalid email
    #[tokio::test]
    #[serial]
    async fn test_register_invalid_email() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(json_request("POST", "/api/auth/register", None, Some(registration("not-an-email"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("email"));
    }

    /// Test Case: Registration with an email that is already taken
    #[tokio::test]
    #[serial]
    async fn test_register_duplicate_email() {
        let (app, state) = make_test_app().await;
        seed_user(&state, "251001-0001", Role::Student, Some("BSIT")).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                None,
                Some(registration("251001-0001@campus.test")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "email already registered");
    }

    /// Test Case: Verification with the wrong code
    #[tokio::test]
    #[serial]
    async fn test_verify_wrong_code() {
        let (app, _) = make_test_app().await;

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/register", None, Some(registration("bob@campus.test"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/verify",
                None,
                Some(json!({"email": "bob@campus.test", "code": "abcdef"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "invalid verification code");
    }

    /// Test Case: Login with a wrong password
    #[tokio::test]
    #[serial]
    async fn test_login_wrong_password() {
        let (app, state) = make_test_app().await;
        seed_user(&state, "251001-0002", Role::Student, Some("BSIT")).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({"identifier": "251001-0002", "password": "wrongpassword"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "invalid credentials");
    }

    /// Test Case: Refresh issues a new access token carrying the stored role
    #[tokio::test]
    #[serial]
    async fn test_refresh_uses_current_role() {
        let (app, state) = make_test_app().await;
        let user = seed_user(&state, "251001-0003", Role::Faculty, None).await;
        // Token claims an outdated role.
        let (refresh, _) = generate_refresh_token(&user.student_id, &user.email, Role::Student).unwrap();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/refresh",
                None,
                Some(json!({"refresh_token": refresh})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        let access = json["data"]["access_token"].as_str().unwrap();
        let claims = api::auth::decode_token(access).unwrap();
        assert_eq!(claims.role, Role::Faculty);
    }

    /// Test Case: Access tokens cannot be used to refresh
    #[tokio::test]
    #[serial]
    async fn test_refresh_rejects_access_token() {
        let (app, state) = make_test_app().await;
        let user = seed_user(&state, "251001-0004", Role::Student, Some("BSIT")).await;
        let access = crate::helpers::token_for(&user);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/auth/refresh",
                None,
                Some(json!({"refresh_token": access})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
