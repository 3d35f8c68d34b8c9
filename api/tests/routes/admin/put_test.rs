#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, get_json_body, json_request, make_test_app, seed_user};
    use axum::http::StatusCode;
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    /// Test Case: Promote a student to faculty
    #[tokio::test]
    #[serial]
    async fn test_promote_to_faculty() {
        let (app, state) = make_test_app().await;
        let root = seed_user(&state, "SUPERADMIN", Role::Superadmin, None).await;
        seed_user(&state, "251001-1000", Role::Student, Some("BSIT")).await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/admin/users/251001-1000/role",
                Some(&bearer(&root)),
                Some(json!({"role": "faculty"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["role"], "faculty");
    }

    /// Test Case: Nobody can be promoted to superadmin
    #[tokio::test]
    #[serial]
    async fn test_cannot_grant_superadmin() {
        let (app, state) = make_test_app().await;
        let root = seed_user(&state, "SUPERADMIN", Role::Superadmin, None).await;
        seed_user(&state, "251001-1001", Role::Student, Some("BSIT")).await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/admin/users/251001-1001/role",
                Some(&bearer(&root)),
                Some(json!({"role": "superadmin"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Test Case: Unknown user
    #[tokio::test]
    #[serial]
    async fn test_promote_unknown_user() {
        let (app, state) = make_test_app().await;
        let root = seed_user(&state, "SUPERADMIN", Role::Superadmin, None).await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/admin/users/nobody/role",
                Some(&bearer(&root)),
                Some(json!({"role": "admin"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
