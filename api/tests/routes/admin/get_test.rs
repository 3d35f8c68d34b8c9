#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, create_event_row, get_json_body, json_request, make_test_app, seed_user};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use db::models::user::Role;
    use serial_test::serial;
    use tower::ServiceExt;

    /// Test Case: Admin routes require the superadmin role
    #[tokio::test]
    #[serial]
    async fn test_admin_routes_require_superadmin() {
        let (app, state) = make_test_app().await;
        let admin = seed_user(&state, "A-0100", Role::Admin, None).await;

        let response = app
            .oneshot(json_request("GET", "/api/admin/users", Some(&bearer(&admin)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Access denied - superadmin role required");
    }

    /// Test Case: Listing users with a role filter
    #[tokio::test]
    #[serial]
    async fn test_list_users_by_role() {
        let (app, state) = make_test_app().await;
        let root = seed_user(&state, "SUPERADMIN", Role::Superadmin, None).await;
        seed_user(&state, "F-0700", Role::Faculty, None).await;
        seed_user(&state, "251001-0900", Role::Student, Some("BSIT")).await;
        seed_user(&state, "251001-0901", Role::Student, Some("BSCS")).await;

        let response = app
            .clone()
            .oneshot(json_request("GET", "/api/admin/users", Some(&bearer(&root)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 4);

        let response = app
            .oneshot(json_request("GET", "/api/admin/users?role=student", Some(&bearer(&root)), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        let users = json["data"].as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u["role"] == "student"));
    }

    /// Test Case: System statistics
    #[tokio::test]
    #[serial]
    async fn test_system_stats() {
        let (app, state) = make_test_app().await;
        let root = seed_user(&state, "SUPERADMIN", Role::Superadmin, None).await;
        let faculty = seed_user(&state, "F-0701", Role::Faculty, None).await;
        seed_user(&state, "251001-0902", Role::Student, Some("BSIT")).await;
        let now = Utc::now();
        create_event_row(&state, &faculty, now + Duration::hours(1), now + Duration::hours(2), &[]).await;

        let response = app
            .oneshot(json_request("GET", "/api/admin/stats", Some(&bearer(&root)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["total_users"], 3);
        assert_eq!(json["data"]["role_counts"]["student"], 1);
        assert_eq!(json["data"]["role_counts"]["superadmin"], 1);
        assert_eq!(json["data"]["total_events"], 1);
        assert_eq!(json["data"]["event_status_counts"]["scheduled"], 1);
        assert_eq!(json["data"]["total_attendance_records"], 0);
    }
}
