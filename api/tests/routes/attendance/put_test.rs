#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, create_event_row, get_json_body, json_request, make_test_app, seed_user};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use db::models::user::Role;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    /// Test Case: Faculty excuse a recorded attendance; students may not
    #[tokio::test]
    #[serial]
    async fn test_update_status() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0600", Role::Faculty, None).await;
        let student = seed_user(&state, "251001-0800", Role::Student, Some("BSIT")).await;
        let now = Utc::now();
        let event = create_event_row(&state, &faculty, now, now + Duration::hours(1), &[]).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/attendance/mark",
                Some(&bearer(&student)),
                Some(json!({"event_id": event.id, "action": "check_in"})),
            ))
            .await
            .unwrap();
        let attendance_id = get_json_body(response).await["data"]["attendance"]["id"].as_i64().unwrap();
        let uri = format!("/api/attendance/{attendance_id}/status");
        let body = json!({"status": "excused", "notes": "Medical certificate"});

        let response = app
            .clone()
            .oneshot(json_request("PUT", &uri, Some(&bearer(&student)), Some(body.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(json_request("PUT", &uri, Some(&bearer(&faculty)), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"], "excused");
        assert_eq!(json["data"]["notes"], "Medical certificate");
    }

    /// Test Case: Unknown attendance record
    #[tokio::test]
    #[serial]
    async fn test_update_status_not_found() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0601", Role::Faculty, None).await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/attendance/4242/status",
                Some(&bearer(&faculty)),
                Some(json!({"status": "absent"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
