#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, get_json_body, json_request, make_test_app, seed_user};
    use axum::http::StatusCode;
    use chrono::{Duration, SecondsFormat, Utc};
    use db::models::user::{Model as UserModel, Role};
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    /// Test Case: Deleting cancels the event and restores personal QR codes
    #[tokio::test]
    #[serial]
    async fn test_delete_event_reverts_qr() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0300", Role::Faculty, None).await;
        let student = seed_user(&state, "251001-0500", Role::Student, Some("BSIT")).await;
        let start = Utc::now() + Duration::hours(1);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/events",
                Some(&bearer(&faculty)),
                Some(json!({
                    "title": "Assembly",
                    "event_date": start.format("%Y-%m-%d").to_string(),
                    "start_time": start.to_rfc3339_opts(SecondsFormat::Secs, true),
                    "end_time": (start + Duration::hours(1)).to_rfc3339_opts(SecondsFormat::Secs, true),
                    "tagged_courses": ["BSIT"]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let event_id = get_json_body(response).await["data"]["id"].as_i64().unwrap();
        state.tasks().wait_idle().await;

        let rotated = UserModel::find_by_student_id(state.db(), &student.student_id).await.unwrap().unwrap();
        assert_eq!(rotated.active_event_id, Some(event_id));

        let response = app
            .clone()
            .oneshot(json_request("DELETE", &format!("/api/events/{event_id}"), Some(&bearer(&faculty)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Event deleted successfully");
        state.tasks().wait_idle().await;

        let restored = UserModel::find_by_student_id(state.db(), &student.student_id).await.unwrap().unwrap();
        assert_eq!(restored.active_event_id, None);
        assert_eq!(restored.qr_type, "student_id");
        assert_eq!(restored.qr_code_data, student.qr_code_data);

        let response = app
            .oneshot(json_request("GET", &format!("/api/events/{event_id}"), Some(&bearer(&faculty)), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"], "cancelled");
        assert_eq!(json["data"]["is_active"], false);
    }

    /// Test Case: Faculty who did not create the event cannot delete it
    #[tokio::test]
    #[serial]
    async fn test_delete_event_requires_creator_or_admin() {
        let (app, state) = make_test_app().await;
        let owner = seed_user(&state, "F-0301", Role::Faculty, None).await;
        let other = seed_user(&state, "F-0302", Role::Faculty, None).await;
        let admin = seed_user(&state, "A-0001", Role::Admin, None).await;
        let now = Utc::now();
        let event = crate::helpers::create_event_row(&state, &owner, now + Duration::hours(1), now + Duration::hours(2), &[]).await;
        let uri = format!("/api/events/{}", event.id);

        let response = app
            .clone()
            .oneshot(json_request("DELETE", &uri, Some(&bearer(&other)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(json_request("DELETE", &uri, Some(&bearer(&admin)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
