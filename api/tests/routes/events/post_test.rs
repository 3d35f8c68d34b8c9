#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, get_json_body, json_request, make_test_app, seed_user};
    use axum::http::StatusCode;
    use chrono::{Duration, SecondsFormat, Utc};
    use db::models::user::{Model as UserModel, Role};
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    fn event_body(start_in: Duration, tags: &[&str]) -> serde_json::Value {
        let start = Utc::now() + start_in;
        let end = start + Duration::hours(2);
        json!({
            "title": "Orientation",
            "description": "Welcome session",
            "event_date": start.format("%Y-%m-%d").to_string(),
            "start_time": start.to_rfc3339_opts(SecondsFormat::Secs, true),
            "end_time": end.to_rfc3339_opts(SecondsFormat::Secs, true),
            "location": "Main Hall",
            "tagged_courses": tags,
        })
    }

    /// Test Case: Faculty create an event and tagged students' QR codes rotate to it
    #[tokio::test]
    #[serial]
    async fn test_create_event_rotates_tagged_students() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0001", Role::Faculty, None).await;
        let tagged = seed_user(&state, "251001-0200", Role::Student, Some("BSIT")).await;
        let other = seed_user(&state, "251001-0201", Role::Student, Some("BSCS")).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/events",
                Some(&bearer(&faculty)),
                Some(event_body(Duration::hours(1), &["bsit"])),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"], "scheduled");
        assert_eq!(json["data"]["is_active"], true);
        assert_eq!(json["data"]["created_by"], "F-0001");
        let event_id = json["data"]["id"].as_i64().unwrap();

        state.tasks().wait_idle().await;

        let tagged = UserModel::find_by_student_id(state.db(), &tagged.student_id).await.unwrap().unwrap();
        assert_eq!(tagged.active_event_id, Some(event_id));
        assert_eq!(tagged.qr_type, format!("event:{event_id}"));

        let other = UserModel::find_by_student_id(state.db(), &other.student_id).await.unwrap().unwrap();
        assert_eq!(other.active_event_id, None);
    }

    /// Test Case: Students cannot create events
    #[tokio::test]
    #[serial]
    async fn test_create_event_forbidden_for_students() {
        let (app, state) = make_test_app().await;
        let student = seed_user(&state, "251001-0202", Role::Student, Some("BSIT")).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/events",
                Some(&bearer(&student)),
                Some(event_body(Duration::hours(1), &[])),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    /// Test Case: End before start is rejected
    #[tokio::test]
    #[serial]
    async fn test_create_event_end_before_start() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0002", Role::Faculty, None).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/events",
                Some(&bearer(&faculty)),
                Some(json!({
                    "title": "Backwards",
                    "event_date": "2030-01-10",
                    "start_time": "11:00",
                    "end_time": "09:00"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
    }

    /// Test Case: Malformed event date
    #[tokio::test]
    #[serial]
    async fn test_create_event_bad_date() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0003", Role::Faculty, None).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/events",
                Some(&bearer(&faculty)),
                Some(json!({
                    "title": "Typo",
                    "event_date": "10/01/2030",
                    "start_time": "09:00",
                    "end_time": "11:00"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "invalid event_date format. Use YYYY-MM-DD");
    }
}
