#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, create_event_row, get_json_body, json_request, make_test_app, seed_user};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use db::models::user::Role;
    use serial_test::serial;
    use tower::ServiceExt;

    /// Test Case: Listing filters by status and carries attendee counts
    #[tokio::test]
    #[serial]
    async fn test_list_events_with_status_filter() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0100", Role::Faculty, None).await;
        let student = seed_user(&state, "251001-0300", Role::Student, Some("BSIT")).await;
        let now = Utc::now();
        create_event_row(&state, &faculty, now + Duration::days(2), now + Duration::days(2) + Duration::hours(1), &[]).await;
        create_event_row(&state, &faculty, now + Duration::days(3), now + Duration::days(3) + Duration::hours(1), &[]).await;

        let response = app
            .clone()
            .oneshot(json_request("GET", "/api/events", Some(&bearer(&student)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        let list = json["data"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["attendee_count"], 0);
        // Latest date first.
        assert!(list[0]["event_date"].as_str().unwrap() > list[1]["event_date"].as_str().unwrap());

        let response = app
            .oneshot(json_request("GET", "/api/events?status=completed", Some(&bearer(&student)), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    /// Test Case: Descriptions are hidden until a day before the start
    #[tokio::test]
    #[serial]
    async fn test_get_event_hides_early_description() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0101", Role::Faculty, None).await;
        let now = Utc::now();
        let far = create_event_row(&state, &faculty, now + Duration::days(5), now + Duration::days(5) + Duration::hours(1), &[]).await;
        let near = create_event_row(&state, &faculty, now + Duration::hours(2), now + Duration::hours(3), &[]).await;

        let response = app
            .clone()
            .oneshot(json_request("GET", &format!("/api/events/{}", far.id), Some(&bearer(&faculty)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert!(json["data"]["description"].is_null());

        let response = app
            .oneshot(json_request("GET", &format!("/api/events/{}", near.id), Some(&bearer(&faculty)), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["description"], "Welcome session");
    }

    /// Test Case: Unknown event id
    #[tokio::test]
    #[serial]
    async fn test_get_event_not_found() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0102", Role::Faculty, None).await;

        let response = app
            .oneshot(json_request("GET", "/api/events/9999", Some(&bearer(&faculty)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "event not found");
        assert!(json["data"].is_null());
    }

    /// Test Case: Student view lists newest first and flags whether their course is tagged
    #[tokio::test]
    #[serial]
    async fn test_my_events_flags_allowed() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0103", Role::Faculty, None).await;
        let student = seed_user(&state, "251001-0301", Role::Student, Some("BSCS")).await;
        let now = Utc::now();
        let open = create_event_row(&state, &faculty, now + Duration::hours(1), now + Duration::hours(2), &[]).await;
        let tagged = create_event_row(&state, &faculty, now + Duration::hours(3), now + Duration::hours(4), &["BSIT"]).await;

        let response = app
            .oneshot(json_request("GET", "/api/events/my", Some(&bearer(&student)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        let list = json["data"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["id"], tagged.id);
        assert_eq!(list[0]["allowed"], false);
        assert_eq!(list[0]["tagged_course_list"][0], "BSIT");
        assert_eq!(list[1]["id"], open.id);
        assert_eq!(list[1]["allowed"], true);
    }

    /// Test Case: Event QR is generated once and then reused
    #[tokio::test]
    #[serial]
    async fn test_event_qrcode_is_stable() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0104", Role::Faculty, None).await;
        let now = Utc::now();
        let event = create_event_row(&state, &faculty, now + Duration::hours(1), now + Duration::hours(2), &[]).await;
        let uri = format!("/api/events/{}/qrcode", event.id);

        let first = get_json_body(
            app.clone()
                .oneshot(json_request("GET", &uri, Some(&bearer(&faculty)), None))
                .await
                .unwrap(),
        )
        .await;
        let second = get_json_body(
            app.oneshot(json_request("GET", &uri, Some(&bearer(&faculty)), None))
                .await
                .unwrap(),
        )
        .await;

        let payload = first["data"]["qr_code_data"].as_str().unwrap();
        assert!(payload.starts_with("data:image/svg+xml;base64,"));
        assert_eq!(second["data"]["qr_code_data"], payload);
        assert_eq!(first["data"]["event_id"], event.id);
    }

    /// Test Case: Attendance listing is staff-only
    #[tokio::test]
    #[serial]
    async fn test_event_attendance_staff_only() {
        let (app, state) = make_test_app().await;
        let faculty = seed_user(&state, "F-0105", Role::Faculty, None).await;
        let student = seed_user(&state, "251001-0302", Role::Student, Some("BSIT")).await;
        let now = Utc::now();
        let event = create_event_row(&state, &faculty, now + Duration::hours(1), now + Duration::hours(2), &[]).await;
        let uri = format!("/api/events/{}/attendance", event.id);

        let response = app
            .clone()
            .oneshot(json_request("GET", &uri, Some(&bearer(&student)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(json_request("GET", &uri, Some(&bearer(&faculty)), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }
}
