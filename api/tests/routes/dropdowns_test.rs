#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, json_request, make_test_app};
    use axum::http::StatusCode;
    use serial_test::serial;
    use tower::ServiceExt;

    /// Test Case: Registration options are served without a token
    #[tokio::test]
    #[serial]
    async fn registration_dropdowns_are_public() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(json_request("GET", "/api/registration-dropdowns", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["departments"].as_array().unwrap().len(), 10);
        assert_eq!(json["data"]["departments"][0], "College of Education");
        assert_eq!(json["data"]["sections"].as_array().unwrap().len(), 6);
    }

    /// Test Case: Event creation options resolve ahead of the `{event_id}` route and need no token
    #[tokio::test]
    #[serial]
    async fn event_creation_dropdowns_are_public() {
        let (app, _) = make_test_app().await;

        let response = app
            .oneshot(json_request("GET", "/api/events/creation-dropdowns", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["sections"][5], "Section 6");
        assert_eq!(json["message"], "Event options retrieved successfully");
    }
}
