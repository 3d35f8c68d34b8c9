#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, json_request, make_test_app_with_limit};
    use axum::{extract::ConnectInfo, http::StatusCode};
    use serial_test::serial;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    fn from_peer(ip: [u8; 4]) -> axum::http::Request<axum::body::Body> {
        let mut req = json_request("GET", "/api/health", None, None);
        req.extensions_mut().insert(ConnectInfo(SocketAddr::from((ip, 40000))));
        req
    }

    /// Test Case: Requests over the per-IP limit get 429 while other peers are unaffected
    #[tokio::test]
    #[serial]
    async fn test_limit_is_per_peer() {
        let (app, _) = make_test_app_with_limit(2).await;

        for _ in 0..2 {
            let response = app.clone().oneshot(from_peer([10, 0, 0, 1])).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.clone().oneshot(from_peer([10, 0, 0, 1])).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Too many requests. Please try again later.");

        let response = app.oneshot(from_peer([10, 0, 0, 2])).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
