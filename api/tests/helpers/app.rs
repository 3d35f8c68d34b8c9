use api::{auth::generate_access_token, routes::routes};
use axum::{
    Router,
    body::Body as AxumBody,
    http::{Request, header::CONTENT_TYPE},
    response::Response,
};
use chrono::{DateTime, Utc};
use db::{
    models::{
        event::{self, EventStatus, join_courses},
        user::{self, NewUser, Role},
    },
    test_utils::setup_test_db,
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, IntoActiveModel, Set};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use util::{
    notify::LogNotifier, rate_limit::RateLimiter, state::AppState, tasks::TaskQueue,
};

/// Fresh database, fresh state, and the `/api` router mounted the way `main` mounts it.
pub async fn make_test_app() -> (Router, AppState) {
    make_test_app_with_limit(10_000).await
}

pub async fn make_test_app_with_limit(requests_per_window: u32) -> (Router, AppState) {
    let db = setup_test_db().await;
    let state = AppState::with_parts(
        db,
        TaskQueue::start(2, 64),
        Arc::new(RateLimiter::new(requests_per_window, Duration::from_secs(60))),
        Arc::new(LogNotifier),
    );

    let router = Router::new().nest("/api", routes(state.clone()));
    (router, state)
}

/// Inserts a verified user with password `password123`.
pub async fn seed_user(state: &AppState, student_id: &str, role: Role, course: Option<&str>) -> user::Model {
    let created = user::Model::create(
        state.db(),
        &NewUser {
            student_id: student_id.into(),
            email: format!("{}@campus.test", student_id.to_lowercase()),
            username: student_id.to_lowercase(),
            password: "password123".into(),
            role,
            first_name: "Test".into(),
            last_name: student_id.into(),
            middle_name: None,
            course: course.map(str::to_string),
            year_level: None,
            section: None,
            department: None,
            college: None,
            contact_number: None,
            address: None,
        },
    )
    .await
    .expect("Failed to create user");

    let mut active = created.into_active_model();
    active.is_verified = Set(true);
    active.verified_at = Set(Some(Utc::now()));
    active.qr_code_data = Set(Some(format!("student-qr:{student_id}")));
    active.update(state.db()).await.expect("Failed to verify user")
}

pub async fn create_event_row(
    state: &AppState,
    created_by: &user::Model,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    tags: &[&str],
) -> event::Model {
    let now = Utc::now();
    event::ActiveModel {
        id: NotSet,
        title: Set("Orientation".into()),
        description: Set(Some("Welcome session".into())),
        event_date: Set(start.date_naive()),
        start_time: Set(start),
        end_time: Set(end),
        location: Set(Some("Gym".into())),
        course: Set(None),
        section: Set(None),
        year_level: Set(None),
        department: Set(None),
        college: Set(None),
        tagged_courses: Set(join_courses(tags)),
        created_by: Set(created_by.student_id.clone()),
        created_by_role: Set(created_by.role),
        status: Set(EventStatus::Scheduled),
        is_active: Set(true),
        qr_code_data: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(state.db())
    .await
    .expect("Failed to create event")
}

pub fn token_for(user: &user::Model) -> String {
    generate_access_token(&user.student_id, &user.email, user.role)
        .expect("Failed to sign token")
        .0
}

pub fn bearer(user: &user::Model) -> String {
    format!("Bearer {}", token_for(user))
}

/// Builds a request with an optional `Authorization` value and JSON body.
pub fn json_request(method: &str, uri: &str, authorization: Option<&str>, body: Option<Value>) -> Request<AxumBody> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(authorization) = authorization {
        builder = builder.header("Authorization", authorization);
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(AxumBody::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(AxumBody::empty()).unwrap(),
    }
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
