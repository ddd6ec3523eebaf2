//! Endpoint tests for the marker workflow over the in-memory store.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use backend::domain::ports::MarkerRepository;
use backend::domain::{AdminAllowList, ClientId, Location, Marker, MarkerDraft, MarkerStatus};

use support::{fixed_start, harness, test_app};

async fn create_marker_request(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    client_id: &str,
) -> Value {
    let request = test::TestRequest::post()
        .uri(&format!("/api/v1/markers?client_id={client_id}"))
        .set_json(json!({
            "type": "fountain",
            "title": "Drinking fountain",
            "description": "next to the gate",
            "location": {"lng": 30.52, "lat": 50.45}
        }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    test::read_body_json(response).await
}

async fn user_points(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    client_id: &str,
) -> i64 {
    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/users/me?client_id={client_id}"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(app, request).await).await;
    body["user"]["points"].as_i64().expect("points")
}

/// Seed a marker directly in the active state; moderation is out of scope
/// for the service, so listing tests flip the status at the store.
async fn seed_active_marker(store: &backend::outbound::memory::MemoryStore, kind: &str) -> Marker {
    let mut marker = Marker::new(
        MarkerDraft {
            kind: kind.to_owned(),
            title: format!("{kind} spot"),
            description: None,
            location: Location { lng: 30.0, lat: 50.0 },
        },
        ClientId::new("seeder"),
        fixed_start(),
    );
    marker.status = MarkerStatus::Active;
    MarkerRepository::insert(store, &marker).await.expect("seed marker");
    marker
}

#[actix_web::test]
async fn created_markers_are_pending_and_invisible_until_moderated() {
    let harness = harness(AdminAllowList::default(), None);
    let app = test::init_service(test_app(harness.state.clone())).await;

    let created = create_marker_request(&app, "caller-1").await;
    assert_eq!(created["status"], "pending");
    assert_eq!(created["type"], "fountain");
    assert_eq!(created["confirmations"], 0);
    assert_eq!(created["createdBy"], "caller-1");

    // Submission awards 5 points on top of the 50-point signup bonus.
    assert_eq!(user_points(&app, "caller-1").await, 55);

    let request = test::TestRequest::get()
        .uri("/api/v1/markers?client_id=caller-1")
        .to_request();
    let listed: Value = test::read_body_json(test::call_service(&app, request).await).await;
    assert_eq!(listed.as_array().expect("array").len(), 0);
}

#[actix_web::test]
async fn listing_returns_active_markers_with_type_filter() {
    let harness = harness(AdminAllowList::default(), None);
    seed_active_marker(&harness.store, "fuel").await;
    seed_active_marker(&harness.store, "water").await;
    let app = test::init_service(test_app(harness.state.clone())).await;

    let request = test::TestRequest::get()
        .uri("/api/v1/markers?client_id=caller-1")
        .to_request();
    let listed: Value = test::read_body_json(test::call_service(&app, request).await).await;
    assert_eq!(listed.as_array().expect("array").len(), 2);

    let request = test::TestRequest::get()
        .uri("/api/v1/markers?client_id=caller-1&types=fuel,gas")
        .to_request();
    let filtered: Value = test::read_body_json(test::call_service(&app, request).await).await;
    let filtered = filtered.as_array().expect("array");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["type"], "fuel");
}

#[actix_web::test]
async fn confirmation_is_idempotent_per_caller() {
    let harness = harness(AdminAllowList::default(), None);
    let marker = seed_active_marker(&harness.store, "fuel").await;
    let app = test::init_service(test_app(harness.state.clone())).await;

    let points_before = user_points(&app, "caller-1").await;

    let uri = format!("/api/v1/markers/{}/confirm?client_id=caller-1", marker.id);
    let first: Value = test::read_body_json(
        test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await,
    )
    .await;
    assert_eq!(first["marker"]["confirmations"], 1);
    assert_eq!(first["marker"]["confirmationsBy"], json!(["caller-1"]));

    let second: Value = test::read_body_json(
        test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await,
    )
    .await;
    assert_eq!(second["marker"]["confirmations"], 1);

    // Exactly one 2-point award across both calls.
    assert_eq!(user_points(&app, "caller-1").await, points_before + 2);
    let confirm_activities = harness
        .store
        .recorded_activities()
        .into_iter()
        .filter(|a| a.kind == backend::domain::ActivityKind::Confirm)
        .count();
    assert_eq!(confirm_activities, 1);
}

#[actix_web::test]
async fn rating_upserts_and_detail_reports_the_mean() {
    let harness = harness(AdminAllowList::default(), None);
    let marker = seed_active_marker(&harness.store, "fuel").await;
    let app = test::init_service(test_app(harness.state.clone())).await;

    let rate_uri = format!("/api/v1/markers/{}/rate?client_id=caller-1", marker.id);
    let first: Value = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&rate_uri)
                .set_json(json!({"value": 1}))
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(first["rating"]["value"], 1);
    let points_after_first = user_points(&app, "caller-1").await;

    // Re-rating overwrites in place without another award.
    let second: Value = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&rate_uri)
                .set_json(json!({"value": 3}))
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(second["rating"]["id"], first["rating"]["id"]);
    assert_eq!(second["rating"]["value"], 3);
    assert_eq!(user_points(&app, "caller-1").await, points_after_first);

    let other_uri = format!("/api/v1/markers/{}/rate?client_id=caller-2", marker.id);
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&other_uri)
            .set_json(json!({"value": 5}))
            .to_request(),
    )
    .await;

    let detail_uri = format!("/api/v1/markers/{}?client_id=caller-1", marker.id);
    let detail: Value = test::read_body_json(
        test::call_service(&app, test::TestRequest::get().uri(&detail_uri).to_request()).await,
    )
    .await;
    assert_eq!(detail["ratingAvg"], 4.0);
    assert_eq!(detail["myRating"]["value"], 3);
}

#[actix_web::test]
async fn detail_of_unrated_marker_has_no_average() {
    let harness = harness(AdminAllowList::default(), None);
    let marker = seed_active_marker(&harness.store, "fuel").await;
    let app = test::init_service(test_app(harness.state.clone())).await;

    let uri = format!("/api/v1/markers/{}?client_id=caller-1", marker.id);
    let detail: Value = test::read_body_json(
        test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await,
    )
    .await;

    assert_eq!(detail["ratingAvg"], Value::Null);
    assert_eq!(detail["myRating"], Value::Null);
    assert_eq!(detail["comments"], json!([]));
}

#[actix_web::test]
async fn commenting_stores_the_comment_and_awards_a_point() {
    let harness = harness(AdminAllowList::default(), None);
    let marker = seed_active_marker(&harness.store, "fuel").await;
    let app = test::init_service(test_app(harness.state.clone())).await;

    let points_before = user_points(&app, "caller-1").await;
    let uri = format!("/api/v1/markers/{}/comment?client_id=caller-1", marker.id);
    let body: Value = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&uri)
                .set_json(json!({"text": "still there"}))
                .to_request(),
        )
        .await,
    )
    .await;

    assert_eq!(body["comment"]["text"], "still there");
    assert_eq!(user_points(&app, "caller-1").await, points_before + 1);

    let detail_uri = format!("/api/v1/markers/{}?client_id=caller-1", marker.id);
    let detail: Value = test::read_body_json(
        test::call_service(&app, test::TestRequest::get().uri(&detail_uri).to_request()).await,
    )
    .await;
    assert_eq!(detail["comments"].as_array().expect("comments").len(), 1);
}

#[actix_web::test]
async fn unknown_marker_operations_fail_without_side_effects() {
    let harness = harness(AdminAllowList::default(), None);
    let app = test::init_service(test_app(harness.state.clone())).await;

    // Resolve the user first so point changes would be observable.
    let points_before = user_points(&app, "caller-1").await;
    let activities_before = harness.store.recorded_activities().len();

    let missing = uuid::Uuid::new_v4();
    for (method, uri, body) in [
        ("get", format!("/api/v1/markers/{missing}?client_id=caller-1"), None),
        (
            "post",
            format!("/api/v1/markers/{missing}/confirm?client_id=caller-1"),
            None,
        ),
        (
            "post",
            format!("/api/v1/markers/{missing}/comment?client_id=caller-1"),
            Some(json!({"text": "hello"})),
        ),
        (
            "post",
            format!("/api/v1/markers/{missing}/rate?client_id=caller-1"),
            Some(json!({"value": 5})),
        ),
        (
            "post",
            "/api/v1/markers/not-a-uuid/confirm?client_id=caller-1".to_owned(),
            None,
        ),
    ] {
        let mut request = if method == "get" {
            test::TestRequest::get()
        } else {
            test::TestRequest::post()
        }
        .uri(&uri);
        if let Some(body) = body {
            request = request.set_json(body);
        }
        let response = test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri}");
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["code"], "not_found");
    }

    assert_eq!(user_points(&app, "caller-1").await, points_before);
    assert_eq!(harness.store.recorded_activities().len(), activities_before);
}
