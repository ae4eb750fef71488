//! End-to-end flows through the mounted application.

#[path = "support/http.rs"]
mod support;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use chrono::{Days, Utc};
use ecowaste::domain::TRACE_ID_HEADER;
use rstest::rstest;
use serde_json::{Value, json};
use support::Backend;

const PHONE: &str = "+91 99887 76655";

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

#[rstest]
#[actix_web::test]
async fn household_journey() {
    let backend = Backend::new();
    let app = actix_test::init_service(backend.app(false)).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Rohan Das",
            "email": "rohan.das@example.com",
            "phone": PHONE,
            "city": "Kolkata",
            "displayIcon": "🌱",
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"phone": PHONE, "otp": "1234"}))
        .to_request();
    let session: Value = actix_test::call_and_read_body_json(&app, req).await;
    let token = session["token"].as_str().expect("token").to_owned();
    assert_eq!(session["principal"]["displayIcon"], "🌱");

    for label in ["old_newspaper.png", "fruit scraps", "aa cell battery"] {
        let req = actix_test::TestRequest::post()
            .uri("/api/waste/classify")
            .insert_header(bearer(&token))
            .set_json(json!({"label": label}))
            .to_request();
        assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = actix_test::TestRequest::get()
        .uri("/api/waste/history")
        .insert_header(bearer(&token))
        .to_request();
    let history: Vec<Value> = actix_test::call_and_read_body_json(&app, req).await;
    let keys: Vec<&str> = history.iter().filter_map(|r| r["key"].as_str()).collect();
    assert_eq!(keys, ["battery", "organic", "paper"]);

    let date = Utc::now()
        .date_naive()
        .checked_add_days(Days::new(3))
        .expect("date in range")
        .to_string();
    let req = actix_test::TestRequest::post()
        .uri("/api/pickups")
        .insert_header(bearer(&token))
        .set_json(json!({
            "date": date,
            "timeSlot": "3:00 PM",
            "wasteType": "Electronic",
            "estimatedWeightKg": 2,
            "address": "7 Lake Road, Kolkata",
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let pickup: Value = actix_test::read_body_json(res).await;
    assert_eq!(pickup["address"], "7 Lake Road, Kolkata");
    assert_eq!(pickup["wasteType"], "Electronic");

    let req = actix_test::TestRequest::get()
        .uri("/api/pickups")
        .insert_header(bearer(&token))
        .to_request();
    let overview: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(overview["summary"]["scheduled"], 1);
    assert_eq!(overview["upcoming"][0]["timeSlot"], "3:00 PM");
}

#[rstest]
#[case(false)]
#[case(true)]
#[actix_web::test]
async fn stack_follows_the_environment(#[case] expose_stack: bool) {
    let backend = Backend::new();
    let app = actix_test::init_service(backend.app(expose_stack)).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/pickups")
        .insert_header((AUTHORIZATION, "Bearer garbage"))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["error"], "Not authorized, token failed");
    assert_eq!(body.get("stack").is_some(), expose_stack);
}

#[rstest]
#[case("/api/recycling-centres")]
#[case("/nowhere")]
#[actix_web::test]
async fn unknown_routes_use_the_envelope(#[case] uri: &str) {
    let backend = Backend::new();
    let app = actix_test::init_service(backend.app(false)).await;

    let req = actix_test::TestRequest::get().uri(uri).to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"success": false, "error": "Resource not found"}));
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let backend = Backend::new();
    let app = actix_test::init_service(backend.app(false)).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"phone\":")
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}
