//! Behaviour tests for the bearer token guard.
//!
//! Each step drives a fresh in-process application over the same in-memory
//! stores, so registrations survive between steps.

#[path = "support/http.rs"]
mod support;

use std::cell::RefCell;
use std::future::Future;

use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use chrono::{TimeDelta, Utc};
use ecowaste::domain::ports::TokenIssuer;
use ecowaste::domain::{PrincipalId, TRACE_ID_HEADER};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use support::Backend;

const PHONE: &str = "+91 91234 56780";

struct GuardWorld {
    backend: Backend,
    principal_id: RefCell<Option<PrincipalId>>,
    token: RefCell<Option<String>>,
    status: RefCell<Option<u16>>,
    trace_id: RefCell<Option<String>>,
    body: RefCell<Option<Value>>,
}

impl GuardWorld {
    fn new() -> Self {
        Self {
            backend: Backend::new(),
            principal_id: RefCell::new(None),
            token: RefCell::new(None),
            status: RefCell::new(None),
            trace_id: RefCell::new(None),
            body: RefCell::new(None),
        }
    }

    fn principal_id(&self) -> PrincipalId {
        self.principal_id
            .borrow()
            .expect("household should be registered")
    }

    fn request_history(&self, authorization: Option<String>) {
        let app = self.backend.app(false);
        let (status, trace_id, body) = block_on(async move {
            let service = actix_test::init_service(app).await;
            let mut req = actix_test::TestRequest::get().uri("/api/waste/history");
            if let Some(value) = authorization {
                req = req.insert_header((AUTHORIZATION, value));
            }
            let res = actix_test::call_service(&service, req.to_request()).await;
            let status = res.status().as_u16();
            let trace_id = res
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body: Value = actix_test::read_body_json(res).await;
            (status, trace_id, body)
        });
        *self.status.borrow_mut() = Some(status);
        *self.trace_id.borrow_mut() = trace_id;
        *self.body.borrow_mut() = Some(body);
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    actix_rt::System::new().block_on(future)
}

#[fixture]
fn world() -> GuardWorld {
    GuardWorld::new()
}

#[given("a registered household")]
fn a_registered_household(world: &GuardWorld) {
    let app = world.backend.app(false);
    let session: Value = block_on(async move {
        let service = actix_test::init_service(app).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Meera Iyer",
                "email": "meera.iyer@example.com",
                "phone": PHONE,
                "city": "Chennai",
            }))
            .to_request();
        actix_test::call_and_read_body_json(&service, req).await
    });
    let token = session["token"].as_str().expect("token").to_owned();
    let id = session["principal"]["id"]
        .as_str()
        .and_then(|raw| PrincipalId::new(raw).ok())
        .expect("principal id");
    *world.token.borrow_mut() = Some(token);
    *world.principal_id.borrow_mut() = Some(id);
}

#[given("the household holds a token issued three hours ago")]
fn the_household_holds_a_stale_token(world: &GuardWorld) {
    let issued_at = Utc::now() - TimeDelta::hours(3);
    let issued = world
        .backend
        .tokens
        .issue(&world.principal_id(), issued_at)
        .expect("token should be issued");
    *world.token.borrow_mut() = Some(issued.token);
}

#[given("the household has been removed")]
fn the_household_has_been_removed(world: &GuardWorld) {
    world
        .backend
        .principals
        .remove(&world.principal_id())
        .expect("store should accept removal");
}

#[when("the household requests its history with its token")]
fn the_household_requests_its_history_with_its_token(world: &GuardWorld) {
    let token = world.token.borrow().clone().expect("token");
    world.request_history(Some(format!("Bearer {token}")));
}

#[when("the household requests its history without a token")]
fn the_household_requests_its_history_without_a_token(world: &GuardWorld) {
    world.request_history(None);
}

#[when("the household requests its history with the header \"{header}\"")]
fn the_household_requests_its_history_with_the_header(world: &GuardWorld, header: String) {
    world.request_history(Some(header));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &GuardWorld, status: u16) {
    assert_eq!(*world.status.borrow(), Some(status));
}

#[then("the response is unauthorised with message \"{message}\"")]
fn the_response_is_unauthorised_with_message(world: &GuardWorld, message: String) {
    assert_eq!(*world.status.borrow(), Some(401));
    let body = world.body.borrow();
    let body = body.as_ref().expect("error body");
    assert_eq!(body.get("success").and_then(Value::as_bool), Some(false));
    assert_eq!(
        body.get("error").and_then(Value::as_str),
        Some(message.as_str())
    );
    assert!(body.get("stack").is_none(), "production hides the stack");
}

#[then("the response carries a trace id")]
fn the_response_carries_a_trace_id(world: &GuardWorld) {
    let trace_id = world.trace_id.borrow();
    let trace_id = trace_id.as_deref().expect("trace id header");
    assert!(!trace_id.is_empty());
}

#[scenario(
    path = "tests/features/auth_guard.feature",
    name = "A registered household reaches a protected endpoint"
)]
fn registered_household_reaches_a_protected_endpoint(world: GuardWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth_guard.feature",
    name = "Requests without a token are refused"
)]
fn requests_without_a_token_are_refused(world: GuardWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth_guard.feature",
    name = "Non-bearer schemes are refused"
)]
fn non_bearer_schemes_are_refused(world: GuardWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth_guard.feature",
    name = "Forged tokens are refused"
)]
fn forged_tokens_are_refused(world: GuardWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth_guard.feature",
    name = "Expired tokens are refused"
)]
fn expired_tokens_are_refused(world: GuardWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/auth_guard.feature",
    name = "Tokens for removed households are refused"
)]
fn tokens_for_removed_households_are_refused(world: GuardWorld) {
    drop(world);
}
