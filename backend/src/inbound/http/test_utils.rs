//! Test helpers for inbound HTTP components.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use mockable::Clock;
use serde_json::{Value, json};
use zeroize::Zeroizing;

use crate::domain::FallbackPolicy;
use crate::domain::ports::FixtureOtpVerifier;
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::middleware::{NormalizeErrors, Trace};
use crate::outbound::jwt::JwtTokenService;
use crate::outbound::memory::{
    InMemoryClassificationHistory, InMemoryPickupRepository, InMemoryPrincipalRepository,
};

pub const TEST_SECRET: &[u8] = b"http-test-secret-with-enough-bytes!";

/// Clock whose reading tests can move.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_days(&self, days: i64) {
        *self.lock_clock() += TimeDelta::days(days);
    }

    pub fn today(&self) -> NaiveDate {
        self.utc().date_naive()
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// In-memory wiring shared by handler tests.
pub struct TestContext {
    pub state: HttpState,
    pub principals: Arc<InMemoryPrincipalRepository>,
    pub clock: Arc<MutableClock>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_fallback(FallbackPolicy::Unclassified)
    }

    pub fn with_fallback(fallback: FallbackPolicy) -> Self {
        let principals = Arc::new(InMemoryPrincipalRepository::new());
        // Tokens are checked against the system clock, so start from "now".
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let tokens = Arc::new(JwtTokenService::new(
            &Zeroizing::new(TEST_SECRET.to_vec()),
            TimeDelta::hours(1),
        ));
        let state = HttpState::new(
            HttpStatePorts {
                principals: principals.clone(),
                history: Arc::new(InMemoryClassificationHistory::new()),
                pickups: Arc::new(InMemoryPickupRepository::new()),
                token_issuer: tokens.clone(),
                token_verifier: tokens,
                otp: Arc::new(FixtureOtpVerifier),
                clock: clock.clone(),
            },
            fallback,
        );
        Self {
            state,
            principals,
            clock,
        }
    }

    /// Full application with the production middleware stack.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(NormalizeErrors::production())
            .wrap(Trace)
            .configure(configure(self.state.guard.clone()))
    }
}

/// Registration body for a household reachable on `phone`.
pub fn registration_body(phone: &str) -> Value {
    json!({
        "name": "Asha Patel",
        "email": format!("{}@example.com", phone.replace(['+', ' '], "")),
        "phone": phone,
        "city": "Pune",
    })
}

/// Register a household and return its bearer token.
pub async fn register<S, B>(app: &S, phone: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration_body(phone))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    body.get("token")
        .and_then(Value::as_str)
        .expect("token in registration response")
        .to_owned()
}

/// `Authorization` header for `token`.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}
