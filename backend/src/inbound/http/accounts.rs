//! Account HTTP handlers.
//!
//! ```text
//! POST /api/auth/register {"name":"Priya Sharma","email":"priya@example.com","phone":"+91 98765 43210","city":"Mumbai"}
//! POST /api/auth/login {"phone":"+91 98765 43210","otp":"1234"}
//! GET /api/auth/me
//! ```

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AuthenticatedSession, Error, LoginCredentials, LoginValidationError, Principal, Registration,
    RegistrationParts,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedPrincipal;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[schema(example = "Priya Sharma")]
    pub name: String,
    #[schema(example = "priya.sharma@example.com")]
    pub email: String,
    #[schema(example = "+91 98765 43210")]
    pub phone: String,
    #[schema(example = "Mumbai")]
    pub city: String,
    /// Emoji shown next to the name; defaults to 👤.
    #[serde(default)]
    pub display_icon: Option<String>,
}

impl RegisterRequest {
    fn parts(&self) -> RegistrationParts<'_> {
        RegistrationParts {
            name: &self.name,
            email: &self.email,
            phone: &self.phone,
            city: &self.city,
            display_icon: self.display_icon.as_deref(),
        }
    }
}

/// Login body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    #[schema(example = "+91 98765 43210")]
    pub phone: String,
    #[schema(example = "1234")]
    pub otp: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.phone, &value.otp)
    }
}

/// A bearer token and the principal it identifies.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub principal: Principal,
}

impl From<AuthenticatedSession> for SessionResponse {
    fn from(session: AuthenticatedSession) -> Self {
        Self {
            token: session.token.token,
            expires_at: session.token.expires_at,
            principal: session.principal,
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::Phone(_) => "phone",
        LoginValidationError::MalformedCode => "otp",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Create a household account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = SessionResponse),
        (status = 400, description = "Invalid or duplicate field", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from_parts(payload.parts())?;
    let session = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(SessionResponse::from(session)))
}

/// Sign in with a phone number and one-time code.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Unknown phone or wrong code", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let session = state.accounts.login(&credentials).await?;
    Ok(web::Json(SessionResponse::from(session)))
}

/// The authenticated principal.
///
/// Mounted as a guarded resource rather than through a route macro, so the
/// guard wraps this route alone.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current principal", body = Principal),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "currentPrincipal"
)]
pub async fn me(principal: AuthenticatedPrincipal) -> web::Json<Principal> {
    web::Json(principal.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DUPLICATE_FIELD_VALUE;
    use crate::inbound::http::test_utils::{
        TestContext, bearer, register as register_household, registration_body,
    };
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    const PHONE: &str = "+91 90000 11111";

    #[rstest]
    #[actix_web::test]
    async fn registration_returns_a_usable_token() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let token = register_household(&app, PHONE).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["name"], "Asha Patel");
        assert_eq!(body["phone"], PHONE);
        assert_eq!(body["displayIcon"], "👤");
    }

    #[rstest]
    #[case("+91 90000 22222", "919000011111@example.com")]
    #[case("+919000011111", "someone.else@example.com")]
    #[actix_web::test]
    async fn duplicate_registrations_are_rejected(#[case] phone: &str, #[case] email: &str) {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        register_household(&app, PHONE).await;

        let mut body = registration_body(phone);
        body["email"] = json!(email);
        let req = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
        assert_eq!(envelope.error, DUPLICATE_FIELD_VALUE);
    }

    #[rstest]
    #[actix_web::test]
    async fn invalid_registrations_list_every_field() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"name": " ", "email": "nope", "phone": "+91 90000 33333", "city": ""}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
        assert_eq!(
            envelope.error,
            "Please add a name, Please add a valid email, Please add a city"
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_fields_are_rejected() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let mut body = registration_body(PHONE);
        body["password"] = json!("hunter2");
        let req = actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case("1234", StatusCode::OK)]
    #[case("4321", StatusCode::UNAUTHORIZED)]
    #[case("12a4", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn login_checks_the_code(#[case] otp: &str, #[case] status: StatusCode) {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        register_household(&app, PHONE).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"phone": "+919000011111", "otp": otp}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), status);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_for_unknown_phones_is_unauthorised() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"phone": PHONE, "otp": "1234"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
        assert_eq!(envelope.error, "Invalid phone number or code");
    }

    #[rstest]
    #[actix_web::test]
    async fn me_requires_a_token() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/auth/me").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
        assert_eq!(envelope.error, "Not authorized, no token");
    }

    #[rstest]
    #[actix_web::test]
    async fn other_methods_on_me_get_the_not_found_envelope() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let token = register_household(&app, PHONE).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
        assert!(!envelope.success);
        assert_eq!(envelope.error, "Resource not found");
    }
}
