//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint under `inbound::http`, the
//! request/response schemas they reference and the bearer token security
//! scheme. Swagger UI serves it in debug builds and `openapi-dump` prints it
//! for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    ClassificationKey, ClassificationRecord, ClassificationResult, Pickup, PickupOverview,
    PickupStatus, PickupSummary, Principal, TimeSlot, WasteCategory, WasteType,
};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest, SessionResponse};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::health::{ProbeBody, ProbeStatus};
use crate::inbound::http::pickups::ScheduleRequest;
use crate::inbound::http::waste::{CategoryBody, ClassifyRequest};

/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/auth/register or POST /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "EcoWaste backend API",
        description = "Household waste classification and pickup scheduling."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::me,
        crate::inbound::http::waste::classify,
        crate::inbound::http::waste::history,
        crate::inbound::http::waste::categories,
        crate::inbound::http::pickups::schedule,
        crate::inbound::http::pickups::list,
        crate::inbound::http::pickups::cancel,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        RegisterRequest,
        LoginRequest,
        SessionResponse,
        Principal,
        ClassifyRequest,
        ClassificationRecord,
        ClassificationResult,
        ClassificationKey,
        WasteCategory,
        CategoryBody,
        ScheduleRequest,
        Pickup,
        PickupStatus,
        PickupSummary,
        PickupOverview,
        TimeSlot,
        WasteType,
        ProbeBody,
        ProbeStatus,
    )),
    tags(
        (name = "auth", description = "Registration, login and the current principal"),
        (name = "waste", description = "Item classification and history"),
        (name = "pickups", description = "Collection scheduling"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
