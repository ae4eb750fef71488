//! Pickup scheduling HTTP handlers.
//!
//! ```text
//! POST /api/pickups {"date":"2026-03-14","timeSlot":"11:00 AM","wasteType":"Hazardous","estimatedWeightKg":4}
//! GET /api/pickups
//! POST /api/pickups/{id}/cancel
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Pickup, PickupOverview, PickupRequest, PickupRequestParts};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedPrincipal;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/pickups`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScheduleRequest {
    /// Collection date, `YYYY-MM-DD`.
    #[schema(example = "2026-03-14")]
    pub date: String,
    #[schema(example = "11:00 AM")]
    pub time_slot: String,
    #[schema(example = "Hazardous")]
    pub waste_type: String,
    #[schema(example = 4)]
    pub estimated_weight_kg: u32,
    /// Defaults to the household's registered collection point.
    #[serde(default)]
    pub address: Option<String>,
}

impl ScheduleRequest {
    fn parts(&self) -> PickupRequestParts<'_> {
        PickupRequestParts {
            date: &self.date,
            time_slot: &self.time_slot,
            waste_type: &self.waste_type,
            estimated_weight_kg: self.estimated_weight_kg,
            address: self.address.as_deref(),
        }
    }
}

/// Schedule a pickup.
#[utoipa::path(
    post,
    path = "/api/pickups",
    request_body = ScheduleRequest,
    responses(
        (status = 201, description = "Scheduled", body = Pickup),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["pickups"],
    operation_id = "schedulePickup"
)]
#[post("")]
pub async fn schedule(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
    payload: web::Json<ScheduleRequest>,
) -> ApiResult<HttpResponse> {
    let request = PickupRequest::try_from_parts(payload.parts())?;
    let pickup = state.pickups.schedule(principal.id(), request).await?;
    Ok(HttpResponse::Created().json(pickup))
}

/// All pickups, the upcoming subset and summary counts.
#[utoipa::path(
    get,
    path = "/api/pickups",
    responses(
        (status = 200, description = "Pickup overview", body = PickupOverview),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["pickups"],
    operation_id = "listPickups"
)]
#[get("")]
pub async fn list(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
) -> ApiResult<web::Json<PickupOverview>> {
    Ok(web::Json(state.pickups.overview(principal.id()).await?))
}

/// Cancel a scheduled pickup.
///
/// The identifier is taken as raw text so malformed ids surface as
/// `404 Resource not found` from the domain.
#[utoipa::path(
    post,
    path = "/api/pickups/{id}/cancel",
    params(("id" = String, Path, description = "Pickup identifier")),
    responses(
        (status = 200, description = "Cancelled pickup", body = Pickup),
        (status = 400, description = "Pickup cannot be cancelled", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 404, description = "Unknown or malformed id", body = ErrorEnvelope)
    ),
    tags = ["pickups"],
    operation_id = "cancelPickup"
)]
#[post("/{id}/cancel")]
pub async fn cancel(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
    path: web::Path<String>,
) -> ApiResult<web::Json<Pickup>> {
    let pickup = state.pickups.cancel(principal.id(), &path).await?;
    Ok(web::Json(pickup))
}
