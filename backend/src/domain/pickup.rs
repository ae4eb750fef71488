//! Collection pickups: scheduling, overview and cancellation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ports::{PickupRepository, PickupStoreError};
use super::{Error, PrincipalId, ValidationErrors};

/// Address used when the caller does not give one.
pub const DEFAULT_PICKUP_ADDRESS: &str = "123 Green St, Eco City";

const MAX_WEIGHT_KG: u32 = 500;
const MAX_ADDRESS_LEN: usize = 200;

/// Pickup identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PickupId(Uuid);

impl PickupId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a path segment; anything that is not a UUID is reported as a
    /// missing resource.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| Error::malformed_id(raw))
    }
}

impl fmt::Display for PickupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

macro_rules! labelled_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident ($field:literal) {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let allowed: Vec<_> = Self::ALL.iter().map(|v| v.label()).collect();
                        format!("{} must be one of: {}", $field, allowed.join(" | "))
                    })
            }
        }
    };
}

labelled_enum! {
    /// Kind of waste a pickup collects.
    pub enum WasteType ("wasteType") {
        General => "General",
        Recyclables => "Recyclables",
        Organic => "Organic",
        Hazardous => "Hazardous",
        Electronic => "Electronic",
    }
}

labelled_enum! {
    /// Fixed collection windows.
    pub enum TimeSlot ("timeSlot") {
        NineAm => "9:00 AM",
        TenAm => "10:00 AM",
        ElevenAm => "11:00 AM",
        TwoPm => "2:00 PM",
        ThreePm => "3:00 PM",
        FourPm => "4:00 PM",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PickupStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// A scheduled collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pickup {
    #[schema(value_type = String, format = Uuid)]
    pub id: PickupId,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub waste_type: WasteType,
    #[schema(example = "123 Green St, Eco City")]
    pub address: String,
    pub status: PickupStatus,
    #[schema(example = 10)]
    pub estimated_weight_kg: u32,
}

/// Raw scheduling input as received from a client.
#[derive(Debug, Clone, Copy)]
pub struct PickupRequestParts<'a> {
    pub date: &'a str,
    pub time_slot: &'a str,
    pub waste_type: &'a str,
    pub estimated_weight_kg: u32,
    pub address: Option<&'a str>,
}

/// Validated scheduling input. Whether the date lies in the past is checked
/// by [`PickupService`] against its clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupRequest {
    date: NaiveDate,
    time_slot: TimeSlot,
    waste_type: WasteType,
    estimated_weight_kg: u32,
    address: String,
}

impl PickupRequest {
    pub fn try_from_parts(parts: PickupRequestParts<'_>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let date = errors.check(
            "date",
            NaiveDate::parse_from_str(parts.date.trim(), "%Y-%m-%d")
                .map_err(|_| "date must be formatted as YYYY-MM-DD"),
        );
        let time_slot = errors.check("timeSlot", parts.time_slot.parse::<TimeSlot>());
        let waste_type = errors.check("wasteType", parts.waste_type.parse::<WasteType>());
        if !(1..=MAX_WEIGHT_KG).contains(&parts.estimated_weight_kg) {
            errors.push(
                "estimatedWeightKg",
                format!("estimatedWeightKg must be between 1 and {MAX_WEIGHT_KG}"),
            );
        }
        let address = match parts.address.map(str::trim) {
            None | Some("") => DEFAULT_PICKUP_ADDRESS.to_owned(),
            Some(address) if address.chars().count() > MAX_ADDRESS_LEN => {
                errors.push(
                    "address",
                    format!("address must be at most {MAX_ADDRESS_LEN} characters"),
                );
                String::new()
            }
            Some(address) => address.to_owned(),
        };

        match (date, time_slot, waste_type) {
            (Some(date), Some(time_slot), Some(waste_type)) if errors.is_empty() => Ok(Self {
                date,
                time_slot,
                waste_type,
                estimated_weight_kg: parts.estimated_weight_kg,
                address,
            }),
            _ => Err(errors),
        }
    }
}

/// Counts shown above the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupSummary {
    pub scheduled: usize,
    pub completed: usize,
    /// Sum over pickups that are not cancelled.
    pub total_weight_kg: u64,
}

/// Every pickup plus the upcoming subset and the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupOverview {
    pub pickups: Vec<Pickup>,
    /// Scheduled pickups dated today or later, soonest first.
    pub upcoming: Vec<Pickup>,
    pub summary: PickupSummary,
}

impl PickupOverview {
    fn build(mut pickups: Vec<Pickup>, today: NaiveDate) -> Self {
        pickups.sort_by_key(|pickup| (pickup.date, slot_rank(pickup.time_slot)));
        let upcoming = pickups
            .iter()
            .filter(|pickup| pickup.status == PickupStatus::Scheduled && pickup.date >= today)
            .cloned()
            .collect();
        let summary = PickupSummary {
            scheduled: count_status(&pickups, PickupStatus::Scheduled),
            completed: count_status(&pickups, PickupStatus::Completed),
            total_weight_kg: pickups
                .iter()
                .filter(|pickup| pickup.status != PickupStatus::Cancelled)
                .map(|pickup| u64::from(pickup.estimated_weight_kg))
                .sum(),
        };
        Self {
            pickups,
            upcoming,
            summary,
        }
    }
}

fn slot_rank(slot: TimeSlot) -> usize {
    TimeSlot::ALL
        .iter()
        .position(|candidate| *candidate == slot)
        .unwrap_or(usize::MAX)
}

fn count_status(pickups: &[Pickup], status: PickupStatus) -> usize {
    pickups.iter().filter(|pickup| pickup.status == status).count()
}

fn map_store_error(error: PickupStoreError) -> Error {
    match error {
        PickupStoreError::Missing { .. } => Error::not_found("Pickup not found"),
        PickupStoreError::Connection { message } => {
            Error::internal("pickup store unavailable").with_diagnostic(message)
        }
        PickupStoreError::Query { message } => {
            Error::internal("pickup store error").with_diagnostic(message)
        }
    }
}

/// Pickup scheduling use-cases.
#[derive(Clone)]
pub struct PickupService {
    repo: Arc<dyn PickupRepository>,
    clock: Arc<dyn Clock>,
}

impl PickupService {
    pub fn new(repo: Arc<dyn PickupRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    pub async fn schedule(
        &self,
        owner: &PrincipalId,
        request: PickupRequest,
    ) -> Result<Pickup, Error> {
        if request.date < self.today() {
            let mut errors = ValidationErrors::default();
            errors.push("date", "Pickup date cannot be in the past");
            return Err(errors.into());
        }
        let pickup = Pickup {
            id: PickupId::random(),
            date: request.date,
            time_slot: request.time_slot,
            waste_type: request.waste_type,
            address: request.address,
            status: PickupStatus::Scheduled,
            estimated_weight_kg: request.estimated_weight_kg,
        };
        self.repo
            .insert(owner, &pickup)
            .await
            .map_err(map_store_error)?;
        info!(
            principal_id = %owner,
            pickup_id = %pickup.id,
            date = %pickup.date,
            slot = pickup.time_slot.label(),
            "pickup scheduled"
        );
        Ok(pickup)
    }

    pub async fn overview(&self, owner: &PrincipalId) -> Result<PickupOverview, Error> {
        let pickups = self.repo.list(owner).await.map_err(map_store_error)?;
        Ok(PickupOverview::build(pickups, self.today()))
    }

    /// Cancel a scheduled pickup. `raw_id` is the unparsed path segment.
    pub async fn cancel(&self, owner: &PrincipalId, raw_id: &str) -> Result<Pickup, Error> {
        let id = PickupId::parse(raw_id)?;
        let mut pickup = self
            .repo
            .find(owner, &id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("Pickup not found"))?;
        match pickup.status {
            PickupStatus::Scheduled => {}
            PickupStatus::Cancelled => {
                return Err(Error::invalid_request("Pickup is already cancelled"));
            }
            PickupStatus::Completed => {
                return Err(Error::invalid_request(
                    "Completed pickups cannot be cancelled",
                ));
            }
        }
        pickup.status = PickupStatus::Cancelled;
        self.repo
            .update(owner, &pickup)
            .await
            .map_err(map_store_error)?;
        info!(principal_id = %owner, pickup_id = %pickup.id, "pickup cancelled");
        Ok(pickup)
    }

    /// Give `owner` the demo schedule: collections today and in two days,
    /// and one completed two days ago.
    pub async fn seed_demo(&self, owner: &PrincipalId) -> Result<(), Error> {
        let today = self.today();
        let entries = [
            (Some(today), TimeSlot::TenAm, WasteType::Recyclables, PickupStatus::Scheduled, 15),
            (
                today.checked_add_days(Days::new(2)),
                TimeSlot::TwoPm,
                WasteType::Organic,
                PickupStatus::Scheduled,
                8,
            ),
            (
                today.checked_sub_days(Days::new(2)),
                TimeSlot::NineAm,
                WasteType::General,
                PickupStatus::Completed,
                12,
            ),
        ];
        for (date, time_slot, waste_type, status, estimated_weight_kg) in entries {
            let date = date.ok_or_else(|| Error::internal("demo pickup date out of range"))?;
            let pickup = Pickup {
                id: PickupId::random(),
                date,
                time_slot,
                waste_type,
                address: DEFAULT_PICKUP_ADDRESS.to_owned(),
                status,
                estimated_weight_kg,
            };
            self.repo
                .insert(owner, &pickup)
                .await
                .map_err(map_store_error)?;
        }
        Ok(())
    }
}
