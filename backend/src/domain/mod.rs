//! Domain primitives, services and ports.
//!
//! Purpose: hold everything the EcoWaste backend knows about principals,
//! authentication, waste classification and pickups, independent of HTTP
//! and of the token format.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures.
//! - Principal and its field types, Registration.
//! - AuthGuard, extract_bearer, AuthError: bearer authentication.
//! - AccountService: registration and phone login.
//! - ClassificationLookup / ClassificationService: label classification and
//!   history.
//! - PickupService: pickup scheduling.

pub mod accounts;
pub mod auth;
pub mod classification;
pub mod error;
pub mod pickup;
pub mod ports;
pub mod principal;
pub mod trace_id;
pub mod validation;

pub use self::accounts::{AccountService, AuthenticatedSession, DEMO_PRINCIPAL};
pub use self::auth::{
    AuthError, AuthGuard, BEARER_PREFIX, LoginCredentials, LoginValidationError, OneTimeCode,
    extract_bearer,
};
pub use self::classification::{
    ClassificationKey, ClassificationLookup, ClassificationRecord, ClassificationResult,
    ClassificationService, FallbackPolicy, HISTORY_LIMIT, UnknownFallbackPolicy, WasteCategory,
    match_label,
};
pub use self::error::{
    DUPLICATE_FIELD_VALUE, Error, ErrorCode, ErrorValidationError, RESOURCE_NOT_FOUND,
    TRACE_ID_HEADER,
};
pub use self::pickup::{
    DEFAULT_PICKUP_ADDRESS, Pickup, PickupId, PickupOverview, PickupRequest, PickupRequestParts,
    PickupService, PickupStatus, PickupSummary, TimeSlot, WasteType,
};
pub use self::principal::{
    City, DEFAULT_DISPLAY_ICON, EmailAddress, PersonName, PhoneNumber, Principal, PrincipalId,
    PrincipalValidationError, Registration, RegistrationParts,
};
pub use self::trace_id::TraceId;
pub use self::validation::{FieldError, ValidationErrors};
