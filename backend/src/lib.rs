//! EcoWaste backend library.
//!
//! The crate is laid out as a small hexagon: [`domain`] owns the types,
//! services and ports; [`inbound`] adapts HTTP requests onto domain calls;
//! [`outbound`] provides the in-memory stores and the JWT token adapter.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::{NormalizeErrors, Trace};
