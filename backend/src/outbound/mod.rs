//! Outbound adapters implementing domain ports.
//!
//! - **jwt**: HS256 bearer tokens behind `TokenIssuer` / `TokenVerifier`.
//! - **memory**: in-process stores for principals, classification history
//!   and pickups.
//!
//! Adapters are thin translators between domain types and their storage or
//! wire representation. They contain no business logic.

pub mod jwt;
pub mod memory;
