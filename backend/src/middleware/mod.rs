//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit outside handlers. [`Trace`]
//! assigns the correlation identifier; [`NormalizeErrors`] gives every
//! failure the JSON error envelope. Bearer authentication lives with the
//! HTTP adapter in [`crate::inbound::http::auth`].

pub mod normalize;
pub mod trace;

pub use normalize::NormalizeErrors;
pub use trace::Trace;
