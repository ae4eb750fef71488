//! In-memory store adapters.
//!
//! Each store guards a map with a `std::sync::RwLock`; locks are never held
//! across an `.await`. A poisoned lock is reported as a connection failure
//! instead of panicking the worker.

mod history;
mod pickups;
mod principals;

pub use history::InMemoryClassificationHistory;
pub use pickups::InMemoryPickupRepository;
pub use principals::InMemoryPrincipalRepository;

const POISONED: &str = "store lock poisoned";
