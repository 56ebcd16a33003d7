//! Consent-flow coordinators
//!
//! The client-side orchestration that takes a user from an authenticated
//! session to linked accounts with an approved, denied, or revoked consent:
//!
//! - [`DiscoveryCoordinator`]: FIP directory, identifier collection, account
//!   discovery
//! - [`LinkingCoordinator`]: link submission, OTP confirmation round-trip,
//!   linked-account tracking
//! - [`ConsentAggregator`]: per-handle consent details, split/multiple
//!   approval, denial
//! - [`RevocationClient`]: revoke-by-id
//!
//! Discovery output feeds linking; linking output feeds the consent
//! aggregator; revocation is independent of that pipeline. Coordinators take
//! `&mut self` on state-mutating flows, so a coordinator instance can have at
//! most one such call in flight.

pub mod consent;
pub mod discovery;
pub mod linking;
pub mod revocation;

pub use consent::ConsentAggregator;
pub use discovery::{DiscoveryCoordinator, FipOverview};
pub use linking::LinkingCoordinator;
pub use revocation::RevocationClient;
