//! # Consent Core
//!
//! Shared domain model for the Account Aggregator consent session client:
//! - FIP (Financial Information Provider) metadata and identifier schemas
//! - Discovered and linked account entities
//! - Consent request details and approval modes
//! - The error taxonomy shared by the gateway and the coordinators
//! - Telemetry event types for the process-wide event sink
//!
//! The remote consent-processing network is reachable only through the
//! transport seam in `session-gateway`; this crate carries the types that
//! cross that seam.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod error;
pub mod events;
pub mod types;

pub use error::{
    AuthError, ConnectionError, ConsentError, DiscoveryError, ErrorDetail, LinkError,
    NetworkError, RevokeError, TRANSIENT_SILENT_AUTH_CODE,
};
pub use events::{EventListener, TelemetryEvent};
pub use types::*;
