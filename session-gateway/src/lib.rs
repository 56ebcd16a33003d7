//! # Session Gateway
//!
//! Sole egress/ingress point to the Account Aggregator network:
//! - `AaTransport`: the async seam behind which the remote network lives
//! - `HttpTransport`: JSON-over-HTTPS implementation of that seam
//! - `SessionGateway`: session state machine (connect, login, OTP) plus
//!   instrumented pass-throughs for every remote operation
//! - process-wide telemetry event sink and prometheus metrics
//! - persisted login profile (the three strings surviving restarts)
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Coordinators (consent-flow)                 │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  SessionGateway (state + metrics + events)   │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  AaTransport (HttpTransport or test mock)    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Authentication methods take `&mut self`; once the session is verified the
//! gateway is shared behind an `Arc` and the remaining operations take
//! `&self`. Cancellation is not supported: once a call is issued there is no
//! API to abort it.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod events;
pub mod gateway;
pub mod http;
pub mod metrics;
pub mod profile;
pub mod transport;

pub use config::{ClientConfig, SilentAuthConfig};
pub use events::{emit, register_event_listener, set_events_enabled};
pub use gateway::{LoginFlow, SessionGateway, SessionState};
pub use http::HttpTransport;
pub use profile::{LoginProfile, ProfileError};
pub use transport::AaTransport;

/// Default request timeout (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
