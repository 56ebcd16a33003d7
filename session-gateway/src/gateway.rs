//! Session gateway: state machine and instrumented pass-throughs
//!
//! The gateway is the sole path to the remote network. Authentication is a
//! small state machine (Disconnected → Connected → AwaitingOtp → Verified);
//! every other operation is a pass-through that records metrics, emits a
//! telemetry event, and logs at the operation boundary.

use crate::events::emit;
use crate::metrics::{GATEWAY_REQUESTS_TOTAL, GATEWAY_REQUEST_DURATION, LOGIN_RETRIES_TOTAL};
use crate::transport::AaTransport;
use consent_core::{
    AccountLinkingConfirmation, AuthError, AuthType, ConnectionError, ConsentError,
    ConsentRequestDetail, DiscoveredAccount, DiscoveryError, EntityInfo, FipDetails, FipInfo,
    LinkError, LinkedAccount, LinkingRequestReference, NetworkError, RevokeError, TelemetryEvent,
    TypedIdentifier, VerifiedSession,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Session lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No channel established
    Disconnected,
    /// Channel established, not authenticated
    Connected,
    /// Login issued an OTP challenge; holds the only valid reference
    AwaitingOtp {
        /// Reference returned by the most recent login
        reference: String,
    },
    /// Authentication completed
    Verified,
}

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginFlow {
    /// An OTP challenge was issued; the caller must collect an OTP and call
    /// [`SessionGateway::verify_otp`]
    OtpRequired {
        /// The challenge reference (also held in session state)
        reference: String,
    },
    /// Silent auth completed with an inline token; no OTP prompt is shown
    Verified(VerifiedSession),
}

/// One explicitly constructed gateway instance, injected into each
/// coordinator.
///
/// Authentication methods take `&mut self`, serializing user-triggered auth
/// actions; the remaining operations take `&self` and are shared behind an
/// `Arc` after verification.
pub struct SessionGateway {
    transport: Arc<dyn AaTransport>,
    state: SessionState,
}

impl SessionGateway {
    /// Gateway over a transport. No channel is opened until
    /// [`SessionGateway::connect`].
    pub fn new(transport: Arc<dyn AaTransport>) -> Self {
        Self {
            transport,
            state: SessionState::Disconnected,
        }
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    async fn instrumented<T, E, Fut>(&self, operation: &'static str, fut: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let started = Instant::now();
        let result = fut.await;
        let outcome = if result.is_ok() { "success" } else { "failure" };

        GATEWAY_REQUEST_DURATION
            .with_label_values(&[operation])
            .observe(started.elapsed().as_secs_f64());
        GATEWAY_REQUESTS_TOTAL
            .with_label_values(&[operation, outcome])
            .inc();
        emit(TelemetryEvent::new(operation, "network").with_param("outcome", outcome));

        if let Err(e) = &result {
            warn!("{} failed: {}", operation, e);
        }
        result
    }

    /// Open the long-lived channel to the AA endpoint.
    pub async fn connect(&mut self) -> Result<(), ConnectionError> {
        self.instrumented("connect", self.transport.connect())
            .await?;
        info!("connected to AA endpoint");
        self.state = SessionState::Connected;
        Ok(())
    }

    /// Initiate authentication.
    ///
    /// All three inputs must be non-empty. A login failing with the transient
    /// silent-auth code is retried exactly once; a second such failure is
    /// surfaced. If silent auth succeeded with an inline token, the token is
    /// immediately verified in place of an OTP and no prompt is shown.
    pub async fn login(
        &mut self,
        username: &str,
        mobile_number: &str,
        consent_handle: &str,
    ) -> Result<LoginFlow, AuthError> {
        if username.is_empty() {
            return Err(AuthError::MissingCredential("username"));
        }
        if mobile_number.is_empty() {
            return Err(AuthError::MissingCredential("mobile_number"));
        }
        if consent_handle.is_empty() {
            return Err(AuthError::MissingCredential("consent_handle"));
        }

        let response = match self
            .instrumented(
                "login",
                self.transport.login(username, mobile_number, consent_handle),
            )
            .await
        {
            Ok(response) => response,
            Err(AuthError::TransientSilentAuth(detail)) => {
                warn!("transient silent-auth failure ({}), retrying login once", detail.code);
                let retry = self
                    .instrumented(
                        "login",
                        self.transport.login(username, mobile_number, consent_handle),
                    )
                    .await;
                LOGIN_RETRIES_TOTAL
                    .with_label_values(&[if retry.is_ok() { "success" } else { "failure" }])
                    .inc();
                retry?
            }
            Err(e) => return Err(e),
        };

        match (response.auth_type, response.token.as_deref()) {
            (AuthType::SilentAuth, Some(token)) if !token.is_empty() => {
                info!("silent auth token received, skipping OTP prompt");
                let session = self
                    .instrumented(
                        "verify_otp",
                        self.transport.verify_otp(token, &response.reference),
                    )
                    .await?;
                self.state = SessionState::Verified;
                Ok(LoginFlow::Verified(session))
            }
            _ => {
                self.state = SessionState::AwaitingOtp {
                    reference: response.reference.clone(),
                };
                Ok(LoginFlow::OtpRequired {
                    reference: response.reference,
                })
            }
        }
    }

    /// Complete authentication with the user-supplied OTP.
    ///
    /// Valid only while a challenge is outstanding; the stored reference is
    /// consumed by this call whether it succeeds or fails.
    pub async fn verify_otp(&mut self, otp: &str) -> Result<VerifiedSession, AuthError> {
        if otp.is_empty() {
            return Err(AuthError::MissingCredential("otp"));
        }
        let reference = match std::mem::replace(&mut self.state, SessionState::Connected) {
            SessionState::AwaitingOtp { reference } => reference,
            other => {
                self.state = other;
                return Err(AuthError::StaleReference);
            }
        };

        let session = self
            .instrumented("verify_otp", self.transport.verify_otp(otp, &reference))
            .await?;
        info!("session verified for user {}", session.user_id);
        self.state = SessionState::Verified;
        Ok(session)
    }

    /// List all FIPs in the directory.
    pub async fn list_fips(&self) -> Result<Vec<FipInfo>, NetworkError> {
        self.instrumented("list_fips", self.transport.list_fips())
            .await
    }

    /// Fetch the identifier schema for one FIP.
    pub async fn fip_details(&self, fip_id: &str) -> Result<FipDetails, NetworkError> {
        self.instrumented("fip_details", self.transport.fip_details(fip_id))
            .await
    }

    /// Fetch display metadata for an entity.
    pub async fn entity_info(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> Result<EntityInfo, NetworkError> {
        self.instrumented(
            "entity_info",
            self.transport.entity_info(entity_id, entity_type),
        )
        .await
    }

    /// Discover accounts at a FIP.
    pub async fn discover_accounts(
        &self,
        fip_id: &str,
        fi_types: &[String],
        identifiers: &[TypedIdentifier],
    ) -> Result<Vec<DiscoveredAccount>, DiscoveryError> {
        self.instrumented(
            "discover_accounts",
            self.transport.discover_accounts(fip_id, fi_types, identifiers),
        )
        .await
    }

    /// Submit accounts for linking.
    pub async fn link_accounts(
        &self,
        fip_details: &FipDetails,
        accounts: &[DiscoveredAccount],
    ) -> Result<LinkingRequestReference, LinkError> {
        self.instrumented(
            "link_accounts",
            self.transport.link_accounts(fip_details, accounts),
        )
        .await
    }

    /// Confirm a pending linking request with an OTP.
    pub async fn confirm_linking(
        &self,
        reference: &LinkingRequestReference,
        otp: &str,
    ) -> Result<AccountLinkingConfirmation, LinkError> {
        self.instrumented(
            "confirm_linking",
            self.transport.confirm_linking(reference, otp),
        )
        .await
    }

    /// Fetch all linked accounts.
    pub async fn linked_accounts(&self) -> Result<Vec<LinkedAccount>, NetworkError> {
        self.instrumented("linked_accounts", self.transport.linked_accounts())
            .await
    }

    /// Fetch the detail of a pending consent request.
    pub async fn consent_detail(
        &self,
        handle: &str,
    ) -> Result<ConsentRequestDetail, NetworkError> {
        self.instrumented("consent_detail", self.transport.consent_detail(handle))
            .await
    }

    /// Approve a consent request against a set of linked accounts.
    pub async fn approve_consent(
        &self,
        detail: &ConsentRequestDetail,
        accounts: &[LinkedAccount],
    ) -> Result<(), ConsentError> {
        self.instrumented(
            "approve_consent",
            self.transport.approve_consent(detail, accounts),
        )
        .await
    }

    /// Deny a consent request.
    pub async fn deny_consent(&self, detail: &ConsentRequestDetail) -> Result<(), ConsentError> {
        self.instrumented("deny_consent", self.transport.deny_consent(detail))
            .await
    }

    /// Revoke a previously granted consent.
    pub async fn revoke_consent(&self, consent_id: &str) -> Result<(), RevokeError> {
        self.instrumented(
            "revoke_consent",
            self.transport.revoke_consent(consent_id),
        )
        .await
    }
}
