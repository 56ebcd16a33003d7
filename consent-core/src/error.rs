//! Error taxonomy for the consent session client
//!
//! Every remote failure carries a machine-readable code, a human-readable
//! message, and a localized description; all three are preserved to the
//! caller. Client-side failures synthesize an [`ErrorDetail`] with a
//! `client.*` code so the taxonomy stays uniform.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider error code observed on transient silent-auth (SNA) failures.
///
/// A login failing with this code is retried exactly once; a second failure
/// of the same kind is surfaced to the user.
pub const TRANSIENT_SILENT_AUTH_CODE: &str = "1002";

/// Machine-readable code, human-readable message, and localized description
/// of a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Localized description for display
    pub localized_description: String,
}

impl ErrorDetail {
    /// Detail as reported by the remote network.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        localized_description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            localized_description: localized_description.into(),
        }
    }

    /// Detail for a failure raised client-side; the localized description
    /// falls back to the message.
    pub fn local(code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code.into(),
            localized_description: message.clone(),
            message,
        }
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Failure establishing the long-lived channel to the AA endpoint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// Channel could not be established
    #[error("Connection failed: {0}")]
    Failed(ErrorDetail),
}

impl ConnectionError {
    /// The code/message/localized triple for this error.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            ConnectionError::Failed(d) => d.clone(),
        }
    }
}

/// Authentication failure during login or OTP verification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Credentials or OTP rejected by the AA
    #[error("Authentication rejected: {0}")]
    Rejected(ErrorDetail),

    /// Transient silent-auth failure (provider code 1002); eligible for the
    /// single automatic login retry
    #[error("Transient silent-auth failure: {0}")]
    TransientSilentAuth(ErrorDetail),

    /// A required credential was empty
    #[error("Missing required credential: {0}")]
    MissingCredential(&'static str),

    /// The OTP reference is stale or was already consumed
    #[error("Stale or already-consumed OTP reference")]
    StaleReference,
}

impl AuthError {
    /// The code/message/localized triple for this error.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            AuthError::Rejected(d) | AuthError::TransientSilentAuth(d) => d.clone(),
            AuthError::MissingCredential(field) => ErrorDetail::local(
                "client.missing_credential",
                format!("missing required credential: {field}"),
            ),
            AuthError::StaleReference => ErrorDetail::local(
                "client.stale_reference",
                "stale or already-consumed OTP reference",
            ),
        }
    }
}

/// Remote or transport failure on a read-style operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Failure reported by the AA network
    #[error("Network error: {0}")]
    Remote(ErrorDetail),

    /// Failure below the AA protocol (connect, TLS, serialization)
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl NetworkError {
    /// The code/message/localized triple for this error.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            NetworkError::Remote(d) => d.clone(),
            NetworkError::Transport(msg) => ErrorDetail::local("client.transport", msg.clone()),
        }
    }
}

/// Account discovery failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiscoveryError {
    /// Discovery rejected by the FIP or the AA
    #[error("Discovery failed: {0}")]
    Remote(ErrorDetail),

    /// Underlying network failure
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl DiscoveryError {
    /// The code/message/localized triple for this error.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            DiscoveryError::Remote(d) => d.clone(),
            DiscoveryError::Network(e) => e.detail(),
        }
    }
}

/// Account linking or link-confirmation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    /// Linking rejected by the FIP or the AA
    #[error("Linking failed: {0}")]
    Remote(ErrorDetail),

    /// No accounts were selected for linking
    #[error("No accounts selected for linking")]
    NoAccountsSelected,

    /// A selected account is already linked
    #[error("Account {account_reference} is already linked")]
    AlreadyLinked {
        /// Account reference number of the already-linked selection
        account_reference: String,
    },

    /// The OTP supplied for confirmation was empty
    #[error("Empty OTP")]
    EmptyOtp,

    /// No link operation is awaiting confirmation
    #[error("No pending linking request")]
    NoPendingLink,

    /// Underlying network failure
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl LinkError {
    /// The code/message/localized triple for this error.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            LinkError::Remote(d) => d.clone(),
            LinkError::NoAccountsSelected => {
                ErrorDetail::local("client.no_accounts_selected", "no accounts selected")
            }
            LinkError::AlreadyLinked { account_reference } => ErrorDetail::local(
                "client.already_linked",
                format!("account {account_reference} is already linked"),
            ),
            LinkError::EmptyOtp => ErrorDetail::local("client.empty_otp", "empty OTP"),
            LinkError::NoPendingLink => {
                ErrorDetail::local("client.no_pending_link", "no pending linking request")
            }
            LinkError::Network(e) => e.detail(),
        }
    }
}

/// Consent approval or denial failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsentError {
    /// Approval or denial rejected by the AA
    #[error("Consent operation failed: {0}")]
    Remote(ErrorDetail),

    /// No accounts were selected for approval
    #[error("No accounts selected for consent approval")]
    NoAccountsSelected,

    /// No consent handles are configured for this session
    #[error("No consent handles configured")]
    NoHandlesConfigured,

    /// Split approval cannot pair every selection with a configured handle
    #[error("Cannot pair {selections} selected accounts with {handles} consent handles")]
    HandleMismatch {
        /// Number of selected accounts
        selections: usize,
        /// Number of configured consent handles
        handles: usize,
    },

    /// The detail for a handle was never fetched (or its fetch failed)
    #[error("Consent detail not fetched for handle {handle}")]
    DetailNotFetched {
        /// The consent handle missing a detail
        handle: String,
    },

    /// A split approval failed after some approvals were already issued;
    /// completed approvals are not rolled back
    #[error("Split approval failed after {completed} completed approvals: {source}")]
    PartialApproval {
        /// Approvals issued before the failure
        completed: usize,
        /// The failure that stopped the split
        #[source]
        source: Box<ConsentError>,
    },

    /// Underlying network failure
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl ConsentError {
    /// The code/message/localized triple for this error.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            ConsentError::Remote(d) => d.clone(),
            ConsentError::NoAccountsSelected => {
                ErrorDetail::local("client.no_accounts_selected", "no accounts selected")
            }
            ConsentError::NoHandlesConfigured => {
                ErrorDetail::local("client.no_handles", "no consent handles configured")
            }
            ConsentError::HandleMismatch {
                selections,
                handles,
            } => ErrorDetail::local(
                "client.handle_mismatch",
                format!("cannot pair {selections} accounts with {handles} handles"),
            ),
            ConsentError::DetailNotFetched { handle } => ErrorDetail::local(
                "client.detail_not_fetched",
                format!("consent detail not fetched for handle {handle}"),
            ),
            ConsentError::PartialApproval { source, .. } => source.detail(),
            ConsentError::Network(e) => e.detail(),
        }
    }
}

/// Consent revocation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevokeError {
    /// Revocation rejected by the AA (including unknown consent ids)
    #[error("Revocation failed: {0}")]
    Remote(ErrorDetail),

    /// Underlying network failure
    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl RevokeError {
    /// The code/message/localized triple for this error.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            RevokeError::Remote(d) => d.clone(),
            RevokeError::Network(e) => e.detail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_detail_is_preserved_verbatim() {
        let detail = ErrorDetail::new("1002", "silent auth failed", "Anmeldung fehlgeschlagen");
        let err = AuthError::TransientSilentAuth(detail.clone());
        assert_eq!(err.detail(), detail);
        assert!(err.to_string().contains("1002"));
    }

    #[test]
    fn local_detail_falls_back_to_message() {
        let err = LinkError::NoPendingLink;
        let detail = err.detail();
        assert_eq!(detail.code, "client.no_pending_link");
        assert_eq!(detail.message, detail.localized_description);
    }

    #[test]
    fn partial_approval_reports_the_underlying_failure() {
        let inner = ConsentError::Remote(ErrorDetail::new("403", "expired", "expired"));
        let err = ConsentError::PartialApproval {
            completed: 2,
            source: Box::new(inner),
        };
        assert_eq!(err.detail().code, "403");
        assert!(err.to_string().contains("2 completed"));
    }
}
