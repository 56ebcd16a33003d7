//! Transport seam to the Account Aggregator network
//!
//! Wire format, handshake, and signing live behind this trait; the client
//! only sees the operations below. One method per remote operation.

use async_trait::async_trait;
use consent_core::{
    AccountLinkingConfirmation, AuthError, ConnectionError, ConsentError, ConsentRequestDetail,
    DiscoveredAccount, DiscoveryError, EntityInfo, FipDetails, FipInfo, LinkError, LinkedAccount,
    LinkingRequestReference, LoginResponse, NetworkError, RevokeError, TypedIdentifier,
    VerifiedSession,
};

/// The remote Account Aggregator network.
#[async_trait]
pub trait AaTransport: Send + Sync {
    /// Open the long-lived channel to the configured endpoint.
    async fn connect(&self) -> Result<(), ConnectionError>;

    /// Initiate authentication for a user and consent handle.
    async fn login(
        &self,
        username: &str,
        mobile_number: &str,
        consent_handle: &str,
    ) -> Result<LoginResponse, AuthError>;

    /// Complete authentication with an OTP (or inline silent-auth token)
    /// against the reference returned by the most recent login.
    async fn verify_otp(&self, otp: &str, reference: &str) -> Result<VerifiedSession, AuthError>;

    /// List all FIPs in the directory.
    async fn list_fips(&self) -> Result<Vec<FipInfo>, NetworkError>;

    /// Fetch the identifier schema for one FIP.
    async fn fip_details(&self, fip_id: &str) -> Result<FipDetails, NetworkError>;

    /// Fetch display metadata for an entity.
    async fn entity_info(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> Result<EntityInfo, NetworkError>;

    /// Discover accounts at a FIP. An empty identifier list is valid - some
    /// FIPs require none.
    async fn discover_accounts(
        &self,
        fip_id: &str,
        fi_types: &[String],
        identifiers: &[TypedIdentifier],
    ) -> Result<Vec<DiscoveredAccount>, DiscoveryError>;

    /// Submit accounts for linking; returns the reference of the pending OTP
    /// challenge.
    async fn link_accounts(
        &self,
        fip_details: &FipDetails,
        accounts: &[DiscoveredAccount],
    ) -> Result<LinkingRequestReference, LinkError>;

    /// Confirm a pending linking request with an OTP.
    async fn confirm_linking(
        &self,
        reference: &LinkingRequestReference,
        otp: &str,
    ) -> Result<AccountLinkingConfirmation, LinkError>;

    /// Fetch all linked accounts. Idempotent and side-effect free.
    async fn linked_accounts(&self) -> Result<Vec<LinkedAccount>, NetworkError>;

    /// Fetch the detail of a pending consent request by handle.
    async fn consent_detail(&self, handle: &str) -> Result<ConsentRequestDetail, NetworkError>;

    /// Approve a consent request against a set of linked accounts.
    async fn approve_consent(
        &self,
        detail: &ConsentRequestDetail,
        accounts: &[LinkedAccount],
    ) -> Result<(), ConsentError>;

    /// Deny a consent request.
    async fn deny_consent(&self, detail: &ConsentRequestDetail) -> Result<(), ConsentError>;

    /// Revoke a previously granted consent by id.
    async fn revoke_consent(&self, consent_id: &str) -> Result<(), RevokeError>;
}
