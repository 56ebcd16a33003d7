//! Revocation client

use consent_core::RevokeError;
use session_gateway::SessionGateway;
use std::sync::Arc;
use tracing::info;

/// Submits revoke-by-id requests for previously granted consents.
///
/// Fire-and-forget from the caller's perspective: the only post-condition is
/// success or failure, with no status polling. A revoke of an unknown consent
/// id surfaces the remote's error, never a silent success.
pub struct RevocationClient {
    gateway: Arc<SessionGateway>,
}

impl RevocationClient {
    /// Client over a verified session.
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        Self { gateway }
    }

    /// Revoke a previously granted consent.
    pub async fn revoke(&self, consent_id: &str) -> Result<(), RevokeError> {
        self.gateway.revoke_consent(consent_id).await?;
        info!("consent {} revoked", consent_id);
        Ok(())
    }
}
