//! Linking coordinator: link submission, OTP confirmation, linked-account
//! tracking

use consent_core::{
    AccountLinkingConfirmation, DiscoveredAccount, FipDetails, LinkError, LinkedAccount,
    LinkingRequestReference, NetworkError,
};
use session_gateway::SessionGateway;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Coordinates account linking and tracks the linked-account set.
///
/// At most one linking request is outstanding at a time; its reference is
/// consumed by the confirmation round-trip whether it succeeds or fails.
pub struct LinkingCoordinator {
    gateway: Arc<SessionGateway>,
    pending: Option<LinkingRequestReference>,
    linked_references: HashSet<String>,
}

impl LinkingCoordinator {
    /// Coordinator over a verified session.
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        Self {
            gateway,
            pending: None,
            linked_references: HashSet::new(),
        }
    }

    /// Account references known to be linked, as of the last fetch or
    /// confirmation.
    pub fn linked_references(&self) -> &HashSet<String> {
        &self.linked_references
    }

    /// Fetch all linked accounts and refresh the known linked set.
    ///
    /// Idempotent and side-effect free on the remote; seeds both the
    /// dashboard and the exclusion set for future discovery rounds.
    pub async fn fetch_linked_accounts(&mut self) -> Result<Vec<LinkedAccount>, NetworkError> {
        let accounts = self.gateway.linked_accounts().await?;
        self.linked_references = accounts
            .iter()
            .map(|a| a.account_reference_number.clone())
            .collect();
        Ok(accounts)
    }

    /// Submit a non-empty selection of discovered accounts for linking.
    ///
    /// Selections already present in the known linked set are rejected here,
    /// not just by the view layer. On success the returned reference becomes
    /// the single outstanding OTP challenge.
    pub async fn link_accounts(
        &mut self,
        fip_details: &FipDetails,
        selected: &[DiscoveredAccount],
    ) -> Result<LinkingRequestReference, LinkError> {
        if selected.is_empty() {
            return Err(LinkError::NoAccountsSelected);
        }
        if let Some(already) = selected
            .iter()
            .find(|a| self.linked_references.contains(&a.account_reference_number))
        {
            return Err(LinkError::AlreadyLinked {
                account_reference: already.account_reference_number.clone(),
            });
        }

        let reference = self.gateway.link_accounts(fip_details, selected).await?;
        info!(
            "linking requested for {} accounts, reference {}",
            selected.len(),
            reference
        );
        self.pending = Some(reference.clone());
        Ok(reference)
    }

    /// Confirm the outstanding linking request with an OTP.
    ///
    /// The pending reference is consumed whether confirmation succeeds or
    /// fails; retrying requires a fresh [`LinkingCoordinator::link_accounts`]
    /// call. Confirmed accounts are merged into the known linked set.
    pub async fn confirm_linking(
        &mut self,
        otp: &str,
    ) -> Result<AccountLinkingConfirmation, LinkError> {
        if otp.is_empty() {
            return Err(LinkError::EmptyOtp);
        }
        let reference = self.pending.take().ok_or(LinkError::NoPendingLink)?;

        let confirmation = self.gateway.confirm_linking(&reference, otp).await?;
        for account in &confirmation.linked_accounts {
            self.linked_references
                .insert(account.account_reference_number.clone());
        }
        info!(
            "linking confirmed for {} accounts",
            confirmation.linked_accounts.len()
        );
        Ok(confirmation)
    }
}
