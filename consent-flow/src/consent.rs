//! Consent aggregator: per-handle details, split/multiple approval, denial

use consent_core::{
    ApprovalMode, ConsentError, ConsentRequestDetail, LinkedAccount, NetworkError,
};
use session_gateway::SessionGateway;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Aggregates pending consent requests and submits approvals or a denial
/// against a user-chosen set of linked accounts.
///
/// Configured with an ordered list of pending consent handles; details are
/// kept keyed by handle regardless of the approval path chosen later.
pub struct ConsentAggregator {
    gateway: Arc<SessionGateway>,
    handles: Vec<String>,
    details: HashMap<String, ConsentRequestDetail>,
}

impl ConsentAggregator {
    /// Aggregator for an ordered list of pending consent handles.
    pub fn new(gateway: Arc<SessionGateway>, handles: Vec<String>) -> Self {
        Self {
            gateway,
            handles,
            details: HashMap::new(),
        }
    }

    /// The configured handles, in order.
    pub fn handles(&self) -> &[String] {
        &self.handles
    }

    /// The fetched detail for a handle, if any.
    pub fn detail(&self, handle: &str) -> Option<&ConsentRequestDetail> {
        self.details.get(handle)
    }

    /// Fetch the detail of every configured handle, one call per handle.
    ///
    /// Results are kept keyed by handle; the last fetch wins. A failing
    /// handle is reported and skipped, the remaining handles still proceed.
    pub async fn fetch_details(&mut self) -> Vec<(String, NetworkError)> {
        let mut failures = Vec::new();
        for handle in self.handles.clone() {
            match self.gateway.consent_detail(&handle).await {
                Ok(detail) => {
                    self.details.insert(handle, detail);
                }
                Err(e) => {
                    warn!("consent detail fetch failed for {}: {}", handle, e);
                    failures.push((handle, e));
                }
            }
        }
        failures
    }

    /// Approve the pending consent(s) against the selected linked accounts.
    ///
    /// `Split` issues one approval call per selection, pairing selection i
    /// with configured handle i; it fails fast on the first error and reports
    /// partial completion without rolling back. `Multiple` issues a single
    /// call pairing the first handle's detail with the full selection.
    pub async fn approve(
        &self,
        mode: ApprovalMode,
        selections: &[LinkedAccount],
    ) -> Result<(), ConsentError> {
        if selections.is_empty() {
            return Err(ConsentError::NoAccountsSelected);
        }
        match mode {
            ApprovalMode::Split => self.approve_split(selections).await,
            ApprovalMode::Multiple => self.approve_multiple(selections).await,
        }
    }

    async fn approve_split(&self, selections: &[LinkedAccount]) -> Result<(), ConsentError> {
        if selections.len() > self.handles.len() {
            return Err(ConsentError::HandleMismatch {
                selections: selections.len(),
                handles: self.handles.len(),
            });
        }
        // Every paired detail must be present before the first call goes out.
        for handle in &self.handles[..selections.len()] {
            if !self.details.contains_key(handle) {
                return Err(ConsentError::DetailNotFetched {
                    handle: handle.clone(),
                });
            }
        }

        let mut completed = 0usize;
        for (account, handle) in selections.iter().zip(&self.handles) {
            let detail = &self.details[handle];
            match self
                .gateway
                .approve_consent(detail, std::slice::from_ref(account))
                .await
            {
                Ok(()) => completed += 1,
                Err(e) if completed > 0 => {
                    return Err(ConsentError::PartialApproval {
                        completed,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        info!("split approval completed: {} approvals issued", completed);
        Ok(())
    }

    async fn approve_multiple(&self, selections: &[LinkedAccount]) -> Result<(), ConsentError> {
        let detail = self.first_detail()?;
        self.gateway.approve_consent(detail, selections).await?;
        info!(
            "multiple approval completed: 1 call over {} accounts",
            selections.len()
        );
        Ok(())
    }

    /// Deny the pending consent. Only the first configured handle is ever
    /// targeted; multi-handle denial is out of scope.
    pub async fn deny(&self) -> Result<(), ConsentError> {
        let detail = self.first_detail()?;
        self.gateway.deny_consent(detail).await?;
        info!("consent denied for handle {}", detail.consent_handle);
        Ok(())
    }

    fn first_detail(&self) -> Result<&ConsentRequestDetail, ConsentError> {
        let handle = self
            .handles
            .first()
            .ok_or(ConsentError::NoHandlesConfigured)?;
        self.details
            .get(handle)
            .ok_or_else(|| ConsentError::DetailNotFetched {
                handle: handle.clone(),
            })
    }
}
