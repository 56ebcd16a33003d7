//! Discovery coordinator: FIP directory, identifier collection, account
//! discovery

use consent_core::{
    DiscoveredAccount, DiscoveryError, EntityInfo, FipDetails, FipInfo, NetworkError,
    TypedIdentifier,
};
use session_gateway::SessionGateway;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// FIP details and entity display info, fetched independently and merged for
/// display. Partial failure of one leg never blocks the other; each leg keeps
/// its own error.
#[derive(Debug, Clone)]
pub struct FipOverview {
    /// Identifier schema leg
    pub details: Result<FipDetails, NetworkError>,
    /// Display metadata leg
    pub entity: Result<EntityInfo, NetworkError>,
}

/// Coordinates account discovery against one FIP at a time.
///
/// Holds the session-scoped ordered identifier collection; a failed discovery
/// leaves the collection intact for manual retry.
pub struct DiscoveryCoordinator {
    gateway: Arc<SessionGateway>,
    identifiers: Vec<TypedIdentifier>,
}

impl DiscoveryCoordinator {
    /// Coordinator over a verified session.
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        Self {
            gateway,
            identifiers: Vec::new(),
        }
    }

    /// List all FIPs in the directory.
    pub async fn list_fips(&self) -> Result<Vec<FipInfo>, NetworkError> {
        self.gateway.list_fips().await
    }

    /// Fetch the identifier schema and display metadata for a FIP.
    ///
    /// The two fetches run concurrently and independently.
    pub async fn fip_overview(&self, fip_id: &str) -> FipOverview {
        let (details, entity) = tokio::join!(
            self.gateway.fip_details(fip_id),
            self.gateway.entity_info(fip_id, "FIP"),
        );
        if let Err(e) = &details {
            warn!("FIP details fetch failed for {}: {}", fip_id, e);
        }
        if let Err(e) = &entity {
            warn!("entity info fetch failed for {}: {}", fip_id, e);
        }
        FipOverview { details, entity }
    }

    /// Append a user-supplied identifier to the session-scoped collection.
    pub fn add_identifier(&mut self, identifier: TypedIdentifier) {
        self.identifiers.push(identifier);
    }

    /// The identifiers collected so far, in insertion order.
    pub fn identifiers(&self) -> &[TypedIdentifier] {
        &self.identifiers
    }

    /// Discard the discovery flow, clearing the identifier collection.
    pub fn discard(&mut self) {
        self.identifiers.clear();
    }

    /// Discover accounts at a FIP using the collected identifiers. An empty
    /// collection is valid - some FIPs require no identifiers.
    pub async fn discover(
        &self,
        fip_id: &str,
        fi_types: &[String],
    ) -> Result<Vec<DiscoveredAccount>, DiscoveryError> {
        let accounts = self
            .gateway
            .discover_accounts(fip_id, fi_types, &self.identifiers)
            .await?;
        info!("discovered {} accounts at {}", accounts.len(), fip_id);
        Ok(accounts)
    }

    /// Discover accounts and drop any whose reference is already linked, so
    /// an already-linked account is never offered as a selection candidate.
    pub async fn discover_filtered(
        &self,
        fip_id: &str,
        fi_types: &[String],
        linked_references: &HashSet<String>,
    ) -> Result<Vec<DiscoveredAccount>, DiscoveryError> {
        let mut accounts = self.discover(fip_id, fi_types).await?;
        accounts.retain(|a| !linked_references.contains(&a.account_reference_number));
        Ok(accounts)
    }
}
