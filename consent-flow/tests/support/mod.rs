//! Stateful mock transport for coordinator tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use consent_core::{
    AccountLinkingConfirmation, AuthError, AuthType, ConnectionError, ConsentError,
    ConsentPeriod, ConsentPurpose, ConsentRequestDetail, DateTimeRange, DiscoveredAccount,
    DiscoveryError, EntityInfo, ErrorDetail, FipDetails, FipInfo, FiuInfo, LinkError,
    LinkedAccount, LinkingRequestReference, LoginResponse, NetworkError, RevokeError,
    TypedIdentifier, VerifiedSession,
};
use session_gateway::{AaTransport, SessionGateway};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub const GOOD_OTP: &str = "123456";

/// A scriptable in-memory Account Aggregator.
#[derive(Default)]
pub struct MockAa {
    /// FIP directory
    pub fips: Vec<FipInfo>,
    /// Identifier schemas by FIP id
    pub fip_details: HashMap<String, FipDetails>,
    /// Entity info legs fail when the id is present here
    pub failing_entities: HashSet<String>,
    /// Accounts discoverable at any FIP
    pub discoverable: Vec<DiscoveredAccount>,
    /// Consent details by handle
    pub consent_details: HashMap<String, ConsentRequestDetail>,
    /// Consent ids known to the revocation endpoint
    pub revocable: HashSet<String>,
    /// Zero-based approve call index that should fail, if any
    pub approve_fail_at: Option<usize>,

    /// Server-side linked accounts
    pub linked: Mutex<Vec<LinkedAccount>>,
    /// Outstanding linking challenge
    pub pending_link: Mutex<Option<(LinkingRequestReference, Vec<DiscoveredAccount>)>>,
    /// Recorded approvals: (consent handle, account reference numbers)
    pub approve_calls: Mutex<Vec<(String, Vec<String>)>>,
    /// Recorded denials by consent handle
    pub deny_calls: Mutex<Vec<String>>,
    /// Recorded revocations by consent id
    pub revoke_calls: Mutex<Vec<String>>,
    link_counter: Mutex<u32>,
}

impl MockAa {
    pub fn remote(code: &str, message: &str) -> ErrorDetail {
        ErrorDetail::new(code, message, message)
    }
}

pub fn discovered(reference: &str) -> DiscoveredAccount {
    DiscoveredAccount {
        account_reference_number: reference.to_string(),
        masked_account_number: format!("XXXX{}", &reference[reference.len().saturating_sub(4)..]),
        fi_type: "DEPOSIT".to_string(),
        account_type: "SAVINGS".to_string(),
    }
}

pub fn fip_details(fip_id: &str) -> FipDetails {
    FipDetails {
        fip_id: fip_id.to_string(),
        type_identifiers: Vec::new(),
    }
}

pub fn consent_detail(handle: &str) -> ConsentRequestDetail {
    ConsentRequestDetail {
        consent_id: Some(format!("consent-{handle}")),
        consent_handle: handle.to_string(),
        financial_information_user: FiuInfo {
            id: "fiu-1".to_string(),
            name: "Demo FIU".to_string(),
        },
        purpose: ConsentPurpose {
            code: "101".to_string(),
            text: "Wealth management service".to_string(),
        },
        display_descriptions: vec!["All deposit accounts".to_string()],
        consent_date_range: DateTimeRange {
            from: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        },
        data_date_range: DateTimeRange {
            from: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap(),
        },
        data_life: ConsentPeriod {
            unit: "MONTH".to_string(),
            value: 3.0,
        },
        data_fetch_frequency: ConsentPeriod {
            unit: "DAY".to_string(),
            value: 1.0,
        },
        fi_types: vec!["DEPOSIT".to_string()],
    }
}

#[async_trait]
impl AaTransport for MockAa {
    async fn connect(&self) -> Result<(), ConnectionError> {
        Ok(())
    }

    async fn login(
        &self,
        _username: &str,
        _mobile_number: &str,
        _consent_handle: &str,
    ) -> Result<LoginResponse, AuthError> {
        Ok(LoginResponse {
            reference: "mock-otp-ref".to_string(),
            auth_type: AuthType::Otp,
            token: None,
        })
    }

    async fn verify_otp(&self, otp: &str, _reference: &str) -> Result<VerifiedSession, AuthError> {
        if otp == GOOD_OTP {
            Ok(VerifiedSession {
                user_id: "demo-user".to_string(),
            })
        } else {
            Err(AuthError::Rejected(Self::remote("401", "invalid OTP")))
        }
    }

    async fn list_fips(&self) -> Result<Vec<FipInfo>, NetworkError> {
        Ok(self.fips.clone())
    }

    async fn fip_details(&self, fip_id: &str) -> Result<FipDetails, NetworkError> {
        self.fip_details
            .get(fip_id)
            .cloned()
            .ok_or_else(|| NetworkError::Remote(Self::remote("404", "unknown FIP")))
    }

    async fn entity_info(
        &self,
        entity_id: &str,
        _entity_type: &str,
    ) -> Result<EntityInfo, NetworkError> {
        if self.failing_entities.contains(entity_id) {
            return Err(NetworkError::Remote(Self::remote("503", "entity backend down")));
        }
        Ok(EntityInfo {
            entity_id: entity_id.to_string(),
            entity_name: format!("Entity {entity_id}"),
            entity_icon_uri: None,
        })
    }

    async fn discover_accounts(
        &self,
        _fip_id: &str,
        _fi_types: &[String],
        _identifiers: &[TypedIdentifier],
    ) -> Result<Vec<DiscoveredAccount>, DiscoveryError> {
        Ok(self.discoverable.clone())
    }

    async fn link_accounts(
        &self,
        _fip_details: &FipDetails,
        accounts: &[DiscoveredAccount],
    ) -> Result<LinkingRequestReference, LinkError> {
        let mut counter = self.link_counter.lock().unwrap();
        *counter += 1;
        let reference = LinkingRequestReference(format!("link-ref-{}", *counter));
        *self.pending_link.lock().unwrap() = Some((reference.clone(), accounts.to_vec()));
        Ok(reference)
    }

    async fn confirm_linking(
        &self,
        reference: &LinkingRequestReference,
        otp: &str,
    ) -> Result<AccountLinkingConfirmation, LinkError> {
        let pending = self.pending_link.lock().unwrap().take();
        let Some((expected, accounts)) = pending else {
            return Err(LinkError::Remote(Self::remote("409", "no pending linking request")));
        };
        if &expected != reference {
            return Err(LinkError::Remote(Self::remote("409", "unknown linking reference")));
        }
        if otp != GOOD_OTP {
            return Err(LinkError::Remote(Self::remote("401", "invalid OTP")));
        }

        let confirmed: Vec<LinkedAccount> = accounts
            .iter()
            .map(|a| LinkedAccount {
                link_reference_number: format!("L-{}", a.account_reference_number),
                account_reference_number: a.account_reference_number.clone(),
                fip_id: "FIP-1".to_string(),
                fip_name: "Demo Bank".to_string(),
                masked_account_number: a.masked_account_number.clone(),
                account_type: a.account_type.clone(),
                linked_at: Some(Utc::now()),
            })
            .collect();
        self.linked.lock().unwrap().extend(confirmed.clone());
        Ok(AccountLinkingConfirmation {
            linked_accounts: confirmed,
        })
    }

    async fn linked_accounts(&self) -> Result<Vec<LinkedAccount>, NetworkError> {
        Ok(self.linked.lock().unwrap().clone())
    }

    async fn consent_detail(&self, handle: &str) -> Result<ConsentRequestDetail, NetworkError> {
        self.consent_details
            .get(handle)
            .cloned()
            .ok_or_else(|| NetworkError::Remote(Self::remote("404", "unknown consent handle")))
    }

    async fn approve_consent(
        &self,
        detail: &ConsentRequestDetail,
        accounts: &[LinkedAccount],
    ) -> Result<(), ConsentError> {
        let mut calls = self.approve_calls.lock().unwrap();
        let index = calls.len();
        calls.push((
            detail.consent_handle.clone(),
            accounts
                .iter()
                .map(|a| a.account_reference_number.clone())
                .collect(),
        ));
        if self.approve_fail_at == Some(index) {
            return Err(ConsentError::Remote(Self::remote("500", "approval rejected")));
        }
        Ok(())
    }

    async fn deny_consent(&self, detail: &ConsentRequestDetail) -> Result<(), ConsentError> {
        self.deny_calls
            .lock()
            .unwrap()
            .push(detail.consent_handle.clone());
        Ok(())
    }

    async fn revoke_consent(&self, consent_id: &str) -> Result<(), RevokeError> {
        self.revoke_calls.lock().unwrap().push(consent_id.to_string());
        if self.revocable.contains(consent_id) {
            Ok(())
        } else {
            Err(RevokeError::Remote(Self::remote("404", "unknown consent id")))
        }
    }
}

/// A gateway over a mock, already past the auth phase.
pub async fn verified_gateway(mock: Arc<MockAa>) -> Arc<SessionGateway> {
    let mut gateway = SessionGateway::new(mock);
    gateway.connect().await.expect("mock connect");
    gateway
        .login("demo", "9999999999", "handle-1")
        .await
        .expect("mock login");
    gateway.verify_otp(GOOD_OTP).await.expect("mock verify");
    Arc::new(gateway)
}
