//! Shared types for the consent session client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Financial Information Provider as returned by the FIP directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FipInfo {
    /// FIP identifier
    pub fip_id: String,
    /// Display name of the FIP's product, if published
    pub product_name: Option<String>,
    /// FI types the FIP can serve (e.g. "DEPOSIT", "TERM_DEPOSIT")
    pub fip_fi_types: Vec<String>,
}

/// Identifier requirement declared by a FIP for one FI type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierRequirement {
    /// Identifier category (e.g. "STRONG", "WEAK")
    pub category: String,
    /// Identifier type (e.g. "MOBILE", "PAN")
    pub identifier_type: String,
}

/// Identifier schema for one FI type at a FIP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiTypeIdentifiers {
    /// FI type this schema applies to
    pub fi_type: String,
    /// Accepted identifiers for this FI type
    pub identifiers: Vec<IdentifierRequirement>,
}

/// Identifier schema for a FIP, fetched per FIP and immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FipDetails {
    /// FIP identifier
    pub fip_id: String,
    /// Declared identifier schema per FI type
    pub type_identifiers: Vec<FiTypeIdentifiers>,
}

/// Display metadata for an entity (FIP, AA, FIU).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    /// Entity identifier
    pub entity_id: String,
    /// Display name
    pub entity_name: String,
    /// Logo URI, if published
    pub entity_icon_uri: Option<String>,
}

/// A user-supplied discovery identifier.
///
/// Appended to a session-scoped ordered collection and cleared only by
/// discarding the discovery flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedIdentifier {
    /// Identifier category
    pub category: String,
    /// Identifier type
    pub identifier_type: String,
    /// Identifier value
    pub value: String,
}

impl TypedIdentifier {
    /// Convenience constructor.
    pub fn new(
        category: impl Into<String>,
        identifier_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            identifier_type: identifier_type.into(),
            value: value.into(),
        }
    }
}

/// An account found at a FIP by a discovery call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredAccount {
    /// Account reference number (stable identity across discovery rounds)
    pub account_reference_number: String,
    /// Masked account number for display
    pub masked_account_number: String,
    /// FI type of the account
    pub fi_type: String,
    /// Account type (e.g. "SAVINGS")
    pub account_type: String,
}

/// Opaque reference to a pending link operation awaiting OTP confirmation.
///
/// Corresponds to exactly one outstanding OTP challenge; confirming the
/// challenge, whether it succeeds or fails, invalidates reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkingRequestReference(pub String);

impl std::fmt::Display for LinkingRequestReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A confirmed link between the user and a FIP account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    /// Link reference number assigned on confirmation
    pub link_reference_number: String,
    /// Account reference number (same identity as in discovery)
    pub account_reference_number: String,
    /// FIP identifier
    pub fip_id: String,
    /// FIP display name
    pub fip_name: String,
    /// Masked account number
    pub masked_account_number: String,
    /// Account type
    pub account_type: String,
    /// Last update timestamp on the link, if known
    pub linked_at: Option<DateTime<Utc>>,
}

/// Result of an OTP-confirmed linking round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLinkingConfirmation {
    /// Accounts confirmed by this round
    pub linked_accounts: Vec<LinkedAccount>,
}

/// The FIU (Financial Information User) requesting a consent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiuInfo {
    /// FIU identifier
    pub id: String,
    /// FIU display name
    pub name: String,
}

/// Purpose attached to a consent request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentPurpose {
    /// Purpose code from the AA purpose taxonomy
    pub code: String,
    /// Human-readable purpose text
    pub text: String,
}

/// An inclusive datetime range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeRange {
    /// Range start
    pub from: DateTime<Utc>,
    /// Range end
    pub to: DateTime<Utc>,
}

/// A unit/value period (data life, fetch frequency).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentPeriod {
    /// Period unit (e.g. "MONTH", "YEAR")
    pub unit: String,
    /// Period value
    pub value: f64,
}

/// Terms of a pending consent request, fetched by consent handle.
///
/// Immutable once fetched; the aggregator keeps one entry per handle and the
/// last fetch wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRequestDetail {
    /// Consent id, present once the consent exists on the AA
    pub consent_id: Option<String>,
    /// Consent handle this detail was fetched by
    pub consent_handle: String,
    /// Requesting FIU
    pub financial_information_user: FiuInfo,
    /// Consent purpose
    pub purpose: ConsentPurpose,
    /// Display descriptions shown to the user
    pub display_descriptions: Vec<String>,
    /// Consent validity range
    pub consent_date_range: DateTimeRange,
    /// Data fetch range
    pub data_date_range: DateTimeRange,
    /// How long fetched data may be retained
    pub data_life: ConsentPeriod,
    /// How often data may be fetched
    pub data_fetch_frequency: ConsentPeriod,
    /// Requested FI types
    pub fi_types: Vec<String>,
}

/// Consent approval submission mode, an explicit user choice at approval time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalMode {
    /// One approval call per selected account, pairing selection i with
    /// configured consent handle i. Finer audit granularity, partial-failure
    /// risk.
    Split,
    /// A single approval call pairing the first configured handle's detail
    /// with all selected accounts. Coarser failure reporting.
    Multiple,
}

impl std::fmt::Display for ApprovalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApprovalMode::Split => write!(f, "SPLIT"),
            ApprovalMode::Multiple => write!(f, "MULTIPLE"),
        }
    }
}

/// Authentication mode reported by a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthType {
    /// An OTP challenge was issued; the user must supply the OTP
    Otp,
    /// Silent (SNA) authentication completed platform-side; an inline token
    /// stands in for the OTP
    SilentAuth,
}

/// Response to a login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// OTP reference for the issued challenge
    pub reference: String,
    /// Authentication mode
    pub auth_type: AuthType,
    /// Inline token when `auth_type` is [`AuthType::SilentAuth`]
    pub token: Option<String>,
}

/// A verified session, produced by completing authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSession {
    /// User id the session is bound to
    pub user_id: String,
}
