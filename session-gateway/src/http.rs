//! JSON-over-HTTPS implementation of the transport seam

use crate::config::ClientConfig;
use crate::transport::AaTransport;
use async_trait::async_trait;
use consent_core::{
    AccountLinkingConfirmation, AuthError, ConnectionError, ConsentError, ConsentRequestDetail,
    DiscoveredAccount, DiscoveryError, EntityInfo, ErrorDetail, FipDetails, FipInfo, LinkError,
    LinkedAccount, LinkingRequestReference, LoginResponse, NetworkError, RevokeError,
    TypedIdentifier, VerifiedSession, TRANSIENT_SILENT_AUTH_CODE,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::warn;

/// Error body returned by the AA endpoint on non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
    #[serde(rename = "localizedDescription")]
    localized_description: Option<String>,
}

/// HTTP transport to a single configured AA endpoint.
pub struct HttpTransport {
    config: ClientConfig,
    client: Client,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ConnectionError> {
        if !config.certificate_pins.is_empty() {
            // TODO: wire the pin allow-list into a custom rustls verifier
            warn!(
                pins = config.certificate_pins.len(),
                "certificate pins configured; enforcement is delegated to the channel layer"
            );
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                ConnectionError::Failed(ErrorDetail::local("client.build", e.to_string()))
            })?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    /// Read the error body off a non-success response, keeping all three
    /// fields the endpoint reported.
    async fn error_detail(response: Response) -> ErrorDetail {
        let status = response.status().as_u16();
        match response.json::<ApiErrorBody>().await {
            Ok(body) => ErrorDetail::new(
                body.code.unwrap_or_else(|| status.to_string()),
                body.message.unwrap_or_else(|| "request failed".to_string()),
                body.localized_description
                    .unwrap_or_else(|| "request failed".to_string()),
            ),
            Err(_) => ErrorDetail::new(
                status.to_string(),
                "request failed",
                "request failed",
            ),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, NetworkError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| NetworkError::Transport(e.to_string()))
        } else {
            Err(NetworkError::Remote(Self::error_detail(response).await))
        }
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, NetworkError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| NetworkError::Transport(e.to_string()))
        } else {
            Err(NetworkError::Remote(Self::error_detail(response).await))
        }
    }

    fn auth_error(error: NetworkError) -> AuthError {
        match error {
            NetworkError::Remote(detail) if detail.code == TRANSIENT_SILENT_AUTH_CODE => {
                AuthError::TransientSilentAuth(detail)
            }
            other => AuthError::Rejected(other.detail()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Acknowledgement {}

#[async_trait]
impl AaTransport for HttpTransport {
    async fn connect(&self) -> Result<(), ConnectionError> {
        self.get::<Acknowledgement>("session")
            .await
            .map(|_| ())
            .map_err(|e| ConnectionError::Failed(e.detail()))
    }

    async fn login(
        &self,
        username: &str,
        mobile_number: &str,
        consent_handle: &str,
    ) -> Result<LoginResponse, AuthError> {
        self.post(
            "auth/login",
            &json!({
                "username": username,
                "mobileNumber": mobile_number,
                "consentHandle": consent_handle,
            }),
        )
        .await
        .map_err(Self::auth_error)
    }

    async fn verify_otp(&self, otp: &str, reference: &str) -> Result<VerifiedSession, AuthError> {
        self.post(
            "auth/verify",
            &json!({ "otp": otp, "reference": reference }),
        )
        .await
        .map_err(Self::auth_error)
    }

    async fn list_fips(&self) -> Result<Vec<FipInfo>, NetworkError> {
        self.get("fips").await
    }

    async fn fip_details(&self, fip_id: &str) -> Result<FipDetails, NetworkError> {
        self.get(&format!("fips/{fip_id}")).await
    }

    async fn entity_info(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> Result<EntityInfo, NetworkError> {
        self.get(&format!("entities/{entity_id}?type={entity_type}"))
            .await
    }

    async fn discover_accounts(
        &self,
        fip_id: &str,
        fi_types: &[String],
        identifiers: &[TypedIdentifier],
    ) -> Result<Vec<DiscoveredAccount>, DiscoveryError> {
        self.post(
            "accounts/discover",
            &json!({
                "fipId": fip_id,
                "fiTypes": fi_types,
                "identifiers": identifiers,
            }),
        )
        .await
        .map_err(|e| match e {
            NetworkError::Remote(detail) => DiscoveryError::Remote(detail),
            transport => DiscoveryError::Network(transport),
        })
    }

    async fn link_accounts(
        &self,
        fip_details: &FipDetails,
        accounts: &[DiscoveredAccount],
    ) -> Result<LinkingRequestReference, LinkError> {
        self.post(
            "accounts/link",
            &json!({ "fipDetails": fip_details, "accounts": accounts }),
        )
        .await
        .map_err(|e| match e {
            NetworkError::Remote(detail) => LinkError::Remote(detail),
            transport => LinkError::Network(transport),
        })
    }

    async fn confirm_linking(
        &self,
        reference: &LinkingRequestReference,
        otp: &str,
    ) -> Result<AccountLinkingConfirmation, LinkError> {
        self.post(
            "accounts/link/confirm",
            &json!({ "reference": reference, "otp": otp }),
        )
        .await
        .map_err(|e| match e {
            NetworkError::Remote(detail) => LinkError::Remote(detail),
            transport => LinkError::Network(transport),
        })
    }

    async fn linked_accounts(&self) -> Result<Vec<LinkedAccount>, NetworkError> {
        self.get("accounts/linked").await
    }

    async fn consent_detail(&self, handle: &str) -> Result<ConsentRequestDetail, NetworkError> {
        self.get(&format!("consents/{handle}")).await
    }

    async fn approve_consent(
        &self,
        detail: &ConsentRequestDetail,
        accounts: &[LinkedAccount],
    ) -> Result<(), ConsentError> {
        self.post::<Acknowledgement>(
            "consents/approve",
            &json!({ "detail": detail, "accounts": accounts }),
        )
        .await
        .map(|_| ())
        .map_err(|e| match e {
            NetworkError::Remote(detail) => ConsentError::Remote(detail),
            transport => ConsentError::Network(transport),
        })
    }

    async fn deny_consent(&self, detail: &ConsentRequestDetail) -> Result<(), ConsentError> {
        self.post::<Acknowledgement>("consents/deny", &json!({ "detail": detail }))
            .await
            .map(|_| ())
            .map_err(|e| match e {
                NetworkError::Remote(detail) => ConsentError::Remote(detail),
                transport => ConsentError::Network(transport),
            })
    }

    async fn revoke_consent(&self, consent_id: &str) -> Result<(), RevokeError> {
        self.post::<Acknowledgement>(
            &format!("consents/{consent_id}/revoke"),
            &json!({}),
        )
        .await
        .map(|_| ())
        .map_err(|e| match e {
            NetworkError::Remote(detail) => RevokeError::Remote(detail),
            transport => RevokeError::Network(transport),
        })
    }
}
