//! Etherscan-compatible explorer client for source verification.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, trace, Instrument};
use url::{form_urlencoded, Url};

use crate::chain::ExplorerConfig;
use crate::error::{OftError, Result};
use crate::provider::DEFAULT_TIMEOUT_SECS;
use crate::spans;
use crate::traits::SourceVerifier;
use crate::verification::{
    ExplorerResponse, Submission, VerificationRequest, VerificationStatus,
};

/// Verification client for Vanascan, Basescan or any Etherscan-style API.
///
/// # Examples
///
/// ```rust,no_run
/// use rdat_oft::providers::EtherscanVerifier;
/// use rdat_oft::NetworkName;
///
/// # fn example() -> Result<(), rdat_oft::OftError> {
/// let explorer = NetworkName::Base.descriptor().explorer.unwrap();
/// let verifier = EtherscanVerifier::for_explorer(&explorer, "api-key")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EtherscanVerifier {
    api_url: Url,
    api_key: String,
    client: Client,
}

impl EtherscanVerifier {
    pub fn new(api_url: Url, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            api_url,
            api_key: api_key.into(),
            client,
        })
    }

    pub fn for_explorer(explorer: &ExplorerConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_url = Url::parse(explorer.api_url).map_err(|e| OftError::InvalidConfig {
            name: explorer.api_key_env.to_string(),
            reason: format!("bad explorer URL {}: {e}", explorer.api_url),
        })?;
        Self::new(api_url, api_key)
    }

    /// Form body of a `verifysourcecode` call
    fn submit_body(&self, request: &VerificationRequest) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("apikey", &self.api_key)
            .append_pair("module", "contract")
            .append_pair("action", "verifysourcecode")
            .append_pair("contractaddress", &request.address().to_string())
            .append_pair("sourceCode", request.source())
            .append_pair("codeformat", "solidity-standard-json-input")
            .append_pair("contractname", request.contract_name())
            .append_pair("compilerversion", request.compiler_version())
            // Etherscan's spelling
            .append_pair("constructorArguements", &request.constructor_args_hex())
            .finish()
    }

    fn status_url(&self, guid: &str) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("module", "contract")
            .append_pair("action", "checkverifystatus")
            .append_pair("guid", guid);
        url
    }

    async fn read_envelope(response: reqwest::Response) -> Result<ExplorerResponse> {
        let status_code = response.status();
        trace!(status_code = %status_code, "Received response from explorer API");

        response.error_for_status_ref()?;

        let envelope = response.json::<ExplorerResponse>().await?;
        debug!(
            status = %envelope.status,
            message = %envelope.message,
            result = %envelope.result,
            "Explorer response parsed"
        );
        Ok(envelope)
    }
}

#[async_trait]
impl SourceVerifier for EtherscanVerifier {
    #[instrument(skip(self, request), fields(address = %request.address()))]
    async fn submit(&self, request: &VerificationRequest) -> Result<Submission> {
        let response = self
            .client
            .post(self.api_url.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(self.submit_body(request))
            .send()
            .instrument(spans::http_request("POST", &self.api_url, "verifysourcecode"))
            .await?;

        Submission::from_response(Self::read_envelope(response).await?)
    }

    #[instrument(skip(self))]
    async fn check_status(&self, guid: &str) -> Result<VerificationStatus> {
        let url = self.status_url(guid);
        let response = self
            .client
            .get(url)
            .send()
            .instrument(spans::http_request("GET", &self.api_url, "checkverifystatus"))
            .await?;
        let envelope = Self::read_envelope(response).await?;

        Ok(VerificationStatus::from_result(&envelope.result))
    }
}
