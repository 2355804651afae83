//! Postal-code (CEP) address lookup client.
//!
//! Talks to a ViaCEP-compatible service. The lookup is best-effort: the
//! checkout degrades to manual address entry when it fails, so every error
//! here is surfaced to the client as a non-fatal condition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pampa_core::PostalCode;

/// Errors that can occur when looking up a CEP.
#[derive(Debug, Error)]
pub enum CepError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status.
    #[error("lookup service error: status {0}")]
    Status(u16),

    /// The service does not know this CEP.
    #[error("unknown postal code: {0}")]
    UnknownCep(String),

    /// Failed to parse the response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Address returned by the lookup, ready to pre-fill the checkout form.
#[derive(Debug, Clone, Serialize)]
pub struct CepAddress {
    pub postal_code: String,
    pub street: String,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
}

/// Raw ViaCEP payload. An unknown CEP comes back as 200 with `erro` set.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    cep: Option<String>,
    #[serde(default)]
    logradouro: Option<String>,
    #[serde(default)]
    complemento: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

/// CEP lookup client.
#[derive(Clone)]
pub struct CepClient {
    client: reqwest::Client,
    base_url: String,
}

impl CepClient {
    /// Create a new client against a ViaCEP-compatible base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Resolve a CEP to an address.
    ///
    /// # Errors
    ///
    /// Returns `CepError::UnknownCep` when the service does not know the
    /// code, and transport/status/parse errors otherwise.
    pub async fn lookup(&self, cep: &PostalCode) -> Result<CepAddress, CepError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep.digits());

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CepError::Status(status.as_u16()));
        }

        let payload: ViaCepResponse = response
            .json()
            .await
            .map_err(|e| CepError::Parse(e.to_string()))?;

        if payload.erro.is_some() {
            return Err(CepError::UnknownCep(cep.to_string()));
        }

        Ok(CepAddress {
            postal_code: payload.cep.unwrap_or_else(|| cep.to_string()),
            street: payload.logradouro.unwrap_or_default(),
            complement: payload.complemento.filter(|s| !s.is_empty()),
            neighborhood: payload.bairro.filter(|s| !s.is_empty()),
            city: payload.localidade.unwrap_or_default(),
            state: payload.uf.unwrap_or_default(),
        })
    }
}
