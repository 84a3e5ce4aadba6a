use std::time::Duration;

use crate::error::JoFotaraError;

/// Production JoFotara submission endpoint.
pub const DEFAULT_API_URL: &str = "https://backend.jofotara.gov.jo/core/invoices/";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Seller identity applied to every invoice built from one configuration.
///
/// Useful when the same registered seller issues many invoices: the seller
/// section is pre-filled and individual invoices only override it when needed.
#[derive(Debug, Clone)]
pub struct SellerDefaults {
    tin: String,
    name: String,
}

impl SellerDefaults {
    /// Create seller defaults.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or the TIN is not at least 6 digits.
    pub fn new(tin: impl Into<String>, name: impl Into<String>) -> Result<Self, JoFotaraError> {
        let tin = tin.into();
        let name = name.into();
        if tin.len() < 6 || !tin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(JoFotaraError::Config(
                "seller TIN must be at least 6 digits".into(),
            ));
        }
        if name.trim().is_empty() {
            return Err(JoFotaraError::Config("seller name cannot be empty".into()));
        }
        Ok(Self { tin, name })
    }

    pub fn tin(&self) -> &str {
        &self.tin
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Client configuration passed to [`JoFotaraInvoice::new`].
///
/// [`JoFotaraInvoice::new`]: crate::JoFotaraInvoice::new
#[derive(Debug, Clone)]
pub struct JoFotaraConfig {
    client_id: String,
    client_secret: String,
    api_url: String,
    timeout: Duration,
    seller_defaults: Option<SellerDefaults>,
}

impl JoFotaraConfig {
    /// Create a configuration with the API credentials issued by ISTD.
    ///
    /// # Errors
    ///
    /// Fails if either credential is empty.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, JoFotaraError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(JoFotaraError::Config(
                "JoFotara client ID and secret are required".into(),
            ));
        }
        Ok(Self {
            client_id,
            client_secret,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            seller_defaults: None,
        })
    }

    /// Override the submission endpoint (e.g. for a sandbox environment).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the request timeout used by `send()`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pre-fill the seller section of every invoice built from this config.
    pub fn with_seller_defaults(mut self, defaults: SellerDefaults) -> Self {
        self.seller_defaults = Some(defaults);
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn seller_defaults(&self) -> Option<&SellerDefaults> {
        self.seller_defaults.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_credentials() {
        assert!(JoFotaraConfig::new("", "secret").is_err());
        assert!(JoFotaraConfig::new("id", "").is_err());
        assert!(JoFotaraConfig::new("id", "secret").is_ok());
    }

    #[test]
    fn defaults_to_production_endpoint_and_timeout() {
        let config = JoFotaraConfig::new("id", "secret").unwrap();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn seller_defaults_require_values() {
        assert!(SellerDefaults::new("", "ACME").is_err());
        assert!(SellerDefaults::new("12345", "ACME").is_err());
        assert!(SellerDefaults::new("123456789", "  ").is_err());
        let d = SellerDefaults::new("123456789", "ACME").unwrap();
        assert_eq!(d.tin(), "123456789");
    }
}
