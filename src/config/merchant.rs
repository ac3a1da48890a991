//! Merchant account configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::payment::DEFAULT_API_ENDPOINT;
use crate::domain::signing::{MerchantCredential, SignatureAlgorithm};

use super::error::ValidationError;

/// Merchant account at the payment provider
#[derive(Debug, Clone, Deserialize)]
pub struct MerchantConfig {
    /// Merchant account id (`checkout-account`)
    pub account_id: String,

    /// Shared secret used for HMAC signatures
    pub secret_key: SecretString,

    /// `sha256` or `sha512`
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Provider API base URL
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_algorithm() -> String {
    "sha512".to_string()
}

fn default_api_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl MerchantConfig {
    /// Parsed signature algorithm
    pub fn signature_algorithm(&self) -> Result<SignatureAlgorithm, ValidationError> {
        self.algorithm
            .parse()
            .map_err(|_| ValidationError::UnsupportedAlgorithm(self.algorithm.clone()))
    }

    /// Immutable credential handed to the builder and validator
    pub fn credential(&self) -> Result<MerchantCredential, ValidationError> {
        Ok(MerchantCredential::new(
            self.account_id.clone(),
            self.secret_key.expose_secret().clone(),
            self.signature_algorithm()?,
        ))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate merchant configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.account_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("MERCHANT__ACCOUNT_ID"));
        }
        if self.secret_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("MERCHANT__SECRET_KEY"));
        }

        self.signature_algorithm()?;

        match url::Url::parse(&self.api_endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            _ => return Err(ValidationError::InvalidEndpoint),
        }

        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MerchantConfig {
        MerchantConfig {
            account_id: "375917".to_string(),
            secret_key: SecretString::new("SAIPPUAKAUPPIAS".to_string()),
            algorithm: default_algorithm(),
            api_endpoint: default_api_endpoint(),
            request_timeout_secs: default_timeout_secs(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_credential_uses_configured_algorithm() {
        let mut cfg = config();
        cfg.algorithm = "sha256".to_string();

        let credential = cfg.credential().unwrap();

        assert_eq!(credential.account_id(), "375917");
        assert_eq!(credential.algorithm(), SignatureAlgorithm::HmacSha256);
    }

    #[test]
    fn test_unsupported_algorithm_fails_fast() {
        let mut cfg = config();
        cfg.algorithm = "md5".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::UnsupportedAlgorithm("md5".to_string()))
        );
    }

    #[test]
    fn test_missing_secret() {
        let mut cfg = config();
        cfg.secret_key = SecretString::new(String::new());
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::MissingRequired("MERCHANT__SECRET_KEY"))
        );
    }

    #[test]
    fn test_non_http_endpoint() {
        let mut cfg = config();
        cfg.api_endpoint = "ftp://api.checkout.fi".to_string();
        assert_eq!(cfg.validate(), Err(ValidationError::InvalidEndpoint));
    }

    #[test]
    fn test_debug_hides_secret() {
        assert!(!format!("{:?}", config()).contains("SAIPPUAKAUPPIAS"));
    }
}
