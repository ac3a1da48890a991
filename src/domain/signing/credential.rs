//! Merchant credential.

use secrecy::{ExposeSecret, SecretString};

use super::SignatureAlgorithm;

/// Account identifier, shared secret and preferred algorithm for one
/// merchant account.
///
/// Constructed once from configuration and handed to the request builder
/// and callback validator. Several credentials can coexist in one process.
/// The secret is held in a `SecretString`, so `Debug` output redacts it.
#[derive(Debug, Clone)]
pub struct MerchantCredential {
    account_id: String,
    secret: SecretString,
    algorithm: SignatureAlgorithm,
}

impl MerchantCredential {
    pub fn new(
        account_id: impl Into<String>,
        secret: impl Into<String>,
        algorithm: SignatureAlgorithm,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            secret: SecretString::new(secret.into()),
            algorithm,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Algorithm used for outbound requests.
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}
