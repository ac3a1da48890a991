//! Payment request value types.
//!
//! Serialized as the JSON body of `POST /payments`. Amounts are integers in
//! minor currency units (cents), never floats.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Maximum length of `reference` and `stamp` accepted by the provider.
pub const REFERENCE_MAX_LEN: usize = 200;

/// Language of the provider's payment pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    FI,
    SV,
    EN,
}

/// Customer details sent with the payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_id: Option<String>,
}

impl Customer {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            last_name: None,
            phone: None,
            vat_id: None,
        }
    }
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub product_code: String,
    pub delivery_date: NaiveDate,
    /// Unit price in minor units.
    pub unit_price: i64,
    pub units: u32,
    pub vat_percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Item {
    /// Line total in minor units, `None` on overflow.
    pub fn total(&self) -> Option<i64> {
        self.unit_price.checked_mul(i64::from(self.units))
    }
}

/// Success and cancel URLs, used both for browser redirects and for
/// server-to-server callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackUrls {
    pub success: String,
    pub cancel: String,
}

impl CallbackUrls {
    pub fn new(success: impl Into<String>, cancel: impl Into<String>) -> Self {
        Self {
            success: success.into(),
            cancel: cancel.into(),
        }
    }
}

/// A payment to be created at the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Unique per-request token; generated by the builder when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp: Option<String>,
    /// Merchant's order reference, unique per merchant account.
    pub reference: String,
    /// Total in minor units.
    pub amount: i64,
    /// ISO 4217 code.
    pub currency: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Item>,
    pub customer: Customer,
    pub redirect_urls: CallbackUrls,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_urls: Option<CallbackUrls>,
}

impl PaymentRequest {
    pub fn new(
        reference: impl Into<String>,
        amount: i64,
        currency: impl Into<String>,
        customer: Customer,
        redirect_urls: CallbackUrls,
    ) -> Self {
        Self {
            stamp: None,
            reference: reference.into(),
            amount,
            currency: currency.into(),
            language: Language::default(),
            items: Vec::new(),
            customer,
            redirect_urls,
            callback_urls: None,
        }
    }

    pub fn with_stamp(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = Some(stamp.into());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Server-to-server callback URLs. Callbacks arriving on these MUST be
    /// passed through the callback validator before being trusted.
    pub fn with_callback_urls(mut self, urls: CallbackUrls) -> Self {
        self.callback_urls = Some(urls);
        self
    }

    /// Adds an order line. The request amount must equal the sum of lines.
    pub fn add_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Sum of all line totals, `None` on overflow.
    pub fn items_total(&self) -> Option<i64> {
        self.items
            .iter()
            .try_fold(0i64, |acc, item| acc.checked_add(item.total()?))
    }

    /// Checks every request invariant.
    ///
    /// # Errors
    ///
    /// `ValidationError` naming the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_reference("reference", &self.reference)?;
        if let Some(stamp) = &self.stamp {
            validate_reference("stamp", stamp)?;
        }

        if self.amount <= 0 {
            return Err(ValidationError::invalid_format(
                "amount",
                format!("must be positive, got {}", self.amount),
            ));
        }

        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter ISO 4217 code",
            ));
        }

        if self.customer.email.trim().is_empty() {
            return Err(ValidationError::empty_field("customer.email"));
        }
        if !self.customer.email.contains('@') {
            return Err(ValidationError::invalid_format("customer.email", "missing @"));
        }

        validate_url("redirect_urls.success", &self.redirect_urls.success)?;
        validate_url("redirect_urls.cancel", &self.redirect_urls.cancel)?;
        if let Some(urls) = &self.callback_urls {
            validate_url("callback_urls.success", &urls.success)?;
            validate_url("callback_urls.cancel", &urls.cancel)?;
        }

        for item in &self.items {
            if item.product_code.trim().is_empty() {
                return Err(ValidationError::empty_field("items.product_code"));
            }
            if item.units == 0 {
                return Err(ValidationError::invalid_format("items.units", "must be at least 1"));
            }
            if item.unit_price < 0 {
                return Err(ValidationError::invalid_format(
                    "items.unit_price",
                    "must not be negative",
                ));
            }
        }

        if !self.items.is_empty() {
            match self.items_total() {
                Some(total) if total == self.amount => {}
                Some(total) => {
                    return Err(ValidationError::invalid_format(
                        "amount",
                        format!("items total {} does not match amount {}", total, self.amount),
                    ))
                }
                None => {
                    return Err(ValidationError::invalid_format("amount", "items total overflows"))
                }
            }
        }

        Ok(())
    }
}

/// Validates a merchant reference or stamp.
pub fn validate_reference(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = value.chars().count();
    if len > REFERENCE_MAX_LEN {
        return Err(ValidationError::too_long(field, REFERENCE_MAX_LEN, len));
    }
    if value.chars().any(char::is_control) {
        return Err(ValidationError::invalid_format(field, "contains a control character"));
    }
    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        Ok(_) => Err(ValidationError::invalid_format(field, "must be an absolute http(s) URL")),
        Err(e) => Err(ValidationError::invalid_format(field, e.to_string())),
    }
}
