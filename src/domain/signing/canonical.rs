//! Canonical byte form of a signed message.
//!
//! The provider signs over every `checkout-*` field of a request, response
//! or callback plus the body:
//!
//! ```text
//! checkout-account:375917
//! checkout-algorithm:sha256
//! checkout-method:POST
//! {"stamp":"..."}
//! ```
//!
//! Fields are sorted byte-wise by name before rendering. The sort is an
//! explicit step so the output never depends on how the fields were
//! collected.

use super::SigningError;

/// Prefix shared by every field that participates in a signature.
pub const SIGNED_FIELD_PREFIX: &str = "checkout-";

/// Name of the header or query parameter carrying the signature itself.
pub const SIGNATURE_FIELD: &str = "signature";

/// A set of named string fields plus an optional raw body.
///
/// Field names are case-insensitive on the wire and stored lower-cased.
/// Inserting a name that is already present replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignableMessage {
    fields: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl SignableMessage {
    /// Creates an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a message from arbitrary name/value pairs, keeping only the
    /// `checkout-*` fields.
    pub fn from_signed_fields<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut message = Self::new();
        for (name, value) in pairs {
            if is_signed_field(name.as_ref()) {
                message.insert(name.as_ref(), value);
            }
        }
        message
    }

    /// Sets a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Attaches the raw body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Looks up a field by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Returns true for names that take part in the signature.
pub fn is_signed_field(name: &str) -> bool {
    let prefix = SIGNED_FIELD_PREFIX.as_bytes();
    name.len() > prefix.len() && name.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Serializes a message into the bytes the MAC is computed over.
///
/// Each field becomes `name:value` followed by `\n`; the body (possibly
/// empty) follows the last field.
///
/// # Errors
///
/// `SigningError::EncodingError` when a name is not a lower-case header
/// token or a value contains a control character.
pub fn canonicalize(message: &SignableMessage) -> Result<Vec<u8>, SigningError> {
    let mut fields: Vec<&(String, String)> = message.fields.iter().collect();
    fields.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut out = Vec::new();
    for (name, value) in fields {
        validate_name(name)?;
        validate_value(name, value)?;
        out.extend_from_slice(name.as_bytes());
        out.push(b':');
        out.extend_from_slice(value.as_bytes());
        out.push(b'\n');
    }
    if let Some(body) = &message.body {
        out.extend_from_slice(body);
    }
    Ok(out)
}

fn validate_name(name: &str) -> Result<(), SigningError> {
    if name.is_empty() {
        return Err(SigningError::encoding(name, "empty field name"));
    }
    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
    {
        return Err(SigningError::encoding(name, "field name is not a header token"));
    }
    Ok(())
}

fn validate_value(name: &str, value: &str) -> Result<(), SigningError> {
    if value.chars().any(char::is_control) {
        return Err(SigningError::encoding(name, "value contains a control character"));
    }
    Ok(())
}
