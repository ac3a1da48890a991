//! CreatePaymentHandler - Creates a payment at the provider.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::payment::{
    PaymentRecord, PaymentRequest, RequestBuilder, ResponseVerifier,
};
use crate::domain::signing::generate_stamp;
use crate::ports::{PaymentStore, PaymentTransport};

use super::CreatePaymentError;

/// Command to create a payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub request: PaymentRequest,
}

/// Verified body of the provider's creation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreated {
    pub transaction_id: String,
    /// Hosted payment page.
    #[serde(default)]
    pub href: Option<String>,
}

/// Result of a successful creation.
#[derive(Debug, Clone)]
pub struct CreatePaymentResult {
    pub record: PaymentRecord,
    pub created: PaymentCreated,
    /// Provider request id, for support cases.
    pub request_id: Option<String>,
}

/// Handler for creating payments.
///
/// Persists a `Created` record before the request leaves the process, so a
/// callback racing the response always finds it. A reference whose record
/// was never bound to a provider transaction may be submitted again.
pub struct CreatePaymentHandler {
    builder: RequestBuilder,
    verifier: ResponseVerifier,
    transport: Arc<dyn PaymentTransport>,
    store: Arc<dyn PaymentStore>,
}

impl CreatePaymentHandler {
    pub fn new(
        builder: RequestBuilder,
        transport: Arc<dyn PaymentTransport>,
        store: Arc<dyn PaymentStore>,
    ) -> Self {
        let verifier = ResponseVerifier::new(builder.credential().clone());
        Self {
            builder,
            verifier,
            transport,
            store,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentCommand,
    ) -> Result<CreatePaymentResult, CreatePaymentError> {
        let mut request = cmd.request;
        if request.stamp.is_none() {
            request.stamp = Some(generate_stamp());
        }

        // 1. Reference must be unused, or left unconfirmed by a failed attempt
        if let Some(existing) = self.store.load(&request.reference).await? {
            if !existing.is_unconfirmed() {
                return Err(CreatePaymentError::DuplicateReference(request.reference));
            }
            tracing::info!(
                merchant_reference = %existing.merchant_reference,
                "Retrying unconfirmed payment creation"
            );
        }

        // 2. Build and sign (validates the request)
        let signed = self.builder.create_payment(&request)?;

        // 3. Persist the initial record
        let record = PaymentRecord::created(&request, Timestamp::now());
        self.store.save(&record).await?;

        // 4. Send and verify
        let response = self.transport.send(signed).await?;
        self.verifier.verify(&response.headers, &response.body)?;
        let request_id = response.request_id().map(str::to_string);

        let created: PaymentCreated = serde_json::from_slice(&response.body)
            .map_err(|e| CreatePaymentError::InvalidResponse(e.to_string()))?;

        // 5. Bind the provider transaction
        let record = record.bind_transaction(created.transaction_id.clone());
        self.store.save(&record).await?;

        tracing::info!(
            merchant_reference = %record.merchant_reference,
            transaction_id = %created.transaction_id,
            amount = record.amount,
            request_id = request_id.as_deref().unwrap_or("-"),
            "Payment created"
        );

        Ok(CreatePaymentResult {
            record,
            created,
            request_id,
        })
    }
}
