//! Property tests for the canonicalizer and the HMAC signer.

use proptest::prelude::*;

use checkout_psp::domain::signing::{
    canonicalize, sign, verify, MerchantCredential, SignableMessage, SignatureAlgorithm,
};

fn field_name() -> impl Strategy<Value = String> {
    "checkout-[a-z0-9-]{1,16}"
}

fn field_value() -> impl Strategy<Value = String> {
    "[ -~]{0,32}"
}

fn fields() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map(field_name(), field_value(), 0..8)
        .prop_map(|m| m.into_iter().collect())
}

fn algorithm() -> impl Strategy<Value = SignatureAlgorithm> {
    prop_oneof![
        Just(SignatureAlgorithm::HmacSha256),
        Just(SignatureAlgorithm::HmacSha512),
    ]
}

fn message(fields: &[(String, String)], body: &[u8]) -> SignableMessage {
    SignableMessage::from_signed_fields(fields.iter().cloned()).with_body(body.to_vec())
}

proptest! {
    #[test]
    fn canonical_form_ignores_insertion_order(
        fields in fields(),
        body in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut reversed = fields.clone();
        reversed.reverse();

        let forward = canonicalize(&message(&fields, &body)).unwrap();
        let backward = canonicalize(&message(&reversed, &body)).unwrap();

        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn signature_verifies(
        secret in "[ -~]{1,64}",
        alg in algorithm(),
        fields in fields(),
        body in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let credential = MerchantCredential::new("375917", secret, alg);
        let canonical = canonicalize(&message(&fields, &body)).unwrap();

        let signature = sign(&credential, &canonical).unwrap();

        prop_assert!(verify(&credential, &canonical, &signature.to_encoded()));
    }

    #[test]
    fn signing_is_deterministic(
        secret in "[ -~]{1,64}",
        alg in algorithm(),
        fields in fields(),
    ) {
        let credential = MerchantCredential::new("375917", secret, alg);
        let canonical = canonicalize(&message(&fields, b"")).unwrap();

        prop_assert_eq!(
            sign(&credential, &canonical).unwrap(),
            sign(&credential, &canonical).unwrap()
        );
    }

    #[test]
    fn any_single_byte_change_breaks_signature(
        secret in "[ -~]{1,64}",
        alg in algorithm(),
        fields in fields(),
        body in prop::collection::vec(any::<u8>(), 1..64),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let credential = MerchantCredential::new("375917", secret, alg);
        let canonical = canonicalize(&message(&fields, &body)).unwrap();
        let signature = sign(&credential, &canonical).unwrap();

        let mut tampered = canonical.clone();
        let i = index.index(tampered.len());
        tampered[i] ^= flip;

        prop_assert!(!verify(&credential, &tampered, &signature.to_encoded()));
    }
}
