use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::domain::value_objects::dotpay_callback::{DotpayCallback, ONLINE_SIGNATURE_FIELDS};

/// SHA-256 of `shared_secret` followed by the values of `fields`, as lowercase hex.
///
/// Fields missing from `values` contribute an empty string.
pub fn compute_digest(
    fields: &[&str],
    values: &HashMap<String, String>,
    shared_secret: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(shared_secret.as_bytes());
    for field in fields {
        if let Some(value) = values.get(*field) {
            hasher.update(value.as_bytes());
        }
    }
    hex::encode(hasher.finalize())
}

/// Checks the `signature` field of a URLC notification.
pub fn verify(callback: &DotpayCallback, shared_secret: &str) -> bool {
    let expected = compute_digest(&ONLINE_SIGNATURE_FIELDS, callback.params(), shared_secret);
    callback.signature() == expected
}
