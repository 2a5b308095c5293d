use std::collections::HashMap;

/// Fields Dotpay signs in a URLC notification, in signature order.
pub const ONLINE_SIGNATURE_FIELDS: [&str; 29] = [
    "id",
    "operation_number",
    "operation_type",
    "operation_status",
    "operation_amount",
    "operation_currency",
    "operation_withdrawal_amount",
    "operation_commission_amount",
    "is_completed",
    "operation_original_amount",
    "operation_original_currency",
    "operation_datetime",
    "operation_related_number",
    "control",
    "description",
    "email",
    "p_info",
    "p_email",
    "credit_card_issuer_identification_number",
    "credit_card_masked_number",
    "credit_card_expiration_year",
    "credit_card_expiration_month",
    "credit_card_brand_codename",
    "credit_card_brand_code",
    "credit_card_unique_identifier",
    "credit_card_id",
    "channel",
    "channel_country",
    "geoip_country",
];

pub const REQUIRED_FIELDS: [&str; 5] = [
    "id",
    "control",
    "operation_amount",
    "signature",
    "operation_status",
];

const DEFAULT_CURRENCY: &str = "PLN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCallbackField(pub &'static str);

impl std::fmt::Display for MissingCallbackField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "missing required callback field `{}`", self.0)
    }
}

impl std::error::Error for MissingCallbackField {}

/// A URLC notification with every known field present.
///
/// Optional fields missing from the form are stored as empty strings, except
/// `operation_currency` which falls back to `PLN`. Unknown form fields are
/// dropped since they are not covered by the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotpayCallback {
    params: HashMap<String, String>,
}

impl DotpayCallback {
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, MissingCallbackField> {
        let mut params = HashMap::with_capacity(ONLINE_SIGNATURE_FIELDS.len() + 1);

        for field in REQUIRED_FIELDS {
            let value = form.get(field).ok_or(MissingCallbackField(field))?;
            params.insert(field.to_string(), value.clone());
        }

        for field in ONLINE_SIGNATURE_FIELDS {
            if params.contains_key(field) {
                continue;
            }
            let value = match form.get(field) {
                Some(value) => value.clone(),
                None if field == "operation_currency" => DEFAULT_CURRENCY.to_string(),
                None => String::new(),
            };
            params.insert(field.to_string(), value);
        }

        Ok(Self { params })
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn field(&self, name: &str) -> &str {
        self.params.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn id(&self) -> &str {
        self.field("id")
    }

    pub fn control(&self) -> &str {
        self.field("control")
    }

    pub fn signature(&self) -> &str {
        self.field("signature")
    }

    pub fn operation_status(&self) -> &str {
        self.field("operation_status")
    }

    pub fn operation_amount(&self) -> &str {
        self.field("operation_amount")
    }

    pub fn operation_currency(&self) -> &str {
        self.field("operation_currency")
    }

    pub fn operation_commission_amount(&self) -> &str {
        self.field("operation_commission_amount")
    }

    pub fn operation_number(&self) -> &str {
        self.field("operation_number")
    }

    pub fn email(&self) -> &str {
        self.field("email")
    }
}
