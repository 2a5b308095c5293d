use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::payments;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub amount: BigDecimal,
    pub currency: String,
    pub status: String,
    pub backend: String,
    pub created_on: DateTime<Utc>,
    pub paid_on: Option<DateTime<Utc>>,
    pub amount_paid: BigDecimal,
    pub external_id: Option<String>,
    pub description: Option<String>,
}

/// Columns touched when a verified Dotpay callback is reconciled.
///
/// `None` leaves the stored value as it is, so a callback that does not settle
/// the payment keeps the previous `amount_paid` and `paid_on`.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = payments)]
pub struct PaymentCallbackUpdateEntity {
    pub status: String,
    pub amount_paid: Option<BigDecimal>,
    pub paid_on: Option<DateTime<Utc>>,
    pub external_id: Option<String>,
    pub description: Option<String>,
}
