use std::{net::IpAddr, str::FromStr, sync::Arc};

use bigdecimal::BigDecimal;
use chrono::Utc;
use crates::{
    domain::{
        entities::payments::{PaymentCallbackUpdateEntity, PaymentEntity},
        repositories::payments::PaymentRepository,
        value_objects::{
            dotpay_callback::DotpayCallback,
            enums::{
                callback_acks::CallbackAck, dotpay_operation_statuses::DotpayOperationStatus,
                payment_statuses::PaymentStatus,
            },
            gateway_redirect::{GatewayRedirect, PayerDetails},
        },
    },
    payments::dotpay_gateway::DotpayGateway,
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::config_model::LandingPages;

const EXTERNAL_ID_MAX_LEN: usize = 64;
const DESCRIPTION_MAX_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum DotpayError {
    #[error("payment not found")]
    PaymentNotFound,
    #[error("checkout refused: {0}")]
    CheckoutRefused(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DotpayError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DotpayError::PaymentNotFound => StatusCode::NOT_FOUND,
            DotpayError::CheckoutRefused(_) => StatusCode::BAD_REQUEST,
            DotpayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, DotpayError>;

pub struct DotpayUseCase<P>
where
    P: PaymentRepository + Send + Sync + 'static,
{
    payment_repo: Arc<P>,
    gateway: Arc<DotpayGateway>,
    landing_pages: LandingPages,
}

impl<P> DotpayUseCase<P>
where
    P: PaymentRepository + Send + Sync + 'static,
{
    pub fn new(
        payment_repo: Arc<P>,
        gateway: Arc<DotpayGateway>,
        landing_pages: LandingPages,
    ) -> Self {
        Self {
            payment_repo,
            gateway,
            landing_pages,
        }
    }

    /// Processes a URLC notification and returns the token Dotpay expects in the reply.
    ///
    /// Every rejection is answered with its own token; only storage failures
    /// surface as errors.
    pub async fn handle_online(
        &self,
        callback: DotpayCallback,
        remote_ip: IpAddr,
    ) -> UseCaseResult<CallbackAck> {
        info!(
            %remote_ip,
            control = callback.control(),
            operation_status = callback.operation_status(),
            "dotpay: online notification received"
        );

        if !self.gateway.is_allowed_ip(remote_ip) {
            warn!(%remote_ip, "dotpay: notification from not allowed IP");
            return Ok(CallbackAck::IpError);
        }

        if !self.gateway.verify_signature(&callback) {
            warn!(
                params = ?callback.params(),
                "dotpay: notification with wrong signature"
            );
            return Ok(CallbackAck::SignatureError);
        }

        let merchant_id = self.gateway.settings().merchant_id;
        match callback.id().trim().parse::<i64>() {
            Ok(id) if id == merchant_id => {}
            Ok(id) => {
                warn!(id, merchant_id, "dotpay: notification for another merchant");
                return Ok(CallbackAck::IdError);
            }
            Err(err) => {
                warn!(id = callback.id(), error = %err, "dotpay: malformed merchant id");
                return Ok(CallbackAck::IdError);
            }
        }

        let payment_id = match Uuid::parse_str(callback.control().trim()) {
            Ok(payment_id) => payment_id,
            Err(err) => {
                error!(
                    control = callback.control(),
                    error = %err,
                    "dotpay: notification with malformed payment id"
                );
                return Ok(CallbackAck::PaymentError);
            }
        };

        let payment = match self.find_payment(payment_id).await? {
            Some(payment) => payment,
            None => {
                error!(
                    %payment_id,
                    params = ?callback.params(),
                    "dotpay: notification for non existing payment"
                );
                return Ok(CallbackAck::PaymentError);
            }
        };

        if callback.operation_currency() != payment.currency.to_uppercase() {
            error!(
                %payment_id,
                expected = %payment.currency,
                received = callback.operation_currency(),
                "dotpay: notification with wrong currency"
            );
            return Ok(CallbackAck::CurrencyError);
        }

        self.reconcile(&callback, &payment).await
    }

    /// Maps the reported operation status onto the payment and persists it.
    async fn reconcile(
        &self,
        callback: &DotpayCallback,
        payment: &PaymentEntity,
    ) -> UseCaseResult<CallbackAck> {
        let operation_status = DotpayOperationStatus::parse(callback.operation_status());

        let (status, amount_paid, paid_on) = match &operation_status {
            DotpayOperationStatus::Completed => {
                let amount_paid = match BigDecimal::from_str(callback.operation_amount().trim()) {
                    Ok(amount) => amount,
                    Err(err) => {
                        error!(
                            payment_id = %payment.id,
                            operation_amount = callback.operation_amount(),
                            error = %err,
                            "dotpay: notification with malformed amount value"
                        );
                        return Ok(CallbackAck::AmountError);
                    }
                };

                match BigDecimal::from_str(callback.operation_commission_amount().trim()) {
                    Ok(commission) => info!(
                        payment_id = %payment.id,
                        %commission,
                        "dotpay: commission reported"
                    ),
                    Err(_) => info!(
                        payment_id = %payment.id,
                        "dotpay: no commission amount information in notification"
                    ),
                }

                let status = PaymentStatus::from_settlement(&amount_paid, &payment.amount);
                (status, Some(amount_paid), Some(Utc::now()))
            }
            other => (other.payment_status(), None, None),
        };

        if PaymentStatus::from_str(&payment.status).is_some_and(|previous| previous.is_settled())
            && !status.is_settled()
        {
            warn!(
                payment_id = %payment.id,
                previous = %payment.status,
                next = %status,
                "dotpay: settled payment moved back to an unsettled status"
            );
        }

        let changes = PaymentCallbackUpdateEntity {
            status: status.to_string(),
            amount_paid,
            paid_on,
            external_id: Some(truncate_chars(callback.operation_number(), EXTERNAL_ID_MAX_LEN)),
            description: Some(truncate_chars(callback.email(), DESCRIPTION_MAX_LEN)),
        };

        self.payment_repo
            .apply_callback_update(payment.id, changes)
            .await
            .map_err(|err| {
                error!(
                    payment_id = %payment.id,
                    db_error = ?err,
                    "dotpay: failed to persist payment status"
                );
                DotpayError::Internal(err)
            })?;

        info!(
            payment_id = %payment.id,
            %operation_status,
            %status,
            "dotpay: payment status updated"
        );
        Ok(CallbackAck::Ok)
    }

    /// Builds the redirect that sends the payer to the Dotpay checkout page.
    pub async fn checkout(
        &self,
        payment_id: Uuid,
        payer: PayerDetails,
    ) -> UseCaseResult<GatewayRedirect> {
        let payment = self
            .find_payment(payment_id)
            .await?
            .ok_or(DotpayError::PaymentNotFound)?;

        let redirect = self.gateway.build_redirect(&payment, &payer).map_err(|err| {
            warn!(%payment_id, error = %err, "dotpay: checkout refused");
            DotpayError::CheckoutRefused(err.to_string())
        })?;

        info!(%payment_id, method = %redirect.method(), "dotpay: redirecting payer to gateway");
        Ok(redirect)
    }

    /// Landing page for a payer coming back from Dotpay.
    pub async fn resolve_return(
        &self,
        payment_id: Uuid,
        status: Option<&str>,
    ) -> UseCaseResult<String> {
        self.find_payment(payment_id)
            .await?
            .ok_or(DotpayError::PaymentNotFound)?;

        let base = if status == Some("OK") {
            &self.landing_pages.success_path
        } else {
            &self.landing_pages.failure_path
        };

        Ok(format!("{}/{}", base.trim_end_matches('/'), payment_id))
    }

    async fn find_payment(&self, payment_id: Uuid) -> UseCaseResult<Option<PaymentEntity>> {
        self.payment_repo.find_by_id(payment_id).await.map_err(|err| {
            error!(%payment_id, db_error = ?err, "dotpay: failed to load payment");
            DotpayError::Internal(err)
        })
    }
}

fn truncate_chars(value: &str, max_len: usize) -> String {
    value.chars().take(max_len).collect()
}
