use std::fmt::Display;

use super::payment_statuses::PaymentStatus;

/// `operation_status` values reported by Dotpay in the URLC notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotpayOperationStatus {
    New,
    Processing,
    Completed,
    Rejected,
    ProcessingRealizationWaiting,
    ProcessingRealization,
    Unknown(String),
}

impl DotpayOperationStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "new" => DotpayOperationStatus::New,
            "processing" => DotpayOperationStatus::Processing,
            "completed" => DotpayOperationStatus::Completed,
            "rejected" => DotpayOperationStatus::Rejected,
            "processing_realization_waiting" => {
                DotpayOperationStatus::ProcessingRealizationWaiting
            }
            "processing_realization" => DotpayOperationStatus::ProcessingRealization,
            other => DotpayOperationStatus::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DotpayOperationStatus::New => "new",
            DotpayOperationStatus::Processing => "processing",
            DotpayOperationStatus::Completed => "completed",
            DotpayOperationStatus::Rejected => "rejected",
            DotpayOperationStatus::ProcessingRealizationWaiting => {
                "processing_realization_waiting"
            }
            DotpayOperationStatus::ProcessingRealization => "processing_realization",
            DotpayOperationStatus::Unknown(raw) => raw.as_str(),
        }
    }

    /// Internal status this operation status maps to.
    ///
    /// `Completed` maps to `Paid`; the reconciler downgrades it to
    /// `PartiallyPaid` when the reported amount is below the amount due.
    pub fn payment_status(&self) -> PaymentStatus {
        match self {
            DotpayOperationStatus::Completed => PaymentStatus::Paid,
            DotpayOperationStatus::New => PaymentStatus::New,
            DotpayOperationStatus::Processing
            | DotpayOperationStatus::ProcessingRealizationWaiting
            | DotpayOperationStatus::ProcessingRealization => PaymentStatus::InProgress,
            DotpayOperationStatus::Rejected => PaymentStatus::Cancelled,
            DotpayOperationStatus::Unknown(_) => PaymentStatus::Failed,
        }
    }
}

impl Display for DotpayOperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
