use std::fmt::Display;

use bigdecimal::BigDecimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    New,
    InProgress,
    AcceptedForProcessing,
    PartiallyPaid,
    Paid,
    Cancelled,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::New => "new",
            PaymentStatus::InProgress => "in_progress",
            PaymentStatus::AcceptedForProcessing => "accepted_for_proc",
            PaymentStatus::PartiallyPaid => "partially_paid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "new" => Some(PaymentStatus::New),
            "in_progress" => Some(PaymentStatus::InProgress),
            "accepted_for_proc" => Some(PaymentStatus::AcceptedForProcessing),
            "partially_paid" => Some(PaymentStatus::PartiallyPaid),
            "paid" => Some(PaymentStatus::Paid),
            "cancelled" => Some(PaymentStatus::Cancelled),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    /// Status for a completed operation: overpayment still counts as paid.
    pub fn from_settlement(amount_paid: &BigDecimal, amount_due: &BigDecimal) -> Self {
        if amount_paid >= amount_due {
            PaymentStatus::Paid
        } else {
            PaymentStatus::PartiallyPaid
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::PartiallyPaid)
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
