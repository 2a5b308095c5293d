pub mod callback_acks;
pub mod dotpay_operation_statuses;
pub mod gateway_methods;
pub mod payment_statuses;
