pub mod dotpay_gateway;
pub mod dotpay_signature;
