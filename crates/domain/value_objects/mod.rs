pub mod dotpay_callback;
pub mod enums;
pub mod gateway_redirect;
