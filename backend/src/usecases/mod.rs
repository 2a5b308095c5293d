pub mod dotpay;
