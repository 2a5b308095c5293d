use std::fmt::Display;

/// Plain-text acknowledgement returned to Dotpay for a URLC notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAck {
    Ok,
    IpError,
    SignatureError,
    IdError,
    PaymentError,
    CurrencyError,
    AmountError,
}

impl CallbackAck {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackAck::Ok => "OK",
            CallbackAck::IpError => "IP ERR",
            CallbackAck::SignatureError => "SIG ERR",
            CallbackAck::IdError => "ID ERR",
            CallbackAck::PaymentError => "PAYMENT ERR",
            CallbackAck::CurrencyError => "CURRENCY ERR",
            CallbackAck::AmountError => "AMOUNT ERR",
        }
    }
}

impl Display for CallbackAck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
