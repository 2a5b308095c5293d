use url::Url;

use super::enums::gateway_methods::GatewayMethod;

/// Where and how the payer is sent to the Dotpay checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayRedirect {
    /// Plain redirect; every parameter is already in the query string.
    Get { url: Url },
    /// Auto-submitted HTML form posting `params` to `url`.
    Post {
        url: Url,
        params: Vec<(String, String)>,
    },
}

impl GatewayRedirect {
    pub fn method(&self) -> GatewayMethod {
        match self {
            GatewayRedirect::Get { .. } => GatewayMethod::Get,
            GatewayRedirect::Post { .. } => GatewayMethod::Post,
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            GatewayRedirect::Get { url } | GatewayRedirect::Post { url, .. } => url,
        }
    }
}

/// Payer details supplied by the shop at checkout time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayerDetails {
    pub email: Option<String>,
    pub lang: Option<String>,
}
