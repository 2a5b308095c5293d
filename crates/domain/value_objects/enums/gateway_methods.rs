use std::fmt::Display;

/// How the payer is sent to the Dotpay checkout page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GatewayMethod {
    #[default]
    Get,
    Post,
}

impl GatewayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMethod::Get => "GET",
            GatewayMethod::Post => "POST",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "get" => Some(GatewayMethod::Get),
            "post" => Some(GatewayMethod::Post),
            _ => None,
        }
    }
}

impl Display for GatewayMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
