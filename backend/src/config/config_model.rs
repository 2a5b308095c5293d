use crates::payments::dotpay_gateway::DotpaySettings;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub dotpay: DotpaySettings,
    pub landing_pages: LandingPages,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

/// Shop pages the payer lands on after returning from Dotpay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingPages {
    pub success_path: String,
    pub failure_path: String,
}

impl Default for LandingPages {
    fn default() -> Self {
        Self {
            success_path: "/getpaid/success".to_string(),
            failure_path: "/getpaid/failure".to_string(),
        }
    }
}
