use std::net::IpAddr;

use anyhow::{Context, Result, anyhow};
use crates::{
    domain::value_objects::enums::gateway_methods::GatewayMethod,
    payments::dotpay_gateway::{DEFAULT_ALLOWED_IP, DEFAULT_GATEWAY_URL, DotpaySettings},
};
use url::Url;

use super::config_model::{BackendServer, Database, DotEnvyConfig, LandingPages};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

/// Builds the configuration from any key lookup; `load` reads the process environment.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("{} is invalid", key))
    };
    let optional = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let flag = |key: &str| -> Result<bool> {
        match optional(key) {
            Some(raw) => parse_bool(&raw).with_context(|| format!("{} is invalid", key)),
            None => Ok(false),
        }
    };

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?
            .parse()
            .context("SERVER_PORT_BACKEND is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    // Unset keeps Dotpay's published notification address; an empty value allows any source.
    let allowed_ips = match lookup("DOTPAY_ALLOWED_IPS") {
        Some(raw) => parse_ip_list(&raw)?,
        None => vec![DEFAULT_ALLOWED_IP.parse::<IpAddr>()?],
    };

    let method = match optional("DOTPAY_METHOD") {
        Some(raw) => GatewayMethod::from_str(&raw)
            .ok_or_else(|| anyhow!("DOTPAY_METHOD is invalid: Dotpay accepts only GET or POST"))?,
        None => GatewayMethod::default(),
    };

    let dotpay = DotpaySettings {
        merchant_id: required("DOTPAY_ID")?
            .parse()
            .context("DOTPAY_ID is invalid")?,
        pin: required("DOTPAY_PIN")?,
        allowed_ips,
        gateway_url: Url::parse(
            &optional("DOTPAY_GATEWAY_URL").unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
        )
        .context("DOTPAY_GATEWAY_URL is invalid")?,
        lang: optional("DOTPAY_LANG"),
        method,
        onlinetransfer: flag("DOTPAY_ONLINETRANSFER")?,
        p_email: optional("DOTPAY_P_EMAIL"),
        p_info: optional("DOTPAY_P_INFO"),
        tax: flag("DOTPAY_TAX")?,
        force_ssl: flag("DOTPAY_FORCE_SSL")?,
        site_domain: required("SITE_DOMAIN")?,
    };

    let defaults = LandingPages::default();
    let landing_pages = LandingPages {
        success_path: optional("PAYMENT_SUCCESS_PATH").unwrap_or(defaults.success_path),
        failure_path: optional("PAYMENT_FAILURE_PATH").unwrap_or(defaults.failure_path),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        dotpay,
        landing_pages,
    })
}

fn parse_ip_list(raw: &str) -> Result<Vec<IpAddr>> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<IpAddr>()
                .with_context(|| format!("DOTPAY_ALLOWED_IPS contains an invalid address: {}", v))
        })
        .collect()
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(anyhow!("expected a boolean, got {}", other)),
    }
}
