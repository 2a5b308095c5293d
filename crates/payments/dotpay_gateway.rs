use std::net::IpAddr;

use anyhow::Result;
use bigdecimal::RoundingMode;
use url::Url;
use uuid::Uuid;

use crate::domain::{
    entities::payments::PaymentEntity,
    value_objects::{
        dotpay_callback::DotpayCallback,
        enums::gateway_methods::GatewayMethod,
        gateway_redirect::{GatewayRedirect, PayerDetails},
    },
};

use super::dotpay_signature;

pub const BACKEND_NAME: &str = "getpaid.backends.dotpay";
pub const DEFAULT_GATEWAY_URL: &str = "https://ssl.dotpay.pl/t2/";
pub const DEFAULT_ALLOWED_IP: &str = "195.150.9.37";
pub const ACCEPTED_CURRENCIES: [&str; 9] = [
    "PLN", "EUR", "USD", "GBP", "JPY", "CZK", "SEK", "UAH", "RON",
];
pub const ACCEPTED_LANGS: [&str; 10] = ["pl", "en", "de", "it", "fr", "es", "cs", "ru", "hu", "ro"];

pub const ONLINE_PATH: &str = "/getpaid/dotpay/online";
pub const RETURN_PATH: &str = "/getpaid/dotpay/return";

/// Per-deployment Dotpay account settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct DotpaySettings {
    pub merchant_id: i64,
    pub pin: String,
    /// Source addresses allowed to send URLC notifications; empty allows all.
    pub allowed_ips: Vec<IpAddr>,
    pub gateway_url: Url,
    pub lang: Option<String>,
    pub method: GatewayMethod,
    pub onlinetransfer: bool,
    pub p_email: Option<String>,
    pub p_info: Option<String>,
    pub tax: bool,
    pub force_ssl: bool,
    /// Public host name used in the URL and URLC callback addresses.
    pub site_domain: String,
}

pub struct DotpayGateway {
    settings: DotpaySettings,
}

impl DotpayGateway {
    pub fn new(settings: DotpaySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DotpaySettings {
        &self.settings
    }

    pub fn is_allowed_ip(&self, ip: IpAddr) -> bool {
        self.settings.allowed_ips.is_empty() || self.settings.allowed_ips.contains(&ip)
    }

    pub fn verify_signature(&self, callback: &DotpayCallback) -> bool {
        dotpay_signature::verify(callback, &self.settings.pin)
    }

    pub fn online_url(&self) -> String {
        format!("{}://{}{}", self.scheme(), self.settings.site_domain, ONLINE_PATH)
    }

    pub fn return_url(&self, payment_id: Uuid) -> String {
        format!(
            "{}://{}{}/{}",
            self.scheme(),
            self.settings.site_domain,
            RETURN_PATH,
            payment_id
        )
    }

    fn scheme(&self) -> &'static str {
        if self.settings.force_ssl { "https" } else { "http" }
    }

    /// Payer language if Dotpay supports it, otherwise the configured one.
    fn resolve_lang(&self, payer_lang: Option<&str>) -> Option<String> {
        [payer_lang, self.settings.lang.as_deref()]
            .into_iter()
            .flatten()
            .map(|lang| lang.trim().to_ascii_lowercase())
            .find(|lang| ACCEPTED_LANGS.contains(&lang.as_str()))
    }

    pub fn redirect_params(
        &self,
        payment: &PaymentEntity,
        payer: &PayerDetails,
    ) -> Vec<(String, String)> {
        let description = payment
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Payment {}", payment.id));

        let mut params: Vec<(String, String)> = vec![
            ("id".into(), self.settings.merchant_id.to_string()),
            ("description".into(), description),
            ("amount".into(), checkout_amount(payment)),
            ("currency".into(), payment.currency.to_uppercase()),
            // 0 shows the "return" button once the payment is finished
            ("type".into(), "0".into()),
            ("control".into(), payment.id.to_string()),
            ("URL".into(), self.return_url(payment.id)),
            ("URLC".into(), self.online_url()),
            ("api_version".into(), "dev".into()),
        ];

        if let Some(email) = payer.email.as_deref().filter(|e| !e.trim().is_empty()) {
            params.push(("email".into(), email.to_string()));
        }
        if let Some(lang) = self.resolve_lang(payer.lang.as_deref()) {
            params.push(("lang".into(), lang));
        }
        if self.settings.onlinetransfer {
            params.push(("onlinetransfer".into(), "1".into()));
        }
        if let Some(p_email) = &self.settings.p_email {
            params.push(("p_email".into(), p_email.clone()));
        }
        if let Some(p_info) = &self.settings.p_info {
            params.push(("p_info".into(), p_info.clone()));
        }
        if self.settings.tax {
            params.push(("tax".into(), "1".into()));
        }

        params
    }

    pub fn build_redirect(
        &self,
        payment: &PaymentEntity,
        payer: &PayerDetails,
    ) -> Result<GatewayRedirect> {
        let currency = payment.currency.to_uppercase();
        if !ACCEPTED_CURRENCIES.contains(&currency.as_str()) {
            anyhow::bail!("currency {} is not accepted by Dotpay", currency);
        }

        let params = self.redirect_params(payment, payer);
        let url = self.settings.gateway_url.clone();

        let redirect = match self.settings.method {
            GatewayMethod::Get => {
                let mut url = url;
                url.query_pairs_mut().extend_pairs(params.iter());
                GatewayRedirect::Get { url }
            }
            GatewayMethod::Post => GatewayRedirect::Post { url, params },
        };

        Ok(redirect)
    }
}

/// The gateway only takes two decimal places. Rounding up keeps the charged
/// amount at or above what is due, so a completed payment settles as paid.
fn checkout_amount(payment: &PaymentEntity) -> String {
    payment
        .amount
        .with_scale_round(2, RoundingMode::Up)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;
    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use std::{collections::HashMap, str::FromStr};

    fn settings(method: GatewayMethod) -> DotpaySettings {
        DotpaySettings {
            merchant_id: 123456,
            pin: "PIN".to_string(),
            allowed_ips: vec![DEFAULT_ALLOWED_IP.parse().unwrap()],
            gateway_url: Url::parse(DEFAULT_GATEWAY_URL).unwrap(),
            lang: None,
            method,
            onlinetransfer: false,
            p_email: None,
            p_info: None,
            tax: false,
            force_ssl: false,
            site_domain: "shop.example.com".to_string(),
        }
    }

    fn payment(currency: &str) -> PaymentEntity {
        PaymentEntity {
            id: Uuid::parse_str("7f0e6f4e-3b5c-4a43-9d4e-1f1e0f2b8a11").unwrap(),
            amount: BigDecimal::from_str("123.4500").unwrap(),
            currency: currency.to_string(),
            status: "new".to_string(),
            backend: BACKEND_NAME.to_string(),
            created_on: Utc::now(),
            paid_on: None,
            amount_paid: BigDecimal::from(0),
            external_id: None,
            description: Some("Order #42".to_string()),
        }
    }

    fn as_map(params: &[(String, String)]) -> HashMap<&str, &str> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn empty_allow_list_accepts_any_address() {
        let mut settings = settings(GatewayMethod::Get);
        let gateway = DotpayGateway::new(settings.clone());
        assert!(gateway.is_allowed_ip(DEFAULT_ALLOWED_IP.parse().unwrap()));
        assert!(!gateway.is_allowed_ip("10.0.0.1".parse().unwrap()));

        settings.allowed_ips.clear();
        let gateway = DotpayGateway::new(settings);
        assert!(gateway.is_allowed_ip("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn callback_urls_follow_force_ssl() {
        let gateway = DotpayGateway::new(settings(GatewayMethod::Get));
        assert_eq!(gateway.online_url(), "http://shop.example.com/getpaid/dotpay/online");

        let mut secure = settings(GatewayMethod::Get);
        secure.force_ssl = true;
        let gateway = DotpayGateway::new(secure);
        assert_eq!(
            gateway.return_url(payment("PLN").id),
            "https://shop.example.com/getpaid/dotpay/return/7f0e6f4e-3b5c-4a43-9d4e-1f1e0f2b8a11"
        );
    }

    #[test]
    fn builds_base_parameters() {
        let gateway = DotpayGateway::new(settings(GatewayMethod::Post));
        let params = gateway.redirect_params(&payment("pln"), &PayerDetails::default());
        let map = as_map(&params);

        assert_eq!(map["id"], "123456");
        assert_eq!(map["description"], "Order #42");
        assert_eq!(map["amount"], "123.45");
        assert_eq!(map["currency"], "PLN");
        assert_eq!(map["type"], "0");
        assert_eq!(map["control"], "7f0e6f4e-3b5c-4a43-9d4e-1f1e0f2b8a11");
        assert_eq!(map["URLC"], "http://shop.example.com/getpaid/dotpay/online");
        assert_eq!(map["api_version"], "dev");
        for optional in ["email", "lang", "onlinetransfer", "p_email", "p_info", "tax"] {
            assert!(!map.contains_key(optional), "{optional} should be absent");
        }
    }

    #[test]
    fn adds_optional_flags_from_settings() {
        let mut settings = settings(GatewayMethod::Post);
        settings.onlinetransfer = true;
        settings.tax = true;
        settings.p_email = Some("shop@example.com".to_string());
        settings.p_info = Some("Example Shop".to_string());
        let gateway = DotpayGateway::new(settings);

        let payer = PayerDetails {
            email: Some("payer@example.com".to_string()),
            lang: None,
        };
        let params = gateway.redirect_params(&payment("PLN"), &payer);
        let map = as_map(&params);

        assert_eq!(map["email"], "payer@example.com");
        assert_eq!(map["onlinetransfer"], "1");
        assert_eq!(map["tax"], "1");
        assert_eq!(map["p_email"], "shop@example.com");
        assert_eq!(map["p_info"], "Example Shop");
    }

    #[test]
    fn prefers_supported_payer_language() {
        let mut settings = settings(GatewayMethod::Post);
        settings.lang = Some("DE".to_string());
        let gateway = DotpayGateway::new(settings);

        let lang_for = |lang: Option<&str>| {
            let payer = PayerDetails {
                email: None,
                lang: lang.map(str::to_string),
            };
            as_map(&gateway.redirect_params(&payment("PLN"), &payer))
                .get("lang")
                .map(|l| l.to_string())
        };

        assert_eq!(lang_for(Some("EN")), Some("en".to_string()));
        assert_eq!(lang_for(Some("xx")), Some("de".to_string()));
        assert_eq!(lang_for(None), Some("de".to_string()));
    }

    #[test]
    fn unsupported_configured_language_is_dropped() {
        let mut settings = settings(GatewayMethod::Post);
        settings.lang = Some("jp".to_string());
        let gateway = DotpayGateway::new(settings);

        let params = gateway.redirect_params(&payment("PLN"), &PayerDetails::default());
        assert!(!as_map(&params).contains_key("lang"));
    }

    #[test]
    fn get_transport_encodes_parameters_in_query() {
        let gateway = DotpayGateway::new(settings(GatewayMethod::Get));
        let redirect = gateway
            .build_redirect(&payment("PLN"), &PayerDetails::default())
            .unwrap();

        assert_eq!(redirect.method(), GatewayMethod::Get);
        let url = redirect.url();
        assert_eq!(url.host_str(), Some("ssl.dotpay.pl"));
        assert_eq!(url.path(), "/t2/");

        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(query["description"], "Order #42");
        assert_eq!(query["amount"], "123.45");
        assert_eq!(
            query["URL"],
            "http://shop.example.com/getpaid/dotpay/return/7f0e6f4e-3b5c-4a43-9d4e-1f1e0f2b8a11"
        );
        assert!(url.as_str().contains("description=Order+%2342"));
    }

    #[test]
    fn post_transport_keeps_bare_gateway_url() {
        let gateway = DotpayGateway::new(settings(GatewayMethod::Post));
        let redirect = gateway
            .build_redirect(&payment("EUR"), &PayerDetails::default())
            .unwrap();

        match redirect {
            GatewayRedirect::Post { url, params } => {
                assert_eq!(url.as_str(), DEFAULT_GATEWAY_URL);
                assert_eq!(as_map(&params)["currency"], "EUR");
            }
            other => panic!("expected POST redirect, got {other:?}"),
        }
    }

    #[test]
    fn sub_cent_amount_is_rounded_up_so_paying_it_settles() {
        let gateway = DotpayGateway::new(settings(GatewayMethod::Post));
        let mut payment = payment("PLN");
        payment.amount = BigDecimal::from_str("10.0090").unwrap();

        let params = gateway.redirect_params(&payment, &PayerDetails::default());
        let sent = as_map(&params)["amount"].to_string();
        assert_eq!(sent, "10.01");

        let paid = BigDecimal::from_str(&sent).unwrap();
        assert_eq!(
            PaymentStatus::from_settlement(&paid, &payment.amount),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn refuses_unsupported_currency() {
        let gateway = DotpayGateway::new(settings(GatewayMethod::Get));
        assert!(
            gateway
                .build_redirect(&payment("CHF"), &PayerDetails::default())
                .is_err()
        );
    }
}
