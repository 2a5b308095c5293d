use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Form, Router,
    extract::{ConnectInfo, Path, Query, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use crates::domain::{
    repositories::payments::PaymentRepository,
    value_objects::{
        dotpay_callback::DotpayCallback,
        gateway_redirect::{GatewayRedirect, PayerDetails},
    },
};
use serde::Deserialize;
use tracing::{error, warn};
use url::Url;
use uuid::Uuid;

use crate::{
    axum_http::error_responses::AppError,
    usecases::dotpay::{DotpayError, DotpayUseCase},
};

pub fn routes<P>(usecase: Arc<DotpayUseCase<P>>) -> Router
where
    P: PaymentRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/online", post(online::<P>))
        .route("/checkout/:payment_id", get(checkout::<P>))
        .route(
            "/return/:payment_id",
            get(return_from_gateway::<P>).post(return_from_gateway::<P>),
        )
        .with_state(usecase)
}

/// URLC endpoint: Dotpay posts every operation status change here.
pub async fn online<P>(
    State(usecase): State<Arc<DotpayUseCase<P>>>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response
where
    P: PaymentRepository + Send + Sync + 'static,
{
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!(error = %rejection, "dotpay: undecodable online request");
            return (StatusCode::BAD_REQUEST, "MALFORMED").into_response();
        }
    };

    let callback = match DotpayCallback::from_form(&form) {
        Ok(callback) => callback,
        Err(err) => {
            warn!(error = %err, form = ?form, "dotpay: malformed online request");
            return (StatusCode::BAD_REQUEST, "MALFORMED").into_response();
        }
    };

    match usecase.handle_online(callback, remote_addr.ip()).await {
        Ok(ack) => (StatusCode::OK, ack.as_str()).into_response(),
        Err(err) => map_error("online", err),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutQuery {
    pub email: Option<String>,
    pub lang: Option<String>,
}

pub async fn checkout<P>(
    State(usecase): State<Arc<DotpayUseCase<P>>>,
    Path(payment_id): Path<Uuid>,
    Query(query): Query<CheckoutQuery>,
) -> Response
where
    P: PaymentRepository + Send + Sync + 'static,
{
    let payer = PayerDetails {
        email: query.email,
        lang: query.lang,
    };

    match usecase.checkout(payment_id, payer).await {
        Ok(GatewayRedirect::Get { url }) => Redirect::to(url.as_str()).into_response(),
        Ok(GatewayRedirect::Post { url, params }) => {
            Html(auto_submit_form(&url, &params)).into_response()
        }
        Err(err) => map_error("checkout", err),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReturnParams {
    pub status: Option<String>,
}

/// Browser return URL. GET reads `status` from the query, POST from the form body.
pub async fn return_from_gateway<P>(
    State(usecase): State<Arc<DotpayUseCase<P>>>,
    Path(payment_id): Path<Uuid>,
    Form(params): Form<ReturnParams>,
) -> Response
where
    P: PaymentRepository + Send + Sync + 'static,
{
    match usecase
        .resolve_return(payment_id, params.status.as_deref())
        .await
    {
        Ok(location) => Redirect::to(&location).into_response(),
        Err(err) => map_error("return", err),
    }
}

fn map_error(label: &str, err: DotpayError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        error!(status = status.as_u16(), error = %err, "dotpay: {} request failed", label);
    } else {
        warn!(status = status.as_u16(), error = %err, "dotpay: {} request rejected", label);
    }
    AppError::from(err).into_response()
}

fn auto_submit_form(url: &Url, params: &[(String, String)]) -> String {
    let inputs: String = params
        .iter()
        .map(|(name, value)| {
            format!(
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                escape_html(name),
                escape_html(value)
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html>\n<body onload=\"document.forms[0].submit()\">\n\
         <form action=\"{}\" method=\"post\">\n{}\
         <noscript><button type=\"submit\">Continue to Dotpay</button></noscript>\n\
         </form>\n</body>\n</html>\n",
        escape_html(url.as_str()),
        inputs
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
