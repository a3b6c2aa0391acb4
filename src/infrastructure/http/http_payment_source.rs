use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use circuitbreaker_rs::{BreakerError, CircuitBreaker, DefaultPolicy};
use log::{error, warn};
use reqwest::Client;

use crate::domain::payment::PaymentRecord;
use crate::domain::payment_source::{FetchError, PaymentSource};
use crate::domain::payments_payload::decode_payments;

/// Reads the payments list from the dashboard backend over HTTP.
///
/// Requests go through a circuit breaker so an unreachable backend is left
/// alone for the cooldown instead of being called on every cache miss.
#[derive(Clone)]
pub struct HttpPaymentSource {
	http_client:  Client,
	payments_url: String,
	api_token:    Option<String>,
	breaker:      CircuitBreaker<DefaultPolicy, FetchError>,
}

impl HttpPaymentSource {
	pub fn new(
		http_client: Client,
		base_url: &str,
		api_token: Option<String>,
		breaker_cooldown: Duration,
	) -> Self {
		Self {
			http_client,
			payments_url: format!("{}/payments", base_url.trim_end_matches('/')),
			api_token,
			breaker: CircuitBreaker::<DefaultPolicy, FetchError>::builder()
				.failure_threshold(0.5)
				.cooldown(breaker_cooldown)
				.build(),
		}
	}

	pub fn payments_url(&self) -> &str {
		&self.payments_url
	}

	async fn request_payments(&self) -> Result<Vec<PaymentRecord>, FetchError> {
		let mut request = self.http_client.get(&self.payments_url);
		if let Some(token) = &self.api_token {
			request = request.bearer_auth(token);
		}

		let resp = request
			.send()
			.await
			.map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)?;

		let status = resp.status();
		if !status.is_success() {
			error!(
				"Payments backend {} answered with status {status}",
				self.payments_url
			);
			return Err(FetchError::Status {
				status: status.as_u16(),
			});
		}

		let body = resp
			.bytes()
			.await
			.map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)?;

		decode_payments(&body)
	}
}

#[async_trait]
impl PaymentSource for HttpPaymentSource {
	async fn fetch_payments(&self) -> Result<Vec<PaymentRecord>, FetchError> {
		let result: Result<Vec<PaymentRecord>, BreakerError<FetchError>> = self
			.breaker
			.call_async(|| async { self.request_payments().await })
			.await;

		match result {
			Ok(records) => Ok(records),
			Err(BreakerError::Open) => {
				warn!("Payments backend circuit is open, skipping the request");
				Err(FetchError::Unavailable)
			}
			Err(BreakerError::Operation(e)) => Err(e),
			Err(e) => {
				error!("Payments request failed: {e}");
				Err(FetchError::Transport {
					message: e.to_string(),
				})
			}
		}
	}
}
