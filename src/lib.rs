use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use log::info;
use reqwest::Client;

use crate::adapters::web::handlers::{
	payments, payments_summary, refresh_payments,
};
use crate::infrastructure::cache::payments_cache::PaymentsCache;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::http::http_payment_source::HttpPaymentSource;
use crate::use_cases::get_payments_summary::GetPaymentsSummaryUseCase;
use crate::use_cases::list_payments::ListPaymentsUseCase;
use crate::use_cases::refresh_payments::RefreshPaymentsUseCase;

pub mod adapters {
	pub mod web {
		pub mod errors;
		pub mod handlers;
		pub mod schema;
	}
}

pub mod domain {
	pub mod payment;
	pub mod payment_source;
	pub mod payments_payload;
	pub mod period;
}

pub mod infrastructure {
	pub mod cache {
		pub mod payments_cache;
	}
	pub mod config {
		pub mod settings;
	}
	pub mod http {
		pub mod http_payment_source;
	}
}

pub mod use_cases {
	pub mod dto;
	pub mod get_payments_summary;
	pub mod list_payments;
	pub mod refresh_payments;
}

/// Owns the payments cache for the lifetime of the HTTP server: built on
/// startup, primed with a first fetch, cleared once the server stops.
pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	let _ = env_logger::try_init();

	let http_client = Client::builder()
		.timeout(config.request_timeout())
		.build()
		.map_err(std::io::Error::other)?;

	let payment_source = HttpPaymentSource::new(
		http_client,
		&config.payments_api_url,
		config.api_token.clone(),
		config.breaker_cooldown(),
	);
	info!("Reading payments from {}", payment_source.payments_url());

	let cache = PaymentsCache::new(Arc::new(payment_source), config.cache_ttl());

	let list_payments_use_case = ListPaymentsUseCase::new(cache.clone());
	let get_payments_summary_use_case =
		GetPaymentsSummaryUseCase::new(cache.clone());
	let refresh_payments_use_case = RefreshPaymentsUseCase::new(cache.clone());

	info!(
		"Starting Actix-Web server on {}:{}...",
		config.bind_address, config.port
	);
	let server = HttpServer::new(move || {
		App::new()
			.app_data(web::Data::new(list_payments_use_case.clone()))
			.app_data(web::Data::new(get_payments_summary_use_case.clone()))
			.app_data(web::Data::new(refresh_payments_use_case.clone()))
			.service(payments)
			.service(payments_summary)
			.service(refresh_payments)
	})
	.keep_alive(config.server_keepalive())
	.bind((config.bind_address.as_str(), config.port))?
	.run();

	info!("Priming payments cache (ttl {:?})", cache.ttl());
	cache.refresh();

	let result = server.await;

	cache.clear();
	info!("Payments cache cleared, server stopped");
	result
}
