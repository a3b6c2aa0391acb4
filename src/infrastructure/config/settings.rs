use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub payments_api_url:      String,
	pub api_token:             Option<String>,
	pub cache_ttl_secs:        u64,
	pub request_timeout_ms:    u64,
	pub breaker_cooldown_secs: u64,
	pub bind_address:          String,
	pub port:                  u16,
	pub server_keepalive:      u64,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.set_default("cache_ttl_secs", 30)?
			.set_default("request_timeout_ms", 5000)?
			.set_default("breaker_cooldown_secs", 30)?
			.set_default("bind_address", "0.0.0.0")?
			.set_default("port", 9999)?
			.set_default("server_keepalive", 75)?
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		config_builder.try_deserialize()
	}

	pub fn cache_ttl(&self) -> Duration {
		Duration::from_secs(self.cache_ttl_secs)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}

	pub fn breaker_cooldown(&self) -> Duration {
		Duration::from_secs(self.breaker_cooldown_secs)
	}

	pub fn server_keepalive(&self) -> Duration {
		Duration::from_secs(self.server_keepalive)
	}
}

#[cfg(test)]
mod tests {
	use std::env;

	use super::*;

	const VARS: [&str; 8] = [
		"APP_PAYMENTS_API_URL",
		"APP_API_TOKEN",
		"APP_CACHE_TTL_SECS",
		"APP_REQUEST_TIMEOUT_MS",
		"APP_BREAKER_COOLDOWN_SECS",
		"APP_BIND_ADDRESS",
		"APP_PORT",
		"APP_SERVER_KEEPALIVE",
	];

	fn clear_vars() {
		for var in VARS {
			unsafe { env::remove_var(var) };
		}
	}

	// Single test so the phases do not race each other on the environment.
	#[test]
	fn test_config_load() {
		clear_vars();
		assert!(Config::load().is_err());

		unsafe {
			env::set_var("APP_PAYMENTS_API_URL", "http://backend.test/api");
		}

		let config = Config::load().expect("Failed to load config in test");

		assert_eq!(config.payments_api_url, "http://backend.test/api");
		assert_eq!(config.api_token, None);
		assert_eq!(config.cache_ttl(), Duration::from_secs(30));
		assert_eq!(config.request_timeout(), Duration::from_millis(5000));
		assert_eq!(config.breaker_cooldown(), Duration::from_secs(30));
		assert_eq!(config.bind_address, "0.0.0.0");
		assert_eq!(config.port, 9999);
		assert_eq!(config.server_keepalive(), Duration::from_secs(75));

		unsafe {
			env::set_var("APP_API_TOKEN", "secret-token");
			env::set_var("APP_CACHE_TTL_SECS", "5");
			env::set_var("APP_REQUEST_TIMEOUT_MS", "250");
			env::set_var("APP_BREAKER_COOLDOWN_SECS", "10");
			env::set_var("APP_BIND_ADDRESS", "127.0.0.1");
			env::set_var("APP_PORT", "8080");
			env::set_var("APP_SERVER_KEEPALIVE", "120");
		}

		let config = Config::load().expect("Failed to load config in test");

		assert_eq!(config.api_token, Some("secret-token".to_string()));
		assert_eq!(config.cache_ttl(), Duration::from_secs(5));
		assert_eq!(config.request_timeout(), Duration::from_millis(250));
		assert_eq!(config.breaker_cooldown(), Duration::from_secs(10));
		assert_eq!(config.bind_address, "127.0.0.1");
		assert_eq!(config.port, 8080);
		assert_eq!(config.server_keepalive, 120);

		clear_vars();
	}
}
