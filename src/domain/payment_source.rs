use async_trait::async_trait;
use derive_more::derive::{Display, Error};

use crate::domain::payment::PaymentRecord;

/// Why a payments fetch failed. Cloneable so a single coalesced failure can
/// be handed to every waiter.
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum FetchError {
	#[display("Could not reach the payments backend: {message}")]
	Transport { message: String },
	#[display("Payments backend answered with status {status}.")]
	Status { status: u16 },
	#[display("Payments backend sent an unreadable body: {message}")]
	Decode { message: String },
	#[display("Payments backend is temporarily unavailable.")]
	Unavailable,
}

#[async_trait]
pub trait PaymentSource: Send + Sync + 'static {
	async fn fetch_payments(&self) -> Result<Vec<PaymentRecord>, FetchError>;
}

impl From<Box<dyn std::error::Error + Send + Sync + 'static>> for FetchError {
	fn from(err: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
		FetchError::Transport {
			message: err.to_string(),
		}
	}
}
