use std::collections::HashSet;

use log::warn;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;

use crate::domain::payment::PaymentRecord;
use crate::domain::payment_source::FetchError;

/// Shapes the payments endpoint is known to answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PaymentsPayload {
	List(Vec<Value>),
	Wrapped { payments: Vec<Value> },
	Unrecognized(IgnoredAny),
}

impl PaymentsPayload {
	pub fn parse(body: &[u8]) -> Result<Self, FetchError> {
		serde_json::from_slice(body).map_err(|e| FetchError::Decode {
			message: e.to_string(),
		})
	}

	/// Decodes every entry on its own. Entries that fail validation are
	/// skipped and a repeated id keeps its first occurrence. An unrecognized
	/// shape yields no records.
	pub fn into_records(self) -> Vec<PaymentRecord> {
		let entries = match self {
			PaymentsPayload::List(entries) => entries,
			PaymentsPayload::Wrapped { payments } => payments,
			PaymentsPayload::Unrecognized(_) => {
				warn!("Payments payload has an unrecognized shape, using no records");
				return Vec::new();
			}
		};

		let mut seen = HashSet::with_capacity(entries.len());
		entries
			.into_iter()
			.filter_map(|entry| match serde_json::from_value::<PaymentRecord>(entry) {
				Ok(record) => Some(record),
				Err(e) => {
					warn!("Skipping malformed payment record: {e}");
					None
				}
			})
			.filter(|record| {
				let first = seen.insert(record.id);
				if !first {
					warn!("Skipping duplicate payment record {}", record.id);
				}
				first
			})
			.collect()
	}
}

pub fn decode_payments(body: &[u8]) -> Result<Vec<PaymentRecord>, FetchError> {
	Ok(PaymentsPayload::parse(body)?.into_records())
}
