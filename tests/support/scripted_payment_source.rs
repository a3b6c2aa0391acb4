use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use payments_dashboard::domain::payment::PaymentRecord;
use payments_dashboard::domain::payment_source::{FetchError, PaymentSource};
use tokio::time::sleep;

/// Answers fetches from a queue of outcomes, then with empty lists.
pub struct ScriptedPaymentSource {
	calls:  AtomicUsize,
	delay:  Duration,
	script: Mutex<VecDeque<Result<Vec<PaymentRecord>, FetchError>>>,
}

impl ScriptedPaymentSource {
	pub fn new(delay: Duration) -> Self {
		Self {
			calls: AtomicUsize::new(0),
			delay,
			script: Mutex::new(VecDeque::new()),
		}
	}

	pub fn returning(self, records: Vec<PaymentRecord>) -> Self {
		self.script.lock().unwrap().push_back(Ok(records));
		self
	}

	pub fn failing(self, error: FetchError) -> Self {
		self.script.lock().unwrap().push_back(Err(error));
		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl PaymentSource for ScriptedPaymentSource {
	async fn fetch_payments(&self) -> Result<Vec<PaymentRecord>, FetchError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		let outcome = self
			.script
			.lock()
			.unwrap()
			.pop_front()
			.unwrap_or_else(|| Ok(Vec::new()));
		sleep(self.delay).await;
		outcome
	}
}

pub fn payment(id: i64, status: &str, date: &str, amount: f64) -> PaymentRecord {
	PaymentRecord {
		id,
		status: status.to_string(),
		payment_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
		created_at: None,
		amount,
		description: None,
		category: None,
		service: None,
		department: None,
		contractor: None,
		legal_entity: None,
		payment_type: None,
	}
}
