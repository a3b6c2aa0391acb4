use std::collections::BTreeMap;

use crate::domain::period::{PeriodError, resolve};
use crate::infrastructure::cache::payments_cache::PaymentsCache;
use crate::use_cases::dto::{PaymentsQuery, PaymentsSummaryResult, StatusTotals};

const UNKNOWN_STATUS: &str = "unknown";

#[derive(Clone)]
pub struct GetPaymentsSummaryUseCase {
	cache: PaymentsCache,
}

impl GetPaymentsSummaryUseCase {
	pub fn new(cache: PaymentsCache) -> Self {
		Self { cache }
	}

	pub fn execute(
		&self,
		query: PaymentsQuery,
	) -> Result<PaymentsSummaryResult, PeriodError> {
		let range = resolve(&query.selection, query.now)?;
		let view = self.cache.get_payments();

		let mut total_count = 0;
		let mut total_amount = 0.0;
		let mut by_status: BTreeMap<String, StatusTotals> = BTreeMap::new();

		for payment in view.within(&range) {
			total_count += 1;
			total_amount += payment.amount;

			let status = match payment.status.trim() {
				"" => UNKNOWN_STATUS.to_string(),
				status => status.to_lowercase(),
			};
			let totals = by_status.entry(status).or_default();
			totals.count += 1;
			totals.amount += payment.amount;
		}

		Ok(PaymentsSummaryResult {
			range,
			total_count,
			total_amount,
			by_status,
			is_loading: view.is_loading,
			has_error: view.has_error,
		})
	}
}
