use crate::domain::period::{PeriodError, resolve};
use crate::infrastructure::cache::payments_cache::PaymentsCache;
use crate::use_cases::dto::{PaymentsForPeriod, PaymentsQuery};

#[derive(Clone)]
pub struct ListPaymentsUseCase {
	cache: PaymentsCache,
}

impl ListPaymentsUseCase {
	pub fn new(cache: PaymentsCache) -> Self {
		Self { cache }
	}

	/// Payments of the current snapshot dated within the queried period.
	/// Never waits for the backend: a stale cache reports `is_loading`.
	pub fn execute(
		&self,
		query: PaymentsQuery,
	) -> Result<PaymentsForPeriod, PeriodError> {
		let range = resolve(&query.selection, query.now)?;
		let view = self.cache.get_payments();

		Ok(PaymentsForPeriod {
			range,
			payments: view.within(&range).cloned().collect(),
			is_loading: view.is_loading,
			has_error: view.has_error,
			fetched_at: view.fetched_at,
		})
	}
}
