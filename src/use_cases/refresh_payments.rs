use log::info;

use crate::infrastructure::cache::payments_cache::PaymentsCache;

#[derive(Clone)]
pub struct RefreshPaymentsUseCase {
	cache: PaymentsCache,
}

impl RefreshPaymentsUseCase {
	pub fn new(cache: PaymentsCache) -> Self {
		Self { cache }
	}

	pub fn execute(&self) {
		info!("Payments refresh requested");
		self.cache.refresh();
	}
}
