use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::{debug, info, warn};
use tokio::time::Instant;

use crate::domain::payment::PaymentRecord;
use crate::domain::payment_source::{FetchError, PaymentSource};
use crate::domain::period::PeriodRange;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

type InFlightFetch = Shared<BoxFuture<'static, PaymentsView>>;

/// What a consumer sees of the cache at a given moment.
#[derive(Debug, Clone)]
pub struct PaymentsView {
	pub records:    Arc<Vec<PaymentRecord>>,
	pub is_loading: bool,
	pub has_error:  bool,
	pub fetched_at: Option<DateTime<Utc>>,
}

impl PaymentsView {
	pub fn within<'a>(
		&'a self,
		range: &'a PeriodRange,
	) -> impl Iterator<Item = &'a PaymentRecord> + 'a {
		self.records.iter().filter(|record| record.falls_within(range))
	}
}

struct CacheSnapshot {
	records:    Arc<Vec<PaymentRecord>>,
	loaded_at:  Instant,
	fetched_at: DateTime<Utc>,
}

#[derive(Default)]
struct CacheState {
	snapshot:          Option<CacheSnapshot>,
	invalidated:       bool,
	has_error:         bool,
	in_flight:         Option<InFlightFetch>,
	// Set by a refresh that arrived while a fetch was already running.
	refetch_requested: bool,
}

impl CacheState {
	fn is_fresh(&self, ttl: Duration) -> bool {
		!self.invalidated &&
			self.snapshot
				.as_ref()
				.is_some_and(|snapshot| snapshot.loaded_at.elapsed() < ttl)
	}

	fn view(&self) -> PaymentsView {
		PaymentsView {
			records:    self
				.snapshot
				.as_ref()
				.map(|snapshot| Arc::clone(&snapshot.records))
				.unwrap_or_default(),
			is_loading: self.in_flight.is_some(),
			has_error:  self.has_error,
			fetched_at: self.snapshot.as_ref().map(|snapshot| snapshot.fetched_at),
		}
	}
}

struct Inner {
	source: Arc<dyn PaymentSource>,
	ttl:    Duration,
	state:  Mutex<CacheState>,
}

impl Inner {
	fn lock_state(&self) -> MutexGuard<'_, CacheState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn apply(
		self: &Arc<Self>,
		result: Result<Vec<PaymentRecord>, FetchError>,
	) -> PaymentsView {
		let mut state = self.lock_state();
		state.in_flight = None;

		match result {
			Ok(records) => {
				info!("Payments cache loaded {} records", records.len());
				state.snapshot = Some(CacheSnapshot {
					records:    Arc::new(records),
					loaded_at:  Instant::now(),
					fetched_at: Utc::now(),
				});
				state.invalidated = false;
				state.has_error = false;
			}
			Err(e) => {
				warn!("Payments fetch failed, keeping the last loaded snapshot: {e}");
				state.has_error = true;
			}
		}

		// The outcome predates the refresh, so it must not count as fresh.
		if state.refetch_requested {
			state.refetch_requested = false;
			state.invalidated = true;
			let _ = self.start_fetch(&mut state);
		}

		state.view()
	}

	fn start_fetch(self: &Arc<Self>, state: &mut CacheState) -> InFlightFetch {
		debug!("Fetching payments from the backend");
		let inner = Arc::clone(self);
		let fetch = async move {
			let result = AssertUnwindSafe(inner.source.fetch_payments())
				.catch_unwind()
				.await
				.unwrap_or_else(|_| {
					Err(FetchError::Transport {
						message: "payment source panicked".to_string(),
					})
				});
			inner.apply(result)
		}
		.boxed()
		.shared();

		state.in_flight = Some(fetch.clone());
		// Completes the fetch even when nobody awaits it.
		tokio::spawn(fetch.clone());
		fetch
	}
}

/// Process-wide cache of the payments list.
///
/// A snapshot is served as is while it is younger than the TTL and has not
/// been invalidated. At most one fetch runs at a time; every consumer that
/// asks while it runs shares its outcome. A failed fetch keeps the previous
/// snapshot and raises the error flag until the next successful one.
#[derive(Clone)]
pub struct PaymentsCache {
	inner: Arc<Inner>,
}

impl PaymentsCache {
	pub fn new(source: Arc<dyn PaymentSource>, ttl: Duration) -> Self {
		Self {
			inner: Arc::new(Inner {
				source,
				ttl,
				state: Mutex::new(CacheState::default()),
			}),
		}
	}

	pub fn ttl(&self) -> Duration {
		self.inner.ttl
	}

	/// Current view without waiting. Starts a background fetch when the
	/// snapshot is missing, stale or invalidated and none is running.
	pub fn get_payments(&self) -> PaymentsView {
		let mut state = self.inner.lock_state();
		if state.in_flight.is_none() && !state.is_fresh(self.inner.ttl) {
			let _ = self.inner.start_fetch(&mut state);
		}
		state.view()
	}

	/// Invalidates the snapshot and reloads it regardless of its age, without
	/// waiting. A refresh during a running fetch queues exactly one more fetch
	/// behind it; further refreshes before that one starts are folded into it.
	pub fn refresh(&self) {
		let mut state = self.inner.lock_state();
		state.invalidated = true;
		if state.in_flight.is_none() {
			let _ = self.inner.start_fetch(&mut state);
		} else {
			debug!("Payments refresh queued behind the fetch in flight");
			state.refetch_requested = true;
		}
	}

	/// Waits for a usable view, starting or joining a fetch unless the
	/// snapshot is fresh. Also waits out a fetch queued by a refresh.
	pub async fn load(&self) -> PaymentsView {
		loop {
			let pending = {
				let mut state = self.inner.lock_state();
				if state.is_fresh(self.inner.ttl) {
					return state.view();
				}
				match &state.in_flight {
					Some(fetch) => {
						debug!("Joining the payments fetch already in flight");
						fetch.clone()
					}
					None => self.inner.start_fetch(&mut state),
				}
			};

			let view = pending.await;
			if !view.is_loading {
				return view;
			}
		}
	}

	/// Refreshes and waits for the outcome.
	pub async fn reload(&self) -> PaymentsView {
		self.refresh();
		self.load().await
	}

	/// Drops the snapshot and the error flag. A fetch still in flight applies
	/// its outcome when it completes.
	pub fn clear(&self) {
		let mut state = self.inner.lock_state();
		state.snapshot = None;
		state.invalidated = false;
		state.has_error = false;
	}

}
