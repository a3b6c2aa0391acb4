use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::domain::payment::PaymentRecord;
use crate::domain::period::{PeriodRange, PeriodSelection};

#[derive(Debug, Clone, Copy)]
pub struct PaymentsQuery {
	pub selection: PeriodSelection,
	pub now:       NaiveDateTime,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsForPeriod {
	#[serde(flatten)]
	pub range:      PeriodRange,
	pub payments:   Vec<PaymentRecord>,
	pub is_loading: bool,
	pub has_error:  bool,
	pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct StatusTotals {
	pub count:  usize,
	pub amount: f64,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsSummaryResult {
	#[serde(flatten)]
	pub range:        PeriodRange,
	pub total_count:  usize,
	pub total_amount: f64,
	pub by_status:    BTreeMap<String, StatusTotals>,
	pub is_loading:   bool,
	pub has_error:    bool,
}
