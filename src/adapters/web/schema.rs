use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::period::PeriodSelection;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
	Today,
	Week,
	Month,
	Year,
	Custom,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PeriodFilter {
	pub period: Option<PeriodKind>,
	pub from:   Option<NaiveDate>,
	pub to:     Option<NaiveDate>,
}

impl PeriodFilter {
	/// Without an explicit period, bounds select a custom range and no
	/// bounds select the current month. Bounds are ignored for named periods.
	pub fn selection(&self) -> PeriodSelection {
		let kind = self.period.unwrap_or(if self.from.is_some() || self.to.is_some() {
			PeriodKind::Custom
		} else {
			PeriodKind::Month
		});

		match kind {
			PeriodKind::Today => PeriodSelection::Today,
			PeriodKind::Week => PeriodSelection::Week,
			PeriodKind::Month => PeriodSelection::Month,
			PeriodKind::Year => PeriodSelection::Year,
			PeriodKind::Custom => PeriodSelection::Custom {
				from: self.from,
				to:   self.to,
			},
		}
	}
}
