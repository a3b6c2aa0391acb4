use chrono::{
	Datelike, Days, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime,
};
use derive_more::derive::{Display, Error};
use serde::Serialize;

/// Last representable millisecond of a day, relative to midnight.
const END_OF_DAY_MILLIS: i64 = 86_399_999;

/// Named period a dashboard view is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodSelection {
	Today,
	Week,
	#[default]
	Month,
	Year,
	/// Explicit calendar days. A missing side falls back to the matching
	/// bound of the current calendar month.
	Custom {
		from: Option<NaiveDate>,
		to:   Option<NaiveDate>,
	},
}

/// Closed local-time interval: `from` is 00:00:00.000 of its day and `to`
/// is 23:59:59.999 of its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodRange {
	pub from: NaiveDateTime,
	pub to:   NaiveDateTime,
}

#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum PeriodError {
	#[display("Period starts on {from} which is after its end on {to}.")]
	InvertedRange { from: NaiveDate, to: NaiveDate },
	#[display("Period around {date} falls outside the supported calendar.")]
	OutOfRange { date: NaiveDate },
}

impl PeriodRange {
	/// Spans whole days from `first` through `last`.
	pub fn spanning(first: NaiveDate, last: NaiveDate) -> Result<Self, PeriodError> {
		if first > last {
			return Err(PeriodError::InvertedRange {
				from: first,
				to:   last,
			});
		}

		Ok(Self {
			from: start_of_day(first),
			to:   end_of_day(last),
		})
	}

	pub fn first_day(&self) -> NaiveDate {
		self.from.date()
	}

	pub fn last_day(&self) -> NaiveDate {
		self.to.date()
	}

	pub fn contains(&self, instant: NaiveDateTime) -> bool {
		self.from <= instant && instant <= self.to
	}

	pub fn contains_date(&self, date: NaiveDate) -> bool {
		self.first_day() <= date && date <= self.last_day()
	}
}

/// Resolves `selection` against `now`. Deterministic for a given `now`.
///
/// A custom selection whose start falls after its end is rejected rather
/// than swapped.
pub fn resolve(
	selection: &PeriodSelection,
	now: NaiveDateTime,
) -> Result<PeriodRange, PeriodError> {
	let today = now.date();

	let (first, last) = match *selection {
		PeriodSelection::Today => (today, today),
		PeriodSelection::Week => week_bounds(today)?,
		PeriodSelection::Month => month_bounds(today)?,
		PeriodSelection::Year => year_bounds(today)?,
		PeriodSelection::Custom { from, to } => {
			let (month_first, month_last) = month_bounds(today)?;
			(from.unwrap_or(month_first), to.unwrap_or(month_last))
		}
	};

	PeriodRange::spanning(first, last)
}

/// Resolves `selection` against the local wall clock.
pub fn resolve_now(selection: &PeriodSelection) -> Result<PeriodRange, PeriodError> {
	resolve(selection, Local::now().naive_local())
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
	date.and_time(NaiveTime::MIN)
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
	start_of_day(date) + Duration::milliseconds(END_OF_DAY_MILLIS)
}

type Bounds = Result<(NaiveDate, NaiveDate), PeriodError>;

fn week_bounds(date: NaiveDate) -> Bounds {
	// Sunday is six days after Monday, never the start of a new week.
	let since_monday = u64::from(date.weekday().num_days_from_monday());
	let monday = date.checked_sub_days(Days::new(since_monday));
	let sunday = monday.and_then(|monday| monday.checked_add_days(Days::new(6)));
	monday.zip(sunday).ok_or(PeriodError::OutOfRange { date })
}

fn month_bounds(date: NaiveDate) -> Bounds {
	let first = date.with_day0(0);
	let last = first
		.and_then(|first| first.checked_add_months(Months::new(1)))
		.and_then(|next| next.pred_opt());
	first.zip(last).ok_or(PeriodError::OutOfRange { date })
}

fn year_bounds(date: NaiveDate) -> Bounds {
	let first = date.with_ordinal0(0);
	let last = first
		.and_then(|first| first.checked_add_months(Months::new(12)))
		.and_then(|next| next.pred_opt());
	first.zip(last).ok_or(PeriodError::OutOfRange { date })
}
