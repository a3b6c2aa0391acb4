use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::period::PeriodRange;

/// One payment/expense entry as reported by the payments backend.
///
/// Only `id`, `payment_date` and `amount` are required. The backend payload
/// varies per endpoint, so every descriptive or relational field is optional
/// and both snake_case and camelCase spellings are accepted.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentRecord {
	pub id:           i64,
	#[serde(default)]
	pub status:       String,
	#[serde(alias = "paymentDate", deserialize_with = "calendar_date")]
	pub payment_date: NaiveDate,
	#[serde(
		alias = "createdAt",
		deserialize_with = "lenient_timestamp",
		skip_serializing_if = "Option::is_none",
		default
	)]
	pub created_at:   Option<DateTime<Utc>>,
	#[serde(deserialize_with = "number_or_text")]
	pub amount:       f64,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub description:  Option<String>,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub category:     Option<Related>,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub service:      Option<Related>,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub department:   Option<Related>,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub contractor:   Option<Related>,
	#[serde(
		alias = "legalEntity",
		skip_serializing_if = "Option::is_none",
		default
	)]
	pub legal_entity: Option<Related>,
	#[serde(
		alias = "paymentType",
		skip_serializing_if = "Option::is_none",
		default
	)]
	pub payment_type: Option<Related>,
}

impl PaymentRecord {
	pub fn falls_within(&self, range: &PeriodRange) -> bool {
		range.contains_date(self.payment_date)
	}
}

/// A reference to another backend entity, sent either as a bare id, a plain
/// name, or an embedded `{id, name}` object.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Related {
	Id(i64),
	Name(String),
	Entity {
		#[serde(skip_serializing_if = "Option::is_none", default)]
		id:   Option<i64>,
		#[serde(skip_serializing_if = "Option::is_none", default)]
		name: Option<String>,
	},
}

impl Related {
	pub fn label(&self) -> Option<String> {
		match self {
			Related::Id(id) => Some(id.to_string()),
			Related::Name(name) => Some(name.clone()),
			Related::Entity { name: Some(name), .. } => Some(name.clone()),
			Related::Entity { id: Some(id), .. } => Some(id.to_string()),
			Related::Entity { .. } => None,
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
	Number(f64),
	Text(String),
}

fn number_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
	D: Deserializer<'de>,
{
	let value = match NumberOrText::deserialize(deserializer)? {
		NumberOrText::Number(value) => value,
		NumberOrText::Text(raw) => raw.trim().parse::<f64>().map_err(|e| {
			serde::de::Error::custom(format!("bad amount {raw:?}: {e}"))
		})?,
	};

	if !value.is_finite() {
		return Err(serde::de::Error::custom(format!("bad amount {value}")));
	}
	Ok(value)
}

fn calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;
	parse_calendar_date(&raw)
		.ok_or_else(|| serde::de::Error::custom(format!("bad date {raw:?}")))
}

// An unreadable creation timestamp is dropped rather than failing the record.
fn lenient_timestamp<'de, D>(
	deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<Value>::deserialize(deserializer)?;
	Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
	let raw = raw.trim();
	NaiveDate::parse_from_str(raw, "%Y-%m-%d")
		.ok()
		.or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
	let raw = raw.trim();
	DateTime::parse_from_rfc3339(raw)
		.map(|ts| ts.with_timezone(&Utc))
		.ok()
		.or_else(|| {
			NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
				.ok()
				.map(|ts| ts.and_utc())
		})
}
