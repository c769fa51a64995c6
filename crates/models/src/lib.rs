use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Name given to the synthetic aggregate row appended by the report engine.
/// The renderer matches it exactly (case-sensitive).
pub const TOTAL_ROW_NAME: &str = "Total";

// Report wire shape (served verbatim by /api/data)

/// Per-month figures for one holding.
///
/// Upstream feeds are inconsistent about numeric cells: plain numbers,
/// quoted numbers and nulls all occur. The raw JSON values are kept here
/// and interpreted leniently at render time; absent fields default to
/// null, which renders as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthEntry {
	#[serde(rename = "Quantity", default)]
	pub quantity: Value,
	#[serde(rename = "Value", default)]
	pub value: Value,
	#[serde(rename = "Pct", default)]
	pub pct: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
	#[serde(rename = "Name")]
	pub name: String,
	#[serde(rename = "ISIN", default)]
	pub isin: String,
	#[serde(rename = "Rating", default)]
	pub rating: String,
	/// Keyed by month label; need not cover every label in `Report::months`.
	/// Ordered map so generated report.json is diff-stable across runs.
	#[serde(rename = "Months", default)]
	pub months: BTreeMap<String, MonthEntry>,
}

impl Holding {
	pub fn is_total(&self) -> bool {
		self.name == TOTAL_ROW_NAME
	}
}

/// Top-level report document. `months` defines the column grouping order
/// and is deliberately NOT defaulted: a document without it is malformed
/// and must fail at parse time, whereas missing `records` is the valid
/// empty state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
	pub months: Vec<String>,
	#[serde(default)]
	pub records: Vec<Holding>,
}

// Monthly input documents (database directory, one file per month)

#[derive(Debug, Clone, Deserialize)]
pub struct HoldingRow {
	#[serde(rename = "Name")]
	pub name: String,
	#[serde(rename = "ISIN", default)]
	pub isin: String,
	#[serde(rename = "Rating", default)]
	pub rating: String,
	#[serde(rename = "Quantity", default)]
	pub quantity: f64,
	#[serde(rename = "Value", default)]
	pub value: f64,
	#[serde(rename = "Pct", default)]
	pub pct: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyHoldings {
	/// Display label for the month column group, e.g. "April 2025".
	pub month: String,
	#[serde(default)]
	pub holdings: Vec<HoldingRow>,
}
