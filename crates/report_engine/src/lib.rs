use anyhow::{bail, Context, Result};
use models::{Holding, MonthEntry, MonthlyHoldings, Report, TOTAL_ROW_NAME};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Running column sums for one month, used to build the Total row.
#[derive(Default, Clone, Copy)]
struct MonthTotals {
    quantity: f64,
    value: f64,
    pct: f64,
}

/// Build the report by merging every monthly holdings file in the
/// database directory. Files are named `YYYY_MM.json` and processed in
/// filename order, which is chronological; rows are merged across
/// months keyed by ISIN, preserving the order an ISIN was first seen.
pub fn build_report(database_dir: &Path) -> Result<Report> {
    let mut files: Vec<PathBuf> = vec![];
    for entry in fs::read_dir(database_dir)
        .with_context(|| format!("Reading database dir {}", database_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            if name.ends_with(".json") && name.len() == 12 {
                // e.g. 2025_04.json
                files.push(path);
            }
        }
    }
    files.sort();

    let mut months: Vec<String> = vec![];
    let mut order: Vec<String> = vec![];
    let mut merged: HashMap<String, Holding> = HashMap::new();
    let mut totals: HashMap<String, MonthTotals> = HashMap::new();

    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        let doc: MonthlyHoldings = serde_json::from_str(&content)
            .with_context(|| format!("Parsing {}", path.display()))?;

        if months.contains(&doc.month) {
            bail!("Duplicate month label '{}' in {}", doc.month, path.display());
        }
        months.push(doc.month.clone());

        for row in &doc.holdings {
            let slot = merged.entry(row.isin.clone()).or_insert_with(|| {
                order.push(row.isin.clone());
                Holding {
                    name: row.name.clone(),
                    isin: row.isin.clone(),
                    rating: row.rating.clone(),
                    months: BTreeMap::new(),
                }
            });
            // Backfill metadata a disclosure left blank in an earlier month
            if slot.name.is_empty() && !row.name.is_empty() {
                slot.name = row.name.clone();
            }
            if slot.rating.is_empty() && !row.rating.is_empty() {
                slot.rating = row.rating.clone();
            }
            slot.months.insert(
                doc.month.clone(),
                MonthEntry {
                    quantity: Value::from(row.quantity),
                    value: Value::from(row.value),
                    pct: Value::from(row.pct),
                },
            );

            let t = totals.entry(doc.month.clone()).or_default();
            t.quantity += row.quantity;
            t.value += row.value;
            t.pct += row.pct;
        }
    }

    let mut records: Vec<Holding> = Vec::with_capacity(order.len() + 1);
    for isin in &order {
        if let Some(holding) = merged.remove(isin) {
            records.push(holding);
        }
    }

    // Synthetic aggregate row, always last. An empty dataset stays empty
    // so the renderer can show its placeholder instead of a lone total.
    if !records.is_empty() {
        let total_months = months
            .iter()
            .map(|m| {
                let t = totals.get(m).copied().unwrap_or_default();
                (
                    m.clone(),
                    MonthEntry {
                        quantity: Value::from(t.quantity),
                        value: Value::from(t.value),
                        pct: Value::from(t.pct),
                    },
                )
            })
            .collect();
        records.push(Holding {
            name: TOTAL_ROW_NAME.to_string(),
            isin: String::new(),
            rating: String::new(),
            months: total_months,
        });
    }

    Ok(Report { months, records })
}

pub fn write_report_json(report: &Report, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(out_path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_month(dir: &Path, filename: &str, doc: serde_json::Value) {
        fs::write(dir.join(filename), doc.to_string()).unwrap();
    }

    fn row(name: &str, isin: &str, rating: &str, qty: f64, value: f64, pct: f64) -> serde_json::Value {
        json!({
            "Name": name, "ISIN": isin, "Rating": rating,
            "Quantity": qty, "Value": value, "Pct": pct,
        })
    }

    #[test]
    fn test_months_in_filename_order() {
        let dir = TempDir::new().unwrap();
        write_month(dir.path(), "2025_05.json", json!({"month": "May 2025", "holdings": []}));
        write_month(dir.path(), "2025_04.json", json!({"month": "April 2025", "holdings": []}));
        write_month(dir.path(), "2024_12.json", json!({"month": "December 2024", "holdings": []}));

        let report = build_report(dir.path()).unwrap();
        assert_eq!(report.months, vec!["December 2024", "April 2025", "May 2025"]);
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_ignores_unrelated_files() {
        let dir = TempDir::new().unwrap();
        write_month(dir.path(), "2025_04.json", json!({"month": "April 2025", "holdings": []}));
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("report.json"), "{}").unwrap();

        let report = build_report(dir.path()).unwrap();
        assert_eq!(report.months, vec!["April 2025"]);
    }

    #[test]
    fn test_merges_by_isin_preserving_first_seen_order() {
        let dir = TempDir::new().unwrap();
        write_month(
            dir.path(),
            "2025_04.json",
            json!({"month": "April 2025", "holdings": [
                row("HDFC Bank", "INE040A01034", "Banks", 100.0, 250.0, 0.05),
                row("ITC", "INE154A01025", "FMCG", 50.0, 20.0, 0.01),
            ]}),
        );
        write_month(
            dir.path(),
            "2025_05.json",
            json!({"month": "May 2025", "holdings": [
                row("Infosys", "INE009A01021", "IT", 10.0, 15.0, 0.002),
                row("HDFC Bank", "INE040A01034", "Banks", 110.0, 260.0, 0.052),
            ]}),
        );

        let report = build_report(dir.path()).unwrap();
        let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["HDFC Bank", "ITC", "Infosys", "Total"]);

        let hdfc = &report.records[0];
        assert_eq!(hdfc.months.len(), 2);
        assert_eq!(hdfc.months["May 2025"].quantity, json!(110.0));

        // ITC has no May entry; the gap is left for the renderer to zero-fill
        assert!(!report.records[1].months.contains_key("May 2025"));
    }

    #[test]
    fn test_total_row_sums_columns() {
        let dir = TempDir::new().unwrap();
        write_month(
            dir.path(),
            "2025_04.json",
            json!({"month": "April 2025", "holdings": [
                row("A", "ISIN-A", "X", 100.0, 10.5, 0.1),
                row("B", "ISIN-B", "Y", 200.0, 20.25, 0.2),
            ]}),
        );

        let report = build_report(dir.path()).unwrap();
        let total = report.records.last().unwrap();
        assert_eq!(total.name, "Total");
        assert_eq!(total.isin, "");
        assert_eq!(total.rating, "");
        let april = &total.months["April 2025"];
        assert_eq!(april.quantity, json!(300.0));
        assert_eq!(april.value, json!(30.75));
        assert!((april.pct.as_f64().unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_backfills_blank_metadata() {
        let dir = TempDir::new().unwrap();
        write_month(
            dir.path(),
            "2025_04.json",
            json!({"month": "April 2025", "holdings": [
                row("", "ISIN-A", "", 1.0, 1.0, 0.0),
            ]}),
        );
        write_month(
            dir.path(),
            "2025_05.json",
            json!({"month": "May 2025", "holdings": [
                row("Asian Paints", "ISIN-A", "Paints", 2.0, 2.0, 0.0),
            ]}),
        );

        let report = build_report(dir.path()).unwrap();
        assert_eq!(report.records[0].name, "Asian Paints");
        assert_eq!(report.records[0].rating, "Paints");
    }

    #[test]
    fn test_duplicate_month_label_rejected() {
        let dir = TempDir::new().unwrap();
        write_month(dir.path(), "2025_04.json", json!({"month": "April 2025", "holdings": []}));
        write_month(dir.path(), "2025_05.json", json!({"month": "April 2025", "holdings": []}));

        let err = build_report(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Duplicate month label"));
    }

    #[test]
    fn test_generated_json_is_diff_stable() {
        let dir = TempDir::new().unwrap();
        write_month(
            dir.path(),
            "2025_04.json",
            json!({"month": "April 2025", "holdings": [row("A", "ISIN-A", "X", 1.0, 1.0, 0.1)]}),
        );
        write_month(
            dir.path(),
            "2025_05.json",
            json!({"month": "May 2025", "holdings": [row("A", "ISIN-A", "X", 2.0, 2.0, 0.2)]}),
        );
        write_month(
            dir.path(),
            "2025_06.json",
            json!({"month": "June 2025", "holdings": [row("A", "ISIN-A", "X", 3.0, 3.0, 0.3)]}),
        );

        let first = serde_json::to_string_pretty(&build_report(dir.path()).unwrap()).unwrap();
        let second = serde_json::to_string_pretty(&build_report(dir.path()).unwrap()).unwrap();
        assert_eq!(first, second);

        // Month keys inside a record's map serialize in a fixed (sorted)
        // order, unlike the chronological top-level months list
        let record_months = &first[first.find("\"Months\"").unwrap()..];
        let a = record_months.find("\"April 2025\"").unwrap();
        let b = record_months.find("\"June 2025\"").unwrap();
        let c = record_months.find("\"May 2025\"").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_write_report_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report").join("report.json");
        let report = Report { months: vec![], records: vec![] };

        write_report_json(&report, &out).unwrap();
        let round_trip: Report =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert!(round_trip.months.is_empty());
    }
}
