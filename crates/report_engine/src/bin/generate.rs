use anyhow::{Context, Result};
use report_engine::{build_report, write_report_json};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    let database = env::args()
        .position(|a| a == "--database")
        .and_then(|i| env::args().nth(i + 1))
        .unwrap_or("database".to_string());
    let out = env::args()
        .position(|a| a == "--out")
        .and_then(|i| env::args().nth(i + 1))
        .unwrap_or("report/report.json".to_string());

    let database_dir = PathBuf::from(&database);
    let out_path = PathBuf::from(&out);

    println!(
        "Generating report...\n  database: {}\n  output  : {}",
        database_dir.display(),
        out_path.display()
    );

    let report = build_report(&database_dir).context("build report")?;
    write_report_json(&report, &out_path).context("write report.json")?;

    println!(
        "Done. {} months, {} records.",
        report.months.len(),
        report.records.len()
    );
    Ok(())
}
