//! HTML rendering for the monthly holdings report.
//!
//! Pure string builders: every call renders a fresh document from the
//! given `Report` snapshot, so repeated requests can never duplicate
//! table content.

pub mod format;

pub use format::{format_grouped, format_pct};

use models::{MonthEntry, Report};

/// Static columns, rendered once with a two-row vertical span.
const STATIC_HEADERS: [&str; 3] = ["Name", "ISIN", "Rating"];

/// Per-month sub-columns, in fixed order.
const SUB_HEADERS: [&str; 3] = ["Qty", "Val (L)", "% Net"];

const EMPTY_PLACEHOLDER: &str = "<p>No data found.</p>";

/// Stylesheet consuming the visual classes emitted below. Class names
/// are a compatibility surface; do not rename them.
const PAGE_STYLE: &str = "\
body { font-family: sans-serif; margin: 1.5em; }
table { border-collapse: collapse; white-space: nowrap; }
th, td { border: 1px solid #999; padding: 4px 8px; }
.month-header { background: #2c5f8a; color: #fff; text-align: center; }
.sub-header { background: #dde8f0; text-align: center; }
.d-num { text-align: right; }
.d-pct { text-align: right; }
.total-row { font-weight: bold; background: #f3efe2; }
";

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the report table, or the fixed placeholder when there are no
/// records. Header math: 3 static columns plus 3 sub-columns per month;
/// every body row emits exactly that many cells, substituting a zero
/// entry for months a holding has no data for.
pub fn render_table(report: &Report) -> String {
    if report.records.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }

    let mut html = String::new();
    html.push_str("<table>\n<thead>\n<tr>");
    for label in STATIC_HEADERS {
        html.push_str(&format!("<th rowspan=\"2\">{label}</th>"));
    }
    for month in &report.months {
        html.push_str(&format!(
            "<th colspan=\"3\" class=\"month-header\">{}</th>",
            escape_html(month)
        ));
    }
    html.push_str("</tr>\n<tr>");
    for _ in &report.months {
        for label in SUB_HEADERS {
            html.push_str(&format!("<th class=\"sub-header\">{label}</th>"));
        }
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    let zero = MonthEntry::default();
    for rec in &report.records {
        if rec.is_total() {
            html.push_str("<tr class=\"total-row\">");
        } else {
            html.push_str("<tr>");
        }
        for text in [&rec.name, &rec.isin, &rec.rating] {
            html.push_str(&format!("<td>{}</td>", escape_html(text)));
        }
        for month in &report.months {
            let entry = rec.months.get(month).unwrap_or(&zero);
            html.push_str(&format!(
                "<td class=\"d-num\">{}</td>",
                format_grouped(&entry.quantity, 0)
            ));
            html.push_str(&format!(
                "<td class=\"d-num\">{}</td>",
                format_grouped(&entry.value, 2)
            ));
            html.push_str(&format!("<td class=\"d-pct\">{}</td>", format_pct(&entry.pct)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    html
}

/// Full page: the rendered table inside `#table-container`, with the
/// `#loading` status region emptied and hidden.
pub fn render_page(report: &Report) -> String {
    page_document("", true, &render_table(report), None)
}

/// Full page for a failed load: the failure message stays visible in the
/// `#loading` region and the raw error is raised as a blocking alert.
/// Deliberately loud; this is an internal tool.
pub fn render_error_page(message: &str) -> String {
    let status = format!("Failed to load data: {}", escape_html(message));
    // Embedded as a JSON string literal, which is also a valid JS one.
    let alert_payload =
        serde_json::to_string(message).unwrap_or_else(|_| "\"failed to load data\"".to_string());
    page_document(&status, false, "", Some(&alert_payload))
}

fn page_document(status: &str, status_hidden: bool, table: &str, alert_payload: Option<&str>) -> String {
    let loading = if status_hidden {
        "<div id=\"loading\" hidden></div>".to_string()
    } else {
        format!("<div id=\"loading\">{status}</div>")
    };
    let script = match alert_payload {
        Some(payload) => format!("\n<script>alert({payload});</script>"),
        None => String::new(),
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Equity Holdings Report</title>\n<style>\n{PAGE_STYLE}</style>\n</head>\n<body>\n\
         <h1>Equity Holdings by Month</h1>\n\
         {loading}\n\
         <div id=\"table-container\">{table}</div>{script}\n\
         </body>\n</html>\n"
    )
}
