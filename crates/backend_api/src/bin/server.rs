use backend_api::{run_server, FileReportRepository};
use std::sync::Arc;
use std::{env, path::PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment variables with sane defaults
    let report_path_raw =
        env::var("REPORT_PATH").unwrap_or_else(|_| "report/report.json".to_string());
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    // Resolve the report path: absolute paths are kept, relative ones are
    // tried against the workspace root first (report.json lives at
    // workspace level), then the current directory.
    let crate_root = env::current_dir()?;
    let workspace_root = find_workspace_root().unwrap_or_else(|| crate_root.clone());
    let report_path = resolve_with_fallback(&report_path_raw, &[&workspace_root, &crate_root]);

    println!("Holdings Report API Server");
    println!("==========================");
    println!("Workspace root: {}", workspace_root.display());
    println!("Report path (resolved): {}", report_path.display());
    println!("Listening on: {}:{}", host, port);
    println!();

    // Pre-flight check
    if !report_path.exists() {
        eprintln!("[WARN] report.json not found at: {}", report_path.display());
        eprintln!("       Run generate-report first, or set REPORT_PATH to an absolute path.");
        eprintln!("       Continuing; the page will show the load-failure state until it exists.");
    }

    let repo = Arc::new(FileReportRepository::new(report_path));

    run_server(repo, &host, port).await?;

    Ok(())
}

/// Find the Cargo workspace root by traversing up until a Cargo.toml that contains a [workspace] section.
fn find_workspace_root() -> Option<PathBuf> {
    let mut dir = env::current_dir().ok()?;
    for _ in 0..10 {
        // safety limit
        let candidate = dir.join("Cargo.toml");
        if candidate.exists() {
            if let Ok(content) = std::fs::read_to_string(&candidate) {
                if content.contains("[workspace]") {
                    return Some(dir.clone());
                }
            }
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Resolve a raw path string against a list of base directories, returning the first existing match, or the first constructed path.
fn resolve_with_fallback(raw: &str, bases: &[&PathBuf]) -> PathBuf {
    let input = PathBuf::from(raw);
    if input.is_absolute() {
        return input;
    }
    for base in bases {
        let candidate = base.join(&input);
        if candidate.exists() {
            return candidate;
        }
    }
    // If none exist yet (maybe created later), fall back to the first base.
    match bases.first() {
        Some(base) => base.join(input),
        None => input,
    }
}
