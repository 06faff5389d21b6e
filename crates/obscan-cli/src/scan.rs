//! Scan and template command handlers.
//!
//! Per-seed failures are printed and never change the exit status; only
//! configuration problems and output I/O errors are propagated.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::SecondsFormat;
use obscan_core::{load_scan_config, AppConfig, LocationSeed, ScanConfig};
use obscan_scanner::{
    count_location_fields, emit, rewrite, HttpTransport, HttpTransportConfig, ScanOptions,
    Scanner, SeedFailure,
};

#[derive(Debug)]
pub(crate) struct ScanArgs {
    pub scan_path: PathBuf,
    pub output_path: PathBuf,
    pub concurrency: usize,
    pub dry_run: bool,
}

/// Run a full scan and persist the hits.
///
/// # Errors
///
/// Returns an error if the scan file is invalid, the HTTP transport cannot
/// be built, or the output file cannot be written.
pub(crate) async fn run_scan(config: &AppConfig, args: &ScanArgs) -> anyhow::Result<()> {
    let scan = load_scan_config(&args.scan_path)
        .with_context(|| format!("loading scan file {}", args.scan_path.display()))?;
    let concurrency = args.concurrency.max(1);

    if args.dry_run {
        print!("{}", dry_run_plan(&scan, concurrency));
        return Ok(());
    }

    let transport = HttpTransport::new(HttpTransportConfig {
        endpoint_url: scan.endpoint_url.clone(),
        timeout_secs: config.request_timeout_secs,
        user_agent: config.user_agent.clone(),
        headers: scan.headers.clone(),
        max_retries: config.max_retries,
        retry_backoff_base_ms: config.retry_backoff_base_ms,
    })?;
    let options = ScanOptions::from_scan_config(&scan)
        .with_concurrency(concurrency)
        .with_inter_request_delay(Duration::from_millis(config.inter_request_delay_ms));
    let scanner = Scanner::new(transport, options);

    let outcome = scanner
        .scan(&scan.template, &scan.seeds, &scan.product_key)
        .await?;
    let report = emit(&outcome.aggregate())?;
    write_output(&args.output_path, &report.durable)?;

    println!(
        "scan {} .. {}: {} of {} seeds answered",
        outcome.started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        outcome.finished_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        outcome.results.len(),
        scan.seeds.len(),
    );
    println!("{}", report.summary);
    if !outcome.failures.is_empty() {
        print!("{}", failure_report(&outcome.failures));
    }
    println!(
        "wrote {} hit(s) to {}",
        report.hits,
        args.output_path.display()
    );
    Ok(())
}

/// Print the rewritten request body for one seed.
///
/// # Errors
///
/// Returns an error if the scan file is invalid.
pub(crate) fn run_template(scan_path: &Path, seed: &str) -> anyhow::Result<()> {
    let scan = load_scan_config(scan_path)
        .with_context(|| format!("loading scan file {}", scan_path.display()))?;
    if count_location_fields(&scan.template, &scan.location_fields) == 0 {
        tracing::warn!("template has no location fields; the body is sent unchanged");
    }
    let body = rewrite(&scan.template, &LocationSeed::new(seed), &scan.location_fields);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn dry_run_plan(scan: &ScanConfig, concurrency: usize) -> String {
    let rewritable = count_location_fields(&scan.template, &scan.location_fields);
    let seeds: Vec<&str> = scan.seeds.iter().map(LocationSeed::as_str).collect();

    let mut lines = vec![
        format!(
            "dry-run: would scan product {} at {}",
            scan.product_key, scan.endpoint_url
        ),
        format!("seeds ({}): {}", seeds.len(), seeds.join(", ")),
        format!(
            "condition: {}",
            scan.condition.as_deref().unwrap_or("any")
        ),
        format!(
            "concurrency: {concurrency}, per-seed timeout: {}s",
            scan.per_seed_timeout.as_secs()
        ),
        format!("location fields rewritten per seed: {rewritable}"),
    ];
    if rewritable == 0 {
        lines.push(
            "warning: no location fields found; every seed would send the same body".to_string(),
        );
    }
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn failure_report(failures: &[SeedFailure]) -> String {
    let mut text = format!("{} seed(s) failed:\n", failures.len());
    for failure in failures {
        text.push_str(&format!("- {}: {}\n", failure.seed, failure.error));
    }
    text
}

/// Write the durable report, creating parent directories as needed.
fn write_output(path: &Path, durable: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    std::fs::write(path, format!("{durable}\n"))
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote report");
    Ok(())
}
