use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "sole workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark the initialization strategies and write a report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

const BENCH: &str = "strategies_benchmark";
const CRITERION_DIR: &str = "target/criterion";
const REPORT_PATH: &str = "benchmark_results/report.md";

/// The subset of criterion's `estimates.json` the report needs.
#[derive(Deserialize)]
struct Estimates {
    mean: Estimate,
}

#[derive(Deserialize)]
struct Estimate {
    point_estimate: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!(">>> Running {BENCH}...");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.args(["bench", "--bench", BENCH, "--"]);
    if quick {
        cmd.args(["--measurement-time", "0.1", "--noplot", "--sample-size", "10"]);
    }

    let status = cmd
        .status()
        .with_context(|| format!("failed to spawn cargo bench for {BENCH}"))?;
    if !status.success() {
        bail!("{BENCH} exited with {status}");
    }

    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");

    let root = Path::new(CRITERION_DIR);
    if !root.exists() {
        eprintln!("No criterion output found at {}", root.display());
        return Ok(());
    }

    let mut rows = Vec::new();
    collect_estimates(root, &mut rows)?;
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let out = render_report(&rows)?;

    let report = Path::new(REPORT_PATH);
    if let Some(parent) = report.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(report, out).with_context(|| format!("writing {}", report.display()))?;

    println!("Report written to {}", report.display());
    Ok(())
}

fn render_report(rows: &[(String, f64)]) -> Result<String> {
    let mut out = String::from("# Initialization Strategy Report\n\n");
    out.push_str("| Benchmark | Mean | Calls/s |\n|---|---|---|\n");
    for (name, mean_ns) in rows {
        writeln!(out, "| {name} | {} | {} |", format_time(*mean_ns), format_rate(1e9 / mean_ns))?;
    }
    Ok(out)
}

/// Walks the criterion tree collecting `<name>/new/estimates.json` means,
/// keyed by the path between the criterion root and `new`.
fn collect_estimates(dir: &Path, rows: &mut Vec<(String, f64)>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_dir() || path.file_name().is_some_and(|n| n == "report") {
            continue;
        }

        let estimates = path.join("new").join("estimates.json");
        if estimates.is_file() {
            let raw = fs::read_to_string(&estimates)?;
            let parsed: Estimates = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", estimates.display()))?;
            if parsed.mean.point_estimate > 0.0 {
                rows.push((bench_name(&path), parsed.mean.point_estimate));
            }
        } else {
            collect_estimates(&path, rows)?;
        }
    }
    Ok(())
}

fn bench_name(path: &Path) -> String {
    path.strip_prefix(CRITERION_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn format_time(ns: f64) -> String {
    if ns >= 1_000_000.0 {
        format!("{:.2} ms", ns / 1_000_000.0)
    } else if ns >= 1_000.0 {
        format!("{:.2} µs", ns / 1_000.0)
    } else {
        format!("{ns:.2} ns")
    }
}

fn format_rate(per_sec: f64) -> String {
    if per_sec > 1_000_000.0 {
        format!("{:.2}M", per_sec / 1_000_000.0)
    } else if per_sec > 1_000.0 {
        format!("{:.2}K", per_sec / 1_000.0)
    } else {
        format!("{per_sec:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_report_rows() {
        let rows = vec![
            ("cold_init/double_checked".to_owned(), 25.0),
            ("double_checked_concurrent_read".to_owned(), 2_500_000.0),
        ];
        let report = render_report(&rows).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "# Initialization Strategy Report");
        assert_eq!(lines[2], "| Benchmark | Mean | Calls/s |");
        assert_eq!(lines[4], "| cold_init/double_checked | 25.00 ns | 40.00M |");
        assert_eq!(lines[5], "| double_checked_concurrent_read | 2.50 ms | 400 |");
    }
}
