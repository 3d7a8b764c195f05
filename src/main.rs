use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, time::Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use sectoral_tidy::{
    build_dataset, output,
    process::Extractor,
    schema::resolve_profile,
    PeriodResolver, RunOutput,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Turn a directory of monthly sector reports into one tidy dataset"
)]
struct Args {
    /// Directory holding <PREFIX>-<mm><yyyy>.xls[x] files
    #[arg(short, long)]
    input: PathBuf,
    /// Output file; .csv or .parquet
    #[arg(short, long)]
    output: PathBuf,
    /// Built-in profile (creditos, morosidad, depositos) or a .yaml/.json profile file
    #[arg(short, long, default_value = "creditos")]
    profile: String,
    #[arg(long, default_value = sectoral_tidy::period::DEFAULT_PREFIX)]
    prefix: String,
    /// Worker threads; defaults to rayon's global pool
    #[arg(long)]
    threads: Option<usize>,
    /// Write the per-file JSON report here
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();
    let start = Instant::now();

    // ─── 2) profile + resolver ───────────────────────────────────────
    let profile = resolve_profile(&args.profile)?;
    info!(profile = %profile.name, sheet = %profile.sheet, "profile loaded");
    let extractor = Extractor::new(profile)?;
    let resolver = PeriodResolver::new(&args.prefix)
        .with_context(|| format!("invalid filename prefix `{}`", args.prefix))?;

    // ─── 3) extract every file ───────────────────────────────────────
    let run: RunOutput = match args.threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("building worker pool")?
            .install(|| build_dataset(&args.input, &resolver, &extractor))?,
        None => build_dataset(&args.input, &resolver, &extractor)?,
    };

    for report in &run.reports {
        println!("{}", report);
    }

    // ─── 4) write outputs ────────────────────────────────────────────
    output::write_dataset(&run.dataset, &args.output)?;
    if let Some(path) = &args.report {
        output::write_report(path, &run.reports)?;
        info!(path = %path.display(), "run report written");
    }

    let extracted = run.reports.iter().filter(|r| r.is_extracted()).count();
    println!(
        "{} rows from {}/{} files -> {}",
        run.dataset.len(),
        extracted,
        run.reports.len(),
        args.output.display()
    );
    info!(elapsed = ?start.elapsed(), "all done");
    Ok(())
}
