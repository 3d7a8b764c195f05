use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sectoral_tidy::{
    process::{Extractor, FileAudit},
    schema::resolve_profile,
    PeriodResolver,
};

/// Show how one report file would be located and reconciled, without writing anything.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    file: PathBuf,
    #[arg(short, long, default_value = "creditos")]
    profile: String,
    #[arg(long, default_value = sectoral_tidy::period::DEFAULT_PREFIX)]
    prefix: String,
    /// Print the audit as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let extractor = Extractor::new(resolve_profile(&args.profile)?)?;
    let resolver = PeriodResolver::new(&args.prefix)?;

    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("{:?} has no file name", args.file))?;
    let period = resolver.resolve(&name)?;

    let (audit, outcome) = match extractor.extract_file(&args.file, &period) {
        Ok(ex) => (ex.audit, format!("extracted {} records", ex.records.len())),
        Err(failure) => (
            failure.audit,
            format!("skipped ({}): {}", failure.error.kind(), failure.error),
        ),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&audit)?);
    } else {
        println!("=== {} ({}) ===", name, period);
        print_audit(&audit);
        println!("Outcome:        {}", outcome);
    }
    Ok(())
}

fn print_audit(audit: &FileAudit) {
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();
    println!("Engine:         {}", or_dash(audit.engine.map(|e| e.name())));
    println!(
        "Sheet:          {} (via {})",
        or_dash(audit.sheet.as_deref()),
        or_dash(audit.sheet_strategy)
    );
    match &audit.header {
        Some(h) => {
            print!("Header row:     {} (via {})", h.row + 1, h.strategy);
            if let Some(w) = h.window {
                print!(", data rows {}..={}", w.first, w.last);
            }
            println!();
        }
        None => println!("Header row:     -"),
    }
    println!("Label column:   {}", or_dash(audit.label_column.as_deref()));
    println!("Mapped columns:");
    for m in &audit.mapped {
        println!("  - col {:<3} {:<40} -> {}", m.column, m.header, m.category);
    }
    if !audit.dropped_columns.is_empty() {
        println!("Dropped columns: {}", audit.dropped_columns.join(", "));
    }
    println!("Dropped rows:   {}", audit.dropped_rows);
    println!("Missing cells:  {}", audit.missing_values);
}
