use anyhow::{bail, Context, Result};
use regex::Regex;
use std::{collections::HashSet, fs, path::Path};
use tracing::debug;

use super::builtin;
use super::types::{HeaderStrategy, Layout, ReportProfile};

/// Resolve a `--profile` argument: a built-in name, or a path to a YAML/JSON profile.
pub fn resolve_profile(arg: &str) -> Result<ReportProfile> {
    if let Some(profile) = builtin::by_name(arg) {
        return Ok(profile);
    }
    let path = Path::new(arg);
    if path.is_file() {
        return load_profile(path);
    }
    bail!(
        "unknown profile `{}` (built-ins: {}; or pass a .yaml/.json file)",
        arg,
        builtin::BUILTIN_NAMES.join(", ")
    )
}

/// Read and validate a profile file; the format follows the extension.
pub fn load_profile(path: &Path) -> Result<ReportProfile> {
    let text = fs::read_to_string(path).with_context(|| format!("reading profile {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);

    let profile: ReportProfile = match ext.as_deref() {
        Some("json") => {
            serde_json::from_str(&text).with_context(|| format!("parsing profile {:?}", path))?
        }
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&text).with_context(|| format!("parsing profile {:?}", path))?
        }
        other => bail!("unsupported profile format {:?} for {:?}", other, path),
    };

    validate(&profile).with_context(|| format!("validating profile {:?}", path))?;
    debug!(name = %profile.name, targets = profile.targets.len(), "loaded profile");
    Ok(profile)
}

/// Reject profiles the pipeline could not apply consistently.
pub fn validate(profile: &ReportProfile) -> Result<()> {
    if profile.targets.is_empty() {
        bail!("profile `{}` declares no target columns", profile.name);
    }
    match &profile.layout {
        Layout::Wide => {
            if profile.header.is_empty() {
                bail!("profile `{}` declares no header strategy", profile.name);
            }
            if profile.label_keywords.is_empty() {
                bail!("profile `{}` declares no label keywords", profile.name);
            }
        }
        Layout::SingleCell { row_label, .. } => {
            if profile.targets.len() != 1 {
                bail!(
                    "single-cell profile `{}` needs exactly one target, found {}",
                    profile.name,
                    profile.targets.len()
                );
            }
            if row_label.trim().is_empty() {
                bail!("single-cell profile `{}` has an empty row label", profile.name);
            }
        }
    }

    let mut seen = HashSet::new();
    for target in &profile.targets {
        if !seen.insert(target.name.as_str()) {
            bail!("duplicate target column `{}`", target.name);
        }
        if target.variants.is_empty() {
            bail!("target column `{}` has no accepted spellings", target.name);
        }
    }

    for strategy in &profile.header {
        if let HeaderStrategy::FixedRow {
            header_row,
            data_rows,
        } = strategy
        {
            if *header_row == 0 || data_rows.first <= *header_row || data_rows.last < data_rows.first {
                bail!(
                    "fixed header row {} with data rows {}..={} is not a valid layout",
                    header_row,
                    data_rows.first,
                    data_rows.last
                );
            }
        }
    }

    if let Some(pattern) = &profile.section_terminator {
        Regex::new(pattern).with_context(|| format!("section terminator `{}`", pattern))?;
    }
    Ok(())
}
