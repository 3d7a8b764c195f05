//! Worksheet discovery: an ordered chain of strategies, first hit wins.

use crate::process::utils::norm_text;
use crate::schema::ReportProfile;

pub trait SheetStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn pick(&self, sheet_names: &[String]) -> Option<String>;
}

/// Sheet whose normalized name equals the normalized logical name.
pub struct ExactName {
    wanted: String,
}

impl SheetStrategy for ExactName {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn pick(&self, sheet_names: &[String]) -> Option<String> {
        sheet_names
            .iter()
            .find(|s| norm_text(s) == self.wanted)
            .cloned()
    }
}

/// Sheet whose normalized name contains one fragment from every group.
pub struct KeywordFragments {
    groups: Vec<Vec<String>>,
}

impl SheetStrategy for KeywordFragments {
    fn name(&self) -> &'static str {
        "keywords"
    }

    fn pick(&self, sheet_names: &[String]) -> Option<String> {
        if self.groups.is_empty() {
            return None;
        }
        sheet_names
            .iter()
            .find(|s| {
                let ns = norm_text(s);
                self.groups
                    .iter()
                    .all(|group| group.iter().any(|frag| ns.contains(frag.as_str())))
            })
            .cloned()
    }
}

pub struct FirstSheet;

impl SheetStrategy for FirstSheet {
    fn name(&self) -> &'static str {
        "first"
    }

    fn pick(&self, sheet_names: &[String]) -> Option<String> {
        sheet_names.first().cloned()
    }
}

pub fn default_strategies(profile: &ReportProfile) -> Vec<Box<dyn SheetStrategy>> {
    let mut chain: Vec<Box<dyn SheetStrategy>> = vec![
        Box::new(ExactName {
            wanted: norm_text(&profile.sheet),
        }),
        Box::new(KeywordFragments {
            groups: profile
                .sheet_keywords
                .iter()
                .map(|g| g.iter().map(|f| norm_text(f)).collect())
                .collect(),
        }),
    ];
    if profile.first_sheet_fallback {
        chain.push(Box::new(FirstSheet));
    }
    chain
}

/// Run the chain; returns the sheet and the name of the strategy that found it.
pub fn pick(
    strategies: &[Box<dyn SheetStrategy>],
    sheet_names: &[String],
) -> Option<(String, &'static str)> {
    strategies
        .iter()
        .find_map(|s| s.pick(sheet_names).map(|sheet| (sheet, s.name())))
}
