// src/schema/builtin.rs
//! Report families known to the pipeline. Adding a newly observed header spelling is a
//! one-line change to the variant tables below.

use super::types::{
    HeaderStrategy, Layout, ReportProfile, RowWindow, TargetColumn, DEFAULT_SEARCH_LIMIT,
};

type TargetTable = &'static [(&'static str, &'static [&'static str])];

static CREDITOS_TARGETS: TargetTable = &[
    ("Banca Múltiple", &["banca multiple", "banca multiple."]),
    ("Empresas Financieras", &["empresas financieras"]),
    ("Cajas Municipales", &["cajas municipales"]),
    (
        "Cajas Rurales de Ahorro y Crédito",
        &[
            "cajas rurales de ahorro y credito",
            "caja rurales de ahorro y credito",
            "cajas rurales de ahorro y credito.",
        ],
    ),
    ("EDPYMEs", &["edpymes", "edpyme", "edpym es"]),
    ("Agrobanco", &["agrobanco"]),
    ("Total", &["total", "total (miles)", "total general", "total,"]),
];

static MOROSIDAD_TARGETS: TargetTable = &[
    ("Banca Múltiple", &["banca multiple"]),
    ("Empresas Financieras", &["empresas financieras"]),
    ("Cajas Municipales", &["cajas municipales"]),
    (
        "Cajas Rurales de Ahorro y Crédito",
        &[
            "cajas rurales de ahorro y credito",
            "caja rurales de ahorro y credito",
            "cajas rurales de ahorro y credito (miles)",
        ],
    ),
    ("EDPYMEs", &["edpymes", "edpyme"]),
    ("Agrobanco", &["agrobanco"]),
    ("Total", &["total", "total (miles)", "total general"]),
];

static DEPOSITOS_TARGETS: TargetTable = &[("Banca Múltiple", &["banca multiple"])];

/// Credit-type rows appended after the delinquency sector breakdown.
pub const MOROSIDAD_TERMINATOR: &str =
    r"^(creditos?\s+(corporativos|hipotecarios|de consumo)|hipotecarios|consumo)";

pub const BUILTIN_NAMES: &[&str] = &["creditos", "morosidad", "depositos"];

fn targets(table: TargetTable) -> Vec<TargetColumn> {
    table
        .iter()
        .map(|(name, variants)| TargetColumn {
            name: name.to_string(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Loans by economic sector ("Créditos x SE"), amounts in thousands.
pub fn creditos() -> ReportProfile {
    ReportProfile {
        name: "creditos".into(),
        sheet: "Créditos x SE".into(),
        sheet_keywords: vec![
            strings(&["credito", "creditos"]),
            strings(&["se", "sector", "economico"]),
        ],
        first_sheet_fallback: true,
        layout: Layout::Wide,
        header: vec![HeaderStrategy::Anchor {
            label: "sector economico".into(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }],
        label_keywords: strings(&["sector", "economico"]),
        label_name: "Sector Económico".into(),
        category_name: "Entidad".into(),
        value_name: "monto".into(),
        section_terminator: Some(r"^creditos?\s+corporativos".into()),
        targets: targets(CREDITOS_TARGETS),
    }
}

/// Delinquency ratio by economic sector ("Morosidad x SE"), in percent.
///
/// Older vintages of this sheet have no usable anchor; they keep the header on row 6
/// and the sector breakdown on rows 9 to 24. Newer ones follow the sectors with a
/// breakdown by credit type, cut off by the terminator.
pub fn morosidad() -> ReportProfile {
    ReportProfile {
        name: "morosidad".into(),
        sheet: "Morosidad x SE".into(),
        sheet_keywords: vec![strings(&["morosidad"]), strings(&["se", "sector"])],
        first_sheet_fallback: true,
        layout: Layout::Wide,
        header: vec![
            HeaderStrategy::Anchor {
                label: "sector economico".into(),
                search_limit: DEFAULT_SEARCH_LIMIT,
            },
            HeaderStrategy::FixedRow {
                header_row: 6,
                data_rows: RowWindow { first: 9, last: 24 },
            },
        ],
        label_keywords: strings(&["sector"]),
        label_name: "Sector Económico".into(),
        category_name: "Entidad".into(),
        value_name: "morosidad".into(),
        section_terminator: Some(MOROSIDAD_TERMINATOR.into()),
        targets: targets(MOROSIDAD_TARGETS),
    }
}

/// Total deposits of the multiple-banking system ("Ctas BM"), one figure per month.
/// Only the exact sheet is accepted; other sheets carry unrelated totals.
pub fn depositos() -> ReportProfile {
    ReportProfile {
        name: "depositos".into(),
        sheet: "Ctas BM".into(),
        sheet_keywords: Vec::new(),
        first_sheet_fallback: false,
        layout: Layout::SingleCell {
            row_label: "depositos totales".into(),
            label_column: 0,
            column: 5,
        },
        header: Vec::new(),
        label_keywords: Vec::new(),
        label_name: "Concepto".into(),
        category_name: "Entidad".into(),
        value_name: "depositos".into(),
        section_terminator: None,
        targets: targets(DEPOSITOS_TARGETS),
    }
}

pub fn by_name(name: &str) -> Option<ReportProfile> {
    match name.to_ascii_lowercase().as_str() {
        "creditos" => Some(creditos()),
        "morosidad" => Some(morosidad()),
        "depositos" => Some(depositos()),
        _ => None,
    }
}
