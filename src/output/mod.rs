// src/output/mod.rs
use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{fs, fs::File, path::Path, sync::Arc};
use tracing::{debug, info};

use crate::pipeline::{Dataset, FileReport};

/// Write the dataset to `path`, picking CSV or Parquet from the extension.
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {:?}", parent))?;
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => write_csv(dataset, path)?,
        Some("parquet") => write_parquet(dataset, path)?,
        other => bail!(
            "unsupported output extension {:?} for {:?} (expected .csv or .parquet)",
            other.unwrap_or(""),
            path
        ),
    }
    info!(rows = dataset.len(), path = %path.display(), "dataset written");
    Ok(())
}

pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating CSV {:?}", path))?;
    writer.write_record(dataset.columns())?;
    for r in dataset.records() {
        writer.write_record([
            r.year.to_string(),
            r.date.format("%Y-%m-%d").to_string(),
            r.sector.clone(),
            r.category.clone(),
            r.value.to_string(),
        ])?;
    }
    writer.flush().with_context(|| format!("flushing CSV {:?}", path))?;
    Ok(())
}

fn arrow_schema(dataset: &Dataset) -> Schema {
    let [year, date, label, category, value] = dataset.columns();
    Schema::new(vec![
        Field::new(year, DataType::Int32, false),
        Field::new(date, DataType::Date32, false),
        Field::new(label, DataType::Utf8, false),
        Field::new(category, DataType::Utf8, false),
        Field::new(value, DataType::Float64, false),
    ])
}

/// Single row group, Snappy compressed.
pub fn write_parquet(dataset: &Dataset, path: &Path) -> Result<()> {
    let schema = Arc::new(arrow_schema(dataset));
    let records = dataset.records();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from_iter_values(records.iter().map(|r| r.year))),
        Arc::new(Date32Array::from_iter_values(
            records.iter().map(|r| Date32Type::from_naive_date(r.date)),
        )),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.sector.as_str()))),
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.category.as_str()))),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.value))),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = File::create(path).with_context(|| format!("creating parquet file {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer =
        ArrowWriter::try_new(file, schema, Some(props)).context("creating Arrow writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    debug!(rows = batch.num_rows(), "parquet written");
    Ok(())
}

/// Pretty JSON array with one entry per input file.
pub fn write_report(path: &Path, reports: &[FileReport]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating report {:?}", path))?;
    serde_json::to_writer_pretty(file, reports)
        .with_context(|| format!("writing report {:?}", path))?;
    Ok(())
}
