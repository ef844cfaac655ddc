//! Delimited-text form of the wellbeing table.
//!
//! Column order: `country, country_code`, the present dimensions in
//! canonical order, `composite_index`, then one `<dimension>_gap` column per
//! present dimension. Numbers are written with one decimal.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use wb_core::{Dimension, DimensionScores, Real, WellbeingRecord, WellbeingTable};

use crate::{ResultsError, ResultsResult};

const COUNTRY: &str = "country";
const COUNTRY_CODE: &str = "country_code";
const COMPOSITE: &str = "composite_index";

pub fn header(dims: &[Dimension]) -> Vec<String> {
    let mut cols = vec![COUNTRY.to_string(), COUNTRY_CODE.to_string()];
    cols.extend(dims.iter().map(|d| d.key().to_string()));
    cols.push(COMPOSITE.to_string());
    cols.extend(dims.iter().map(|d| d.gap_column()));
    cols
}

pub fn write_table<W: Write>(table: &WellbeingTable, writer: W) -> ResultsResult<()> {
    let dims = table.dimensions();
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header(dims))?;

    for record in table.records() {
        let mut row = vec![record.country.clone(), record.country_code.clone()];
        row.extend(dims.iter().map(|&d| format_value(record.score(d))));
        row.push(format!("{:.1}", record.composite_index));
        row.extend(dims.iter().map(|&d| format_value(record.gap(d))));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_table_csv(table: &WellbeingTable, path: &Path) -> ResultsResult<()> {
    let file = std::fs::File::create(path)?;
    write_table(table, file)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "wrote table");
    Ok(())
}

fn format_value(value: Option<Real>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_default()
}

/// Column positions resolved from a header row.
struct Layout {
    country: usize,
    country_code: usize,
    composite: usize,
    dims: Vec<(Dimension, usize)>,
    gaps: HashMap<Dimension, usize>,
}

impl Layout {
    fn from_header(header: &csv::StringRecord) -> ResultsResult<Self> {
        let position = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ResultsError::MissingColumn {
                    column: name.to_string(),
                })
        };

        let mut dims = Vec::new();
        let mut gaps = HashMap::new();
        for (i, h) in header.iter().enumerate() {
            if let Some(d) = Dimension::from_key(h) {
                dims.push((d, i));
            } else if let Some(d) = Dimension::from_gap_column(h) {
                gaps.insert(d, i);
            }
        }
        dims.sort_by_key(|(d, _)| *d);

        for (d, _) in &dims {
            if !gaps.contains_key(d) {
                return Err(ResultsError::MissingColumn {
                    column: d.gap_column(),
                });
            }
        }

        Ok(Self {
            country: position(COUNTRY)?,
            country_code: position(COUNTRY_CODE)?,
            composite: position(COMPOSITE)?,
            dims,
            gaps,
        })
    }
}

/// Load a persisted table. Unknown columns are ignored; row order is kept.
pub fn read_table<R: Read>(reader: R) -> ResultsResult<WellbeingTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let layout = Layout::from_header(rdr.headers()?)?;

    let mut records = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = result?;
        let line = idx + 1;
        let text = |col: usize| row.get(col).unwrap_or("").to_string();
        let number = |col: usize, name: &str| -> ResultsResult<Real> {
            let raw = row.get(col).unwrap_or("");
            raw.parse::<Real>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ResultsError::InvalidValue {
                    row: line,
                    column: name.to_string(),
                    value: raw.to_string(),
                })
        };

        let mut scores = DimensionScores::new();
        let mut gaps = DimensionScores::new();
        for &(d, col) in &layout.dims {
            scores.set(d, number(col, d.key())?);
            if let Some(&gap_col) = layout.gaps.get(&d) {
                gaps.set(d, number(gap_col, &d.gap_column())?);
            }
        }

        records.push(WellbeingRecord {
            country: text(layout.country),
            country_code: text(layout.country_code),
            scores,
            composite_index: number(layout.composite, COMPOSITE)?,
            gaps,
        });
    }

    let dims = layout.dims.iter().map(|(d, _)| *d).collect();
    Ok(WellbeingTable::new(dims, records)?)
}

pub fn read_table_csv(path: &Path) -> ResultsResult<WellbeingTable> {
    let file = std::fs::File::open(path)?;
    let table = read_table(file)?;
    tracing::info!(
        path = %path.display(),
        countries = table.len(),
        dimensions = table.dimensions().len(),
        "loaded wellbeing table"
    );
    Ok(table)
}
