//! Plain-text summary written alongside the persisted table.

use chrono::{DateTime, Utc};
use std::fmt::Write;
use wb_config::WellbeingConfig;
use wb_core::WellbeingTable;

pub fn render_metadata(
    table: &WellbeingTable,
    config: &WellbeingConfig,
    year_range: Option<(i32, i32)>,
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let title = format!("{} DATA - PROCESSED", config.name.to_uppercase());
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out);

    let _ = writeln!(out, "Dataset Summary:");
    let _ = writeln!(out, "- Countries: {}", table.len());
    let _ = writeln!(out, "- Dimensions: {}", table.dimensions().len());
    match year_range {
        Some((lo, hi)) if lo != hi => {
            let _ = writeln!(
                out,
                "- Data Years: Most recent available ({lo}-{hi} depending on measure)"
            );
        }
        Some((year, _)) => {
            let _ = writeln!(out, "- Data Years: {year}");
        }
        None => {
            let _ = writeln!(out, "- Data Years: unknown");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Dimensions Included:");
    for &dim in table.dimensions() {
        let description = config
            .measure_for(dim)
            .map(|m| m.description.as_str())
            .unwrap_or_default();
        let _ = writeln!(out, "  • {}: {}", dim.key(), description);
    }
    let _ = writeln!(out);

    out.push_str(
        "Value Interpretation:
- All dimensions normalized to 0-100 scale
- 0 = Worst performer in dataset
- 100 = Best performer in dataset
- ~50 = OECD average
- Higher values = Better outcomes for all dimensions

Columns:
- country: Country name
- country_code: ISO 3-letter code (for mapping)
- composite_index: Average across all dimensions
- [dimension]: Normalized score (0-100)
- [dimension]_gap: Difference from OECD average

",
    );

    let _ = writeln!(
        out,
        "Inverted Measures (lower raw values = higher normalized scores):"
    );
    let inverted: Vec<_> = config
        .inverted_dimensions()
        .into_iter()
        .filter(|d| table.has_dimension(*d))
        .collect();
    if inverted.is_empty() {
        let _ = writeln!(out, "- none");
    }
    for dim in inverted {
        let description = config
            .measure_for(dim)
            .map(|m| m.description.to_lowercase())
            .unwrap_or_default();
        let _ = writeln!(out, "- {} ({})", dim.key(), description);
    }
    let _ = writeln!(out);

    let top_n = config.transform.metadata_top_n;
    let _ = writeln!(out, "Top {top_n} Countries:");
    for (idx, record) in table.records().iter().take(top_n).enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({:.1})",
            idx + 1,
            record.country,
            record.composite_index
        );
    }

    out
}
