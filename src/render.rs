//! Output of the ordered batch as a table or a JSON document.

use crate::types::VersionRecord;
use anyhow::{Context, Result};
use std::io::Write;

const HEADERS: [&str; 3] = ["Location", "RPVersion", "OCPVersions"];
const COLUMN_GAP: &str = "   ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl From<&str> for OutputFormat {
    /// Anything other than `json` falls back to the table.
    fn from(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

/// Writes `records` as given; no sorting or filtering happens here.
pub fn render<W: Write>(records: &[VersionRecord], format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Json => render_json(records, out),
        OutputFormat::Table => render_table(records, out),
    }
}

fn render_json<W: Write>(records: &[VersionRecord], out: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)
        .context("Failed to marshal the result in json format")?;
    writeln!(out).context("Failed to write output")?;
    Ok(())
}

fn render_table<W: Write>(records: &[VersionRecord], out: &mut W) -> Result<()> {
    let rows: Vec<[String; 3]> = records
        .iter()
        .map(|r| {
            [
                r.location.clone(),
                r.rp_version.clone(),
                r.ocp_versions.join(", "),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, &HEADERS.map(String::from), &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[String; 3], widths: &[usize; 3]) -> Result<()> {
    let [location, rp, ocp] = cells;
    let line = format!(
        "{:<w0$}{gap}{:<w1$}{gap}{}",
        location,
        rp,
        ocp,
        w0 = widths[0],
        w1 = widths[1],
        gap = COLUMN_GAP,
    );
    writeln!(out, "{}", line.trim_end_matches(' ')).context("Failed to write output")?;
    Ok(())
}
