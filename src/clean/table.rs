// src/clean/table.rs

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Terminator, Trim, WriterBuilder};
use std::{collections::HashSet, fs, io::Write, path::Path};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

/// A whole CSV held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column names from the header row.
    pub headers: Vec<String>,
    /// Each data row, padded to `headers.len()` fields.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse a headed CSV file.
    ///
    /// Headers are trimmed, fields are kept as written, blank lines are skipped.
    /// Rows shorter than the header are padded with empty fields; longer rows
    /// are an error.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_path(path)
            .with_context(|| format!("opening CSV {:?}", path))?;

        let headers: Vec<String> = rdr
            .headers()
            .with_context(|| format!("reading header row of {:?}", path))?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.is_empty() {
            bail!("no columns to parse in {:?}", path);
        }
        let width = headers.len();

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result
                .with_context(|| format!("CSV parse error in {:?} at record {}", path, idx))?;
            if record.len() > width {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                bail!(
                    "{:?} line {}: expected {} fields, saw {}",
                    path,
                    line,
                    width,
                    record.len()
                );
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.len() < width {
                trace!(record = idx, fields = row.len(), "padding short record");
                row.resize(width, String::new());
            }
            rows.push(row);
        }

        debug!(columns = width, rows = rows.len(), "parsed table");
        Ok(Table { headers, rows })
    }

    /// Drop rows equal to an earlier row, keeping survivors in order.
    /// Returns how many rows were removed.
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// Write header + rows as comma-delimited CSV with minimal quoting.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(out);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write to a temp file beside `path`, then rename it over `path`.
    pub fn write_csv_atomic(&self, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;

        let tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {:?}", dir))?;
        self.write_csv(tmp.as_file())
            .with_context(|| format!("writing CSV to {:?}", tmp.path()))?;
        tmp.persist(path)
            .with_context(|| format!("renaming temp file over {:?}", path))?;
        Ok(())
    }
}
