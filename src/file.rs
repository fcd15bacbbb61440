// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::options::{ExportFormat, ExportOptions};
use crate::csv::{parse_rows, to_export_string};
use crate::error::{Error, ErrorKind, Result};
use crate::table::DataSet;

/// Read an uploaded table. Delimiter comes from the extension (`.tsv` → tab,
/// anything else → comma); the first row is the header row.
pub fn read_table(path: &Path) -> Result<DataSet> {
    let text = fs::read_to_string(path).map_err(|e| {
        Error::with_source(ErrorKind::Io, format!("Cannot read {}: {e}", path.display()), e)
    })?;
    let sep = ExportFormat::from_path(path).delim();
    let ds = DataSet::from_parsed(parse_rows(&text, sep));
    logd!("File: Read {} (rows={}, headers={})", path.display(), ds.row_count(), ds.header_count());
    Ok(ds)
}

/// Write one export file based on ExportOptions (path, headers policy, delimiter).
/// Returns the final path written to.
pub fn write_export(export: &ExportOptions, ds: &DataSet) -> Result<PathBuf> {
    let path = export.out_path();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let contents = to_export_string(&ds.headers, &ds.rows, export.include_headers, export.delim());
    fs::write(&path, contents).map_err(|e| {
        Error::with_source(ErrorKind::Io, format!("Cannot write {}: {e}", path.display()), e)
    })?;
    logf!("File: Wrote {} (rows={})", path.display(), ds.row_count());
    Ok(path)
}

pub fn normalize_separators(p: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR;
    p.chars().map(|c| if c == '/' || c == '\\' { sep } else { c }).collect()
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::new(
            ErrorKind::Io,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
