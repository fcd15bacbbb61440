// src/table.rs
//
// Tabular shapes:
// - DataSet: plain headers + string rows (input tables, export, display).
// - ResultTable: typed output of one run; one record per processed row.

use crate::config::options::Platform;
use crate::core::sanitize::clean_cell;
use crate::record::{GitHubProfileRecord, LeetCodeProfileRecord, ProfileRecord};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    /// First parsed row becomes the header row.
    pub fn from_parsed(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let headers = rows.remove(0);
        Self { headers: Some(headers), rows }
    }

    pub fn row_count(&self) -> usize { self.rows.len() }

    pub fn header_count(&self) -> usize {
        self.headers.as_ref().map(|h| h.len()).unwrap_or(0)
    }

    /// Index of a column by header name. Matching ignores surrounding whitespace and a BOM.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let want = clean_cell(name);
        self.headers.as_ref()?.iter().position(|h| clean_cell(h) == want)
    }

    /// Non-empty cells of one column, in row order, trimmed.
    /// Rows too short to reach the column count as empty.
    pub fn non_empty_cells(&self, col: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .filter_map(move |r| r.get(col))
            .map(|c| clean_cell(c))
            .filter(|c| !c.is_empty())
    }
}

/// Finished output of one run. Every record shares the selected platform's schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultTable {
    GitHub(Vec<GitHubProfileRecord>),
    LeetCode(Vec<LeetCodeProfileRecord>),
}

impl ResultTable {
    pub fn platform(&self) -> Platform {
        match self {
            ResultTable::GitHub(_) => Platform::GitHub,
            ResultTable::LeetCode(_) => Platform::LeetCode,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultTable::GitHub(v) => v.len(),
            ResultTable::LeetCode(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ResultTable::GitHub(_) => GitHubProfileRecord::HEADERS,
            ResultTable::LeetCode(_) => LeetCodeProfileRecord::HEADERS,
        }
    }

    /// How many rows came back with a `Found` status.
    pub fn found_count(&self) -> usize {
        match self {
            ResultTable::GitHub(v) => v.iter().filter(|r| r.status.is_found()).count(),
            ResultTable::LeetCode(v) => v.iter().filter(|r| r.status.is_found()).count(),
        }
    }

    pub fn to_dataset(&self) -> DataSet {
        fn rows<R: ProfileRecord>(records: &[R]) -> Vec<Vec<String>> {
            records.iter().map(|r| r.to_row()).collect()
        }
        let headers = Some(self.headers().iter().map(|h| s!(*h)).collect());
        let rows = match self {
            ResultTable::GitHub(v) => rows(v),
            ResultTable::LeetCode(v) => rows(v),
        };
        DataSet { headers, rows }
    }
}

/* ---------------- Text rendering ---------------- */

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(out: &mut String, cell: &str, w: usize) {
    out.push_str(cell);
    for _ in width(cell)..w {
        out.push(' ');
    }
}

/// Render a DataSet as an aligned plain-text table:
/// header, a dashed rule, then one line per row. Columns are separated by two spaces.
pub fn render_text(ds: &DataSet) -> String {
    let cols = ds
        .rows
        .iter()
        .map(|r| r.len())
        .chain(std::iter::once(ds.header_count()))
        .max()
        .unwrap_or(0);
    if cols == 0 {
        return s!();
    }

    let mut widths = vec![0usize; cols];
    let all_rows = ds.headers.iter().chain(ds.rows.iter());
    for row in all_rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(width(cell));
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, row: &[String]| {
        let mut buf = String::new();
        for ci in 0..cols {
            if ci > 0 { buf.push_str("  "); }
            let cell = row.get(ci).map(|s| s.as_str()).unwrap_or("");
            pad(&mut buf, cell, widths[ci]);
        }
        out.push_str(buf.trim_end());
        out.push('\n');
    };

    if let Some(h) = &ds.headers {
        line(&mut out, h.as_slice());
        let total = widths.iter().sum::<usize>() + 2 * (cols - 1);
        out.push_str(&"-".repeat(total));
        out.push('\n');
    }
    for r in &ds.rows {
        line(&mut out, r.as_slice());
    }
    out
}
