// src/runner.rs
use std::path::PathBuf;

use crate::{
    client::{AnalysisClient, HttpAnalysisClient},
    config::options::{ColumnMap, Platform, ProcessorOptions},
    core::sanitize::github_login,
    error::{Error, Result},
    file::{read_table, write_export},
    progress::Progress,
    record::ProfileRecord,
    service::AnalysisService,
    table::{DataSet, ResultTable},
};

/// Summary of what was produced.
pub struct RunSummary {
    pub table: ResultTable,
    pub written: PathBuf,
}

/// Drives one analysis run over an input table: one call per non-empty cell of
/// the platform's column, in row order, one record per call.
pub struct RowProcessor<'a, C: AnalysisClient + ?Sized> {
    client: &'a C,
    columns: &'a ColumnMap,
}

impl<'a, C: AnalysisClient + ?Sized> RowProcessor<'a, C> {
    pub fn new(client: &'a C, columns: &'a ColumnMap) -> Self {
        Self { client, columns }
    }

    /// Fails only when the platform's column is missing; nothing is called then.
    /// Per-row failures become records with an error status.
    pub fn process(
        &self,
        table: &DataSet,
        platform: Platform,
        progress: Option<&mut (dyn Progress + '_)>,
    ) -> Result<ResultTable> {
        let column = self.columns.column_for(platform);
        let Some(col) = table.column_index(column) else {
            loge!("Runner: column {column:?} missing (headers={:?})", table.headers);
            return Err(Error::config(format!("CSV must contain the column: {column}")));
        };

        let cells: Vec<&str> = table.non_empty_cells(col).collect();
        logf!("Runner: {platform} run over {} identifiers", cells.len());

        let out = match platform {
            Platform::GitHub => ResultTable::GitHub(analyze_all(&cells, progress, |raw| {
                self.client.github(&github_login(raw))
            })),
            Platform::LeetCode => {
                ResultTable::LeetCode(analyze_all(&cells, progress, |raw| self.client.leetcode(raw)))
            }
        };
        logf!("Runner: done ({} of {} found)", out.found_count(), out.len());
        Ok(out)
    }
}

fn analyze_all<R: ProfileRecord>(
    cells: &[&str],
    mut progress: Option<&mut (dyn Progress + '_)>,
    call: impl Fn(&str) -> Result<R>,
) -> Vec<R> {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(cells.len());
    }

    let mut out = Vec::with_capacity(cells.len());
    for (i, raw) in cells.iter().copied().enumerate() {
        let rec = match call(raw) {
            Ok(rec) => rec,
            Err(e) => {
                loge!("Runner: row {} ({raw}) failed: {e}", i + 1);
                R::failed(raw, e.kind(), e.message)
            }
        };
        logd!("Runner: row {} ({raw}) → {}: {}", i + 1, rec.username(), rec.status());
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(i, raw, rec.status());
        }
        out.push(rec);
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    out
}

/// Top-level runner: read the input, analyze every row, write the export.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(opts: &ProcessorOptions, mut progress: Option<&mut (dyn Progress + '_)>) -> Result<RunSummary> {
    let input = read_table(&opts.input)?;
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Read {} rows from {}", input.row_count(), opts.input.display()));
    }

    let table = if opts.local {
        let service = AnalysisService::from_options(opts.upstream.clone())?;
        RowProcessor::new(&service, &opts.columns).process(&input, opts.platform, progress.as_deref_mut())?
    } else {
        let client = HttpAnalysisClient::new(&opts.service_url, opts.timeout)?;
        RowProcessor::new(&client, &opts.columns).process(&input, opts.platform, progress.as_deref_mut())?
    };

    let written = write_export(&opts.export, &table.to_dataset())?;
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Wrote {}", written.display()));
    }
    Ok(RunSummary { table, written })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::record::{GitHubProfileRecord, LeetCodeProfileRecord, Status};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Scripted {
        calls: RefCell<Vec<String>>,
    }

    impl AnalysisClient for Scripted {
        fn github(&self, login: &str) -> Result<GitHubProfileRecord> {
            self.calls.borrow_mut().push(s!(login));
            if login == "slow" {
                return Err(Error::transport("timed out"));
            }
            Ok(GitHubProfileRecord::placeholder(login, "", Status::Found))
        }

        fn leetcode(&self, url: &str) -> Result<LeetCodeProfileRecord> {
            self.calls.borrow_mut().push(s!(url));
            Ok(LeetCodeProfileRecord::placeholder(url, url, Status::NotFound))
        }
    }

    fn table(header: &str, cells: &[&str]) -> DataSet {
        DataSet {
            headers: Some(vec![s!("Name"), s!(header)]),
            rows: cells.iter().map(|c| vec![s!("x"), s!(*c)]).collect(),
        }
    }

    #[test]
    fn skips_blank_cells_and_keeps_order() {
        let client = Scripted::default();
        let cols = ColumnMap::default();
        let ds = table(&cols.github, &["b", "", "  ", "https://github.com/a/", "c"]);
        let out = RowProcessor::new(&client, &cols).process(&ds, Platform::GitHub, None).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(*client.calls.borrow(), vec![s!("b"), s!("a"), s!("c")]);
    }

    #[test]
    fn failed_call_becomes_error_row() {
        let client = Scripted::default();
        let cols = ColumnMap::default();
        let ds = table(&cols.github, &["octocat", "slow", "torvalds"]);
        let ResultTable::GitHub(recs) =
            RowProcessor::new(&client, &cols).process(&ds, Platform::GitHub, None).unwrap()
        else {
            panic!("wrong platform");
        };
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[1].username, "slow");
        assert_eq!(recs[1].profile_url, "slow");
        assert_eq!(recs[1].status, Status::failed(ErrorKind::Transport, "timed out"));
        assert!(recs[2].status.is_found());
    }

    #[test]
    fn leetcode_cells_are_passed_through() {
        let client = Scripted::default();
        let cols = ColumnMap::default();
        let ds = table(&cols.leetcode, &[" https://leetcode.com/u/alice/ "]);
        let out = RowProcessor::new(&client, &cols).process(&ds, Platform::LeetCode, None).unwrap();
        assert_eq!(out.platform(), Platform::LeetCode);
        assert_eq!(*client.calls.borrow(), vec![s!("https://leetcode.com/u/alice/")]);
    }

    #[test]
    fn missing_column_makes_no_calls() {
        let client = Scripted::default();
        let cols = ColumnMap::default();
        let ds = table("Something else", &["octocat"]);
        let err = RowProcessor::new(&client, &cols).process(&ds, Platform::GitHub, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.message, "CSV must contain the column: This is my GitHub ID");
        assert!(client.calls.borrow().is_empty());
    }

    #[derive(Default)]
    struct Recorder {
        begun: Vec<usize>,
        done: Vec<String>,
        logs: usize,
        finished: usize,
    }

    impl Progress for Recorder {
        fn begin(&mut self, total: usize) { self.begun.push(total); }
        fn log(&mut self, _msg: &str) { self.logs += 1; }
        fn item_done(&mut self, _index: usize, identifier: &str, status: &Status) {
            self.done.push(format!("{identifier}: {status}"));
        }
        fn finish(&mut self) { self.finished += 1; }
    }

    #[test]
    fn one_progress_sink_spans_several_passes() {
        let client = Scripted::default();
        let cols = ColumnMap::default();
        let processor = RowProcessor::new(&client, &cols);
        let mut sink = Recorder::default();

        let mut progress: Option<&mut dyn Progress> = Some(&mut sink);
        processor
            .process(&table(&cols.github, &["octocat", "slow"]), Platform::GitHub, progress.as_deref_mut())
            .unwrap();
        processor
            .process(&table(&cols.leetcode, &["alice"]), Platform::LeetCode, progress.as_deref_mut())
            .unwrap();
        if let Some(p) = progress.as_deref_mut() {
            p.log("after both passes");
        }
        drop(progress);

        assert_eq!(sink.begun, vec![2, 1]);
        assert_eq!(sink.finished, 2);
        assert_eq!(sink.logs, 1);
        assert_eq!(
            sink.done,
            vec![
                s!("octocat: ✅ Found"),
                s!("slow: ❌ Request Failed: timed out"),
                s!("alice: ❌ Not Found"),
            ]
        );
    }
}
