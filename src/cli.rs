// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use crate::config::options::{ExportFormat, ProcessorOptions, ServiceOptions};
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::record::Status;

pub const PROCESSOR_HELP: &str = include_str!("cli_help.txt");
pub const SERVICE_HELP: &str = include_str!("service_help.txt");

pub enum Command<T> {
    Run(T),
    Help,
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| Error::config(format!("Missing value for {flag}")))
}

fn timeout(v: &str) -> Result<Duration> {
    let secs: f64 = v
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("Invalid timeout: {v}")))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(Error::config(format!("Timeout must be positive: {v}")));
    }
    Ok(Duration::from_secs_f64(secs))
}

/// Row processor flags. `args` excludes the program name.
pub fn parse_processor_args(args: impl IntoIterator<Item = String>) -> Result<Command<ProcessorOptions>> {
    let mut opts = ProcessorOptions::default();
    let mut args = args.into_iter();
    let mut explicit_format = false;
    let mut have_input = false;

    while let Some(a) = args.next() {
        match a.as_str() {
            "-p" | "--platform" => opts.platform = value(&mut args, &a)?.parse()?,
            "-i" | "--input" => {
                opts.input = PathBuf::from(value(&mut args, &a)?);
                have_input = true;
            }
            "-s" | "--service" => opts.service_url = value(&mut args, &a)?,
            "--local" => opts.local = true,
            "-o" | "--out" => opts.export.set_path(&value(&mut args, &a)?),
            "--format" => {
                opts.export.format = value(&mut args, &a)?.parse()?;
                explicit_format = true;
            }
            "--no-headers" => opts.export.include_headers = false,
            "--timeout" => {
                let t = timeout(&value(&mut args, &a)?)?;
                opts.timeout = t;
                opts.upstream.timeout = t;
            }
            "-q" | "--quiet" => opts.quiet = true,
            "--github-column" => opts.columns.github = value(&mut args, &a)?,
            "--leetcode-column" => opts.columns.leetcode = value(&mut args, &a)?,
            "--github-api" => opts.upstream.github_api = value(&mut args, &a)?,
            "--leetcode-api" => opts.upstream.leetcode_graphql = value(&mut args, &a)?,
            "-h" | "--help" => return Ok(Command::Help),
            other if !other.starts_with('-') && !have_input => {
                opts.input = PathBuf::from(other);
                have_input = true;
            }
            other => return Err(Error::config(format!("Unknown arg: {other}"))),
        }
    }

    if !have_input {
        return Err(Error::config("Missing input table (--input <file.csv>)"));
    }
    if !explicit_format {
        opts.export.format = ExportFormat::from_path(&opts.export.out_path());
    }
    Ok(Command::Run(opts))
}

/// Analysis service flags. `args` excludes the program name.
pub fn parse_service_args(args: impl IntoIterator<Item = String>) -> Result<Command<ServiceOptions>> {
    let mut opts = ServiceOptions::default();
    let mut args = args.into_iter();

    while let Some(a) = args.next() {
        match a.as_str() {
            "-b" | "--bind" => opts.bind = value(&mut args, &a)?,
            "--timeout" => opts.timeout = timeout(&value(&mut args, &a)?)?,
            "--github-api" => opts.github_api = value(&mut args, &a)?,
            "--leetcode-api" => opts.leetcode_graphql = value(&mut args, &a)?,
            "-h" | "--help" => return Ok(Command::Help),
            other => return Err(Error::config(format!("Unknown arg: {other}"))),
        }
    }
    Ok(Command::Run(opts))
}

/// Prints one line per row to stderr; stdout stays free for the table.
pub struct ConsoleProgress {
    quiet: bool,
    total: usize,
}

impl ConsoleProgress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet, total: 0 }
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        if !self.quiet {
            eprintln!("Analyzing {total} profiles...");
        }
    }

    fn log(&mut self, msg: &str) {
        if !self.quiet {
            eprintln!("{msg}");
        }
    }

    fn item_done(&mut self, index: usize, identifier: &str, status: &Status) {
        if !self.quiet {
            eprintln!("[{}/{}] {identifier}: {status}", index + 1, self.total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::Platform;
    use crate::error::ErrorKind;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s!(*s)).collect()
    }

    fn run(list: &[&str]) -> ProcessorOptions {
        match parse_processor_args(args(list)).unwrap() {
            Command::Run(o) => o,
            Command::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn processor_defaults() {
        let o = run(&["responses.csv"]);
        assert_eq!(o.input, PathBuf::from("responses.csv"));
        assert_eq!(o.platform, Platform::GitHub);
        assert_eq!(o.service_url, "http://127.0.0.1:8000");
        assert_eq!(o.export.out_path(), PathBuf::from("profile_analysis.csv"));
        assert!(o.export.include_headers);
        assert!(!o.local);
        assert_eq!(o.timeout, Duration::from_secs(15));
        assert_eq!(o.upstream.timeout, Duration::from_secs(10));
    }

    #[test]
    fn processor_flags() {
        let o = run(&[
            "--platform", "LeetCode", "-i", "in.tsv", "-o", "out.tsv", "--no-headers",
            "--timeout", "2.5", "--leetcode-column", "LC", "--local", "-q",
        ]);
        assert_eq!(o.platform, Platform::LeetCode);
        assert_eq!(o.export.format, ExportFormat::Tsv);
        assert!(!o.export.include_headers);
        assert_eq!(o.timeout, Duration::from_millis(2500));
        assert_eq!(o.upstream.timeout, Duration::from_millis(2500));
        assert_eq!(o.columns.leetcode, "LC");
        assert!(o.local && o.quiet);
    }

    #[test]
    fn processor_errors() {
        let err = parse_processor_args(args(&[])).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(parse_processor_args(args(&["a.csv", "--bogus"])).is_err());
        assert!(parse_processor_args(args(&["a.csv", "--timeout", "0"])).is_err());
        assert!(parse_processor_args(args(&["a.csv", "--platform"])).is_err());
        assert!(parse_processor_args(args(&["a.csv", "--platform", "gitlab"])).is_err());
        assert!(matches!(parse_processor_args(args(&["-h"])).unwrap(), Command::Help));
    }

    #[test]
    fn service_flags() {
        let Command::Run(o) = parse_service_args(args(&["--bind", "0.0.0.0:9000", "--timeout", "3"])).unwrap() else {
            panic!("unexpected help");
        };
        assert_eq!(o.bind, "0.0.0.0:9000");
        assert_eq!(o.timeout, Duration::from_secs(3));
        assert_eq!(o.github_api, "https://api.github.com");
    }
}
