// src/config/options.rs
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::consts::*;
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    GitHub,
    LeetCode,
}

impl Platform {
    pub fn label(&self) -> &'static str {
        match self {
            Platform::GitHub => "GitHub",
            Platform::LeetCode => "LeetCode",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" | "gh" => Ok(Platform::GitHub),
            "leetcode" | "lc" => Ok(Platform::LeetCode),
            other => Err(Error::config(format!("Unknown platform: {other}"))),
        }
    }
}

/// Platform → name of the input column holding its identifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub github: String,
    pub leetcode: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            github: s!(GITHUB_COLUMN),
            leetcode: s!(LEETCODE_COLUMN),
        }
    }
}

impl ColumnMap {
    pub fn column_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::GitHub => &self.github,
            Platform::LeetCode => &self.leetcode,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }

    /// Guess from a file extension; anything that isn't `.tsv` reads as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => ExportFormat::Tsv,
            _ => ExportFormat::Csv,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(Error::config(format!("Unknown format: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_headers: bool,
    out_path: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            include_headers: true,
            out_path: PathBuf::from(DEFAULT_OUT_FILE),
        }
    }
}

impl ExportOptions {
    /// Final file path. A directory hint (existing dir or trailing separator)
    /// gets the default file name, with the extension following `format`.
    pub fn out_path(&self) -> PathBuf {
        if crate::file::looks_like_dir_hint(&self.out_path) || self.out_path.is_dir() {
            let stem = Path::new(DEFAULT_OUT_FILE)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| s!("profile_analysis"));
            return self.out_path.join(join!(&stem, ".", self.format.ext()));
        }
        self.out_path.clone()
    }

    pub fn set_path(&mut self, text: &str) {
        self.out_path = PathBuf::from(crate::file::normalize_separators(text.trim()));
    }

    pub fn delim(&self) -> char {
        self.format.delim()
    }
}

/// Everything the row processor needs for one run.
#[derive(Clone, Debug)]
pub struct ProcessorOptions {
    pub platform: Platform,
    pub input: PathBuf,
    pub service_url: String,
    pub timeout: Duration,
    pub columns: ColumnMap,
    pub export: ExportOptions,
    pub quiet: bool,
    /// Call the upstreams in-process instead of going through `service_url`.
    pub local: bool,
    /// Upstream settings used when `local` is set.
    pub upstream: ServiceOptions,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            platform: Platform::GitHub,
            input: PathBuf::new(),
            service_url: s!(DEFAULT_SERVICE_URL),
            timeout: Duration::from_secs(CLIENT_TIMEOUT_SECS),
            columns: ColumnMap::default(),
            export: ExportOptions::default(),
            quiet: false,
            local: false,
            upstream: ServiceOptions::default(),
        }
    }
}

/// Analysis service configuration: where to listen and which upstreams to call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceOptions {
    pub bind: String,
    pub github_api: String,
    pub github_profile_base: String,
    pub leetcode_graphql: String,
    pub leetcode_profile_base: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            bind: s!(DEFAULT_BIND),
            github_api: s!(GITHUB_API),
            github_profile_base: s!(GITHUB_PROFILE_BASE),
            leetcode_graphql: s!(LEETCODE_GRAPHQL),
            leetcode_profile_base: s!(LEETCODE_PROFILE_BASE),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            user_agent: s!(USER_AGENT),
        }
    }
}
