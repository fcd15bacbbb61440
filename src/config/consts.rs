// src/config/consts.rs

// Required input columns (the form's question text)
pub const GITHUB_COLUMN: &str = "This is my GitHub ID";
pub const LEETCODE_COLUMN: &str = "Paste your Leetcode profile link";

// Upstream
pub const GITHUB_API: &str = "https://api.github.com";
pub const GITHUB_PROFILE_BASE: &str = "https://github.com";
pub const GITHUB_HOST_MARKER: &str = "github.com";
pub const LEETCODE_GRAPHQL: &str = "https://leetcode.com/graphql/";
pub const LEETCODE_PROFILE_BASE: &str = "https://leetcode.com";
pub const LEETCODE_HOST_MARKER: &str = "leetcode.com";
pub const ACCEPT_JSON: &str = "application/json";
pub const USER_AGENT: &str = concat!("profile_scan/", env!("CARGO_PKG_VERSION"));

// Per-call timeout for every upstream request
pub const TIMEOUT_SECS: u64 = 10;
// Row processor → service; must outlast the service's own upstream timeout
pub const CLIENT_TIMEOUT_SECS: u64 = TIMEOUT_SECS + 5;

// Service
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";

// Export
pub const DEFAULT_OUT_FILE: &str = "profile_analysis.csv";

// Placeholder for counts that could not be obtained
pub const NOT_APPLICABLE: &str = "N/A";

// Logging
pub const LOG_FILE: &str = ".store/debug.log";
pub const LOG_ENV: &str = "PROFILE_SCAN_LOG";
