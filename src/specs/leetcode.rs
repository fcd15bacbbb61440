// src/specs/leetcode.rs
//
// LeetCode GraphQL: POST {graphql} with the fixed `getUserProfile` query.
//
// Answer shape:
//   data.matchedUser.submitStats.acSubmissionNum = [{difficulty, count}, ...]
// One entry has difficulty "All" (the aggregate); it is never added to the total.
// `matchedUser: null` means the login doesn't exist.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::options::ServiceOptions;
use crate::core::net::{Reply, Transport};
use crate::core::sanitize::{derive_login, is_leetcode_url};
use crate::error::{Error, ErrorKind};
use crate::record::{Count, LeetCodeProfileRecord, Status};

pub const QUERY: &str = "
    query getUserProfile($username: String!) {
        matchedUser(username: $username) {
            submitStats: submitStatsGlobal {
                acSubmissionNum {
                    difficulty
                    count
                }
            }
        }
    }
";

const AGGREGATE: &str = "All";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Data>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Data {
    #[serde(rename = "matchedUser", default)]
    matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
struct MatchedUser {
    #[serde(rename = "submitStats")]
    submit_stats: SubmitStats,
}

#[derive(Debug, Deserialize)]
struct SubmitStats {
    #[serde(rename = "acSubmissionNum")]
    ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DifficultyCount {
    pub difficulty: String,
    pub count: u64,
}

/// Solved counts by difficulty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub total: u64,
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

/// Total = sum over every entry except the "All" aggregate.
/// A difficulty missing from the list counts as 0; the first entry for a label wins.
pub fn tally(stats: &[DifficultyCount]) -> Tally {
    let pick = |label: &str| {
        stats
            .iter()
            .find(|s| s.difficulty == label)
            .map(|s| s.count)
            .unwrap_or(0)
    };
    Tally {
        total: stats
            .iter()
            .filter(|s| s.difficulty != AGGREGATE)
            .map(|s| s.count)
            .sum(),
        easy: pick("Easy"),
        medium: pick("Medium"),
        hard: pick("Hard"),
    }
}

pub fn request_body(login: &str) -> Value {
    json!({
        "query": QUERY,
        "variables": { "username": login },
    })
}

pub fn profile_url(profile_base: &str, login: &str) -> String {
    format!("{}/{}/", profile_base.trim_end_matches('/'), login)
}

/// Profile URL for a failed lookup: the user's own link when they gave one.
fn fallback_url(input: &str, login: &str, profile_base: &str) -> String {
    let input = input.trim();
    if is_leetcode_url(input) { s!(input) } else { profile_url(profile_base, login) }
}

/// Turn one upstream reply into a record. `input` is the raw value the user supplied.
pub fn extract(input: &str, reply: &Reply, profile_base: &str) -> LeetCodeProfileRecord {
    let login = derive_login(input);
    let failed = |kind: ErrorKind, message: String| {
        LeetCodeProfileRecord::placeholder(
            login.as_str(),
            fallback_url(input, &login, profile_base),
            Status::failed(kind, message),
        )
    };

    if !reply.is_success() {
        return failed(ErrorKind::Upstream, reply.status_line());
    }

    let parsed: GraphQlResponse = match serde_json::from_str(&reply.body) {
        Ok(p) => p,
        Err(e) => {
            let err = Error::from(e);
            return failed(err.kind(), err.message);
        }
    };

    let Some(user) = parsed.data.and_then(|d| d.matched_user) else {
        let message = parsed
            .errors
            .first()
            .map(|e| e.message.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| s!("user not found"));
        return LeetCodeProfileRecord::placeholder(
            login.as_str(),
            profile_url(profile_base, &login),
            Status::failed(ErrorKind::NotFound, message),
        );
    };

    let t = tally(&user.submit_stats.ac_submission_num);
    LeetCodeProfileRecord {
        username: login.clone(),
        profile_url: profile_url(profile_base, &login),
        total_solved: Count::Value(t.total),
        easy_solved: Count::Value(t.easy),
        medium_solved: Count::Value(t.medium),
        hard_solved: Count::Value(t.hard),
        status: Status::Found,
    }
}

/// One upstream call for the profile link (or bare username) `input`.
/// Never fails; errors end up in the record's status.
pub fn fetch(transport: &dyn Transport, opts: &ServiceOptions, input: &str) -> LeetCodeProfileRecord {
    let login = derive_login(input);
    match transport.post_json(&opts.leetcode_graphql, &request_body(&login)) {
        Ok(reply) => {
            logd!("LeetCode: {login} → {}", reply.status);
            extract(input, &reply, &opts.leetcode_profile_base)
        }
        Err(e) => {
            loge!("LeetCode: {login} request failed: {e}");
            LeetCodeProfileRecord::placeholder(
                login.as_str(),
                fallback_url(input, &login, &opts.leetcode_profile_base),
                Status::failed(e.kind(), e.message),
            )
        }
    }
}
