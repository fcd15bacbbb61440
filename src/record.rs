// src/record.rs
//! Output records, one per input row.
//!
//! Fields are typed internally. The wire/export shape (keys with spaces,
//! `"N/A"` placeholders, emoji status strings) only appears in the serde
//! impls and in `ProfileRecord::to_row`.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::config::consts::NOT_APPLICABLE;
use crate::error::ErrorKind;

/* ---------------- Count ---------------- */

/// A non-negative count, or the "not applicable" marker when it couldn't be fetched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Count {
    Value(u64),
    #[default]
    NotApplicable,
}

impl From<u64> for Count {
    fn from(v: u64) -> Self {
        Count::Value(v)
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::Value(v) => write!(f, "{v}"),
            Count::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Count::Value(v) => serializer.serialize_u64(*v),
            Count::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountVisitor;

        impl<'de> Visitor<'de> for CountVisitor {
            type Value = Count;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a non-negative integer or \"{NOT_APPLICABLE}\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Count, E> {
                Ok(Count::Value(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Count, E> {
                u64::try_from(v)
                    .map(Count::Value)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Count, E> {
                if v == NOT_APPLICABLE {
                    return Ok(Count::NotApplicable);
                }
                v.trim()
                    .parse::<u64>()
                    .map(Count::Value)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Count, E> {
                Ok(Count::NotApplicable)
            }
        }

        deserializer.deserialize_any(CountVisitor)
    }
}

/* ---------------- Status ---------------- */

const FOUND: &str = "✅ Found";
const NOT_FOUND: &str = "❌ Not Found";
const FAILED_PREFIX: &str = "❌ ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Found,
    /// The upstream explicitly reported the login doesn't exist (GitHub 404).
    NotFound,
    Failed { kind: ErrorKind, message: String },
}

impl Status {
    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Status::Failed { kind, message: message.into() }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Status::Found)
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Status::Found => None,
            Status::NotFound => Some(ErrorKind::NotFound),
            Status::Failed { kind, .. } => Some(*kind),
        }
    }

    /// Inverse of `Display`. Strings we don't recognise become an upstream failure
    /// carrying the original text, so nothing the service says is lost.
    pub fn parse(s: &str) -> Status {
        match s {
            FOUND => return Status::Found,
            NOT_FOUND => return Status::NotFound,
            _ => {}
        }
        if let Some(rest) = s.strip_prefix(FAILED_PREFIX) {
            if let Some((label, message)) = rest.split_once(": ") {
                if let Some(kind) = ErrorKind::from_label(label) {
                    return Status::failed(kind, message);
                }
            }
        }
        Status::failed(ErrorKind::Upstream, s)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Found => f.write_str(FOUND),
            Status::NotFound => f.write_str(NOT_FOUND),
            Status::Failed { kind, message } => {
                write!(f, "{FAILED_PREFIX}{}: {message}", kind.label())
            }
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Status::parse(&s))
    }
}

/* ---------------- Records ---------------- */

/// Shared behaviour the row processor and the table layer rely on.
pub trait ProfileRecord: Clone {
    /// Export/display column order.
    const HEADERS: &'static [&'static str];

    fn username(&self) -> &str;
    fn status(&self) -> &Status;
    fn to_row(&self) -> Vec<String>;

    /// Stand-in for a row whose service call failed: the raw cell value fills
    /// both Username and Profile URL, all counts are placeholders.
    fn failed(raw: &str, kind: ErrorKind, message: impl Into<String>) -> Self;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubProfileRecord {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Profile URL")]
    pub profile_url: String,
    #[serde(rename = "Public Repos")]
    pub public_repos: Count,
    #[serde(rename = "Followers")]
    pub followers: Count,
    #[serde(rename = "Following")]
    pub following: Count,
    #[serde(rename = "Status")]
    pub status: Status,
}

impl GitHubProfileRecord {
    /// Same record shape with every count set to the placeholder.
    pub fn placeholder(username: impl Into<String>, profile_url: impl Into<String>, status: Status) -> Self {
        Self {
            username: username.into(),
            profile_url: profile_url.into(),
            public_repos: Count::NotApplicable,
            followers: Count::NotApplicable,
            following: Count::NotApplicable,
            status,
        }
    }
}

impl ProfileRecord for GitHubProfileRecord {
    const HEADERS: &'static [&'static str] =
        &["Username", "Profile URL", "Public Repos", "Followers", "Following", "Status"];

    fn username(&self) -> &str { &self.username }
    fn status(&self) -> &Status { &self.status }

    fn to_row(&self) -> Vec<String> {
        cells![
            self.username,
            self.profile_url,
            self.public_repos,
            self.followers,
            self.following,
            self.status,
        ]
    }

    fn failed(raw: &str, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::placeholder(raw, raw, Status::failed(kind, message))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeetCodeProfileRecord {
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Profile URL")]
    pub profile_url: String,
    #[serde(rename = "Total Solved")]
    pub total_solved: Count,
    #[serde(rename = "Easy Solved")]
    pub easy_solved: Count,
    #[serde(rename = "Medium Solved")]
    pub medium_solved: Count,
    #[serde(rename = "Hard Solved")]
    pub hard_solved: Count,
    #[serde(rename = "Status")]
    pub status: Status,
}

impl LeetCodeProfileRecord {
    pub fn placeholder(username: impl Into<String>, profile_url: impl Into<String>, status: Status) -> Self {
        Self {
            username: username.into(),
            profile_url: profile_url.into(),
            total_solved: Count::NotApplicable,
            easy_solved: Count::NotApplicable,
            medium_solved: Count::NotApplicable,
            hard_solved: Count::NotApplicable,
            status,
        }
    }
}

impl ProfileRecord for LeetCodeProfileRecord {
    const HEADERS: &'static [&'static str] = &[
        "Username",
        "Profile URL",
        "Total Solved",
        "Easy Solved",
        "Medium Solved",
        "Hard Solved",
        "Status",
    ];

    fn username(&self) -> &str { &self.username }
    fn status(&self) -> &Status { &self.status }

    fn to_row(&self) -> Vec<String> {
        cells![
            self.username,
            self.profile_url,
            self.total_solved,
            self.easy_solved,
            self.medium_solved,
            self.hard_solved,
            self.status,
        ]
    }

    fn failed(raw: &str, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::placeholder(raw, raw, Status::failed(kind, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn github_record_wire_shape() {
        let rec = GitHubProfileRecord {
            username: s!("octocat"),
            profile_url: s!("https://github.com/octocat"),
            public_repos: Count::Value(8),
            followers: Count::Value(100),
            following: Count::Value(9),
            status: Status::Found,
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            v,
            json!({
                "Username": "octocat",
                "Profile URL": "https://github.com/octocat",
                "Public Repos": 8,
                "Followers": 100,
                "Following": 9,
                "Status": "✅ Found"
            })
        );
    }

    #[test]
    fn placeholders_serialize_as_marker() {
        let rec = LeetCodeProfileRecord::placeholder("x", "y", Status::failed(ErrorKind::Transport, "timed out"));
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["Total Solved"], "N/A");
        assert_eq!(v["Hard Solved"], "N/A");
        assert_eq!(v["Status"], "❌ Request Failed: timed out");
    }

    #[test]
    fn count_accepts_integers_and_marker() {
        let c: Count = serde_json::from_value(json!(5)).unwrap();
        assert_eq!(c, Count::Value(5));
        let c: Count = serde_json::from_value(json!("N/A")).unwrap();
        assert_eq!(c, Count::NotApplicable);
        let c: Count = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(c, Count::NotApplicable);
        assert!(serde_json::from_value::<Count>(json!(-1)).is_err());
        assert!(serde_json::from_value::<Count>(json!("lots")).is_err());
    }

    #[test]
    fn status_display_and_parse() {
        let cases = [
            Status::Found,
            Status::NotFound,
            Status::failed(ErrorKind::Upstream, "403 Forbidden: rate limited"),
            Status::failed(ErrorKind::NotFound, "user not found"),
        ];
        for st in cases {
            assert_eq!(Status::parse(&st.to_string()), st);
        }
        assert_eq!(
            Status::parse("something odd"),
            Status::failed(ErrorKind::Upstream, "something odd")
        );
    }

    #[test]
    fn rows_follow_header_order() {
        let rec = GitHubProfileRecord::failed("raw value", ErrorKind::Transport, "boom");
        let row = rec.to_row();
        assert_eq!(row.len(), GitHubProfileRecord::HEADERS.len());
        assert_eq!(row[0], "raw value");
        assert_eq!(row[1], "raw value");
        assert_eq!(row[2], "N/A");
        assert_eq!(row[5], "❌ Request Failed: boom");
    }
}
