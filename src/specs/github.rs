// src/specs/github.rs
//
// GitHub REST: GET {api}/users/{login}
//
// Reply mapping:
//   2xx + JSON object → Found (missing fields → 0 / "")
//   404               → NotFound, placeholders, constructed profile URL
//   other status      → Failed(Upstream), upstream "message" appended when present
//   non-object body   → Failed(MalformedResponse)
//   transport error   → Failed(Transport)

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use crate::config::options::ServiceOptions;
use crate::core::net::{Reply, Transport};
use crate::error::{Error, ErrorKind, Result};
use crate::record::{Count, GitHubProfileRecord, Status};

/// The subset of `/users/{login}` we read. Everything is optional on purpose:
/// a partial object is still a success.
#[derive(Debug, Default, Deserialize)]
pub struct GitHubUser {
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub public_repos: Option<u64>,
    #[serde(default)]
    pub followers: Option<u64>,
    #[serde(default)]
    pub following: Option<u64>,
}

/// Upstream error bodies look like `{"message": "...", "documentation_url": "..."}`.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// `{api}/users/{login}` with the login as a single escaped path segment,
/// so `/`, `?` and `#` inside it never leave the `users/` path.
pub fn user_url(api_base: &str, login: &str) -> Result<String> {
    let mut url = Url::parse(api_base.trim())
        .map_err(|e| Error::with_source(ErrorKind::Config, format!("Invalid GitHub API URL {api_base:?}"), e))?;
    url.path_segments_mut()
        .map_err(|_| Error::config(format!("GitHub API URL cannot take a path: {api_base}")))?
        .pop_if_empty()
        .push("users")
        .push(login);
    Ok(url.into())
}

pub fn profile_url(profile_base: &str, login: &str) -> String {
    format!("{}/{}", profile_base.trim_end_matches('/'), login)
}

fn upstream_error(reply: &Reply) -> String {
    let status = reply.status_line();
    match serde_json::from_str::<ApiMessage>(&reply.body) {
        Ok(m) if !m.message.trim().is_empty() => format!("{status}: {}", m.message.trim()),
        _ => status,
    }
}

/// Turn one upstream reply into a record.
pub fn extract(login: &str, reply: &Reply, profile_base: &str) -> GitHubProfileRecord {
    if reply.status == 404 {
        return GitHubProfileRecord::placeholder(login, profile_url(profile_base, login), Status::NotFound);
    }
    if !reply.is_success() {
        return GitHubProfileRecord::placeholder(
            login,
            profile_url(profile_base, login),
            Status::failed(ErrorKind::Upstream, upstream_error(reply)),
        );
    }

    match parse_user(&reply.body) {
        Ok(user) => GitHubProfileRecord {
            username: s!(login),
            profile_url: user.html_url.unwrap_or_default(),
            public_repos: Count::Value(user.public_repos.unwrap_or(0)),
            followers: Count::Value(user.followers.unwrap_or(0)),
            following: Count::Value(user.following.unwrap_or(0)),
            status: Status::Found,
        },
        Err(err) => GitHubProfileRecord::placeholder(
            login,
            profile_url(profile_base, login),
            Status::failed(err.kind(), err.message),
        ),
    }
}

/// Only a JSON object is a user; arrays and scalars would otherwise
/// deserialize into an all-default `GitHubUser`.
fn parse_user(body: &str) -> Result<GitHubUser> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(Error::malformed("expected a JSON object for the user"));
    }
    Ok(serde_json::from_value(value)?)
}

/// One upstream call for `login`. Never fails; errors end up in the record's status.
pub fn fetch(transport: &dyn Transport, opts: &ServiceOptions, login: &str) -> GitHubProfileRecord {
    let reply = user_url(&opts.github_api, login).and_then(|url| transport.get(&url));
    match reply {
        Ok(reply) => {
            logd!("GitHub: {login} → {}", reply.status);
            extract(login, &reply, &opts.github_profile_base)
        }
        Err(e) => {
            loge!("GitHub: {login} request failed: {e}");
            GitHubProfileRecord::placeholder(
                login,
                profile_url(&opts.github_profile_base, login),
                Status::failed(e.kind(), e.message),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://github.com";

    #[test]
    fn found() {
        let reply = Reply::new(
            200,
            r#"{"login":"octocat","html_url":"https://github.com/octocat","public_repos":8,"followers":100,"following":9}"#,
        );
        let rec = extract("octocat", &reply, BASE);
        assert_eq!(rec.username, "octocat");
        assert_eq!(rec.profile_url, "https://github.com/octocat");
        assert_eq!(rec.public_repos, Count::Value(8));
        assert_eq!(rec.followers, Count::Value(100));
        assert_eq!(rec.following, Count::Value(9));
        assert_eq!(rec.status, Status::Found);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let rec = extract("octocat", &Reply::new(200, r#"{"followers":3,"following":null}"#), BASE);
        assert_eq!(rec.profile_url, "");
        assert_eq!(rec.public_repos, Count::Value(0));
        assert_eq!(rec.followers, Count::Value(3));
        assert_eq!(rec.following, Count::Value(0));
        assert!(rec.status.is_found());
    }

    #[test]
    fn not_found() {
        let rec = extract("doesnotexist123", &Reply::new(404, r#"{"message":"Not Found"}"#), BASE);
        assert_eq!(rec.status, Status::NotFound);
        assert_eq!(rec.profile_url, "https://github.com/doesnotexist123");
        assert_eq!(rec.public_repos, Count::NotApplicable);
        assert_eq!(rec.followers, Count::NotApplicable);
        assert_eq!(rec.following, Count::NotApplicable);
    }

    #[test]
    fn rate_limit_is_upstream_error() {
        let reply = Reply::new(403, r#"{"message":"API rate limit exceeded for 1.2.3.4."}"#);
        let rec = extract("octocat", &reply, BASE);
        assert_eq!(
            rec.status,
            Status::failed(ErrorKind::Upstream, "403 Forbidden: API rate limit exceeded for 1.2.3.4.")
        );
        assert_eq!(rec.followers, Count::NotApplicable);
    }

    #[test]
    fn server_error_without_json_body() {
        let rec = extract("octocat", &Reply::new(502, "<html>bad gateway</html>"), BASE);
        assert_eq!(rec.status, Status::failed(ErrorKind::Upstream, "502 Bad Gateway"));
    }

    #[test]
    fn garbage_body_is_malformed() {
        let rec = extract("octocat", &Reply::new(200, "not json"), BASE);
        assert_eq!(rec.status.error_kind(), Some(ErrorKind::MalformedResponse));
        assert_eq!(rec.profile_url, "https://github.com/octocat");
    }

    #[test]
    fn non_object_bodies_are_malformed() {
        for body in ["[]", "[1,2]", "42", "\"octocat\"", "null"] {
            let rec = extract("octocat", &Reply::new(200, body), BASE);
            assert_eq!(rec.status.error_kind(), Some(ErrorKind::MalformedResponse), "{body}");
            assert_eq!(rec.public_repos, Count::NotApplicable, "{body}");
        }
    }

    #[test]
    fn urls() {
        assert_eq!(user_url("https://api.github.com/", "a").unwrap(), "https://api.github.com/users/a");
        assert_eq!(user_url("http://127.0.0.1:9000/gh", "a").unwrap(), "http://127.0.0.1:9000/gh/users/a");
        assert_eq!(profile_url("https://github.com", "a"), "https://github.com/a");
        assert_eq!(user_url("not a url", "a").unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn login_stays_inside_users_path() {
        let api = "https://api.github.com";
        let url = Url::parse(&user_url(api, "../orgs/rust-lang").unwrap()).unwrap();
        assert_eq!(url.path(), "/users/..%2Forgs%2Frust-lang");
        assert_eq!(url.query(), None);

        let url = Url::parse(&user_url(api, "octo?cat#x").unwrap()).unwrap();
        assert_eq!(url.path(), "/users/octo%3Fcat%23x");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    /// Records every URL it is asked for and answers 404.
    struct Recording(std::sync::Mutex<Vec<String>>);

    impl Transport for Recording {
        fn get(&self, url: &str) -> Result<Reply> {
            self.0.lock().unwrap().push(s!(url));
            Ok(Reply::new(404, r#"{"message":"Not Found"}"#))
        }
        fn post_json(&self, _url: &str, _body: &Value) -> Result<Reply> {
            unreachable!("GitHub lookups only GET")
        }
    }

    #[test]
    fn traversal_login_is_not_found_not_another_resource() {
        let upstream = Recording(std::sync::Mutex::new(Vec::new()));
        let rec = fetch(&upstream, &ServiceOptions::default(), "../orgs/rust-lang");
        assert_eq!(rec.status, Status::NotFound);
        assert_eq!(
            upstream.0.lock().unwrap().as_slice(),
            ["https://api.github.com/users/..%2Forgs%2Frust-lang"]
        );
    }
}
