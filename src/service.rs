// src/service.rs
//
// Analysis service: two operations behind a tiny_http loop.
//
//   GET  /analyze/github/{username}   → GitHub record (JSON)
//   POST /analyze/leetcode/ {"url"}   → LeetCode record (JSON)
//   GET  /health                      → {"status":"ok"}
//
// Requests are handled one at a time on the accepting thread. A bad identifier
// always yields a 200 with an error Status inside the record; only routing and
// request-shape problems produce 4xx answers.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tiny_http::{Header, Response, Server};

use crate::config::options::ServiceOptions;
use crate::core::net::{HttpTransport, Transport};
use crate::core::sanitize::percent_decode;
use crate::error::{Error, ErrorKind, Result};
use crate::record::{GitHubProfileRecord, LeetCodeProfileRecord};
use crate::specs;

const GITHUB_ROUTE: &str = "/analyze/github/";
const LEETCODE_ROUTE: &str = "/analyze/leetcode";
const HEALTH_ROUTE: &str = "/health";

/// Body of `POST /analyze/leetcode/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeetCodeRequest {
    pub url: String,
}

/// Status + JSON body, ready to be written back to the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub status: u16,
    pub body: String,
}

impl Answer {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => {
                loge!("Service: serialize failed: {e}");
                Self::detail(500, "Internal Server Error")
            }
        }
    }

    fn detail(status: u16, msg: &str) -> Self {
        Self { status, body: json!({ "detail": msg }).to_string() }
    }
}

pub struct AnalysisService<T: Transport = HttpTransport> {
    transport: T,
    opts: ServiceOptions,
}

impl AnalysisService<HttpTransport> {
    /// Service with a real HTTP transport built from `opts` (timeout, user agent).
    pub fn from_options(opts: ServiceOptions) -> Result<Self> {
        let transport = HttpTransport::new(opts.timeout, &opts.user_agent)?;
        Ok(Self::new(transport, opts))
    }
}

impl<T: Transport> AnalysisService<T> {
    pub fn new(transport: T, opts: ServiceOptions) -> Self {
        Self { transport, opts }
    }

    /// GitHub operation: one upstream lookup for `login`.
    pub fn analyze_github(&self, login: &str) -> GitHubProfileRecord {
        specs::github::fetch(&self.transport, &self.opts, login)
    }

    /// LeetCode operation: `url` may be a profile link or a bare username.
    pub fn analyze_leetcode(&self, url: &str) -> LeetCodeProfileRecord {
        specs::leetcode::fetch(&self.transport, &self.opts, url)
    }

    /// Route one request. Pure apart from the upstream call it may trigger.
    pub fn handle(&self, method: &str, url: &str, body: &str) -> Answer {
        let path = url.split(['?', '#']).next().unwrap_or("");

        if path == HEALTH_ROUTE {
            return match method {
                "GET" => Answer::json(200, &json!({ "status": "ok" })),
                _ => Answer::detail(405, "Method Not Allowed"),
            };
        }

        if let Some(raw) = path.strip_prefix(GITHUB_ROUTE) {
            if raw.is_empty() || raw.contains('/') {
                return Answer::detail(404, "Not Found");
            }
            if method != "GET" {
                return Answer::detail(405, "Method Not Allowed");
            }
            let login = percent_decode(raw);
            let rec = self.analyze_github(&login);
            logf!("Service: github {login} → {}", rec.status);
            return Answer::json(200, &rec);
        }

        if path == LEETCODE_ROUTE || path == join!(LEETCODE_ROUTE, "/") {
            if method != "POST" {
                return Answer::detail(405, "Method Not Allowed");
            }
            let req: LeetCodeRequest = match serde_json::from_str(body) {
                Ok(r) => r,
                Err(e) => {
                    logd!("Service: rejected leetcode body: {e}");
                    return Answer::detail(422, &format!("Invalid request body: {e}"));
                }
            };
            let rec = self.analyze_leetcode(&req.url);
            logf!("Service: leetcode {} → {}", rec.username, rec.status);
            return Answer::json(200, &rec);
        }

        Answer::detail(404, "Not Found")
    }

    /// Sequential accept loop. Returns when the server is unblocked or shut down.
    pub fn serve(&self, server: &Server) {
        for mut request in server.incoming_requests() {
            let method = request.method().to_string();
            let url = s!(request.url());

            let mut body = String::new();
            let answer = match request.as_reader().read_to_string(&mut body) {
                Ok(_) => self.handle(&method, &url, &body),
                Err(e) => {
                    loge!("Service: {method} {url} unreadable body: {e}");
                    Answer::detail(400, "Unreadable request body")
                }
            };
            logd!("Service: {method} {url} → {}", answer.status);

            let mut response = Response::from_string(answer.body).with_status_code(answer.status);
            if let Ok(h) = Header::from_bytes(&b"Content-Type"[..], &b"application/json; charset=utf-8"[..]) {
                response.add_header(h);
            }
            if let Err(e) = request.respond(response) {
                loge!("Service: {method} {url} respond failed: {e}");
            }
        }
    }
}

/// Bind a listener on `addr` ("host:port"; port 0 picks a free one).
pub fn bind(addr: &str) -> Result<Server> {
    Server::http(addr).map_err(|e| Error::new(ErrorKind::Io, format!("Cannot bind {addr}: {e}")))
}

/// Build the real service from `opts`, bind, and serve until the process ends.
pub fn run(opts: &ServiceOptions) -> Result<()> {
    let service = AnalysisService::from_options(opts.clone())?;
    let server = bind(&opts.bind)?;
    logf!(
        "Service: listening on {} (github={}, leetcode={}, timeout={:?})",
        opts.bind,
        opts.github_api,
        opts.leetcode_graphql,
        opts.timeout
    );
    eprintln!("Analysis service listening on http://{}", opts.bind);
    service.serve(&server);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::net::Reply;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Canned upstream that records every URL it was asked for.
    struct Canned {
        reply: Reply,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(status: u16, body: &str) -> Self {
            Self { reply: Reply::new(status, body), seen: Mutex::new(Vec::new()) }
        }
    }

    impl Transport for Canned {
        fn get(&self, url: &str) -> Result<Reply> {
            self.seen.lock().unwrap().push(s!(url));
            Ok(self.reply.clone())
        }
        fn post_json(&self, url: &str, _body: &serde_json::Value) -> Result<Reply> {
            self.seen.lock().unwrap().push(s!(url));
            Ok(self.reply.clone())
        }
    }

    fn service(status: u16, body: &str) -> AnalysisService<Canned> {
        AnalysisService::new(Canned::new(status, body), ServiceOptions::default())
    }

    #[test]
    fn github_route_decodes_login() {
        let svc = service(404, "{}");
        let ans = svc.handle("GET", "/analyze/github/octo%20cat?x=1", "");
        assert_eq!(ans.status, 200);
        let v: Value = serde_json::from_str(&ans.body).unwrap();
        assert_eq!(v["Username"], "octo cat");
        assert_eq!(v["Status"], "❌ Not Found");
        assert_eq!(
            svc.transport.seen.lock().unwrap().as_slice(),
            ["https://api.github.com/users/octo%20cat"]
        );
    }

    #[test]
    fn leetcode_route_accepts_both_spellings() {
        let svc = service(200, r#"{"data":{"matchedUser":null}}"#);
        for path in ["/analyze/leetcode/", "/analyze/leetcode"] {
            let ans = svc.handle("POST", path, r#"{"url":"https://leetcode.com/ghost/"}"#);
            assert_eq!(ans.status, 200, "{path}");
            let v: Value = serde_json::from_str(&ans.body).unwrap();
            assert_eq!(v["Username"], "ghost");
            assert_eq!(v["Total Solved"], "N/A");
        }
    }

    #[test]
    fn bad_leetcode_body_is_422() {
        let svc = service(200, "{}");
        let ans = svc.handle("POST", "/analyze/leetcode/", r#"{"link":"x"}"#);
        assert_eq!(ans.status, 422);
        assert!(svc.transport.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn routing_errors() {
        let svc = service(200, "{}");
        assert_eq!(svc.handle("GET", "/nope", "").status, 404);
        assert_eq!(svc.handle("GET", "/analyze/github/", "").status, 404);
        assert_eq!(svc.handle("GET", "/analyze/github/a/b", "").status, 404);
        assert_eq!(svc.handle("POST", "/analyze/github/a", "").status, 405);
        assert_eq!(svc.handle("GET", "/analyze/leetcode/", "").status, 405);
        assert_eq!(svc.handle("GET", "/health", "").body, r#"{"status":"ok"}"#);
    }

    #[test]
    fn upstream_failure_is_still_200() {
        let svc = service(500, "boom");
        let ans = svc.handle("GET", "/analyze/github/octocat", "");
        assert_eq!(ans.status, 200);
        let v: Value = serde_json::from_str(&ans.body).unwrap();
        assert_eq!(v["Status"], "❌ Upstream Error: 500 Internal Server Error");
        assert_eq!(v["Profile URL"], "https://github.com/octocat");
    }
}
