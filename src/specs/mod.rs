// src/specs/mod.rs
//! # Upstream "specs"
//!
//! One module per upstream API. Each spec encodes *what to ask* the upstream
//! and *where the answer lives* in its JSON, and turns one reply into one
//! output record.
//!
//! ## What lives here
//! - Request shapes (REST path, GraphQL query + variables).
//! - Response models (serde structs with tolerant defaults).
//! - Pure extraction: `Reply` → record, including the status mapping
//!   (found / not found / upstream error / malformed body).
//! - `fetch`: one call through a `core::net::Transport`, transport errors folded
//!   into the record.
//!
//! ## What does **not** live here
//! - Routing, the HTTP server, JSON responses to our own clients (`service`).
//! - Reading input tables or per-row fan-out (`runner`).
//!
//! ## Conventions & invariants
//! - Exactly one upstream call per `fetch`; no retries.
//! - `fetch` never fails: every outcome is a well-formed record.
//! - Extraction is testable offline against canned `Reply` values.

pub mod github;
pub mod leetcode;
