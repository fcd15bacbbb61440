// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod specs;

pub mod client;
pub mod csv;
pub mod file;
pub mod progress;
pub mod record;
pub mod runner;
pub mod service;
pub mod table;

pub use error::{Error, ErrorKind, Result};
