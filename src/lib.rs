// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod model;
pub mod specs;

pub mod fallback;
pub mod infer;
pub mod progress;
pub mod projection;
pub mod runner;
pub mod scrape;
pub mod store;

pub use error::{Error, Result};
