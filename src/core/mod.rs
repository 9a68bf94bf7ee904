// src/core/mod.rs

pub mod html;
pub mod net;
pub mod sanitize;
pub mod vischars;

pub use net::{Fetcher, HttpFetcher};
pub use vischars::VisChars;
