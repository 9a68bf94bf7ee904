// src/config/mod.rs

pub mod consts;
pub mod tournament;

pub use tournament::{CountryIndex, Fixture, TournamentConfig};
