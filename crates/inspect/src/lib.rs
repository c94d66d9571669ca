//! `kdom-inspect` — run the K-Dom gate over JSON fixtures from the command line.

pub mod config;
pub mod inspect;

pub use config::InspectConfig;
pub use inspect::{Mode, inspect, load_json};
