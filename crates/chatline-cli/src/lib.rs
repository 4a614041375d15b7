//! Diagnostics tooling for chatline timelines.
//!
//! Loads item records exported by the persistence layer, runs them through
//! item construction, orders them into a [`Timeline`](chatline_types::Timeline),
//! and prints the items' debug strings. The `chatline` binary is a thin
//! clap wrapper over [`commands`].

pub mod commands;
pub mod config;
pub mod load;

pub use commands::{CheckReport, check, dump, render, show};
pub use config::Config;
pub use load::{Rejection, TimelineFile, Validated, load_timeline, parse_timeline, validate};
