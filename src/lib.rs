pub mod common;
pub mod config;
pub mod parser;

pub use common::source::{FetchOutcome, MediaSource};
pub use parser::{MediaResult, Platform, StreamSelector, select_best_streams};
