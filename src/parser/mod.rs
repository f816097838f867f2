pub mod detector;
pub mod errors;
pub mod models;
pub mod policy;
pub mod stream_selector;
pub mod utils;

pub use models::{MediaKind, MediaResult, PickSummary, Platform, PolicyStatus};
pub use policy::{PolicyRegistry, SelectionPolicy};
pub use stream_selector::{StreamSelector, select_best_streams};
