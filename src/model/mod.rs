pub mod analytics;
pub mod config;
pub mod history;
pub mod project;
pub mod subtask;
pub mod task;

pub use analytics::*;
pub use config::*;
pub use history::*;
pub use project::*;
pub use subtask::*;
pub use task::*;
