pub mod aggregate;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod normalize;
pub mod patch;
pub mod stats;
pub mod sweeper;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use error::{Error, Result};
pub use models::{Priority, Status, Subtask, Tag, Task};
pub use utils::Profile;
