pub mod commands;
pub mod completion;
pub mod db;
pub mod lifecycle;
pub mod models;
pub mod progress;

#[cfg(test)]
pub mod test_utils;

pub use commands::router;
pub use db::AppState;
