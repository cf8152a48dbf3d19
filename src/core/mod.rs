pub mod config;
pub mod error;
pub mod types;

pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
