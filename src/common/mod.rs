//! Общие типы и утилиты для grantplan

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub use config::*;
pub use constants::*;
pub use error::{CellError, Error, Result};
pub use types::*;
pub use utils::*;
