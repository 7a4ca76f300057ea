//! Разрешение деклараций доступа в гранты

pub mod effective;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use effective::effective_level;
pub use resolver::{GrantResolver, Resolution};
