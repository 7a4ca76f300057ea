//! Модель привилегий и уровней доступа

pub mod access_level;
pub mod privilege;

#[cfg(test)]
mod tests;

pub use access_level::{clamp, is_defined, levels_for, max_level, privileges_for, rank, AccessLevel};
pub use privilege::Privilege;
