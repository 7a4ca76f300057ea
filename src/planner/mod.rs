//! Планирование грантов: граф зависимостей, порядок и исключения для шаринга

pub mod graph;
pub mod shares;

#[cfg(test)]
mod tests;

pub use graph::{DependencyGraph, PlannedGrant};
pub use shares::SharesPolicy;
