//! Интеграционные тесты для grantplan
//!
//! Этот модуль содержит тесты, которые проверяют полный проход:
//! проект -> разрешение -> граф зависимостей -> план -> синтезатор.

pub mod common;
pub mod property_tests;
pub mod scenario_tests;

// Re-export common utilities
pub use common::*;
