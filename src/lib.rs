//! grantplan - планирование грантов по декларативной матрице доступа
//!
//! Для каждой функциональной роли и окружения оператор выбирает уровень
//! доступа на защищаемых объектах (базы, схемы, объекты схем, группы объектов,
//! виртуальные склады). Движок превращает эту матрицу в минимальный набор
//! грантов, упорядоченный по зависимостям, который затем передается
//! синтезатору инфраструктурного кода.

pub mod catalog;
pub mod cli;
pub mod common;
pub mod engine;
pub mod grant;
pub mod planner;
pub mod privilege;
pub mod resolver;
pub mod synthesizer;

pub use catalog::{Catalog, Project};
pub use common::config::{EngineConfig, ParentGrantPolicy};
pub use common::error::{CellError, Error, Result};
pub use common::types::*;
pub use engine::{EnvironmentPlan, GrantEngine, Plan};
pub use grant::{Grant, GrantId};
pub use planner::PlannedGrant;
pub use privilege::{AccessLevel, Privilege};
pub use synthesizer::{JsonSynthesizer, SynthesisInput, Synthesizer};

/// Версия библиотеки
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
