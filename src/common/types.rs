//! Базовые типы данных для grantplan

use serde::{Deserialize, Serialize};
use std::fmt;

/// Окружение (единица изоляции деклараций доступа)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Environment {
    /// Имя окружения
    pub name: String,
}

impl Environment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Функциональная роль, которая получает привилегии
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionalRole {
    /// Имя роли
    pub name: String,
}

impl FunctionalRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for FunctionalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Флаги возможностей проекта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Поддержка нескольких окружений
    pub environments_enabled: bool,
    /// Поддержка групп объектов схемы
    pub schema_object_groups_enabled: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            environments_enabled: true,
            schema_object_groups_enabled: false,
        }
    }
}

/// Окружение, для которого выполняется один проход разрешения
///
/// `key` равен `None` для неявного окружения: тогда применяются только
/// декларации без указанного окружения.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentScope {
    /// Имя для отчетов и синтезатора
    pub name: String,
    /// Ключ сопоставления с записями карты доступа
    pub key: Option<String>,
}

impl EnvironmentScope {
    /// Явное окружение из списка проекта
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: Some(name.clone()),
            name,
        }
    }

    /// Неявное окружение по умолчанию
    pub fn implicit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
        }
    }

    /// Подходит ли запись карты доступа к этому окружению
    pub fn matches(&self, environment: Option<&str>) -> bool {
        self.key.as_deref() == environment
    }
}
