//! Конфигурация для grantplan
//!
//! Конфигурация передается в движок явно при создании, поэтому несколько
//! проходов с разными настройками могут выполняться одновременно.

use crate::catalog::SchemaObjectKind;
use crate::common::constants::{
    DEFAULT_ENVIRONMENT, DEFAULT_SHARES_EXCLUDED_KINDS, DEFAULT_VERSION_PIN, ENV_PREFIX,
};
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Что делать с грантом, у которого нет родительского гранта USAGE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentGrantPolicy {
    /// Выпустить дочерний грант вместе с выведенным родительским
    #[default]
    Infer,
    /// Выпустить дочерний грант без ребра и пометить его
    Detached,
    /// Завершить проход ошибкой
    Reject,
}

impl ParentGrantPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentGrantPolicy::Infer => "infer",
            ParentGrantPolicy::Detached => "detached",
            ParentGrantPolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for ParentGrantPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParentGrantPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infer" => Ok(ParentGrantPolicy::Infer),
            "detached" => Ok(ParentGrantPolicy::Detached),
            "reject" => Ok(ParentGrantPolicy::Reject),
            other => Err(Error::configuration(format!(
                "Unknown parent grant policy: {}",
                other
            ))),
        }
    }
}

/// Конфигурация логирования
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень логирования
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    fn merge(mut self, other: Self) -> Self {
        if other.level != "info" {
            self.level = other.level;
        }
        self
    }
}

/// Основная конфигурация движка
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Версия провайдера для синтезатора (передается без изменений)
    pub version_pin: String,
    /// Виды объектов, которые после шаринга адресуются только по имени
    pub shares_excluded_kinds: Vec<SchemaObjectKind>,
    /// Имя неявного окружения
    pub default_environment: String,
    /// Политика для отсутствующих родительских грантов
    pub parent_grant_policy: ParentGrantPolicy,
    /// Прерывать проход на первой ошибке ячейки
    pub fail_fast: bool,
    /// Разрешать окружения параллельно
    pub parallel: bool,
    /// Логирование
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version_pin: DEFAULT_VERSION_PIN.to_string(),
            shares_excluded_kinds: default_shares_excluded_kinds(),
            default_environment: DEFAULT_ENVIRONMENT.to_string(),
            parent_grant_policy: ParentGrantPolicy::Infer,
            fail_fast: false,
            parallel: true,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_shares_excluded_kinds() -> Vec<SchemaObjectKind> {
    DEFAULT_SHARES_EXCLUDED_KINDS
        .iter()
        .filter_map(|kind| kind.parse().ok())
        .collect()
}

impl EngineConfig {
    /// Загружает конфигурацию из TOML файла
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Разбирает конфигурацию из TOML строки
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Сохраняет конфигурацию в TOML файл
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Загружает конфигурацию из переменных окружения
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Загружает конфигурацию из набора пар `(ключ, значение)`
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = EngineConfig::default();

        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref();

            match name {
                "VERSION_PIN" => config.version_pin = value.to_string(),
                "DEFAULT_ENVIRONMENT" => config.default_environment = value.to_string(),
                "PARENT_GRANT_POLICY" => config.parent_grant_policy = value.parse()?,
                "FAIL_FAST" => config.fail_fast = parse_bool(name, value)?,
                "PARALLEL" => config.parallel = parse_bool(name, value)?,
                "LOG_LEVEL" => config.logging.level = value.to_string(),
                "SHARES_EXCLUDED_KINDS" => {
                    config.shares_excluded_kinds = value
                        .split(',')
                        .map(str::trim)
                        .filter(|kind| !kind.is_empty())
                        .map(str::parse)
                        .collect::<Result<Vec<_>>>()?;
                }
                _ => {}
            }
        }

        Ok(config)
    }

    /// Объединяет конфигурацию с другой: значения `other`, отличные от
    /// значений по умолчанию, имеют приоритет
    pub fn merge(mut self, other: Self) -> Self {
        let defaults = EngineConfig::default();

        if other.version_pin != defaults.version_pin {
            self.version_pin = other.version_pin;
        }
        if other.shares_excluded_kinds != defaults.shares_excluded_kinds {
            self.shares_excluded_kinds = other.shares_excluded_kinds;
        }
        if other.default_environment != defaults.default_environment {
            self.default_environment = other.default_environment;
        }
        if other.parent_grant_policy != defaults.parent_grant_policy {
            self.parent_grant_policy = other.parent_grant_policy;
        }
        if other.fail_fast != defaults.fail_fast {
            self.fail_fast = other.fail_fast;
        }
        if other.parallel != defaults.parallel {
            self.parallel = other.parallel;
        }
        self.logging = self.logging.merge(other.logging);

        self
    }

    /// Валидирует конфигурацию
    pub fn validate(&self) -> Result<()> {
        if self.version_pin.trim().is_empty() {
            return Err(Error::configuration("Version pin cannot be empty"));
        }

        if self.default_environment.trim().is_empty() {
            return Err(Error::configuration(
                "Default environment name cannot be empty",
            ));
        }

        let mut seen = Vec::with_capacity(self.shares_excluded_kinds.len());
        for kind in &self.shares_excluded_kinds {
            if seen.contains(kind) {
                return Err(Error::configuration(format!(
                    "Duplicate shares-excluded kind: {}",
                    kind
                )));
            }
            seen.push(*kind);
        }

        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::configuration(format!(
            "{}{} expects a boolean, got '{}'",
            ENV_PREFIX, name, other
        ))),
    }
}
