//! Карта доступа объекта: роль -> упорядоченный список (окружение, уровень)

use crate::common::{Error, Result};
use crate::privilege::AccessLevel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Одна декларация доступа для роли
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEntry {
    /// Окружение; `None`, когда окружения в проекте выключены
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Выбранный уровень доступа
    pub level: AccessLevel,
}

/// Карта доступа объекта каталога
///
/// Порядок ролей сохраняется таким, каким он пришел во входных данных.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessMap {
    entries: IndexMap<String, Vec<AccessEntry>>,
}

impl AccessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Устанавливает уровень для роли в окружении, заменяя прежнюю запись
    pub fn set(&mut self, role: &str, environment: Option<&str>, level: AccessLevel) {
        let entries = self.entries.entry(role.to_string()).or_default();
        match entries
            .iter_mut()
            .find(|entry| entry.environment.as_deref() == environment)
        {
            Some(entry) => entry.level = level,
            None => entries.push(AccessEntry {
                environment: environment.map(str::to_string),
                level,
            }),
        }
    }

    /// Удаляет декларацию роли в окружении
    pub fn remove(&mut self, role: &str, environment: Option<&str>) {
        if let Some(entries) = self.entries.get_mut(role) {
            entries.retain(|entry| entry.environment.as_deref() != environment);
            if entries.is_empty() {
                self.entries.shift_remove(role);
            }
        }
    }

    /// Задекларированный уровень или `none`, если записи нет
    pub fn declared(&self, role: &str, environment: Option<&str>) -> AccessLevel {
        self.entries
            .get(role)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|entry| entry.environment.as_deref() == environment)
            })
            .map(|entry| entry.level)
            .unwrap_or(AccessLevel::None)
    }

    /// Роли, для которых есть хотя бы одна запись
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Все записи в порядке ввода
    pub fn entries(&self) -> impl Iterator<Item = (&str, &AccessEntry)> {
        self.entries
            .iter()
            .flat_map(|(role, entries)| entries.iter().map(move |entry| (role.as_str(), entry)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Проверяет уникальность окружений в записях каждой роли
    pub fn validate(&self, object: &str) -> Result<()> {
        for (role, entries) in &self.entries {
            for (i, entry) in entries.iter().enumerate() {
                if entries[..i]
                    .iter()
                    .any(|other| other.environment == entry.environment)
                {
                    return Err(Error::validation(format!(
                        "Duplicate access entry for role '{}' in environment '{}' on '{}'",
                        role,
                        entry.environment.as_deref().unwrap_or("<none>"),
                        object
                    )));
                }
            }
        }
        Ok(())
    }
}
