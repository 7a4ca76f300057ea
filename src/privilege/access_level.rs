//! Уровни доступа и статическая таблица привилегий по видам объектов
//!
//! Таблица тотальна: для каждой пары (вид, определенный уровень) есть набор
//! привилегий, `none` всегда пуст. Пара с неопределенным уровнем является
//! ошибкой конфигурации, а не поводом подставить значение по умолчанию.

use super::privilege::Privilege;
use crate::catalog::{SchemaObjectKind, SecurableKind};
use crate::common::{Error, Result, WILDCARD_TARGET};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Уровень доступа, выбираемый оператором
///
/// Порядок вариантов задает порядок имен уровней; у каждого вида объектов
/// определено свое упорядоченное подмножество.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    None,
    Read,
    Write,
    Ownership,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 4] = [
        AccessLevel::None,
        AccessLevel::Read,
        AccessLevel::Write,
        AccessLevel::Ownership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
            AccessLevel::Ownership => "ownership",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, AccessLevel::None)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AccessLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| Error::validation(format!("Unknown access level: {}", s)))
    }
}

const FULL_LEVELS: &[AccessLevel] = &[
    AccessLevel::None,
    AccessLevel::Read,
    AccessLevel::Write,
    AccessLevel::Ownership,
];

const READ_ONLY_LEVELS: &[AccessLevel] = &[
    AccessLevel::None,
    AccessLevel::Read,
    AccessLevel::Ownership,
];

/// Уровни, определенные для вида объектов, по возрастанию
pub fn levels_for(kind: SecurableKind) -> &'static [AccessLevel] {
    use SchemaObjectKind::*;

    match kind {
        SecurableKind::Database
        | SecurableKind::Schema
        | SecurableKind::VirtualWarehouse
        | SecurableKind::SchemaObjectGroup => FULL_LEVELS,
        SecurableKind::SchemaObject(Table | DynamicTable | Stage | Task) => FULL_LEVELS,
        SecurableKind::SchemaObject(View | FileFormat | SemanticView | Sequence | Stream) => {
            READ_ONLY_LEVELS
        }
    }
}

/// Определен ли уровень для вида объектов
pub fn is_defined(kind: SecurableKind, level: AccessLevel) -> bool {
    levels_for(kind).contains(&level)
}

/// Позиция уровня в порядке уровней вида
pub fn rank(kind: SecurableKind, level: AccessLevel) -> Option<usize> {
    levels_for(kind).iter().position(|defined| *defined == level)
}

/// Старший определенный для вида уровень, не превышающий `level`
pub fn clamp(kind: SecurableKind, level: AccessLevel) -> AccessLevel {
    levels_for(kind)
        .iter()
        .rev()
        .find(|defined| **defined <= level)
        .copied()
        .unwrap_or(AccessLevel::None)
}

/// Максимум двух уровней в порядке уровней вида
pub fn max_level(kind: SecurableKind, a: AccessLevel, b: AccessLevel) -> AccessLevel {
    let a = clamp(kind, a);
    let b = clamp(kind, b);
    if rank(kind, a) >= rank(kind, b) {
        a
    } else {
        b
    }
}

/// Набор привилегий, который уровень означает для вида объектов
pub fn privileges_for(kind: SecurableKind, level: AccessLevel) -> Result<&'static [Privilege]> {
    use Privilege::*;
    use SchemaObjectKind as K;

    let privileges: &'static [Privilege] = match (kind, level) {
        (SecurableKind::SchemaObjectGroup, AccessLevel::None) => &[],
        (SecurableKind::SchemaObjectGroup, _) => {
            return Err(Error::unknown_access_level(kind.as_str(), level.as_str(), WILDCARD_TARGET))
        }
        (_, AccessLevel::None) if is_defined(kind, level) => &[],
        (_, AccessLevel::Ownership) if is_defined(kind, level) => &[Ownership],

        (SecurableKind::Database, AccessLevel::Read) => &[Usage],
        (SecurableKind::Database, AccessLevel::Write) => &[Usage, Monitor],

        (SecurableKind::Schema, AccessLevel::Read) => &[Usage],
        (SecurableKind::Schema, AccessLevel::Write) => &[Usage, Monitor, CreateDynamicTable],

        (SecurableKind::VirtualWarehouse, AccessLevel::Read) => &[Usage],
        (SecurableKind::VirtualWarehouse, AccessLevel::Write) => &[Usage, Monitor, Operate],

        (SecurableKind::SchemaObject(K::Table), AccessLevel::Read) => &[Select, References],
        (SecurableKind::SchemaObject(K::Table), AccessLevel::Write) => {
            &[Select, References, Insert, Update, Delete]
        }
        (SecurableKind::SchemaObject(K::View), AccessLevel::Read) => &[Select, References],
        (SecurableKind::SchemaObject(K::DynamicTable), AccessLevel::Read) => &[Select],
        (SecurableKind::SchemaObject(K::DynamicTable), AccessLevel::Write) => {
            &[Select, Monitor, Operate]
        }
        (SecurableKind::SchemaObject(K::FileFormat), AccessLevel::Read) => &[Usage],
        (SecurableKind::SchemaObject(K::SemanticView), AccessLevel::Read) => &[Select, References],
        (SecurableKind::SchemaObject(K::Sequence), AccessLevel::Read) => &[Usage],
        (SecurableKind::SchemaObject(K::Stage), AccessLevel::Read) => &[Read],
        (SecurableKind::SchemaObject(K::Stage), AccessLevel::Write) => &[Read, Write],
        (SecurableKind::SchemaObject(K::Stream), AccessLevel::Read) => &[Select],
        (SecurableKind::SchemaObject(K::Task), AccessLevel::Read) => &[Monitor],
        (SecurableKind::SchemaObject(K::Task), AccessLevel::Write) => &[Monitor, Operate],

        _ => {
            return Err(Error::unknown_access_level(
                kind.as_str(),
                level.as_str(),
                WILDCARD_TARGET,
            ))
        }
    };

    Ok(privileges)
}
