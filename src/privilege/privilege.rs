//! Атомарные привилегии платформы

use serde::{Deserialize, Serialize};
use std::fmt;

/// Привилегия (закрытое множество)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Privilege {
    Select,
    Insert,
    Update,
    Delete,
    References,
    Usage,
    Read,
    Write,
    Monitor,
    Operate,
    Ownership,
    CreateDynamicTable,
}

impl Privilege {
    /// Все привилегии
    pub const ALL: [Privilege; 12] = [
        Privilege::Select,
        Privilege::Insert,
        Privilege::Update,
        Privilege::Delete,
        Privilege::References,
        Privilege::Usage,
        Privilege::Read,
        Privilege::Write,
        Privilege::Monitor,
        Privilege::Operate,
        Privilege::Ownership,
        Privilege::CreateDynamicTable,
    ];

    /// Ключевое слово платформы для привилегии
    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::Select => "SELECT",
            Privilege::Insert => "INSERT",
            Privilege::Update => "UPDATE",
            Privilege::Delete => "DELETE",
            Privilege::References => "REFERENCES",
            Privilege::Usage => "USAGE",
            Privilege::Read => "READ",
            Privilege::Write => "WRITE",
            Privilege::Monitor => "MONITOR",
            Privilege::Operate => "OPERATE",
            Privilege::Ownership => "OWNERSHIP",
            Privilege::CreateDynamicTable => "CREATE DYNAMIC TABLE",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
