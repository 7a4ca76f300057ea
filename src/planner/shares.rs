//! Политика исключения для объектов в шаре
//!
//! Для некоторых видов объектов платформа не позволяет адресовать грант
//! по идентификатору, если объект участвует в шаре. Такие гранты
//! направляются в адресацию по имени.

use crate::catalog::SchemaObjectKind;
use crate::common::EngineConfig;
use crate::grant::Grant;

/// Виды объектов, которые после шаринга адресуются только по имени
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharesPolicy {
    kinds: Vec<SchemaObjectKind>,
}

impl SharesPolicy {
    pub fn new(kinds: impl IntoIterator<Item = SchemaObjectKind>) -> Self {
        let mut policy = Self { kinds: Vec::new() };
        for kind in kinds {
            if !policy.kinds.contains(&kind) {
                policy.kinds.push(kind);
            }
        }
        policy
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.shares_excluded_kinds.iter().copied())
    }

    /// Политика без исключений
    pub fn disabled() -> Self {
        Self { kinds: Vec::new() }
    }

    pub fn kinds(&self) -> &[SchemaObjectKind] {
        &self.kinds
    }

    pub fn is_excluded_kind(&self, kind: SchemaObjectKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Нужно ли адресовать грант по имени
    ///
    /// Гранты на будущие объекты не имеют целевого идентификатора и никогда
    /// не перенаправляются.
    pub fn routes_by_name(&self, grant: &Grant) -> bool {
        match grant {
            Grant::SchemaObject(grant) => {
                !grant.future
                    && grant.object.is_some()
                    && grant.shared
                    && self.is_excluded_kind(grant.kind)
            }
            _ => false,
        }
    }
}

impl Default for SharesPolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
