//! Дедуплицированный набор грантов

use super::grant::Grant;
use indexmap::IndexSet;

/// Набор грантов с сохранением порядка первой вставки
///
/// Гранты, совпадающие по (привилегия, роль, вид, цель или future, область),
/// схлопываются в один.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantSet {
    grants: IndexSet<Grant>,
}

impl GrantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет грант; возвращает `false`, если такой уже был
    pub fn insert(&mut self, grant: Grant) -> bool {
        self.grants.insert(grant)
    }

    pub fn extend(&mut self, grants: impl IntoIterator<Item = Grant>) {
        self.grants.extend(grants);
    }

    pub fn contains(&self, grant: &Grant) -> bool {
        self.grants.contains(grant)
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grant> {
        self.grants.iter()
    }

    pub fn into_vec(self) -> Vec<Grant> {
        self.grants.into_iter().collect()
    }
}

impl FromIterator<Grant> for GrantSet {
    fn from_iter<I: IntoIterator<Item = Grant>>(iter: I) -> Self {
        Self {
            grants: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for GrantSet {
    type Item = Grant;
    type IntoIter = indexmap::set::IntoIter<Grant>;

    fn into_iter(self) -> Self::IntoIter {
        self.grants.into_iter()
    }
}
