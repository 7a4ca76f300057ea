//! Эффективный уровень доступа с учетом наследования
//!
//! Database -> Schema -> SchemaObject: эффективный уровень ребенка равен
//! максимуму задекларированного и унаследованных уровней в порядке уровней
//! вида ребенка. Унаследованный уровень, не определенный для вида ребенка,
//! понижается до ближайшего определенного.

use crate::catalog::SecurableKind;
use crate::privilege::{clamp, max_level, AccessLevel};

/// Эффективный уровень объекта вида `kind`
///
/// `declared` должен быть определен для `kind`; `inherited` может содержать
/// уровни родительской области и групп объектов.
pub fn effective_level(
    kind: SecurableKind,
    declared: AccessLevel,
    inherited: &[AccessLevel],
) -> AccessLevel {
    inherited
        .iter()
        .fold(declared, |level, parent| max_level(kind, level, clamp(kind, *parent)))
}
