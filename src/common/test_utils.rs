//! Общие утилиты для тестирования

use crate::catalog::{Catalog, Database, Project, Schema, SchemaObject, SchemaObjectKind};
use crate::common::FeatureFlags;
use crate::privilege::AccessLevel;

/// Проект с окружениями `dev` и `prod` и ролями `ANALYST`, `ENGINEER`
pub fn base_project(catalog: Catalog) -> Project {
    Project::new(catalog)
        .with_environment("dev")
        .with_environment("prod")
        .with_role("ANALYST")
        .with_role("ENGINEER")
}

/// Проект без окружений: декларации без окружения
pub fn single_environment_project(catalog: Catalog) -> Project {
    base_project(catalog).with_features(FeatureFlags {
        environments_enabled: false,
        schema_object_groups_enabled: false,
    })
}

/// Каталог `ANALYTICS.PUBLIC` с двумя стейджами и семантическим представлением
pub fn analytics_catalog() -> Catalog {
    Catalog::new().with_database(
        Database::new("ANALYTICS").with_schema(
            Schema::new("PUBLIC")
                .with_object(SchemaObject::new("LANDING", SchemaObjectKind::Stage))
                .with_object(SchemaObject::new("ARCHIVE", SchemaObjectKind::Stage))
                .with_object(SchemaObject::new("REVENUE", SchemaObjectKind::SemanticView)),
        ),
    )
}

/// Каталог с одной базой, на которую у роли задекларирован уровень
pub fn database_only(role: &str, environment: Option<&str>, level: AccessLevel) -> Catalog {
    Catalog::new().with_database(Database::new("ANALYTICS").with_access(role, environment, level))
}
