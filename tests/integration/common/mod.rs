//! Общие утилиты для интеграционных тестов

use grantplan::catalog::{
    Catalog, Database, Project, Schema, SchemaObject, SchemaObjectKind, VirtualWarehouse,
};
use grantplan::common::{EngineConfig, ParentGrantPolicy};
use grantplan::engine::{EnvironmentPlan, GrantEngine, Plan};
use grantplan::grant::Grant;
use grantplan::privilege::AccessLevel;

/// Окружение, в котором декларируются сценарии
pub const PROD: &str = "prod";

/// Проект с окружениями `dev`/`prod` и ролями `ANALYST`/`ENGINEER`
pub fn project(catalog: Catalog) -> Project {
    Project::new(catalog)
        .with_environment("dev")
        .with_environment(PROD)
        .with_role("ANALYST")
        .with_role("ENGINEER")
}

/// Движок с заданной политикой родительских грантов
pub fn engine(policy: ParentGrantPolicy) -> GrantEngine {
    let mut config = EngineConfig::default();
    config.parent_grant_policy = policy;
    GrantEngine::new(config).unwrap()
}

/// Каталог среднего размера: две базы, несколько схем, объекты всех видов
pub fn warehouse_catalog() -> Catalog {
    let prod = Some(PROD);

    Catalog::new()
        .with_database(
            Database::new("ANALYTICS")
                .with_access("ANALYST", prod, AccessLevel::Read)
                .with_access("ENGINEER", prod, AccessLevel::Write)
                .with_schema(
                    Schema::new("PUBLIC")
                        .with_access("ANALYST", prod, AccessLevel::Write)
                        .with_object(SchemaObject::new("ORDERS", SchemaObjectKind::Table))
                        .with_object(
                            SchemaObject::new("ORDERS_DT", SchemaObjectKind::DynamicTable)
                                .with_access("ENGINEER", prod, AccessLevel::Ownership),
                        )
                        .with_object(
                            SchemaObject::new("LANDING", SchemaObjectKind::Stage)
                                .shared()
                                .with_access("ANALYST", prod, AccessLevel::Read),
                        )
                        .with_object(
                            SchemaObject::new("REVENUE", SchemaObjectKind::SemanticView)
                                .shared()
                                .with_access("ANALYST", prod, AccessLevel::Read),
                        ),
                )
                .with_schema(
                    Schema::new("STAGING").with_object(
                        SchemaObject::new("INGEST", SchemaObjectKind::Task)
                            .with_access("ENGINEER", prod, AccessLevel::Write),
                    ),
                ),
        )
        .with_database(
            Database::new("RAW").with_schema(
                Schema::new("EVENTS").with_object(
                    SchemaObject::new("CLICKS", SchemaObjectKind::Stream)
                        .with_access("ANALYST", Some("dev"), AccessLevel::Read),
                ),
            ),
        )
        .with_virtual_warehouse(
            VirtualWarehouse::new("REPORTING")
                .with_access("ANALYST", prod, AccessLevel::Read)
                .with_access("ENGINEER", prod, AccessLevel::Write),
        )
}

/// План окружения `prod`
pub fn prod_plan(plan: &Plan) -> &EnvironmentPlan {
    plan.environment(PROD).unwrap()
}

/// Гранты плана окружения без аннотаций
pub fn grants(plan: &EnvironmentPlan) -> Vec<&Grant> {
    plan.grants.iter().map(|planned| &planned.grant).collect()
}
