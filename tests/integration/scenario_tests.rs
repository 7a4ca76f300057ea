//! Сквозные сценарии планирования
//!
//! Каждый тест проходит весь путь от проекта до упорядоченного плана.

use super::common::*;
use grantplan::catalog::{Catalog, Database, Schema, SchemaObject, SchemaObjectKind};
use grantplan::common::{CellError, EngineConfig, Error, ParentGrantPolicy};
use grantplan::engine::GrantEngine;
use grantplan::grant::{Grant, GrantKind};
use grantplan::privilege::{AccessLevel, Privilege};

/// База с уровнем read дает ровно USAGE и ничего больше
#[test]
pub fn test_database_read_scenario() {
    let catalog = Catalog::new().with_database(
        Database::new("ANALYTICS").with_access("ANALYST", Some(PROD), AccessLevel::Read),
    );
    let plan = engine(ParentGrantPolicy::Infer)
        .plan(&project(catalog))
        .unwrap();

    let prod = prod_plan(&plan);
    assert_eq!(
        grants(prod),
        vec![&Grant::database("ANALYTICS", Privilege::Usage, "ANALYST")]
    );
    assert!(prod.issues.is_empty());
    assert!(plan.environment("dev").unwrap().grants.is_empty());
}

/// Схема с write под базой с read получает write и гранты на будущие объекты
#[test]
pub fn test_schema_override_scenario() {
    let catalog = Catalog::new().with_database(
        Database::new("ANALYTICS")
            .with_access("ANALYST", Some(PROD), AccessLevel::Read)
            .with_schema(Schema::new("PUBLIC").with_access(
                "ANALYST",
                Some(PROD),
                AccessLevel::Write,
            )),
    );
    let plan = engine(ParentGrantPolicy::Infer)
        .plan(&project(catalog))
        .unwrap();
    let prod = prod_plan(&plan);

    let schema_privileges: Vec<Privilege> = prod
        .grants
        .iter()
        .filter(|planned| planned.grant.kind() == GrantKind::Schema && !planned.grant.future())
        .map(|planned| planned.grant.privilege())
        .collect();
    assert!(schema_privileges.contains(&Privilege::Usage));
    assert!(schema_privileges.contains(&Privilege::Monitor));
    assert!(schema_privileges.contains(&Privilege::CreateDynamicTable));

    for kind in SchemaObjectKind::ALL {
        assert!(
            prod.grants.iter().any(|planned| planned.grant.future()
                && planned.grant.kind() == GrantKind::SchemaObject(kind)
                && planned.grant.scope() == "ANALYTICS.PUBLIC"),
            "missing future grant for {}",
            kind
        );
    }

    // База применяется раньше всего, что от нее зависит
    assert_eq!(
        prod.grants[0].grant,
        Grant::database("ANALYTICS", Privilege::Usage, "ANALYST")
    );
    assert!(prod.grants.iter().all(|planned| !planned.inferred));
}

/// Два стейджа с read дают один грант на будущие стейджи и по гранту на объект
#[test]
pub fn test_stage_deduplication_scenario() {
    let catalog = Catalog::new().with_database(
        Database::new("ANALYTICS").with_schema(
            Schema::new("PUBLIC")
                .with_object(
                    SchemaObject::new("LANDING", SchemaObjectKind::Stage)
                        .with_access("ANALYST", Some(PROD), AccessLevel::Read),
                )
                .with_object(
                    SchemaObject::new("ARCHIVE", SchemaObjectKind::Stage)
                        .with_access("ANALYST", Some(PROD), AccessLevel::Read),
                ),
        ),
    );
    let plan = engine(ParentGrantPolicy::Infer)
        .plan(&project(catalog))
        .unwrap();
    let prod = prod_plan(&plan);

    let declared: Vec<&Grant> = prod
        .grants
        .iter()
        .filter(|planned| !planned.inferred)
        .map(|planned| &planned.grant)
        .collect();
    assert_eq!(declared.len(), 3);
    assert_eq!(declared.iter().filter(|grant| grant.future()).count(), 1);
    assert!(declared.contains(&&Grant::future_schema_objects(
        "ANALYTICS",
        "PUBLIC",
        SchemaObjectKind::Stage,
        Privilege::Read,
        "ANALYST",
    )));
}

fn semantic_view_catalog(schema_access: bool) -> Catalog {
    let mut schema = Schema::new("PUBLIC").with_object(
        SchemaObject::new("REVENUE", SchemaObjectKind::SemanticView).with_access(
            "ANALYST",
            Some(PROD),
            AccessLevel::Read,
        ),
    );
    let mut database = Database::new("ANALYTICS");
    if schema_access {
        schema = schema.with_access("ANALYST", Some(PROD), AccessLevel::Read);
        database = database.with_access("ANALYST", Some(PROD), AccessLevel::Read);
    }
    Catalog::new().with_database(database.with_schema(schema))
}

fn revenue_select() -> Grant {
    Grant::schema_object(
        "ANALYTICS",
        "PUBLIC",
        SchemaObjectKind::SemanticView,
        "REVENUE",
        Privilege::Select,
        "ANALYST",
    )
}

/// Грант на семантическое представление зависит от USAGE на схему
#[test]
pub fn test_semantic_view_depends_on_schema_usage() {
    let plan = engine(ParentGrantPolicy::Reject)
        .plan(&project(semantic_view_catalog(true)))
        .unwrap();
    let prod = prod_plan(&plan);

    let schema_usage = Grant::schema("ANALYTICS", "PUBLIC", Privilege::Usage, "ANALYST");
    let parent = prod
        .grants
        .iter()
        .find(|planned| planned.grant == schema_usage)
        .unwrap();
    let child = prod
        .grants
        .iter()
        .find(|planned| planned.grant == revenue_select())
        .unwrap();

    assert_eq!(child.depends_on, vec![parent.id.clone()]);
    assert!(child.wave > parent.wave);
}

/// Без доступа к схеме: политика определяет судьбу гранта на объект
#[test]
pub fn test_missing_schema_access_policies() {
    let project = project(semantic_view_catalog(false));
    let schema_usage = Grant::schema("ANALYTICS", "PUBLIC", Privilege::Usage, "ANALYST");

    let inferred = engine(ParentGrantPolicy::Infer).plan(&project).unwrap();
    let prod = prod_plan(&inferred);
    let parent = prod
        .grants
        .iter()
        .position(|planned| planned.grant == schema_usage)
        .unwrap();
    let child = prod
        .grants
        .iter()
        .position(|planned| planned.grant == revenue_select())
        .unwrap();
    assert!(prod.grants[parent].inferred);
    assert!(parent < child);
    assert_eq!(prod.grants[child].depends_on, vec![prod.grants[parent].id.clone()]);

    let detached = engine(ParentGrantPolicy::Detached).plan(&project).unwrap();
    let prod = prod_plan(&detached);
    assert!(prod.grants.iter().all(|planned| planned.grant != schema_usage));
    let child = prod
        .grants
        .iter()
        .find(|planned| planned.grant == revenue_select())
        .unwrap();
    assert!(child.detached);
    assert!(child.depends_on.is_empty());

    match engine(ParentGrantPolicy::Reject).plan(&project) {
        Err(Error::MissingParentGrant { parent, .. }) => {
            assert_eq!(parent, schema_usage.id(false).to_string());
        }
        other => panic!("expected missing parent grant, got {:?}", other),
    }
}

/// Неизвестная роль описывается полностью и не мешает соседним ячейкам
#[test]
pub fn test_unknown_role_scenario() {
    let catalog = Catalog::new().with_database(
        Database::new("ANALYTICS")
            .with_access("GHOST", Some(PROD), AccessLevel::Read)
            .with_access("ANALYST", Some(PROD), AccessLevel::Read),
    );
    let project = project(catalog);
    let plan = engine(ParentGrantPolicy::Infer).plan(&project).unwrap();
    let prod = prod_plan(&plan);

    assert_eq!(
        prod.issues,
        vec![CellError::UnknownRole {
            role: "GHOST".to_string(),
            environment: PROD.to_string(),
            object: "ANALYTICS".to_string(),
            kind: "database".to_string(),
        }]
    );
    assert_eq!(
        grants(prod),
        vec![&Grant::database("ANALYTICS", Privilege::Usage, "ANALYST")]
    );
    assert!(plan.environment("dev").unwrap().issues.is_empty());

    let mut config = EngineConfig::default();
    config.fail_fast = true;
    let strict = GrantEngine::new(config).unwrap();
    assert!(matches!(
        strict.plan(&project),
        Err(Error::Cell(CellError::UnknownRole { .. }))
    ));
}

/// Имена, различающиеся только регистром или пунктуацией, планируются вместе
#[test]
pub fn test_look_alike_names_plan_without_id_collisions() {
    let catalog = Catalog::new().with_database(
        Database::new("ANALYTICS")
            .with_access("ANALYST", Some(PROD), AccessLevel::Read)
            .with_access("analyst", Some(PROD), AccessLevel::Read)
            .with_schema(
                Schema::new("PUBLIC")
                    .with_object(
                        SchemaObject::new("ORDERS-1", SchemaObjectKind::Table)
                            .with_access("ANALYST", Some(PROD), AccessLevel::Read),
                    )
                    .with_object(
                        SchemaObject::new("ORDERS_1", SchemaObjectKind::Table)
                            .with_access("ANALYST", Some(PROD), AccessLevel::Read),
                    )
                    .with_object(
                        SchemaObject::new("FUTURE", SchemaObjectKind::Table)
                            .with_access("ANALYST", Some(PROD), AccessLevel::Read),
                    ),
            ),
    );
    let project = project(catalog).with_role("analyst");
    let plan = engine(ParentGrantPolicy::Infer).plan(&project).unwrap();
    let prod = prod_plan(&plan);

    let mut ids: Vec<&str> = prod.grants.iter().map(|planned| planned.id.as_str()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);

    assert!(grants(prod).contains(&&Grant::database("ANALYTICS", Privilege::Usage, "analyst")));
    for object in ["ORDERS-1", "ORDERS_1", "FUTURE"] {
        assert!(grants(prod).contains(&&Grant::schema_object(
            "ANALYTICS",
            "PUBLIC",
            SchemaObjectKind::Table,
            object,
            Privilege::Select,
            "ANALYST",
        )));
    }
    assert!(grants(prod).contains(&&Grant::future_schema_objects(
        "ANALYTICS",
        "PUBLIC",
        SchemaObjectKind::Table,
        Privilege::Select,
        "ANALYST",
    )));
}
