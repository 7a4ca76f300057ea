//! Свойства плана: детерминизм, монотонность, дедупликация, ацикличность

use super::common::*;
use grantplan::catalog::{Catalog, Database, Schema, SchemaObject, SchemaObjectKind};
use grantplan::common::{EngineConfig, ParentGrantPolicy};
use grantplan::engine::GrantEngine;
use grantplan::grant::{Grant, GrantKind};
use grantplan::privilege::{AccessLevel, Privilege};
use grantplan::synthesizer::{JsonSynthesizer, Synthesizer};

fn render(engine: &GrantEngine, catalog: Catalog) -> Vec<String> {
    let plan = engine.plan(&project(catalog)).unwrap();
    plan.environments
        .iter()
        .map(|environment| {
            JsonSynthesizer::pretty()
                .synthesize(&engine.synthesis_input(environment))
                .unwrap()
        })
        .collect()
}

#[test]
pub fn test_output_is_byte_identical_across_runs() {
    let engine = engine(ParentGrantPolicy::Infer);
    let first = render(&engine, warehouse_catalog());
    let second = render(&engine, warehouse_catalog());

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
pub fn test_parallel_and_sequential_plans_match() {
    let mut config = EngineConfig::default();
    config.parallel = false;
    let sequential = GrantEngine::new(config).unwrap();
    let parallel = engine(ParentGrantPolicy::Infer);

    let project = project(warehouse_catalog());
    assert_eq!(
        sequential.plan(&project).unwrap(),
        parallel.plan(&project).unwrap()
    );
}

#[test]
pub fn test_replanning_does_not_accumulate() {
    let engine = engine(ParentGrantPolicy::Infer);
    let project = project(warehouse_catalog());

    let first = engine.plan(&project).unwrap();
    let second = engine.plan(&project).unwrap();
    assert_eq!(first.grant_count(), second.grant_count());
    assert_eq!(first, second);
}

#[test]
pub fn test_raising_database_level_never_lowers_children() {
    fn schema_privileges(level: AccessLevel) -> Vec<Grant> {
        let catalog = Catalog::new().with_database(
            Database::new("ANALYTICS")
                .with_access("ANALYST", Some(PROD), level)
                .with_schema(
                    Schema::new("PUBLIC")
                        .with_access("ANALYST", Some(PROD), AccessLevel::Read)
                        .with_object(SchemaObject::new("ORDERS", SchemaObjectKind::Table)),
                ),
        );
        let plan = engine(ParentGrantPolicy::Infer)
            .plan(&project(catalog))
            .unwrap();
        prod_plan(&plan)
            .grants
            .iter()
            .map(|planned| planned.grant.clone())
            .filter(|grant| !grant.future() && grant.kind() != GrantKind::Database)
            .collect()
    }

    let read = schema_privileges(AccessLevel::Read);
    let write = schema_privileges(AccessLevel::Write);
    let ownership = schema_privileges(AccessLevel::Ownership);

    // read -> write: набор привилегий только растет
    assert!(read.iter().all(|grant| write.contains(grant)));
    assert!(write.contains(&Grant::schema_object(
        "ANALYTICS",
        "PUBLIC",
        SchemaObjectKind::Table,
        "ORDERS",
        Privilege::Insert,
        "ANALYST",
    )));
    assert!(ownership.contains(&Grant::schema(
        "ANALYTICS",
        "PUBLIC",
        Privilege::Ownership,
        "ANALYST",
    )));
    assert!(ownership.contains(&Grant::schema_object(
        "ANALYTICS",
        "PUBLIC",
        SchemaObjectKind::Table,
        "ORDERS",
        Privilege::Ownership,
        "ANALYST",
    )));
}

#[test]
pub fn test_dynamic_table_future_grants_collapse() {
    let catalog = Catalog::new().with_database(
        Database::new("ANALYTICS").with_schema(
            Schema::new("PUBLIC")
                .with_object(
                    SchemaObject::new("ORDERS_DT", SchemaObjectKind::DynamicTable)
                        .with_access("ANALYST", Some(PROD), AccessLevel::Read),
                )
                .with_object(
                    SchemaObject::new("REFUNDS_DT", SchemaObjectKind::DynamicTable)
                        .with_access("ANALYST", Some(PROD), AccessLevel::Read),
                ),
        ),
    );
    let plan = engine(ParentGrantPolicy::Infer)
        .plan(&project(catalog))
        .unwrap();

    let future: Vec<&Grant> = grants(prod_plan(&plan))
        .into_iter()
        .filter(|grant| {
            grant.future() && grant.kind() == GrantKind::SchemaObject(SchemaObjectKind::DynamicTable)
        })
        .collect();
    assert_eq!(future.len(), 1);
    assert_eq!(future[0].privilege(), Privilege::Select);
}

#[test]
pub fn test_regular_catalog_plans_without_cycles() {
    for policy in [ParentGrantPolicy::Infer, ParentGrantPolicy::Detached] {
        let plan = engine(policy).plan(&project(warehouse_catalog())).unwrap();

        for environment in &plan.environments {
            for (index, planned) in environment.grants.iter().enumerate() {
                for dependency in &planned.depends_on {
                    let before = environment.grants[..index]
                        .iter()
                        .any(|other| &other.id == dependency);
                    assert!(before, "{} must precede {}", dependency, planned.id);
                }
            }
        }
    }
}

#[test]
pub fn test_ids_are_unique_within_environment() {
    let plan = engine(ParentGrantPolicy::Infer)
        .plan(&project(warehouse_catalog()))
        .unwrap();

    for environment in &plan.environments {
        let mut ids: Vec<&str> = environment.grants.iter().map(|p| p.id.as_str()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}

#[test]
pub fn test_shared_objects_are_never_targeted_by_id() {
    let engine = engine(ParentGrantPolicy::Infer);
    let plan = engine.plan(&project(warehouse_catalog())).unwrap();
    let prod = prod_plan(&plan);

    for planned in &prod.grants {
        let routed = planned.grant.is_shared()
            && !planned.grant.future()
            && matches!(
                planned.grant.kind(),
                GrantKind::SchemaObject(kind)
                    if engine.shares_policy().is_excluded_kind(kind)
            );
        assert_eq!(planned.shares_excluded, routed, "{}", planned.id);
        assert_eq!(planned.id.as_str().ends_with("__by_name"), routed);
    }
    assert!(prod.grants.iter().any(|planned| planned.shares_excluded));

    let input = engine.synthesis_input(prod);
    assert_eq!(input.version_pin, "0.64.0");
    assert_eq!(
        input.shares_excluded_kinds,
        engine.config().shares_excluded_kinds
    );
}

#[test]
pub fn test_environments_are_planned_in_list_order() {
    let plan = engine(ParentGrantPolicy::Infer)
        .plan(&project(warehouse_catalog()))
        .unwrap();
    let names: Vec<&str> = plan
        .environments
        .iter()
        .map(|environment| environment.environment.as_str())
        .collect();

    assert_eq!(names, vec!["dev", PROD]);
    assert!(!plan.has_issues());

    let dev = plan.environment("dev").unwrap();
    assert!(grants(dev).iter().all(|grant| grant.role() == "ANALYST"));
}
