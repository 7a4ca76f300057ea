//! Передача упорядоченного плана синтезатору инфраструктурного кода
//!
//! Движок отвечает только за порядок, согласованный с ребрами, и стабильные
//! идентификаторы. Синтаксис ресурсов остается за реализацией синтезатора.

use crate::catalog::SchemaObjectKind;
use crate::common::Result;
use crate::grant::{GrantId, GrantKind};
use crate::planner::PlannedGrant;
use crate::privilege::Privilege;
use serde::{Deserialize, Serialize};

/// Запись гранта для синтезатора
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRecord {
    pub id: GrantId,
    pub privilege: Privilege,
    pub role: String,
    pub kind: GrantKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_object_name: Option<String>,
    pub future: bool,
    pub shares_excluded: bool,
    pub inferred: bool,
    /// Родитель отсутствует, грант выпущен без ребра
    pub detached: bool,
    pub depends_on: Vec<GrantId>,
}

impl From<&PlannedGrant> for GrantRecord {
    fn from(planned: &PlannedGrant) -> Self {
        let grant = &planned.grant;
        Self {
            id: planned.id.clone(),
            privilege: grant.privilege(),
            role: grant.role().to_string(),
            kind: grant.kind(),
            database: grant.database_name().map(str::to_string),
            schema: grant.schema_name().map(str::to_string),
            target_object_name: grant.object_name().map(str::to_string),
            future: grant.future(),
            shares_excluded: planned.shares_excluded,
            inferred: planned.inferred,
            detached: planned.detached,
            depends_on: planned.depends_on.clone(),
        }
    }
}

/// Входные данные синтезатора для одного окружения
///
/// Список исключений и версия провайдера передаются без изменений.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisInput {
    pub version_pin: String,
    pub shares_excluded_kinds: Vec<SchemaObjectKind>,
    pub environment: String,
    pub grants: Vec<GrantRecord>,
}

impl SynthesisInput {
    pub fn new(
        version_pin: impl Into<String>,
        shares_excluded_kinds: Vec<SchemaObjectKind>,
        environment: impl Into<String>,
        grants: &[PlannedGrant],
    ) -> Self {
        Self {
            version_pin: version_pin.into(),
            shares_excluded_kinds,
            environment: environment.into(),
            grants: grants.iter().map(GrantRecord::from).collect(),
        }
    }
}

/// Синтезатор ресурсов
pub trait Synthesizer {
    fn synthesize(&self, input: &SynthesisInput) -> Result<String>;
}

/// Синтезатор, который выводит входные данные как JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSynthesizer {
    pub pretty: bool,
}

impl JsonSynthesizer {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Synthesizer for JsonSynthesizer {
    fn synthesize(&self, input: &SynthesisInput) -> Result<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(input)?
        } else {
            serde_json::to_string(input)?
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::Grant;

    fn planned() -> Vec<PlannedGrant> {
        let schema = Grant::schema("ANALYTICS", "PUBLIC", Privilege::Usage, "ANALYST");
        let stage = Grant::schema_object(
            "ANALYTICS",
            "PUBLIC",
            SchemaObjectKind::Stage,
            "LANDING",
            Privilege::Read,
            "ANALYST",
        )
        .shared(true);

        vec![
            PlannedGrant {
                id: schema.id(false),
                grant: schema.clone(),
                shares_excluded: false,
                inferred: true,
                detached: false,
                depends_on: Vec::new(),
                wave: 0,
            },
            PlannedGrant {
                id: stage.id(true),
                grant: stage,
                shares_excluded: true,
                inferred: false,
                detached: true,
                depends_on: vec![schema.id(false)],
                wave: 1,
            },
        ]
    }

    #[test]
    fn test_records_carry_plan_annotations() {
        let input = SynthesisInput::new(
            "0.64.0",
            vec![SchemaObjectKind::Stage],
            "prod",
            &planned(),
        );

        assert_eq!(input.grants.len(), 2);
        let stage = &input.grants[1];
        assert_eq!(stage.target_object_name.as_deref(), Some("LANDING"));
        assert_eq!(stage.schema.as_deref(), Some("PUBLIC"));
        assert!(stage.shares_excluded);
        assert_eq!(stage.depends_on, vec![input.grants[0].id.clone()]);
        assert!(input.grants[0].inferred);
        assert_eq!(input.grants[0].target_object_name.as_deref(), Some("PUBLIC"));
        assert_eq!(input.grants[0].schema, None);
        assert!(stage.detached);
    }

    #[test]
    fn test_json_synthesizer_passes_configuration_through() {
        let input = SynthesisInput::new(
            "0.64.0",
            vec![SchemaObjectKind::Stage],
            "prod",
            &planned(),
        );
        let output = JsonSynthesizer::pretty().synthesize(&input).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["version_pin"], "0.64.0");
        assert_eq!(value["environment"], "prod");
        assert_eq!(value["shares_excluded_kinds"][0], "stage");
        assert_eq!(value["grants"][1]["privilege"], "READ");
        assert_eq!(value["grants"][1]["kind"]["schema_object"], "stage");
        assert_eq!(value["grants"][1]["detached"], true);
        assert_eq!(value["grants"][0]["detached"], false);

        let parsed: SynthesisInput = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, input);
    }
}
