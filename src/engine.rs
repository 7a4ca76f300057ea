//! Движок планирования грантов
//!
//! Проход: проект -> разрешатель -> граф зависимостей -> упорядоченный план.
//! Окружения не зависят друг от друга и при `parallel = true` разрешаются
//! на пуле потоков rayon.

use crate::catalog::Project;
use crate::common::{CellError, EngineConfig, EnvironmentScope, Error, Result};
use crate::planner::{DependencyGraph, PlannedGrant, SharesPolicy};
use crate::resolver::GrantResolver;
use crate::synthesizer::SynthesisInput;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// План одного окружения
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentPlan {
    pub environment: String,
    /// Гранты в порядке применения
    pub grants: Vec<PlannedGrant>,
    /// Ошибки ячеек этого окружения
    pub issues: Vec<CellError>,
}

impl EnvironmentPlan {
    /// Количество волн применения
    pub fn wave_count(&self) -> usize {
        self.grants
            .iter()
            .map(|planned| planned.wave + 1)
            .max()
            .unwrap_or(0)
    }
}

/// План по всем окружениям проекта
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub environments: Vec<EnvironmentPlan>,
    /// Ошибки каталога, не привязанные к окружению
    pub issues: Vec<CellError>,
}

impl Plan {
    pub fn environment(&self, name: &str) -> Option<&EnvironmentPlan> {
        self.environments
            .iter()
            .find(|plan| plan.environment == name)
    }

    pub fn grant_count(&self) -> usize {
        self.environments.iter().map(|plan| plan.grants.len()).sum()
    }

    /// Все ошибки ячеек: каталога и окружений
    pub fn all_issues(&self) -> impl Iterator<Item = &CellError> {
        self.issues
            .iter()
            .chain(self.environments.iter().flat_map(|plan| plan.issues.iter()))
    }

    pub fn has_issues(&self) -> bool {
        self.all_issues().next().is_some()
    }
}

/// Движок планирования грантов
#[derive(Debug, Clone)]
pub struct GrantEngine {
    config: EngineConfig,
    shares: SharesPolicy,
}

impl GrantEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let shares = SharesPolicy::from_config(&config);
        Ok(Self { config, shares })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn shares_policy(&self) -> &SharesPolicy {
        &self.shares
    }

    /// Планирует все окружения проекта
    pub fn plan(&self, project: &Project) -> Result<Plan> {
        project.validate()?;
        let resolver = GrantResolver::new(project).fail_fast(self.config.fail_fast);
        let issues = resolver.catalog_issues()?;

        let scopes = project.environment_scopes(&self.config.default_environment);
        log::info!(
            "Планирование {} окружений (parallel = {})",
            scopes.len(),
            self.config.parallel
        );

        let environments = if self.config.parallel {
            scopes
                .par_iter()
                .map(|scope| self.plan_scope(&resolver, scope))
                .collect::<Result<Vec<_>>>()?
        } else {
            scopes
                .iter()
                .map(|scope| self.plan_scope(&resolver, scope))
                .collect::<Result<Vec<_>>>()?
        };

        let plan = Plan {
            environments,
            issues,
        };
        log::info!(
            "План построен: {} грантов, ошибок ячеек: {}",
            plan.grant_count(),
            plan.all_issues().count()
        );
        Ok(plan)
    }

    /// Планирует одно окружение по имени
    pub fn plan_environment(&self, project: &Project, name: &str) -> Result<EnvironmentPlan> {
        project.validate()?;
        let resolver = GrantResolver::new(project).fail_fast(self.config.fail_fast);

        let scope = project
            .environment_scopes(&self.config.default_environment)
            .into_iter()
            .find(|scope| scope.name == name)
            .ok_or_else(|| {
                Error::from(CellError::UnknownEnvironment {
                    environment: name.to_string(),
                    role: String::new(),
                    object: String::new(),
                    kind: String::new(),
                })
            })?;

        self.plan_scope(&resolver, &scope)
    }

    /// Входные данные синтезатора для плана окружения
    pub fn synthesis_input(&self, plan: &EnvironmentPlan) -> SynthesisInput {
        SynthesisInput::new(
            self.config.version_pin.clone(),
            self.config.shares_excluded_kinds.clone(),
            plan.environment.clone(),
            &plan.grants,
        )
    }

    fn plan_scope(
        &self,
        resolver: &GrantResolver<'_>,
        scope: &EnvironmentScope,
    ) -> Result<EnvironmentPlan> {
        let resolution = resolver.resolve(scope)?;
        let graph = DependencyGraph::build(
            resolution.grants,
            &self.shares,
            self.config.parent_grant_policy,
        )?;
        let grants = graph.order()?;

        log::debug!(
            "Окружение '{}': {} грантов в плане",
            scope.name,
            grants.len()
        );

        Ok(EnvironmentPlan {
            environment: resolution.environment,
            grants,
            issues: resolution.issues,
        })
    }
}

impl Default for GrantEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        let shares = SharesPolicy::from_config(&config);
        Self { config, shares }
    }
}
