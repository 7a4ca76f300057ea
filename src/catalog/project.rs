//! Входные данные движка: окружения, роли, флаги и каталог

use super::objects::Catalog;
use crate::common::{Environment, EnvironmentScope, Error, FeatureFlags, FunctionalRole, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Проект: снимок матрицы доступа, неизменный в течение прохода
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub environments: Vec<Environment>,
    pub functional_roles: Vec<FunctionalRole>,
    pub features: FeatureFlags,
    pub catalog: Catalog,
}

impl Project {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn with_environment(mut self, name: &str) -> Self {
        self.environments.push(Environment::new(name));
        self
    }

    pub fn with_role(mut self, name: &str) -> Self {
        self.functional_roles.push(FunctionalRole::new(name));
        self
    }

    pub fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Загружает проект из JSON файла
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.functional_roles.iter().any(|role| role.name == name)
    }

    pub fn has_environment(&self, name: &str) -> bool {
        self.environments.iter().any(|environment| environment.name == name)
    }

    /// Окружения, для которых выполняются проходы разрешения
    ///
    /// Если окружения выключены, проход один: неявное окружение с именем
    /// `default_environment`.
    pub fn environment_scopes(&self, default_environment: &str) -> Vec<EnvironmentScope> {
        if self.features.environments_enabled {
            self.environments
                .iter()
                .map(|environment| EnvironmentScope::named(&environment.name))
                .collect()
        } else {
            vec![EnvironmentScope::implicit(default_environment)]
        }
    }

    /// Проверяет уникальность ролей и окружений и корректность каталога
    pub fn validate(&self) -> Result<()> {
        let mut roles = HashSet::new();
        for role in &self.functional_roles {
            if role.name.trim().is_empty() {
                return Err(Error::validation("Functional role name cannot be empty"));
            }
            if !roles.insert(role.name.as_str()) {
                return Err(Error::validation(format!(
                    "Duplicate functional role: '{}'",
                    role.name
                )));
            }
        }

        if self.features.environments_enabled && self.environments.is_empty() {
            return Err(Error::validation(
                "At least one environment is required when environments are enabled",
            ));
        }

        let mut environments = HashSet::new();
        for environment in &self.environments {
            if environment.name.trim().is_empty() {
                return Err(Error::validation("Environment name cannot be empty"));
            }
            if !environments.insert(environment.name.as_str()) {
                return Err(Error::validation(format!(
                    "Duplicate environment: '{}'",
                    environment.name
                )));
            }
        }

        self.catalog.validate()
    }
}
