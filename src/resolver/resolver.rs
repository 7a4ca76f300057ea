//! Разрешение матрицы доступа в набор грантов
//!
//! Для каждого окружения, роли и объекта каталога вычисляется эффективный
//! уровень, который разворачивается в привилегии. Проход является чистой
//! функцией от снимка проекта: повторный запуск дает тот же набор.

use super::effective::effective_level;
use crate::catalog::{
    Database, ObjectPath, Project, Schema, SchemaObject, SchemaObjectKind, Securable,
    SecurableKind, VirtualWarehouse,
};
use crate::common::{qualified_name, CellError, EnvironmentScope, Error, Result};
use crate::grant::{Grant, GrantSet};
use crate::privilege::{clamp, is_defined, privileges_for, AccessLevel, Privilege};
use std::collections::{HashMap, HashSet};

/// Результат разрешения одного окружения
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Имя окружения
    pub environment: String,
    /// Дедуплицированные гранты в порядке обхода
    pub grants: GrantSet,
    /// Ошибки ячеек этого окружения
    pub issues: Vec<CellError>,
}

/// Разрешатель грантов
pub struct GrantResolver<'a> {
    project: &'a Project,
    roles: HashSet<&'a str>,
    environments: HashSet<&'a str>,
    fail_fast: bool,
}

impl<'a> GrantResolver<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            roles: project
                .functional_roles
                .iter()
                .map(|role| role.name.as_str())
                .collect(),
            environments: project
                .environments
                .iter()
                .map(|environment| environment.name.as_str())
                .collect(),
            fail_fast: false,
        }
    }

    /// Прерывать проход на первой ошибке ячейки
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Ошибки каталога, не привязанные к конкретному окружению:
    /// неизвестные окружения и ссылки групп на несуществующие объекты
    pub fn catalog_issues(&self) -> Result<Vec<CellError>> {
        let catalog = &self.project.catalog;
        let mut issues = Vec::new();

        for securable in catalog.securables() {
            if securable.object.kind() == SecurableKind::SchemaObjectGroup
                && !self.project.features.schema_object_groups_enabled
            {
                continue;
            }

            for (role, entry) in securable.object.access().entries() {
                match entry.environment.as_deref() {
                    Some(environment) if !self.project.features.environments_enabled => {
                        log::debug!(
                            "Запись '{}' для роли '{}' на '{}' неактивна: окружения выключены",
                            environment,
                            role,
                            securable.qualified_name
                        );
                    }
                    Some(environment) if self.environments.contains(environment) => {}
                    None if !self.project.features.environments_enabled => {}
                    environment => issues.push(CellError::UnknownEnvironment {
                        environment: environment.unwrap_or_default().to_string(),
                        role: role.to_string(),
                        object: securable.qualified_name.clone(),
                        kind: securable.object.kind().to_string(),
                    }),
                }
            }
        }

        if self.project.features.schema_object_groups_enabled {
            for group in &catalog.schema_object_groups {
                for member in &group.members {
                    if catalog.find_object(member).is_none() {
                        issues.push(CellError::UnknownObject {
                            group: group.name.clone(),
                            path: member.to_string(),
                        });
                    }
                }
            }
        }

        self.report(&issues)?;
        Ok(issues)
    }

    /// Ошибки ячеек окружения: роли, отсутствующие в списке ролей
    pub fn environment_issues(&self, scope: &EnvironmentScope) -> Result<Vec<CellError>> {
        let mut issues = Vec::new();

        for securable in self.project.catalog.securables() {
            if securable.object.kind() == SecurableKind::SchemaObjectGroup
                && !self.project.features.schema_object_groups_enabled
            {
                continue;
            }

            for (role, entry) in securable.object.access().entries() {
                if scope.matches(entry.environment.as_deref()) && !self.roles.contains(role) {
                    issues.push(CellError::UnknownRole {
                        role: role.to_string(),
                        environment: scope.name.clone(),
                        object: securable.qualified_name.clone(),
                        kind: securable.object.kind().to_string(),
                    });
                }
            }
        }

        self.report(&issues)?;
        Ok(issues)
    }

    /// Разрешает одно окружение
    pub fn resolve(&self, scope: &EnvironmentScope) -> Result<Resolution> {
        if let Some(name) = scope.key.as_deref() {
            if !self.environments.contains(name) {
                return Err(CellError::UnknownEnvironment {
                    environment: name.to_string(),
                    role: String::new(),
                    object: String::new(),
                    kind: String::new(),
                }
                .into());
            }
        }

        let issues = self.environment_issues(scope)?;
        let mut grants = GrantSet::new();

        for role in &self.project.functional_roles {
            log::debug!(
                "Разрешение роли '{}' в окружении '{}'",
                role.name,
                scope.name
            );
            let context = RoleContext {
                role: &role.name,
                environment: scope.key.as_deref(),
                group_levels: self.group_levels(&role.name, scope.key.as_deref()),
            };

            for database in &self.project.catalog.databases {
                self.resolve_database(&context, database, &mut grants)?;
            }
            for warehouse in &self.project.catalog.virtual_warehouses {
                self.resolve_virtual_warehouse(&context, warehouse, &mut grants)?;
            }
        }

        log::debug!(
            "Окружение '{}': {} грантов, {} ошибок ячеек",
            scope.name,
            grants.len(),
            issues.len()
        );

        Ok(Resolution {
            environment: scope.name.clone(),
            grants,
            issues,
        })
    }

    fn resolve_database(
        &self,
        context: &RoleContext<'_>,
        database: &Database,
        grants: &mut GrantSet,
    ) -> Result<()> {
        let level = declared_level(context, database, &database.name)?;
        for privilege in expand(SecurableKind::Database, level, &database.name)? {
            grants.insert(Grant::database(&database.name, *privilege, context.role));
        }

        for schema in &database.schemata {
            self.resolve_schema(context, database, schema, level, grants)?;
        }

        Ok(())
    }

    fn resolve_schema(
        &self,
        context: &RoleContext<'_>,
        database: &Database,
        schema: &Schema,
        database_level: AccessLevel,
        grants: &mut GrantSet,
    ) -> Result<()> {
        let name = qualified_name(&[&database.name, &schema.name]);
        let declared = declared_level(context, schema, &name)?;
        let level = effective_level(SecurableKind::Schema, declared, &[database_level]);

        if !level.is_none() {
            for privilege in expand(SecurableKind::Schema, level, &name)? {
                grants.insert(Grant::schema(
                    &database.name,
                    &schema.name,
                    *privilege,
                    context.role,
                ));
                grants.insert(Grant::future_schemata(
                    &database.name,
                    *privilege,
                    context.role,
                ));
            }

            // Будущие объекты схемы получают уровень схемы
            for kind in SchemaObjectKind::ALL {
                let securable = SecurableKind::SchemaObject(kind);
                for privilege in expand(securable, clamp(securable, level), &name)? {
                    grants.insert(Grant::future_schema_objects(
                        &database.name,
                        &schema.name,
                        kind,
                        *privilege,
                        context.role,
                    ));
                }
            }
        }

        for object in &schema.objects {
            self.resolve_schema_object(context, database, schema, object, level, grants)?;
        }

        Ok(())
    }

    fn resolve_schema_object(
        &self,
        context: &RoleContext<'_>,
        database: &Database,
        schema: &Schema,
        object: &SchemaObject,
        schema_level: AccessLevel,
        grants: &mut GrantSet,
    ) -> Result<()> {
        let name = qualified_name(&[&database.name, &schema.name, &object.name]);
        let kind = object.kind();
        let declared = declared_level(context, object, &name)?;

        let mut inherited = vec![schema_level];
        let path = ObjectPath::new(&database.name, &schema.name, &object.name);
        if let Some(group_level) = context.group_levels.get(&path) {
            inherited.push(*group_level);
        }

        let level = effective_level(kind, declared, &inherited);
        for privilege in expand(kind, level, &name)? {
            grants.insert(
                Grant::schema_object(
                    &database.name,
                    &schema.name,
                    object.kind,
                    &object.name,
                    *privilege,
                    context.role,
                )
                .shared(object.shared),
            );
            grants.insert(Grant::future_schema_objects(
                &database.name,
                &schema.name,
                object.kind,
                *privilege,
                context.role,
            ));
        }

        Ok(())
    }

    fn resolve_virtual_warehouse(
        &self,
        context: &RoleContext<'_>,
        warehouse: &VirtualWarehouse,
        grants: &mut GrantSet,
    ) -> Result<()> {
        let level = declared_level(context, warehouse, &warehouse.name)?;
        for privilege in expand(SecurableKind::VirtualWarehouse, level, &warehouse.name)? {
            grants.insert(Grant::virtual_warehouse(
                &warehouse.name,
                *privilege,
                context.role,
            ));
        }
        Ok(())
    }

    /// Уровни групп объектов для роли, сведенные к путям объектов
    fn group_levels(&self, role: &str, environment: Option<&str>) -> HashMap<ObjectPath, AccessLevel> {
        let mut levels: HashMap<ObjectPath, AccessLevel> = HashMap::new();
        if !self.project.features.schema_object_groups_enabled {
            return levels;
        }

        for group in &self.project.catalog.schema_object_groups {
            let level = group.access.declared(role, environment);
            if level.is_none() {
                continue;
            }
            for member in &group.members {
                if self.project.catalog.find_object(member).is_none() {
                    continue;
                }
                let entry = levels.entry(member.clone()).or_insert(AccessLevel::None);
                *entry = (*entry).max(level);
            }
        }

        levels
    }

    fn report(&self, issues: &[CellError]) -> Result<()> {
        for issue in issues {
            log::warn!("{}", issue);
        }
        match issues.first() {
            Some(issue) if self.fail_fast => Err(issue.clone().into()),
            _ => Ok(()),
        }
    }
}

struct RoleContext<'a> {
    role: &'a str,
    environment: Option<&'a str>,
    group_levels: HashMap<ObjectPath, AccessLevel>,
}

/// Задекларированный уровень ячейки; неопределенный для вида уровень фатален
fn declared_level(
    context: &RoleContext<'_>,
    object: &dyn Securable,
    qualified: &str,
) -> Result<AccessLevel> {
    let level = object.access().declared(context.role, context.environment);
    if is_defined(object.kind(), level) {
        Ok(level)
    } else {
        Err(Error::unknown_access_level(
            object.kind().as_str(),
            level.as_str(),
            qualified,
        ))
    }
}

/// Привилегии уровня с указанием объекта в ошибке
fn expand(kind: SecurableKind, level: AccessLevel, object: &str) -> Result<&'static [Privilege]> {
    privileges_for(kind, level).map_err(|err| match err {
        Error::UnknownAccessLevel { kind, level, .. } => Error::UnknownAccessLevel {
            kind,
            level,
            object: object.to_string(),
        },
        other => other,
    })
}
