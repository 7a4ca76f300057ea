//! Типизированная иерархия защищаемых объектов
//!
//! Database -> Schema -> SchemaObject задаются вложенностью, поэтому у
//! схемы ровно одна база, а у объекта схемы ровно одна схема.
//! Группы объектов схемы и виртуальные склады живут на верхнем уровне.

use super::access::AccessMap;
use crate::common::{is_valid_object_name, qualified_name, Error, Result};
use crate::privilege::AccessLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Вид объекта схемы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaObjectKind {
    Table,
    View,
    DynamicTable,
    FileFormat,
    SemanticView,
    Sequence,
    Stage,
    Stream,
    Task,
}

impl SchemaObjectKind {
    /// Все виды объектов схемы в каноническом порядке
    pub const ALL: [SchemaObjectKind; 9] = [
        SchemaObjectKind::Table,
        SchemaObjectKind::View,
        SchemaObjectKind::DynamicTable,
        SchemaObjectKind::FileFormat,
        SchemaObjectKind::SemanticView,
        SchemaObjectKind::Sequence,
        SchemaObjectKind::Stage,
        SchemaObjectKind::Stream,
        SchemaObjectKind::Task,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaObjectKind::Table => "table",
            SchemaObjectKind::View => "view",
            SchemaObjectKind::DynamicTable => "dynamic_table",
            SchemaObjectKind::FileFormat => "file_format",
            SchemaObjectKind::SemanticView => "semantic_view",
            SchemaObjectKind::Sequence => "sequence",
            SchemaObjectKind::Stage => "stage",
            SchemaObjectKind::Stream => "stream",
            SchemaObjectKind::Task => "task",
        }
    }
}

impl fmt::Display for SchemaObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SchemaObjectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::configuration(format!("Unknown schema object kind: {}", s)))
    }
}

/// Вид защищаемого объекта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurableKind {
    Database,
    Schema,
    SchemaObject(SchemaObjectKind),
    SchemaObjectGroup,
    VirtualWarehouse,
}

impl SecurableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurableKind::Database => "database",
            SecurableKind::Schema => "schema",
            SecurableKind::SchemaObject(kind) => kind.as_str(),
            SecurableKind::SchemaObjectGroup => "schema_object_group",
            SecurableKind::VirtualWarehouse => "virtual_warehouse",
        }
    }
}

impl fmt::Display for SecurableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Общий интерфейс объектов каталога
pub trait Securable {
    fn name(&self) -> &str;
    fn kind(&self) -> SecurableKind;
    fn access(&self) -> &AccessMap;
}

/// Объект схемы (динамическая таблица, стейдж, семантическое представление ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaObject {
    pub name: String,
    pub kind: SchemaObjectKind,
    /// Участвует ли объект в шаре данных
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub access: AccessMap,
}

impl SchemaObject {
    pub fn new(name: impl Into<String>, kind: SchemaObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            shared: false,
            access: AccessMap::new(),
        }
    }

    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    pub fn with_access(mut self, role: &str, environment: Option<&str>, level: AccessLevel) -> Self {
        self.access.set(role, environment, level);
        self
    }
}

impl Securable for SchemaObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SecurableKind {
        SecurableKind::SchemaObject(self.kind)
    }

    fn access(&self) -> &AccessMap {
        &self.access
    }
}

/// Схема базы данных
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default)]
    pub access: AccessMap,
    #[serde(default)]
    pub objects: Vec<SchemaObject>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: AccessMap::new(),
            objects: Vec::new(),
        }
    }

    pub fn with_access(mut self, role: &str, environment: Option<&str>, level: AccessLevel) -> Self {
        self.access.set(role, environment, level);
        self
    }

    pub fn with_object(mut self, object: SchemaObject) -> Self {
        self.objects.push(object);
        self
    }
}

impl Securable for Schema {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SecurableKind {
        SecurableKind::Schema
    }

    fn access(&self) -> &AccessMap {
        &self.access
    }
}

/// База данных
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    #[serde(default)]
    pub access: AccessMap,
    #[serde(default)]
    pub schemata: Vec<Schema>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: AccessMap::new(),
            schemata: Vec::new(),
        }
    }

    pub fn with_access(mut self, role: &str, environment: Option<&str>, level: AccessLevel) -> Self {
        self.access.set(role, environment, level);
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schemata.push(schema);
        self
    }
}

impl Securable for Database {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SecurableKind {
        SecurableKind::Database
    }

    fn access(&self) -> &AccessMap {
        &self.access
    }
}

/// Виртуальный склад (вычислительный ресурс)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualWarehouse {
    pub name: String,
    #[serde(default)]
    pub access: AccessMap,
}

impl VirtualWarehouse {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: AccessMap::new(),
        }
    }

    pub fn with_access(mut self, role: &str, environment: Option<&str>, level: AccessLevel) -> Self {
        self.access.set(role, environment, level);
        self
    }
}

impl Securable for VirtualWarehouse {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SecurableKind {
        SecurableKind::VirtualWarehouse
    }

    fn access(&self) -> &AccessMap {
        &self.access
    }
}

/// Полный путь объекта схемы
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectPath {
    pub database: String,
    pub schema: String,
    pub object: String,
}

impl ObjectPath {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.object)
    }
}

/// Именованная группа объектов схемы с общей декларацией доступа
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaObjectGroup {
    pub name: String,
    #[serde(default)]
    pub access: AccessMap,
    #[serde(default)]
    pub members: Vec<ObjectPath>,
}

impl SchemaObjectGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: AccessMap::new(),
            members: Vec::new(),
        }
    }

    pub fn with_access(mut self, role: &str, environment: Option<&str>, level: AccessLevel) -> Self {
        self.access.set(role, environment, level);
        self
    }

    pub fn with_member(mut self, member: ObjectPath) -> Self {
        self.members.push(member);
        self
    }
}

impl Securable for SchemaObjectGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SecurableKind {
        SecurableKind::SchemaObjectGroup
    }

    fn access(&self) -> &AccessMap {
        &self.access
    }
}

/// Ссылка на объект каталога вместе с его полным именем
pub struct SecurableRef<'a> {
    pub qualified_name: String,
    pub object: &'a dyn Securable,
}

/// Каталог защищаемых объектов
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub databases: Vec<Database>,
    pub schema_object_groups: Vec<SchemaObjectGroup>,
    pub virtual_warehouses: Vec<VirtualWarehouse>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(mut self, database: Database) -> Self {
        self.databases.push(database);
        self
    }

    pub fn with_schema_object_group(mut self, group: SchemaObjectGroup) -> Self {
        self.schema_object_groups.push(group);
        self
    }

    pub fn with_virtual_warehouse(mut self, warehouse: VirtualWarehouse) -> Self {
        self.virtual_warehouses.push(warehouse);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
            && self.schema_object_groups.is_empty()
            && self.virtual_warehouses.is_empty()
    }

    /// Находит объект схемы по полному пути
    pub fn find_object(&self, path: &ObjectPath) -> Option<&SchemaObject> {
        self.databases
            .iter()
            .find(|database| database.name == path.database)?
            .schemata
            .iter()
            .find(|schema| schema.name == path.schema)?
            .objects
            .iter()
            .find(|object| object.name == path.object)
    }

    /// Все объекты каталога с полными именами, в порядке обхода
    pub fn securables(&self) -> Vec<SecurableRef<'_>> {
        let mut result = Vec::new();

        for database in &self.databases {
            result.push(SecurableRef {
                qualified_name: database.name.clone(),
                object: database,
            });
            for schema in &database.schemata {
                result.push(SecurableRef {
                    qualified_name: qualified_name(&[&database.name, &schema.name]),
                    object: schema,
                });
                for object in &schema.objects {
                    result.push(SecurableRef {
                        qualified_name: qualified_name(&[
                            &database.name,
                            &schema.name,
                            &object.name,
                        ]),
                        object,
                    });
                }
            }
        }
        for group in &self.schema_object_groups {
            result.push(SecurableRef {
                qualified_name: group.name.clone(),
                object: group,
            });
        }
        for warehouse in &self.virtual_warehouses {
            result.push(SecurableRef {
                qualified_name: warehouse.name.clone(),
                object: warehouse,
            });
        }

        result
    }

    /// Проверяет имена, уникальность среди соседей и карты доступа
    pub fn validate(&self) -> Result<()> {
        check_unique("database", self.databases.iter().map(|d| d.name.as_str()))?;
        check_unique(
            "schema object group",
            self.schema_object_groups.iter().map(|g| g.name.as_str()),
        )?;
        check_unique(
            "virtual warehouse",
            self.virtual_warehouses.iter().map(|w| w.name.as_str()),
        )?;

        for database in &self.databases {
            check_unique(
                &format!("schema in database '{}'", database.name),
                database.schemata.iter().map(|s| s.name.as_str()),
            )?;
            for schema in &database.schemata {
                check_unique(
                    &format!("object in schema '{}.{}'", database.name, schema.name),
                    schema.objects.iter().map(|o| o.name.as_str()),
                )?;
            }
        }

        for securable in self.securables() {
            if !is_valid_object_name(securable.object.name()) {
                return Err(Error::validation(format!(
                    "Invalid {} name: '{}'",
                    securable.object.kind(),
                    securable.qualified_name
                )));
            }
            securable.object.access().validate(&securable.qualified_name)?;
        }

        Ok(())
    }
}

fn check_unique<'a>(what: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(Error::validation(format!("Duplicate {} name: '{}'", what, name)));
        }
    }
    Ok(())
}
