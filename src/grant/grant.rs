//! Модель грантов
//!
//! Грант является замкнутым типом-суммой с видом в качестве дискриминанта,
//! поэтому построитель графа может исчерпывающе сопоставлять все варианты.
//! Имя целевого объекта хранится полем: его отсутствие само по себе значимо
//! (грант на будущие объекты или на весь вид в области).

use crate::catalog::SchemaObjectKind;
use crate::common::{
    encode_id_segment, slugify, ALL_ID_TARGET, BY_NAME_ID_MARKER, FUTURE_ID_TARGET,
    GRANT_ID_SEPARATOR, WILDCARD_TARGET,
};
use crate::privilege::Privilege;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Вид гранта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantKind {
    Database,
    Schema,
    SchemaObject(SchemaObjectKind),
    VirtualWarehouse,
}

impl GrantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantKind::Database => "database",
            GrantKind::Schema => "schema",
            GrantKind::SchemaObject(kind) => kind.as_str(),
            GrantKind::VirtualWarehouse => "virtual_warehouse",
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Грант на объект схемы (конкретный, на будущие или на все объекты вида)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaObjectGrant {
    pub database: String,
    pub schema: String,
    pub kind: SchemaObjectKind,
    /// Имя объекта; `None` для грантов на будущие объекты или на весь вид
    pub object: Option<String>,
    pub future: bool,
    /// Участвует ли целевой объект в шаре
    pub shared: bool,
    pub privilege: Privilege,
    pub role: String,
}

/// Грант на схему (конкретную или на будущие схемы базы)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaGrant {
    pub database: String,
    pub schema: Option<String>,
    pub future: bool,
    pub privilege: Privilege,
    pub role: String,
}

/// Грант на базу данных
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseGrant {
    pub database: String,
    pub privilege: Privilege,
    pub role: String,
}

/// Грант на виртуальный склад
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VirtualWarehouseGrant {
    pub virtual_warehouse: String,
    pub privilege: Privilege,
    pub role: String,
}

/// Грант
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Grant {
    SchemaObject(SchemaObjectGrant),
    Schema(SchemaGrant),
    Database(DatabaseGrant),
    VirtualWarehouse(VirtualWarehouseGrant),
}

impl Grant {
    pub fn database(database: &str, privilege: Privilege, role: &str) -> Self {
        Grant::Database(DatabaseGrant {
            database: database.to_string(),
            privilege,
            role: role.to_string(),
        })
    }

    pub fn schema(database: &str, schema: &str, privilege: Privilege, role: &str) -> Self {
        Grant::Schema(SchemaGrant {
            database: database.to_string(),
            schema: Some(schema.to_string()),
            future: false,
            privilege,
            role: role.to_string(),
        })
    }

    pub fn future_schemata(database: &str, privilege: Privilege, role: &str) -> Self {
        Grant::Schema(SchemaGrant {
            database: database.to_string(),
            schema: None,
            future: true,
            privilege,
            role: role.to_string(),
        })
    }

    pub fn schema_object(
        database: &str,
        schema: &str,
        kind: SchemaObjectKind,
        object: &str,
        privilege: Privilege,
        role: &str,
    ) -> Self {
        Grant::SchemaObject(SchemaObjectGrant {
            database: database.to_string(),
            schema: schema.to_string(),
            kind,
            object: Some(object.to_string()),
            future: false,
            shared: false,
            privilege,
            role: role.to_string(),
        })
    }

    pub fn future_schema_objects(
        database: &str,
        schema: &str,
        kind: SchemaObjectKind,
        privilege: Privilege,
        role: &str,
    ) -> Self {
        Grant::SchemaObject(SchemaObjectGrant {
            database: database.to_string(),
            schema: schema.to_string(),
            kind,
            object: None,
            future: true,
            shared: false,
            privilege,
            role: role.to_string(),
        })
    }

    pub fn virtual_warehouse(virtual_warehouse: &str, privilege: Privilege, role: &str) -> Self {
        Grant::VirtualWarehouse(VirtualWarehouseGrant {
            virtual_warehouse: virtual_warehouse.to_string(),
            privilege,
            role: role.to_string(),
        })
    }

    /// Помечает целевой объект схемы как участвующий в шаре
    pub fn shared(mut self, shared: bool) -> Self {
        if let Grant::SchemaObject(grant) = &mut self {
            grant.shared = shared;
        }
        self
    }

    pub fn privilege(&self) -> Privilege {
        match self {
            Grant::SchemaObject(grant) => grant.privilege,
            Grant::Schema(grant) => grant.privilege,
            Grant::Database(grant) => grant.privilege,
            Grant::VirtualWarehouse(grant) => grant.privilege,
        }
    }

    pub fn role(&self) -> &str {
        match self {
            Grant::SchemaObject(grant) => &grant.role,
            Grant::Schema(grant) => &grant.role,
            Grant::Database(grant) => &grant.role,
            Grant::VirtualWarehouse(grant) => &grant.role,
        }
    }

    pub fn kind(&self) -> GrantKind {
        match self {
            Grant::SchemaObject(grant) => GrantKind::SchemaObject(grant.kind),
            Grant::Schema(_) => GrantKind::Schema,
            Grant::Database(_) => GrantKind::Database,
            Grant::VirtualWarehouse(_) => GrantKind::VirtualWarehouse,
        }
    }

    /// Имя целевого объекта; `None` для грантов на будущие объекты
    pub fn object_name(&self) -> Option<&str> {
        match self {
            Grant::SchemaObject(grant) => grant.object.as_deref(),
            Grant::Schema(grant) => grant.schema.as_deref(),
            Grant::Database(grant) => Some(&grant.database),
            Grant::VirtualWarehouse(grant) => Some(&grant.virtual_warehouse),
        }
    }

    pub fn future(&self) -> bool {
        match self {
            Grant::SchemaObject(grant) => grant.future,
            Grant::Schema(grant) => grant.future,
            Grant::Database(_) | Grant::VirtualWarehouse(_) => false,
        }
    }

    /// Участвует ли целевой объект в шаре
    pub fn is_shared(&self) -> bool {
        matches!(self, Grant::SchemaObject(grant) if grant.shared)
    }

    /// База данных, в области которой действует грант
    pub fn database_name(&self) -> Option<&str> {
        match self {
            Grant::SchemaObject(grant) => Some(&grant.database),
            Grant::Schema(grant) => Some(&grant.database),
            Grant::Database(grant) => Some(&grant.database),
            Grant::VirtualWarehouse(_) => None,
        }
    }

    /// Схема, в области которой действует грант на объект схемы
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            Grant::SchemaObject(grant) => Some(&grant.schema),
            _ => None,
        }
    }

    /// Родительская область гранта (`DB`, `DB.SCHEMA` или пусто)
    pub fn scope(&self) -> String {
        match self {
            Grant::SchemaObject(grant) => format!("{}.{}", grant.database, grant.schema),
            Grant::Schema(grant) => grant.database.clone(),
            Grant::Database(_) | Grant::VirtualWarehouse(_) => String::new(),
        }
    }

    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::SchemaObject(_) => "SchemaObjectGrant",
            Grant::Schema(_) => "SchemaGrant",
            Grant::Database(_) => "DatabaseGrant",
            Grant::VirtualWarehouse(_) => "VirtualWarehouseGrant",
        }
    }

    pub fn is_schema_object_grant(&self) -> bool {
        matches!(self, Grant::SchemaObject(_))
    }

    pub fn is_schema_grant(&self) -> bool {
        matches!(self, Grant::Schema(_))
    }

    pub fn is_database_grant(&self) -> bool {
        matches!(self, Grant::Database(_))
    }

    pub fn is_virtual_warehouse_grant(&self) -> bool {
        matches!(self, Grant::VirtualWarehouse(_))
    }

    /// Детерминированный ключ порядка вывода
    pub fn order_key(&self) -> GrantOrderKey {
        GrantOrderKey {
            kind: self.kind(),
            role: self.role().to_string(),
            scope: self.scope(),
            target: self.object_name().unwrap_or(WILDCARD_TARGET).to_string(),
            future: self.future(),
            privilege: self.privilege(),
        }
    }

    /// Стабильный адресуемый идентификатор гранта
    ///
    /// Имена кодируются обратимо, вид определяет число частей, поэтому
    /// разные гранты получают разные идентификаторы. `by_name` добавляет
    /// маркер адресации по имени (для объектов в шаре).
    pub fn id(&self, by_name: bool) -> GrantId {
        let mut parts: Vec<String> = vec![
            self.kind().as_str().to_string(),
            encode_id_segment(self.role()),
            slugify(self.privilege().as_str()),
        ];

        match self {
            Grant::SchemaObject(grant) => {
                parts.push(encode_id_segment(&grant.database));
                parts.push(encode_id_segment(&grant.schema));
                parts.push(id_target(grant.object.as_deref(), grant.future));
            }
            Grant::Schema(grant) => {
                parts.push(encode_id_segment(&grant.database));
                parts.push(id_target(grant.schema.as_deref(), grant.future));
            }
            Grant::Database(grant) => parts.push(encode_id_segment(&grant.database)),
            Grant::VirtualWarehouse(grant) => {
                parts.push(encode_id_segment(&grant.virtual_warehouse))
            }
        }

        if by_name {
            parts.push(BY_NAME_ID_MARKER.to_string());
        }

        GrantId(parts.join(GRANT_ID_SEPARATOR))
    }
}

fn id_target(name: Option<&str>, future: bool) -> String {
    match (name, future) {
        (_, true) => FUTURE_ID_TARGET.to_string(),
        (Some(name), false) => encode_id_segment(name),
        (None, false) => ALL_ID_TARGET.to_string(),
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match (self.object_name(), self.future()) {
            (_, true) => format!("FUTURE {} IN {}", self.kind(), self.scope()),
            (Some(name), false) if self.scope().is_empty() => format!("{} {}", self.kind(), name),
            (Some(name), false) => format!("{} {}.{}", self.kind(), self.scope(), name),
            (None, false) => format!("ALL {} IN {}", self.kind(), self.scope()),
        };
        write!(f, "GRANT {} ON {} TO ROLE {}", self.privilege(), target, self.role())
    }
}

/// Ключ детерминированного порядка: (вид, роль, область, цель или `*`,
/// future, привилегия)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrantOrderKey {
    pub kind: GrantKind,
    pub role: String,
    pub scope: String,
    pub target: String,
    pub future: bool,
    pub privilege: Privilege,
}

/// Стабильный идентификатор гранта (адресуемое имя ресурса для синтезатора)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantId(String);

impl GrantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
