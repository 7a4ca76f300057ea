//! Каталог защищаемых объектов grantplan

pub mod access;
pub mod objects;
pub mod project;

#[cfg(test)]
mod tests;

pub use access::{AccessEntry, AccessMap};
pub use objects::{
    Catalog, Database, ObjectPath, Schema, SchemaObject, SchemaObjectGroup, SchemaObjectKind,
    Securable, SecurableKind, SecurableRef, VirtualWarehouse,
};
pub use project::Project;
