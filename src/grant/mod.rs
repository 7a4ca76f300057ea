//! Гранты: модель и дедуплицированный набор

pub mod grant;
pub mod set;

#[cfg(test)]
mod tests;

pub use grant::{
    DatabaseGrant, Grant, GrantId, GrantKind, GrantOrderKey, SchemaGrant, SchemaObjectGrant,
    VirtualWarehouseGrant,
};
pub use set::GrantSet;
