use serde::{Deserialize, Serialize};

/// The whole persisted state. Every collection defaults to empty so files
/// written before a collection existed still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "cascos", default)]
    pub items: Vec<Item>,
    #[serde(rename = "usuarios", default)]
    pub users: Vec<User>,
    #[serde(rename = "administradores", default)]
    pub administrators: Vec<Administrator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "geles")]
    pub capacity: u32,
    #[serde(rename = "prestado", default)]
    pub lent: bool,
    #[serde(rename = "usuario", default)]
    pub borrower: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Administrator {
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "dni")]
    pub national_id: String,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub lent: usize,
    pub available: usize,
}

/// A collection already holds `u32::MAX` and cannot take another record.
#[derive(Debug, thiserror::Error)]
#[error("no ids left for new {0}")]
pub struct IdsExhausted(pub &'static str);

/// Next id for a collection: one past the largest id in use.
pub(crate) fn next_id(
    collection: &'static str,
    ids: impl Iterator<Item = u32>,
) -> Result<u32, IdsExhausted> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(IdsExhausted(collection))
}
