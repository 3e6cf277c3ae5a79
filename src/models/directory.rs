//! Directory records supplied to the attendance core.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: i64,
    pub full_name: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}
