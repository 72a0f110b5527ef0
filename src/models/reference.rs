// src/models/reference.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Mapping groups the generator reads from `mappinggroups.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceGroup {
    WorldCountries,
    WorldCapitals,
    UsStates,
}

impl ReferenceGroup {
    pub fn key(self) -> &'static str {
        match self {
            ReferenceGroup::WorldCountries => "world-countries",
            ReferenceGroup::WorldCapitals => "world-capitals",
            ReferenceGroup::UsStates => "us-states",
        }
    }
}

/// Represents a row of 'mappingentries' joined with its flag.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: i32,
    pub group_id: i32,
    pub name: String,
    pub code: String,
    pub flag_url: Option<String>,

    /// Display name used on the SVG maps. Answers and highlights use it.
    pub svg_name: String,

    pub alternative_names: Vec<String>,
    pub prefixes: Vec<String>,
    pub grouping: String,
}

impl ReferenceEntry {
    /// Minimal entry, used by fixtures and the in-memory store.
    pub fn new(code: &str, svg_name: &str) -> Self {
        Self {
            id: 0,
            group_id: 0,
            name: svg_name.to_lowercase(),
            code: code.to_string(),
            flag_url: None,
            svg_name: svg_name.to_string(),
            alternative_names: Vec::new(),
            prefixes: Vec::new(),
            grouping: String::new(),
        }
    }
}
