// src/models/location.rs

//! Division, Zilla, and Upzilla lookup table.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Location table shipped with the crate.
const BUNDLED_LOCATIONS: &str = include_str!("../../data/bd_locations.json");

/// A top-level administrative division with its zillas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Division {
    /// Division name (e.g., "Khulna")
    pub division: String,

    #[serde(default)]
    pub zillas: Vec<Zilla>,
}

/// A zilla (district) with its upzillas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Zilla {
    pub name: String,

    #[serde(default)]
    pub upzillas: Vec<String>,
}

/// Immutable division → zilla → upzilla hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct LocationTable {
    divisions: Vec<Division>,
}

impl LocationTable {
    pub fn new(divisions: Vec<Division>) -> Self {
        Self { divisions }
    }

    /// Load a location table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Parse the table bundled into the binary.
    pub fn bundled() -> Result<Self> {
        Ok(serde_json::from_str(BUNDLED_LOCATIONS)?)
    }

    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }

    /// Division names in table order.
    pub fn divisions(&self) -> impl Iterator<Item = &str> {
        self.divisions.iter().map(|d| d.division.as_str())
    }

    /// Zillas of `division`; empty when the division is unknown.
    pub fn zillas_of(&self, division: &str) -> &[Zilla] {
        self.divisions
            .iter()
            .find(|d| d.division == division)
            .map(|d| d.zillas.as_slice())
            .unwrap_or(&[])
    }

    /// Upzillas of `zilla` within `division`; empty when either is unknown.
    pub fn upzillas_of(&self, division: &str, zilla: &str) -> &[String] {
        self.zillas_of(division)
            .iter()
            .find(|z| z.name == zilla)
            .map(|z| z.upzillas.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the full triple exists in the table.
    pub fn contains(&self, division: &str, zilla: &str, upzilla: &str) -> bool {
        self.upzillas_of(division, zilla)
            .iter()
            .any(|u| u == upzilla)
    }

    /// Count total zillas across all divisions.
    pub fn zilla_count(&self) -> usize {
        self.divisions.iter().map(|d| d.zillas.len()).sum()
    }

    /// Count total upzillas across all divisions.
    pub fn upzilla_count(&self) -> usize {
        self.divisions
            .iter()
            .flat_map(|d| &d.zillas)
            .map(|z| z.upzillas.len())
            .sum()
    }
}
