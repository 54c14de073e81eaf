// src/services/locations.rs

//! Cascading division → zilla → upzilla selection.

use crate::models::{FormError, LocationTable, Zilla};

/// Dependent selection state over a [`LocationTable`].
///
/// Choosing a parent replaces the child options and clears every choice
/// below it.
#[derive(Debug, Clone)]
pub struct LocationSelector<'a> {
    table: &'a LocationTable,
    division: Option<String>,
    zilla: Option<String>,
    upzilla: Option<String>,
    zillas: &'a [Zilla],
    upzillas: &'a [String],
}

impl<'a> LocationSelector<'a> {
    pub fn new(table: &'a LocationTable) -> Self {
        Self {
            table,
            division: None,
            zilla: None,
            upzilla: None,
            zillas: &[],
            upzillas: &[],
        }
    }

    /// Division options.
    pub fn divisions(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.table.divisions()
    }

    /// Zilla options for the chosen division.
    pub fn zilla_options(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.zillas.iter().map(|z| z.name.as_str())
    }

    /// Upzilla options for the chosen zilla.
    pub fn upzilla_options(&self) -> &'a [String] {
        self.upzillas
    }

    pub fn division(&self) -> Option<&str> {
        self.division.as_deref()
    }

    pub fn zilla(&self) -> Option<&str> {
        self.zilla.as_deref()
    }

    pub fn upzilla(&self) -> Option<&str> {
        self.upzilla.as_deref()
    }

    /// Choose a division; an unknown name leaves no zilla options.
    pub fn select_division(&mut self, division: &str) {
        self.division = Some(division.to_string()).filter(|d| !d.is_empty());
        self.zilla = None;
        self.upzilla = None;
        self.upzillas = &[];
        self.zillas = self.table.zillas_of(division);
    }

    /// Choose a zilla among the current options; an unknown name leaves no
    /// upzilla options.
    pub fn select_zilla(&mut self, zilla: &str) {
        self.zilla = Some(zilla.to_string()).filter(|z| !z.is_empty());
        self.upzilla = None;
        self.upzillas = self
            .zillas
            .iter()
            .find(|z| z.name == zilla)
            .map(|z| z.upzillas.as_slice())
            .unwrap_or(&[]);
    }

    /// Choose an upzilla; only listed options are accepted.
    pub fn select_upzilla(&mut self, upzilla: &str) -> Result<(), FormError> {
        if !self.upzillas.iter().any(|u| u == upzilla) {
            return Err(FormError::UnknownLocation(format!(
                "{} / {} / {}",
                self.division.as_deref().unwrap_or("-"),
                self.zilla.as_deref().unwrap_or("-"),
                upzilla
            )));
        }
        self.upzilla = Some(upzilla.to_string());
        Ok(())
    }

    /// The full (division, zilla, upzilla) triple once all three are chosen.
    pub fn selection(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.division.as_deref()?,
            self.zilla.as_deref()?,
            self.upzilla.as_deref()?,
        ))
    }
}
