// src/pipeline/locations.rs

//! Location table browsing.

use crate::error::{AppError, Result};
use crate::models::LocationTable;
use crate::services::LocationSelector;
use crate::utils::console;

/// Print the options at the level below the given choices.
///
/// No division lists divisions, a division lists its zillas and a zilla
/// lists its upzillas. Returns the printed options.
pub fn run_locations(
    table: &LocationTable,
    division: Option<&str>,
    zilla: Option<&str>,
) -> Result<Vec<String>> {
    let mut selector = LocationSelector::new(table);

    let options: Vec<String> = match (division, zilla) {
        (None, None) => {
            console::header("Divisions");
            selector.divisions().map(str::to_string).collect()
        }
        (None, Some(_)) => {
            return Err(AppError::validation("a zilla needs its division"));
        }
        (Some(division), None) => {
            selector.select_division(division);
            console::header(&format!("Zillas of {division}"));
            selector.zilla_options().map(str::to_string).collect()
        }
        (Some(division), Some(zilla)) => {
            selector.select_division(division);
            selector.select_zilla(zilla);
            console::header(&format!("Upzillas of {zilla}, {division}"));
            selector.upzilla_options().to_vec()
        }
    };

    if options.is_empty() {
        let choice = [division, zilla].into_iter().flatten().collect::<Vec<_>>();
        return Err(AppError::validation(format!(
            "Unknown location: {}",
            choice.join(" / ")
        )));
    }

    for option in &options {
        console::sub_item(option);
    }
    console::summary(
        "Location table",
        &[
            ("divisions", table.divisions().count().to_string()),
            ("zillas", table.zilla_count().to_string()),
            ("upzillas", table.upzilla_count().to_string()),
        ],
    );
    Ok(options)
}
