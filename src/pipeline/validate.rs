// src/pipeline/validate.rs

use std::path::Path;

use crate::config::load_all;
use crate::error::Result;
use crate::utils::console;

/// Validate configuration and the location table using load_all.
pub fn run_validate(config_path: &Path) -> Result<()> {
    console::header("Validating configuration");

    match load_all(config_path) {
        Ok((config, locations)) => {
            console::success("Config OK");
            console::sub_item(&format!("Backend: {}", config.backend.base_url));
            console::sub_item(&format!("User agent: {}", config.backend.user_agent));
            console::sub_item(&format!("Timeout: {}s", config.backend.timeout_secs));
            console::sub_item(&format!(
                "Identity API key: {}",
                if config.identity.api_key.is_empty() {
                    "not set (register unavailable)"
                } else {
                    "set"
                }
            ));

            console::success("Location table OK");
            console::sub_item(&format!(
                "Divisions: {}",
                locations.divisions().count()
            ));
            console::sub_item(&format!("Zillas: {}", locations.zilla_count()));
            console::sub_item(&format!("Upzillas: {}", locations.upzilla_count()));
            Ok(())
        }
        Err(e) => {
            console::alert(&format!("Validation failed: {e}"));
            Err(e)
        }
    }
}
