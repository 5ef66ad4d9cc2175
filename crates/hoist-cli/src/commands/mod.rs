pub mod config;
pub mod simulate;

use std::path::Path;

use hoist_dispatch::DispatchConfig;

/// Load a dispatch policy, falling back to the defaults when no file is given.
fn load_config(path: Option<&Path>) -> Result<DispatchConfig, String> {
    match path {
        Some(path) => DispatchConfig::from_file(path).map_err(|e| e.to_string()),
        None => Ok(DispatchConfig::default()),
    }
}
