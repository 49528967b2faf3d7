use std::path::Path;

use finlens_core::settings::CONFIG_FILE_NAME;
use finlens_core::{resolve_finlens_home, Settings};
use serde::Serialize;

use crate::error::CliError;

use super::{CommandResult, ItemSink};

#[derive(Debug, Serialize)]
struct ConfigResponseData<'a> {
    config_path: String,
    loaded_from_file: bool,
    settings: &'a Settings,
}

pub fn run<S: ItemSink>(
    settings: &Settings,
    explicit: Option<&Path>,
    sink: &mut S,
) -> Result<CommandResult, CliError> {
    let (config_path, loaded_from_file) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => {
            let path = resolve_finlens_home().join(CONFIG_FILE_NAME);
            let exists = path.is_file();
            (path, exists)
        }
    };
    sink.begin("config", 1)?;

    let config_path = config_path.display().to_string();
    let response = ConfigResponseData {
        config_path: config_path.clone(),
        loaded_from_file,
        settings,
    };
    sink.item("settings", &response)?;
    let data = serde_json::to_value(response)?;

    let inputs = if loaded_from_file {
        vec![config_path]
    } else {
        Vec::new()
    };
    Ok(CommandResult::ok(data, inputs))
}
