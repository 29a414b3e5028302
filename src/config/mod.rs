use std::path::{Path, PathBuf};

use clap::ArgMatches;
use clap::parser::ValueSource;
use serde::Deserialize;

use crate::args::SmokeArgs;
use crate::error::{AppError, AppResult, ConfigError};

/// Optional config file. Any field the user did not set on the CLI or via
/// the environment is filled from here.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub secret: Option<String>,
    pub owner_id: Option<String>,
    pub tenant_id: Option<String>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// Loads a configuration file from the provided path or default locations.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> AppResult<Option<ConfigFile>> {
    if let Some(path) = path {
        let path = PathBuf::from(path);
        return Ok(Some(load_config_file(&path)?));
    }

    let toml_path = PathBuf::from("aismoke.toml");
    if toml_path.exists() {
        return Ok(Some(load_config_file(&toml_path)?));
    }

    let json_path = PathBuf::from("aismoke.json");
    if json_path.exists() {
        return Ok(Some(load_config_file(&json_path)?));
    }

    Ok(None)
}

pub(crate) fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}

/// Applies configuration values onto the parsed arguments. CLI flags and
/// environment variables win over the file.
pub fn apply_config(args: &mut SmokeArgs, matches: &ArgMatches, config: &ConfigFile) {
    if !is_user_set(matches, "base_url")
        && let Some(base_url) = config.base_url.clone()
    {
        args.base_url = base_url;
    }
    if !is_user_set(matches, "client_id")
        && let Some(client_id) = config.client_id.clone()
    {
        args.client_id = Some(client_id);
    }
    if !is_user_set(matches, "secret")
        && let Some(secret) = config.secret.clone()
    {
        args.secret = Some(secret);
    }
    if !is_user_set(matches, "owner_id")
        && let Some(owner_id) = config.owner_id.clone()
    {
        args.owner_id = Some(owner_id);
    }
    if !is_user_set(matches, "tenant_id")
        && let Some(tenant_id) = config.tenant_id.clone()
    {
        args.tenant_id = Some(tenant_id);
    }
    if !is_user_set(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }
    if !is_user_set(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }
}

fn is_user_set(matches: &ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
