use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub endpoint: Option<String>,
    pub mode: Option<String>,
    pub page_size: Option<usize>,
    pub limit: Option<usize>,
    pub concurrency: Option<usize>,
    pub rate: Option<u32>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".pokedex").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, serde_yaml::Error> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("pokedex config '{}' is not valid YAML: {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!(
                "pokedex config '{}' not found, run with --init-config to create it",
                path.display()
            ))
        }
        Err(e) => Err(format!("cannot read pokedex config '{}': {e}", path.display())),
    }
}

pub fn default_config_yaml() -> String {
    r#"# Pokedex config
#
# Location (default):
#   ~/.pokedex/config.yml

# Source
endpoint: https://pokeapi.co/api/v2/pokemon

# Pagination: "cursor" follows the API's next/previous links,
# "client" fetches up to `limit` records once and pages/filters locally.
mode: cursor
page_size: 20
limit: 151

# HTTP
concurrency: 10
# rate: 20
timeout: 10
# proxy: http://127.0.0.1:8080

# Output (optional)
# output: ./page.json
# output_format: json

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| {
            format!(
                "pokedex config path '{}' has no parent directory",
                path.display()
            )
        })?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "cannot create pokedex config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("cannot write pokedex config '{}': {e}", path.display()))?;
    Ok(())
}
