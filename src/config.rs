use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub(crate) const CONFIG_FILE_NAME: &str = ".mob_config.json";

const DEFAULT_WIP_BRANCH: &str = "mob-session";
const DEFAULT_REMOTE_NAME: &str = "origin";
const DEFAULT_WIP_COMMIT_MESSAGE: &str = "mob next [ci-skip]";
const DEFAULT_VOICE_COMMAND: &str = "say";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct MobConfig {
    pub(crate) wip_branch: String,
    pub(crate) base_branch: String,
    pub(crate) remote_name: String,
    pub(crate) wip_commit_message: String,
    pub(crate) mob_next_stay: bool,
    pub(crate) voice_command: String,
    pub(crate) debug: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) log_path: Option<PathBuf>,
}

impl MobConfig {
    pub(crate) fn with_base_branch(base_branch: &str) -> Self {
        Self {
            wip_branch: DEFAULT_WIP_BRANCH.to_string(),
            base_branch: base_branch.to_string(),
            remote_name: DEFAULT_REMOTE_NAME.to_string(),
            wip_commit_message: DEFAULT_WIP_COMMIT_MESSAGE.to_string(),
            mob_next_stay: true,
            voice_command: DEFAULT_VOICE_COMMAND.to_string(),
            debug: false,
            log_path: None,
        }
    }

    pub(crate) fn remote_branch(&self, branch: &str) -> String {
        format!("{}/{}", self.remote_name, branch)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(value) = overrides.wip_branch {
            self.wip_branch = value;
        }
        if let Some(value) = overrides.base_branch {
            self.base_branch = value;
        }
        if let Some(value) = overrides.remote_name {
            self.remote_name = value;
        }
        if let Some(value) = overrides.wip_commit_message {
            self.wip_commit_message = value;
        }
        if let Some(value) = overrides.mob_next_stay {
            self.mob_next_stay = value;
        }
        if let Some(value) = overrides.voice_command {
            self.voice_command = value;
        }
        if let Some(value) = overrides.debug {
            self.debug = value;
        }
        if let Some(value) = overrides.log_path {
            self.log_path = Some(value);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConfigOverrides {
    wip_branch: Option<String>,
    base_branch: Option<String>,
    remote_name: Option<String>,
    wip_commit_message: Option<String>,
    mob_next_stay: Option<bool>,
    voice_command: Option<String>,
    debug: Option<bool>,
    log_path: Option<PathBuf>,
}

const KNOWN_KEYS: [&str; 8] = [
    "WipBranch",
    "BaseBranch",
    "RemoteName",
    "WipCommitMessage",
    "MobNextStay",
    "VoiceCommand",
    "Debug",
    "LogPath",
];

#[derive(Debug)]
pub(crate) struct LoadedConfig {
    pub(crate) config: MobConfig,
    pub(crate) warnings: Vec<String>,
}

/// Reads `path` and overlays whatever keys it sets onto `defaults`.
pub(crate) fn load_config(path: &Path, defaults: MobConfig) -> Result<LoadedConfig, String> {
    let content = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config {}: {}", path.display(), err))?;
    load_config_from_str(&content, path, defaults)
}

pub(crate) fn load_config_from_str(
    content: &str,
    path: &Path,
    defaults: MobConfig,
) -> Result<LoadedConfig, String> {
    let value: Value = serde_json::from_str(content)
        .map_err(|err| format!("Failed to parse config {}: {}", path.display(), err))?;
    let object = match value {
        Value::Object(object) => object,
        _ => {
            return Err(format!(
                "Config {} must be a JSON object",
                path.display()
            ))
        }
    };

    let warnings = unknown_keys(&object)
        .into_iter()
        .map(|key| format!("unknown config key {} in {}", key, path.display()))
        .collect();

    let overrides: ConfigOverrides = serde_path_to_error::deserialize(Value::Object(object))
        .map_err(|err| format!("Failed to parse config {}: {}", path.display(), err))?;

    let mut config = defaults;
    config.apply(overrides);
    Ok(LoadedConfig { config, warnings })
}

fn unknown_keys(object: &Map<String, Value>) -> Vec<String> {
    object
        .keys()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .cloned()
        .collect()
}

/// Writes `config` as pretty JSON, replacing `path` atomically.
pub(crate) fn save_config(path: &Path, config: &MobConfig) -> Result<(), String> {
    let mut content = serde_json::to_string_pretty(config)
        .map_err(|err| format!("Failed to serialize config: {}", err))?;
    content.push('\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut file = NamedTempFile::new_in(&dir)
        .map_err(|err| format!("Failed to create temp file in {}: {}", dir.display(), err))?;
    file.write_all(content.as_bytes())
        .map_err(|err| format!("Failed to write {}: {}", path.display(), err))?;
    file.persist(path)
        .map(|_| ())
        .map_err(|err| format!("Failed to write {}: {}", path.display(), err.error))
}
