use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use crate::block::BlockType;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Blocknest";
const APPLICATION: &str = "blocknest";
const CONFIG_FILE_NAME: &str = "policy.toml";

/// Configuration for the nested editing policy: which block types may
/// never carry children, and how deep lists may nest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyConfig {
    pub nesting_disabled_types: HashSet<BlockType>,
    pub max_list_depth: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            nesting_disabled_types: HashSet::from([BlockType::CodeBlock, BlockType::Atomic]),
            max_list_depth: 4,
        }
    }
}

impl PolicyConfig {
    pub fn nesting_disabled(&self, block_type: &BlockType) -> bool {
        self.nesting_disabled_types.contains(block_type)
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

pub fn load_config(path: &Path) -> Option<PolicyConfig> {
    let contents = fs::read_to_string(path).ok()?;
    match toml::from_str::<PolicyConfig>(&contents) {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("Failed to parse policy config {}: {err}", path.display());
            None
        }
    }
}

pub fn save_config(path: &Path, config: &PolicyConfig) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let toml = toml::to_string_pretty(config).map_err(|err| {
        io::Error::new(ErrorKind::Other, format!("toml serialization error: {err}"))
    })?;

    fs::write(path, toml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_disables_code_and_atomic() {
        let config = PolicyConfig::default();
        assert!(config.nesting_disabled(&BlockType::CodeBlock));
        assert!(config.nesting_disabled(&BlockType::Atomic));
        assert!(!config.nesting_disabled(&BlockType::Unstyled));
        assert_eq!(config.max_list_depth, 4);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = PolicyConfig::default();
        config
            .nesting_disabled_types
            .insert(BlockType::Custom("embed-card".to_string()));
        config.max_list_depth = 6;

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed: PolicyConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_from_plain_toml() {
        let parsed: PolicyConfig = toml::from_str(
            r#"
            nesting_disabled_types = ["code-block", "atomic", "embed-card"]
            max_list_depth = 2
            "#,
        )
        .unwrap();
        assert!(parsed.nesting_disabled(&BlockType::CodeBlock));
        assert!(parsed.nesting_disabled(&BlockType::Custom("embed-card".to_string())));
        assert_eq!(parsed.max_list_depth, 2);
    }
}
