use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".loctextrc.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Dictionary files, relative to the config directory.
    #[serde(default = "default_entries")]
    pub entries: Vec<String>,
    /// Strings that are always considered referenced.
    #[serde(default)]
    pub texts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanner: Option<ScannerConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsConfig {
    #[serde(default = "default_asset_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    /// Name of the JSON property whose string values are localizable.
    #[serde(default = "default_asset_property")]
    pub property: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerConfig {
    pub executable: String,
    #[serde(default = "default_context_path")]
    pub context_path: String,
    #[serde(default = "default_endpoint_name")]
    pub endpoint_name: String,
}

fn default_entries() -> Vec<String> {
    vec!["locales/en.json".to_string()]
}

fn default_asset_includes() -> Vec<String> {
    vec!["assets".to_string()]
}

fn default_asset_property() -> String {
    "LocalizationText".to_string()
}

fn default_context_path() -> String {
    ".".to_string()
}

fn default_endpoint_name() -> String {
    "loctext-scanner".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entries: default_entries(),
            texts: Vec::new(),
            assets: Some(AssetsConfig::default()),
            scanner: None,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            includes: default_asset_includes(),
            ignores: Vec::new(),
            property: default_asset_property(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any asset glob pattern is invalid, the asset
    /// property is empty, or the scanner endpoint name cannot be used as a
    /// single endpoint name.
    pub fn validate(&self) -> Result<()> {
        if let Some(assets) = &self.assets {
            for pattern in &assets.ignores {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'assets.ignores': \"{}\"", pattern)
                })?;
            }
            // Patterns without * or ? are literal directory paths.
            for pattern in &assets.includes {
                if pattern.contains('*') || pattern.contains('?') {
                    Pattern::new(pattern).with_context(|| {
                        format!("Invalid glob pattern in 'assets.includes': \"{}\"", pattern)
                    })?;
                }
            }
            if assets.property.trim().is_empty() {
                bail!("'assets.property' must not be empty");
            }
        }

        if let Some(scanner) = &self.scanner {
            if scanner.executable.trim().is_empty() {
                bail!("'scanner.executable' must not be empty");
            }
            let name = &scanner.endpoint_name;
            if name.trim().is_empty() {
                bail!("'scanner.endpointName' must not be empty");
            }
            if name.contains(['/', '\\']) {
                bail!(
                    "'scanner.endpointName' must not contain path separators: \"{}\"",
                    name
                );
            }
        }

        Ok(())
    }

    /// Entry paths resolved against `root`.
    pub fn entry_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.entries.iter().map(|entry| root.join(entry)).collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory relative paths in the config resolve against.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                root,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.entries, vec!["locales/en.json"]);
        assert!(config.texts.is_empty());
        assert_eq!(config.assets.unwrap().property, "LocalizationText");
        assert!(config.scanner.is_none());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "entries": ["locales/en.json", "locales/fr.json"],
              "texts": ["OK", "Cancel"],
              "scanner": { "executable": "tools/scan", "contextPath": "src" }
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.entries, vec!["locales/en.json", "locales/fr.json"]);
        assert_eq!(config.texts, vec!["OK", "Cancel"]);
        assert_eq!(config.assets, None);
        assert_eq!(
            config.scanner,
            Some(ScannerConfig {
                executable: "tools/scan".to_string(),
                context_path: "src".to_string(),
                endpoint_name: "loctext-scanner".to_string(),
            })
        );
    }

    #[test]
    fn test_partial_assets_config() {
        let json = r#"{ "assets": { "ignores": ["**/draft/**"] } }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.entries, default_entries());
        assert_eq!(
            config.assets,
            Some(AssetsConfig {
                includes: default_asset_includes(),
                ignores: vec!["**/draft/**".to_string()],
                property: default_asset_property(),
            })
        );
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("ui");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let found = find_config_file(dir.path());
        assert!(found.is_none());
    }

    #[test]
    fn test_load_config_from_file_sets_root() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("tools");
        fs::create_dir(&sub_dir).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "entries": ["i18n/de.json"] }"#,
        )
        .unwrap();

        let result = load_config(&sub_dir).unwrap();
        assert!(result.from_file);
        assert_eq!(result.root, dir.path());
        assert_eq!(
            result.config.entry_paths(&result.root),
            vec![dir.path().join("i18n/de.json")]
        );
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.root, dir.path());
        assert_eq!(result.config.entries, default_entries());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            assets: Some(AssetsConfig {
                ignores: vec!["[invalid".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("assets.ignores"));
    }

    #[test]
    fn test_validate_literal_bracket_include_is_valid() {
        let config = Config {
            assets: Some(AssetsConfig {
                includes: vec!["assets/[menus]".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_property() {
        let config = Config {
            assets: Some(AssetsConfig {
                property: " ".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_endpoint_name() {
        let scanner = |name: &str| Config {
            scanner: Some(ScannerConfig {
                executable: "scan".to_string(),
                context_path: ".".to_string(),
                endpoint_name: name.to_string(),
            }),
            ..Default::default()
        };
        assert!(scanner("MB Localization Parser").validate().is_ok());
        assert!(scanner("").validate().is_err());
        assert!(scanner("a/b").validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "assets": { "ignores": ["[invalid"] } }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"entries\""));
        assert!(!json.contains("\"scanner\""));
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.assets, Some(AssetsConfig::default()));
    }
}
