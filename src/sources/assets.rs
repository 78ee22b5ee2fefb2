use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::{Pattern, glob};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::CollectText;
use crate::config::AssetsConfig;
use crate::core::DiscoverySet;

/// Collects strings stored under a named property in JSON asset files.
#[derive(Debug, Clone)]
pub struct AssetSource {
    root: PathBuf,
    includes: Vec<String>,
    ignores: Vec<String>,
    property: String,
}

impl AssetSource {
    pub fn from_config(config: &AssetsConfig, root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            includes: config.includes.clone(),
            ignores: config.ignores.clone(),
            property: config.property.clone(),
        }
    }
}

impl CollectText for AssetSource {
    fn name(&self) -> &str {
        "assets"
    }

    fn collect(&self) -> Result<DiscoverySet> {
        let mut files: Vec<PathBuf> = scan_asset_files(&self.root, &self.includes, &self.ignores)
            .into_iter()
            .collect();
        files.sort();
        debug!(files = files.len(), property = %self.property, "scanning assets");

        let results: Vec<Result<Vec<String>>> = files
            .par_iter()
            .map(|path| read_asset_texts(path, &self.property))
            .collect();

        let mut found = DiscoverySet::new();
        for texts in results {
            found.extend(texts?);
        }
        Ok(found)
    }
}

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// JSON files under `includes` (relative to `base_dir`), minus `ignores`.
pub fn scan_asset_files(base_dir: &Path, includes: &[String], ignores: &[String]) -> HashSet<PathBuf> {
    let mut files = HashSet::new();

    let mut literal_ignore_paths: Vec<PathBuf> = Vec::new();
    let mut glob_patterns: Vec<Pattern> = Vec::new();
    for p in ignores {
        if is_glob_pattern(p) {
            match Pattern::new(p) {
                Ok(pattern) => glob_patterns.push(pattern),
                Err(e) => warn!(pattern = %p, error = %e, "invalid ignore pattern"),
            }
        } else {
            literal_ignore_paths.push(base_dir.join(p));
        }
    }

    let dirs_to_scan: Vec<PathBuf> = if includes.is_empty() {
        vec![base_dir.to_path_buf()]
    } else {
        let mut paths = Vec::new();
        for inc in includes {
            if is_glob_pattern(inc) {
                let full_pattern = base_dir.join(inc);
                match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => paths.extend(entries.flatten().filter(|entry| entry.is_dir())),
                    Err(e) => warn!(pattern = %inc, error = %e, "invalid include pattern"),
                }
            } else {
                let path = base_dir.join(inc);
                if path.exists() {
                    paths.push(path);
                } else {
                    debug!(path = %path.display(), "asset include does not exist");
                }
            }
        }
        paths
    };

    for dir in dirs_to_scan {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "cannot access asset path");
                    continue;
                }
            };
            let path = entry.path();

            if literal_ignore_paths
                .iter()
                .any(|ignore_path| path.starts_with(ignore_path))
            {
                continue;
            }
            let path_str = path.to_string_lossy();
            if glob_patterns.iter().any(|p| p.matches(&path_str)) {
                continue;
            }

            if path.is_file() && is_asset_file(path) {
                files.insert(path.to_path_buf());
            }
        }
    }

    files
}

fn is_asset_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

fn read_asset_texts(path: &Path, property: &str) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read asset: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse asset: {}", path.display()))?;

    let mut texts = Vec::new();
    collect_property(&value, property, &mut texts);
    Ok(texts)
}

/// Every string, or string array element, stored under `property` at any depth.
fn collect_property(value: &Value, property: &str, texts: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == property {
                    match child {
                        Value::String(text) => push_text(text, texts),
                        Value::Array(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .for_each(|text| push_text(text, texts)),
                        _ => {}
                    }
                }
                collect_property(child, property, texts);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_property(item, property, texts);
            }
        }
        _ => {}
    }
}

fn push_text(text: &str, texts: &mut Vec<String>) {
    if !text.trim().is_empty() {
        texts.push(text.to_string());
    }
}
