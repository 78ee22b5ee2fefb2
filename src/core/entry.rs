use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dictionary::TextDictionary;
use crate::error::{ExtractError, ExtractResult};

/// On-disk shape of a dictionary file: `{"Text": {"key": "value"}}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Composition {
    #[serde(rename = "Text", default)]
    text: TextDictionary,
}

/// One per-language dictionary backed by a JSON file.
#[derive(Debug, Clone)]
pub struct Entry {
    title: String,
    path: PathBuf,
    text: TextDictionary,
}

impl Entry {
    /// Declare an entry for `path`. Its title is the file stem
    /// (`locales/fr.json` → `fr`). Nothing is read until [`Entry::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            title: title_from_path(&path),
            path,
            text: TextDictionary::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &TextDictionary {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut TextDictionary {
        &mut self.text
    }

    /// Replace the in-memory dictionary with the file's contents.
    ///
    /// A missing or blank file loads as an empty dictionary.
    pub fn load(&mut self) -> ExtractResult<()> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "entry file missing, starting empty");
                String::new()
            }
            Err(e) => {
                return Err(ExtractError::EntryLoad {
                    path: self.path.clone(),
                    message: e.to_string(),
                });
            }
        };

        self.text = if content.trim().is_empty() {
            TextDictionary::new()
        } else {
            serde_json::from_str::<Composition>(&content)
                .map_err(|e| ExtractError::EntryLoad {
                    path: self.path.clone(),
                    message: e.to_string(),
                })?
                .text
        };

        debug!(title = %self.title, keys = self.text.len(), "entry loaded");
        Ok(())
    }

    /// Write the dictionary back with 2-space indentation and a trailing
    /// newline. The file is replaced atomically through a sibling temp file.
    pub fn save(&self) -> ExtractResult<()> {
        self.stage()?.commit()
    }

    /// Write the serialized dictionary to the sibling temp file without
    /// touching the entry file. [`StagedSave::commit`] moves it into place;
    /// dropping the staged save discards it.
    pub fn stage(&self) -> ExtractResult<StagedSave> {
        let save_err = |source: io::Error| ExtractError::EntrySave {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(save_err)?;
        }

        let composition = Composition {
            text: self.text.clone(),
        };
        let content = serde_json::to_string_pretty(&composition)
            .map_err(|e| save_err(io::Error::other(e)))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, format!("{}\n", content)).map_err(save_err)?;

        Ok(StagedSave {
            title: self.title.clone(),
            path: self.path.clone(),
            tmp_path: Some(tmp_path),
            keys: self.text.len(),
        })
    }
}

/// An entry's new contents, written next to it and not yet renamed over it.
#[derive(Debug)]
pub struct StagedSave {
    title: String,
    path: PathBuf,
    tmp_path: Option<PathBuf>,
    keys: usize,
}

impl StagedSave {
    pub fn commit(mut self) -> ExtractResult<()> {
        let Some(tmp_path) = self.tmp_path.take() else {
            return Ok(());
        };
        if let Err(source) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ExtractError::EntrySave {
                path: self.path.clone(),
                source,
            });
        }

        debug!(title = %self.title, keys = self.keys, "entry saved");
        Ok(())
    }
}

impl Drop for StagedSave {
    fn drop(&mut self) {
        if let Some(tmp_path) = self.tmp_path.take() {
            let _ = fs::remove_file(tmp_path);
        }
    }
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
