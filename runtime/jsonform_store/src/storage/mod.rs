// Copyright 2015-2024 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use crate::config::StoreConfig;
use crate::error::StoreError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The location of a persistent document: a sequence of directory segments followed by the
/// name of the document itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageLocation {
    segments: Vec<String>,
    leaf: String,
}

impl StorageLocation {
    /// Derive the location of the document for a type from its fully qualified name. Each
    /// component of the path of the type becomes a directory. Type parameters stay within the
    /// final segment and any characters that are not safe in a file name are replaced.
    pub fn for_type_name(name: &str, leaf: &str) -> Result<StorageLocation, StoreError> {
        if leaf.is_empty() || leaf.contains(|c: char| c == '/' || c == '\\') || is_dots(leaf) {
            return Err(StoreError::InvalidLocation(leaf.to_string()));
        }
        let segments = split_path(name)
            .into_iter()
            .map(sanitize)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        if segments.is_empty() {
            Err(StoreError::InvalidLocation(name.to_string()))
        } else {
            Ok(StorageLocation {
                segments,
                leaf: leaf.to_string(),
            })
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// The path of the document relative to a root directory.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(&self.segments);
        path.push(&self.leaf);
        path
    }
}

impl Display for StorageLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            write!(f, "{}/", segment)?;
        }
        f.write_str(&self.leaf)
    }
}

/// Split a type name on the `::` separators that are not nested within type parameters.
fn split_path(name: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' | b')' | b']' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                parts.push(&name[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&name[start..]);
    parts
}

fn sanitize(segment: &str) -> String {
    let cleaned = segment
        .replace("::", ".")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>();
    if is_dots(&cleaned) {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}

fn is_dots(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '.')
}

/// A store of text documents, addressed by [`StorageLocation`].
pub trait DocumentStore: Send + Sync {
    /// Load the document at a location, if it exists.
    fn load(&self, location: &StorageLocation) -> Result<Option<String>, StoreError>;

    /// Replace the document at a location.
    fn save(&self, location: &StorageLocation, document: &str) -> Result<(), StoreError>;

    /// Delete the document at a location. Deleting a document that does not exist succeeds.
    fn delete(&self, location: &StorageLocation) -> Result<(), StoreError>;
}

/// Stores each document as a file beneath a root directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FsStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        FsStore::new(&config.root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentStore for FsStore {
    fn load(&self, location: &StorageLocation) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(location.to_path(&self.root)) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, location: &StorageLocation, document: &str) -> Result<(), StoreError> {
        let path = location.to_path(&self.root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staging = path.with_extension("partial");
        fs::write(&staging, document)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn delete(&self, location: &StorageLocation) -> Result<(), StoreError> {
        match fs::remove_file(location.to_path(&self.root)) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps documents in memory. Useful for tests and for processes that should not touch the
/// file system.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<StorageLocation, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, location: &StorageLocation) -> Result<Option<String>, StoreError> {
        Ok(self.documents.lock().get(location).cloned())
    }

    fn save(&self, location: &StorageLocation, document: &str) -> Result<(), StoreError> {
        self.documents
            .lock()
            .insert(location.clone(), document.to_string());
        Ok(())
    }

    fn delete(&self, location: &StorageLocation) -> Result<(), StoreError> {
        self.documents.lock().remove(location);
        Ok(())
    }
}

impl<S: DocumentStore> DocumentStore for std::sync::Arc<S> {
    fn load(&self, location: &StorageLocation) -> Result<Option<String>, StoreError> {
        (**self).load(location)
    }

    fn save(&self, location: &StorageLocation, document: &str) -> Result<(), StoreError> {
        (**self).save(location, document)
    }

    fn delete(&self, location: &StorageLocation) -> Result<(), StoreError> {
        (**self).delete(location)
    }
}
