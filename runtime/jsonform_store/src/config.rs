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

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the root directory of the singleton documents.
pub const STORE_ROOT_VAR: &str = "JSONFORM_STORE_ROOT";

const DEFAULT_ROOT: &str = ".jsonform";
const DEFAULT_LEAF_NAME: &str = "singleton.json";

/// Configuration for where persistent singleton documents are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// The directory under which all documents are stored.
    pub root: PathBuf,
    /// The file name of each document, within the directory derived from its type.
    pub leaf_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            root: PathBuf::from(DEFAULT_ROOT),
            leaf_name: DEFAULT_LEAF_NAME.to_string(),
        }
    }
}

impl StoreConfig {
    /// The default configuration with the root taken from [`STORE_ROOT_VAR`], if it is set.
    pub fn from_env() -> Self {
        let config = StoreConfig::default();
        match env::var_os(STORE_ROOT_VAR) {
            Some(root) if !root.is_empty() => config.with_root(root),
            _ => config,
        }
    }

    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root = root.as_ref().to_path_buf();
        self
    }

    pub fn with_leaf_name<S: Into<String>>(mut self, leaf_name: S) -> Self {
        self.leaf_name = leaf_name.into();
        self
    }
}
