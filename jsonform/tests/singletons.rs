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

use jsonform::form::{read_json, Record as _, Registry};
use jsonform::store::{FsStore, Singleton, Singletons, StoreConfig};
use jsonform::{FormError, ModelError, Record};
use std::collections::BTreeMap;
use std::sync::Once;
use tempdir::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

fn init_trace() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Record, Debug)]
#[form(singleton)]
struct ServerConfig {
    #[form(member)]
    host: String,
    #[form(member)]
    port: Option<u16>,
    #[form(member)]
    limits: BTreeMap<String, u32>,
    restarts: u32,
}

#[test]
fn construction_requires_factory() {
    assert!(matches!(
        ServerConfig::construct(),
        Err(ModelError::SingletonOutsideFactory(_))
    ));
    assert!(matches!(
        read_json::<ServerConfig>("{}"),
        Err(FormError::Model(ModelError::SingletonOutsideFactory(_)))
    ));
}

#[test]
fn storage_name_is_type_path() {
    assert_eq!(
        ServerConfig::storage_name(),
        std::any::type_name::<ServerConfig>()
    );
}

#[test]
fn persisted_between_processes() {
    init_trace();
    let dir = TempDir::new("jsonform").expect("Failed to create temporary directory.");
    let config = StoreConfig::default()
        .with_root(dir.path())
        .with_leaf_name("config.json");

    {
        let singletons = Singletons::new(
            Registry::new(),
            FsStore::from_config(&config),
            config.leaf_name.clone(),
        );
        let first = singletons.get_instance::<ServerConfig>().unwrap();
        let second = singletons.get_instance::<ServerConfig>().unwrap();
        {
            let mut guard = first.write();
            guard.host = "localhost".to_string();
            guard.limits.insert("connections".to_string(), 64);
            guard.restarts = 3;
        }
        assert_eq!(second.read().host, "localhost");
        assert_eq!(second.read().port, None);
    }

    let location = singletons_location(&config);
    assert!(location.is_file());

    let singletons = Singletons::new(
        Registry::new(),
        FsStore::from_config(&config),
        config.leaf_name.clone(),
    );
    let restored = singletons.get_instance::<ServerConfig>().unwrap();
    let restored = restored.read();
    assert_eq!(restored.host, "localhost");
    assert_eq!(restored.limits.get("connections"), Some(&64));
    assert_eq!(restored.restarts, 0);
}

fn singletons_location(config: &StoreConfig) -> std::path::PathBuf {
    let mut path = config.root.clone();
    path.push("singletons");
    path.push("ServerConfig");
    path.push(&config.leaf_name);
    path
}
