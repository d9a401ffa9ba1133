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
use crate::register_types;
use crate::storage::{DocumentStore, FsStore, StorageLocation};
use jsonform_form::{ModelError, PrintStrategy, Record, Registry};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// A record with exactly one durable instance per process.
///
/// The instance is only ever created by [`Singletons::get_instance`], which loads it from its
/// document (or from an empty object if there is none). The state is written back when the
/// [`Singletons`] are shut down or when explicitly flushed.
pub trait Singleton: Record + Send + Sync {
    /// The name from which the storage location of the instance is derived.
    fn storage_name() -> &'static str {
        type_name::<Self>()
    }
}

thread_local! {
    static FACTORY: RefCell<Vec<TypeId>> = RefCell::new(vec![]);
}

/// Marks the current thread as constructing a singleton of one type until dropped.
struct FactoryScope;

impl FactoryScope {
    fn enter<T: 'static>() -> Self {
        FACTORY.with(|stack| stack.borrow_mut().push(TypeId::of::<T>()));
        FactoryScope
    }
}

impl Drop for FactoryScope {
    fn drop(&mut self) {
        FACTORY.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Check that a singleton of type `T` is being constructed by its factory. Records derived
/// as singletons call this from their constructor.
pub fn ensure_factory<T: 'static>() -> Result<(), ModelError> {
    let permitted = FACTORY.with(|stack| stack.borrow().last() == Some(&TypeId::of::<T>()));
    if permitted {
        Ok(())
    } else {
        Err(ModelError::SingletonOutsideFactory(
            type_name::<T>().to_string(),
        ))
    }
}

type Flush<S> = Arc<dyn Fn(&Registry, &S) -> Result<(), StoreError> + Send + Sync>;

struct Loaded<S> {
    name: &'static str,
    instance: Box<dyn Any + Send + Sync>,
    flush: Flush<S>,
}

struct State<S> {
    closed: bool,
    order: Vec<TypeId>,
    loaded: HashMap<TypeId, Loaded<S>>,
}

/// The cache of singleton instances, backed by a [`DocumentStore`].
///
/// Each singleton type is loaded at most once. When the cache is shut down (explicitly, or
/// when it is dropped) every loaded instance is written back to its document exactly once.
/// After shutdown no handles are handed out, not even to instances that were already loaded.
///
/// Instances are never locked while the cache itself is locked, so a thread may hold the lock
/// on one instance while requesting another.
pub struct Singletons<S: DocumentStore> {
    registry: Registry,
    store: S,
    leaf_name: String,
    state: RwLock<State<S>>,
}

lazy_static! {
    static ref GLOBAL: Singletons<FsStore> = Singletons::from_config(&StoreConfig::from_env());
}

impl Singletons<FsStore> {
    /// Singletons stored in the file system, as described by the configuration, using the
    /// global [`Registry`].
    pub fn from_config(config: &StoreConfig) -> Self {
        Singletons::new(
            Registry::global().clone(),
            FsStore::from_config(config),
            config.leaf_name.clone(),
        )
    }

    /// The process wide singletons, configured from the environment. As this is never dropped,
    /// [`Singletons::shutdown`] must be called before the process exits for the state of the
    /// instances to be saved.
    pub fn global() -> &'static Singletons<FsStore> {
        &GLOBAL
    }
}

impl<S: DocumentStore> Singletons<S> {
    pub fn new<L: Into<String>>(registry: Registry, store: S, leaf_name: L) -> Self {
        Singletons {
            registry,
            store,
            leaf_name: leaf_name.into(),
            state: RwLock::new(State {
                closed: false,
                order: vec![],
                loaded: HashMap::new(),
            }),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The location of the document for a singleton type.
    pub fn location_of<T: Singleton>(&self) -> Result<StorageLocation, StoreError> {
        StorageLocation::for_type_name(T::storage_name(), &self.leaf_name)
    }

    /// Get the instance of a singleton type, loading it if this is the first request. Fails
    /// with [`StoreError::Closed`] once the cache has been shut down.
    pub fn get_instance<T: Singleton>(&self) -> Result<Arc<RwLock<T>>, StoreError> {
        let key = TypeId::of::<T>();
        {
            let state = self.state.read();
            if state.closed {
                return Err(StoreError::Closed);
            }
            if let Some(loaded) = state.loaded.get(&key) {
                return handle(loaded);
            }
        }
        let mut state = self.state.write();
        if state.closed {
            return Err(StoreError::Closed);
        }
        if let Some(loaded) = state.loaded.get(&key) {
            return handle(loaded);
        }
        let location = self.location_of::<T>()?;
        let instance = Arc::new(RwLock::new(self.load::<T>(&location)?));

        let flushed = instance.clone();
        let flush: Flush<S> = Arc::new(move |registry, store| {
            let document = registry.write_string(&*flushed.read(), PrintStrategy::pretty())?;
            store.save(&location, &document)?;
            debug!(singleton = T::storage_name(), location = %location, "Flushed singleton.");
            Ok(())
        });
        state.order.push(key);
        state.loaded.insert(
            key,
            Loaded {
                name: T::storage_name(),
                instance: Box::new(instance.clone()),
                flush,
            },
        );
        Ok(instance)
    }

    fn load<T: Singleton>(&self, location: &StorageLocation) -> Result<T, StoreError> {
        register_types(&self.registry)?;
        let _scope = FactoryScope::enter::<T>();
        let instance = match self.store.load(location)? {
            Some(document) => {
                let instance = self.registry.read_str::<T>(&document)?;
                info!(singleton = T::storage_name(), location = %location, "Loaded singleton.");
                instance
            }
            None => {
                let instance = self.registry.read_str::<T>("{}")?;
                info!(singleton = T::storage_name(), location = %location, "Created singleton.");
                instance
            }
        };
        Ok(instance)
    }

    /// Write the current state of a singleton to its document. Singletons that have not been
    /// loaded are left untouched.
    pub fn flush<T: Singleton>(&self) -> Result<(), StoreError> {
        let flush = self
            .state
            .read()
            .loaded
            .get(&TypeId::of::<T>())
            .map(|loaded| loaded.flush.clone());
        match flush {
            Some(flush) => flush(&self.registry, &self.store),
            None => Ok(()),
        }
    }

    pub fn is_loaded<T: Singleton>(&self) -> bool {
        self.state.read().loaded.contains_key(&TypeId::of::<T>())
    }

    pub fn is_shut_down(&self) -> bool {
        self.state.read().closed
    }

    /// Write every loaded singleton back to its document, in the order in which they were
    /// loaded. Subsequent calls do nothing and no further instances may be loaded. All of the
    /// singletons are flushed even if some fail; the first failure is returned.
    ///
    /// A concurrent call returns immediately, without waiting for the first to finish writing.
    pub fn shutdown(&self) -> Result<(), StoreError> {
        let pending = {
            let mut state = self.state.write();
            if state.closed {
                return Ok(());
            }
            state.closed = true;
            state
                .order
                .iter()
                .filter_map(|key| state.loaded.get(key))
                .map(|loaded| (loaded.name, loaded.flush.clone()))
                .collect::<Vec<_>>()
        };
        let mut result = Ok(());
        for (name, flush) in pending {
            if let Err(err) = flush(&self.registry, &self.store) {
                error!(singleton = name, error = %err, "Failed to flush singleton.");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }
}

impl<S: DocumentStore> Drop for Singletons<S> {
    fn drop(&mut self) {
        // Failures have already been logged.
        let _ = self.shutdown();
    }
}

fn handle<S, T: Singleton>(loaded: &Loaded<S>) -> Result<Arc<RwLock<T>>, StoreError> {
    loaded
        .instance
        .downcast_ref::<Arc<RwLock<T>>>()
        .cloned()
        .ok_or_else(|| ModelError::DescriptorCollision(loaded.name.to_string()).into())
}
