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

//! # Identity and Persistence
//!
//! Support for records that have an identity ([`Entity`]) or that are durable, process wide
//! instances ([`Singleton`]).
//!
//! - [`Identifier`]s are allocated from a process wide allocator and are never reused.
//! - [`PrimaryKey`]s order the entities of one type by their key members and [`ErasedKey`]s
//!   allow keys of different entity types to be compared.
//! - [`Singletons`] loads each singleton type from a [`DocumentStore`] at most once and writes
//!   the instances back when it is shut down.

mod config;
mod entity;
mod error;
mod identifier;
mod singleton;
mod storage;

pub use config::{StoreConfig, STORE_ROOT_VAR};
pub use entity::{Entity, ErasedKey, PrimaryKey};
pub use error::StoreError;
pub use identifier::{Identifier, IDENTIFIER};
pub use singleton::{ensure_factory, Singleton, Singletons};
pub use storage::{DocumentStore, FsStore, MemoryStore, StorageLocation};

use jsonform_form::{ModelError, Registry};

/// Register the raw types defined by this crate with a registry. This must be called before
/// resolving any type that contains an [`Identifier`]; derived records do so automatically.
pub fn register_types(registry: &Registry) -> Result<(), ModelError> {
    registry.register(IDENTIFIER)
}
