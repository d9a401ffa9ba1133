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

use jsonform_form::{FormError, ModelError};
use std::io;
use thiserror::Error;

/// Errors raised while loading or storing persistent documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document could not be read or written as the expected type.
    #[error(transparent)]
    Form(#[from] FormError),
    /// An IO error produced by the underlying storage.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The storage location for a type could not be derived from its name.
    #[error("'{0}' cannot be used as a storage location.")]
    InvalidLocation(String),
    /// An instance was requested after the singletons were shut down.
    #[error("The singletons have already been shut down.")]
    Closed,
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        StoreError::Form(FormError::Model(err))
    }
}

impl PartialEq for StoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StoreError::Form(l), StoreError::Form(r)) => l.eq(r),
            (StoreError::Io(l), StoreError::Io(r)) => l.kind().eq(&r.kind()),
            (StoreError::InvalidLocation(l), StoreError::InvalidLocation(r)) => l.eq(r),
            (StoreError::Closed, StoreError::Closed) => true,
            _ => false,
        }
    }
}
