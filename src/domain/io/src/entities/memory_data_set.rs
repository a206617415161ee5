// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::any::Any;
use std::sync::RwLock;

use internal_error::ErrorIntoInternal;

use crate::{Data, DataNotSavedError, DataSet, DataSetDescription, DataSetError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Keeps a single value in process memory.
///
/// Neither `save` nor `load` copy the value: every load returns a handle to
/// the very object that was last saved.
pub struct MemoryDataSet {
    data: RwLock<Option<Data>>,
}

impl MemoryDataSet {
    pub const TYPE_NAME: &'static str = "MemoryDataSet";

    pub fn new() -> Self {
        Self {
            data: RwLock::new(None),
        }
    }

    pub fn with_data(data: Data) -> Self {
        Self {
            data: RwLock::new(Some(data)),
        }
    }

    pub fn from_value<T: Any + Send + Sync>(value: T) -> Self {
        Self::with_data(Data::new(value))
    }
}

impl Default for MemoryDataSet {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl DataSet for MemoryDataSet {
    fn load(&self) -> Result<Data, DataSetError> {
        let readable_data = self.data.read().map_err(|e| e.to_string().int_err())?;

        let Some(data) = readable_data.as_ref() else {
            return Err(DataNotSavedError::new(Self::TYPE_NAME).into());
        };

        Ok(data.clone())
    }

    fn save(&self, data: Data) -> Result<(), DataSetError> {
        tracing::debug!(data_type = data.type_name(), "Saving data in memory");

        let mut writable_data = self.data.write().map_err(|e| e.to_string().int_err())?;
        *writable_data = Some(data);

        Ok(())
    }

    fn exists(&self) -> Result<bool, DataSetError> {
        let readable_data = self.data.read().map_err(|e| e.to_string().int_err())?;
        Ok(readable_data.is_some())
    }

    fn release(&self) {
        match self.data.write() {
            Ok(mut writable_data) => *writable_data = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    fn describe(&self) -> DataSetDescription {
        let description = DataSetDescription::new(Self::TYPE_NAME);

        let type_name = match self.data.read() {
            Ok(readable_data) => readable_data.as_ref().map(Data::short_type_name),
            Err(poisoned) => poisoned.into_inner().as_ref().map(Data::short_type_name),
        };

        match type_name {
            Some(type_name) => description.with_attribute("data", format!("<{type_name}>")),
            None => description,
        }
    }
}

impl std::fmt::Display for MemoryDataSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.describe(), f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
