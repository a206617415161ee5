// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::{
    CatalogConfig,
    CatalogFromConfig,
    CatalogFromConfigError,
    Credentials,
    Data,
    DataSet,
    DataSetBuildError,
    DataSetError,
    DataSetTypeMissingError,
    DataSetTypeNotFoundError,
    DataSetTypeRegistry,
    MemoryDataSet,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Registry of named datasets that routes loads and saves to the dataset
/// registered under the requested name.
///
/// Datasets are shared handles, so a [`DataCatalog::shallow_copy`] and the
/// original route to the same underlying datasets.
#[derive(Clone, Default)]
pub struct DataCatalog {
    data_sets: HashMap<String, Arc<dyn DataSet>>,
}

impl DataCatalog {
    pub fn new(data_sets: HashMap<String, Arc<dyn DataSet>>) -> Self {
        Self { data_sets }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DataSet>> {
        self.data_sets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.data_sets.contains_key(name)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%name))]
    pub fn load(&self, name: &str) -> Result<Data, LoadDataError> {
        let data_set = self.require(name)?;
        Ok(data_set.load()?)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%name))]
    pub fn save(&self, name: &str, data: Data) -> Result<(), SaveDataError> {
        let data_set = self.require(name)?;
        Ok(data_set.save(data)?)
    }

    /// Unknown datasets do not exist
    pub fn exists(&self, name: &str) -> Result<bool, DataSetError> {
        match self.data_sets.get(name) {
            Some(data_set) => data_set.exists(),
            None => Ok(false),
        }
    }

    pub fn release(&self, name: &str) -> Result<(), DataSetNotFoundError> {
        self.require(name)?.release();
        Ok(())
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        data_set: Arc<dyn DataSet>,
        replace: bool,
    ) -> Result<(), DataSetAlreadyExistsError> {
        let name = name.into();

        if self.contains(&name) {
            if !replace {
                return Err(DataSetAlreadyExistsError::new(name));
            }
            tracing::warn!(%name, "Replacing dataset");
        }

        self.data_sets.insert(name, data_set);
        Ok(())
    }

    /// Registers the dataset unconditionally, returning the one it replaced
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        data_set: Arc<dyn DataSet>,
    ) -> Option<Arc<dyn DataSet>> {
        self.data_sets.insert(name.into(), data_set)
    }

    pub fn add_all(
        &mut self,
        data_sets: impl IntoIterator<Item = (String, Arc<dyn DataSet>)>,
        replace: bool,
    ) -> Result<(), DataSetAlreadyExistsError> {
        for (name, data_set) in data_sets {
            self.add(name, data_set, replace)?;
        }
        Ok(())
    }

    /// Adds every value wrapped in its own [`MemoryDataSet`]
    pub fn add_feed_dict(
        &mut self,
        feed_dict: impl IntoIterator<Item = (String, Data)>,
        replace: bool,
    ) -> Result<(), DataSetAlreadyExistsError> {
        for (name, data) in feed_dict {
            self.add(name, Arc::new(MemoryDataSet::with_data(data)), replace)?;
        }
        Ok(())
    }

    /// Names of all registered datasets in sorted order
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.data_sets.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn shallow_copy(&self) -> Self {
        self.clone()
    }

    fn require(&self, name: &str) -> Result<&Arc<dyn DataSet>, DataSetNotFoundError> {
        self.data_sets
            .get(name)
            .ok_or_else(|| DataSetNotFoundError::new(name))
    }
}

impl std::fmt::Debug for DataCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataCatalog")
            .field("data_sets", &self.list())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl CatalogFromConfig for DataCatalog {
    fn from_config(
        config: &CatalogConfig,
        credentials: &Credentials,
        data_set_types: &DataSetTypeRegistry,
    ) -> Result<Self, CatalogFromConfigError> {
        let mut data_sets = HashMap::new();

        for (name, data_set_config) in &config.data_sets {
            let Some(type_name) = &data_set_config.type_name else {
                return Err(DataSetTypeMissingError::new(name).into());
            };

            let Some(builder) = data_set_types.get(type_name) else {
                return Err(DataSetTypeNotFoundError::new(name, type_name).into());
            };

            let params = credentials.resolve(&data_set_config.params)?;

            let data_set = builder(&params)
                .map_err(|e| DataSetBuildError::new(name, type_name, e))?;

            tracing::debug!(%name, %type_name, "Dataset created from configuration");

            data_sets.insert(name.clone(), data_set);
        }

        Ok(Self::new(data_sets))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum LoadDataError {
    #[error(transparent)]
    NotFound(#[from] DataSetNotFoundError),

    #[error(transparent)]
    DataSet(#[from] DataSetError),
}

#[derive(Error, Debug)]
pub enum SaveDataError {
    #[error(transparent)]
    NotFound(#[from] DataSetNotFoundError),

    #[error(transparent)]
    DataSet(#[from] DataSetError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("DataSet '{name}' not found in the catalog")]
pub struct DataSetNotFoundError {
    pub name: String,
}

impl DataSetNotFoundError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Error, Debug)]
#[error("DataSet '{name}' has already been registered")]
pub struct DataSetAlreadyExistsError {
    pub name: String,
}

impl DataSetAlreadyExistsError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
