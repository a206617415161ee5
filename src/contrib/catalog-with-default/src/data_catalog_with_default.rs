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

use pipeline_io::{
    CatalogConfig,
    CatalogFromConfig,
    CatalogFromConfigError,
    CatalogNotConfigurableError,
    Credentials,
    Data,
    DataCatalog,
    DataSet,
    DataSetAlreadyExistsError,
    DataSetError,
    DataSetFactory,
    DataSetNotFoundError,
    DataSetTypeRegistry,
};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A [`DataCatalog`] that never fails to find a dataset: names that are not
/// registered are served by a dataset created on the fly by the default
/// factory.
///
/// With `remember` enabled the created dataset is registered under the
/// requested name, so subsequent requests reuse it and the name shows up in
/// [`DataCatalogWithDefault::list`]. The registry is always consulted before
/// the factory, so registered datasets are never shadowed by the default.
///
/// Loads and saves take `&mut self` because they may register datasets. To
/// share a catalog between threads wrap it in a lock.
pub struct DataCatalogWithDefault {
    catalog: DataCatalog,
    default: Arc<dyn DataSetFactory>,
    remember: bool,
}

impl DataCatalogWithDefault {
    pub const TYPE_NAME: &'static str = "DataCatalogWithDefault";

    pub fn new(
        data_sets: HashMap<String, Arc<dyn DataSet>>,
        default: impl DataSetFactory + 'static,
        remember: bool,
    ) -> Self {
        Self::from_parts(DataCatalog::new(data_sets), Arc::new(default), remember)
    }

    /// Same as [`DataCatalogWithDefault::new`] for callers that obtain the
    /// factory at runtime and may not have one
    pub fn try_new(
        data_sets: HashMap<String, Arc<dyn DataSet>>,
        default: Option<Arc<dyn DataSetFactory>>,
        remember: bool,
    ) -> Result<Self, CatalogWithDefaultError> {
        let Some(default) = default else {
            return Err(DefaultNotCallableError.into());
        };

        Ok(Self::from_parts(
            DataCatalog::new(data_sets),
            default,
            remember,
        ))
    }

    /// Adds a default factory to an existing catalog, e.g. one built with
    /// [`DataCatalog::from_config`]
    pub fn from_data_catalog(catalog: DataCatalog, default: impl DataSetFactory + 'static) -> Self {
        Self::from_parts(catalog, Arc::new(default), false)
    }

    pub fn from_parts(
        catalog: DataCatalog,
        default: Arc<dyn DataSetFactory>,
        remember: bool,
    ) -> Self {
        Self {
            catalog,
            default,
            remember,
        }
    }

    pub fn remember(&self) -> bool {
        self.remember
    }

    pub fn data_catalog(&self) -> &DataCatalog {
        &self.catalog
    }

    pub fn into_data_catalog(self) -> DataCatalog {
        self.catalog
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%name))]
    pub fn load(&mut self, name: &str) -> Result<Data, DataSetError> {
        self.resolve(name).load()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%name))]
    pub fn save(&mut self, name: &str, data: Data) -> Result<(), DataSetError> {
        self.resolve(name).save(data)
    }

    /// Names of registered datasets, including the remembered ones
    pub fn list(&self) -> Vec<String> {
        self.catalog.list()
    }

    /// Does not consult the default factory: unknown datasets do not exist
    pub fn exists(&self, name: &str) -> Result<bool, DataSetError> {
        self.catalog.exists(name)
    }

    pub fn release(&self, name: &str) -> Result<(), DataSetNotFoundError> {
        self.catalog.release(name)
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        data_set: Arc<dyn DataSet>,
        replace: bool,
    ) -> Result<(), DataSetAlreadyExistsError> {
        self.catalog.add(name, data_set, replace)
    }

    pub fn add_all(
        &mut self,
        data_sets: impl IntoIterator<Item = (String, Arc<dyn DataSet>)>,
        replace: bool,
    ) -> Result<(), DataSetAlreadyExistsError> {
        self.catalog.add_all(data_sets, replace)
    }

    pub fn add_feed_dict(
        &mut self,
        feed_dict: impl IntoIterator<Item = (String, Data)>,
        replace: bool,
    ) -> Result<(), DataSetAlreadyExistsError> {
        self.catalog.add_feed_dict(feed_dict, replace)
    }

    /// The copy shares datasets, the default factory and the `remember`
    /// setting with the original
    pub fn shallow_copy(&self) -> Self {
        Self::from_parts(
            self.catalog.shallow_copy(),
            self.default.clone(),
            self.remember,
        )
    }

    fn resolve(&mut self, name: &str) -> Arc<dyn DataSet> {
        if let Some(data_set) = self.catalog.get(name) {
            return data_set.clone();
        }

        let data_set = self.default.create_data_set(name);

        tracing::debug!(
            %name,
            remember = self.remember,
            "Created dataset with the default factory"
        );

        if self.remember {
            self.catalog.insert(name, data_set.clone());
        }

        data_set
    }
}

impl std::fmt::Debug for DataCatalogWithDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(Self::TYPE_NAME)
            .field("data_sets", &self.catalog.list())
            .field("remember", &self.remember)
            .finish_non_exhaustive()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl CatalogFromConfig for DataCatalogWithDefault {
    fn from_config(
        _config: &CatalogConfig,
        _credentials: &Credentials,
        _data_set_types: &DataSetTypeRegistry,
    ) -> Result<Self, CatalogFromConfigError> {
        Err(CatalogNotConfigurableError::new(
            Self::TYPE_NAME,
            "Please use a `DataCatalog` and then the `from_data_catalog` method to add a default.",
        )
        .into())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum CatalogWithDefaultError {
    #[error(transparent)]
    DefaultNotCallable(#[from] DefaultNotCallableError),
}

#[derive(Error, Debug)]
#[error(
    "Default must be a callable with a single input string argument: the key of the requested \
     data set."
)]
pub struct DefaultNotCallableError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
