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

use internal_error::InternalError;

use crate::{Data, DataSet, DataSetParams, MemoryDataSet};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub type DataSetBuilder =
    Arc<dyn Fn(&DataSetParams) -> Result<Arc<dyn DataSet>, InternalError> + Send + Sync>;

/// Maps the `type` names used in catalog configuration to functions that
/// construct the corresponding datasets
#[derive(Clone, Default)]
pub struct DataSetTypeRegistry {
    builders: HashMap<String, DataSetBuilder>,
}

impl DataSetTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that knows about all dataset types shipped with this crate
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(MemoryDataSet::TYPE_NAME, build_memory_data_set);
        registry
    }

    pub fn register<F>(&mut self, type_name: impl Into<String>, builder: F)
    where
        F: Fn(&DataSetParams) -> Result<Arc<dyn DataSet>, InternalError> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if self
            .builders
            .insert(type_name.clone(), Arc::new(builder))
            .is_some()
        {
            tracing::warn!(%type_name, "Replacing previously registered dataset type");
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&DataSetBuilder> {
        self.builders.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.builders.contains_key(type_name)
    }

    pub fn type_names(&self) -> Vec<&str> {
        let mut type_names: Vec<_> = self.builders.keys().map(String::as_str).collect();
        type_names.sort_unstable();
        type_names
    }
}

impl std::fmt::Debug for DataSetTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSetTypeRegistry")
            .field("type_names", &self.type_names())
            .finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Accepts an optional `data` parameter that becomes the initial value
fn build_memory_data_set(params: &DataSetParams) -> Result<Arc<dyn DataSet>, InternalError> {
    if let Some(unexpected) = params.keys().find(|key| key.as_str() != "data") {
        return InternalError::bail(format!(
            "Unexpected parameter '{unexpected}' for {}",
            MemoryDataSet::TYPE_NAME
        ));
    }

    let data_set = match params.get("data") {
        Some(value) => MemoryDataSet::with_data(Data::new(value.clone())),
        None => MemoryDataSet::new(),
    };

    Ok(Arc::new(data_set))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
