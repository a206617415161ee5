// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

use crate::{CatalogConfig, Credentials, CredentialsNotFoundError, DataSetTypeRegistry};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Construction of a catalog from declarative configuration
pub trait CatalogFromConfig: Sized {
    fn from_config(
        config: &CatalogConfig,
        credentials: &Credentials,
        data_set_types: &DataSetTypeRegistry,
    ) -> Result<Self, CatalogFromConfigError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum CatalogFromConfigError {
    #[error(transparent)]
    TypeMissing(#[from] DataSetTypeMissingError),

    #[error(transparent)]
    TypeNotFound(#[from] DataSetTypeNotFoundError),

    #[error(transparent)]
    CredentialsNotFound(#[from] CredentialsNotFoundError),

    #[error(transparent)]
    BuildFailed(#[from] DataSetBuildError),

    #[error(transparent)]
    NotConfigurable(#[from] CatalogNotConfigurableError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("`type` is missing from DataSet '{data_set_name}' catalog configuration")]
pub struct DataSetTypeMissingError {
    pub data_set_name: String,
}

impl DataSetTypeMissingError {
    pub fn new(data_set_name: impl Into<String>) -> Self {
        Self {
            data_set_name: data_set_name.into(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Class `{type_name}` for DataSet `{data_set_name}` not found.")]
pub struct DataSetTypeNotFoundError {
    pub data_set_name: String,
    pub type_name: String,
}

impl DataSetTypeNotFoundError {
    pub fn new(data_set_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            data_set_name: data_set_name.into(),
            type_name: type_name.into(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Failed to instantiate DataSet '{data_set_name}' of type `{type_name}`")]
pub struct DataSetBuildError {
    pub data_set_name: String,
    pub type_name: String,
    #[source]
    pub source: InternalError,
}

impl DataSetBuildError {
    pub fn new(
        data_set_name: impl Into<String>,
        type_name: impl Into<String>,
        source: InternalError,
    ) -> Self {
        Self {
            data_set_name: data_set_name.into(),
            type_name: type_name.into(),
            source,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Cannot instantiate a `{catalog_type}` directly from configuration files. {hint}")]
pub struct CatalogNotConfigurableError {
    pub catalog_type: String,
    pub hint: String,
}

impl CatalogNotConfigurableError {
    pub fn new(catalog_type: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            catalog_type: catalog_type.into(),
            hint: hint.into(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
