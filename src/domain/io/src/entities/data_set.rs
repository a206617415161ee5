// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use internal_error::InternalError;
use thiserror::Error;

use crate::Data;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Handle to a single named resource that data can be loaded from and saved
/// to, regardless of where and in which format it is physically stored.
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
pub trait DataSet: Send + Sync {
    fn load(&self) -> Result<Data, DataSetError>;

    fn save(&self, data: Data) -> Result<(), DataSetError>;

    fn exists(&self) -> Result<bool, DataSetError> {
        Ok(true)
    }

    /// Drops any data cached by the dataset
    fn release(&self) {}

    fn describe(&self) -> DataSetDescription;
}

impl std::fmt::Display for dyn DataSet + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.describe(), f)
    }
}

impl std::fmt::Debug for dyn DataSet + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.describe(), f)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Short, cheap to compute summary of a dataset rendered as
/// `TypeName(key1=value1, key2=value2)` with keys in sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSetDescription {
    pub type_name: String,
    pub attributes: BTreeMap<String, String>,
}

impl DataSetDescription {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl std::fmt::Display for DataSetDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.type_name)?;
        for (i, (key, value)) in self.attributes.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, ")")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum DataSetError {
    #[error(transparent)]
    NotSaved(#[from] DataNotSavedError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug)]
#[error("Data for {data_set_type} has not been saved yet.")]
pub struct DataNotSavedError {
    pub data_set_type: String,
}

impl DataNotSavedError {
    pub fn new(data_set_type: impl Into<String>) -> Self {
        Self {
            data_set_type: data_set_type.into(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
