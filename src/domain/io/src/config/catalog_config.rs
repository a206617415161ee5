// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub type DataSetParams = serde_json::Map<String, serde_json::Value>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Declarative description of the datasets of a catalog, keyed by dataset
/// name:
///
/// ```yaml
/// boats:
///   type: MemoryDataSet
///   data: [1, 2, 3]
/// cars:
///   type: CSVS3DataSet
///   filepath: cars.csv
///   credentials: s3_credentials
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogConfig {
    pub data_sets: BTreeMap<String, DataSetConfig>,
}

impl CatalogConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigParseError> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSetConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(flatten)]
    pub params: DataSetParams,
}

impl DataSetConfig {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            params: DataSetParams::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Named sets of credentials that dataset configurations refer to through
/// their `credentials` parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials {
    pub entries: BTreeMap<String, serde_json::Value>,
}

impl Credentials {
    pub const PARAM_NAME: &'static str = "credentials";

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigParseError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.entries.get(name)
    }

    /// Replaces a credentials reference in dataset parameters with the
    /// referenced credentials. Inline (non-string) credentials are left
    /// untouched.
    pub fn resolve(&self, params: &DataSetParams) -> Result<DataSetParams, CredentialsNotFoundError> {
        let mut resolved = params.clone();

        if let Some(serde_json::Value::String(credentials_name)) = params.get(Self::PARAM_NAME) {
            let Some(credentials) = self.get(credentials_name) else {
                return Err(CredentialsNotFoundError::new(credentials_name.clone()));
            };

            resolved.insert(Self::PARAM_NAME.to_string(), credentials.clone());
        }

        Ok(resolved)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Invalid catalog configuration: {source}")]
pub struct ConfigParseError {
    #[from]
    source: serde_yaml::Error,
}

#[derive(Error, Debug)]
#[error(
    "Unable to find credentials '{credentials_name}': check your data catalog and credentials \
     configuration."
)]
pub struct CredentialsNotFoundError {
    pub credentials_name: String,
}

impl CredentialsNotFoundError {
    pub fn new(credentials_name: impl Into<String>) -> Self {
        Self {
            credentials_name: credentials_name.into(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
