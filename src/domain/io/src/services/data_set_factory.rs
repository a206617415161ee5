// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::DataSet;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Strategy for lazily creating a dataset for a key that a catalog does not
/// know about. The key is the requested dataset name, often a file path.
///
/// Any `Fn(&str) -> Arc<dyn DataSet>` is a factory:
///
/// ```ignore
/// fn default_memory(_name: &str) -> Arc<dyn DataSet> {
///     Arc::new(MemoryDataSet::from_value(5))
/// }
/// ```
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
pub trait DataSetFactory: Send + Sync {
    fn create_data_set(&self, name: &str) -> Arc<dyn DataSet>;
}

impl<F> DataSetFactory for F
where
    F: Fn(&str) -> Arc<dyn DataSet> + Send + Sync,
{
    fn create_data_set(&self, name: &str) -> Arc<dyn DataSet> {
        self(name)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
