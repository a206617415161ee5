// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod catalog_from_config;
mod data_catalog;
mod data_set_factory;

pub use catalog_from_config::*;
pub use data_catalog::*;
pub use data_set_factory::*;
