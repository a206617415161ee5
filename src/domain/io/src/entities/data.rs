// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::any::Any;
use std::sync::Arc;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A shared handle to a value of an arbitrary type that flows between
/// datasets.
///
/// Cloning a [`Data`] never copies the value: all clones point to the same
/// allocation, which can be verified with [`Data::ptr_eq`]. Values enter a
/// [`Data`] by move, so the producer cannot mutate them behind the handle.
#[derive(Clone)]
pub struct Data {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Data {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns the shared value, or gives the handle back if the type does not
    /// match
    pub fn downcast<T: Any + Send + Sync>(self) -> Result<Arc<T>, Self> {
        let type_name = self.type_name;
        self.value
            .downcast::<T>()
            .map_err(|value| Self { value, type_name })
    }

    /// Fully-qualified name of the contained type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Name of the contained type without module paths and generic arguments,
    /// e.g. `DataFrame` for `polars::frame::DataFrame` or `(i64, String)` for a
    /// tuple
    pub fn short_type_name(&self) -> String {
        short_type_name(self.type_name)
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.value, &b.value)
    }
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Data(<{}>)", self.short_type_name())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Keeps the last segment of every path in the name and drops generic
/// argument lists, leaving tuple, array, reference and pointer punctuation
/// intact
fn short_type_name(full_name: &str) -> String {
    let mut short = String::with_capacity(full_name.len());
    let mut segment = String::new();
    let mut generics_depth = 0_usize;
    let mut prev = None;

    for c in full_name.chars() {
        match c {
            '<' => generics_depth += 1,
            // `->` of a function signature is not a closing bracket
            '>' if generics_depth > 0 && prev != Some('-') => generics_depth -= 1,
            _ if generics_depth > 0 => {}
            ':' => segment.clear(),
            c if c.is_alphanumeric() || c == '_' => segment.push(c),
            c => {
                short.push_str(&segment);
                segment.clear();
                short.push(c);
            }
        }
        prev = Some(c);
    }

    short.push_str(&segment);
    short
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
