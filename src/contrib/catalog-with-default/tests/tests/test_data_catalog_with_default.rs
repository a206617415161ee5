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

use assert_matches::assert_matches;
use indoc::indoc;
use mockall::predicate::eq;
use pipeline_io::*;
use pipeline_io_catalog_with_default::*;
use pretty_assertions::assert_eq;

use crate::utils::FakeFileSystem;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn dummy_dataframe() -> Vec<Vec<i64>> {
    vec![vec![1, 4, 5], vec![2, 5, 6]]
}

fn default_file(fs: &FakeFileSystem) -> impl DataSetFactory + 'static {
    let fs = fs.clone();
    move |path: &str| -> Arc<dyn DataSet> { fs.open(path) }
}

fn default_memory(_name: &str) -> Arc<dyn DataSet> {
    Arc::new(MemoryDataSet::from_value(5_i64))
}

fn registered(value: i64) -> HashMap<String, Arc<dyn DataSet>> {
    HashMap::from([(
        "test".to_string(),
        Arc::new(MemoryDataSet::from_value(value)) as Arc<dyn DataSet>,
    )])
}

fn sane_config() -> (CatalogConfig, Credentials) {
    let catalog = CatalogConfig::from_yaml_str(indoc!(
        "
        boats:
          type: MemoryDataSet
          data: [1, 2, 3]
        cars:
          type: MemoryDataSet
        "
    ))
    .unwrap();

    let credentials = Credentials::from_yaml_str(indoc!(
        "
        s3_credentials:
          aws_access_key_id: FAKE_ACCESS_KEY
          aws_secret_access_key: FAKE_SECRET_KEY
        "
    ))
    .unwrap();

    (catalog, credentials)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test]
fn test_load_from_unregistered() {
    let fs = FakeFileSystem::new();
    let mut catalog = DataCatalogWithDefault::new(HashMap::new(), default_file(&fs), false);

    let path = "sub/test.csv";
    catalog.save(path, Data::new(dummy_dataframe())).unwrap();
    let reloaded = catalog.load(path).unwrap();

    assert_eq!(reloaded.downcast_ref::<Vec<Vec<i64>>>(), Some(&dummy_dataframe()));
    assert!(fs.contains(path));
    assert_eq!(catalog.list(), Vec::<String>::new());
}

#[test_log::test]
fn test_save_and_load_catalog() {
    let fs = FakeFileSystem::new();
    let mut catalog = DataCatalogWithDefault::new(registered(1), default_file(&fs), false);

    let path = "sub/test";
    catalog.save(path, Data::new(dummy_dataframe())).unwrap();
    let reloaded = catalog.load(path).unwrap();

    assert_eq!(reloaded.downcast_ref::<Vec<Vec<i64>>>(), Some(&dummy_dataframe()));
    assert_eq!(catalog.list(), vec!["test"]);
}

#[test_log::test]
fn test_load_from_unregistered_file_that_does_not_exist() {
    let fs = FakeFileSystem::new();
    let mut catalog = DataCatalogWithDefault::new(HashMap::new(), default_file(&fs), false);

    assert_matches!(
        catalog.load("sub/missing.csv"),
        Err(DataSetError::Internal(e))
            if e.reason() == "Internal error: No such file: sub/missing.csv"
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test]
fn test_from_sane_config() {
    let (config, credentials) = sane_config();

    let res = DataCatalogWithDefault::from_config(
        &config,
        &credentials,
        &DataSetTypeRegistry::with_builtins(),
    );

    assert_matches!(
        res,
        Err(CatalogFromConfigError::NotConfigurable(e))
            if e.to_string().starts_with("Cannot instantiate a `DataCatalogWithDefault`")
    );
}

#[test_log::test]
fn test_from_sane_config_default() {
    let (config, credentials) = sane_config();
    let fs = FakeFileSystem::new();

    let catalog =
        DataCatalog::from_config(&config, &credentials, &DataSetTypeRegistry::with_builtins())
            .unwrap();
    let mut catalog_with_default =
        DataCatalogWithDefault::from_data_catalog(catalog, default_file(&fs));

    let path = "sub/missing.csv";
    catalog_with_default
        .save(path, Data::new(dummy_dataframe()))
        .unwrap();
    let reloaded = catalog_with_default.load(path).unwrap();

    assert_eq!(reloaded.downcast_ref::<Vec<Vec<i64>>>(), Some(&dummy_dataframe()));
    assert_eq!(
        catalog_with_default
            .load("boats")
            .unwrap()
            .downcast_ref::<serde_json::Value>(),
        Some(&serde_json::json!([1, 2, 3]))
    );
    assert!(!catalog_with_default.remember());
    assert_eq!(catalog_with_default.list(), vec!["boats", "cars"]);
}

#[test_log::test]
fn test_default_none() {
    let res = DataCatalogWithDefault::try_new(HashMap::new(), None, false);

    assert_matches!(
        res,
        Err(CatalogWithDefaultError::DefaultNotCallable(e))
            if e.to_string() == "Default must be a callable with a single input string argument: \
                                 the key of the requested data set."
    );
}

#[test_log::test]
fn test_default_provided_at_runtime() {
    let default: Option<Arc<dyn DataSetFactory>> = Some(Arc::new(default_memory));

    let mut catalog = DataCatalogWithDefault::try_new(HashMap::new(), default, true).unwrap();

    assert_eq!(catalog.load("any").unwrap().downcast_ref::<i64>(), Some(&5));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test]
fn test_remember_load() {
    let mut catalog = DataCatalogWithDefault::new(HashMap::new(), default_memory, true);

    assert_eq!(catalog.load("any").unwrap().downcast_ref::<i64>(), Some(&5));
    assert!(catalog.list().contains(&"any".to_string()));
}

#[test_log::test]
fn test_remember_save() {
    let fs = FakeFileSystem::new();
    let mut catalog = DataCatalogWithDefault::new(HashMap::new(), default_file(&fs), true);

    let path = "sub/test.csv";
    catalog.save(path, Data::new(dummy_dataframe())).unwrap();

    assert!(catalog.list().contains(&path.to_string()));
    assert_eq!(
        catalog.data_catalog().get(path).unwrap().to_string(),
        "FakeFileDataSet(filepath=sub/test.csv)"
    );
}

#[test_log::test]
fn test_remember_reuses_created_data_set() {
    let mut factory = MockDataSetFactory::new();
    factory
        .expect_create_data_set()
        .with(eq("any"))
        .times(1)
        .returning(|_| Arc::new(MemoryDataSet::from_value(String::from("payload"))));

    let mut catalog = DataCatalogWithDefault::new(HashMap::new(), factory, true);

    let loaded = catalog.load("any").unwrap();
    let reloaded = catalog.load("any").unwrap();

    assert!(Data::ptr_eq(&loaded, &reloaded));
    assert_eq!(catalog.list(), vec!["any"]);
}

#[test_log::test]
fn test_remember_repeated_save_reuses_created_data_set() {
    let fs = FakeFileSystem::new();
    let mut catalog = DataCatalogWithDefault::new(HashMap::new(), default_file(&fs), true);

    catalog.save("sub/a.csv", Data::new(1_i64)).unwrap();
    catalog.save("sub/a.csv", Data::new(2_i64)).unwrap();

    assert_eq!(fs.opened(), vec!["sub/a.csv"]);
    assert_eq!(catalog.load("sub/a.csv").unwrap().downcast_ref::<i64>(), Some(&2));
}

#[test_log::test]
fn test_forget_creates_data_set_on_every_request() {
    let fs = FakeFileSystem::new();
    let mut catalog = DataCatalogWithDefault::new(HashMap::new(), default_file(&fs), false);

    catalog.save("sub/a.csv", Data::new(1_i64)).unwrap();
    catalog.load("sub/a.csv").unwrap();

    assert_eq!(fs.opened(), vec!["sub/a.csv", "sub/a.csv"]);
    assert!(catalog.list().is_empty());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test]
fn test_registered_data_set_takes_precedence() {
    for remember in [false, true] {
        let mut factory = MockDataSetFactory::new();
        factory.expect_create_data_set().never();

        let mut catalog = DataCatalogWithDefault::new(registered(1), factory, remember);

        assert_eq!(catalog.load("test").unwrap().downcast_ref::<i64>(), Some(&1));

        catalog.save("test", Data::new(10_i64)).unwrap();
        assert_eq!(catalog.load("test").unwrap().downcast_ref::<i64>(), Some(&10));
        assert_eq!(catalog.list(), vec!["test"]);
    }
}

#[test_log::test]
fn test_errors_of_created_data_set_are_propagated() {
    let mut catalog = DataCatalogWithDefault::new(
        HashMap::new(),
        |_: &str| -> Arc<dyn DataSet> { Arc::new(MemoryDataSet::new()) },
        true,
    );

    assert_matches!(
        catalog.load("empty"),
        Err(DataSetError::NotSaved(e))
            if e.to_string() == "Data for MemoryDataSet has not been saved yet."
    );
    assert_eq!(catalog.list(), vec!["empty"]);
}

#[test]
fn test_debug_logging_does_not_describe_created_data_set() {
    let mut factory = MockDataSetFactory::new();
    factory.expect_create_data_set().times(1).returning(|_| {
        let mut data_set = MockDataSet::new();
        data_set
            .expect_load()
            .times(1)
            .returning(|| Ok(Data::new(7_i64)));
        data_set.expect_describe().never();
        Arc::new(data_set)
    });

    let mut catalog = DataCatalogWithDefault::new(HashMap::new(), factory, false);

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();

    let loaded = tracing::subscriber::with_default(subscriber, || catalog.load("any"));

    assert_eq!(loaded.unwrap().downcast_ref::<i64>(), Some(&7));
}

#[test_log::test]
fn test_exists_does_not_consult_default() {
    let mut factory = MockDataSetFactory::new();
    factory.expect_create_data_set().never();

    let catalog = DataCatalogWithDefault::new(registered(1), factory, true);

    assert!(catalog.exists("test").unwrap());
    assert!(!catalog.exists("sub/unknown.csv").unwrap());
    assert_matches!(catalog.release("sub/unknown.csv"), Err(DataSetNotFoundError { .. }));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test]
fn test_add_feed_dict() {
    let mut catalog = DataCatalogWithDefault::new(registered(1), default_memory, false);

    catalog
        .add_feed_dict([("params:alpha".to_string(), Data::new(0.5_f64))], false)
        .unwrap();

    assert_eq!(
        catalog.load("params:alpha").unwrap().downcast_ref::<f64>(),
        Some(&0.5)
    );
    assert_matches!(
        catalog.add("test", default_memory("test"), false),
        Err(DataSetAlreadyExistsError { name }) if name == "test"
    );
}

#[test_log::test]
fn test_shallow_copy_keeps_default_and_remember() {
    let catalog = DataCatalogWithDefault::new(registered(1), default_memory, true);

    let mut copy = catalog.shallow_copy();

    assert!(copy.remember());
    assert_eq!(copy.load("any").unwrap().downcast_ref::<i64>(), Some(&5));
    assert_eq!(copy.list(), vec!["any", "test"]);
    assert_eq!(catalog.list(), vec!["test"]);
}

#[test_log::test]
fn test_into_data_catalog_keeps_remembered_data_sets() {
    let mut catalog = DataCatalogWithDefault::new(HashMap::new(), default_memory, true);
    catalog.load("any").unwrap();

    let catalog = catalog.into_data_catalog();

    assert_eq!(catalog.list(), vec!["any"]);
    assert_matches!(catalog.load("other"), Err(LoadDataError::NotFound(_)));
}

#[test_log::test]
fn test_debug() {
    let catalog = DataCatalogWithDefault::new(registered(1), default_memory, true);

    assert_eq!(
        format!("{catalog:?}"),
        r#"DataCatalogWithDefault { data_sets: ["test"], remember: true, .. }"#
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
