use indoc::indoc;
use mocktail::{facade, MockError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_source(dir: &TempDir, file: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_widget_scenario_through_facade() {
    let dir = TempDir::new().unwrap();
    let path = write_source(
        &dir,
        "Widget.php",
        indoc! {r#"
            <?php
            /**
             * Spins things. class NotThisOne
             */
            class Widget {
                public function __construct(){}
                public function spin($n){}
            }
        "#},
    );

    facade::generate_class_mock(&path).unwrap();
    assert!(facade::is_installed("Widget"));

    let widget = facade::new_instance("Widget", &[]).unwrap();
    facade::set_method_return_values("Widget", "spin", json!([10, 20])).unwrap();

    assert_eq!(widget.call("spin", &[json!(1)]).unwrap(), Some(json!(10)));
    assert_eq!(widget.call("spin", &[json!(2)]).unwrap(), Some(json!(20)));
    assert_eq!(widget.call("spin", &[json!(3)]).unwrap(), None);
    assert_eq!(facade::get_global_method_count("Widget", "spin").unwrap(), 3);
    assert_eq!(
        facade::get_global_method_count("Widget", "__construct").unwrap(),
        1
    );
}

#[test]
fn test_facade_named_spy_and_resets() {
    facade::generate_class_mock_from_source(indoc! {r#"
        class FacadeGadget {
            public function __construct($name) {}
            public function ping($a, $b) {}
        }
    "#})
    .unwrap();

    let calls = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&calls);
    facade::register_spy_function("recordFacadeGadgetPing", move |args| {
        sink.lock().push(args.to_vec());
        Ok(())
    });
    facade::set_spy(
        "FacadeGadget",
        "ping",
        mocktail::SpyRef::named("recordFacadeGadgetPing"),
    )
    .unwrap();

    let gadget = facade::new_instance("FacadeGadget", &[json!("g")]).unwrap();
    gadget.call("ping", &[json!(1), json!("two")]).unwrap();

    assert_eq!(*calls.lock(), vec![vec![json!(1), json!("two")]]);

    facade::reset_global_method_count("FacadeGadget", "ping").unwrap();
    assert_eq!(facade::get_global_method_count("FacadeGadget", "ping").unwrap(), 0);
    assert_eq!(
        facade::get_global_method_count("FacadeGadget", "__CONSTRUCT").unwrap(),
        1
    );

    facade::reset_all_global_counts("FacadeGadget").unwrap();
    assert_eq!(
        facade::get_global_method_count("FacadeGadget", "__construct").unwrap(),
        0
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = facade::generate_class_mock(dir.path().join("Missing.php")).unwrap_err();
    assert!(matches!(err, MockError::Io { .. }));
}

#[test]
fn test_file_without_class_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write_source(&dir, "helpers.php", "<?php\nfunction helper() {}\n");

    match facade::generate_class_mock(&path).unwrap_err() {
        MockError::NoClassFound { path: Some(reported) } => assert_eq!(reported, path),
        other => panic!("expected NoClassFound, got {other:?}"),
    }
}

#[test]
fn test_second_install_of_same_class_is_rejected() {
    let source = "class FacadeTwice { public function run() {} }";
    facade::generate_class_mock_from_source(source).unwrap();

    let err = facade::generate_class_mock_from_source(source).unwrap_err();
    assert!(matches!(err, MockError::MockInstallation { .. }));
}

#[test]
fn test_unknown_class_and_method() {
    assert!(matches!(
        facade::get_global_method_count("FacadeNeverInstalled", "run").unwrap_err(),
        MockError::UnknownClass { .. }
    ));

    facade::generate_class_mock_from_source("class FacadeKnown { public function run() {} }")
        .unwrap();
    assert!(matches!(
        facade::set_method_return_values("FacadeKnown", "fly", json!([])).unwrap_err(),
        MockError::UnknownMethod { .. }
    ));
}
