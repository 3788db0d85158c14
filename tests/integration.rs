//! End-to-end integration tests for mdc-model.
//!
//! These tests load the built-in catalog together with user catalogs written
//! to disk, and drive the document model through its public API.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::Path;
use std::rc::Rc;

use mdc_model::config::DatabaseConfig;
use mdc_model::mdc::{ListOperation, Marks, Modifier, ModifierState, TopItem, TopItemList};
use mdc_model::signs::{
    CompositeSignDatabase, PhoneticLevel, SignCode, SignDatabase, VariantFilter,
};

const USER_SIGNS: &str = r#"
[[sign]]
code = "US1G5"
description = "falcon, house style"
values = [{ value = "Hr", level = "palette" }]
variants = [{ of = "G5", relation = "graphical" }]

[[sign]]
code = "G5"
tags = ["custom"]
values = [{ value = "bik", level = "informative" }]
"#;

fn open_with_user_file(path: &Path) -> CompositeSignDatabase {
    let config = DatabaseConfig {
        user_file: Some(path.to_path_buf()),
        ..Default::default()
    };
    CompositeSignDatabase::open(&config).unwrap()
}

fn codes(list: &[&str]) -> Vec<SignCode> {
    list.iter().copied().map(SignCode::from).collect()
}

#[test]
fn user_file_layers_over_builtin_catalog() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("signs_definition.toml");
    std::fs::write(&path, USER_SIGNS).unwrap();

    let db = open_with_user_file(&path);
    assert!(db.is_user_file_valid());
    assert_eq!(db.user().len(), 2);

    let g5 = SignCode::from("G5");
    let tags = db.tags_for_sign(&g5);
    assert!(tags.contains("bird") && tags.contains("custom"));
    assert_eq!(db.values_for(&g5), ["Hr", "bik"]);
    assert_eq!(db.description_for(&g5), "falcon");
    assert_eq!(
        db.description_for(&SignCode::from("US1G5")),
        "falcon, house style"
    );

    let hr = db.possibilities_for("Hr", PhoneticLevel::Palette);
    assert_eq!(hr.candidates(), codes(&["G5", "US1G5"]).as_slice());
    let hr = db.possibilities_for("Hr", PhoneticLevel::Informative);
    assert_eq!(hr.candidates(), codes(&["G5", "G7", "US1G5"]).as_slice());

    let suitable = db.suitable_signs_for_code("g5");
    assert_eq!(suitable.candidates(), codes(&["G5", "US1G5"]).as_slice());
}

#[test]
fn all_codes_are_unique_and_ordered_across_layers() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("signs_definition.toml");
    std::fs::write(&path, USER_SIGNS).unwrap();
    let db = open_with_user_file(&path);

    let all = db.all_codes();
    let unique: BTreeSet<_> = all.iter().collect();
    assert_eq!(unique.len(), all.len());
    assert!(all.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(all.iter().filter(|c| c.as_str() == "G5").count(), 1);

    let birds = db.codes_for_family("G", true);
    let pos = |c: &str| birds.iter().position(|b| b.as_str() == c).unwrap();
    assert!(pos("G5") < pos("US1G5"));
    assert!(!db.codes_for_family("G", false).contains(&SignCode::from("US1G5")));
}

#[test]
fn malformed_user_file_falls_back_to_builtin() {
    let baseline = CompositeSignDatabase::builtin().unwrap().all_codes();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("signs_definition.toml");
    std::fs::write(&path, "[[sign]]\ncode = 3\n").unwrap();

    let db = open_with_user_file(&path);
    assert!(!db.is_user_file_valid());
    assert!(!db.user_file_message().is_empty());
    assert_eq!(db.all_codes(), baseline);
}

#[test]
fn missing_user_file_is_valid_and_empty() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = open_with_user_file(&dir.path().join("absent.toml"));
    assert!(db.is_user_file_valid());
    assert!(db.user().is_empty());
}

#[test]
fn reload_switches_user_layer_and_variants() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("signs_definition.toml");
    std::fs::write(&path, USER_SIGNS).unwrap();
    let mut db = open_with_user_file(&path);

    let g5 = SignCode::from("G5");
    assert!(db.variants(&g5, VariantFilter::Graphical).contains(&SignCode::from("US1G5")));

    std::fs::write(&path, "").unwrap();
    db.reload_user_file(&path);
    assert!(db.is_user_file_valid());
    assert!(db.variants(&g5, VariantFilter::Graphical).is_empty());
    assert!(db.variants(&g5, VariantFilter::All).contains(&SignCode::from("G7")));
}

#[test]
fn builtin_variants_are_symmetric() {
    let db = CompositeSignDatabase::builtin().unwrap();
    for code in db.all_codes() {
        for other in db.variants(&code, VariantFilter::All) {
            assert!(
                db.variants(&other, VariantFilter::All).contains(&code),
                "{other} lists no variant back to {code}"
            );
        }
    }
}

#[test]
fn mdc_aliases_resolve_to_signs() {
    let db = CompositeSignDatabase::builtin().unwrap();
    assert_eq!(db.canonical_code("A").as_str(), "G1");
    assert_eq!(db.canonical_code("g1").as_str(), "G1");
    assert_eq!(db.canonical_code("nfr").as_str(), "F35");
}

#[test]
fn distribution_file_from_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let dist = dir.path().join("dist.toml");
    std::fs::write(&dist, "[[sign]]\ncode = \"A1\"\n").unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "distribution_file = {:?}\nload_user_file = false\n",
            dist.display().to_string()
        ),
    )
    .unwrap();

    let config = DatabaseConfig::load(&config_path).unwrap();
    let db = CompositeSignDatabase::open(&config).unwrap();
    assert_eq!(db.all_codes(), codes(&["A1"]));

    let missing = DatabaseConfig {
        distribution_file: Some(dir.path().join("nope.toml")),
        ..Default::default()
    };
    assert!(CompositeSignDatabase::open(&missing).is_err());
}

#[test]
fn editing_session_notifies_once_per_zone() {
    let mut list = TopItemList::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    list.add_observer(move |op: &ListOperation, _: &Marks| sink.borrow_mut().push(*op));

    list.insert_all(
        0,
        vec![
            TopItem::cadrat(["G5"]),
            TopItem::cadrat(["D21", "Z1"]),
            TopItem::page_break(),
            TopItem::text("notes"),
        ],
    )
    .unwrap();
    list.shade(0, 4, true).unwrap();
    list.update_item(1, |item| {
        if let TopItem::Cadrat(c) = item {
            c.modifiers.include(&Modifier::integer("r", 1));
        }
    })
    .unwrap();

    assert_eq!(
        *log.borrow(),
        [
            ListOperation::Inserted { index: 0, count: 4 },
            ListOperation::ZoneModified { start: 0, end: 4 },
            ListOperation::ItemModified { index: 1 },
        ]
    );
    assert!(list.iter().all(|i| i.state().shaded));
    assert_eq!(list.page_count(), 2);

    let snapshot = list.copy_range(1, 2).unwrap();
    let mut expected = ModifierState::default();
    expected.set_angle(270);
    assert_eq!(snapshot[0].as_cadrat().unwrap().modifiers, expected);
}
