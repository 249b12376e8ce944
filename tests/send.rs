mod common;

use common::{TestWorkspace, extract_csv, sample_rows};
use gias_establishments::{
    Flag, LoadError, LoadOptions, Release, Renamer, Value, load_send_view, load_send_view_by_key,
    send::{self, RESOURCED_PROVISION, SEN_PROVISION_TYPES, SEN_UNIT},
    send_columns,
};

fn write_sample(workspace: &TestWorkspace) -> LoadOptions {
    let path = workspace.write("edubase.csv", &extract_csv(Release::Current, &sample_rows()));
    LoadOptions::from_path(path).with_dataset_name("edubase")
}

fn flag(value: bool) -> Value {
    Value::Flag(Flag::Known(value))
}

fn codes(values: &[&str]) -> Value {
    Value::List(values.iter().map(|v| v.to_string()).collect())
}

#[test]
fn view_has_published_columns_in_order() {
    let workspace = TestWorkspace::new();
    let view = load_send_view(&write_sample(&workspace)).expect("SEND view");

    let expected = send_columns().iter().map(|c| c.id).collect::<Vec<_>>();
    assert_eq!(view.column_names(), expected);
    assert_eq!(view.row_count(), 3);
    assert!(view.column("sen1_name").is_none());
    assert!(view.column("type_of_resourced_provision_name").is_none());
}

#[test]
fn view_name_is_stamped() {
    let workspace = TestWorkspace::new();
    let view = load_send_view(&write_sample(&workspace)).unwrap();
    assert_eq!(view.name(), "edubase (SEND columns)");
}

#[test]
fn flags_follow_type_of_resourced_provision() {
    let workspace = TestWorkspace::new();
    let view = load_send_view(&write_sample(&workspace)).unwrap();

    // Resourced provision and SEN unit
    assert_eq!(view.value(0, RESOURCED_PROVISION), Some(&flag(true)));
    assert_eq!(view.value(0, SEN_UNIT), Some(&flag(true)));
    // Not applicable
    assert_eq!(view.value(1, RESOURCED_PROVISION), Some(&flag(false)));
    assert_eq!(view.value(1, SEN_UNIT), Some(&flag(false)));
    // SEN unit
    assert_eq!(view.value(2, RESOURCED_PROVISION), Some(&flag(false)));
    assert_eq!(view.value(2, SEN_UNIT), Some(&flag(true)));
}

#[test]
fn unknown_and_missing_provision_text_are_not_coerced() {
    let workspace = TestWorkspace::new();
    let rows = vec![
        vec![
            ("URN", "140000"),
            ("TypeOfResourcedProvision (name)", "Enhanced provision"),
        ],
        vec![("URN", "140001")],
    ];
    let path = workspace.write("odd.csv", &extract_csv(Release::Current, &rows));

    let view = load_send_view(&LoadOptions::from_path(path)).unwrap();

    let unrecognized = Value::Flag(Flag::Unrecognized("Enhanced provision".to_string()));
    assert_eq!(view.value(0, RESOURCED_PROVISION), Some(&unrecognized));
    assert_eq!(view.value(0, SEN_UNIT), Some(&unrecognized));
    assert_eq!(view.value(1, RESOURCED_PROVISION), None);
    assert_eq!(view.value(1, SEN_UNIT), None);
}

#[test]
fn provision_types_are_packed_in_slot_order() {
    let workspace = TestWorkspace::new();
    let view = load_send_view(&write_sample(&workspace)).unwrap();

    assert_eq!(view.value(0, SEN_PROVISION_TYPES), Some(&codes(&["SPLD", "ASD"])));
    assert_eq!(view.value(1, SEN_PROVISION_TYPES), Some(&codes(&[])));
    assert_eq!(view.value(2, SEN_PROVISION_TYPES), Some(&codes(&[])));
}

#[test]
fn further_education_type_is_blank_when_not_applicable() {
    let workspace = TestWorkspace::new();
    let view = load_send_view(&write_sample(&workspace)).unwrap();

    assert_eq!(view.value(0, send::FURTHER_EDUCATION_TYPE_APPLICABLE), None);
    assert_eq!(
        view.value(2, send::FURTHER_EDUCATION_TYPE_APPLICABLE),
        Some(&Value::String("General Further Education College".to_string()))
    );
    assert_eq!(
        view.value(0, "further_education_type_name"),
        Some(&Value::String("Not applicable".to_string()))
    );
}

#[test]
fn caller_column_selection_is_ignored() {
    let workspace = TestWorkspace::new();
    let options = write_sample(&workspace)
        .with_allow_list(["URN"])
        .with_deny_list(["SEN1 (name)"])
        .with_renamer(Renamer::Identity);

    let view = load_send_view(&options).unwrap();

    assert_eq!(view.column_count(), send_columns().len());
    assert_eq!(view.value(0, SEN_PROVISION_TYPES), Some(&codes(&["SPLD", "ASD"])));
}

#[test]
fn caller_parse_rules_are_honored() {
    let workspace = TestWorkspace::new();
    let options = write_sample(&workspace)
        .with_parse_rule("easting", gias_establishments::ParseRule::String);

    let view = load_send_view(&options).unwrap();

    assert_eq!(
        view.value(0, "easting"),
        Some(&Value::String("533498".to_string()))
    );
}

#[test]
fn keyed_view_indexes_by_urn() {
    let workspace = TestWorkspace::new();
    let records = load_send_view_by_key(&write_sample(&workspace)).unwrap();

    assert_eq!(
        records.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["100000", "100001", "130400"]
    );
    let college = &records["130400"];
    assert_eq!(college.get(SEN_UNIT), Some(&flag(true)));
    assert_eq!(college.get("sen_unit_on_roll"), Some(&Value::Integer(4)));
    assert_eq!(college.len(), send_columns().len());
}

#[test]
fn keyed_view_rejects_duplicate_urn() {
    let workspace = TestWorkspace::new();
    let rows = vec![vec![("URN", "100000")], vec![("URN", "100000")]];
    let path = workspace.write("dup.csv", &extract_csv(Release::Current, &rows));

    let err = load_send_view_by_key(&LoadOptions::from_path(path)).unwrap_err();

    assert!(matches!(err, LoadError::DuplicateKey { key, .. } if key == "100000"));
}

#[test]
fn keyed_view_rejects_missing_urn() {
    let workspace = TestWorkspace::new();
    let rows = vec![vec![("URN", "100000")], vec![("EstablishmentName", "No URN")]];
    let path = workspace.write("gap.csv", &extract_csv(Release::Current, &rows));

    let err = load_send_view_by_key(&LoadOptions::from_path(path)).unwrap_err();

    assert!(matches!(err, LoadError::MissingKey { row: 1, .. }));
}

#[test]
fn view_serializes_records_as_json() {
    let workspace = TestWorkspace::new();
    let records = load_send_view_by_key(&write_sample(&workspace)).unwrap();

    let json = serde_json::to_value(&records["100000"]).unwrap();

    assert_eq!(json["urn"], "100000");
    assert_eq!(json["resourced_provision"], true);
    assert_eq!(json["sen_provision_types"], serde_json::json!(["SPLD", "ASD"]));
    assert_eq!(json["open_date"], "1900-01-01");
    assert!(json["close_date"].is_null());
}

#[test]
fn extract_without_sen_slots_is_an_error() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("thin.csv", "URN,EstablishmentName\n100000,A\n");

    let err = load_send_view(&LoadOptions::from_path(path)).unwrap_err();

    assert!(matches!(err, LoadError::Table(_)));
}

#[test]
fn provision_types_skip_blank_and_not_applicable_slots() {
    let workspace = TestWorkspace::new();
    let rows = vec![vec![
        ("URN", "141000"),
        ("SEN1 (name)", "MLD - Moderate Learning Difficulty"),
        ("SEN2 (name)", ""),
        ("SEN3 (name)", "Not Applicable"),
    ]];
    let path = workspace.write("mld.csv", &extract_csv(Release::Current, &rows));

    let view = load_send_view(&LoadOptions::from_path(path)).unwrap();

    assert_eq!(view.value(0, SEN_PROVISION_TYPES), Some(&codes(&["MLD"])));
}

#[test]
fn legacy_extract_loads_through_legacy_registry() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("legacy.csv", &extract_csv(Release::Legacy, &sample_rows()));
    let legacy = gias_establishments::columns::registry_for(Release::Legacy);

    let view = send::load_send_view_with(legacy, &LoadOptions::from_path(path)).unwrap();

    assert_eq!(view.column_count(), send_columns().len());
    assert_eq!(view.value(2, SEN_UNIT), Some(&flag(true)));
    assert_eq!(view.value(0, SEN_PROVISION_TYPES), Some(&codes(&["SPLD", "ASD"])));
}
