use equipment_data_pipeline::ingestion::json::{read_json_rows, rows_from_json_values};
use equipment_data_pipeline::ingestion::{normalize_rows, read_rows_from_path};

#[test]
fn ndjson_fixture_normalizes_camel_case_keys() {
    let rows = read_rows_from_path("tests/fixtures/equipment.ndjson", None).unwrap();
    let records = normalize_rows(&rows);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].equipment_name, "Pump A");
    assert_eq!(records[0].flowrate, 100.0);
    assert_eq!(records[1].flowrate, 40.5);
    assert_eq!(records[1].pressure, 0.0);
}

#[test]
fn pre_decoded_remote_rows_are_accepted() {
    let body: serde_json::Value = serde_json::from_str(
        r#"[
            {"id": 0, "equipmentName": "Mixer", "type": "Mixer", "flowrate": 12.5, "pressure": 2, "temperature": 30},
            {"id": 1, "equipmentName": "", "type": "Mixer", "flowrate": 1, "pressure": 1, "temperature": 1}
        ]"#,
    )
    .unwrap();
    let items = body.as_array().unwrap();

    let records = normalize_rows(&rows_from_json_values(items).unwrap());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "eq-1");
    assert_eq!(records[0].pressure, 2.0);
}

#[test]
fn scalar_json_is_rejected() {
    let err = read_json_rows("42").unwrap_err();
    assert!(err.to_string().contains("json must be an object"));
}
