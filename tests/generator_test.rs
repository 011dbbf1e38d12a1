use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use std::collections::HashSet;
use std::process::Command;

mod common;

#[test]
fn test_generate_simple_csv() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("generated.csv");
    common::generate_merchants(&output_path, 5).expect("Failed to generate CSV");

    let content = std::fs::read_to_string(&output_path).expect("Failed to read file");
    // Header + 5 rows = 6 lines
    assert_eq!(content.lines().count(), 6);
}

#[test]
fn test_bulk_encode_yields_distinct_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bulk.csv");
    common::generate_merchants(&input, 2_000).expect("Failed to generate CSV");

    let output = Command::new(cargo_bin!("emvqr"))
        .arg("encode")
        .arg(&input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let mut reader = csv::Reader::from_reader(output.as_slice());
    let payloads: HashSet<String> = reader
        .records()
        .map(|r| r.expect("Failed to read record")[1].to_string())
        .collect();

    assert_eq!(payloads.len(), 2_000);
    assert!(payloads.iter().all(|p| p.starts_with("000201010211")));
}
