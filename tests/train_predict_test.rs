//! End-to-end pipeline tests
//!
//! Train on a small synthetic survey, persist the bundle, reload it, and
//! predict through the service exactly the way the serve and predict
//! commands do.

use std::fmt::Write as _;

use aerosat::bundle::ArtifactBundle;
use aerosat::classifier::TreeParams;
use aerosat::dataset::RawTable;
use aerosat::models::{PassengerRecord, DISSATISFIED, REQUIRED_COLUMNS, SATISFIED};
use aerosat::service::{PredictionService, RowOutcome};
use aerosat::train::{train, TrainConfig};

/// One survey row. `happy` controls both the ratings profile and the label,
/// so the data is cleanly separable.
fn survey_row(id: usize, happy: bool) -> String {
    let gender = if id % 2 == 0 { "Male" } else { "Female" };
    let customer = if id % 3 == 0 {
        "disloyal Customer"
    } else {
        "Loyal Customer"
    };
    let travel = if id % 2 == 0 {
        "Business travel"
    } else {
        "Personal Travel"
    };
    let class = ["Business", "Eco", "Eco Plus"][id % 3];
    let age = 20 + (id % 50);
    let distance = 300 + (id % 8) * 400;

    let (rating, delay, label) = if happy {
        (5, 0, SATISFIED)
    } else {
        (1, 60, DISSATISFIED)
    };

    let ratings: Vec<String> = (0..14).map(|_| rating.to_string()).collect();
    format!(
        "{id},{gender},{customer},{age},{travel},{class},{distance},{},{delay},{delay},{label}",
        ratings.join(",")
    )
}

fn synthetic_csv(rows: usize) -> String {
    let mut csv = String::new();
    let _ = writeln!(csv, "id,{},satisfaction", REQUIRED_COLUMNS.join(","));
    for id in 0..rows {
        let _ = writeln!(csv, "{}", survey_row(id, id % 2 == 0));
    }
    csv
}

fn quick_config() -> TrainConfig {
    TrainConfig {
        params: TreeParams {
            trees: 15,
            max_depth: 3,
            learning_rate: 0.3,
        },
        test_split: 0.2,
        seed: 42,
    }
}

fn trained_dir() -> (tempfile::TempDir, aerosat::train::TrainReport) {
    let dir = tempfile::tempdir().expect("temp dir");
    let data_path = dir.path().join("survey.csv");
    std::fs::write(&data_path, synthetic_csv(80)).expect("write training csv");

    let out_dir = dir.path().join("artifacts");
    let report = train(&data_path, &out_dir, &quick_config()).expect("training succeeds");
    (dir, report)
}

#[test]
fn test_train_reports_split_and_accuracy() {
    let (_dir, report) = trained_dir();
    assert_eq!(report.rows_loaded, 80);
    assert_eq!(report.rows_kept, 80);
    assert_eq!(report.test_size, 16);
    assert_eq!(report.train_size, 64);
    // Separable data; the ensemble should get nearly everything right.
    assert!(report.accuracy >= 0.8, "accuracy was {}", report.accuracy);
}

#[test]
fn test_reloaded_bundle_predicts_both_classes() {
    let (dir, _report) = trained_dir();
    let bundle = ArtifactBundle::load(&dir.path().join("artifacts")).expect("bundle loads");
    let service = PredictionService::from_bundle(bundle);

    let happy_table = table_of(&[survey_row(200, true)]);
    let happy = PassengerRecord::from_row(&happy_table, &happy_table.rows[0]).unwrap();
    let prediction = service.predict_one(&happy).unwrap();
    assert!(prediction.satisfied);
    assert_eq!(prediction.label, SATISFIED);

    let grumpy_table = table_of(&[survey_row(201, false)]);
    let grumpy = PassengerRecord::from_row(&grumpy_table, &grumpy_table.rows[0]).unwrap();
    let prediction = service.predict_one(&grumpy).unwrap();
    assert!(!prediction.satisfied);
    assert_eq!(prediction.label, DISSATISFIED);
}

#[test]
fn test_batch_through_reloaded_bundle() {
    let (dir, _report) = trained_dir();
    let bundle = ArtifactBundle::load(&dir.path().join("artifacts")).expect("bundle loads");
    let service = PredictionService::from_bundle(bundle);

    // Two good rows and one with an unseen category.
    let bad_row = survey_row(300, true).replace("Male", "Other");
    let table = table_of(&[survey_row(300, true), survey_row(301, false), bad_row]);

    let report = service.predict_batch(&table).expect("header is complete");
    assert_eq!(report.total, 3);
    assert_eq!(report.satisfied, 1);
    assert_eq!(report.dissatisfied, 1);
    assert_eq!(report.errors, 1);
    assert!(matches!(report.outcomes[2], RowOutcome::Failed { .. }));
    assert!(report.outcomes[2].result_text().contains("Gender"));
}

#[test]
fn test_training_rejects_tiny_datasets() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data_path = dir.path().join("survey.csv");
    std::fs::write(&data_path, synthetic_csv(5)).expect("write training csv");

    let err = train(&data_path, &dir.path().join("artifacts"), &quick_config()).unwrap_err();
    assert!(err.to_string().contains("at least 10"));
}

/// Parse full survey rows (id + required columns + satisfaction) into a table.
fn table_of(rows: &[String]) -> RawTable {
    let mut csv = String::new();
    let _ = writeln!(csv, "id,{},satisfaction", REQUIRED_COLUMNS.join(","));
    for row in rows {
        let _ = writeln!(csv, "{row}");
    }
    RawTable::read_from(csv.as_bytes()).expect("csv parses")
}
