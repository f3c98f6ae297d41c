//! CLI smoke tests: generate, reconcile, split, stats.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn nergen() -> Command {
    Command::cargo_bin("nergen").unwrap()
}

/// Source lists small enough for a test but large enough for the configured
/// pattern counts.
fn write_input_lists(dir: &Path) {
    fs::write(
        dir.join("money.csv"),
        "entity,weight,context,placement,only_single_quantity,number_word\n\
         kr,5,,after,NO,NO\n\
         kroner,5,,after,NO,YES\n\
         mio. kr,2,,after,NO,YES\n",
    )
    .unwrap();
    fs::write(
        dir.join("quantity.csv"),
        "entity,weight,context\ngram,5,\nkm,5,\nliter,3,\n",
    )
    .unwrap();

    let names = |prefix: &str, n: usize, amount: u32| -> String {
        (0..n)
            .map(|i| format!("{prefix}{i} {amount}\n"))
            .collect()
    };
    let mut female = String::from("Danmarks Statistik\nnavn antal\n");
    female.push_str(&names("ANNE", 15, 5000));
    female.push_str(&names("FREJA", 15, 300));
    fs::write(dir.join("first_names_female.txt"), female).unwrap();

    let mut male = String::from("Danmarks Statistik\nnavn antal\n");
    male.push_str(&names("PETER", 15, 5000));
    male.push_str(&names("AKSEL", 15, 300));
    fs::write(dir.join("first_names_male.txt"), male).unwrap();

    let mut last = String::new();
    last.push_str(&names("JENSEN", 25, 8000));
    last.push_str(&names("WINTHER", 25, 400));
    fs::write(dir.join("last_names.txt"), last).unwrap();
}

fn write_small_config(dir: &Path) -> String {
    let path = dir.join("config.json");
    fs::write(
        &path,
        r#"{
            "person_pattern_counts": [4, 4, 4, 2, 2, 2, 2],
            "dates": {
                "start_year": 2015,
                "end_year": 2023,
                "cutoff_year": 2020,
                "recent_weight": 1.0,
                "older_weight": 0.25,
                "sample_size": 20
            }
        }"#,
    )
    .unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn generate_writes_all_pools() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("lists");
    let out = dir.path().join("generated");
    fs::create_dir_all(&input).unwrap();
    write_input_lists(&input);
    let config = write_small_config(dir.path());

    nergen()
        .args([
            "generate",
            "--input",
            input.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--config",
            &config,
        ])
        .assert()
        .success();

    for file in [
        "DATE.csv",
        "MONEY.csv",
        "PERCENT.csv",
        "QUANTITY.csv",
        "PERSON.csv",
    ] {
        let path = out.join(file);
        assert!(path.exists(), "missing {file}");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.lines().count() > 1, "{file} has no rows");
    }
}

#[test]
fn generate_is_deterministic_per_seed() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("lists");
    fs::create_dir_all(&input).unwrap();
    write_input_lists(&input);
    let config = write_small_config(dir.path());

    let run = |out: &Path| {
        nergen()
            .args([
                "generate",
                "--input",
                input.to_str().unwrap(),
                "--out",
                out.to_str().unwrap(),
                "--config",
                &config,
                "--seed",
                "7",
            ])
            .assert()
            .success();
        fs::read_to_string(out.join("PERSON.csv")).unwrap()
    };
    let a = run(&dir.path().join("a"));
    let b = run(&dir.path().join("b"));
    assert_eq!(a, b);
}

#[test]
fn reconcile_then_split_then_stats() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("sentences.csv");
    let mut csv = String::from("sentences,entities,changed?\n");
    for i in 0..20 {
        csv.push_str(&format!(
            "Sætning {i} om at han betalte 200 kr i Aarhus.,\"[\"\"MONEY: 200 kr\"\", \"\"GPE: Aarhus\"\"]\",\n"
        ));
    }
    fs::write(&table, csv).unwrap();

    let dataset_dir = dir.path().join("dataset");
    nergen()
        .args([
            "reconcile",
            "--input",
            table.to_str().unwrap(),
            "--out",
            dataset_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("20 sentences"));

    let labelled = dataset_dir.join("LABELLED_DATASET.csv");
    assert!(labelled.exists());
    assert!(dataset_dir.join("span_failures.csv").exists());

    let corpus_dir = dir.path().join("corpus");
    nergen()
        .args([
            "split",
            "--input",
            labelled.to_str().unwrap(),
            "--out",
            corpus_dir.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("split 20 sentences"));

    for file in [
        "train.ndpk",
        "dev.ndpk",
        "test.ndpk",
        "label_distributions.txt",
    ] {
        assert!(corpus_dir.join(file).exists(), "missing {file}");
    }

    nergen()
        .args(["stats", "--sentences", table.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("ANNOTATION AUDIT"));
}

#[test]
fn stats_without_inputs_fails() {
    nergen()
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to report"));
}

#[test]
fn missing_input_file_is_a_clean_error() {
    let dir = TempDir::new().unwrap();
    nergen()
        .args([
            "reconcile",
            "--input",
            dir.path().join("absent.csv").to_str().unwrap(),
            "--out",
            dir.path().join("out").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
