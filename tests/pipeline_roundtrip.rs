//! Full pipeline round trip: sentence table in, serialized corpus out.

use nergen::align::RuleTokenizer;
use nergen::corpus::{case_randomize, split_corpus};
use nergen::docpack::{read_docpack, write_docpack};
use nergen::io::{
    read_labelled_dataset, read_sentence_table, write_csv, write_labelled_dataset,
};
use nergen::reconcile::reconcile_batch;
use nergen::PipelineConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn sentence_table_to_docpacks() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("sentences.csv");

    // Thirty annotated rows plus a handful of negatives.
    let mut rows = Vec::new();
    for i in 0..30 {
        rows.push(vec![
            format!("Sætning {i}: han betalte 200 kr i Aarhus."),
            r#"["MONEY: 200 kr", "GPE: Aarhus"]"#.to_string(),
            String::new(),
        ]);
    }
    for i in 0..5 {
        rows.push(vec![
            format!("Negativ sætning nummer {i} uden entiteter."),
            String::new(),
            String::new(),
        ]);
    }
    write_csv(&table, &["sentences", "entities", "changed?"], &rows).unwrap();

    // Reconcile.
    let parsed = read_sentence_table(&table).unwrap();
    assert_eq!(parsed.len(), 35);
    let batch: Vec<_> = parsed.into_iter().map(|r| (r.sentence, r.intents)).collect();
    let (reconciled, summary) = reconcile_batch(batch);
    assert_eq!(summary.sentences, 35);
    assert_eq!(summary.mentions, 60);
    assert_eq!(summary.span_failures, 0);

    // Labelled dataset round trip.
    let labelled = dir.path().join("LABELLED_DATASET.csv");
    let sentences: Vec<_> = reconciled
        .iter()
        .map(|r| (r.text.clone(), r.mentions.clone()))
        .collect();
    write_labelled_dataset(&labelled, &sentences).unwrap();
    let dataset = read_labelled_dataset(&labelled).unwrap();
    assert_eq!(dataset.len(), 35);
    for s in &dataset {
        s.validate().unwrap();
    }

    // Split, case-randomize each partition, serialize.
    let config = PipelineConfig::default();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut corpus = split_corpus(dataset, &config.split, &mut rng).unwrap();
    case_randomize(&mut corpus.train, &config.case, &mut rng).unwrap();
    case_randomize(&mut corpus.dev, &config.case, &mut rng).unwrap();
    case_randomize(&mut corpus.test, &config.case, &mut rng).unwrap();
    assert_eq!(corpus.len(), 35);
    assert!(!corpus.train.is_empty());
    for s in corpus.train.iter().chain(&corpus.dev).chain(&corpus.test) {
        s.validate().unwrap();
    }

    let train = dir.path().join("train.ndpk");
    let pack = write_docpack(&train, &corpus.train, &RuleTokenizer).unwrap();
    assert_eq!(pack.documents, corpus.train.len());

    let documents = read_docpack(&train).unwrap();
    assert_eq!(documents.len(), corpus.train.len());
    for (doc, sentence) in documents.iter().zip(&corpus.train) {
        assert_eq!(doc.text, sentence.text);
    }
}

#[test]
fn rerun_with_same_seed_is_identical() {
    let run = || {
        let config = PipelineConfig::default();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let sentences: Vec<_> = (0..40)
            .map(|i| {
                nergen::AnnotatedSentence::new(format!("Sætning nummer {i}."), vec![])
            })
            .collect();
        let mut corpus = split_corpus(sentences, &config.split, &mut rng).unwrap();
        case_randomize(&mut corpus.train, &config.case, &mut rng).unwrap();
        case_randomize(&mut corpus.dev, &config.case, &mut rng).unwrap();
        case_randomize(&mut corpus.test, &config.case, &mut rng).unwrap();
        (
            corpus.train.iter().map(|s| s.text.clone()).collect::<Vec<_>>(),
            corpus.dev.iter().map(|s| s.text.clone()).collect::<Vec<_>>(),
            corpus.test.iter().map(|s| s.text.clone()).collect::<Vec<_>>(),
        )
    };
    assert_eq!(run(), run());
}
