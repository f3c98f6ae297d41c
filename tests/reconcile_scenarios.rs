//! End-to-end reconciliation scenarios over sentence batches.

use nergen::entity::{EntityLabel, Intent};
use nergen::reconcile::reconcile_batch;

fn intent(label: EntityLabel, text: &str) -> Intent {
    Intent::new(label, text)
}

#[test]
fn batch_counts_successes_failures_and_removals() {
    let rows = vec![
        (
            "Han betalte 200 kr for billetten.".to_string(),
            vec![
                intent(EntityLabel::Money, "200 kr"),
                intent(EntityLabel::Cardinal, "en"),
            ],
        ),
        (
            "Denne sætning nævner intet.".to_string(),
            vec![intent(EntityLabel::Gpe, "Aarhus")],
        ),
    ];
    let (sentences, summary) = reconcile_batch(rows);

    assert_eq!(summary.sentences, 2);
    assert_eq!(summary.mentions, 1);
    assert_eq!(summary.span_failures, 1);
    assert_eq!(summary.removed_cardinal_one, 1);

    assert_eq!(sentences[0].mentions.len(), 1);
    assert_eq!(sentences[0].mentions[0].start, 12);
    assert_eq!(sentences[0].mentions[0].end, 18);

    assert!(sentences[1].mentions.is_empty());
    assert_eq!(sentences[1].failures.len(), 1);
    assert_eq!(sentences[1].failures[0].text, "Aarhus");
}

#[test]
fn case_insensitive_fallback_recovers_drifted_casing() {
    let rows = vec![(
        "AARHUS er landets næststørste by.".to_string(),
        vec![intent(EntityLabel::Gpe, "Aarhus")],
    )];
    let (sentences, summary) = reconcile_batch(rows);
    assert_eq!(summary.span_failures, 0);
    assert_eq!(sentences[0].mentions[0].start, 0);
    assert_eq!(sentences[0].mentions[0].end, 6);
}

#[test]
fn duplicate_intents_land_on_distinct_occurrences() {
    // "5 kr og 5 kr" — both intents must reconcile, to different spans.
    let rows = vec![(
        "Det kostede 5 kr her og 5 kr der.".to_string(),
        vec![
            intent(EntityLabel::Money, "5 kr"),
            intent(EntityLabel::Money, "5 kr"),
        ],
    )];
    let (sentences, summary) = reconcile_batch(rows);
    assert_eq!(summary.mentions, 2);
    assert_eq!(summary.span_failures, 0);
    let spans: Vec<(usize, usize)> = sentences[0]
        .mentions
        .iter()
        .map(|m| (m.start, m.end))
        .collect();
    assert_eq!(spans, vec![(12, 16), (24, 28)]);
}

#[test]
fn mentions_are_sorted_and_non_overlapping() {
    let rows = vec![(
        "Mette Frederiksen besøgte Aarhus den 20. juli 2021.".to_string(),
        vec![
            intent(EntityLabel::Date, "20. juli 2021"),
            intent(EntityLabel::Person, "Mette Frederiksen"),
            intent(EntityLabel::Gpe, "Aarhus"),
        ],
    )];
    let (sentences, summary) = reconcile_batch(rows);
    assert_eq!(summary.mentions, 3);
    let m = &sentences[0].mentions;
    assert!(m.windows(2).all(|w| w[0].end <= w[1].start));
    assert_eq!(m[0].label, EntityLabel::Person);
    assert_eq!(m[1].label, EntityLabel::Gpe);
    assert_eq!(m[2].label, EntityLabel::Date);
}

#[test]
fn numeral_does_not_match_inside_larger_numeral() {
    let rows = vec![(
        "Regningen lød på 1500 kr i alt, heraf 500 til moms.".to_string(),
        vec![intent(EntityLabel::Cardinal, "500")],
    )];
    let (sentences, _) = reconcile_batch(rows);
    // "500" must hit the standalone numeral, not the tail of "1500".
    assert_eq!(sentences[0].mentions[0].start, 38);
    assert_eq!(sentences[0].mentions[0].end, 41);
}

#[test]
fn quoted_work_of_art_includes_quotes() {
    let rows = vec![(
        "Hun læste \"Ulysses\" i sommer.".to_string(),
        vec![intent(EntityLabel::WorkOfArt, "Ulysses")],
    )];
    let (sentences, _) = reconcile_batch(rows);
    assert_eq!(sentences[0].mentions[0].start, 10);
    assert_eq!(sentences[0].mentions[0].end, 19);
}

#[test]
fn context_remnant_is_stripped_before_search() {
    let rows = vec![(
        "Festivalen holdes i Roskilde hvert år.".to_string(),
        vec![intent(EntityLabel::Gpe, "Roskilde {by på Sjælland}")],
    )];
    let (sentences, summary) = reconcile_batch(rows);
    assert_eq!(summary.span_failures, 0);
    assert_eq!(sentences[0].mentions[0].start, 20);
    assert_eq!(sentences[0].mentions[0].end, 28);
}
