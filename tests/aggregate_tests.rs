mod common;

use common::{row, sample_export};
use huvudbok::{
    config::ReportConfig,
    ledger::{aggregate, AggregateOptions, MergeTable},
    report::render_flat,
    HuvudbokError,
};

fn lines(rows: &[String]) -> impl Iterator<Item = &str> {
    rows.iter().map(String::as_str)
}

#[test]
fn sales_example_books_credit_minus_debit() {
    let rows = vec![
        row("3010", "Sales", "P1", "2023-01-15", "0", "1 000,00"),
        row("", "", "P2", "2023-01-20", "500,50", "0"),
    ];
    let ledger = aggregate(lines(&rows), "2023", &AggregateOptions::default()).expect("aggregate");
    let report = render_flat(&ledger, &Default::default()).to_strings();

    assert_eq!(report[2], vec!["3010", "Sales", "499.50", "1000.00", "-500.50"]);
}

#[test]
fn merge_table_folds_deprecated_accounts() {
    let rows = vec![
        row("3010", "Medlemsavgift", "P1", "2018-01-01", "", "100,00"),
        row("3890", "Medlemsavgift privat", "P1", "2018-01-02", "", "200,00"),
    ];
    let mut ledger =
        aggregate(lines(&rows), "2018", &AggregateOptions::default()).expect("aggregate");
    ledger.apply_merges(&MergeTable::new([("3890", "3010")]).expect("table"));

    assert!(ledger.account("3890").is_none());
    let merged = ledger.account("3010").expect("merged account");
    assert_eq!(merged.amount("P1"), 300.0);
    assert_eq!(merged.name, "Medlemsavgift");
}

#[test]
fn second_block_for_an_account_replaces_the_first() {
    let rows = vec![
        row("3010", "Medlemsavgift", "", "", "", ""),
        row("", "", "P1", "2018-01-01", "", "100,00"),
        row("", "", "P2", "2018-01-02", "", "40,00"),
        row("3010", "Medlemsavgifter", "", "", "", ""),
        row("", "", "P1", "2018-03-01", "", "7,00"),
    ];
    let ledger = aggregate(lines(&rows), "2018", &AggregateOptions::default()).expect("aggregate");
    let report = render_flat(&ledger, &Default::default()).to_strings();

    assert_eq!(report[2], vec!["3010", "Medlemsavgifter", "7.00", "7.00", "0.00"]);
}

#[test]
fn totals_do_not_depend_on_row_order() {
    let header = row("4010", "Inköp", "", "", "", "");
    let details = vec![
        row("", "", "P1", "2020-01-01", "10,25", ""),
        row("", "", "P1", "2020-02-01", "", "3,50"),
        row("", "", "P1", "2020-03-01", "1 200,00", ""),
    ];

    let mut forward = vec![header.clone()];
    forward.extend(details.iter().cloned());
    let mut backward = vec![header];
    backward.extend(details.iter().rev().cloned());

    let options = AggregateOptions::default();
    let a = aggregate(lines(&forward), "2020", &options).expect("forward");
    let b = aggregate(lines(&backward), "2020", &options).expect("backward");

    let total_a = a.account("4010").expect("4010").amount("P1");
    let total_b = b.account("4010").expect("4010").amount("P1");
    assert!((total_a - total_b).abs() < 1e-9);
    assert!((total_a - -1206.75).abs() < 1e-9);
}

#[test]
fn flat_totals_match_cost_center_sums() {
    let config = ReportConfig::default();
    let rows = sample_export();
    let mut ledger = aggregate(lines(&rows), "2018", &config.aggregate_options()).expect("aggregate");
    ledger.apply_merges(&config.merge_table("2018").expect("merge table"));

    let report = render_flat(&ledger, &Default::default()).to_strings();
    let totals = report.last().expect("totals row");
    let expected = ledger.cost_center_totals();

    assert_eq!(totals[1], "Total");
    assert_eq!(totals[3], format!("{:.2}", expected["P1"]));
    assert_eq!(totals[4], format!("{:.2}", expected["P2"]));
    assert_eq!(totals[3], "109.00");
    assert_eq!(totals[4], "-30.00");
}

#[test]
fn flat_report_of_sample_export() {
    let config = ReportConfig::default();
    let rows = sample_export();
    let mut ledger = aggregate(lines(&rows), "2018", &config.aggregate_options()).expect("aggregate");
    ledger.apply_merges(&config.merge_table("2018").expect("merge table"));

    let tsv = render_flat(&ledger, &Default::default()).to_tsv();
    assert_eq!(
        tsv,
        "\t\t\tP1\tP2\n\
         account\tname\ttotal\t\t\n\
         1930\tBank\t-100.00\t-100.00\t0.00\n\
         3010\tMedlemsavgifter\t250.00\t200.00\t50.00\n\
         3990\tÖvrigt\t10.00\t10.00\t0.00\n\
         5010\tLokalhyra\t-80.00\t0.00\t-80.00\n\
         8310\tRänta\t1.00\t1.00\t0.00\n\
         8410\tRäntekostnad\t-2.00\t-2.00\t0.00\n\
         \n\
         \tTotal\t\t109.00\t-30.00\n"
    );
}

#[test]
fn corrupt_row_aborts_the_run() {
    let mut rows = sample_export();
    rows.insert(4, row("", "", "P1", "2018-01-06", "tio kronor", ""));

    let err = aggregate(lines(&rows), "2018", &AggregateOptions::default())
        .expect_err("corrupt row must abort");
    match err {
        HuvudbokError::RowParse { row, content, .. } => {
            assert_eq!(row, 5);
            assert!(content.contains("tio kronor"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
