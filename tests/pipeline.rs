//! End-to-end pipeline tests: parse XML, flatten a batch of items against a
//! shared accumulator, finalize with header metadata, export CSV.

use std::collections::{BTreeMap, HashSet};

use espalier::flatten::{
    ChildSelector, ExtractionUnit, FlattenConfig, PathSpec, ProductPolicy, TableAccumulator,
};
use espalier::xml::Document;

const CATALOG: &str = "\
<catalog>\
  <record status=\"active\">\
    <listing>\
      <title>First</title>\
      <tag>alpha</tag>\
      <tag>beta</tag>\
    </listing>\
    <meta>\
      <source><entry><code>s1</code></entry><entry><code>s2</code></entry></source>\
    </meta>\
  </record>\
  <record status=\"retired\">\
    <listing>\
      <title>Second</title>\
      <tag>gamma</tag>\
    </listing>\
  </record>\
</catalog>";

fn units() -> Vec<ExtractionUnit> {
    vec![
        ExtractionUnit::new(
            vec![
                ChildSelector::Element("title".into()),
                ChildSelector::Element("tag".into()),
            ],
            PathSpec::Parent("listing".into()),
            "listings",
        ),
        ExtractionUnit::new(
            vec![ChildSelector::Attribute("record".into(), "status".into())],
            PathSpec::Root,
            "statuses",
        ),
        ExtractionUnit::new(
            vec![ChildSelector::Element("code".into())],
            PathSpec::Chain(vec!["meta".into(), "source".into(), "entry".into()]),
            "sources",
        ),
        // Never matches anything; only its declared headers survive.
        ExtractionUnit::new(
            vec![ChildSelector::Element("absent".into())],
            PathSpec::Parent("nowhere".into()),
            "empty",
        ),
    ]
}

fn headers() -> BTreeMap<String, Vec<String>> {
    let mut headers = BTreeMap::new();
    headers.insert(
        "listings".to_string(),
        vec!["title".to_string(), "tag".to_string()],
    );
    headers.insert("statuses".to_string(), vec!["status".to_string()]);
    headers.insert("sources".to_string(), vec!["code".to_string()]);
    headers.insert(
        "empty".to_string(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
    );
    headers
}

#[test]
fn full_batch_produces_expected_tables() {
    let doc = Document::parse(CATALOG).unwrap();

    let mut accumulator = TableAccumulator::new();
    let processed = espalier::flatten_items(
        &doc,
        "record",
        &units(),
        &[],
        &HashSet::new(),
        FlattenConfig::default(),
        &mut accumulator,
    )
    .unwrap();
    assert_eq!(processed, 2);

    let tables = accumulator.finalize(&headers(), "");

    // One row per record, first tag only under the default policy.
    assert_eq!(
        tables["listings"].rows,
        vec![
            vec!["First".to_string(), "alpha".to_string()],
            vec!["Second".to_string(), "gamma".to_string()],
        ]
    );

    // Root attribute read directly off each record.
    assert_eq!(
        tables["statuses"].rows,
        vec![vec!["active".to_string()], vec!["retired".to_string()]]
    );

    // Chain fan-out: two <entry> parents in the first record, none in the
    // second (missing chain is silently skipped).
    assert_eq!(
        tables["sources"].rows,
        vec![vec!["s1".to_string()], vec!["s2".to_string()]]
    );

    // Declared-but-empty table keeps its headers.
    assert!(tables["empty"].is_empty());
    assert_eq!(tables["empty"].columns, vec!["a", "b", "c"]);
}

#[test]
fn all_combinations_expands_one_to_many() {
    let doc = Document::parse(CATALOG).unwrap();

    let mut accumulator = TableAccumulator::new();
    espalier::flatten_items(
        &doc,
        "record",
        &units(),
        &[],
        &HashSet::new(),
        FlattenConfig {
            product: ProductPolicy::AllCombinations,
        },
        &mut accumulator,
    )
    .unwrap();

    let tables = accumulator.finalize(&headers(), "");
    assert_eq!(
        tables["listings"].rows,
        vec![
            vec!["First".to_string(), "alpha".to_string()],
            vec!["First".to_string(), "beta".to_string()],
            vec!["Second".to_string(), "gamma".to_string()],
        ]
    );
}

#[test]
fn row_prefix_and_skip_set_apply_across_the_batch() {
    let doc = Document::parse(CATALOG).unwrap();

    let skip: HashSet<String> = ["sources".to_string(), "empty".to_string()]
        .into_iter()
        .collect();
    let mut accumulator = TableAccumulator::new();
    espalier::flatten_items(
        &doc,
        "record",
        &units(),
        &["batch-1".to_string()],
        &skip,
        FlattenConfig::default(),
        &mut accumulator,
    )
    .unwrap();

    assert!(accumulator.rows("sources").is_none());
    assert_eq!(
        accumulator.rows("statuses").unwrap(),
        &[
            vec!["batch-1".to_string(), "active".to_string()],
            vec!["batch-1".to_string(), "retired".to_string()],
        ]
    );
}

#[test]
fn exported_csv_round_trips_headers_and_rows() {
    let doc = Document::parse(CATALOG).unwrap();

    let mut accumulator = TableAccumulator::new();
    espalier::flatten_items(
        &doc,
        "record",
        &units(),
        &[],
        &HashSet::new(),
        FlattenConfig::default(),
        &mut accumulator,
    )
    .unwrap();
    let tables = accumulator.finalize(&headers(), "");

    let dir = tempfile::tempdir().unwrap();
    let written = espalier::export::write_tables(&tables, dir.path()).unwrap();
    assert_eq!(written.len(), 4);

    let listings = std::fs::read_to_string(dir.path().join("listings.csv")).unwrap();
    assert_eq!(listings, "title,tag\nFirst,alpha\nSecond,gamma\n");

    let empty = std::fs::read_to_string(dir.path().join("empty.csv")).unwrap();
    assert_eq!(empty, "a,b,c\n");
}
