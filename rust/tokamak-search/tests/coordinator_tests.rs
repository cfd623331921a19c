use std::sync::Arc;

use tokamak_index::{Document, Field, FieldValue, MemoryIndex, Query, SearcherSource, field_set};
use tokamak_ring::{DecoratedKey, RingScheme, RingToken, TokenRange};
use tokamak_search::{
    Column, ColumnType, Columns, KeyField, Mapper, Partitioner, SearchCoordinator, SearchRecord,
    SearchRequest, TableSchema, TextMapper, TokenField, schema,
};

fn make_shards(count: usize) -> Vec<Arc<MemoryIndex>> {
    (0..count).map(|_| Arc::new(MemoryIndex::new())).collect()
}

fn coordinator_over(
    shards: &[Arc<MemoryIndex>],
    partitioner: Partitioner,
) -> SearchCoordinator {
    let sources = shards
        .iter()
        .map(|shard| shard.clone() as Arc<dyn SearcherSource>)
        .collect();
    SearchCoordinator::new(RingScheme::Murmur3, partitioner, sources).expect("coordinator")
}

fn token_codec() -> TokenField {
    TokenField::new(RingScheme::Murmur3).expect("codec")
}

/// Builds the row document the write path would: token and key fields plus
/// the raw key stored under `name` for readable assertions.
fn index_row(
    shards: &[Arc<MemoryIndex>],
    partitioner: &Partitioner,
    raw: &str,
) -> DecoratedKey {
    let key = DecoratedKey::decorate(raw.as_bytes());
    let mut doc = Document::new();
    token_codec().add_fields(&mut doc, &key);
    KeyField::new().add_fields(&mut doc, &key);
    doc.add(Field::stored("name", raw));
    shards[partitioner.partition(&key)].insert(doc);
    key
}

fn merged_records(coordinator: &SearchCoordinator, request: SearchRequest) -> Vec<SearchRecord> {
    coordinator
        .search(request)
        .expect("search")
        .map(|record| record.expect("record"))
        .collect()
}

#[test]
fn randomized_corpus_merges_into_global_ring_order() {
    let shards = make_shards(5);
    let partitioner = Partitioner::on_token(5, None).expect("partitioner");
    let coordinator = coordinator_over(&shards, partitioner.clone());

    let mut names: Vec<String> = (0..60).map(|i| format!("row-{i:03}")).collect();
    fastrand::seed(42);
    fastrand::shuffle(&mut names);

    let mut expected: Vec<DecoratedKey> = names
        .iter()
        .map(|name| index_row(&shards, &partitioner, name))
        .collect();
    expected.sort();

    // Small pages so every shard stream crosses several fetches.
    let records = merged_records(&coordinator, SearchRequest::new(Query::All, 4));
    let keys: Vec<DecoratedKey> = records.iter().map(|record| record.key.clone()).collect();
    assert_eq!(keys, expected);
    assert!(
        records
            .iter()
            .all(|record| record.partition == partitioner.partition(&record.key))
    );
    assert!(shards.iter().all(|shard| shard.leased() == 0));
}

#[test]
fn range_restriction_filters_rows_and_skips_shards() {
    let shards = make_shards(5);
    let partitioner = Partitioner::on_token(5, None).expect("partitioner");
    let coordinator = coordinator_over(&shards, partitioner.clone());

    let mut keys: Vec<DecoratedKey> = (0..40)
        .map(|i| index_row(&shards, &partitioner, &format!("row-{i:03}")))
        .collect();
    keys.sort();

    // A half-open slice of the ring taken between two indexed tokens.
    let lower = keys[10].token();
    let upper = keys[30].token();
    let range = TokenRange::new(Some(lower), Some(upper), false, true);

    let expected: Vec<DecoratedKey> = keys
        .iter()
        .filter(|key| key.token() > lower && key.token() <= upper)
        .cloned()
        .collect();

    let request = SearchRequest::new(Query::All, 4).with_range(range);
    let merge = coordinator.search(request).expect("search");
    let targets = partitioner.partitions_for(&range);
    assert_eq!(merge.fan_out(), targets.len());

    let got: Vec<DecoratedKey> = merge
        .map(|record| record.expect("record").key)
        .collect();
    assert_eq!(got, expected);

    for partition in 0..partitioner.num_partitions() {
        if !targets.contains(&partition) {
            assert_eq!(shards[partition].search_count(), 0, "shard {partition}");
            assert_eq!(shards[partition].leased(), 0, "shard {partition}");
        }
    }
}

#[test]
fn mapped_rows_are_searchable_end_to_end() {
    let schema_def = TableSchema::new().with_column("name", ColumnType::Text);
    let mapper = TextMapper::new("name", "name");
    schema::validate_schema(&mapper, &schema_def).expect("mapper fits the table");

    let shards = make_shards(3);
    let partitioner = Partitioner::on_token(3, None).expect("partitioner");
    let coordinator = coordinator_over(&shards, partitioner.clone());

    for (raw, name) in [("key", "alpha"), ("key1", "beta"), ("key2", "alpha")] {
        let key = DecoratedKey::decorate(raw.as_bytes());
        let mut columns = Columns::new();
        columns.add(Column::new("name", name));
        schema::validate_columns(&mapper, &columns).expect("writable row");

        let mut doc = Document::new();
        token_codec().add_fields(&mut doc, &key);
        KeyField::new().add_fields(&mut doc, &key);
        mapper.add_fields(&mut doc, &columns).expect("mapped fields");
        doc.add(Field::stored("name", name));
        shards[partitioner.partition(&key)].insert(doc);
    }

    // Ring order of the two alpha rows: "key" then "key2".
    let request =
        SearchRequest::new(Query::term("name", "alpha"), 10).with_fields(field_set(["name"]));
    let records = merged_records(&coordinator, request);
    let keys: Vec<&[u8]> = records.iter().map(|record| record.key.key()).collect();
    assert_eq!(keys, vec![&b"key"[..], b"key2"]);
    assert!(records.iter().all(|record| {
        record.document.value("name") == Some(&FieldValue::Text("alpha".into()))
    }));

    // The same term query narrowed to key2's token touches one shard only.
    let token = RingToken::from_key(b"key2");
    let request = SearchRequest::new(Query::term("name", "alpha"), 10)
        .with_range(TokenRange::new(Some(token), Some(token), true, true));
    let records = merged_records(&coordinator, request);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key.key(), b"key2");
}

#[test]
fn descriptor_built_partitioners_drive_the_fan_out() {
    let partitioner =
        Partitioner::from_json(r#"{"type":"token","partitions":3}"#).expect("descriptor");
    let shards = make_shards(3);
    let coordinator = coordinator_over(&shards, partitioner.clone());

    for raw in ["key", "key1", "key2"] {
        index_row(&shards, &partitioner, raw);
    }
    assert!(shards.iter().all(|shard| shard.len() == 1));

    let records = merged_records(&coordinator, SearchRequest::new(Query::All, 10));
    assert_eq!(records.len(), 3);
    assert_eq!(
        records.iter().map(|r| r.partition).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn close_releases_all_shards_mid_iteration() {
    let shards = make_shards(3);
    let partitioner = Partitioner::on_token(3, None).expect("partitioner");
    let coordinator = coordinator_over(&shards, partitioner.clone());
    for i in 0..30 {
        index_row(&shards, &partitioner, &format!("row-{i:03}"));
    }

    let mut merge = coordinator
        .search(SearchRequest::new(Query::All, 4))
        .expect("search");
    merge.next().expect("first record").expect("record");
    assert!(shards.iter().any(|shard| shard.leased() > 0));

    merge.close().expect("close");
    assert!(shards.iter().all(|shard| shard.leased() == 0));
}
