use std::path::PathBuf;

use tokamak_ring::{DecoratedKey, RingToken, TokenRange};
use tokamak_search::Partitioner;

fn ten_way() -> Partitioner {
    Partitioner::on_token(10, None).expect("ten partitions")
}

#[test]
fn ten_way_split_of_reference_keys() {
    // Shard assignment is part of the on-disk layout; these pin it down.
    let partitioner = ten_way();
    let cases: &[(&[u8], usize)] = &[
        (b"key1", 5),
        (b"key2", 9),
        (b"key3", 9),
        (b"key4", 8),
        (b"key5", 1),
        (b"key6", 3),
        (b"key7", 9),
        (b"key8", 8),
        (b"key9", 5),
        (b"key10", 4),
    ];
    for (key, partition) in cases {
        assert_eq!(
            partitioner.partition(&DecoratedKey::decorate(*key)),
            *partition,
            "key {:?}",
            String::from_utf8_lossy(key)
        );
    }

    assert_eq!(partitioner.partition_token(RingToken::MINIMUM), 0);
    assert_eq!(partitioner.partition_token(RingToken::new(i64::MAX)), 9);
}

#[test]
fn assignment_changes_exactly_at_a_boundary() {
    // Fourth boundary of the ten-way split, as a signed token.
    let boundary = RingToken::new(-3689348814741910324);
    let partitioner = ten_way();
    assert_eq!(partitioner.partition_token(boundary), 3);
    assert_eq!(
        partitioner.partition_token(RingToken::new(boundary.value() - 1)),
        2
    );
}

#[test]
fn a_single_partition_swallows_the_whole_ring() {
    let partitioner = Partitioner::on_token(1, None).expect("single partition");
    for token in [
        RingToken::MINIMUM,
        RingToken::new(i64::MAX),
        RingToken::new(0),
        RingToken::from_key(b"key1"),
    ] {
        assert_eq!(partitioner.partition_token(token), 0);
    }
}

#[test]
fn partition_counts_must_be_strictly_positive() {
    for partitions in [0, -1] {
        let err = Partitioner::on_token(partitions, None).expect_err("bad partition count");
        assert_eq!(
            err.to_string(),
            format!("The number of partitions should be strictly positive but found {partitions}")
        );
    }
}

#[test]
fn path_count_must_match_the_partition_count() {
    let err = Partitioner::on_token(1, Some(Vec::new())).expect_err("missing paths");
    assert_eq!(
        err.to_string(),
        "The paths size must be equal to number of partitions"
    );

    let paths = vec![PathBuf::from("/idx/a"), PathBuf::from("/idx/b")];
    let err = Partitioner::on_token(3, Some(paths)).expect_err("short path list");
    assert_eq!(
        err.to_string(),
        "The paths size must be equal to number of partitions"
    );
}

#[test]
fn shard_paths_keep_their_declared_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths: Vec<PathBuf> = (0..4).map(|i| dir.path().join(format!("shard-{i}"))).collect();

    let partitioner = Partitioner::on_token(4, Some(paths.clone())).expect("partitioner");
    assert_eq!(partitioner.partition_paths(), Some(paths.as_slice()));

    let json = partitioner.to_json().expect("serialize");
    let parsed = Partitioner::from_json(&json).expect("parse");
    assert_eq!(parsed, partitioner);
    assert_eq!(parsed.partition_paths(), Some(paths.as_slice()));
}

#[test]
fn descriptors_build_the_same_partitioner_as_direct_construction() {
    let parsed = Partitioner::from_json(r#"{"type":"token","partitions":1,"paths":["/home/a"]}"#)
        .expect("token descriptor");
    let built = Partitioner::on_token(1, Some(vec![PathBuf::from("/home/a")])).expect("direct");
    assert_eq!(parsed, built);

    let parsed = Partitioner::from_json(r#"{"type":"none"}"#).expect("none descriptor");
    assert_eq!(parsed, Partitioner::on_none());
    assert_eq!(parsed, Partitioner::default());
}

#[test]
fn descriptors_go_through_constructor_validation() {
    let err = Partitioner::from_json(r#"{"type":"token","partitions":0}"#)
        .expect_err("invalid partition count");
    assert_eq!(
        err.to_string(),
        "The number of partitions should be strictly positive but found 0"
    );

    assert!(Partitioner::from_json(r#"{"type":"unknown"}"#).is_err());
    assert!(Partitioner::from_json("not json").is_err());
}

#[test]
fn full_and_empty_ranges_bound_the_fan_out() {
    let partitioner = ten_way();

    let all: Vec<usize> = (0..10).collect();
    assert_eq!(partitioner.partitions_for(&TokenRange::full()), all);

    let min = Some(RingToken::MINIMUM);
    let empty = TokenRange::new(min, min, true, false);
    assert_eq!(partitioner.partitions_for(&empty), Vec::<usize>::new());

    // Both-sentinel inclusive means the whole ring, not the empty set.
    let whole = TokenRange::new(min, min, true, true);
    assert_eq!(partitioner.partitions_for(&whole), all);
}

#[test]
fn subranges_cover_the_spanned_partitions() {
    let partitioner = ten_way();
    let key5 = RingToken::from_key(b"key5");
    let key6 = RingToken::from_key(b"key6");
    assert_eq!(partitioner.partition_token(key5), 1);
    assert_eq!(partitioner.partition_token(key6), 3);

    let range = TokenRange::new(Some(key5), Some(key6), true, true);
    assert_eq!(partitioner.partitions_for(&range), vec![1, 2, 3]);
}

#[test]
fn wraparound_ranges_split_at_the_ring_edge() {
    let partitioner = ten_way();
    let range = TokenRange::new(
        Some(RingToken::new(8000000000000000000)),
        Some(RingToken::new(-7000000000000000000)),
        false,
        true,
    );
    assert!(range.is_wraparound());
    assert_eq!(partitioner.partitions_for(&range), vec![9, 0, 1]);
}
