use std::sync::Arc;

use tokamak_index::{Document, Field, MemoryIndex, Query, SearcherLease, SortSpec};

fn seeded_index() -> Arc<MemoryIndex> {
    let index = MemoryIndex::new();
    let mut doc = Document::new();
    doc.add(Field::indexed("name", "alpha"));
    doc.add(Field::doc_values("rank", 1i64));
    index.insert(doc);
    Arc::new(index)
}

#[test]
fn dropping_a_lease_releases_the_searcher() {
    let index = seeded_index();
    {
        let lease = SearcherLease::acquire(index.clone()).expect("acquire");
        assert_eq!(index.leased(), 1);

        let sort = lease
            .searcher()
            .resolve_sort(&SortSpec::default())
            .expect("resolve");
        let hits = lease
            .searcher()
            .search_after(None, &Query::All, &sort, 10)
            .expect("search");
        assert_eq!(hits.len(), 1);
    }
    assert_eq!(index.leased(), 0);
}

#[test]
fn explicit_release_happens_once() {
    let index = seeded_index();
    let lease = SearcherLease::acquire(index.clone()).expect("acquire");
    assert_eq!(index.leased(), 1);
    lease.release().expect("release");
    assert_eq!(index.leased(), 0);
}
