use pretty_assertions::assert_eq;

use seriatim::{
    backup::{encode, export_to_document},
    identity::resolve_author,
    library::Library,
    restore::import_document,
    store::{Entity, EntityKind, SqliteStore, Store},
    types::{
        book::Book,
        rating::Rating,
        series::Series,
        status::{ReadStatus, SeriesStatus},
        timestamp::Timestamp,
        uuid::Uuid,
    },
};

async fn store_with_culture() -> (SqliteStore, Series) {
    let mut store = SqliteStore::in_memory().await.unwrap();
    let author = resolve_author(&mut store, "Iain M. Banks").await.unwrap();
    let series = Series::new("Culture", author.clone(), SeriesStatus::InProgress).unwrap();
    store.insert(Entity::Series(series.clone())).await.unwrap();

    let mut first = Book::new(series.id, "Consider Phlebas", 1, ReadStatus::Completed).unwrap();
    first.end_date = Timestamp::from_ymd(2023, 11, 30);
    first.rating = Some(Rating::new(3).unwrap());
    first.author = Some(author);
    let second = Book::new(series.id, "The Player of Games", 2, ReadStatus::NotStarted).unwrap();
    store.insert(Entity::Book(first)).await.unwrap();
    store.insert(Entity::Book(second)).await.unwrap();
    store.save().await.unwrap();
    (store, series)
}

#[tokio::test]
async fn series_are_hydrated_with_books() {
    let (mut store, original) = store_with_culture().await;
    let library = Library::load(&mut store).await.unwrap();
    assert_eq!(library.series.len(), 1);

    let series = &library.series[0];
    assert_eq!(series.id, original.id);
    assert_eq!(series.author, original.author);
    let titles: Vec<_> = series.books.iter().map(|x| x.title.as_str()).collect();
    assert_eq!(titles, ["Consider Phlebas", "The Player of Games"]);

    let first = &series.books[0];
    assert_eq!(first.end_date, Timestamp::from_ymd(2023, 11, 30));
    assert_eq!(first.rating, Some(Rating::new(3).unwrap()));
    assert_eq!(first.author_name(), Some("Iain M. Banks"));
    assert_eq!(series.books[1].author, None);
}

#[tokio::test]
async fn authors_are_found_by_exact_name() {
    let (mut store, original) = store_with_culture().await;
    let found = store.find_author_by_name("Iain M. Banks").await.unwrap();
    assert_eq!(found.map(|x| x.id), Some(original.author.id));
    assert_eq!(store.find_author_by_name("iain m. banks").await.unwrap(), None);
}

#[tokio::test]
async fn deleting_series_cascades_to_books() {
    let (mut store, original) = store_with_culture().await;
    assert!(store.delete_series(&original.id).await.unwrap());
    store.save().await.unwrap();
    assert!(store.series().await.unwrap().is_empty());
    assert!(store.books().await.unwrap().is_empty());
    assert_eq!(store.authors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_all_series_removes_books() {
    let (mut store, _) = store_with_culture().await;
    assert_eq!(store.delete_all(EntityKind::Series).await.unwrap(), 1);
    assert!(store.books().await.unwrap().is_empty());
    assert_eq!(store.delete_all(EntityKind::Author).await.unwrap(), 1);
}

#[tokio::test]
async fn orphan_books_are_rejected() {
    let mut store = SqliteStore::in_memory().await.unwrap();
    let book = Book::new(Uuid::new(), "Excession", 5, ReadStatus::NotStarted).unwrap();
    assert!(store.insert(Entity::Book(book)).await.is_err());
}

#[tokio::test]
async fn import_replaces_library() {
    let (mut store, _) = store_with_culture().await;
    let document = br#"[
        {"name": "Laundry Files", "status": "Reading", "authorname": "Charles Stross",
         "notes": "", "books": [
            {"title": "The Atrocity Archives", "seriesOrder": 1, "readStatus": "Completed",
             "endDate": "2024-01-15T00:00:00Z", "notes": "", "authorname": "No Author"}
         ]}
    ]"#;
    let summary = import_document(&mut store, document).await.unwrap();
    assert_eq!(summary.author_count, 2);

    let library = Library::load(&mut store).await.unwrap();
    let names: Vec<_> = library.series.iter().map(|x| x.name.as_str()).collect();
    assert_eq!(names, ["Laundry Files"]);
    let book = &library.series[0].books[0];
    assert_eq!(book.end_date, Timestamp::from_ymd(2024, 1, 15));
    assert_eq!(book.start_date, None);
    assert_eq!(book.author_name(), Some("No Author"));
}

#[tokio::test]
async fn sub_millisecond_dates_survive_a_round_trip() {
    let mut store = SqliteStore::in_memory().await.unwrap();
    let document = br#"[
        {"name": "Laundry Files", "status": "Reading", "authorname": "Charles Stross",
         "notes": "", "books": [
            {"title": "The Atrocity Archives", "seriesOrder": 1, "readStatus": "Completed",
             "startDate": "2024-01-02T08:30:00.000001Z",
             "endDate": "2024-01-15T00:00:00.123456Z", "notes": "", "authorname": "No Author"}
         ]}
    ]"#;
    import_document(&mut store, document).await.unwrap();

    let library = Library::load(&mut store).await.unwrap();
    let book = &library.series[0].books[0];
    let expected: Timestamp = serde_json::from_str("\"2024-01-15T00:00:00.123456Z\"").unwrap();
    assert_eq!(book.end_date, Some(expected));

    let json = encode(&export_to_document(&library.series)).unwrap();
    assert!(json.contains("2024-01-15T00:00:00.123456Z"), "{json}");
    assert!(json.contains("2024-01-02T08:30:00.000001Z"), "{json}");
}

#[tokio::test]
async fn books_appended_after_a_deletion_keep_their_order() {
    let mut store = SqliteStore::in_memory().await.unwrap();
    let author = resolve_author(&mut store, "Ann Leckie").await.unwrap();
    let series = Series::new("Imperial Radch", author, SeriesStatus::InProgress).unwrap();
    store.insert(Entity::Series(series.clone())).await.unwrap();

    let mut ids = Vec::new();
    for (order, title) in ["one", "two", "three"].into_iter().enumerate() {
        let book = Book::new(series.id, title, order as i64 + 1, ReadStatus::NotStarted).unwrap();
        ids.push(book.id);
        store.insert(Entity::Book(book)).await.unwrap();
    }
    assert!(store.delete_book(&ids[0]).await.unwrap());
    let fourth = Book::new(series.id, "four", 4, ReadStatus::NotStarted).unwrap();
    store.insert(Entity::Book(fourth)).await.unwrap();
    store.save().await.unwrap();

    let library = Library::load(&mut store).await.unwrap();
    let titles: Vec<_> = library.series[0].books.iter().map(|x| x.title.as_str()).collect();
    assert_eq!(titles, ["two", "three", "four"]);
}

#[tokio::test]
async fn unsaved_changes_are_rolled_back_on_drop() {
    let dir = std::env::temp_dir().join(format!("seriatim-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("database");

    {
        let mut store = SqliteStore::connect(&path).await.unwrap();
        let author = resolve_author(&mut store, "Martha Wells").await.unwrap();
        let series = Series::new("Murderbot", author, SeriesStatus::Reading).unwrap();
        store.insert(Entity::Series(series)).await.unwrap();
        store.save().await.unwrap();
    }
    {
        let mut store = SqliteStore::connect(&path).await.unwrap();
        store.delete_all(EntityKind::Series).await.unwrap();
        store.delete_all(EntityKind::Author).await.unwrap();
        assert!(store.series().await.unwrap().is_empty());
    }
    let mut store = SqliteStore::connect(&path).await.unwrap();
    let library = Library::load(&mut store).await.unwrap();
    assert_eq!(library.series.len(), 1);
    assert_eq!(library.authors.len(), 1);

    drop(store);
    let _ = std::fs::remove_dir_all(dir);
}
