use chrono::{TimeZone, Utc};
use homeboard_model::{Article, ArticleStatus, Collection, Fields, Listing, Record, User, UserRole};
use proptest::prelude::*;

#[test]
fn storage_keys_are_distinct_per_resource() {
    let keys = [
        Article::COLLECTION_KEY,
        Article::DRAFT_KEY,
        Listing::COLLECTION_KEY,
        Listing::DRAFT_KEY,
        User::COLLECTION_KEY,
        User::DRAFT_KEY,
    ];
    let unique: std::collections::HashSet<_> = keys.iter().collect();
    assert_eq!(unique.len(), keys.len());
}

#[test]
fn collection_json_is_a_plain_array() {
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let user = User {
        name: "Ines".to_string(),
        role: UserRole::Agent,
        ..User::default()
    };
    let collection = Collection::from_records(vec![Record::new("u1", user, now)]).unwrap();

    let json = serde_json::to_value(&collection).unwrap();

    let array = json.as_array().expect("collection serializes as an array");
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["role"], "Agent");
    assert_eq!(array[0]["createdAt"], "2024-01-02T03:04:05Z");
}

#[test]
fn from_records_rejects_duplicate_ids() {
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let records = vec![
        Record::new("a", Article::default(), now),
        Record::new("a", Article::default(), now),
    ];
    assert!(Collection::from_records(records).is_err());
}

proptest! {
    #[test]
    fn article_records_survive_json(
        title in "[A-Za-z ]{0,24}",
        author in "[A-Za-z]{0,12}",
        published in any::<bool>(),
        secs in 0i64..2_000_000_000,
    ) {
        let now = Utc.timestamp_opt(secs, 0).unwrap();
        let article = Article {
            title,
            author,
            status: if published { ArticleStatus::Published } else { ArticleStatus::Draft },
            ..Article::default()
        };
        let record = Record::new("id-1", article, now);

        let text = serde_json::to_string(&record).unwrap();
        let back: Record<Article> = serde_json::from_str(&text).unwrap();

        prop_assert_eq!(back, record);
    }
}
