use std::collections::BTreeSet;

use chrono::{NaiveDate, TimeZone, Utc};
use homeboard_model::{Article, ArticleStatus, Collection, Listing, Record, User, UserRole};
use homeboard_query::{FilterState, Selection, SortSpec, filtered_ids, query_page};
use proptest::prelude::*;

fn article(id: usize, category: &str, status: ArticleStatus) -> Record<Article> {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::TimeDelta::days(id as i64);
    Record::new(
        format!("a{id}"),
        Article {
            title: format!("Article {id}"),
            author: if id % 2 == 0 { "Ana" } else { "Bo" }.to_string(),
            category: category.to_string(),
            status,
            ..Article::default()
        },
        created,
    )
}

/// Ten articles: four published, two of them in Real Estate.
fn sample() -> Vec<Record<Article>> {
    vec![
        article(0, "Real Estate", ArticleStatus::Published),
        article(1, "Moving", ArticleStatus::Draft),
        article(2, "Real Estate", ArticleStatus::Published),
        article(3, "Moving", ArticleStatus::Published),
        article(4, "Finance", ArticleStatus::Archived),
        article(5, "Real Estate", ArticleStatus::Draft),
        article(6, "Finance", ArticleStatus::Published),
        article(7, "Moving", ArticleStatus::Draft),
        article(8, "Finance", ArticleStatus::Draft),
        article(9, "Real Estate", ArticleStatus::Archived),
    ]
}

#[test]
fn adding_a_filter_narrows_the_result() {
    let data = sample();
    let published = FilterState::new().with_category("status", "Published");
    let published_real_estate = published.clone().with_category("category", "Real Estate");

    let wide = filtered_ids(&data, &published);
    let narrow = filtered_ids(&data, &published_real_estate);

    assert_eq!(wide.len(), 4);
    assert_eq!(narrow.len(), 2);
    assert!(narrow.is_subset(&wide));
}

#[test]
fn status_filter_ignores_case() {
    let data = sample();
    let lower = FilterState::new().with_category("status", "published");
    assert_eq!(filtered_ids(&data, &lower).len(), 4);
}

#[test]
fn unrecognised_status_matches_everything() {
    let data = sample();
    let live = FilterState::new().with_category("status", "Live");
    let page = query_page(&data, &live, 1, 6, &SortSpec::none());
    assert_eq!(page.total_count, 10);

    // Only the unrecognised part is dropped.
    let live_real_estate = live.with_category("category", "Real Estate");
    assert_eq!(filtered_ids(&data, &live_real_estate).len(), 4);
}

#[test]
fn unrecognised_user_role_matches_everything() {
    let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let users: Vec<Record<User>> = [UserRole::Agent, UserRole::Customer, UserRole::Mover]
        .into_iter()
        .enumerate()
        .map(|(i, role)| {
            Record::new(
                format!("u{i}"),
                User {
                    role,
                    ..User::default()
                },
                created,
            )
        })
        .collect();

    let astronauts = FilterState::new().with_category("role", "Astronaut");
    assert_eq!(filtered_ids(&users, &astronauts).len(), 3);
    let agents = FilterState::new().with_category("role", "AGENT");
    assert_eq!(
        filtered_ids(&users, &agents),
        BTreeSet::from(["u0".to_string()])
    );
}

#[test]
fn out_of_range_page_clamps_to_last() {
    let listings: Vec<Record<Listing>> = (0..7)
        .map(|i| {
            Record::new(
                format!("l{i}"),
                Listing {
                    title: format!("Flat {i}"),
                    ..Listing::default()
                },
                Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            )
        })
        .collect();

    let page = query_page(&listings, &FilterState::new(), 3, 6, &SortSpec::none());

    assert_eq!(page.total_count, 7);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page_number, 2);
    assert!(page.was_clamped());
    assert_eq!(page.page_ids(), vec!["l6"]);
    assert_eq!(page.item_range(), Some((7, 7)));
}

#[test]
fn selection_is_pruned_after_filter_change() {
    let data = sample();
    let mut selection = Selection::new();
    for id in ["a0", "a1", "a3"] {
        selection.toggle(id);
    }

    let filter = FilterState::new().with_category("status", "Published");
    let pruned = selection.reconcile(&filtered_ids(&data, &filter));

    assert_eq!(pruned, vec!["a1".to_string()]);
    assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["a0", "a3"]);
}

#[test]
fn since_falls_back_to_creation_day_for_unpublished_articles() {
    let data = sample();
    let filter = FilterState::new().with_since(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    let ids = filtered_ids(&data, &filter);
    assert_eq!(ids, ["a8", "a9"].iter().map(|s| s.to_string()).collect::<BTreeSet<_>>());
}

#[test]
fn sort_by_title_then_page() {
    let data = sample();
    let page = query_page(
        &data,
        &FilterState::new().with_term("article"),
        2,
        4,
        &SortSpec::descending("title"),
    );
    assert_eq!(page.page_ids(), vec!["a5", "a4", "a3", "a2"]);
    assert!(page.has_previous() && page.has_next());
}

#[test]
fn works_over_a_collection() {
    let collection = Collection::from_records(sample()).unwrap();
    let page = query_page(&collection, &FilterState::new().with_term("ANA"), 1, 6, &SortSpec::none());
    assert_eq!(page.total_count, 5);
}

proptest! {
    #[test]
    fn page_is_always_in_range(count in 0usize..40, size in 0usize..10, requested in 0usize..20) {
        let data: Vec<_> = (0..count).map(|i| article(i, "Moving", ArticleStatus::Draft)).collect();
        let page = query_page(&data, &FilterState::new(), requested, size, &SortSpec::none());

        prop_assert!(page.page_number >= 1);
        prop_assert!(page.page_number <= page.total_pages.max(1));
        prop_assert!(page.items.len() <= page.page_size);
        prop_assert_eq!(page.total_count, count);
        if count > 0 {
            prop_assert!(!page.items.is_empty());
        }
    }

    #[test]
    fn extra_category_never_widens(term in "[a-z ]{0,4}", category in prop::sample::select(vec!["Moving", "Finance", "Real Estate", "All"])) {
        let data = sample();
        let base = FilterState::new().with_term(term);
        let narrowed = base.clone().with_category("category", category);
        prop_assert!(filtered_ids(&data, &narrowed).is_subset(&filtered_ids(&data, &base)));
    }

    #[test]
    fn select_all_twice_on_an_unselected_page_is_identity(
        preselected in prop::collection::btree_set("a[0-9]", 0..6),
        page_start in 0usize..8,
    ) {
        let page: Vec<String> = (page_start..page_start + 3).map(|i| format!("a{i}")).collect();
        let mut selection = Selection::new();
        for id in preselected.iter().filter(|id| !page.contains(id)) {
            selection.toggle(id);
        }
        let before = selection.clone();

        selection.toggle_all_on_page(page.iter().map(String::as_str));
        selection.toggle_all_on_page(page.iter().map(String::as_str));

        prop_assert_eq!(selection, before);
    }

    #[test]
    fn select_all_twice_clears_the_page_and_keeps_the_rest(
        preselected in prop::collection::btree_set("a[0-9]", 0..6),
        page_start in 0usize..8,
    ) {
        let page: Vec<String> = (page_start..page_start + 3).map(|i| format!("a{i}")).collect();
        let mut selection = Selection::new();
        for id in &preselected {
            selection.toggle(id);
        }
        // Start from a state where the page is not fully selected.
        if selection.all_selected(page.iter().map(String::as_str)) {
            selection.toggle(&page[0]);
        }
        let before = selection.clone();

        selection.toggle_all_on_page(page.iter().map(String::as_str));
        prop_assert!(selection.all_selected(page.iter().map(String::as_str)));
        selection.toggle_all_on_page(page.iter().map(String::as_str));

        let outside: Vec<&str> = before.iter().filter(|id| !page.iter().any(|p| p == id)).collect();
        prop_assert_eq!(selection.iter().filter(|id| !page.iter().any(|p| p == id)).collect::<Vec<_>>(), outside);
        prop_assert!(page.iter().all(|id| !selection.contains(id)));
    }
}
