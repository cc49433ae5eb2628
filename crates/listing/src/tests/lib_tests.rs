use super::*;
use shared::domain::{ExcursionId, TagAssociations, TagId, Taxonomy, PRICE_PLACEHOLDER};

fn item(id: i64, categories: &[i64], activities: &[i64]) -> ContentItem {
    ContentItem {
        id: ExcursionId(id),
        slug: format!("excursion-{id}"),
        title: format!("Excursion {id}"),
        excerpt: String::new(),
        body: String::new(),
        price: None,
        tagline: None,
        duration: None,
        featured_image: None,
        gallery: Vec::new(),
        tags: TagAssociations::new()
            .with(Taxonomy::Category, categories.iter().copied().map(TagId))
            .with(Taxonomy::Activity, activities.iter().copied().map(TagId)),
        embedded_tags: Vec::new(),
    }
}

fn listing(id: i64, price: &str) -> PriceListing {
    PriceListing {
        id: ExcursionId(id),
        slug: format!("excursion-{id}"),
        title: format!("Excursion {id}"),
        price: price.to_string(),
        duration: String::new(),
    }
}

fn tag(id: i64, taxonomy: Taxonomy, name: &str) -> Tag {
    Tag {
        id: TagId(id),
        taxonomy,
        slug: name.to_lowercase(),
        name: name.to_string(),
        description: None,
        icon: None,
        count: 0,
    }
}

fn ids(items: &[&ContentItem]) -> Vec<i64> {
    items.iter().map(|item| item.id.0).collect()
}

fn listing_ids(listings: &[PriceListing]) -> Vec<i64> {
    listings.iter().map(|listing| listing.id.0).collect()
}

fn sample_items() -> Vec<ContentItem> {
    vec![
        item(1, &[5], &[]),
        item(2, &[6], &[20]),
        item(3, &[5, 6], &[21]),
        item(4, &[], &[]),
        item(5, &[], &[5, 20]),
        item(6, &[7], &[21]),
    ]
}

#[test]
fn filter_keeps_items_with_tag_in_original_order() {
    let items = vec![item(1, &[5], &[]), item(2, &[6], &[]), item(3, &[5, 6], &[])];

    let filtered = filter_by_tag(&items, FilterSelection::Tag(TagId(5)));

    assert_eq!(ids(&filtered), vec![1, 3]);
}

#[test]
fn filtered_view_is_exact_partition_for_every_known_tag() {
    let items = sample_items();

    for tag_id in [5, 6, 7, 20, 21] {
        let filtered = filter_by_tag(&items, FilterSelection::Tag(TagId(tag_id)));
        let kept = ids(&filtered);

        for candidate in &items {
            let has_tag = candidate.tags.contains(TagId(tag_id));
            assert_eq!(
                kept.contains(&candidate.id.0),
                has_tag,
                "item {} with tag {tag_id}",
                candidate.id.0
            );
        }
        let mut sorted = kept.clone();
        sorted.sort_unstable();
        assert_eq!(kept, sorted, "relative order preserved for tag {tag_id}");
    }
}

#[test]
fn filter_matches_across_taxonomies() {
    let items = sample_items();

    let filtered = filter_by_tag(&items, FilterSelection::Tag(TagId(20)));
    assert_eq!(ids(&filtered), vec![2, 5]);

    // Tag 5 is a category on some items and an activity on item 5.
    let filtered = filter_by_tag(&items, FilterSelection::Tag(TagId(5)));
    assert_eq!(ids(&filtered), vec![1, 3, 5]);
}

#[test]
fn all_selection_returns_every_item_unchanged() {
    let items = sample_items();

    let filtered = filter_by_tag(&items, FilterSelection::All);

    assert_eq!(filtered.len(), items.len());
    for (kept, original) in filtered.iter().zip(&items) {
        assert!(std::ptr::eq(*kept, original));
    }
}

#[test]
fn unknown_tag_yields_empty_result() {
    let items = sample_items();

    assert!(filter_by_tag(&items, FilterSelection::Tag(TagId(999))).is_empty());
    assert!(filter_by_tag(&[], FilterSelection::Tag(TagId(5))).is_empty());
}

#[test]
fn items_without_tags_only_appear_for_all() {
    let items = vec![item(1, &[], &[])];

    assert!(filter_by_tag(&items, FilterSelection::Tag(TagId(5))).is_empty());
    assert_eq!(ids(&filter_by_tag(&items, FilterSelection::All)), vec![1]);
}

#[test]
fn active_filter_name_prefers_categories_then_activities() {
    let categories = vec![tag(5, Taxonomy::Category, "Full Day")];
    let activities = vec![
        tag(5, Taxonomy::Activity, "Shadowed"),
        tag(20, Taxonomy::Activity, "Rappel"),
    ];

    assert_eq!(
        active_filter_name(FilterSelection::All, &categories, &activities),
        ALL_FILTER_LABEL
    );
    assert_eq!(
        active_filter_name(FilterSelection::Tag(TagId(5)), &categories, &activities),
        "Full Day"
    );
    assert_eq!(
        active_filter_name(FilterSelection::Tag(TagId(20)), &categories, &activities),
        "Rappel"
    );
    assert_eq!(
        active_filter_name(FilterSelection::Tag(TagId(77)), &categories, &activities),
        ALL_FILTER_LABEL
    );
}

#[test]
fn parse_price_reads_numeric_prefix_after_stripping() {
    assert_eq!(parse_price("$50"), Some(50.0));
    assert_eq!(parse_price("USD 1,250.50"), Some(1250.5));
    assert_eq!(parse_price("50-60"), Some(50.0));
    assert_eq!(parse_price("-15"), Some(-15.0));
    assert_eq!(parse_price(".5"), Some(0.5));
    assert_eq!(parse_price("1.2.3"), Some(1.2));
    assert_eq!(parse_price(PRICE_PLACEHOLDER), None);
    assert_eq!(parse_price(""), None);
    assert_eq!(parse_price("-"), None);
    assert_eq!(parse_price("."), None);
    assert_eq!(parse_price("--5"), None);
}

#[test]
fn ascending_sort_puts_unparseable_prices_last() {
    let items = vec![
        listing(1, "$50"),
        listing(2, PRICE_PLACEHOLDER),
        listing(3, "$20"),
    ];

    let sorted = sort_by_price(&items, SortDirection::Ascending);

    assert_eq!(listing_ids(&sorted), vec![3, 1, 2]);
}

#[test]
fn descending_sort_still_puts_unparseable_prices_last() {
    let items = vec![
        listing(1, "Consultar"),
        listing(2, "$50"),
        listing(3, "A convenir"),
        listing(4, "$20"),
        listing(5, "$120"),
    ];

    let sorted = sort_by_price(&items, SortDirection::Descending);

    assert_eq!(listing_ids(&sorted), vec![5, 2, 4, 1, 3]);
}

#[test]
fn sort_is_a_permutation_with_numeric_prefix_before_unparseable() {
    let items = vec![
        listing(1, "n/a"),
        listing(2, "89"),
        listing(3, "$1,000"),
        listing(4, "Consultar"),
        listing(5, "0"),
        listing(6, "-10"),
    ];

    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        let sorted = sort_by_price(&items, direction);

        let mut got = listing_ids(&sorted);
        got.sort_unstable();
        assert_eq!(got, vec![1, 2, 3, 4, 5, 6]);

        let first_unparseable = sorted
            .iter()
            .position(|listing| parse_price(&listing.price).is_none())
            .expect("has unparseable");
        assert!(sorted[first_unparseable..]
            .iter()
            .all(|listing| parse_price(&listing.price).is_none()));
    }
}

#[test]
fn ascending_sort_is_idempotent() {
    let items = vec![
        listing(1, "$30"),
        listing(2, "Consultar"),
        listing(3, "$10"),
        listing(4, "$30"),
    ];

    let once = sort_by_price(&items, SortDirection::Ascending);
    let twice = sort_by_price(&once, SortDirection::Ascending);

    assert_eq!(once, twice);
}

#[test]
fn equal_prices_keep_input_order() {
    let items = vec![
        listing(1, "$40"),
        listing(2, "$10"),
        listing(3, "40.00"),
        listing(4, "Consultar"),
        listing(5, "USD 40"),
        listing(6, "Por definir"),
    ];

    let ascending = sort_by_price(&items, SortDirection::Ascending);
    assert_eq!(listing_ids(&ascending), vec![2, 1, 3, 5, 4, 6]);

    let descending = sort_by_price(&items, SortDirection::Descending);
    assert_eq!(listing_ids(&descending), vec![1, 3, 5, 2, 4, 6]);
}

#[test]
fn toggle_starts_ascending_then_alternates() {
    let mut items = vec![listing(1, "$50"), listing(2, "$20"), listing(3, "$80")];
    let mut sort = PriceSort::new();
    assert_eq!(sort.direction(), None);
    assert_eq!(sort.next_direction(), SortDirection::Ascending);

    assert_eq!(sort.toggle(&mut items), SortDirection::Ascending);
    assert_eq!(listing_ids(&items), vec![2, 1, 3]);

    assert_eq!(sort.toggle(&mut items), SortDirection::Descending);
    assert_eq!(listing_ids(&items), vec![3, 1, 2]);

    assert_eq!(sort.toggle(&mut items), SortDirection::Ascending);
    assert_eq!(sort.direction(), Some(SortDirection::Ascending));
    assert_eq!(listing_ids(&items), vec![2, 1, 3]);
}

#[test]
fn explicit_direction_is_recorded_for_next_toggle() {
    let mut items = vec![listing(1, "$50"), listing(2, "$20")];
    let mut sort = PriceSort::new();

    sort.sort(&mut items, Some(SortDirection::Descending));
    assert_eq!(listing_ids(&items), vec![1, 2]);
    assert_eq!(sort.next_direction(), SortDirection::Ascending);

    sort.sort(&mut items, None);
    assert_eq!(listing_ids(&items), vec![2, 1]);
}
