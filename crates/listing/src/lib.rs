//! Filtering and price ordering for excursion listings.
//!
//! Everything here works on data that has already been fetched and
//! validated; no function performs I/O or fails.

use std::cmp::Ordering;

use shared::domain::{ContentItem, FilterSelection, PriceListing, SortDirection, Tag};
use tracing::debug;

/// Label shown for the "all" filter.
pub const ALL_FILTER_LABEL: &str = "Todas";

/// Items carrying the selected tag in any taxonomy, in their original order.
///
/// `FilterSelection::All` returns every item. An unknown tag id, or items
/// without tag data, simply produce no matches.
pub fn filter_by_tag(items: &[ContentItem], selection: FilterSelection) -> Vec<&ContentItem> {
    let filtered: Vec<&ContentItem> = match selection {
        FilterSelection::All => items.iter().collect(),
        FilterSelection::Tag(tag_id) => items
            .iter()
            .filter(|item| item.tags.contains(tag_id))
            .collect(),
    };
    debug!(
        %selection,
        total = items.len(),
        matched = filtered.len(),
        "filtered listing"
    );
    filtered
}

/// Display name of the active filter. Categories are searched before
/// activities; an id found in neither falls back to the "all" label.
pub fn active_filter_name<'a>(
    selection: FilterSelection,
    categories: &'a [Tag],
    activities: &'a [Tag],
) -> &'a str {
    let Some(tag_id) = selection.tag() else {
        return ALL_FILTER_LABEL;
    };
    categories
        .iter()
        .chain(activities)
        .find(|tag| tag.id == tag_id)
        .map_or(ALL_FILTER_LABEL, |tag| tag.name.as_str())
}

/// Reads a price the way a lenient float parser would after stripping
/// everything except digits, `.` and `-`: "$1,250.50 MXN" is 1250.5,
/// "50-60" is 50, and "Consultar" has no value.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let bytes = cleaned.as_bytes();

    let mut end = usize::from(bytes.first() == Some(&b'-'));
    let mut digits = 0;
    while bytes.get(end).is_some_and(|b| b.is_ascii_digit()) {
        end += 1;
        digits += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(|b| b.is_ascii_digit()) {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }
    cleaned[..end].parse().ok()
}

/// Orders two parsed prices. Unparseable prices compare greater than every
/// number in both directions, so they always end up last.
fn compare_prices(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => a.total_cmp(&b),
            SortDirection::Descending => b.total_cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts in place by parsed price. The sort is stable: equal prices, and
/// unparseable prices among themselves, keep their relative order.
pub fn sort_prices_in_place(items: &mut [PriceListing], direction: SortDirection) {
    let mut keyed: Vec<(Option<f64>, PriceListing)> = items
        .iter()
        .map(|listing| (parse_price(&listing.price), listing.clone()))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_prices(*a, *b, direction));
    for (slot, (_, listing)) in items.iter_mut().zip(keyed) {
        *slot = listing;
    }
}

/// Returns a sorted copy of `items`; see [`sort_prices_in_place`].
pub fn sort_by_price(items: &[PriceListing], direction: SortDirection) -> Vec<PriceListing> {
    let mut sorted = items.to_vec();
    sort_prices_in_place(&mut sorted, direction);
    sorted
}

/// Sort state of the price table.
///
/// Starts unsorted. Toggling sorts ascending first and then alternates; once
/// sorted there is no way back to the unsorted order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceSort {
    direction: Option<SortDirection>,
}

impl PriceSort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }

    /// Direction the next toggle will apply.
    pub fn next_direction(&self) -> SortDirection {
        self.direction
            .map_or(SortDirection::Ascending, SortDirection::flipped)
    }

    /// Flips the direction and re-sorts the current sequence.
    pub fn toggle(&mut self, items: &mut [PriceListing]) -> SortDirection {
        self.sort(items, None)
    }

    /// Sorts with an explicit direction, or toggles when `direction` is `None`.
    pub fn sort(
        &mut self,
        items: &mut [PriceListing],
        direction: Option<SortDirection>,
    ) -> SortDirection {
        let direction = direction.unwrap_or_else(|| self.next_direction());
        sort_prices_in_place(items, direction);
        debug!(?direction, listings = items.len(), "sorted price table");
        self.direction = Some(direction);
        direction
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
