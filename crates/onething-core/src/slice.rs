//! Pagination state derived from a backend slice
//!
//! The backend never reports a total page count, so everything here is
//! computed from the current page index and the `last` flag alone. A
//! [`SliceView`] over `None` models a list that has not loaded yet and
//! answers every question with a neutral default.

use crate::types::SliceEnvelope;
use serde::Serialize;

/// Page controls to render for one slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    /// Page indices to render as clickable controls, ascending
    pub page_numbers: Vec<u32>,
    /// Pages known so far: current + 1, or current + 2 while more remain
    pub total_pages: u32,
    /// Envelope's `first` flag
    pub is_first_page: bool,
    /// Envelope's `last` flag
    pub is_last_page: bool,
    /// Always false; reserved for a fixed window with an ellipsis
    pub show_ellipsis_after: bool,
    /// Always false; reserved for a fixed window with a jump-to-last control
    pub show_last_page: bool,
}

/// Read-only view over an optional slice envelope
#[derive(Debug)]
pub struct SliceView<'a, T> {
    envelope: Option<&'a SliceEnvelope<T>>,
}

impl<T> Clone for SliceView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SliceView<'_, T> {}

impl<'a, T> SliceView<'a, T> {
    /// Wrap an envelope that may not have loaded yet
    #[must_use]
    pub const fn new(envelope: Option<&'a SliceEnvelope<T>>) -> Self {
        Self { envelope }
    }

    /// Present and not empty
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.envelope.is_some_and(|e| !e.empty)
    }

    /// Items on this page, empty while loading
    #[must_use]
    pub fn content(&self) -> &'a [T] {
        self.envelope.map(|e| e.content.as_slice()).unwrap_or(&[])
    }

    /// Zero-based page index
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.envelope.map_or(0, |e| e.pageable.page_number)
    }

    /// Items per page
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.envelope.map_or(0, |e| e.pageable.page_size)
    }

    /// Envelope's `first` flag
    #[must_use]
    pub fn is_first_page(&self) -> bool {
        self.envelope.is_some_and(|e| e.first)
    }

    /// Envelope's `last` flag
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.envelope.is_some_and(|e| e.last)
    }

    /// Negation of [`Self::is_first_page`]; true while loading
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        !self.is_first_page()
    }

    /// Negation of [`Self::is_last_page`]; true while loading
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        !self.is_last_page()
    }

    /// Envelope's `empty` flag
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.envelope.is_some_and(|e| e.empty)
    }

    /// No envelope yet
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.envelope.is_none()
    }

    /// Controls are hidden on the last page, even when it is not the first.
    #[must_use]
    pub fn should_show_pagination(&self) -> bool {
        self.is_valid() && self.page_size() > 0 && !self.is_last_page()
    }

    /// Every page up to the current one, plus the next while one exists
    ///
    /// Allocates one entry per page up to `current_page`, so memory grows
    /// linearly with the backend-reported page index (about 16 GiB at
    /// `u32::MAX`). Callers rendering untrusted envelopes should bound
    /// `current_page` first.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<u32> {
        if !self.should_show_pagination() {
            return Vec::new();
        }

        let current = self.current_page();
        let mut pages: Vec<u32> = (0..=current).collect();
        if !self.is_last_page() {
            pages.push(current.saturating_add(1));
        }
        pages
    }

    /// Assemble the full control state for rendering
    #[must_use]
    pub fn pagination_state(&self) -> PaginationState {
        let total_pages = match self.envelope {
            None => 1,
            Some(_) if self.is_last_page() => self.current_page().saturating_add(1),
            Some(_) => self.current_page().saturating_add(2),
        };

        PaginationState {
            page_numbers: self.page_numbers(),
            total_pages,
            is_first_page: self.is_first_page(),
            is_last_page: self.is_last_page(),
            show_ellipsis_after: false,
            show_last_page: false,
        }
    }

    /// 1-based row number across all pages, assuming a constant page size
    #[must_use]
    pub fn item_number(&self, index_in_page: usize) -> u64 {
        let index = u64::try_from(index_in_page).unwrap_or(u64::MAX);
        u64::from(self.current_page())
            .saturating_mul(u64::from(self.page_size()))
            .saturating_add(index)
            .saturating_add(1)
    }

    /// Items paired with their 1-based row numbers
    pub fn numbered(self) -> impl Iterator<Item = (u64, &'a T)> {
        self.content()
            .iter()
            .enumerate()
            .map(move |(index, item)| (self.item_number(index), item))
    }
}

impl<'a, T> From<&'a SliceEnvelope<T>> for SliceView<'a, T> {
    fn from(envelope: &'a SliceEnvelope<T>) -> Self {
        Self::new(Some(envelope))
    }
}

impl<'a, T> From<Option<&'a SliceEnvelope<T>>> for SliceView<'a, T> {
    fn from(envelope: Option<&'a SliceEnvelope<T>>) -> Self {
        Self::new(envelope)
    }
}

impl<T> SliceEnvelope<T> {
    /// Borrow this envelope as a [`SliceView`]
    #[must_use]
    pub const fn view(&self) -> SliceView<'_, T> {
        SliceView::new(Some(self))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn page(page_number: u32, page_size: u32, len: usize, last: bool) -> SliceEnvelope<u32> {
        let content = (0..len).map(|i| u32::try_from(i).unwrap()).collect();
        SliceEnvelope::new(content, page_number, page_size, last)
    }

    #[test]
    fn test_absent_envelope_defaults() {
        let view: SliceView<'_, u32> = SliceView::new(None);

        assert!(!view.is_valid());
        assert!(view.content().is_empty());
        assert_eq!(view.current_page(), 0);
        assert_eq!(view.page_size(), 0);
        assert!(!view.is_first_page());
        assert!(!view.is_last_page());
        assert!(view.has_previous_page());
        assert!(view.has_next_page());
        assert!(!view.should_show_pagination());
        assert!(view.page_numbers().is_empty());
        assert!(view.is_loading());
        assert!(!view.is_empty());
    }

    #[test]
    fn test_absent_envelope_pagination_state() {
        let view: SliceView<'_, u32> = SliceView::new(None);

        assert_eq!(
            view.pagination_state(),
            PaginationState {
                page_numbers: Vec::new(),
                total_pages: 1,
                is_first_page: false,
                is_last_page: false,
                show_ellipsis_after: false,
                show_last_page: false,
            }
        );
    }

    #[rstest]
    #[case::first_and_more(false)]
    #[case::first_and_last(true)]
    fn test_empty_envelope_is_invalid(#[case] last: bool) {
        let envelope = page(0, 10, 0, last);
        let view = envelope.view();

        assert!(!view.is_valid());
        assert!(view.is_empty());
        assert!(!view.should_show_pagination());
        assert!(view.page_numbers().is_empty());
    }

    #[test]
    fn test_first_page_with_more() {
        let envelope = page(0, 10, 10, false);
        let view = envelope.view();
        let state = view.pagination_state();

        assert!(view.should_show_pagination());
        assert_eq!(view.page_numbers(), vec![0, 1]);
        assert_eq!(state.total_pages, 2);
        assert!(state.is_first_page);
        assert!(!state.is_last_page);
        assert!(!view.has_previous_page());
        assert!(view.has_next_page());
    }

    #[test]
    fn test_last_page_hides_pagination() {
        let envelope = page(3, 10, 4, true);
        let view = envelope.view();
        let state = view.pagination_state();

        assert!(!view.should_show_pagination());
        assert!(view.page_numbers().is_empty());
        assert_eq!(state.total_pages, 4);
        assert!(state.is_last_page);
        assert!(!state.is_first_page);
    }

    #[test]
    fn test_middle_page_window_grows_from_zero() {
        let envelope = page(3, 10, 10, false);

        assert_eq!(envelope.view().page_numbers(), vec![0, 1, 2, 3, 4]);
        assert_eq!(envelope.view().pagination_state().total_pages, 5);
    }

    #[test]
    fn test_zero_page_size_hides_pagination() {
        let envelope = page(0, 0, 3, false);

        assert!(envelope.view().is_valid());
        assert!(!envelope.view().should_show_pagination());
    }

    #[rstest]
    #[case(2, 10, 0, 21)]
    #[case(2, 10, 9, 30)]
    #[case(0, 20, 0, 1)]
    #[case(0, 0, 4, 5)]
    fn test_item_number(
        #[case] page_number: u32,
        #[case] page_size: u32,
        #[case] index: usize,
        #[case] expected: u64,
    ) {
        let envelope = page(page_number, page_size, 10, false);
        assert_eq!(envelope.view().item_number(index), expected);
    }

    #[test]
    fn test_item_number_has_headroom() {
        let envelope = page(u32::MAX, u32::MAX, 1, false);
        let expected = u64::from(u32::MAX) * u64::from(u32::MAX) + 1;

        assert_eq!(envelope.view().item_number(0), expected);
    }

    #[test]
    fn test_item_number_while_loading() {
        let view: SliceView<'_, u32> = SliceView::new(None);
        assert_eq!(view.item_number(3), 4);
    }

    #[test]
    fn test_numbered_rows() {
        let envelope = SliceEnvelope::new(vec!["a", "b"], 1, 2, true);
        let rows: Vec<_> = envelope.view().numbered().collect();

        assert_eq!(rows, vec![(3, &"a"), (4, &"b")]);
    }

    #[test]
    fn test_ellipsis_fields_never_set() {
        for current in 0..50 {
            let state = page(current, 10, 10, false).view().pagination_state();
            assert!(!state.show_ellipsis_after);
            assert!(!state.show_last_page);
        }
    }

    #[test]
    fn test_state_serializes() {
        let state = page(0, 10, 10, false).view().pagination_state();
        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value["page_numbers"], serde_json::json!([0, 1]));
        assert_eq!(value["total_pages"], 2);
    }

    proptest! {
        #[test]
        fn test_derivation_is_idempotent(
            current in 0_u32..500,
            size in 0_u32..100,
            len in 0_usize..20,
            last in any::<bool>(),
        ) {
            let envelope = page(current, size, len, last);
            let view = envelope.view();

            prop_assert_eq!(view.pagination_state(), view.pagination_state());
            prop_assert_eq!(view.page_numbers(), view.page_numbers());
            prop_assert_eq!(view.should_show_pagination(), view.should_show_pagination());
            prop_assert_eq!(view.item_number(len), view.item_number(len));
        }

        #[test]
        fn test_page_numbers_shape(current in 0_u32..500, size in 1_u32..100) {
            let envelope = page(current, size, 1, false);
            let pages = envelope.view().page_numbers();
            let expected: Vec<u32> = (0..=current + 1).collect();

            prop_assert_eq!(pages, expected);
        }

        #[test]
        fn test_total_pages_estimate(current in 0_u32..500, last in any::<bool>()) {
            let state = page(current, 10, 1, last).view().pagination_state();
            let expected = if last { current + 1 } else { current + 2 };

            prop_assert_eq!(state.total_pages, expected);
        }
    }
}
