//! Table-state controller for the user dashboard.
//!
//! One struct owns the working set and every piece of table-interaction
//! state: filters, selection, page, and the in-progress edit draft. After
//! each mutation the visible view is re-derived (filter, sort by id, clamp
//! the page, prune the selection), so the presentation layer only ever reads
//! accessors and calls operations; it holds no table state of its own.

use std::collections::BTreeSet;

use crate::model::UserRecord;

/// Number of rows on one page. Fixed for the session lifetime.
pub const PAGE_SIZE: usize = 10;

/// In-progress edits for a single row.
///
/// Seeded from the record when editing begins and applied atomically by
/// [`UserBoard::commit_edit`]. Keystrokes land here, never in hidden widget
/// state, so the draft survives re-renders and can be discarded cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    /// Id of the record being edited.
    pub id: u64,
    /// Edited name value.
    pub name: String,
    /// Edited email value.
    pub email: String,
    /// Edited role value.
    pub role: String,
}

impl EditDraft {
    fn from_record(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

/// The table-state controller.
///
/// # Example
///
/// ```
/// use userboard_lib::board::UserBoard;
/// use userboard_lib::model::UserRecord;
///
/// let mut board = UserBoard::new();
/// board.load(vec![
///     UserRecord::new(2, "Bob", "b@x.com", "admin"),
///     UserRecord::new(1, "Alice", "a@x.com", "member"),
/// ]);
///
/// board.set_name_filter("ali");
/// let visible: Vec<_> = board.filtered_users().map(|u| u.name.as_str()).collect();
/// assert_eq!(visible, ["Alice"]);
/// ```
///
/// # Invariants
///
/// Restored by derivation after every mutation:
/// - the filtered view is sorted ascending by id;
/// - `1 <= current_page <= max(1, ceil(filtered / PAGE_SIZE))`;
/// - the selection only holds ids passing the active filter (selection is
///   filter-scoped, so a "all rows selected" check can never disagree with
///   what is on screen);
/// - a draft whose record was deleted is dropped.
#[derive(Debug, Clone)]
pub struct UserBoard {
    /// The full working set. Populated by [`load`](Self::load), shrunk only
    /// by the delete operations.
    users: Vec<UserRecord>,
    /// Indices into `users` passing the active filter, ascending by id.
    filtered: Vec<usize>,
    /// Ids of checked rows.
    selected: BTreeSet<u64>,
    /// 1-indexed page number.
    current_page: usize,
    name_filter: String,
    email_filter: String,
    /// Lowercase role names. Empty set means no role restriction.
    role_filters: BTreeSet<String>,
    /// At most one row is editable at a time.
    draft: Option<EditDraft>,
}

impl Default for UserBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl UserBoard {
    /// Creates an empty board: no users, no filters, page 1, nothing
    /// selected, nothing being edited.
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            filtered: Vec::new(),
            selected: BTreeSet::new(),
            current_page: 1,
            name_filter: String::new(),
            email_filter: String::new(),
            role_filters: BTreeSet::new(),
            draft: None,
        }
    }

    /// Replaces the working set with a freshly fetched batch.
    ///
    /// Resets the page to 1 and clears selection and draft; the filters are
    /// left untouched.
    pub fn load(&mut self, users: Vec<UserRecord>) {
        self.users = users;
        self.current_page = 1;
        self.selected.clear();
        self.draft = None;
        self.derive();
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Replaces the name filter (case-insensitive substring match).
    pub fn set_name_filter(&mut self, filter: impl Into<String>) {
        self.name_filter = filter.into();
        self.derive();
    }

    /// Replaces the email filter (case-insensitive substring match).
    pub fn set_email_filter(&mut self, filter: impl Into<String>) {
        self.email_filter = filter.into();
        self.derive();
    }

    /// Toggles a role in the role filter set.
    ///
    /// An empty set places no restriction on roles.
    pub fn toggle_role_filter(&mut self, role: &str) {
        let role = role.to_lowercase();
        if !self.role_filters.remove(&role) {
            self.role_filters.insert(role);
        }
        self.derive();
    }

    /// Resets both text filters and the role set, and returns to page 1.
    pub fn clear_filters(&mut self) {
        self.name_filter.clear();
        self.email_filter.clear();
        self.role_filters.clear();
        self.current_page = 1;
        self.derive();
    }

    /// Returns the current name filter.
    pub fn name_filter(&self) -> &str {
        &self.name_filter
    }

    /// Returns the current email filter.
    pub fn email_filter(&self) -> &str {
        &self.email_filter
    }

    /// Returns `true` if the given role is in the role filter set.
    pub fn role_filter_active(&self, role: &str) -> bool {
        self.role_filters.contains(&role.to_lowercase())
    }

    // =========================================================================
    // Derived view
    // =========================================================================

    /// Recomputes the filtered view and restores the state invariants.
    ///
    /// Runs after every mutation: filter, sort ascending by id (ids are
    /// unique, so the order is total), clamp the page into range, prune the
    /// selection to visible ids, and drop a draft whose record is gone.
    fn derive(&mut self) {
        let name_needle = self.name_filter.to_lowercase();
        let email_needle = self.email_filter.to_lowercase();

        let mut filtered: Vec<usize> = self
            .users
            .iter()
            .enumerate()
            .filter(|(_, user)| {
                user.name.to_lowercase().contains(&name_needle)
                    && user.email.to_lowercase().contains(&email_needle)
                    && (self.role_filters.is_empty()
                        || self.role_filters.contains(&user.role.to_lowercase()))
            })
            .map(|(index, _)| index)
            .collect();
        filtered.sort_by_key(|&index| self.users[index].id);
        self.filtered = filtered;

        self.current_page = self.current_page.clamp(1, self.page_count());

        let visible: BTreeSet<u64> = self.filtered.iter().map(|&i| self.users[i].id).collect();
        self.selected.retain(|id| visible.contains(id));

        let orphaned = self
            .draft
            .as_ref()
            .is_some_and(|draft| !self.users.iter().any(|user| user.id == draft.id));
        if orphaned {
            self.draft = None;
        }
    }

    /// Returns the full working set in load order.
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// Returns the filtered rows, ascending by id.
    pub fn filtered_users(&self) -> impl Iterator<Item = &UserRecord> {
        self.filtered.iter().map(|&index| &self.users[index])
    }

    /// Returns the number of rows passing the active filter.
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Returns the rows on the current page, ascending by id.
    pub fn page_users(&self) -> impl Iterator<Item = &UserRecord> {
        let start = (self.current_page - 1) * PAGE_SIZE;
        self.filtered
            .iter()
            .skip(start)
            .take(PAGE_SIZE)
            .map(|&index| &self.users[index])
    }

    /// Returns the number of pages. Always at least 1, even for an empty
    /// filtered set.
    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// Returns the current 1-indexed page number.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Moves to the given 1-indexed page. Out-of-range values are clamped.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
        self.derive();
    }

    /// Moves to the first page.
    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    /// Moves one page back. No-op on the first page.
    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    /// Moves one page forward. No-op on the last page.
    pub fn next_page(&mut self) {
        self.set_page(self.current_page + 1);
    }

    /// Moves to the last page.
    pub fn last_page(&mut self) {
        self.set_page(self.page_count());
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns `true` if the given row is checked.
    pub fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }

    /// Returns the number of checked rows.
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if every filtered row is checked.
    ///
    /// Always `false` for an empty filtered set. The selection is pruned to
    /// the filtered set on derivation, so a count comparison is a set
    /// comparison here.
    pub fn all_selected(&self) -> bool {
        !self.filtered.is_empty() && self.selected.len() == self.filtered.len()
    }

    /// Checks every filtered row, or unchecks everything if the whole
    /// filtered set is already checked.
    ///
    /// Select-all spans the full filtered result, not only the visible page.
    /// No-op when the filtered set is empty.
    pub fn toggle_select_all(&mut self) {
        if self.all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.filtered.iter().map(|&i| self.users[i].id).collect();
        }
        self.derive();
    }

    /// Checks or unchecks a single row. Self-inverse.
    pub fn toggle_select_row(&mut self, id: u64) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.derive();
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Removes every checked record and clears the selection.
    ///
    /// Returns the number of records removed. Confirmation is the
    /// presentation layer's responsibility.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.users.len();
        self.users.retain(|user| !self.selected.contains(&user.id));
        self.selected.clear();
        self.derive();
        before - self.users.len()
    }

    /// Removes a single record and unchecks that id only; other checked
    /// rows stay checked.
    ///
    /// Returns `true` if a record was removed. Unknown ids are a no-op.
    pub fn delete_one(&mut self, id: u64) -> bool {
        let before = self.users.len();
        self.users.retain(|user| user.id != id);
        self.selected.remove(&id);
        self.derive();
        self.users.len() < before
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Returns the id of the row being edited, if any.
    pub fn editing_id(&self) -> Option<u64> {
        self.draft.as_ref().map(|draft| draft.id)
    }

    /// Returns the in-progress draft, if any.
    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    /// Returns the in-progress draft for mutation; the presentation layer
    /// writes keystrokes here.
    pub fn draft_mut(&mut self) -> Option<&mut EditDraft> {
        self.draft.as_mut()
    }

    /// Starts editing a row, seeding the draft from its current fields.
    ///
    /// Calling it on the row already being edited cancels the edit. Calling
    /// it on another row replaces the draft, discarding unsaved edits.
    /// Unknown ids are a no-op.
    pub fn begin_edit(&mut self, id: u64) {
        if self.editing_id() == Some(id) {
            self.draft = None;
        } else if let Some(user) = self.users.iter().find(|user| user.id == id) {
            self.draft = Some(EditDraft::from_record(user));
        }
        self.derive();
    }

    /// Writes the draft's three fields onto its record and clears the draft.
    ///
    /// The write is atomic: all three fields come from the draft in one
    /// step. Field values are not validated; empty strings are accepted.
    /// No-op if nothing is being edited or the record vanished.
    pub fn commit_edit(&mut self) {
        if let Some(draft) = self.draft.take() {
            if let Some(user) = self.users.iter_mut().find(|user| user.id == draft.id) {
                user.name = draft.name;
                user.email = draft.email;
                user.role = draft.role;
            }
        }
        self.derive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<UserRecord> {
        vec![
            UserRecord::new(3, "Carol", "c@x.com", "member"),
            UserRecord::new(1, "Alice", "a@x.com", "admin"),
            UserRecord::new(2, "Bob", "b@x.com", "admin"),
        ]
    }

    fn board() -> UserBoard {
        let mut board = UserBoard::new();
        board.load(sample());
        board
    }

    fn big_board(count: u64) -> UserBoard {
        let mut board = UserBoard::new();
        board.load(
            (1..=count)
                .map(|id| UserRecord::new(id, format!("User {id}"), format!("u{id}@x.com"), "member"))
                .collect(),
        );
        board
    }

    fn visible_ids(board: &UserBoard) -> Vec<u64> {
        board.filtered_users().map(|user| user.id).collect()
    }

    #[test]
    fn test_load_sorts_ascending_by_id() {
        let board = board();
        assert_eq!(visible_ids(&board), [1, 2, 3]);
    }

    #[test]
    fn test_load_resets_page_selection_and_draft_but_not_filters() {
        let mut board = big_board(15);
        board.set_name_filter("user 1");
        board.toggle_select_row(1);
        board.begin_edit(1);

        board.load(sample());
        assert_eq!(board.current_page(), 1);
        assert_eq!(board.selected_count(), 0);
        assert_eq!(board.editing_id(), None);
        // The filter survives the reload; only Alice matches "user 1"... nobody does.
        assert_eq!(board.name_filter(), "user 1");
        assert_eq!(board.filtered_len(), 0);
    }

    #[test]
    fn test_text_filters_are_case_insensitive_substrings() {
        let mut board = board();
        board.set_name_filter("ALI");
        assert_eq!(visible_ids(&board), [1]);

        board.set_name_filter("");
        board.set_email_filter("B@X");
        assert_eq!(visible_ids(&board), [2]);
    }

    #[test]
    fn test_role_filter_narrows_to_set_members() {
        let mut board = board();
        board.toggle_role_filter("admin");
        assert_eq!(visible_ids(&board), [1, 2]);

        board.toggle_select_all();
        assert!(board.is_selected(1));
        assert!(board.is_selected(2));
        assert_eq!(board.selected_count(), 2);
    }

    #[test]
    fn test_role_filter_toggles_off_again() {
        let mut board = board();
        board.toggle_role_filter("admin");
        board.toggle_role_filter("admin");
        assert_eq!(visible_ids(&board), [1, 2, 3]);
    }

    #[test]
    fn test_empty_role_set_means_no_restriction() {
        let mut board = board();
        board.toggle_role_filter("admin");
        board.toggle_role_filter("member");
        assert_eq!(visible_ids(&board), [1, 2, 3]);
    }

    #[test]
    fn test_clear_filters_restores_full_set_and_first_page() {
        let mut board = big_board(25);
        board.set_page(3);
        board.set_name_filter("user 2");
        board.toggle_role_filter("member");

        board.clear_filters();
        assert_eq!(board.current_page(), 1);
        assert_eq!(board.filtered_len(), 25);
        assert_eq!(visible_ids(&board), (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_page_clamped_when_filter_shrinks_result() {
        let mut board = big_board(15);
        board.set_page(2);
        assert_eq!(board.current_page(), 2);

        board.set_name_filter("user 3");
        assert_eq!(board.filtered_len(), 1);
        assert_eq!(board.current_page(), 1);
    }

    #[test]
    fn test_fifteen_users_paginate_into_two_pages() {
        let mut board = big_board(15);
        assert_eq!(board.page_count(), 2);
        assert_eq!(board.page_users().count(), 10);

        board.set_page(2);
        let page: Vec<u64> = board.page_users().map(|user| user.id).collect();
        assert_eq!(page, [11, 12, 13, 14, 15]);

        // Page 3 is unreachable; the clamp lands on the last page.
        board.set_page(3);
        assert_eq!(board.current_page(), 2);

        board.next_page();
        assert_eq!(board.current_page(), 2);
        board.last_page();
        assert_eq!(board.current_page(), 2);
        board.first_page();
        assert_eq!(board.current_page(), 1);
        board.prev_page();
        assert_eq!(board.current_page(), 1);
    }

    #[test]
    fn test_page_count_is_one_for_empty_set() {
        let board = UserBoard::new();
        assert_eq!(board.page_count(), 1);
        assert_eq!(board.current_page(), 1);
        assert_eq!(board.page_users().count(), 0);
    }

    #[test]
    fn test_toggle_select_row_twice_is_identity() {
        let mut board = board();
        board.toggle_select_row(2);
        assert!(board.is_selected(2));
        board.toggle_select_row(2);
        assert!(!board.is_selected(2));
        assert_eq!(board.selected_count(), 0);
    }

    #[test]
    fn test_select_all_spans_filtered_set_not_page() {
        let mut board = big_board(15);
        board.toggle_select_all();
        assert_eq!(board.selected_count(), 15);
        assert!(board.all_selected());
    }

    #[test]
    fn test_select_all_when_all_selected_clears() {
        let mut board = board();
        board.toggle_select_all();
        assert!(board.all_selected());
        board.toggle_select_all();
        assert_eq!(board.selected_count(), 0);
    }

    #[test]
    fn test_select_all_on_empty_filtered_set_is_noop() {
        let mut board = board();
        board.set_name_filter("nobody");
        board.toggle_select_all();
        assert_eq!(board.selected_count(), 0);
        assert!(!board.all_selected());
    }

    #[test]
    fn test_filter_change_prunes_hidden_selection() {
        let mut board = board();
        board.toggle_select_row(3); // Carol, member
        board.toggle_select_row(1); // Alice, admin

        board.toggle_role_filter("admin");
        // Carol is hidden and drops out of the selection; Alice stays.
        assert!(board.is_selected(1));
        assert!(!board.is_selected(3));
        assert_eq!(board.selected_count(), 1);

        // With Bob still unchecked, "all selected" must not report true.
        assert!(!board.all_selected());
    }

    #[test]
    fn test_delete_selected_removes_checked_rows() {
        let mut board = board();
        board.toggle_select_row(1);
        board.toggle_select_row(3);

        assert_eq!(board.delete_selected(), 2);
        assert_eq!(visible_ids(&board), [2]);
        assert_eq!(board.selected_count(), 0);
    }

    #[test]
    fn test_delete_one_keeps_unrelated_selection() {
        let mut board = board();
        board.toggle_select_row(1);
        board.toggle_select_row(2);

        assert!(board.delete_one(2));
        assert_eq!(visible_ids(&board), [1, 3]);
        assert!(board.is_selected(1));
        assert_eq!(board.selected_count(), 1);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let mut board = board();
        assert!(!board.delete_one(99));
        assert_eq!(visible_ids(&board), [1, 2, 3]);
    }

    #[test]
    fn test_delete_last_row_of_last_page_clamps_page() {
        let mut board = big_board(11);
        board.last_page();
        assert_eq!(board.current_page(), 2);

        board.delete_one(11);
        assert_eq!(board.current_page(), 1);
        assert_eq!(board.page_count(), 1);
    }

    #[test]
    fn test_begin_edit_seeds_draft_from_record() {
        let mut board = board();
        board.begin_edit(2);
        let draft = board.draft().unwrap();
        assert_eq!(draft.id, 2);
        assert_eq!(draft.name, "Bob");
        assert_eq!(draft.email, "b@x.com");
        assert_eq!(draft.role, "admin");
    }

    #[test]
    fn test_begin_edit_same_row_cancels() {
        let mut board = board();
        board.begin_edit(2);
        board.begin_edit(2);
        assert_eq!(board.editing_id(), None);
    }

    #[test]
    fn test_begin_edit_unknown_id_is_noop() {
        let mut board = board();
        board.begin_edit(99);
        assert_eq!(board.editing_id(), None);
    }

    #[test]
    fn test_switching_rows_discards_previous_draft() {
        let mut board = board();
        board.begin_edit(1);
        board.draft_mut().unwrap().name = "Alicia".into();

        board.begin_edit(2);
        assert_eq!(board.editing_id(), Some(2));
        assert_eq!(board.draft().unwrap().name, "Bob");
        // The discarded draft left no trace on the record.
        assert_eq!(board.users()[1].name, "Alice");
    }

    #[test]
    fn test_commit_edit_applies_draft_atomically() {
        let mut board = board();
        board.begin_edit(3);
        {
            let draft = board.draft_mut().unwrap();
            draft.name = "Caroline".into();
            draft.email = "caroline@x.com".into();
            draft.role = "admin".into();
        }
        board.commit_edit();

        assert_eq!(board.editing_id(), None);
        let carol = board.users().iter().find(|user| user.id == 3).unwrap();
        assert_eq!(carol.name, "Caroline");
        assert_eq!(carol.email, "caroline@x.com");
        assert_eq!(carol.role, "admin");
    }

    #[test]
    fn test_commit_edit_accepts_empty_fields() {
        let mut board = board();
        board.begin_edit(1);
        board.draft_mut().unwrap().name.clear();
        board.commit_edit();
        assert_eq!(board.users().iter().find(|u| u.id == 1).unwrap().name, "");
    }

    #[test]
    fn test_deleting_edited_row_drops_draft() {
        let mut board = board();
        board.begin_edit(2);
        board.delete_one(2);
        assert_eq!(board.editing_id(), None);
    }

    #[test]
    fn test_commit_without_edit_is_noop() {
        let mut board = board();
        board.commit_edit();
        assert_eq!(visible_ids(&board), [1, 2, 3]);
    }
}
