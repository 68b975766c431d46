//! LIFO modal stack.
//!
//! Each `show`/`hide` makes the new top the sole visible content; there is
//! no partial diffing. Initial focus is deferred: the embedder drains the
//! pending focus request on its next scheduling tick, after the view has
//! been attached.

/// Opaque view handles the stack navigates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The group selection list (top-level view).
    GroupSelection,
    /// The create/edit form; `group_index` is `None` when creating.
    GroupConfiguration { group_index: Option<usize> },
}

impl View {
    /// Where focus should land once the view is attached.
    #[must_use]
    pub const fn initial_focus(self) -> FocusTarget {
        match self {
            Self::GroupSelection => FocusTarget::FirstToggle,
            Self::GroupConfiguration { .. } => FocusTarget::NameInput,
        }
    }
}

/// Focus-worthy input of a freshly shown view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// First checkbox in the selection list (or the mute toggle).
    FirstToggle,
    /// The name field of the configuration form.
    NameInput,
}

/// Stack of views; empty means nothing is shown. No maximum depth is
/// enforced; in practice depth stays at 2 or below.
#[derive(Debug, Clone, Default)]
pub struct ModalStack {
    stack: Vec<View>,
    pending_focus: Option<FocusTarget>,
}

impl ModalStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, view: View) {
        self.stack.push(view);
        self.pending_focus = Some(view.initial_focus());
    }

    /// Pop the top view, revealing the one below it (which regains focus)
    /// or nothing. Returns the popped view; popping an empty stack is a
    /// no-op.
    pub fn hide(&mut self) -> Option<View> {
        let popped = self.stack.pop();
        self.pending_focus = self.top().map(|view| view.initial_focus());
        popped
    }

    #[must_use]
    pub fn is_showing(&self) -> bool {
        !self.stack.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<View> {
        self.stack.last().copied()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Drain the deferred focus request; called on the tick after a
    /// show/hide, never synchronously within it.
    pub fn take_pending_focus(&mut self) -> Option<FocusTarget> {
        self.pending_focus.take()
    }
}

#[cfg(test)]
mod tests {
    use super::{FocusTarget, ModalStack, View};

    #[test]
    fn show_and_hide_walk_the_stack() {
        let mut modal = ModalStack::new();
        assert!(!modal.is_showing());
        assert_eq!(modal.hide(), None);

        modal.show(View::GroupSelection);
        modal.show(View::GroupConfiguration { group_index: None });
        assert_eq!(modal.depth(), 2);
        assert_eq!(
            modal.top(),
            Some(View::GroupConfiguration { group_index: None })
        );

        assert_eq!(
            modal.hide(),
            Some(View::GroupConfiguration { group_index: None })
        );
        assert_eq!(modal.top(), Some(View::GroupSelection));
        assert_eq!(modal.hide(), Some(View::GroupSelection));
        assert!(!modal.is_showing());
    }

    #[test]
    fn focus_is_deferred_and_drains_once() {
        let mut modal = ModalStack::new();
        modal.show(View::GroupConfiguration { group_index: Some(1) });

        assert_eq!(modal.take_pending_focus(), Some(FocusTarget::NameInput));
        assert_eq!(modal.take_pending_focus(), None);
    }

    #[test]
    fn hiding_refocuses_the_revealed_view() {
        let mut modal = ModalStack::new();
        modal.show(View::GroupSelection);
        modal.show(View::GroupConfiguration { group_index: None });
        let _ = modal.take_pending_focus();

        modal.hide();
        assert_eq!(modal.take_pending_focus(), Some(FocusTarget::FirstToggle));

        modal.hide();
        assert_eq!(modal.take_pending_focus(), None);
    }
}
