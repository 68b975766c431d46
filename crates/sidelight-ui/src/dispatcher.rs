//! Keyboard shortcut dispatcher.
//!
//! A state machine over key events whose only memory is a consecutive-shift
//! counter. Three shift presses in a row with the modal closed open the
//! selection view; while it is open, single keys select groups by shortcut
//! or clear the selection. No timers are involved: only an intervening
//! non-shift key or an open modal resets the counter.

use sidelight_core::model::Group;

use crate::input::{Key, KeyEvent};
use crate::modal::View;

const ACTIVATION_SHIFT_COUNT: u8 = 3;

/// What the runtime should do in response to a key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchAction {
    /// Triple-shift gesture completed: open the selection view.
    OpenSelectionView,
    /// Escape: pop one modal level only.
    CloseTopView,
    /// Clear all selection, then select the groups at these store indices
    /// (several groups may share a shortcut), then close the view.
    SelectShortcutGroups { indices: Vec<usize> },
    /// Backspace/Delete in the selection view: clear all selection and
    /// close the view.
    ClearSelectionAndClose,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortcutDispatcher {
    shift_count: u8,
}

impl ShortcutDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one key event. `modal_top` is the currently visible view, if
    /// any; `groups` is the store's current ordered list (needed only for
    /// shortcut matching).
    pub fn handle_key(
        &mut self,
        event: KeyEvent,
        modal_top: Option<View>,
        groups: &[Group],
    ) -> Option<DispatchAction> {
        let modal_open = modal_top.is_some();
        let is_shift = matches!(event.key, Key::Shift);

        self.shift_count = if is_shift && !modal_open {
            self.shift_count + 1
        } else {
            0
        };
        if self.shift_count >= ACTIVATION_SHIFT_COUNT {
            self.shift_count = 0;
            return Some(DispatchAction::OpenSelectionView);
        }

        if !modal_open {
            return None;
        }
        if matches!(event.key, Key::Escape) {
            return Some(DispatchAction::CloseTopView);
        }
        if modal_top != Some(View::GroupSelection) {
            return None;
        }

        match event.key {
            Key::Backspace | Key::Delete => Some(DispatchAction::ClearSelectionAndClose),
            Key::Char(ch) if ch.is_ascii_alphanumeric() => {
                let indices: Vec<usize> = groups
                    .iter()
                    .enumerate()
                    .filter(|(_, group)| {
                        group
                            .shortcut
                            .is_some_and(|shortcut| shortcut.matches(ch))
                    })
                    .map(|(index, _)| index)
                    .collect();
                if indices.is_empty() {
                    None
                } else {
                    Some(DispatchAction::SelectShortcutGroups { indices })
                }
            }
            _ => None,
        }
    }

    /// Consecutive shift presses seen so far (diagnostics only).
    #[must_use]
    pub fn pending_shift_count(&self) -> u8 {
        self.shift_count
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatchAction, ShortcutDispatcher};
    use crate::input::{Key, KeyEvent};
    use crate::modal::View;
    use sidelight_core::model::{Color, Group, Shortcut};

    fn group_with_shortcut(name: &str, shortcut: Option<char>) -> Group {
        Group {
            name: name.to_owned(),
            color: Color::from_rgb(0, 0, 0),
            channels: Vec::new(),
            shortcut: shortcut.map(|ch| {
                Shortcut::new(ch).unwrap_or_else(|err| panic!("shortcut {ch}: {err}"))
            }),
            is_selected: false,
        }
    }

    fn press(
        dispatcher: &mut ShortcutDispatcher,
        key: Key,
        modal_top: Option<View>,
        groups: &[Group],
    ) -> Option<DispatchAction> {
        dispatcher.handle_key(KeyEvent::plain(key), modal_top, groups)
    }

    #[test]
    fn triple_shift_opens_only_after_three_consecutive_presses() {
        let mut dispatcher = ShortcutDispatcher::new();
        let sequence = [
            (Key::Shift, None),
            (Key::Shift, None),
            (Key::Char('x'), None),
            (Key::Shift, None),
            (Key::Shift, None),
            (Key::Shift, Some(DispatchAction::OpenSelectionView)),
        ];
        for (key, expected) in sequence {
            assert_eq!(press(&mut dispatcher, key, None, &[]), expected);
        }
        assert_eq!(dispatcher.pending_shift_count(), 0);
    }

    #[test]
    fn shift_presses_while_modal_open_do_not_count() {
        let mut dispatcher = ShortcutDispatcher::new();
        assert_eq!(press(&mut dispatcher, Key::Shift, None, &[]), None);
        assert_eq!(
            press(&mut dispatcher, Key::Shift, Some(View::GroupSelection), &[]),
            None
        );
        assert_eq!(dispatcher.pending_shift_count(), 0);
        // Two more shifts are not enough after the reset.
        assert_eq!(press(&mut dispatcher, Key::Shift, None, &[]), None);
        assert_eq!(press(&mut dispatcher, Key::Shift, None, &[]), None);
        assert_eq!(
            press(&mut dispatcher, Key::Shift, None, &[]),
            Some(DispatchAction::OpenSelectionView)
        );
    }

    #[test]
    fn escape_pops_one_level_from_any_view() {
        let mut dispatcher = ShortcutDispatcher::new();
        for top in [
            View::GroupSelection,
            View::GroupConfiguration { group_index: None },
        ] {
            assert_eq!(
                press(&mut dispatcher, Key::Escape, Some(top), &[]),
                Some(DispatchAction::CloseTopView)
            );
        }
        assert_eq!(press(&mut dispatcher, Key::Escape, None, &[]), None);
    }

    #[test]
    fn shortcut_key_matches_every_group_sharing_it() {
        let groups = vec![
            group_with_shortcut("g1", Some('a')),
            group_with_shortcut("g2", Some('a')),
            group_with_shortcut("g3", Some('b')),
            group_with_shortcut("g4", None),
        ];
        let mut dispatcher = ShortcutDispatcher::new();

        assert_eq!(
            press(
                &mut dispatcher,
                Key::Char('A'),
                Some(View::GroupSelection),
                &groups
            ),
            Some(DispatchAction::SelectShortcutGroups {
                indices: vec![0, 1]
            })
        );
        assert_eq!(
            press(
                &mut dispatcher,
                Key::Char('z'),
                Some(View::GroupSelection),
                &groups
            ),
            None
        );
    }

    #[test]
    fn shortcut_keys_are_inert_in_the_configuration_form() {
        let groups = vec![group_with_shortcut("g1", Some('a'))];
        let mut dispatcher = ShortcutDispatcher::new();
        assert_eq!(
            press(
                &mut dispatcher,
                Key::Char('a'),
                Some(View::GroupConfiguration { group_index: None }),
                &groups
            ),
            None
        );
        assert_eq!(
            press(
                &mut dispatcher,
                Key::Backspace,
                Some(View::GroupConfiguration { group_index: None }),
                &groups
            ),
            None
        );
    }

    #[test]
    fn backspace_and_delete_clear_selection_in_the_selection_view() {
        let mut dispatcher = ShortcutDispatcher::new();
        for key in [Key::Backspace, Key::Delete] {
            assert_eq!(
                press(&mut dispatcher, key, Some(View::GroupSelection), &[]),
                Some(DispatchAction::ClearSelectionAndClose)
            );
        }
    }
}
