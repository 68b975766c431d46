//! View models for the selection list and the group configuration form.
//!
//! These carry everything the embedder needs to render, but no widgets:
//! the host owns the actual elements and routes interactions back through
//! the `App`.

use sidelight_core::model::{Color, Group, Shortcut};

use crate::host::Channel;

/// One row of the selection list. `index` addresses the group in store
/// order; rows themselves are display-sorted by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRow {
    pub index: usize,
    pub name: String,
    pub color: Color,
    pub shortcut_hint: Option<String>,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionView {
    pub rows: Vec<SelectionRow>,
    pub mute_unselected_channels: bool,
    /// Present only when there are no groups yet.
    pub empty_hint: Option<&'static str>,
}

const EMPTY_HINT: &str =
    "You haven't created any channel groups yet. Add one to get started.";

/// Build the selection list, sorted case-insensitively by group name.
/// The store order is untouched; rows keep their original index.
#[must_use]
pub fn selection_view(groups: &[Group], mute_unselected_channels: bool) -> SelectionView {
    let mut rows: Vec<SelectionRow> = groups
        .iter()
        .enumerate()
        .map(|(index, group)| SelectionRow {
            index,
            name: group.name.clone(),
            color: group.color,
            shortcut_hint: group
                .shortcut
                .map(|shortcut| format!("[ {} ]", shortcut.key())),
            is_selected: group.is_selected,
        })
        .collect();
    rows.sort_by_key(|row| row.name.to_lowercase());

    SelectionView {
        empty_hint: rows.is_empty().then_some(EMPTY_HINT),
        rows,
        mute_unselected_channels,
    }
}

/// One channel option in the configuration form's multi-select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Create/edit form state. Channel options reflect the host's navigation
/// list at open time; the selection flag of the edited group is preserved
/// untouched through a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfigurationForm {
    group_index: Option<usize>,
    pub name: String,
    pub color: Color,
    shortcut: Option<Shortcut>,
    channels: Vec<ChannelOption>,
    is_selected: bool,
}

impl GroupConfigurationForm {
    /// Blank form for a new group.
    #[must_use]
    pub fn create(host_channels: &[Channel]) -> Self {
        Self::from_group(None, &Group::blank(), host_channels)
    }

    /// Form pre-filled from an existing group at `group_index`.
    #[must_use]
    pub fn edit(group_index: usize, group: &Group, host_channels: &[Channel]) -> Self {
        Self::from_group(Some(group_index), group, host_channels)
    }

    fn from_group(group_index: Option<usize>, group: &Group, host_channels: &[Channel]) -> Self {
        Self {
            group_index,
            name: group.name.clone(),
            color: group.color,
            shortcut: group.shortcut,
            channels: host_channels
                .iter()
                .map(|channel| ChannelOption {
                    id: channel.id.clone(),
                    name: channel.name.clone(),
                    selected: group.contains_channel(&channel.id),
                })
                .collect(),
            is_selected: group.is_selected,
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        if self.group_index.is_none() {
            "Create Group"
        } else {
            "Edit Group"
        }
    }

    #[must_use]
    pub fn group_index(&self) -> Option<usize> {
        self.group_index
    }

    #[must_use]
    pub fn shortcut(&self) -> Option<Shortcut> {
        self.shortcut
    }

    /// The shortcut field accepts a single alphanumeric key and stores it
    /// lowercase; any other key leaves the field unchanged.
    pub fn press_shortcut_key(&mut self, key: char) {
        if let Ok(shortcut) = Shortcut::new(key) {
            self.shortcut = Some(shortcut);
        }
    }

    pub fn clear_shortcut(&mut self) {
        self.shortcut = None;
    }

    #[must_use]
    pub fn channel_options(&self) -> &[ChannelOption] {
        &self.channels
    }

    /// Returns false when the id is not in the option list.
    pub fn set_channel_selected(&mut self, channel_id: &str, selected: bool) -> bool {
        match self
            .channels
            .iter_mut()
            .find(|option| option.id == channel_id)
        {
            Some(option) => {
                option.selected = selected;
                true
            }
            None => false,
        }
    }

    /// The group this form describes, ready for `add_group`/`update_group`.
    #[must_use]
    pub fn submit(&self) -> Group {
        Group {
            name: self.name.clone(),
            color: self.color,
            channels: self
                .channels
                .iter()
                .filter(|option| option.selected)
                .map(|option| option.id.clone())
                .collect(),
            shortcut: self.shortcut,
            is_selected: self.is_selected,
        }
    }
}
