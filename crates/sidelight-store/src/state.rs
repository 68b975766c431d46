//! The observable group state store.
//!
//! One instance per workspace. Every mutating operation synchronously
//! re-serializes the whole record, overwrites the stored value, and then
//! fans out to subscribers. Group-update subscribers react to structural
//! changes (add/edit/remove); selection-update subscribers react to
//! selection and mute-flag changes. Events carry a snapshot of the state,
//! and fan-out holds `&mut self`, so a subscriber can never re-enter a
//! mutation.

use thiserror::Error;

use sidelight_core::model::{Group, WorkspaceState};

use crate::signal::{Signal, SubscriptionId};
use crate::storage::{KeyValueStorage, StorageError};

/// Namespace prefix for persisted records; the full key is
/// `sidelight::<workspace_id>`.
pub const STORAGE_NAMESPACE: &str = "sidelight";

#[must_use]
pub fn storage_key(workspace_id: &str) -> String {
    format!("{STORAGE_NAMESPACE}::{workspace_id}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("encode workspace state: {0}")]
    Serialize(String),
}

/// Outcome of an index-addressed mutation. Out-of-range indices are not an
/// error: the caller may ignore `NotFound`, tests assert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Mutation {
    Applied,
    NotFound,
}

impl Mutation {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Structural change notification (group added, edited, or removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEvent {
    pub groups: Vec<Group>,
}

/// Selection or mute-flag change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub groups: Vec<Group>,
    pub mute_unselected_channels: bool,
}

/// A freshly opened store plus any recovery warnings the embedder should
/// log. A malformed stored record is discarded, not propagated.
pub struct Opened<S: KeyValueStorage> {
    pub store: GroupStore<S>,
    pub warnings: Vec<String>,
}

pub struct GroupStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    state: WorkspaceState,
    group_updates: Signal<GroupEvent>,
    selection_updates: Signal<SelectionEvent>,
}

impl<S: KeyValueStorage> GroupStore<S> {
    /// Load the workspace record, or start from defaults (no groups, mute
    /// on) when nothing is stored. A record that fails to decode is reset
    /// to defaults and reported as a warning; the reset is only written
    /// back on the next mutation.
    pub fn open(storage: S, workspace_id: &str) -> Result<Opened<S>, StoreError> {
        let key = storage_key(workspace_id);
        let mut warnings = Vec::new();
        let state = match storage.get(&key)? {
            Some(raw) => match serde_json::from_str::<WorkspaceState>(&raw) {
                Ok(state) => state,
                Err(err) => {
                    warnings.push(format!(
                        "stored record {key} invalid; reset to defaults ({err})"
                    ));
                    WorkspaceState::default()
                }
            },
            None => WorkspaceState::default(),
        };

        Ok(Opened {
            store: Self {
                storage,
                key,
                state,
                group_updates: Signal::new(),
                selection_updates: Signal::new(),
            },
            warnings,
        })
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.state.groups
    }

    #[must_use]
    pub fn mute_unselected_channels(&self) -> bool {
        self.state.mute_unselected_channels
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add_group(&mut self, group: Group) -> Result<(), StoreError> {
        self.state.groups.push(group);
        self.persist()?;
        self.notify_group_updates();
        Ok(())
    }

    pub fn update_group(&mut self, index: usize, group: Group) -> Result<Mutation, StoreError> {
        let Some(slot) = self.state.groups.get_mut(index) else {
            return Ok(Mutation::NotFound);
        };
        *slot = group;
        self.persist()?;
        self.notify_group_updates();
        self.notify_selection_updates();
        Ok(Mutation::Applied)
    }

    pub fn remove_group(&mut self, index: usize) -> Result<Mutation, StoreError> {
        if index >= self.state.groups.len() {
            return Ok(Mutation::NotFound);
        }
        self.state.groups.remove(index);
        self.persist()?;
        self.notify_group_updates();
        self.notify_selection_updates();
        Ok(Mutation::Applied)
    }

    pub fn toggle_group_selection(&mut self, index: usize) -> Result<Mutation, StoreError> {
        let Some(group) = self.state.groups.get_mut(index) else {
            return Ok(Mutation::NotFound);
        };
        group.is_selected = !group.is_selected;
        self.persist()?;
        self.notify_selection_updates();
        Ok(Mutation::Applied)
    }

    /// Deselect every group in a single write and a single notification.
    pub fn clear_group_selection(&mut self) -> Result<(), StoreError> {
        if self.state.groups.is_empty() {
            return Ok(());
        }
        for group in &mut self.state.groups {
            group.is_selected = false;
        }
        self.persist()?;
        self.notify_selection_updates();
        Ok(())
    }

    pub fn toggle_mute_unselected_channels(&mut self) -> Result<(), StoreError> {
        self.state.mute_unselected_channels = !self.state.mute_unselected_channels;
        self.persist()?;
        self.notify_selection_updates();
        Ok(())
    }

    pub fn subscribe_group_updates(
        &mut self,
        subscriber: impl FnMut(&GroupEvent) + 'static,
    ) -> SubscriptionId {
        self.group_updates.subscribe(subscriber)
    }

    pub fn unsubscribe_group_updates(&mut self, id: SubscriptionId) -> bool {
        self.group_updates.unsubscribe(id)
    }

    pub fn subscribe_selection_updates(
        &mut self,
        subscriber: impl FnMut(&SelectionEvent) + 'static,
    ) -> SubscriptionId {
        self.selection_updates.subscribe(subscriber)
    }

    pub fn unsubscribe_selection_updates(&mut self, id: SubscriptionId) -> bool {
        self.selection_updates.unsubscribe(id)
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.state)
            .map_err(|err| StoreError::Serialize(err.to_string()))?;
        self.storage.set(&self.key, &raw)?;
        Ok(())
    }

    fn notify_group_updates(&mut self) {
        let event = GroupEvent {
            groups: self.state.groups.clone(),
        };
        self.group_updates.emit(&event);
    }

    fn notify_selection_updates(&mut self) {
        let event = SelectionEvent {
            groups: self.state.groups.clone(),
            mute_unselected_channels: self.state.mute_unselected_channels,
        };
        self.selection_updates.emit(&event);
    }
}

impl<S: KeyValueStorage> std::fmt::Debug for GroupStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupStore")
            .field("key", &self.key)
            .field("groups", &self.state.groups.len())
            .field(
                "mute_unselected_channels",
                &self.state.mute_unselected_channels,
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{storage_key, GroupStore, Mutation, Opened};
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use sidelight_core::model::{Color, Group, Shortcut};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn group(name: &str, selected: bool) -> Group {
        Group {
            name: name.to_owned(),
            color: Color::from_rgb(0x11, 0x22, 0x33),
            channels: vec![format!("{name}-channel")],
            shortcut: Shortcut::new('g').ok(),
            is_selected: selected,
        }
    }

    fn open_empty(workspace: &str) -> GroupStore<MemoryStorage> {
        let Opened { store, warnings } = GroupStore::open(MemoryStorage::new(), workspace)
            .unwrap_or_else(|err| panic!("open: {err}"));
        assert!(warnings.is_empty());
        store
    }

    #[test]
    fn missing_record_initializes_defaults() {
        let store = open_empty("T1");
        assert!(store.groups().is_empty());
        assert!(store.mute_unselected_channels());
        assert_eq!(store.storage().write_count(), 0);
    }

    #[test]
    fn mutations_survive_a_reopen() {
        let mut store = open_empty("T1");
        store
            .add_group(group("alpha", false))
            .unwrap_or_else(|err| panic!("{err}"));
        store
            .add_group(group("beta", true))
            .unwrap_or_else(|err| panic!("{err}"));
        assert!(store
            .update_group(0, group("alpha-renamed", false))
            .unwrap_or_else(|err| panic!("{err}"))
            .is_applied());
        assert!(store
            .remove_group(1)
            .unwrap_or_else(|err| panic!("{err}"))
            .is_applied());
        store
            .toggle_mute_unselected_channels()
            .unwrap_or_else(|err| panic!("{err}"));

        let reopened = GroupStore::open(store.storage().clone(), "T1")
            .unwrap_or_else(|err| panic!("reopen: {err}"));
        assert!(reopened.warnings.is_empty());
        assert_eq!(reopened.store.groups(), store.groups());
        assert_eq!(
            reopened.store.mute_unselected_channels(),
            store.mute_unselected_channels()
        );
    }

    #[test]
    fn records_are_scoped_per_workspace() {
        let mut storage = MemoryStorage::new();
        storage.seed(&storage_key("other"), "{not json");

        let Opened { store, warnings } = GroupStore::open(storage, "T1")
            .unwrap_or_else(|err| panic!("open: {err}"));
        // The corrupt record belongs to a different workspace.
        assert!(warnings.is_empty());
        assert!(store.groups().is_empty());
    }

    #[test]
    fn toggling_selection_twice_restores_the_flag() {
        let mut store = open_empty("T1");
        store
            .add_group(group("alpha", false))
            .unwrap_or_else(|err| panic!("{err}"));

        assert!(store
            .toggle_group_selection(0)
            .unwrap_or_else(|err| panic!("{err}"))
            .is_applied());
        assert!(store.groups()[0].is_selected);
        assert!(store
            .toggle_group_selection(0)
            .unwrap_or_else(|err| panic!("{err}"))
            .is_applied());
        assert!(!store.groups()[0].is_selected);
    }

    #[test]
    fn clear_selection_batches_one_write_and_one_notification() {
        let mut store = open_empty("T1");
        store
            .add_group(group("alpha", true))
            .unwrap_or_else(|err| panic!("{err}"));
        store
            .add_group(group("beta", false))
            .unwrap_or_else(|err| panic!("{err}"));
        store
            .add_group(group("gamma", true))
            .unwrap_or_else(|err| panic!("{err}"));

        let notifications = Rc::new(RefCell::new(0_u32));
        {
            let notifications = Rc::clone(&notifications);
            store.subscribe_selection_updates(move |_| *notifications.borrow_mut() += 1);
        }

        let writes_before = store.storage().write_count();
        store
            .clear_group_selection()
            .unwrap_or_else(|err| panic!("{err}"));

        assert!(store.groups().iter().all(|group| !group.is_selected));
        assert_eq!(store.storage().write_count(), writes_before + 1);
        assert_eq!(*notifications.borrow(), 1);
    }

    #[test]
    fn out_of_range_mutations_change_nothing() {
        let mut store = open_empty("T1");
        store
            .add_group(group("alpha", true))
            .unwrap_or_else(|err| panic!("{err}"));

        let group_notifications = Rc::new(RefCell::new(0_u32));
        let selection_notifications = Rc::new(RefCell::new(0_u32));
        {
            let counter = Rc::clone(&group_notifications);
            store.subscribe_group_updates(move |_| *counter.borrow_mut() += 1);
            let counter = Rc::clone(&selection_notifications);
            store.subscribe_selection_updates(move |_| *counter.borrow_mut() += 1);
        }

        let before = store.groups().to_vec();
        let writes_before = store.storage().write_count();

        // index == len and far out of range
        for index in [1, usize::MAX] {
            assert_eq!(
                store
                    .update_group(index, group("ghost", false))
                    .unwrap_or_else(|err| panic!("{err}")),
                Mutation::NotFound
            );
            assert_eq!(
                store
                    .remove_group(index)
                    .unwrap_or_else(|err| panic!("{err}")),
                Mutation::NotFound
            );
            assert_eq!(
                store
                    .toggle_group_selection(index)
                    .unwrap_or_else(|err| panic!("{err}")),
                Mutation::NotFound
            );
        }

        assert_eq!(store.groups(), before.as_slice());
        assert_eq!(store.storage().write_count(), writes_before);
        assert_eq!(*group_notifications.borrow(), 0);
        assert_eq!(*selection_notifications.borrow(), 0);
    }

    #[test]
    fn update_notifies_group_then_selection_subscribers() {
        let mut store = open_empty("T1");
        store
            .add_group(group("alpha", false))
            .unwrap_or_else(|err| panic!("{err}"));

        let order = Rc::new(RefCell::new(Vec::new()));
        {
            let order = Rc::clone(&order);
            store.subscribe_group_updates(move |_| order.borrow_mut().push("group"));
        }
        {
            let order = Rc::clone(&order);
            store.subscribe_selection_updates(move |_| order.borrow_mut().push("selection"));
        }

        assert!(store
            .update_group(0, group("alpha", true))
            .unwrap_or_else(|err| panic!("{err}"))
            .is_applied());
        assert_eq!(*order.borrow(), vec!["group", "selection"]);
    }

    #[test]
    fn selection_events_carry_a_state_snapshot() {
        let mut store = open_empty("T1");
        store
            .add_group(group("alpha", false))
            .unwrap_or_else(|err| panic!("{err}"));

        let seen = Rc::new(RefCell::new(None));
        {
            let seen = Rc::clone(&seen);
            store.subscribe_selection_updates(move |event| {
                *seen.borrow_mut() = Some(event.clone());
            });
        }

        store
            .toggle_group_selection(0)
            .unwrap_or_else(|err| panic!("{err}"));

        let event = seen
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("no selection event"));
        assert!(event.groups[0].is_selected);
        assert!(event.mute_unselected_channels);
    }

    #[test]
    fn corrupt_record_resets_to_defaults_with_warning() {
        let mut storage = MemoryStorage::new();
        storage.seed(&storage_key("T1"), "{definitely not json");

        let Opened {
            mut store,
            warnings,
        } = GroupStore::open(storage, "T1").unwrap_or_else(|err| panic!("open: {err}"));

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("reset to defaults"));
        assert!(store.groups().is_empty());
        assert!(store.mute_unselected_channels());

        // The next mutation overwrites the corrupt blob with a valid one.
        store
            .add_group(group("alpha", false))
            .unwrap_or_else(|err| panic!("{err}"));
        let reopened = GroupStore::open(store.storage().clone(), "T1")
            .unwrap_or_else(|err| panic!("reopen: {err}"));
        assert!(reopened.warnings.is_empty());
        assert_eq!(reopened.store.groups().len(), 1);
    }

    #[test]
    fn revoked_subscriptions_stop_receiving_events() {
        let mut store = open_empty("T1");
        let count = Rc::new(RefCell::new(0_u32));
        let id = {
            let count = Rc::clone(&count);
            store.subscribe_group_updates(move |_| *count.borrow_mut() += 1)
        };

        store
            .add_group(group("alpha", false))
            .unwrap_or_else(|err| panic!("{err}"));
        assert!(store.unsubscribe_group_updates(id));
        store
            .add_group(group("beta", false))
            .unwrap_or_else(|err| panic!("{err}"));

        assert_eq!(*count.borrow(), 1);
        assert!(!store.unsubscribe_group_updates(id));
    }
}
