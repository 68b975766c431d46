//! Runtime glue: store + modal stack + dispatcher + host adapter.
//!
//! Wiring follows the startup order of the host embedding: wait for the
//! host marker (see [`crate::host::ReadinessWait`]), then `App::init`,
//! then feed key events and form interactions in. Style overrides flow out
//! through a selection-update subscription, so every selection change
//! repaints the host exactly once.

use std::cell::RefCell;
use std::rc::Rc;

use sidelight_core::rules::compute_rules;
use sidelight_store::state::{GroupStore, Mutation, Opened, StoreError};
use sidelight_store::storage::KeyValueStorage;

use crate::css::{render_style_overrides, SelectorScheme};
use crate::dispatcher::{DispatchAction, ShortcutDispatcher};
use crate::host::HostPage;
use crate::input::KeyEvent;
use crate::modal::{FocusTarget, ModalStack, View};
use crate::views::{selection_view, GroupConfigurationForm, SelectionView};

pub struct App<S: KeyValueStorage, H: HostPage + 'static> {
    store: GroupStore<S>,
    modal: ModalStack,
    dispatcher: ShortcutDispatcher,
    host: Rc<RefCell<H>>,
    startup_notes: Vec<String>,
}

impl<S: KeyValueStorage, H: HostPage + 'static> App<S, H> {
    /// Open the workspace's store, subscribe the style listener, and paint
    /// the initial overrides. The host must already be ready.
    pub fn init(
        storage: S,
        host: Rc<RefCell<H>>,
        scheme: SelectorScheme,
    ) -> Result<Self, StoreError> {
        let workspace_id = host.borrow().workspace_id();
        let Opened {
            mut store,
            mut warnings,
        } = GroupStore::open(storage, &workspace_id)?;

        let style_host = Rc::clone(&host);
        let style_scheme = scheme.clone();
        store.subscribe_selection_updates(move |event| {
            let rules = compute_rules(&event.groups, event.mute_unselected_channels);
            let css = render_style_overrides(&rules, &style_scheme);
            style_host.borrow_mut().apply_style_overrides(&css);
        });

        let initial_rules = compute_rules(store.groups(), store.mute_unselected_channels());
        let initial_css = render_style_overrides(&initial_rules, &scheme);
        host.borrow_mut().apply_style_overrides(&initial_css);

        warnings.push(format!("sidelight initialized for workspace {workspace_id}"));
        Ok(Self {
            store,
            modal: ModalStack::new(),
            dispatcher: ShortcutDispatcher::new(),
            host,
            startup_notes: warnings,
        })
    }

    /// Diagnostic lines from startup (recovery warnings plus the init
    /// line); the embedder decides where to log them.
    #[must_use]
    pub fn startup_notes(&self) -> &[String] {
        &self.startup_notes
    }

    /// Feed one key event through the dispatcher and apply the outcome.
    pub fn handle_key(&mut self, event: KeyEvent) -> Result<(), StoreError> {
        let action = self
            .dispatcher
            .handle_key(event, self.modal.top(), self.store.groups());
        let Some(action) = action else {
            return Ok(());
        };
        match action {
            DispatchAction::OpenSelectionView => {
                self.modal.show(View::GroupSelection);
            }
            DispatchAction::CloseTopView => {
                self.modal.hide();
            }
            DispatchAction::SelectShortcutGroups { indices } => {
                self.store.clear_group_selection()?;
                for index in indices {
                    // Indices came from the current group list.
                    let _applied = self.store.toggle_group_selection(index)?;
                }
                self.modal.hide();
            }
            DispatchAction::ClearSelectionAndClose => {
                self.store.clear_group_selection()?;
                self.modal.hide();
            }
        }
        Ok(())
    }

    /// Open the create form over the current view.
    #[must_use]
    pub fn open_group_creator(&mut self) -> GroupConfigurationForm {
        let channels = self.host.borrow().list_channels();
        self.modal
            .show(View::GroupConfiguration { group_index: None });
        GroupConfigurationForm::create(&channels)
    }

    /// Open the edit form for the group at `index`, or `None` when the
    /// index no longer exists.
    #[must_use]
    pub fn open_group_editor(&mut self, index: usize) -> Option<GroupConfigurationForm> {
        let group = self.store.groups().get(index)?.clone();
        let channels = self.host.borrow().list_channels();
        self.modal.show(View::GroupConfiguration {
            group_index: Some(index),
        });
        Some(GroupConfigurationForm::edit(index, &group, &channels))
    }

    /// Save a configuration form and close it. Creation always applies;
    /// an edit of a since-removed index reports `NotFound`.
    pub fn submit_form(&mut self, form: &GroupConfigurationForm) -> Result<Mutation, StoreError> {
        let outcome = match form.group_index() {
            None => {
                self.store.add_group(form.submit())?;
                Mutation::Applied
            }
            Some(index) => self.store.update_group(index, form.submit())?,
        };
        self.modal.hide();
        Ok(outcome)
    }

    /// Close the configuration form without saving.
    pub fn cancel_form(&mut self) {
        self.modal.hide();
    }

    pub fn remove_group(&mut self, index: usize) -> Result<Mutation, StoreError> {
        self.store.remove_group(index)
    }

    pub fn toggle_group_selection(&mut self, index: usize) -> Result<Mutation, StoreError> {
        self.store.toggle_group_selection(index)
    }

    pub fn toggle_mute_unselected_channels(&mut self) -> Result<(), StoreError> {
        self.store.toggle_mute_unselected_channels()
    }

    /// Display model for the selection list in its current state.
    #[must_use]
    pub fn selection_view(&self) -> SelectionView {
        selection_view(self.store.groups(), self.store.mute_unselected_channels())
    }

    #[must_use]
    pub fn is_modal_showing(&self) -> bool {
        self.modal.is_showing()
    }

    #[must_use]
    pub fn modal_top(&self) -> Option<View> {
        self.modal.top()
    }

    /// Deferred focus request for the embedder's next tick.
    pub fn take_pending_focus(&mut self) -> Option<FocusTarget> {
        self.modal.take_pending_focus()
    }

    #[must_use]
    pub fn store(&self) -> &GroupStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GroupStore<S> {
        &mut self.store
    }
}
