//! sidelight-ui: modal navigation, keyboard dispatch, and host wiring.
//!
//! The interactive surface over `sidelight-store`: a LIFO modal stack, the
//! triple-shift/shortcut key state machine, view models for the selection
//! list and the group configuration form, CSS override rendering, and the
//! `App` runtime that ties everything to a host page adapter.

pub mod app;
pub mod css;
pub mod dispatcher;
pub mod host;
pub mod input;
pub mod modal;
pub mod views;

pub use app::App;
pub use css::{render_style_overrides, SelectorScheme};
pub use dispatcher::{DispatchAction, ShortcutDispatcher};
pub use host::{Channel, HostPage, ReadinessError, ReadinessWait};
pub use input::{Key, KeyEvent, Modifiers};
pub use modal::{FocusTarget, ModalStack, View};
pub use views::{selection_view, ChannelOption, GroupConfigurationForm, SelectionRow, SelectionView};
