//! sidelight-core: data model and derived highlight rules for channel groups.
//!
//! A group is a user-named, colored set of channel ids with an optional
//! single-key shortcut and a selection flag. This crate owns the persisted
//! record shape and the pure rule computation; storage and UI live in
//! `sidelight-store` and `sidelight-ui`.

pub mod model;
pub mod rules;

pub use model::{Color, ColorParseError, Group, Shortcut, ShortcutParseError, WorkspaceState};
pub use rules::{compute_rules, Rule};
