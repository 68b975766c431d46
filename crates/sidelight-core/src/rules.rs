//! Derived highlight rules.
//!
//! `compute_rules` is a pure function from (groups, mute flag) to an ordered
//! rule list. It is recomputed in full on every selection change; callers
//! never patch a previous result incrementally.

use crate::model::{Color, Group};

/// One visual-override instruction for the host's navigation list.
///
/// Emission order matters: later rules win for overlapping channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Dim every channel item except the host's currently-active one.
    DimAllExceptActive,
    /// Restore full opacity for the given channel ids.
    Unmute { channels: Vec<String> },
    /// Recolor the labels of the given channel ids.
    Recolor { channels: Vec<String>, color: Color },
}

/// Compute the override rules for the current selection.
///
/// No rules are emitted when no group is selected, regardless of the mute
/// flag. Selected groups keep their store order, so a channel shared by two
/// selected groups ends up with the later group's color.
#[must_use]
pub fn compute_rules(groups: &[Group], mute_unselected_channels: bool) -> Vec<Rule> {
    let selected: Vec<&Group> = groups.iter().filter(|group| group.is_selected).collect();
    if selected.is_empty() {
        return Vec::new();
    }

    let mut rules = Vec::new();
    if mute_unselected_channels {
        rules.push(Rule::DimAllExceptActive);
    }
    for group in selected {
        rules.push(Rule::Unmute {
            channels: group.channels.clone(),
        });
        rules.push(Rule::Recolor {
            channels: group.channels.clone(),
            color: group.color,
        });
    }
    rules
}
