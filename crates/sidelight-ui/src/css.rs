//! Render highlight rules into the host's CSS override payload.
//!
//! The `SelectorScheme` carries the host's selector templates so the rule
//! model stays host-agnostic. Output is the full payload: the embedder
//! swaps it wholesale on every selection change.

use sidelight_core::rules::Rule;

/// Selector templates for a sidebar-style navigation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorScheme {
    /// Selectors covering every dimmable channel item's label.
    pub channel_type_selectors: Vec<String>,
    /// Selector for the currently-active item's label (exempt from dim).
    pub active_channel_selector: String,
    /// Attribute holding the opaque channel id on each item.
    pub channel_id_attribute: String,
}

impl SelectorScheme {
    /// Defaults for a sidebar that tags items with `data-channel-*`
    /// attributes.
    #[must_use]
    pub fn sidebar_default() -> Self {
        Self {
            channel_type_selectors: vec![
                "[data-channel-type=\"channel\"] span".to_owned(),
                "[data-channel-type=\"private\"] span".to_owned(),
            ],
            active_channel_selector: "[data-channel-is-active=\"true\"] span".to_owned(),
            channel_id_attribute: "data-channel-id".to_owned(),
        }
    }

    fn channel_selector(&self, channel_id: &str) -> String {
        format!("[{}=\"{}\"] span", self.channel_id_attribute, channel_id)
    }

    fn channel_label_selector(&self, channel_id: &str) -> String {
        format!(
            "[{}=\"{}\"] span:first-child",
            self.channel_id_attribute, channel_id
        )
    }
}

/// Serialize rules into CSS, in rule order (later rules win). Rules over an
/// empty channel set produce no output: there is nothing to select.
#[must_use]
pub fn render_style_overrides(rules: &[Rule], scheme: &SelectorScheme) -> String {
    let mut css = Vec::new();
    for rule in rules {
        match rule {
            Rule::DimAllExceptActive => {
                css.push(format!(
                    "{} {{ opacity: 0.2 !important; }}",
                    scheme.channel_type_selectors.join(", ")
                ));
                css.push(format!(
                    "{} {{ opacity: 1 !important; }}",
                    scheme.active_channel_selector
                ));
            }
            Rule::Unmute { channels } => {
                if channels.is_empty() {
                    continue;
                }
                let selectors: Vec<String> = channels
                    .iter()
                    .map(|id| scheme.channel_selector(id))
                    .collect();
                css.push(format!(
                    "{} {{ opacity: 1 !important; }}",
                    selectors.join(", ")
                ));
            }
            Rule::Recolor { channels, color } => {
                if channels.is_empty() {
                    continue;
                }
                let selectors: Vec<String> = channels
                    .iter()
                    .map(|id| scheme.channel_label_selector(id))
                    .collect();
                css.push(format!(
                    "{} {{ color: {color} !important; }}",
                    selectors.join(", ")
                ));
            }
        }
    }
    css.join("\n")
}
