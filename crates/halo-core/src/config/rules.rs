//! Exclusion rules: windows that never get a border.

use serde::{Deserialize, Serialize};

use crate::window::WindowSnapshot;

/// Matches windows by class name and/or title.
///
/// Every non-empty field must match exactly, ignoring case. A rule with
/// no fields set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ExclusionRule {
    pub fn class(class_name: &str) -> Self {
        Self {
            class_name: Some(class_name.into()),
            text: None,
        }
    }

    pub fn matches(&self, class_name: &str, title: &str) -> bool {
        let class_rule = non_empty(&self.class_name);
        let text_rule = non_empty(&self.text);
        if class_rule.is_none() && text_rule.is_none() {
            return false;
        }
        class_rule.is_none_or(|c| eq_ignore_case(c, class_name))
            && text_rule.is_none_or(|t| eq_ignore_case(t, title))
    }
}

/// Case-insensitive comparison that folds non-ASCII letters too.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Shell surfaces that should never be bordered: the taskbar, the
/// desktop, the overflow tray, and transient start/search hosts.
pub fn default_exclusions() -> Vec<ExclusionRule> {
    [
        "Windows.UI.Core.CoreWindow",
        "Shell_TrayWnd",
        "TopLevelWindowForOverflowXamlIsland",
        "XamlExplorerHostIslandWindow",
        "ForegroundStaging",
        "Progman",
        "WorkerW",
    ]
    .into_iter()
    .map(ExclusionRule::class)
    .collect()
}

/// Whether any rule excludes the window.
pub fn is_excluded(snapshot: &WindowSnapshot, rules: &[ExclusionRule]) -> bool {
    rules
        .iter()
        .any(|rule| rule.matches(snapshot.class_name(), snapshot.title()))
}
