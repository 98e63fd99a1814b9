//! Tool selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Available tools. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Select,
    Node,
    Arrow,
    Text,
    Pan,
    Laser,
}

impl Tool {
    /// All tools in toolbar order.
    pub const ALL: [Tool; 6] = [
        Tool::Select,
        Tool::Node,
        Tool::Arrow,
        Tool::Text,
        Tool::Pan,
        Tool::Laser,
    ];

    /// Single-letter keyboard shortcut.
    pub fn shortcut(&self) -> char {
        match self {
            Tool::Select => 'v',
            Tool::Node => 'n',
            Tool::Arrow => 'a',
            Tool::Text => 't',
            Tool::Pan => 'h',
            Tool::Laser => 'l',
        }
    }

    /// Look up a tool by its shortcut letter (case-insensitive).
    pub fn from_shortcut(key: char) -> Option<Tool> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|tool| tool.shortcut() == key)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Node => "Node",
            Tool::Arrow => "Arrow",
            Tool::Text => "Text",
            Tool::Pan => "Pan",
            Tool::Laser => "Laser",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool() {
        assert_eq!(Tool::default(), Tool::Select);
    }

    #[test]
    fn test_shortcuts_are_unique() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_shortcut(tool.shortcut()), Some(tool));
        }
        assert_eq!(Tool::from_shortcut('N'), Some(Tool::Node));
        assert_eq!(Tool::from_shortcut('z'), None);
    }
}
