use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub todo: TodoConfig,
    #[serde(default)]
    pub memo: MemoConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme slot name
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

/// Pane proportions, memo / todo / chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Percent of the width per pane
    #[serde(default = "default_sizes")]
    pub sizes: [u16; 3],
    /// Minimum width per pane, in cells
    #[serde(default = "default_min_widths")]
    pub min_widths: [u16; 3],
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            sizes: default_sizes(),
            min_widths: default_min_widths(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoConfig {
    /// Done bucket visible at startup
    #[serde(default = "default_true")]
    pub show_done: bool,
    /// 0 writes after every mutation
    #[serde(default)]
    pub save_debounce_ms: u64,
}

impl Default for TodoConfig {
    fn default() -> Self {
        TodoConfig {
            show_done: true,
            save_debounce_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoConfig {
    #[serde(default = "default_memo_debounce")]
    pub autosave_debounce_ms: u64,
}

impl Default for MemoConfig {
    fn default() -> Self {
        MemoConfig {
            autosave_debounce_ms: default_memo_debounce(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_tabs")]
    pub tabs: Vec<ChatTab>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            tabs: default_chat_tabs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTab {
    pub name: String,
    pub url: String,
}

fn default_true() -> bool {
    true
}

fn default_sizes() -> [u16; 3] {
    [40, 25, 35]
}

fn default_min_widths() -> [u16; 3] {
    [20, 20, 24]
}

fn default_memo_debounce() -> u64 {
    300
}

fn default_chat_tabs() -> Vec<ChatTab> {
    vec![ChatTab {
        name: "ChatGPT".into(),
        url: "https://chatgpt.com".into(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.ui.show_key_hints);
        assert_eq!(config.layout.sizes, [40, 25, 35]);
        assert_eq!(config.todo.save_debounce_ms, 0);
        assert!(config.todo.show_done);
        assert_eq!(config.memo.autosave_debounce_ms, 300);
        assert_eq!(config.chat.tabs.len(), 1);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
[todo]
show_done = false

[ui.colors]
highlight = "#00FF00"

[[chat.tabs]]
name = "Claude"
url = "https://claude.ai"

[[chat.tabs]]
name = "Search"
url = "https://duckduckgo.com"
"##,
        )
        .unwrap();
        assert!(!config.todo.show_done);
        assert_eq!(config.todo.save_debounce_ms, 0);
        assert_eq!(config.ui.colors["highlight"], "#00FF00");
        assert_eq!(config.chat.tabs[1].name, "Search");
        assert_eq!(config.layout.min_widths, [20, 20, 24]);
    }
}
