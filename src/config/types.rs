use serde::{Deserialize, Serialize};
use std::fmt;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 10;

/// 介面語言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::EnUs
    }
}

/// 使用者設定，持久化在 settings.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    /// Maya 批次執行檔路徑
    pub maya_binary: String,
    /// 上次使用的場景檔案
    pub last_scene: String,
    /// 最近使用的匯出資料夾，新的在前
    pub recent_paths: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            maya_binary: "mayabatch".to_string(),
            last_scene: String::new(),
            recent_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = UserSettings::default();
        assert_eq!(settings.language, Language::EnUs);
        assert_eq!(settings.maya_binary, "mayabatch");
        assert!(settings.recent_paths.is_empty());
    }

    #[test]
    fn test_language_round_trip() {
        let json = serde_json::to_string(&Language::ZhTw).unwrap();
        assert_eq!(json, "\"zh-TW\"");
        let parsed: Language = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Language::ZhTw);
    }

    #[test]
    fn test_settings_deserialize_with_missing_fields() {
        let settings: UserSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.maya_binary, "mayabatch");
    }
}
