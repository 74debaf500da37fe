//! 動畫清單解析模組
//!
//! 解析 Noesis fmt_RE_MESH 插件輸出的動畫清單文字

use log::warn;
use regex::Regex;
use std::sync::LazyLock;

/// 一個動畫片段的影格範圍資料
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRecord {
    /// 片段名稱（可能含有檔名不允許的字元）
    pub name: String,
    /// 在共用時間軸上的起始影格
    pub start_frame: u32,
    /// 影格數量（至少 1）
    pub frame_count: u32,
    /// 結束影格，`start_frame + frame_count - 1`
    pub end_frame: u32,
    /// 上游工具給的片段 ID（不保證唯一）
    pub id: u32,
    /// 修正前的原始影格數量
    pub original_frame_count: u32,
}

/// 解析結果
#[derive(Debug, Default)]
pub struct ParsedManifest {
    /// 依出現順序排列的片段
    pub clips: Vec<ClipRecord>,
    /// 以 `@` 開頭但不符合格式而被跳過的行
    pub skipped_lines: Vec<String>,
}

// 上游清單行格式: @ 0 'animation_name (165 frames) ID: 0
static REGEX_CLIP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@\s*(\d+)\s*['"]([^'"]*)\s*\((\d+)\s*frames\).*ID:\s*(\d+)"#)
        .expect("Invalid regex")
});

/// 解析貼上的動畫清單文字
///
/// 只有修剪空白後以 `@` 開頭的行才會被視為候選行；候選行不符合格式時
/// 記錄診斷並繼續，不以 `@` 開頭的行（含空白行）直接忽略。
#[must_use]
pub fn parse_manifest(text: &str) -> ParsedManifest {
    let mut result = ParsedManifest::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || !line.starts_with('@') {
            continue;
        }

        match parse_clip_line(line) {
            Some(clip) => result.clips.push(clip),
            None => {
                warn!("Could not parse manifest line: {line}");
                result.skipped_lines.push(line.to_string());
            }
        }
    }

    result
}

/// 解析單一候選行，不符合格式時回傳 `None`
fn parse_clip_line(line: &str) -> Option<ClipRecord> {
    let captures = REGEX_CLIP_LINE.captures(line)?;

    let start_frame: u32 = captures[1].parse().ok()?;
    let name = captures[2].trim().to_string();
    let frame_count: u32 = captures[3].parse().ok()?;
    let id: u32 = captures[4].parse().ok()?;

    // 片段至少要佔一個影格
    if frame_count == 0 {
        return None;
    }

    // 結束影格超出 u32 範圍的行視為格式錯誤
    let end_frame = start_frame.checked_add(frame_count - 1)?;

    Some(ClipRecord {
        name,
        start_frame,
        frame_count,
        end_frame,
        id,
        original_frame_count: frame_count,
    })
}
