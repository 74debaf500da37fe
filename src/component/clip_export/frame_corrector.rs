//! 影格範圍修正模組
//!
//! 修正 blend-pose 片段的異常影格數，並重新排出無縫隙的影格配置

use super::manifest_parser::ClipRecord;

/// 修正結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionResult {
    /// 修正後的片段，與輸入同長度同順序
    pub clips: Vec<ClipRecord>,
    /// 被修正為單一影格的 blend-pose 片段數量
    pub blend_pose_count: usize,
}

/// 判斷片段名稱是否為 blend-pose 異常
///
/// 上游工具會把靜態姿勢誤報成多影格片段，名稱同時含有
/// `_blend` 與 `_pose_`（不分大小寫）時即視為異常。
#[must_use]
pub fn is_blend_pose(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("_blend") && lower.contains("_pose_")
}

/// 修正片段序列的影格配置
///
/// blend-pose 片段的影格數強制為 1，其餘片段維持原值；第一個片段保留
/// 清單上的起始影格，之後每個片段緊接在前一個修正後片段的結尾之後，
/// 原始清單中的縫隙與重疊因此都會被移除。
#[must_use]
pub fn correct_clip_sequence(clips: &[ClipRecord]) -> CorrectionResult {
    let mut corrected = Vec::with_capacity(clips.len());
    let mut blend_pose_count = 0;
    let mut next_start: Option<u32> = None;

    for clip in clips {
        let frame_count = if is_blend_pose(&clip.name) {
            if clip.frame_count != 1 {
                blend_pose_count += 1;
            }
            1
        } else {
            clip.frame_count
        };

        let start_frame = next_start.unwrap_or(clip.start_frame);
        // 重新排列後可能超出 u32 範圍，夾在上限避免 panic
        let end_frame = start_frame.saturating_add(frame_count - 1);
        next_start = Some(end_frame.saturating_add(1));

        corrected.push(ClipRecord {
            name: clip.name.clone(),
            start_frame,
            frame_count,
            end_frame,
            id: clip.id,
            original_frame_count: clip.original_frame_count,
        });
    }

    CorrectionResult {
        clips: corrected,
        blend_pose_count,
    }
}
