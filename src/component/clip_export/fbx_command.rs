//! FBX 匯出指令模組
//!
//! 依片段影格範圍組出 Maya 端執行的 MEL 指令稿

use super::manifest_parser::ClipRecord;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static REGEX_ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Invalid regex"));

/// 清理片段名稱中的非法檔名字元
#[must_use]
pub fn sanitize_clip_name(name: &str) -> String {
    REGEX_ILLEGAL_CHARS.replace_all(name, "_").to_string()
}

/// 轉義要放進 MEL 雙引號字串的內容
fn escape_mel_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// 片段的 Take 名稱，`{name}_ID{id}`
#[must_use]
pub fn take_name(clip: &ClipRecord) -> String {
    format!("{}_ID{}", clip.name, clip.id)
}

/// 片段的匯出檔名，`{sanitized_name}_ID{id}.fbx`
#[must_use]
pub fn export_file_name(clip: &ClipRecord) -> String {
    format!("{}_ID{}.fbx", sanitize_clip_name(&clip.name), clip.id)
}

/// 單一片段的 FBX 匯出指令
pub struct FbxExportCommand {
    take_name: String,
    start_frame: u32,
    end_frame: u32,
    destination_path: PathBuf,
}

impl FbxExportCommand {
    #[must_use]
    pub fn new(clip: &ClipRecord, destination_dir: &Path) -> Self {
        Self {
            take_name: take_name(clip),
            start_frame: clip.start_frame,
            end_frame: clip.end_frame,
            destination_path: destination_dir.join(export_file_name(clip)),
        }
    }

    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// 組出完整的 MEL 指令稿
    ///
    /// 指令稿自行負責清理 take 分割狀態：不論 `FBXExport` 成功或失敗，
    /// 結尾都會執行 `FBXExportSplitAnimationIntoTakes -clear`。
    #[must_use]
    pub fn build_script(&self) -> String {
        // FBXExport 的路徑一律使用正斜線，與平台無關
        let export_path =
            escape_mel_string(&self.destination_path.to_string_lossy().replace('\\', "/"));
        let take_name = escape_mel_string(&self.take_name);

        let mut script = String::new();

        // 重設並設定動畫烘焙選項
        script.push_str("FBXResetExport;\n");
        script.push_str("FBXExportBakeComplexAnimation -v true;\n");
        script.push_str("FBXExportBakeComplexStep -v 1;\n");
        script.push_str("FBXExportAnimationOnly -v false;\n");
        script.push_str("FBXExportDeleteOriginalTakeOnSplitAnimation -v true;\n");
        script.push_str("FBXExportSmoothingGroups -v true;\n");
        script.push_str("FBXExportHardEdges -v false;\n");
        script.push_str("FBXExportTangents -v false;\n");
        script.push_str("FBXExportSmoothMesh -v true;\n");
        script.push_str("FBXExportInstances -v false;\n");
        script.push_str("FBXExportReferencedAssetsContent -v true;\n");
        script.push_str("FBXExportConvertUnitString \"cm\";\n");

        // 烘焙範圍與單一 take
        script.push_str("FBXExportSplitAnimationIntoTakes -clear;\n");
        script.push_str(&format!(
            "FBXExportBakeComplexStart -v {};\n",
            self.start_frame
        ));
        script.push_str(&format!("FBXExportBakeComplexEnd -v {};\n", self.end_frame));
        script.push_str(&format!(
            "FBXExportSplitAnimationIntoTakes -v \"{}\" {} {};\n",
            take_name, self.start_frame, self.end_frame
        ));

        // 沒有選取物件時改選所有可見的 transform
        script.push_str("string $sel[] = `ls -selection -long`;\n");
        script.push_str("if (size($sel) == 0) {\n");
        script.push_str("    string $xforms[] = `ls -type transform -long`;\n");
        script.push_str("    string $visible[];\n");
        script.push_str("    for ($obj in $xforms) {\n");
        script.push_str("        if (`getAttr ($obj + \".visibility\")`) {\n");
        script.push_str("            $visible[size($visible)] = $obj;\n");
        script.push_str("        }\n");
        script.push_str("    }\n");
        script.push_str("    if (size($visible) == 0) {\n");
        script.push_str(
            "        FBXExportSplitAnimationIntoTakes -clear;\n        error \"No visible objects found to export\";\n",
        );
        script.push_str("    }\n");
        script.push_str("    select -replace $visible;\n");
        script.push_str("}\n");

        // 匯出後無論成敗都清理 take 分割狀態
        script.push_str(&format!(
            "int $failed = catch(`FBXExport -f \"{export_path}\" -s`);\n"
        ));
        script.push_str("FBXExportSplitAnimationIntoTakes -clear;\n");
        script.push_str(&format!(
            "if ($failed) {{ error \"FBX export failed: {export_path}\"; }}\n"
        ));

        script
    }
}
