//! 動畫分段匯出元件
//!
//! 解析貼上的動畫清單、修正影格範圍，並逐一匯出 FBX 分段

mod batch_export;
mod fbx_command;
mod frame_corrector;
mod main;
mod manifest_parser;
mod maya_exporter;

pub use batch_export::{BatchResult, ClipExporter, ExportMode, ExportOutcome, run_batch};
pub use fbx_command::{FbxExportCommand, export_file_name, sanitize_clip_name, take_name};
pub use frame_corrector::{CorrectionResult, correct_clip_sequence, is_blend_pose};
pub use main::ClipExportTool;
pub use manifest_parser::{ClipRecord, ParsedManifest, parse_manifest};
pub use maya_exporter::MayaBatchExporter;
