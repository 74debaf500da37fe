//! 整合測試 - 驗證解析 → 影格修正 → 批次匯出的完整流程

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anim_take_export::component::clip_export::{
    ClipExporter, ClipRecord, ExportMode, FbxExportCommand, correct_clip_sequence,
    export_file_name, parse_manifest, run_batch,
};
use anyhow::{Result, anyhow};
use std::cell::RefCell;

const SAMPLE_MANIFEST: &str = "\
@ 0 'walk_cycle (120 frames) loop ID: 0
@ 0 'walk (120 frames ID 0
@ 120 'idle_blend01_pose_A (60 frames) ID: 1
@ 300 'run/fast:dash (80 frames) ID: 2
Noesis log line, ignored
";

/// 把每個片段寫成一個假的 .fbx 檔案的測試替身
struct FileWritingExporter;

impl ClipExporter for FileWritingExporter {
    fn export(&self, clip: &ClipRecord, destination_dir: &Path) -> Result<()> {
        let path = destination_dir.join(export_file_name(clip));
        fs::write(&path, format!("{}-{}", clip.start_frame, clip.end_frame))?;
        Ok(())
    }
}

/// 指定名稱必定失敗的測試替身
struct FailingExporter {
    fail_name: String,
    exported: RefCell<Vec<String>>,
}

impl ClipExporter for FailingExporter {
    fn export(&self, clip: &ClipRecord, _destination_dir: &Path) -> Result<()> {
        self.exported.borrow_mut().push(clip.name.clone());
        if clip.name == self.fail_name {
            return Err(anyhow!("simulated host failure"));
        }
        Ok(())
    }
}

fn no_shutdown() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

/// 測試 1: 清單解析，含跳過無法解析的行
#[test]
fn test_manifest_parsing_with_diagnostics() {
    let parsed = parse_manifest(SAMPLE_MANIFEST);

    assert_eq!(parsed.clips.len(), 3, "應該解析出 3 個片段");
    assert_eq!(parsed.skipped_lines.len(), 1, "應該有 1 行被跳過");
    assert!(parsed.skipped_lines[0].contains("'walk (120 frames ID 0"));

    let names: Vec<&str> = parsed.clips.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["walk_cycle", "idle_blend01_pose_A", "run/fast:dash"]);

    println!("✓ 清單解析測試通過");
}

/// 測試 2: 影格修正後的無縫隙配置
#[test]
fn test_correction_produces_contiguous_layout() {
    let parsed = parse_manifest(SAMPLE_MANIFEST);
    let correction = correct_clip_sequence(&parsed.clips);

    assert_eq!(correction.blend_pose_count, 1);

    // blend-pose 片段被強制為單一影格
    let pose = &correction.clips[1];
    assert_eq!(pose.frame_count, 1);
    assert_eq!(pose.original_frame_count, 60);
    assert_eq!(pose.start_frame, 120);
    assert_eq!(pose.end_frame, 120);

    // 原始清單中 300 起始的縫隙被移除
    assert_eq!(correction.clips[2].start_frame, 121);

    for i in 1..correction.clips.len() {
        assert_eq!(
            correction.clips[i].start_frame,
            correction.clips[i - 1].end_frame + 1,
            "片段 {i} 必須緊接前一個片段"
        );
    }

    // 再修正一次結果不變
    let twice = correct_clip_sequence(&correction.clips);
    assert_eq!(twice.clips, correction.clips);

    println!("✓ 影格修正測試通過");
}

/// 測試 3: 完整流程 - 解析、修正、匯出所有片段到資料夾
#[test]
fn test_end_to_end_export_all() {
    let dir = tempfile::tempdir().unwrap();

    let parsed = parse_manifest(SAMPLE_MANIFEST);
    let correction = correct_clip_sequence(&parsed.clips);

    let result = run_batch(
        &correction.clips,
        ExportMode::AllClips,
        dir.path(),
        &FileWritingExporter,
        &no_shutdown(),
    )
    .unwrap();

    assert_eq!(result.attempted(), 3);
    assert_eq!(result.succeeded(), 3);
    assert_eq!(result.failed(), 0);

    // 非法字元被換成底線後的檔名
    assert!(dir.path().join("walk_cycle_ID0.fbx").exists());
    assert!(dir.path().join("idle_blend01_pose_A_ID1.fbx").exists());
    assert!(dir.path().join("run_fast_dash_ID2.fbx").exists());

    // 匯出的影格範圍是修正後的範圍
    let content = fs::read_to_string(dir.path().join("idle_blend01_pose_A_ID1.fbx")).unwrap();
    assert_eq!(content, "120-120");

    println!("✓ 完整匯出流程測試通過");
}

/// 測試 4: 單一片段失敗不影響其餘片段
#[test]
fn test_batch_failure_isolation() {
    let dir = tempfile::tempdir().unwrap();

    let manifest = "@ 0 'a (10 frames) ID: 0\n@ 10 'b (10 frames) ID: 1\n@ 20 'c (10 frames) ID: 2";
    let clips = correct_clip_sequence(&parse_manifest(manifest).clips).clips;

    let exporter = FailingExporter {
        fail_name: "b".to_string(),
        exported: RefCell::new(Vec::new()),
    };
    let result = run_batch(
        &clips,
        ExportMode::AllClips,
        dir.path(),
        &exporter,
        &no_shutdown(),
    )
    .unwrap();

    assert_eq!(result.attempted(), 3);
    assert_eq!(result.succeeded(), 2);
    assert_eq!(result.failed(), 1);

    let failures = result.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].clip_name, "b");
    assert!(failures[0].error.as_deref().unwrap().contains("simulated host failure"));

    // b 失敗後 c 仍被匯出
    assert_eq!(
        *exporter.exported.borrow(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );

    println!("✓ 批次失敗隔離測試通過");
}

/// 測試 5: 單一片段模式與索引驗證
#[test]
fn test_single_clip_mode() {
    let dir = tempfile::tempdir().unwrap();

    let manifest = "@ 0 'a (10 frames) ID: 0\n@ 10 'b (10 frames) ID: 1";
    let clips = correct_clip_sequence(&parse_manifest(manifest).clips).clips;

    let result = run_batch(
        &clips,
        ExportMode::SingleClip(1),
        dir.path(),
        &FileWritingExporter,
        &no_shutdown(),
    )
    .unwrap();

    assert_eq!(result.attempted(), 1);
    assert!(dir.path().join("b_ID1.fbx").exists());
    assert!(!dir.path().join("a_ID0.fbx").exists());

    // 超出範圍的索引是前置條件錯誤，不會匯出任何片段
    let invalid = run_batch(
        &clips,
        ExportMode::SingleClip(2),
        dir.path(),
        &FileWritingExporter,
        &no_shutdown(),
    );
    assert!(invalid.is_err());

    println!("✓ 單一片段模式測試通過");
}

/// 測試 6: MEL 指令稿含有修正後的烘焙範圍
#[test]
fn test_mel_script_uses_corrected_ranges() {
    let parsed = parse_manifest(SAMPLE_MANIFEST);
    let correction = correct_clip_sequence(&parsed.clips);

    let pose = &correction.clips[1];
    let script = FbxExportCommand::new(pose, Path::new("/exports")).build_script();

    assert!(script.contains("FBXExportBakeComplexStart -v 120;"));
    assert!(script.contains("FBXExportBakeComplexEnd -v 120;"));
    assert!(
        script.contains("FBXExportSplitAnimationIntoTakes -v \"idle_blend01_pose_A_ID1\" 120 120;")
    );

    println!("✓ MEL 指令稿測試通過");
}
