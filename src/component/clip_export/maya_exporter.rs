//! Maya 批次匯出模組
//!
//! 透過 Maya 的批次模式執行單一片段的 FBX 匯出

use super::batch_export::ClipExporter;
use super::fbx_command::FbxExportCommand;
use super::manifest_parser::ClipRecord;
use anyhow::{Context, Result, bail};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// stderr 太長時只保留結尾這麼多字元
const STDERR_TAIL_LIMIT: usize = 500;

/// 以 `maya -batch` 執行匯出的 `ClipExporter` 實作
pub struct MayaBatchExporter {
    maya_binary: String,
    scene_path: PathBuf,
}

impl MayaBatchExporter {
    #[must_use]
    pub fn new(maya_binary: String, scene_path: PathBuf) -> Self {
        Self {
            maya_binary,
            scene_path,
        }
    }

    fn build_command(&self, script: &str) -> Command {
        let mut cmd = Command::new(&self.maya_binary);
        cmd.arg("-batch")
            .arg("-file")
            .arg(&self.scene_path)
            .arg("-command")
            .arg(script);
        cmd
    }
}

impl ClipExporter for MayaBatchExporter {
    fn export(&self, clip: &ClipRecord, destination_dir: &Path) -> Result<()> {
        let export_command = FbxExportCommand::new(clip, destination_dir);
        let script = export_command.build_script();
        debug!("MEL script for {}:\n{script}", clip.name);

        let output = self
            .build_command(&script)
            .output()
            .with_context(|| format!("無法執行 Maya 批次程式: {}", self.maya_binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr_tail(&stderr);
            bail!("Maya 匯出失敗 ({}): {}", output.status, tail);
        }

        Ok(())
    }
}

fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= STDERR_TAIL_LIMIT {
        trimmed.to_string()
    } else {
        chars[chars.len() - STDERR_TAIL_LIMIT..].iter().collect()
    }
}
