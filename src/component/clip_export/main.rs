//! 動畫分段匯出主模組
//!
//! 協調清單貼上、解析、影格修正與批次匯出的整體流程

use super::batch_export::{BatchResult, ExportMode, run_batch};
use super::frame_corrector::correct_clip_sequence;
use super::manifest_parser::{ClipRecord, ParsedManifest, parse_manifest};
use super::maya_exporter::MayaBatchExporter;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::{validate_directory_exists, validate_file_exists};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 失敗清單最多列出的片段數
const MAX_FAILURE_PREVIEW: usize = 5;

/// 動畫分段匯出工具
pub struct ClipExportTool {
    shutdown_signal: Arc<AtomicBool>,
}

impl ClipExportTool {
    #[must_use]
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    pub fn run(&self, term: &Term, config: &mut Config) -> Result<()> {
        println!("{}", style(t!("export.title")).cyan().bold());

        let Some(text) = self.read_manifest_text(term)? else {
            println!("{}", style(t!("export.no_text")).yellow());
            return Ok(());
        };

        let parsed = parse_manifest(&text);
        self.report_skipped_lines(&parsed);

        if parsed.clips.is_empty() {
            println!("{}", style(t!("export.no_clips")).yellow());
            return Ok(());
        }
        println!(
            "{}",
            style(t!("export.parsed_count", count = parsed.clips.len())).green()
        );

        let correction = correct_clip_sequence(&parsed.clips);
        if correction.blend_pose_count > 0 {
            println!(
                "{}",
                style(t!(
                    "export.corrected_count",
                    count = correction.blend_pose_count
                ))
                .yellow()
            );
        }

        self.display_preview(&correction.clips);

        let Some(mode) = self.prompt_export_mode(&correction.clips)? else {
            println!("{}", style(t!("export.cancelled")).yellow());
            return Ok(());
        };

        let Some(destination) = self.prompt_destination(config)? else {
            println!("{}", style(t!("export.cancelled")).yellow());
            return Ok(());
        };

        let scene_path = self.prompt_scene_file(config)?;

        if !self.confirm_export(&correction.clips, mode, &destination)? {
            println!("{}", style(t!("export.cancelled")).yellow());
            return Ok(());
        }

        println!("{}", style(t!("export.exporting")).cyan());
        let exporter =
            MayaBatchExporter::new(config.settings.maya_binary.clone(), scene_path);
        let result = run_batch(
            &correction.clips,
            mode,
            &destination,
            &exporter,
            &self.shutdown_signal,
        )?;

        self.display_summary(&result);
        Ok(())
    }

    /// 從終端機讀取多行清單文字，空白行結束
    fn read_manifest_text(&self, term: &Term) -> Result<Option<String>> {
        println!("{}", style(t!("export.paste_prompt")).bold());
        println!("{}", style(t!("export.paste_example")).dim());

        let mut lines = Vec::new();
        loop {
            let line = term.read_line()?;
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }

        let text = lines.join("\n");
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }

    fn report_skipped_lines(&self, parsed: &ParsedManifest) {
        for line in &parsed.skipped_lines {
            println!(
                "{} {}",
                style(t!("export.skipped_line")).yellow(),
                style(line).dim()
            );
        }
    }

    fn display_preview(&self, clips: &[ClipRecord]) {
        println!();
        println!("{}", style(t!("export.preview_title")).cyan());
        for clip in clips {
            let mut line = format!(
                "{} (Frames: {}-{}, ID: {})",
                clip.name, clip.start_frame, clip.end_frame, clip.id
            );
            if clip.frame_count != clip.original_frame_count {
                line.push_str(&format!(
                    " [{}]",
                    t!("export.was_frames", count = clip.original_frame_count)
                ));
            }
            println!("  {line}");
        }
        println!();
    }

    fn prompt_export_mode(&self, clips: &[ClipRecord]) -> Result<Option<ExportMode>> {
        let options = vec![t!("export.mode_all"), t!("export.mode_single")];
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("export.mode_prompt"))
            .items(&options)
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => Ok(Some(ExportMode::AllClips)),
            Some(1) => {
                let items: Vec<String> = clips
                    .iter()
                    .map(|clip| {
                        format!(
                            "{} (Frames: {}-{}, ID: {})",
                            clip.name, clip.start_frame, clip.end_frame, clip.id
                        )
                    })
                    .collect();
                let index = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt(t!("export.clip_prompt"))
                    .items(&items)
                    .default(0)
                    .interact_opt()?;
                Ok(index.map(ExportMode::SingleClip))
            }
            _ => Ok(None),
        }
    }

    /// 選擇匯出資料夾
    ///
    /// 有最近使用紀錄時先列出清單，空白輸入或 ESC 視為取消。
    fn prompt_destination(&self, config: &mut Config) -> Result<Option<PathBuf>> {
        let recent = config.settings.recent_paths.clone();

        let path = if recent.is_empty() {
            self.prompt_destination_input()?
        } else {
            let mut items = recent.clone();
            items.push(t!("export.dest_new").to_string());

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(t!("export.dest_recent_prompt"))
                .items(&items)
                .default(0)
                .interact_opt()?;

            match selection {
                Some(i) if i < recent.len() => Some(PathBuf::from(&recent[i])),
                Some(_) => self.prompt_destination_input()?,
                None => None,
            }
        };

        let Some(path) = path else {
            return Ok(None);
        };
        validate_directory_exists(&path)?;

        add_recent_path(&mut config.settings, &path.to_string_lossy());
        save_settings(&config.settings)?;

        Ok(Some(path))
    }

    fn prompt_destination_input(&self) -> Result<Option<PathBuf>> {
        let input: String = Input::new()
            .with_prompt(t!("export.dest_prompt").to_string())
            .allow_empty(true)
            .interact_text()?;

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(trimmed)))
    }

    fn prompt_scene_file(&self, config: &mut Config) -> Result<PathBuf> {
        let mut prompt = Input::new().with_prompt(t!("export.scene_prompt").to_string());
        if !config.settings.last_scene.is_empty() {
            prompt = prompt.default(config.settings.last_scene.clone());
        }
        let input: String = prompt.interact_text()?;

        let path = PathBuf::from(input.trim());
        validate_file_exists(&path)?;

        config.settings.last_scene = path.to_string_lossy().to_string();
        save_settings(&config.settings)?;

        Ok(path)
    }

    fn confirm_export(
        &self,
        clips: &[ClipRecord],
        mode: ExportMode,
        destination: &Path,
    ) -> Result<bool> {
        let prompt = match mode {
            ExportMode::AllClips => t!(
                "export.confirm_all",
                count = clips.len(),
                path = destination.display()
            ),
            ExportMode::SingleClip(index) => t!(
                "export.confirm_single",
                name = clips[index].name,
                path = destination.display()
            ),
        };

        let confirmed = Confirm::new()
            .with_prompt(prompt.to_string())
            .default(true)
            .interact()?;
        Ok(confirmed)
    }

    fn display_summary(&self, result: &BatchResult) {
        println!();
        println!("{}", style(t!("export.summary_title")).cyan().bold());
        println!(
            "  {} {}",
            t!("export.attempted"),
            result.attempted()
        );
        println!(
            "  {} {}",
            t!("export.succeeded"),
            style(result.succeeded()).green()
        );
        if result.failed() > 0 {
            println!("  {} {}", t!("export.failed"), style(result.failed()).red());
            println!();
            println!("{}", style(t!("export.failed_list")).red());

            let failures = result.failures();
            for outcome in failures.iter().take(MAX_FAILURE_PREVIEW) {
                let reason = outcome.error.as_deref().unwrap_or("unknown");
                println!("  {}: {}", style(&outcome.clip_name).red(), reason);
            }
            if failures.len() > MAX_FAILURE_PREVIEW {
                println!(
                    "  {}",
                    style(t!(
                        "export.more_failures",
                        count = failures.len() - MAX_FAILURE_PREVIEW
                    ))
                    .dim()
                );
            }
        }
    }
}
