// 该文件是 Siyu （四隅） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU16, Ordering};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::PredictionFrame,
  model::{BBox, DetectResult, Point},
  output::{LabelTable, LabelTableError, Render, palette_color},
  url_file_path,
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 错误: {0}")]
  JsonError(#[from] serde_json::Error),
  #[error("标签表错误: {0}")]
  LabelTableError(#[from] LabelTableError),
}

#[derive(Debug, Serialize)]
struct DetectionRecord<'a> {
  label: usize,
  name: &'a str,
  score: f32,
  bbox: BBox,
  polygon: [Point; 4],
  color: [u8; 3],
}

#[derive(Debug, Serialize)]
struct FrameRecord<'a> {
  image_width: u32,
  image_height: u32,
  scale: Option<f32>,
  detections: Vec<DetectionRecord<'a>>,
}

/// 每帧检测结果写成一个 JSON 文件，按日期分目录存放：
/// `folder:///data/records?labels=/path/labels.json&always`
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  labels: LabelTable,
  frame_counter: AtomicU16,
  always: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let labels = match uri.query_pairs().find(|(k, _)| k == "labels") {
      Some((_, path)) => LabelTable::from_json_file(Path::new(&*path))?,
      None => LabelTable::default(),
    };
    let always = uri.query_pairs().any(|(k, _)| k == "always");

    Ok(DirectoryRecordOutput::new(url_file_path(uri), labels, always))
  }
}

impl DirectoryRecordOutput {
  pub fn new(directory: PathBuf, labels: LabelTable, always: bool) -> Self {
    Self {
      directory,
      labels,
      frame_counter: AtomicU16::new(0),
      always,
    }
  }

  fn frame_id(&self) -> u16 {
    self.frame_counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
  }

  fn frame_path(&self, now: DateTime<Utc>) -> Result<PathBuf, DirectoryRecordOutputError> {
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    std::fs::create_dir_all(&directory)?;

    Ok(directory.join(format!(
      "{}-{:04X}.json",
      now.format("%H-%M-%S"),
      self.frame_id()
    )))
  }

  fn record<'a>(&'a self, frame: &PredictionFrame, result: &DetectResult) -> FrameRecord<'a> {
    FrameRecord {
      image_width: frame.image_width(),
      image_height: frame.image_height(),
      scale: frame.scale(),
      detections: result
        .iter()
        .map(|det| DetectionRecord {
          label: det.label,
          name: self.labels.name(det.label),
          score: det.score,
          bbox: det.bbox,
          polygon: det.polygon,
          color: palette_color(det.label),
        })
        .collect(),
    }
  }
}

impl Render<PredictionFrame, DetectResult> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, frame: &PredictionFrame, result: &DetectResult) -> Result<(), Self::Error> {
    if !self.always && result.is_empty() {
      return Ok(());
    }

    let path = self.frame_path(Utc::now())?;
    let content = serde_json::to_string_pretty(&self.record(frame, result))?;
    std::fs::write(&path, content)?;
    debug!("记录写入 {}", path.display());
    Ok(())
  }
}
