// 该文件是 Siyu （四隅） 项目的一部分。
// src/output/console.rs - 日志输出
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

use std::path::Path;

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::PredictionFrame,
  model::DetectResult,
  output::{LabelTable, LabelTableError, Render},
};

#[derive(Error, Debug)]
pub enum ConsoleOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("标签表错误: {0}")]
  LabelTableError(#[from] LabelTableError),
}

/// 把检测结果逐条写入日志，`console:` 或 `console:?labels=/path/labels.json`
pub struct ConsoleOutput {
  labels: LabelTable,
}

impl ConsoleOutput {
  pub fn new(labels: LabelTable) -> Self {
    Self { labels }
  }

  pub fn format_lines(&self, result: &DetectResult) -> Vec<String> {
    result
      .iter()
      .map(|det| {
        format!(
          "{} = {:.5} at {:.2} {:.2} {:.2} x {:.2}",
          self.labels.name(det.label),
          det.score,
          det.bbox.x,
          det.bbox.y,
          det.bbox.width,
          det.bbox.height
        )
      })
      .collect()
  }
}

impl FromUrlWithScheme for ConsoleOutput {
  const SCHEME: &'static str = "console";
}

impl FromUrl for ConsoleOutput {
  type Error = ConsoleOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ConsoleOutputError::SchemeMismatch);
    }

    let labels = match url.query_pairs().find(|(k, _)| k == "labels") {
      Some((_, path)) => LabelTable::from_json_file(Path::new(&*path))?,
      None => LabelTable::default(),
    };

    Ok(ConsoleOutput::new(labels))
  }
}

impl Render<PredictionFrame, DetectResult> for ConsoleOutput {
  type Error = ConsoleOutputError;

  fn render_result(&self, frame: &PredictionFrame, result: &DetectResult) -> Result<(), Self::Error> {
    info!(
      "原图 {}x{}: 检测到 {} 个目标",
      frame.image_width(),
      frame.image_height(),
      result.len()
    );
    for line in self.format_lines(result) {
      info!("  {}", line);
    }
    Ok(())
  }
}
