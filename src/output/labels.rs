// 该文件是 Siyu （四隅） 项目的一部分。
// src/output/labels.rs - 类别名称与配色
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

/// 默认的六类装甲板标签
pub const ARMOR_CLASSES: [&str; 6] = ["B_4", "R_G", "R_3", "R_4", "R_Bb", "N_3"];

const PALETTE_SIZE: usize = 80;
const UNKNOWN_LABEL: &str = "unknown";

#[derive(Error, Debug)]
pub enum LabelTableError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("标签文件格式错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 类别下标到名称的映射，只供输出端使用
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
  names: Vec<String>,
}

impl Default for LabelTable {
  fn default() -> Self {
    Self::new(ARMOR_CLASSES.iter().map(|s| s.to_string()).collect())
  }
}

impl LabelTable {
  pub fn new(names: Vec<String>) -> Self {
    Self { names }
  }

  /// 从 JSON 字符串数组文件加载，例如 `["person", "car"]`
  pub fn from_json_file(path: &Path) -> Result<Self, LabelTableError> {
    let content = std::fs::read_to_string(path)?;
    let names: Vec<String> = serde_json::from_str(&content)?;
    info!("从 {} 加载 {} 个类别名称", path.display(), names.len());
    Ok(Self::new(names))
  }

  pub fn name(&self, label: usize) -> &str {
    self
      .names
      .get(label)
      .map(String::as_str)
      .unwrap_or(UNKNOWN_LABEL)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

/// 按类别下标取颜色，80 种色相均匀分布，超出后循环
pub fn palette_color(label: usize) -> [u8; 3] {
  let hue = ((label % PALETTE_SIZE) as f32 / PALETTE_SIZE as f32) * 360.0;
  hsv_to_rgb(hue, 0.8, 0.9)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
  let c = v * s;
  let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
  let m = v - c;

  let (r, g, b) = if h < 60.0 {
    (c, x, 0.0)
  } else if h < 120.0 {
    (x, c, 0.0)
  } else if h < 180.0 {
    (0.0, c, x)
  } else if h < 240.0 {
    (0.0, x, c)
  } else if h < 300.0 {
    (x, 0.0, c)
  } else {
    (c, 0.0, x)
  };

  [
    ((r + m) * 255.0) as u8,
    ((g + m) * 255.0) as u8,
    ((b + m) * 255.0) as u8,
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_table_names() {
    let labels = LabelTable::default();
    assert_eq!(labels.len(), 6);
    assert_eq!(labels.name(0), "B_4");
    assert_eq!(labels.name(5), "N_3");
    assert_eq!(labels.name(6), "unknown");
  }

  #[test]
  fn palette_wraps_and_differs() {
    assert_eq!(palette_color(3), palette_color(83));
    assert_ne!(palette_color(0), palette_color(1));
    // 色相 0 为偏红色
    let [r, g, b] = palette_color(0);
    assert!(r > g && r > b);
  }
}
