// 该文件是 Siyu （四隅） 项目的一部分。
// src/input/raw_file.rs - 原始输出文件输入
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
use tracing::{error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::PredictionFrame,
  input::{FrameQuery, FrameQueryError},
  url_file_path,
};

#[derive(Error, Debug)]
pub enum RawFileInputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("查询参数错误: {0}")]
  QueryError(#[from] FrameQueryError),
  #[error("文件长度 {0} 不是 4 字节的整数倍")]
  Misaligned(usize),
}

/// 将小端序字节流解析为 f32 序列，长度不是 4 的倍数时返回 `None`
pub fn decode_le_f32(bytes: &[u8]) -> Option<Vec<f32>> {
  if bytes.len() % 4 != 0 {
    return None;
  }

  Some(
    bytes
      .chunks_exact(4)
      .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
      .collect(),
  )
}

pub(crate) fn read_raw_file(path: &Path) -> Result<Vec<f32>, RawFileInputError> {
  let bytes = std::fs::read(path)?;
  decode_le_f32(&bytes).ok_or(RawFileInputError::Misaligned(bytes.len()))
}

/// 单个小端序 f32 文件，例如 `raw:///data/pred.bin?width=1280&height=720`
pub struct RawFileInput {
  frame: Option<PredictionFrame>,
}

impl FromUrlWithScheme for RawFileInput {
  const SCHEME: &'static str = "raw";
}

impl FromUrl for RawFileInput {
  type Error = RawFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(RawFileInputError::SchemeMismatch);
    }

    let query = FrameQuery::from_url(url)?;
    let path = url_file_path(url);
    let data = read_raw_file(&path)?;
    info!("读取网络输出文件: {} ({} 个浮点数)", path.display(), data.len());

    Ok(RawFileInput {
      frame: Some(query.frame(data)),
    })
  }
}

impl Iterator for RawFileInput {
  type Item = PredictionFrame;

  fn next(&mut self) -> Option<Self::Item> {
    self.frame.take()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_little_endian() {
    let mut bytes = Vec::new();
    for v in [1.0f32, -2.5, 0.125] {
      bytes.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(decode_le_f32(&bytes), Some(vec![1.0, -2.5, 0.125]));
  }

  #[test]
  fn rejects_partial_value() {
    assert_eq!(decode_le_f32(&[0, 0, 128]), None);
    assert_eq!(decode_le_f32(&[]), Some(vec![]));
  }
}
