// 该文件是 Siyu （四隅） 项目的一部分。
// src/input/raw_directory.rs - 原始输出目录输入
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

use std::{collections::VecDeque, path::PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};
use url::Url;

use super::raw_file::read_raw_file;
use crate::{
  FromUrl, FromUrlWithScheme,
  frame::PredictionFrame,
  input::{FrameQuery, FrameQueryError},
  url_file_path,
};

const RAW_FILE_EXTENSION: &str = "bin";

#[derive(Error, Debug)]
pub enum RawDirectoryInputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("查询参数错误: {0}")]
  QueryError(#[from] FrameQueryError),
}

/// 目录下所有 `*.bin` 文件按文件名顺序逐帧读取，
/// 例如 `rawdir:///data/preds?width=1280&height=720`
pub struct RawDirectoryInput {
  files: VecDeque<PathBuf>,
  query: FrameQuery,
}

impl FromUrlWithScheme for RawDirectoryInput {
  const SCHEME: &'static str = "rawdir";
}

impl FromUrl for RawDirectoryInput {
  type Error = RawDirectoryInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(RawDirectoryInputError::SchemeMismatch);
    }

    let query = FrameQuery::from_url(url)?;
    let directory = url_file_path(url);

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&directory)? {
      let path = entry?.path();
      if path.is_file() && path.extension().is_some_and(|ext| ext == RAW_FILE_EXTENSION) {
        files.push(path);
      }
    }
    files.sort();
    info!("目录 {} 中共有 {} 个输出文件", directory.display(), files.len());

    Ok(RawDirectoryInput {
      files: files.into(),
      query,
    })
  }
}

impl RawDirectoryInput {
  pub fn remaining(&self) -> usize {
    self.files.len()
  }
}

impl Iterator for RawDirectoryInput {
  type Item = PredictionFrame;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(path) = self.files.pop_front() {
      match read_raw_file(&path) {
        Ok(data) => {
          debug!("读取 {}", path.display());
          return Some(self.query.frame(data));
        }
        Err(e) => {
          error!("读取 {} 失败, 跳过: {}", path.display(), e);
        }
      }
    }
    None
  }
}
