// 该文件是 Siyu （四隅） 项目的一部分。
// src/input.rs - 网络输出输入源
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

use thiserror::Error;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::PredictionFrame};

mod raw_directory;
mod raw_file;

pub use self::raw_directory::{RawDirectoryInput, RawDirectoryInputError};
pub use self::raw_file::{RawFileInput, RawFileInputError, decode_le_f32};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameQueryError {
  #[error("缺少参数: {0}")]
  MissingParameter(&'static str),
  #[error("参数 {key} 的取值无效: {value}")]
  InvalidParameter { key: String, value: String },
}

/// 输入 URL 中描述原图的查询参数：`width`、`height` 必填，`scale` 可选
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameQuery {
  pub image_width: u32,
  pub image_height: u32,
  pub scale: Option<f32>,
}

impl FrameQuery {
  pub fn from_url(url: &Url) -> Result<Self, FrameQueryError> {
    let mut width = None;
    let mut height = None;
    let mut scale = None;

    for (key, value) in url.query_pairs() {
      let invalid = || FrameQueryError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
      };
      match &*key {
        "width" => width = Some(value.parse::<u32>().map_err(|_| invalid())?),
        "height" => height = Some(value.parse::<u32>().map_err(|_| invalid())?),
        "scale" => scale = Some(value.parse::<f32>().map_err(|_| invalid())?),
        _ => {}
      }
    }

    Ok(FrameQuery {
      image_width: width.ok_or(FrameQueryError::MissingParameter("width"))?,
      image_height: height.ok_or(FrameQueryError::MissingParameter("height"))?,
      scale,
    })
  }

  pub fn frame(&self, data: Vec<f32>) -> PredictionFrame {
    let frame = PredictionFrame::new(data, self.image_width, self.image_height);
    match self.scale {
      Some(scale) => frame.with_scale(scale),
      None => frame,
    }
  }
}

#[derive(Error, Debug)]
pub enum InputError {
  #[error("原始输出文件输入错误: {0}")]
  RawFileInputError(#[from] RawFileInputError),
  #[error("原始输出目录输入错误: {0}")]
  RawDirectoryInputError(#[from] RawDirectoryInputError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
}

pub enum InputWrapper {
  RawFile(RawFileInput),
  RawDirectory(RawDirectoryInput),
}

impl FromUrl for InputWrapper {
  type Error = InputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      RawFileInput::SCHEME => Ok(InputWrapper::RawFile(RawFileInput::from_url(url)?)),
      RawDirectoryInput::SCHEME => Ok(InputWrapper::RawDirectory(RawDirectoryInput::from_url(
        url,
      )?)),
      _ => Err(InputError::SchemeMismatch),
    }
  }
}

impl Iterator for InputWrapper {
  type Item = PredictionFrame;

  fn next(&mut self) -> Option<Self::Item> {
    match self {
      InputWrapper::RawFile(input) => input.next(),
      InputWrapper::RawDirectory(input) => input.next(),
    }
  }
}
