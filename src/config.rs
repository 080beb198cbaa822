// 该文件是 Siyu （四隅） 项目的一部分。
// src/config.rs - 解码参数配置
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
use tracing::{debug, warn};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme};

pub const YOLOX_INPUT_W: u32 = 640;
pub const YOLOX_INPUT_H: u32 = 640;
pub const YOLOX_STRIDES: [u32; 3] = [8, 16, 32];
pub const YOLOX_CLASS_NUM: usize = 6;
pub const YOLOX_CONF_THRESH: f32 = 0.3;
pub const YOLOX_NMS_THRESH: f32 = 0.45;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{actual}'")]
  SchemeMismatch {
    expected: &'static str,
    actual: String,
  },
  #[error("未知参数: {0}")]
  UnknownKey(String),
  #[error("参数 {key} 的取值无效: {value}")]
  InvalidValue { key: String, value: String },
  #[error("步长集合不能为空")]
  EmptyStrides,
  #[error("步长必须为正整数")]
  ZeroStride,
  #[error("类别数量必须大于 0")]
  ZeroClasses,
  #[error("输入尺寸无效: {0}x{1}")]
  InvalidInputSize(u32, u32),
  #[error("阈值 {name} 无效: {value}")]
  InvalidThreshold { name: &'static str, value: f32 },
}

impl ConfigError {
  fn invalid(key: &str, value: &str) -> Self {
    ConfigError::InvalidValue {
      key: key.to_string(),
      value: value.to_string(),
    }
  }
}

/// YOLOX 后处理的可调参数
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeConfig {
  input_width: u32,
  input_height: u32,
  strides: Vec<u32>,
  num_classes: usize,
  conf_threshold: f32,
  nms_threshold: f32,
}

impl Default for DecodeConfig {
  fn default() -> Self {
    Self {
      input_width: YOLOX_INPUT_W,
      input_height: YOLOX_INPUT_H,
      strides: YOLOX_STRIDES.to_vec(),
      num_classes: YOLOX_CLASS_NUM,
      conf_threshold: YOLOX_CONF_THRESH,
      nms_threshold: YOLOX_NMS_THRESH,
    }
  }
}

impl DecodeConfig {
  pub fn input_size(mut self, width: u32, height: u32) -> Self {
    self.input_width = width;
    self.input_height = height;
    self
  }

  pub fn strides(mut self, strides: &[u32]) -> Self {
    self.strides = strides.to_vec();
    self
  }

  pub fn num_classes(mut self, num_classes: usize) -> Self {
    self.num_classes = num_classes;
    self
  }

  pub fn conf_threshold(mut self, threshold: f32) -> Self {
    self.conf_threshold = threshold;
    self
  }

  pub fn nms_threshold(mut self, threshold: f32) -> Self {
    self.nms_threshold = threshold;
    self
  }

  pub fn input_width(&self) -> u32 {
    self.input_width
  }

  pub fn input_height(&self) -> u32 {
    self.input_height
  }

  pub fn stride_set(&self) -> &[u32] {
    &self.strides
  }

  pub fn class_count(&self) -> usize {
    self.num_classes
  }

  pub fn confidence(&self) -> f32 {
    self.conf_threshold
  }

  pub fn iou_threshold(&self) -> f32 {
    self.nms_threshold
  }

  /// 检查配置是否可用于解码
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.input_width == 0 || self.input_height == 0 {
      return Err(ConfigError::InvalidInputSize(
        self.input_width,
        self.input_height,
      ));
    }
    if self.strides.is_empty() {
      return Err(ConfigError::EmptyStrides);
    }
    if self.strides.contains(&0) {
      return Err(ConfigError::ZeroStride);
    }
    if self.num_classes == 0 {
      return Err(ConfigError::ZeroClasses);
    }
    if !self.conf_threshold.is_finite() {
      return Err(ConfigError::InvalidThreshold {
        name: "conf",
        value: self.conf_threshold,
      });
    }
    if !self.nms_threshold.is_finite() {
      return Err(ConfigError::InvalidThreshold {
        name: "nms",
        value: self.nms_threshold,
      });
    }

    // 不能整除时网格按向下取整截断，必须与模型训练时的布局一致
    for &stride in &self.strides {
      if self.input_width % stride != 0 || self.input_height % stride != 0 {
        warn!(
          "步长 {} 不能整除输入尺寸 {}x{}, 网格将被截断",
          stride, self.input_width, self.input_height
        );
      }
    }

    Ok(())
  }
}

impl FromUrlWithScheme for DecodeConfig {
  const SCHEME: &'static str = "yolox";
}

impl FromUrl for DecodeConfig {
  type Error = ConfigError;

  /// 形如 `yolox:?classes=6&conf=0.3&nms=0.45&strides=8,16,32&size=640x640`，
  /// 未给出的参数取默认值
  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(ConfigError::SchemeMismatch {
        expected: Self::SCHEME,
        actual: url.scheme().to_string(),
      });
    }

    let mut config = DecodeConfig::default();
    for (key, value) in url.query_pairs() {
      match &*key {
        "classes" => {
          config.num_classes = value
            .parse()
            .map_err(|_| ConfigError::invalid(&key, &value))?;
        }
        "conf" => {
          config.conf_threshold = value
            .parse()
            .map_err(|_| ConfigError::invalid(&key, &value))?;
        }
        "nms" => {
          config.nms_threshold = value
            .parse()
            .map_err(|_| ConfigError::invalid(&key, &value))?;
        }
        "strides" => {
          config.strides = value
            .split(',')
            .map(|s| s.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::invalid(&key, &value))?;
        }
        "size" => {
          let (w, h) = value
            .split_once('x')
            .ok_or_else(|| ConfigError::invalid(&key, &value))?;
          config.input_width = w.parse().map_err(|_| ConfigError::invalid(&key, &value))?;
          config.input_height = h.parse().map_err(|_| ConfigError::invalid(&key, &value))?;
        }
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
      }
    }

    config.validate()?;
    debug!("解码配置: {:?}", config);
    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(s: &str) -> Result<DecodeConfig, ConfigError> {
    DecodeConfig::from_url(&Url::parse(s).unwrap())
  }

  #[test]
  fn bare_scheme_gives_defaults() {
    assert_eq!(parse("yolox:").unwrap(), DecodeConfig::default());
  }

  #[test]
  fn query_overrides_defaults() {
    let config = parse("yolox:?classes=80&conf=0.25&nms=0.5&strides=8,16&size=416x320").unwrap();
    assert_eq!(config.class_count(), 80);
    assert_eq!(config.confidence(), 0.25);
    assert_eq!(config.iou_threshold(), 0.5);
    assert_eq!(config.stride_set(), &[8, 16]);
    assert_eq!((config.input_width(), config.input_height()), (416, 320));
  }

  #[test]
  fn rejects_wrong_scheme() {
    assert!(matches!(
      parse("raw:///tmp/a.bin"),
      Err(ConfigError::SchemeMismatch { .. })
    ));
  }

  #[test]
  fn rejects_bad_values() {
    assert!(matches!(
      parse("yolox:?classes=many"),
      Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
      parse("yolox:?size=640"),
      Err(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(parse("yolox:?strides=8,0"), Err(ConfigError::ZeroStride));
    assert_eq!(parse("yolox:?classes=0"), Err(ConfigError::ZeroClasses));
    assert_eq!(
      parse("yolox:?colour=red"),
      Err(ConfigError::UnknownKey("colour".to_string()))
    );
  }

  #[test]
  fn non_finite_threshold_is_invalid() {
    let config = DecodeConfig::default().conf_threshold(f32::NAN);
    assert!(matches!(
      config.validate(),
      Err(ConfigError::InvalidThreshold { name: "conf", .. })
    ));
  }
}
