// 该文件是 Siyu （四隅） 项目的一部分。
// src/postprocess.rs - YOLOX 四点框后处理
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
use tracing::{debug, error};
use url::Url;

use crate::{
  FromUrl,
  config::{ConfigError, DecodeConfig},
  frame::{PredictionFrame, letterbox_scale},
  model::{Decode, DetectResult, Detection},
};

mod grid;
mod nms;
mod proposal;
mod rank;
mod rescale;

pub use self::grid::{GridStride, generate_grids_and_strides, num_anchors};
pub use self::nms::{iou, nms_sorted_bboxes};
pub use self::proposal::{YOLOX_RECORD_HEAD, generate_proposals, record_size};
pub use self::rank::sort_descending;
pub use self::rescale::rescale_and_clip;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
  #[error("输出长度不匹配: 期望 {expected}, 实际 {actual}")]
  InvalidInput { expected: usize, actual: usize },
  #[error("缩放系数无效: {0}")]
  InvalidScale(f32),
  #[error("图像尺寸无效: {width}x{height}")]
  InvalidImageSize { width: u32, height: u32 },
}

/// 完整的后处理流程：网格生成、候选解码、排序、NMS、还原裁剪。
///
/// `prob` 为网络原始输出，`scale` 为预处理时的缩放系数（网络输入尺寸 / 原图尺寸），
/// `img_w`、`img_h` 为原图尺寸。任一参数不合法时直接返回错误，不产生部分结果。
pub fn decode_outputs(
  prob: &[f32],
  config: &DecodeConfig,
  scale: f32,
  img_w: u32,
  img_h: u32,
) -> Result<DetectResult, DecodeError> {
  if img_w == 0 || img_h == 0 {
    return Err(DecodeError::InvalidImageSize {
      width: img_w,
      height: img_h,
    });
  }
  if !scale.is_finite() || scale <= 0.0 {
    return Err(DecodeError::InvalidScale(scale));
  }

  let grid_strides = generate_grids_and_strides(
    config.input_width(),
    config.input_height(),
    config.stride_set(),
  );
  let expected = grid_strides.len() * record_size(config.class_count());
  if prob.len() != expected {
    error!(
      "网络输出长度 {} 与配置不符: {} 个锚点 x {} 个字段 = {}",
      prob.len(),
      grid_strides.len(),
      record_size(config.class_count()),
      expected
    );
    return Err(DecodeError::InvalidInput {
      expected,
      actual: prob.len(),
    });
  }

  let mut proposals = generate_proposals(
    &grid_strides,
    prob,
    config.class_count(),
    config.confidence(),
  );
  sort_descending(&mut proposals);

  let picked = nms_sorted_bboxes(&proposals, config.iou_threshold());
  let mut objects: Vec<Detection> = picked.iter().map(|&i| proposals[i]).collect();
  rescale_and_clip(&mut objects, scale, img_w, img_h);

  debug!("检测到 {} 个物体", objects.len());
  Ok(DetectResult::from(objects))
}

/// 持有一份已校验配置的解码器
#[derive(Debug, Clone)]
pub struct YoloxDecoder {
  config: DecodeConfig,
}

impl YoloxDecoder {
  pub fn new(config: DecodeConfig) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn config(&self) -> &DecodeConfig {
    &self.config
  }

  /// 单帧期望的网络输出长度
  pub fn expected_len(&self) -> usize {
    num_anchors(
      self.config.input_width(),
      self.config.input_height(),
      self.config.stride_set(),
    ) * record_size(self.config.class_count())
  }
}

impl FromUrl for YoloxDecoder {
  type Error = ConfigError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    YoloxDecoder::new(DecodeConfig::from_url(url)?)
  }
}

impl Decode for YoloxDecoder {
  type Input = PredictionFrame;
  type Output = DetectResult;
  type Error = DecodeError;

  fn decode(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let scale = input.scale().unwrap_or_else(|| {
      letterbox_scale(
        self.config.input_width(),
        self.config.input_height(),
        input.image_width(),
        input.image_height(),
      )
    });
    debug!(
      "解码一帧: 原图 {}x{}, 缩放 {}",
      input.image_width(),
      input.image_height(),
      scale
    );

    decode_outputs(
      input.data(),
      &self.config,
      scale,
      input.image_width(),
      input.image_height(),
    )
  }
}
