// 该文件是 Siyu （四隅） 项目的一部分。
// src/frame.rs - 网络输出帧定义
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

/// letterbox 预处理使用的缩放系数：`min(input_w / orig_w, input_h / orig_h)`
pub fn letterbox_scale(input_w: u32, input_h: u32, orig_w: u32, orig_h: u32) -> f32 {
  let rw = input_w as f64 / orig_w as f64;
  let rh = input_h as f64 / orig_h as f64;
  rw.min(rh) as f32
}

/// 一帧推理结果：网络原始输出以及对应原图的尺寸
#[derive(Debug, Clone)]
pub struct PredictionFrame {
  data: Box<[f32]>,
  image_width: u32,
  image_height: u32,
  scale: Option<f32>,
}

impl PredictionFrame {
  pub fn new(data: Vec<f32>, image_width: u32, image_height: u32) -> Self {
    Self {
      data: data.into_boxed_slice(),
      image_width,
      image_height,
      scale: None,
    }
  }

  /// 指定预处理实际使用的缩放系数，未指定时按 letterbox 规则推算
  pub fn with_scale(mut self, scale: f32) -> Self {
    self.scale = Some(scale);
    self
  }

  pub fn data(&self) -> &[f32] {
    &self.data
  }

  pub fn image_width(&self) -> u32 {
    self.image_width
  }

  pub fn image_height(&self) -> u32 {
    self.image_height
  }

  pub fn scale(&self) -> Option<f32> {
    self.scale
  }
}
