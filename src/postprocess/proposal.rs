// 该文件是 Siyu （四隅） 项目的一部分。
// src/postprocess/proposal.rs - 候选框解码
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

use tracing::debug;

use super::grid::GridStride;
use crate::model::{BBox, Detection, Point};

// 每个锚点记录的字段偏移:
// [cx, cy, log_w, log_h, p0x, p0y, p1x, p1y, p2x, p2y, p3x, p3y, obj, cls...]
// 字段顺序取决于模型导出方式，换模型前需核对
const RECORD_CENTER: usize = 0;
const RECORD_SIZE: usize = 2;
const RECORD_POLYGON: usize = 4;
const RECORD_OBJECTNESS: usize = 12;
const RECORD_CLASSES: usize = 13;

/// 类别概率之前的固定字段数
pub const YOLOX_RECORD_HEAD: usize = RECORD_CLASSES;

/// 单个锚点记录的长度
pub fn record_size(num_classes: usize) -> usize {
  YOLOX_RECORD_HEAD + num_classes
}

/// 逐锚点解码网络输出，返回得分高于阈值的候选框（无序）。
///
/// `feat` 按 `grid_strides` 的顺序排列，每个锚点占 `record_size(num_classes)` 个浮点数；
/// 长度由调用方校验，多余或不足的尾部记录不会被读取。
/// 同一锚点的每个类别只要 `objectness * class_prob > prob_threshold` 就各产生一个候选。
pub fn generate_proposals(
  grid_strides: &[GridStride],
  feat: &[f32],
  num_classes: usize,
  prob_threshold: f32,
) -> Vec<Detection> {
  let mut proposals = Vec::new();

  for (record, grid) in feat
    .chunks_exact(record_size(num_classes))
    .zip(grid_strides)
  {
    let objectness = record[RECORD_OBJECTNESS];
    let class_probs = &record[RECORD_CLASSES..];

    // 先判断是否有类别过阈值，避免对绝大多数背景锚点做 exp
    if !class_probs
      .iter()
      .any(|&prob| objectness * prob > prob_threshold)
    {
      continue;
    }

    let stride = grid.stride as f32;
    let gx = grid.grid_x as f32;
    let gy = grid.grid_y as f32;

    let x_center = (record[RECORD_CENTER] + gx) * stride;
    let y_center = (record[RECORD_CENTER + 1] + gy) * stride;
    let w = record[RECORD_SIZE].exp() * stride;
    let h = record[RECORD_SIZE + 1].exp() * stride;
    let bbox = BBox::from_center(x_center, y_center, w, h);

    let mut polygon = [Point::default(); 4];
    for (k, point) in polygon.iter_mut().enumerate() {
      let offset = RECORD_POLYGON + 2 * k;
      *point = Point::new((record[offset] + gx) * stride, (record[offset + 1] + gy) * stride);
    }

    for (label, &class_prob) in class_probs.iter().enumerate() {
      let score = objectness * class_prob;
      if score > prob_threshold {
        proposals.push(Detection {
          bbox,
          polygon,
          label,
          score,
        });
      }
    }
  }

  debug!("阈值 {} 下得到 {} 个候选框", prob_threshold, proposals.len());
  proposals
}
