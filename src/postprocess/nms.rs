// 该文件是 Siyu （四隅） 项目的一部分。
// src/postprocess/nms.rs - 非极大值抑制
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

use crate::model::{BBox, Detection};

/// 由交集面积和并集面积得到 IoU；并集不为正（两个零面积框等退化情况）时记为 0
fn overlap_ratio(inter_area: f32, union_area: f32) -> f32 {
  if union_area > 0.0 {
    inter_area / union_area
  } else {
    0.0
  }
}

/// 计算两个轴对齐框的 IoU
pub fn iou(a: &BBox, b: &BBox) -> f32 {
  let inter_area = a.intersection_area(b);
  overlap_ratio(inter_area, a.area() + b.area() - inter_area)
}

/// 对已按置信度降序排列的候选框做贪心 NMS，返回保留项的下标（保持降序）。
///
/// 不区分类别：与任一已保留框的 IoU 超过 `nms_threshold` 即被丢弃。
pub fn nms_sorted_bboxes(proposals: &[Detection], nms_threshold: f32) -> Vec<usize> {
  let areas: Vec<f32> = proposals.iter().map(|p| p.bbox.area()).collect();
  let mut picked: Vec<usize> = Vec::new();

  for (i, a) in proposals.iter().enumerate() {
    let suppressed = picked.iter().any(|&j| {
      let inter_area = a.bbox.intersection_area(&proposals[j].bbox);
      let union_area = areas[i] + areas[j] - inter_area;
      overlap_ratio(inter_area, union_area) > nms_threshold
    });

    if !suppressed {
      picked.push(i);
    }
  }

  debug!("NMS: {} -> {}", proposals.len(), picked.len());
  picked
}
