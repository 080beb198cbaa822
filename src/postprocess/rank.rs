// 该文件是 Siyu （四隅） 项目的一部分。
// src/postprocess/rank.rs - 候选框排序
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

use crate::model::Detection;

/// 按置信度降序稳定排序，同分保持原有顺序
pub fn sort_descending(proposals: &mut [Detection]) {
  proposals.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{BBox, Point};

  fn det(label: usize, score: f32) -> Detection {
    Detection {
      bbox: BBox::new(0.0, 0.0, 1.0, 1.0),
      polygon: [Point::default(); 4],
      label,
      score,
    }
  }

  #[test]
  fn empty_input() {
    let mut proposals: Vec<Detection> = Vec::new();
    sort_descending(&mut proposals);
    assert!(proposals.is_empty());
  }

  #[test]
  fn sorted_non_increasing() {
    let mut proposals = vec![det(0, 0.4), det(1, 0.9), det(2, 0.35), det(3, 0.7)];
    sort_descending(&mut proposals);
    assert!(proposals.windows(2).all(|w| w[0].score >= w[1].score));
    assert_eq!(proposals[0].label, 1);
  }

  #[test]
  fn ties_keep_insertion_order() {
    let mut proposals = vec![det(0, 0.5), det(1, 0.8), det(2, 0.5), det(3, 0.5)];
    sort_descending(&mut proposals);
    let labels: Vec<usize> = proposals.iter().map(|d| d.label).collect();
    assert_eq!(labels, vec![1, 0, 2, 3]);
  }
}
