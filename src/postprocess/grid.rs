// 该文件是 Siyu （四隅） 项目的一部分。
// src/postprocess/grid.rs - 网格与步长生成
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

/// 一个锚点所在的网格坐标及其步长
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStride {
  pub grid_x: u32,
  pub grid_y: u32,
  pub stride: u32,
}

/// 给定输入尺寸和步长集合时的锚点总数
pub fn num_anchors(target_w: u32, target_h: u32, strides: &[u32]) -> usize {
  strides
    .iter()
    .filter(|&&stride| stride > 0)
    .map(|&stride| (target_w / stride) as usize * (target_h / stride) as usize)
    .sum()
}

/// 按步长顺序、行优先（先 y 后 x）枚举所有锚点。
///
/// 顺序必须与网络输出中锚点的排列一致，解码时按位置索引。
/// 步长不能整除输入尺寸时向下取整；步长为 0 的项被忽略。
pub fn generate_grids_and_strides(target_w: u32, target_h: u32, strides: &[u32]) -> Vec<GridStride> {
  let mut grid_strides = Vec::with_capacity(num_anchors(target_w, target_h, strides));

  for &stride in strides.iter().filter(|&&stride| stride > 0) {
    let num_grid_w = target_w / stride;
    let num_grid_h = target_h / stride;
    for grid_y in 0..num_grid_h {
      for grid_x in 0..num_grid_w {
        grid_strides.push(GridStride {
          grid_x,
          grid_y,
          stride,
        });
      }
    }
  }

  grid_strides
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_layout_has_8400_anchors() {
    let grids = generate_grids_and_strides(640, 640, &[8, 16, 32]);
    assert_eq!(grids.len(), 8400);
    assert_eq!(num_anchors(640, 640, &[8, 16, 32]), 8400);

    assert!(grids[..6400].iter().all(|g| g.stride == 8));
    assert!(grids[6400..8000].iter().all(|g| g.stride == 16));
    assert!(grids[8000..].iter().all(|g| g.stride == 32));
  }

  #[test]
  fn row_major_within_each_stride() {
    let grids = generate_grids_and_strides(640, 640, &[8, 16, 32]);
    assert_eq!(grids[0], GridStride { grid_x: 0, grid_y: 0, stride: 8 });
    assert_eq!(grids[1], GridStride { grid_x: 1, grid_y: 0, stride: 8 });
    assert_eq!(grids[80], GridStride { grid_x: 0, grid_y: 1, stride: 8 });
    assert_eq!(grids[6399], GridStride { grid_x: 79, grid_y: 79, stride: 8 });
    assert_eq!(grids[6400], GridStride { grid_x: 0, grid_y: 0, stride: 16 });
    assert_eq!(grids[8399], GridStride { grid_x: 19, grid_y: 19, stride: 32 });
  }

  #[test]
  fn non_square_and_truncating() {
    // 100 / 32 = 3, 60 / 32 = 1
    let grids = generate_grids_and_strides(100, 60, &[32]);
    assert_eq!(grids.len(), 3);
    assert_eq!(grids[2], GridStride { grid_x: 2, grid_y: 0, stride: 32 });
  }

  #[test]
  fn zero_stride_is_skipped() {
    assert_eq!(generate_grids_and_strides(64, 64, &[0, 32]).len(), 4);
    assert!(generate_grids_and_strides(64, 64, &[]).is_empty());
  }
}
