// 该文件是 Siyu （四隅） 项目的一部分。
// src/postprocess/rescale.rs - 坐标还原与裁剪
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

use crate::model::{BBox, Detection, Point};

// NaN 视为 0，保证输出始终落在图像内
fn clip(value: f32, upper: f32) -> f32 {
  if value.is_nan() {
    0.0
  } else {
    value.clamp(0.0, upper)
  }
}

/// 将网络输入坐标系下的检测结果还原到原图并裁剪到 `[0, dim - 1]`。
///
/// 框的四条边各自裁剪后重新计算宽高；多边形顶点逐轴独立裁剪，
/// 不要求落在裁剪后的框内。调用方保证 `scale > 0` 且图像尺寸非零。
pub fn rescale_and_clip(detections: &mut [Detection], scale: f32, img_w: u32, img_h: u32) {
  let max_x = img_w.saturating_sub(1) as f32;
  let max_y = img_h.saturating_sub(1) as f32;

  for det in detections.iter_mut() {
    let x0 = clip(det.bbox.x / scale, max_x);
    let y0 = clip(det.bbox.y / scale, max_y);
    let x1 = clip(det.bbox.right() / scale, max_x);
    let y1 = clip(det.bbox.bottom() / scale, max_y);
    det.bbox = BBox::from_corners(x0, y0, x1, y1);

    for point in det.polygon.iter_mut() {
      *point = Point::new(clip(point.x / scale, max_x), clip(point.y / scale, max_y));
    }
  }
}
