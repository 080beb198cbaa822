// 该文件是 Siyu （四隅） 项目的一部分。
// src/model.rs - 检测结果数据模型
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

use serde::Serialize;

/// 将一帧网络输出解码为检测结果
pub trait Decode {
  type Input;
  type Output;
  type Error;

  fn decode(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
  pub x: f32,
  pub y: f32,
}

impl Point {
  pub fn new(x: f32, y: f32) -> Self {
    Self { x, y }
  }
}

/// 轴对齐矩形，左上角坐标加宽高
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BBox {
  pub x: f32,
  pub y: f32,
  pub width: f32,
  pub height: f32,
}

impl BBox {
  pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
    Self::new(cx - width * 0.5, cy - height * 0.5, width, height)
  }

  pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
    Self::new(x0, y0, x1 - x0, y1 - y0)
  }

  pub fn right(&self) -> f32 {
    self.x + self.width
  }

  pub fn bottom(&self) -> f32 {
    self.y + self.height
  }

  /// 面积，负的宽高按 0 计
  pub fn area(&self) -> f32 {
    self.width.max(0.0) * self.height.max(0.0)
  }

  /// 与另一个矩形的交集面积，不相交时为 0
  pub fn intersection_area(&self, other: &BBox) -> f32 {
    let x0 = self.x.max(other.x);
    let y0 = self.y.max(other.y);
    let x1 = self.right().min(other.right());
    let y1 = self.bottom().min(other.bottom());

    (x1 - x0).max(0.0) * (y1 - y0).max(0.0)
  }
}

/// 单个检测目标
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detection {
  pub bbox: BBox,
  /// 四点多边形，点序即连线顺序，不保证凸或顺时针
  pub polygon: [Point; 4],
  pub label: usize,
  pub score: f32,
}

/// 按置信度降序排列的检测结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectResult {
  pub items: Box<[Detection]>,
}

impl DetectResult {
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
    self.items.iter()
  }
}

impl From<Vec<Detection>> for DetectResult {
  fn from(items: Vec<Detection>) -> Self {
    Self {
      items: items.into_boxed_slice(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn disjoint_boxes_do_not_intersect() {
    let a = BBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BBox::new(20.0, 20.0, 5.0, 5.0);
    assert_eq!(a.intersection_area(&b), 0.0);
  }

  #[test]
  fn partial_overlap_area() {
    let a = BBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BBox::new(5.0, 5.0, 10.0, 10.0);
    assert_eq!(a.intersection_area(&b), 25.0);
    assert_eq!(b.intersection_area(&a), 25.0);
  }

  #[test]
  fn negative_size_has_zero_area() {
    let b = BBox::new(10.0, 10.0, -4.0, 3.0);
    assert_eq!(b.area(), 0.0);
  }

  #[test]
  fn center_and_corner_constructors_agree() {
    let a = BBox::from_center(10.0, 20.0, 8.0, 4.0);
    let b = BBox::from_corners(6.0, 18.0, 14.0, 22.0);
    assert_eq!(a, b);
  }
}
