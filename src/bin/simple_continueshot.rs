// 该文件是 Siyu （四隅） 项目的一部分。
// src/bin/simple_continueshot.rs - 连续解码
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

use anyhow::Result;
use clap::Parser;
use url::Url;

use siyu::{
  FromUrl,
  input::InputWrapper,
  output::OutputWrapper,
  postprocess::YoloxDecoder,
  task::{ContinuousTask, Task},
};
use tracing::info;

/// Siyu 连续解码
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 解码配置
  #[arg(long, value_name = "CONFIG", default_value = "yolox:")]
  pub config: Url,
  /// 网络输出来源，例如 rawdir:///data/preds?width=1280&height=720
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 结果输出
  #[arg(long, value_name = "OUTPUT", default_value = "console:")]
  pub output: Url,

  #[arg(long, value_name = "FRAME_NUMBER")]
  pub frame_number: Option<usize>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("解码配置: {}", args.config);
  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);

  let decoder = YoloxDecoder::from_url(&args.config)?;
  let input = InputWrapper::from_url(&args.input)?;
  let output = OutputWrapper::from_url(&args.output)?;

  ContinuousTask::default()
    .with_frame_number(args.frame_number)
    .run_task(input, decoder, output)?;

  Ok(())
}
