// 该文件是 Siyu （四隅） 项目的一部分。
// src/bin/benchmark_repeatshot.rs - 解码耗时测试
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
  task::{RepeatShotTask, Task},
};
use tracing::info;

/// Siyu 解码耗时测试
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 解码配置
  #[arg(long, value_name = "CONFIG", default_value = "yolox:")]
  pub config: Url,
  /// 网络输出来源
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 结果输出
  #[arg(long, value_name = "OUTPUT", default_value = "console:")]
  pub output: Url,
  /// 重复次数
  #[arg(long, value_name = "TIMES", default_value_t = 1000)]
  pub repeat: usize,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("解码配置: {}", args.config);
  info!("输入来源: {}", args.input);
  info!("重复次数: {}", args.repeat);

  let decoder = YoloxDecoder::from_url(&args.config)?;
  let input = InputWrapper::from_url(&args.input)?;
  let output = OutputWrapper::from_url(&args.output)?;

  RepeatShotTask::default()
    .with_repeat_times(args.repeat)
    .run_task(input, decoder, output)?;

  Ok(())
}
