// 该文件是 K3Check 项目的一部分。
// src/bin/oneshot.rs - 一次性评估多张图像
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

use k3check::{
  FromUrl,
  args::SessionArgs,
  input::parse_input_url,
  model::RecordReplay,
  session::SessionState,
  task::{OneShotTask, Task},
};
use tracing::info;

/// 对多张图像做一次性 K3 合规评估
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  #[command(flatten)]
  pub session: SessionArgs,
  /// 输入图像（路径或 image:// URL）
  #[arg(required = true, value_name = "IMAGE")]
  pub inputs: Vec<String>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let config = args.session.session_config()?;

  info!("模型: {}", args.session.model);
  info!("计分策略: {}", config.policy);
  info!("输入数量: {}", args.inputs.len());

  let inputs = args
    .inputs
    .iter()
    .map(|input| parse_input_url(input))
    .collect::<Result<Vec<_>, _>>()?;
  let model = RecordReplay::from_url(&args.session.model)?;
  let mut session = SessionState::new(config);

  OneShotTask::new(&mut session)
    .with_format(args.session.format)
    .run_task(inputs, &model, std::io::stdout().lock())?;

  Ok(())
}
