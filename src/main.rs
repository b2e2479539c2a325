// 该文件是 K3Check 项目的一部分。
// src/main.rs - 交互式会话主程序
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

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use k3check::{
  FromUrl,
  args::SessionArgs,
  model::RecordReplay,
  session::SessionState,
  task::{InteractiveTask, Task},
};

/// K3 合规检查交互式会话
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  #[command(flatten)]
  pub session: SessionArgs,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse().session;
  let config = args.session_config()?;

  info!("模型: {}", args.model);
  info!("计分策略: {}", config.policy);
  info!(
    "删除快照时撤回标签: {}",
    config.couple_snapshot_deletion_to_labels
  );

  let model = RecordReplay::from_url(&args.model)?;
  let mut session = SessionState::new(config);

  let stdin = std::io::stdin();
  let prompt = stdin.is_terminal();
  InteractiveTask::new(&mut session)
    .with_format(args.format)
    .with_prompt(prompt)
    .run_task(stdin.lock(), &model, std::io::stdout())?;

  Ok(())
}
