// 该文件是 K3Check 项目的一部分。
// src/args.rs - 会话参数配置
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

use std::path::PathBuf;

use url::Url;

use crate::{
  config::{ConfigError, SessionConfig},
  output::OutputFormat,
  scoring::ScoringPolicy,
};

/// 两个程序共用的会话参数，命令行的值覆盖配置文件
#[derive(clap::Args, Debug, Clone)]
pub struct SessionArgs {
  /// 检测模型，目前支持回放检测记录:
  /// - record:///          与图像同目录的 <name>.txt
  /// - record:///some/dir  指定目录下的 <name>.txt
  #[arg(long, value_name = "MODEL", default_value = "record:///")]
  pub model: Url,

  /// JSON 格式的会话配置文件
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// 计分策略
  #[arg(long, value_enum)]
  pub policy: Option<ScoringPolicy>,

  /// 删除快照时保留其标签（不撤回计分）
  #[arg(long)]
  pub keep_labels_on_delete: bool,

  /// 置信度下限 (0.0 - 1.0)
  #[arg(long, value_name = "THRESHOLD")]
  pub min_score: Option<f32>,

  /// 报告输出格式
  #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
  pub format: OutputFormat,
}

impl SessionArgs {
  pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
    let mut config = match &self.config {
      Some(path) => SessionConfig::from_path(path)?,
      None => SessionConfig::default(),
    };
    if let Some(policy) = self.policy {
      config.policy = policy;
    }
    if self.keep_labels_on_delete {
      config.couple_snapshot_deletion_to_labels = false;
    }
    if self.min_score.is_some() {
      config.min_score = self.min_score;
    }
    config.validate()?;
    Ok(config)
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use clap::Parser;
  use tempfile::NamedTempFile;

  use super::*;

  #[derive(Parser, Debug)]
  struct Cli {
    #[command(flatten)]
    session: SessionArgs,
  }

  fn parse(args: &[&str]) -> SessionArgs {
    Cli::parse_from(std::iter::once("k3check").chain(args.iter().copied())).session
  }

  #[test]
  fn defaults_without_flags() {
    let args = parse(&[]);
    assert_eq!(args.model.as_str(), "record:///");
    assert_eq!(args.format, OutputFormat::Text);
    assert_eq!(args.session_config().unwrap(), SessionConfig::default());
  }

  #[test]
  fn flags_override_config_file() {
    let mut file = NamedTempFile::new().expect("temp config");
    file
      .write_all(br#"{ "policy": "counting", "min_score": 0.2 }"#)
      .expect("write config");
    let path = file.path().to_str().unwrap();

    let config = parse(&[
      "--config",
      path,
      "--policy",
      "signed",
      "--min-score",
      "0.6",
      "--keep-labels-on-delete",
    ])
    .session_config()
    .unwrap();
    assert_eq!(config.policy, ScoringPolicy::Signed);
    assert_eq!(config.min_score, Some(0.6));
    assert!(!config.couple_snapshot_deletion_to_labels);

    let config = parse(&["--config", path]).session_config().unwrap();
    assert_eq!(config.min_score, Some(0.2));
    assert!(config.couple_snapshot_deletion_to_labels);
  }

  #[test]
  fn overridden_min_score_is_validated() {
    assert!(matches!(
      parse(&["--min-score", "2.0"]).session_config(),
      Err(ConfigError::Invalid(_))
    ));
  }
}
