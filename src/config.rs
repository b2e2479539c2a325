// 该文件是 K3Check 项目的一部分。
// src/config.rs - 会话配置
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

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::label::{K3Label, Vocabulary};
use crate::scoring::ScoringPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("I/O 错误: {0}")]
  Io(#[from] std::io::Error),
  #[error("配置解析错误: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("配置无效: {0}")]
  Invalid(String),
}

/// 会话配置，会话创建后不可更改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
  pub policy: ScoringPolicy,
  /// 删除快照时是否同时撤回该快照贡献的标签
  pub couple_snapshot_deletion_to_labels: bool,
  /// 显式白名单，缺省时由计分策略决定
  pub vocabulary: Option<Vec<K3Label>>,
  /// 置信度下限，缺省不过滤
  pub min_score: Option<f32>,
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      policy: ScoringPolicy::default(),
      couple_snapshot_deletion_to_labels: true,
      vocabulary: None,
      min_score: None,
    }
  }
}

impl SessionConfig {
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let config: SessionConfig = serde_json::from_str(&content)?;
    config.validate()?;
    info!("已加载配置: {}", path.display());
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if let Some(min_score) = self.min_score
      && !(0.0..=1.0).contains(&min_score)
    {
      return Err(ConfigError::Invalid(format!(
        "min_score 必须位于 [0, 1]，实际为 {}",
        min_score
      )));
    }
    Ok(())
  }

  pub fn vocabulary(&self) -> Vocabulary {
    match &self.vocabulary {
      Some(labels) => Vocabulary::new(labels.iter().copied()),
      None => Vocabulary::for_policy(self.policy),
    }
  }
}
