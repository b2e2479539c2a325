// 该文件是 K3Check 项目的一部分。
// src/session.rs - 会话状态：检测累积、快照管理与合规计分
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

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::label::K3Label;
use crate::scoring::{ComplianceReport, PpeStatus};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
  #[error("快照索引越界: {index}（共 {len} 张）")]
  OutOfRange { index: usize, len: usize },
}

/// 一次检测事件留下的快照，`image` 仅用于展示
#[derive(Debug, Clone)]
pub struct Snapshot<I> {
  pub id: u32,
  pub captured_at: DateTime<Utc>,
  pub labels: Box<[K3Label]>,
  pub image: I,
}

/// 单个用户会话的全部可变状态。
///
/// `all_detected_labels` 按检测顺序追加，只有 [`SessionState::reset`] 会清空它；
/// 若配置了 `couple_snapshot_deletion_to_labels`，删除快照时也会撤回对应的标签。
/// `last_ppe_status` 只反映最近一次 [`SessionState::record`]，不与历史合并。
#[derive(Debug)]
pub struct SessionState<I> {
  config: SessionConfig,
  all_detected_labels: Vec<K3Label>,
  last_ppe_status: PpeStatus,
  snapshots: Vec<Snapshot<I>>,
  next_snapshot_id: u32,
}

impl<I> Default for SessionState<I> {
  fn default() -> Self {
    Self::new(SessionConfig::default())
  }
}

impl<I> SessionState<I> {
  pub fn new(config: SessionConfig) -> Self {
    Self {
      config,
      all_detected_labels: Vec::new(),
      last_ppe_status: PpeStatus::default(),
      snapshots: Vec::new(),
      next_snapshot_id: 1,
    }
  }

  pub fn config(&self) -> &SessionConfig {
    &self.config
  }

  pub fn all_detected_labels(&self) -> &[K3Label] {
    &self.all_detected_labels
  }

  pub fn last_ppe_status(&self) -> PpeStatus {
    self.last_ppe_status
  }

  pub fn snapshots(&self) -> &[Snapshot<I>] {
    &self.snapshots
  }

  /// 记录一次检测事件，`labels` 已由上游按词表过滤
  pub fn record(&mut self, labels: &[K3Label], image: I) {
    self.all_detected_labels.extend_from_slice(labels);
    self.last_ppe_status = PpeStatus::from_labels(labels);

    let id = self.next_snapshot_id;
    self.next_snapshot_id += 1;
    self.snapshots.push(Snapshot {
      id,
      captured_at: Utc::now(),
      labels: labels.into(),
      image,
    });

    info!(
      "记录检测 #{}: {} 个标签，累计 {} 个",
      id,
      labels.len(),
      self.all_detected_labels.len()
    );
  }

  pub fn compute_compliance(&self) -> ComplianceReport {
    ComplianceReport::evaluate(
      self.config.policy,
      &self.all_detected_labels,
      self.last_ppe_status,
    )
  }

  /// 删除第 `index` 张快照（从 0 开始）并返回它
  pub fn remove_snapshot(&mut self, index: usize) -> Result<Snapshot<I>, SessionError> {
    let len = self.snapshots.len();
    if index >= len {
      return Err(SessionError::OutOfRange { index, len });
    }

    // 每次 record 恰好产生一张快照，前面快照的标签数之和即为偏移
    let offset: usize = self.snapshots[..index]
      .iter()
      .map(|snapshot| snapshot.labels.len())
      .sum();
    let snapshot = self.snapshots.remove(index);

    if self.config.couple_snapshot_deletion_to_labels {
      let end = offset + snapshot.labels.len();
      self.all_detected_labels.drain(offset..end);
      debug!("撤回快照 #{} 的 {} 个标签", snapshot.id, snapshot.labels.len());
    }

    info!("删除快照 #{}，剩余 {} 张", snapshot.id, self.snapshots.len());
    Ok(snapshot)
  }

  pub fn reset(&mut self) {
    self.all_detected_labels.clear();
    self.snapshots.clear();
    self.last_ppe_status = PpeStatus::default();
    self.next_snapshot_id = 1;
    info!("会话已重置");
  }
}
