// 该文件是 K3Check 项目的一部分。
// src/scoring.rs - 合规计分策略
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

use std::collections::BTreeSet;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::label::K3Label;

/// 计分策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
  /// 统计出现过的设施标签数量，至少 2 个即合规
  #[default]
  Counting,
  /// 设施标签各加 1 分，`Kabel TidakRapi` 扣 1 分；3 分合规，1-2 分部分合规
  Signed,
}

impl ScoringPolicy {
  pub fn score(&self, seen: &BTreeSet<K3Label>) -> i32 {
    let facility = K3Label::FACILITY
      .iter()
      .filter(|label| seen.contains(label))
      .count() as i32;
    match self {
      ScoringPolicy::Counting => facility,
      ScoringPolicy::Signed => {
        let penalty = seen.iter().filter(|label| label.is_hazard()).count() as i32;
        facility - penalty
      }
    }
  }

  pub fn verdict(&self, score: i32) -> Verdict {
    match self {
      ScoringPolicy::Counting if score >= 2 => Verdict::Compliant,
      ScoringPolicy::Counting => Verdict::NonCompliant,
      ScoringPolicy::Signed if score >= 3 => Verdict::Compliant,
      ScoringPolicy::Signed if score >= 1 => Verdict::PartiallyCompliant,
      ScoringPolicy::Signed => Verdict::NonCompliant,
    }
  }
}

impl fmt::Display for ScoringPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ScoringPolicy::Counting => f.write_str("counting"),
      ScoringPolicy::Signed => f.write_str("signed"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
  #[serde(rename = "Compliant")]
  Compliant,
  #[serde(rename = "Partially compliant")]
  PartiallyCompliant,
  #[serde(rename = "Non-compliant")]
  NonCompliant,
}

impl fmt::Display for Verdict {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Verdict::Compliant => f.write_str("Compliant"),
      Verdict::PartiallyCompliant => f.write_str("Partially compliant"),
      Verdict::NonCompliant => f.write_str("Non-compliant"),
    }
  }
}

/// 最近一次检测中各 PPE 是否出现
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpeStatus {
  #[serde(rename = "Masker")]
  pub masker: bool,
  #[serde(rename = "Sarung Tangan")]
  pub sarung_tangan: bool,
  #[serde(rename = "Sepatu")]
  pub sepatu: bool,
}

impl PpeStatus {
  pub fn from_labels(labels: &[K3Label]) -> Self {
    Self {
      masker: labels.contains(&K3Label::Masker),
      sarung_tangan: labels.contains(&K3Label::SarungTangan),
      sepatu: labels.contains(&K3Label::Sepatu),
    }
  }

  /// 非 PPE 标签返回 `None`
  pub fn get(&self, label: K3Label) -> Option<bool> {
    match label {
      K3Label::Masker => Some(self.masker),
      K3Label::SarungTangan => Some(self.sarung_tangan),
      K3Label::Sepatu => Some(self.sepatu),
      _ => None,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (K3Label, bool)> + '_ {
    K3Label::PPE
      .into_iter()
      .map(|label| (label, self.get(label).unwrap_or(false)))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
  pub policy: ScoringPolicy,
  pub verdict: Verdict,
  pub score: i32,
  pub ppe_status: PpeStatus,
  /// 会话中出现过的 PPE 标签，按名称排序且去重
  pub ppe_detected: Vec<K3Label>,
}

impl ComplianceReport {
  pub fn evaluate(policy: ScoringPolicy, history: &[K3Label], ppe_status: PpeStatus) -> Self {
    let seen: BTreeSet<K3Label> = history.iter().copied().collect();
    let score = policy.score(&seen);

    let mut ppe_detected: Vec<K3Label> = seen.iter().copied().filter(K3Label::is_ppe).collect();
    ppe_detected.sort_by_key(|label| label.as_str());

    Self {
      policy,
      verdict: policy.verdict(score),
      score,
      ppe_status,
      ppe_detected,
    }
  }
}
