// 该文件是 K3Check 项目的一部分。
// src/label.rs - K3 标签词表
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

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::ScoringPolicy;

pub trait WithLabel: Sized + fmt::Debug {
  fn to_label_str(&self) -> String;
  fn from_label_str(label: &str) -> Option<Self>;
}

/// 标签类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelCategory {
  /// 个人防护装备（佩戴在人身上）
  Ppe,
  /// 房间固定的安全设施或隐患
  Facility,
}

/// 模型输出中与 K3 相关的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum K3Label {
  #[serde(rename = "APAR")]
  Apar,
  #[serde(rename = "Jendela")]
  Jendela,
  #[serde(rename = "Rambu Evakuasi")]
  RambuEvakuasi,
  #[serde(rename = "Masker")]
  Masker,
  #[serde(rename = "Sarung Tangan")]
  SarungTangan,
  #[serde(rename = "Sepatu")]
  Sepatu,
  #[serde(rename = "Kabel TidakRapi")]
  KabelTidakRapi,
}

impl K3Label {
  pub const ALL: [K3Label; 7] = [
    K3Label::Apar,
    K3Label::Jendela,
    K3Label::RambuEvakuasi,
    K3Label::Masker,
    K3Label::SarungTangan,
    K3Label::Sepatu,
    K3Label::KabelTidakRapi,
  ];

  pub const PPE: [K3Label; 3] = [K3Label::Masker, K3Label::SarungTangan, K3Label::Sepatu];

  /// 计分时计为正分的设施标签
  pub const FACILITY: [K3Label; 3] = [K3Label::Apar, K3Label::Jendela, K3Label::RambuEvakuasi];

  pub fn as_str(&self) -> &'static str {
    match self {
      K3Label::Apar => "APAR",
      K3Label::Jendela => "Jendela",
      K3Label::RambuEvakuasi => "Rambu Evakuasi",
      K3Label::Masker => "Masker",
      K3Label::SarungTangan => "Sarung Tangan",
      K3Label::Sepatu => "Sepatu",
      K3Label::KabelTidakRapi => "Kabel TidakRapi",
    }
  }

  pub fn category(&self) -> LabelCategory {
    match self {
      K3Label::Masker | K3Label::SarungTangan | K3Label::Sepatu => LabelCategory::Ppe,
      K3Label::Apar | K3Label::Jendela | K3Label::RambuEvakuasi | K3Label::KabelTidakRapi => {
        LabelCategory::Facility
      }
    }
  }

  pub fn is_ppe(&self) -> bool {
    self.category() == LabelCategory::Ppe
  }

  /// 隐患标签在有符号计分中扣分
  pub fn is_hazard(&self) -> bool {
    matches!(self, K3Label::KabelTidakRapi)
  }
}

impl fmt::Display for K3Label {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("未知的 K3 标签: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for K3Label {
  type Err = UnknownLabel;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    K3Label::ALL
      .into_iter()
      .find(|label| label.as_str() == s)
      .ok_or_else(|| UnknownLabel(s.to_string()))
  }
}

impl WithLabel for K3Label {
  fn to_label_str(&self) -> String {
    self.as_str().to_string()
  }

  fn from_label_str(label: &str) -> Option<Self> {
    label.parse().ok()
  }
}

impl WithLabel for String {
  fn to_label_str(&self) -> String {
    self.clone()
  }

  fn from_label_str(label: &str) -> Option<Self> {
    Some(label.to_string())
  }
}

/// 上游过滤使用的标签白名单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
  labels: Vec<K3Label>,
}

impl Vocabulary {
  pub fn new(labels: impl IntoIterator<Item = K3Label>) -> Self {
    let mut labels: Vec<K3Label> = labels.into_iter().collect();
    labels.sort();
    labels.dedup();
    Self { labels }
  }

  /// 计数策略沿用最初的六个标签，有符号策略额外识别 `Kabel TidakRapi`
  pub fn for_policy(policy: ScoringPolicy) -> Self {
    match policy {
      ScoringPolicy::Counting => Self::new(
        K3Label::ALL
          .into_iter()
          .filter(|label| !label.is_hazard()),
      ),
      ScoringPolicy::Signed => Self::new(K3Label::ALL),
    }
  }

  pub fn contains(&self, label: K3Label) -> bool {
    self.labels.contains(&label)
  }

  /// 将模型给出的类别名映射为词表内的标签
  pub fn accept(&self, name: &str) -> Option<K3Label> {
    K3Label::from_label_str(name).filter(|label| self.contains(*label))
  }

  pub fn labels(&self) -> &[K3Label] {
    &self.labels
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn label_strings_round_trip_exactly() {
    for label in K3Label::ALL {
      assert_eq!(label.as_str().parse::<K3Label>(), Ok(label));
    }
    assert_eq!(
      "masker".parse::<K3Label>(),
      Err(UnknownLabel("masker".to_string()))
    );
    assert!("person".parse::<K3Label>().is_err());
  }

  #[test]
  fn categories_are_disjoint() {
    for label in K3Label::PPE {
      assert_eq!(label.category(), LabelCategory::Ppe);
    }
    for label in K3Label::FACILITY {
      assert_eq!(label.category(), LabelCategory::Facility);
    }
    assert_eq!(K3Label::KabelTidakRapi.category(), LabelCategory::Facility);
    assert!(K3Label::KabelTidakRapi.is_hazard());
    assert!(!K3Label::Apar.is_hazard());
  }

  #[test]
  fn vocabulary_follows_policy() {
    let counting = Vocabulary::for_policy(ScoringPolicy::Counting);
    assert_eq!(counting.labels().len(), 6);
    assert_eq!(counting.accept("Kabel TidakRapi"), None);
    assert_eq!(counting.accept("Rambu Evakuasi"), Some(K3Label::RambuEvakuasi));

    let signed = Vocabulary::for_policy(ScoringPolicy::Signed);
    assert_eq!(signed.accept("Kabel TidakRapi"), Some(K3Label::KabelTidakRapi));
    assert_eq!(signed.accept("chair"), None);
  }

  #[test]
  fn serde_uses_display_names() {
    let json = serde_json::to_string(&K3Label::SarungTangan).unwrap();
    assert_eq!(json, "\"Sarung Tangan\"");
    let label: K3Label = serde_json::from_str("\"Kabel TidakRapi\"").unwrap();
    assert_eq!(label, K3Label::KabelTidakRapi);
  }
}
