// 该文件是 K3Check 项目的一部分。
// src/model.rs - 检测模型接口与结果过滤
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

use tracing::debug;

use crate::label::{K3Label, Vocabulary, WithLabel};

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectItem<T> {
  pub kind: T,
  pub score: f32,
  pub bbox: [f32; 4], // [x_min, y_min, x_max, y_max]
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectResult<T> {
  pub items: Box<[DetectItem<T>]>,
}

impl<T> Default for DetectResult<T> {
  fn default() -> Self {
    Self {
      items: Box::new([]),
    }
  }
}

impl<T> From<Vec<DetectItem<T>>> for DetectResult<T> {
  fn from(items: Vec<DetectItem<T>>) -> Self {
    Self {
      items: items.into_boxed_slice(),
    }
  }
}

impl<T: WithLabel> DetectResult<T> {
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  /// 按检测顺序取出词表内的 K3 标签，置信度与边框不参与计分
  pub fn k3_labels(&self, vocabulary: &Vocabulary, min_score: Option<f32>) -> Vec<K3Label> {
    self
      .items
      .iter()
      .filter(|item| min_score.is_none_or(|min| item.score >= min))
      .filter_map(|item| {
        let name = item.kind.to_label_str();
        let label = vocabulary.accept(&name);
        if label.is_none() {
          debug!("忽略词表外的标签: {}", name);
        }
        label
      })
      .collect()
  }
}

mod record_replay;
pub use self::record_replay::{RecordReplay, RecordReplayError};
