// 该文件是 K3Check 项目的一部分。
// src/model/record_replay.rs - 回放目录记录中的检测结果
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

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  input::Frame,
  model::{DetectItem, DetectResult, Model},
};

#[derive(Error, Debug)]
pub enum RecordReplayError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("路径不是合法的 UTF-8: {0}")]
  PathEncoding(#[from] std::string::FromUtf8Error),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("记录格式错误 {path}:{line}: {reason}")]
  Malformed {
    path: PathBuf,
    line: usize,
    reason: String,
  },
}

/// 把检测器写下的 `name, score, x_min, y_min, x_max, y_max` 记录当作推理结果。
///
/// 记录文件与图像同名、扩展名为 `.txt`；URL 路径非根目录时，到该目录下查找。
pub struct RecordReplay {
  directory: Option<PathBuf>,
}

impl FromUrlWithScheme for RecordReplay {
  const SCHEME: &'static str = "record";
}

impl FromUrl for RecordReplay {
  type Error = RecordReplayError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(RecordReplayError::SchemeMismatch(format!(
        "期望模型方案 '{}', 实际方案 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    let path = urlencoding::decode(url.path())?;
    let directory = match path.as_ref() {
      "" | "/" => None,
      path => Some(PathBuf::from(path)),
    };
    Ok(RecordReplay { directory })
  }
}

impl RecordReplay {
  pub fn sidecar_path(&self, source: &Path) -> PathBuf {
    let sidecar = source.with_extension("txt");
    match (&self.directory, sidecar.file_name()) {
      (Some(directory), Some(name)) => directory.join(name),
      _ => sidecar,
    }
  }
}

impl Model for RecordReplay {
  type Input = Frame;
  type Output = DetectResult<String>;
  type Error = RecordReplayError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let path = self.sidecar_path(input.source());
    if !path.exists() {
      warn!("没有找到检测记录 {}，按无检测结果处理", path.display());
      return Ok(DetectResult::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let result = parse_records(&content).map_err(|(line, reason)| RecordReplayError::Malformed {
      path: path.clone(),
      line,
      reason,
    })?;
    debug!("从 {} 读取 {} 个检测结果", path.display(), result.len());
    Ok(result)
  }
}

fn parse_records(content: &str) -> Result<DetectResult<String>, (usize, String)> {
  let mut items = Vec::new();
  for (index, line) in content.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }

    // 类别名可能带空格，从右侧切出五个数值
    let mut fields: Vec<&str> = line.rsplitn(6, ',').map(str::trim).collect();
    if fields.len() != 6 {
      return Err((index + 1, format!("期望 6 个字段，实际 {} 个", fields.len())));
    }
    fields.reverse();

    let mut numbers = [0f32; 5];
    for (slot, field) in numbers.iter_mut().zip(&fields[1..]) {
      *slot = field
        .parse()
        .map_err(|_| (index + 1, format!("无法解析数值 '{}'", field)))?;
    }

    items.push(DetectItem {
      kind: fields[0].to_string(),
      score: numbers[0],
      bbox: [numbers[1], numbers[2], numbers[3], numbers[4]],
    });
  }
  Ok(items.into())
}
