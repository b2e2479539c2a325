// 该文件是 K3Check 项目的一部分。
// src/output.rs - 报告输出
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

use std::fmt::Display;
use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

use crate::label::K3Label;
use crate::scoring::ComplianceReport;
use crate::session::Snapshot;

/// PPE 列表为空时显示的占位
pub const NONE_DETECTED: &str = "none detected";

pub trait Render<T: ?Sized> {
  type Error;
  fn render_result(&self, out: &mut dyn Write, result: &T) -> Result<(), Self::Error>;
}

#[derive(Error, Debug)]
pub enum OutputError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

fn join_labels(labels: &[K3Label]) -> String {
  if labels.is_empty() {
    return NONE_DETECTED.to_string();
  }
  labels
    .iter()
    .map(K3Label::as_str)
    .collect::<Vec<_>>()
    .join(", ")
}

impl Render<ComplianceReport> for OutputFormat {
  type Error = OutputError;

  fn render_result(&self, out: &mut dyn Write, report: &ComplianceReport) -> Result<(), Self::Error> {
    match self {
      OutputFormat::Json => {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
      }
      OutputFormat::Text => {
        writeln!(
          out,
          "Room compliance: {} (score: {}, policy: {})",
          report.verdict, report.score, report.policy
        )?;
        writeln!(out, "PPE status (latest snapshot):")?;
        for (label, present) in report.ppe_status.iter() {
          let mark = if present { "x" } else { " " };
          writeln!(out, "  [{}] {}", mark, label)?;
        }
        writeln!(out, "PPE detected: {}", join_labels(&report.ppe_detected))?;
      }
    }
    Ok(())
  }
}

#[derive(Serialize)]
struct SnapshotView<'a> {
  number: usize,
  id: u32,
  captured_at: String,
  labels: &'a [K3Label],
  image: String,
}

impl<I: Display> Render<[Snapshot<I>]> for OutputFormat {
  type Error = OutputError;

  fn render_result(&self, out: &mut dyn Write, snapshots: &[Snapshot<I>]) -> Result<(), Self::Error> {
    // 编号从 1 开始，与 `delete <n>` 一致
    let views: Vec<SnapshotView> = snapshots
      .iter()
      .enumerate()
      .map(|(i, snapshot)| SnapshotView {
        number: i + 1,
        id: snapshot.id,
        captured_at: snapshot.captured_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        labels: &snapshot.labels,
        image: snapshot.image.to_string(),
      })
      .collect();

    match self {
      OutputFormat::Json => {
        serde_json::to_writer_pretty(&mut *out, &views)?;
        writeln!(out)?;
      }
      OutputFormat::Text => {
        if views.is_empty() {
          writeln!(out, "No snapshots.")?;
          return Ok(());
        }
        for view in views {
          writeln!(
            out,
            "#{} [{}] {} -> {}",
            view.number,
            view.captured_at,
            view.image,
            join_labels(view.labels)
          )?;
        }
      }
    }
    Ok(())
  }
}
