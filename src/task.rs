// 该文件是 K3Check 项目的一部分。
// src/task.rs - 会话任务：一次性评估与交互式会话
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

use std::io::{BufRead, Write};
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::{
  FromUrl,
  input::{Frame, ImageFileInput, parse_input_url},
  label::{K3Label, Vocabulary, WithLabel},
  model::{DetectResult, Model},
  output::{OutputFormat, Render},
  session::SessionState,
};

pub trait Task<I, M, O>: Sized {
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<(), Self::Error>;
}

/// 运行检测并按会话配置过滤出 K3 标签
pub fn detect<M, T>(
  session: &SessionState<Frame>,
  model: &M,
  url: &Url,
) -> anyhow::Result<(Vec<K3Label>, Frame)>
where
  M: Model<Input = Frame, Output = DetectResult<T>>,
  M::Error: std::error::Error + Send + Sync + 'static,
  T: WithLabel,
{
  let frame = ImageFileInput::from_url(url)?
    .next()
    .ok_or_else(|| anyhow::anyhow!("没有输入帧: {}", url))?;
  let now = std::time::Instant::now();
  let result = model.infer(&frame)?;
  info!("推理完成，耗时: {:.2?}，{} 个检测结果", now.elapsed(), result.len());

  let config = session.config();
  let vocabulary: Vocabulary = config.vocabulary();
  let labels = result.k3_labels(&vocabulary, config.min_score);
  Ok((labels, frame))
}

/// 依次检测全部输入，然后输出合规报告
pub struct OneShotTask<'s> {
  session: &'s mut SessionState<Frame>,
  format: OutputFormat,
}

impl<'s> OneShotTask<'s> {
  pub fn new(session: &'s mut SessionState<Frame>) -> Self {
    Self {
      session,
      format: OutputFormat::default(),
    }
  }

  pub fn with_format(mut self, format: OutputFormat) -> Self {
    self.format = format;
    self
  }
}

impl<'s, I, M, T, O> Task<I, &M, O> for OneShotTask<'s>
where
  I: IntoIterator<Item = Url>,
  M: Model<Input = Frame, Output = DetectResult<T>>,
  M::Error: std::error::Error + Send + Sync + 'static,
  T: WithLabel,
  O: Write,
{
  type Error = anyhow::Error;

  fn run_task(self, input: I, model: &M, mut output: O) -> Result<(), Self::Error> {
    info!("开始任务...");
    for url in input {
      let (labels, frame) = detect(self.session, model, &url)?;
      self.session.record(&labels, frame);
    }
    let report = self.session.compute_compliance();
    self.format.render_result(&mut output, &report)?;
    info!("任务完成，共 {} 张快照", self.session.snapshots().len());
    Ok(())
  }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
  #[error("空命令")]
  Empty,
  #[error("未知命令: {0}")]
  Unknown(String),
  #[error("命令 {0} 缺少参数")]
  MissingArgument(&'static str),
  #[error("无效的快照编号: {0}（编号从 1 开始）")]
  InvalidNumber(String),
}

/// 交互式会话中的一条命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
  Detect(String),
  List,
  Labels,
  Score,
  /// 从 1 开始的快照编号
  Delete(usize),
  Reset,
  Help,
  Quit,
}

impl FromStr for SessionCommand {
  type Err = CommandError;

  fn from_str(line: &str) -> Result<Self, Self::Err> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
      Some((verb, rest)) => (verb, rest.trim()),
      None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
      "" => Err(CommandError::Empty),
      "detect" if rest.is_empty() => Err(CommandError::MissingArgument("detect")),
      "detect" => Ok(SessionCommand::Detect(rest.to_string())),
      "list" => Ok(SessionCommand::List),
      "labels" => Ok(SessionCommand::Labels),
      "score" => Ok(SessionCommand::Score),
      "delete" if rest.is_empty() => Err(CommandError::MissingArgument("delete")),
      "delete" => match rest.parse::<usize>() {
        Ok(number) if number >= 1 => Ok(SessionCommand::Delete(number)),
        _ => Err(CommandError::InvalidNumber(rest.to_string())),
      },
      "reset" => Ok(SessionCommand::Reset),
      "help" | "?" => Ok(SessionCommand::Help),
      "quit" | "exit" => Ok(SessionCommand::Quit),
      _ => Err(CommandError::Unknown(verb.to_string())),
    }
  }
}

const HELP: &str = "\
Commands:
  detect <image>   run detection on an image (path or image:// URL)
  list             list snapshots
  labels           list every label recorded in this session
  score            compute the compliance verdict
  delete <n>       delete snapshot #n
  reset            clear all snapshots and labels
  help             show this help
  quit             end the session";

/// 逐行读取命令的会话，命令出错不会结束会话
pub struct InteractiveTask<'s> {
  session: &'s mut SessionState<Frame>,
  format: OutputFormat,
  prompt: bool,
}

impl<'s> InteractiveTask<'s> {
  pub fn new(session: &'s mut SessionState<Frame>) -> Self {
    Self {
      session,
      format: OutputFormat::default(),
      prompt: false,
    }
  }

  pub fn with_format(mut self, format: OutputFormat) -> Self {
    self.format = format;
    self
  }

  pub fn with_prompt(mut self, prompt: bool) -> Self {
    self.prompt = prompt;
    self
  }

  fn execute<M, T>(
    &mut self,
    command: SessionCommand,
    model: &M,
    output: &mut dyn Write,
  ) -> anyhow::Result<()>
  where
    M: Model<Input = Frame, Output = DetectResult<T>>,
    M::Error: std::error::Error + Send + Sync + 'static,
    T: WithLabel,
  {
    match command {
      SessionCommand::Detect(input) => {
        let url = parse_input_url(&input)?;
        let (labels, frame) = detect(self.session, model, &url)?;
        self.session.record(&labels, frame);
        let names: Vec<&str> = labels.iter().map(K3Label::as_str).collect();
        let number = self.session.snapshots().len();
        if names.is_empty() {
          writeln!(output, "Snapshot #{}: no K3 objects detected", number)?;
        } else {
          writeln!(output, "Snapshot #{}: {}", number, names.join(", "))?;
        }
      }
      SessionCommand::List => {
        self.format.render_result(output, self.session.snapshots())?;
      }
      SessionCommand::Labels => {
        let labels = self.session.all_detected_labels();
        let names: Vec<&str> = labels.iter().map(K3Label::as_str).collect();
        writeln!(output, "{} label(s): {}", labels.len(), names.join(", "))?;
      }
      SessionCommand::Score => {
        let report = self.session.compute_compliance();
        self.format.render_result(output, &report)?;
      }
      SessionCommand::Delete(number) => {
        let removed = self.session.remove_snapshot(number - 1)?;
        writeln!(output, "Deleted snapshot #{}", number)?;
        info!("已删除 {}", removed.image);
      }
      SessionCommand::Reset => {
        self.session.reset();
        writeln!(output, "Session reset")?;
      }
      SessionCommand::Help => writeln!(output, "{}", HELP)?,
      SessionCommand::Quit => {}
    }
    Ok(())
  }
}

impl<'s, I, M, T, O> Task<I, &M, O> for InteractiveTask<'s>
where
  I: BufRead,
  M: Model<Input = Frame, Output = DetectResult<T>>,
  M::Error: std::error::Error + Send + Sync + 'static,
  T: WithLabel,
  O: Write,
{
  type Error = anyhow::Error;

  fn run_task(mut self, input: I, model: &M, mut output: O) -> Result<(), Self::Error> {
    info!("会话开始，计分策略: {}", self.session.config().policy);
    let mut lines = input.lines();
    loop {
      if self.prompt {
        write!(output, "k3> ")?;
        output.flush()?;
      }
      let Some(line) = lines.next() else {
        break;
      };
      let line = line?;
      if line.trim().is_empty() {
        continue;
      }

      let command = match line.parse::<SessionCommand>() {
        Ok(command) => command,
        Err(e) => {
          warn!("拒绝命令 '{}': {}", line.trim(), e);
          writeln!(output, "error: {}", e)?;
          continue;
        }
      };
      if command == SessionCommand::Quit {
        break;
      }
      if let Err(e) = self.execute(command, model, &mut output) {
        warn!("命令执行失败: {}", e);
        writeln!(output, "error: {}", e)?;
      }
    }
    info!("会话结束");
    Ok(())
  }
}
