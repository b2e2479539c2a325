// 该文件是 K3Check 项目的一部分。
// tests/session_flow.rs - 会话端到端测试
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

#![cfg(feature = "read_image_file")]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use k3check::{
  FromUrl,
  config::SessionConfig,
  input::parse_input_url,
  label::K3Label,
  model::RecordReplay,
  output::OutputFormat,
  scoring::{ScoringPolicy, Verdict},
  session::SessionState,
  task::{InteractiveTask, OneShotTask, Task},
};
use url::Url;

fn snapshot(dir: &Path, name: &str, records: &[&str]) -> PathBuf {
  let path = dir.join(format!("{}.png", name));
  image::RgbImage::new(8, 8).save(&path).expect("save image");
  if !records.is_empty() {
    std::fs::write(path.with_extension("txt"), records.join("\n")).expect("write records");
  }
  path
}

fn model() -> RecordReplay {
  RecordReplay::from_url(&Url::parse("record:///").unwrap()).unwrap()
}

fn run_interactive(session: &mut SessionState<k3check::input::Frame>, script: &str) -> String {
  let mut output = Vec::new();
  InteractiveTask::new(session)
    .run_task(Cursor::new(script.to_string()), &model(), &mut output)
    .expect("interactive session");
  String::from_utf8(output).unwrap()
}

#[test]
fn interactive_session_detect_score_delete_reset() {
  let dir = tempfile::tempdir().unwrap();
  let first = snapshot(
    dir.path(),
    "pintu",
    &["APAR, 0.91, 0.1, 0.1, 0.3, 0.5", "Masker, 0.80, 0.5, 0.2, 0.6, 0.3"],
  );
  let second = snapshot(
    dir.path(),
    "jendela",
    &["Jendela, 0.77, 0.0, 0.0, 0.4, 0.4", "person, 0.99, 0.2, 0.2, 0.8, 0.9"],
  );
  let third = snapshot(dir.path(), "kosong", &[]);

  let mut session = SessionState::new(SessionConfig::default());
  let script = format!(
    "detect {}\ndetect {}\ndetect {}\nscore\nbogus\ndelete 9\ndelete 1\nlist\nscore\n",
    first.display(),
    second.display(),
    third.display()
  );
  let text = run_interactive(&mut session, &script);

  assert!(text.contains("Snapshot #1: APAR, Masker"));
  assert!(text.contains("Snapshot #2: Jendela"));
  assert!(text.contains("Snapshot #3: no K3 objects detected"));
  assert!(text.contains("Room compliance: Compliant (score: 2, policy: counting)"));
  assert!(text.contains("error: 未知命令: bogus"));
  assert!(text.contains("快照索引越界"));
  assert!(text.contains("Deleted snapshot #1"));
  assert!(text.contains("Room compliance: Non-compliant (score: 1, policy: counting)"));

  // 删除第一张快照后，其标签也被撤回；PPE 状态仍是最后一张快照的
  assert_eq!(session.snapshots().len(), 2);
  assert_eq!(session.all_detected_labels(), &[K3Label::Jendela]);
  assert!(!session.last_ppe_status().masker);

  let text = run_interactive(&mut session, "reset\nlabels\nquit\ndetect nowhere.png\n");
  assert!(text.contains("Session reset"));
  assert!(text.contains("0 label(s)"));
  assert!(!text.contains("Snapshot #"));
  assert!(session.snapshots().is_empty());
}

#[test]
fn detection_failure_keeps_session_usable() {
  let dir = tempfile::tempdir().unwrap();
  let broken = snapshot(dir.path(), "rusak", &["APAR, tinggi, 0, 0, 1, 1"]);
  let good = snapshot(dir.path(), "baik", &["Sepatu, 0.6, 0, 0, 1, 1"]);

  let mut session = SessionState::new(SessionConfig::default());
  let script = format!(
    "detect {}\ndetect {}/missing.png\ndetect {}\n",
    broken.display(),
    dir.path().display(),
    good.display()
  );
  let text = run_interactive(&mut session, &script);
  assert_eq!(text.matches("error:").count(), 2);
  assert!(text.contains("Snapshot #1: Sepatu"));
  assert_eq!(session.all_detected_labels(), &[K3Label::Sepatu]);
}

#[test]
fn one_shot_signed_policy_reports_json() {
  let dir = tempfile::tempdir().unwrap();
  let inputs: Vec<Url> = [
    snapshot(
      dir.path(),
      "a",
      &["APAR, 0.9, 0, 0, 1, 1", "Kabel TidakRapi, 0.7, 0, 0, 1, 1"],
    ),
    snapshot(
      dir.path(),
      "b",
      &["Rambu Evakuasi, 0.9, 0, 0, 1, 1", "Jendela, 0.9, 0, 0, 1, 1"],
    ),
  ]
  .iter()
  .map(|path| parse_input_url(path.to_str().unwrap()).unwrap())
  .collect();

  let mut session = SessionState::new(SessionConfig {
    policy: ScoringPolicy::Signed,
    ..SessionConfig::default()
  });
  let mut output = Vec::new();
  OneShotTask::new(&mut session)
    .with_format(OutputFormat::Json)
    .run_task(inputs, &model(), &mut output)
    .expect("one shot");

  let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(value["score"], 2);
  assert_eq!(value["verdict"], "Partially compliant");
  assert_eq!(session.compute_compliance().verdict, Verdict::PartiallyCompliant);
  assert_eq!(session.snapshots().len(), 2);
}
