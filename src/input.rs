// 该文件是 K3Check 项目的一部分。
// src/input.rs - 图像输入
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
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

mod image_file;
pub use self::image_file::{ImageFileInput, ImageFileInputError};

#[derive(Error, Debug)]
pub enum InputError {
  #[error("图像文件输入错误: {0}")]
  ImageFileInputError(#[from] ImageFileInputError),
  #[error("URL 解析错误: {0}")]
  UrlError(#[from] url::ParseError),
}

/// 一次检测所用的图像
#[derive(Debug, Clone)]
pub struct Frame {
  source: PathBuf,
  #[cfg(feature = "read_image_file")]
  image: image::RgbImage,
}

impl Frame {
  pub fn source(&self) -> &Path {
    &self.source
  }

  #[cfg(feature = "read_image_file")]
  pub fn image(&self) -> &image::RgbImage {
    &self.image
  }

  pub fn dimensions(&self) -> Option<(u32, u32)> {
    #[cfg(feature = "read_image_file")]
    {
      Some(self.image.dimensions())
    }
    #[cfg(not(feature = "read_image_file"))]
    {
      None
    }
  }
}

impl fmt::Display for Frame {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.dimensions() {
      Some((width, height)) => write!(f, "{} ({}x{})", self.source.display(), width, height),
      None => write!(f, "{}", self.source.display()),
    }
  }
}

/// 命令行里允许直接写文件路径，此时补全为 `image://` 方案
pub fn parse_input_url(input: &str) -> Result<url::Url, InputError> {
  match url::Url::parse(input) {
    Ok(url) if url.scheme().len() > 1 => Ok(url),
    _ => {
      let path = std::path::absolute(input).map_err(ImageFileInputError::from)?;
      // 逐段编码，文件名里的 `#`、`?`、`%` 不能被当作 URL 语法
      let segments: Vec<String> = path
        .components()
        .filter_map(|component| match component {
          Component::Normal(name) => Some(urlencoding::encode(&name.to_string_lossy()).into_owned()),
          Component::ParentDir => Some("..".to_string()),
          _ => None,
        })
        .collect();
      let mut url = url::Url::parse("image:///")?;
      url.set_path(&format!("/{}", segments.join("/")));
      Ok(url)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bare_paths_become_image_urls() {
    let url = parse_input_url("/tmp/ruang-arsip.png").unwrap();
    assert_eq!(url.scheme(), "image");
    assert_eq!(url.path(), "/tmp/ruang-arsip.png");

    let url = parse_input_url("image:///data/a.jpg").unwrap();
    assert_eq!(url.path(), "/data/a.jpg");
  }

  #[test]
  fn url_syntax_in_file_names_is_encoded() {
    let url = parse_input_url("/data/foto#1.png").unwrap();
    assert_eq!(url.fragment(), None);
    assert_eq!(url.path(), "/data/foto%231.png");

    let url = parse_input_url("/data/ruang arsip?/laporan%41.png").unwrap();
    assert_eq!(url.query(), None);
    assert_eq!(url.path(), "/data/ruang%20arsip%3F/laporan%2541.png");
    assert_eq!(
      urlencoding::decode(url.path()).unwrap(),
      "/data/ruang arsip?/laporan%41.png"
    );
  }
}
