// 该文件是 K3Check 项目的一部分。
// src/input/image_file.rs - 图像文件输入
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

use std::path::PathBuf;

use thiserror::Error;
use tracing::error;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, input::Frame};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("路径不是合法的 UTF-8: {0}")]
  PathEncoding(#[from] std::string::FromUtf8Error),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[cfg(feature = "read_image_file")]
  #[error("图像加载错误: {0}")]
  ImageLoadError(#[from] image::ImageError),
}

/// 读取单张图像，迭代一次后耗尽
pub struct ImageFileInput {
  frame: Option<Frame>,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemeMismatch);
    }

    let source = PathBuf::from(urlencoding::decode(url.path())?.into_owned());
    Ok(ImageFileInput {
      frame: Some(load_frame(source)?),
    })
  }
}

#[cfg(feature = "read_image_file")]
fn load_frame(source: PathBuf) -> Result<Frame, ImageFileInputError> {
  let image = image::ImageReader::open(&source)?.decode()?;
  Ok(Frame {
    source,
    image: image.into(),
  })
}

#[cfg(not(feature = "read_image_file"))]
fn load_frame(source: PathBuf) -> Result<Frame, ImageFileInputError> {
  if !source.is_file() {
    return Err(ImageFileInputError::IoError(std::io::Error::new(
      std::io::ErrorKind::NotFound,
      format!("找不到图像文件: {}", source.display()),
    )));
  }
  Ok(Frame { source })
}

impl Iterator for ImageFileInput {
  type Item = Frame;

  fn next(&mut self) -> Option<Self::Item> {
    self.frame.take()
  }
}
