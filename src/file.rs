// 该文件是 Biodetect 项目的一部分。
// src/file.rs - 待上传的图像文件
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

use std::{path::Path, sync::Arc};

use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme};

#[derive(Error, Debug)]
pub enum SelectedFileError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("URI 无法转换为本地路径: {0}")]
  InvalidFileUrl(Url),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 没有文件名时使用的默认名称
const DEFAULT_FILE_NAME: &str = "upload";

/// 用户选择的图像文件，内容不做任何校验
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
  name: String,
  mime: Option<String>,
  data: Arc<[u8]>,
}

impl SelectedFile {
  /// 由文件名与原始字节创建，MIME 类型按扩展名推断
  pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
    let name = name.into();
    let mime = guess_mime(&name);
    Self {
      name,
      mime,
      data: Arc::from(data.into()),
    }
  }

  pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
    self.mime = Some(mime.into());
    self
  }

  /// 从本地路径读取整个文件
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SelectedFileError> {
    let path = path.as_ref();
    let data = std::fs::read(path).inspect_err(|e| {
      error!("读取文件失败: {}, 错误: {}", path.display(), e);
    })?;
    debug!(
      "读取文件: {}, 大小: {:.2} KB",
      path.display(),
      data.len() as f64 / 1024.0
    );

    let name = path
      .file_name()
      .and_then(|n| n.to_str())
      .unwrap_or(DEFAULT_FILE_NAME);
    Ok(Self::new(name, data))
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn mime(&self) -> Option<&str> {
    self.mime.as_deref()
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }
}

impl AsRef<[u8]> for SelectedFile {
  fn as_ref(&self) -> &[u8] {
    &self.data
  }
}

impl FromUrlWithScheme for SelectedFile {
  const SCHEME: &'static str = "file";
}

impl FromUrl for SelectedFile {
  type Error = SelectedFileError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(SelectedFileError::SchemeMismatch);
    }

    let path = url.to_file_path().map_err(|_| {
      error!("URI 无法转换为本地路径: {}", url);
      SelectedFileError::InvalidFileUrl(url.clone())
    })?;
    Self::from_path(path)
  }
}

#[cfg(feature = "read_image_file")]
fn guess_mime(name: &str) -> Option<String> {
  image::ImageFormat::from_path(name)
    .ok()
    .map(|format| format.to_mime_type().to_string())
}

#[cfg(not(feature = "read_image_file"))]
fn guess_mime(_name: &str) -> Option<String> {
  None
}
