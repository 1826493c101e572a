// 该文件是 Biodetect 项目的一部分。
// src/endpoint.rs - 检测端点
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

use std::{fmt, str::FromStr};

use thiserror::Error;
use url::Url;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EndpointError {
  #[error("端点标识不能为空")]
  Empty,
  #[error("基础 URL 不能作为路径前缀: {0}")]
  CannotBeBase(Url),
  #[error("未知的检测类型: {0}")]
  UnknownKind(String),
}

/// 检测服务提供的端点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionKind {
  /// 手臂关键点（肩、肘、腕）
  Arm,
  /// 手部与手指关键点
  ArmFingers,
  /// 虹膜关键点
  Eyes,
  /// 人脸框
  Head,
  /// 人数统计
  People,
}

impl DetectionKind {
  pub const ALL: [DetectionKind; 5] = [
    DetectionKind::Arm,
    DetectionKind::ArmFingers,
    DetectionKind::Eyes,
    DetectionKind::Head,
    DetectionKind::People,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      DetectionKind::Arm => "arm",
      DetectionKind::ArmFingers => "arm-fingers",
      DetectionKind::Eyes => "eyes",
      DetectionKind::Head => "head",
      DetectionKind::People => "people",
    }
  }
}

impl fmt::Display for DetectionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DetectionKind {
  type Err = EndpointError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    DetectionKind::ALL
      .into_iter()
      .find(|kind| kind.as_str() == s)
      .ok_or_else(|| EndpointError::UnknownKind(s.to_string()))
  }
}

impl AsRef<str> for DetectionKind {
  fn as_ref(&self) -> &str {
    self.as_str()
  }
}

/// 将端点标识作为一个路径段拼接到基础 URL 之后。
/// 标识中的 `/` 等字符会被转义，不会改变基础 URL 的层级。
pub fn endpoint_url(base: &Url, endpoint: &str) -> Result<Url, EndpointError> {
  if endpoint.is_empty() {
    return Err(EndpointError::Empty);
  }

  let mut url = base.clone();
  url
    .path_segments_mut()
    .map_err(|_| EndpointError::CannotBeBase(base.clone()))?
    .pop_if_empty()
    .push(endpoint);
  Ok(url)
}
