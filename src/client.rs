// 该文件是 Biodetect 项目的一部分。
// src/client.rs - 检测服务 HTTP 客户端
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

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  endpoint::{EndpointError, endpoint_url},
  file::SelectedFile,
};

/// 线上检测服务的默认地址
pub const DEFAULT_BASE_URL: &str = "https://biomedical-detection.fly.dev/detect/";

/// multipart 表单中承载图像的字段名
pub const FILE_FIELD: &str = "file";

#[derive(Error, Debug)]
pub enum DetectionError {
  #[error("没有可上传的文件")]
  NoFileSelected,
  #[error("HTTP 错误，状态码: {status}")]
  HttpError { status: u16 },
  #[error("响应不是合法的 JSON: {0}")]
  MalformedResponse(#[source] serde_json::Error),
  #[error("端点无效: {0}")]
  InvalidEndpoint(#[from] EndpointError),
  #[error("服务地址无效: {0}")]
  InvalidBaseUrl(#[from] url::ParseError),
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("网络请求失败: {0}")]
  Transport(#[from] reqwest::Error),
}

impl DetectionError {
  /// 非 2xx 响应的状态码
  pub fn status(&self) -> Option<u16> {
    match self {
      DetectionError::HttpError { status } => Some(*status),
      _ => None,
    }
  }
}

/// 向检测服务发送单次上传请求，不做重试，也不设超时
#[derive(Debug, Clone)]
pub struct DetectionClient {
  client: reqwest::Client,
  base_url: Url,
}

#[derive(Debug, Default)]
pub struct DetectionClientBuilder {
  base_url: Option<Url>,
  client: Option<reqwest::Client>,
}

impl FromUrlWithScheme for DetectionClientBuilder {
  const SCHEME: &'static str = "https";
}

impl FromUrl for DetectionClientBuilder {
  type Error = DetectionError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    // 本地调试时允许明文 http
    if url.scheme() != Self::SCHEME && url.scheme() != "http" {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(DetectionError::SchemeMismatch);
    }

    Ok(DetectionClientBuilder::default().base_url(url.clone()))
  }
}

impl DetectionClientBuilder {
  pub fn base_url(mut self, base_url: Url) -> Self {
    self.base_url = Some(base_url);
    self
  }

  pub fn http_client(mut self, client: reqwest::Client) -> Self {
    self.client = Some(client);
    self
  }

  pub fn build(self) -> Result<DetectionClient, DetectionError> {
    let base_url = match self.base_url {
      Some(url) => url,
      None => Url::parse(DEFAULT_BASE_URL)?,
    };
    info!("检测服务地址: {}", base_url);

    Ok(DetectionClient {
      client: self.client.unwrap_or_default(),
      base_url,
    })
  }
}

impl DetectionClient {
  pub fn builder() -> DetectionClientBuilder {
    DetectionClientBuilder::default()
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// POST `file` 到 `<base_url>/<endpoint>`，成功时返回解析后的 JSON。
  /// 非 2xx 响应不会读取响应体。
  pub async fn detect(&self, endpoint: &str, file: &SelectedFile) -> Result<Value, DetectionError> {
    let url = endpoint_url(&self.base_url, endpoint)?;
    let form = Form::new().part(FILE_FIELD, file_part(file));

    info!("上传 {} ({} 字节) 到 {}", file.name(), file.len(), url);
    let now = std::time::Instant::now();
    let response = self
      .client
      .post(url.clone())
      .multipart(form)
      .send()
      .await
      .inspect_err(|e| error!("请求 {} 失败: {}", url, e))?;

    let status = response.status();
    debug!("{} 响应状态: {}, 耗时: {:.2?}", url, status, now.elapsed());
    if !status.is_success() {
      warn!("{} 返回错误状态: {}", url, status);
      return Err(DetectionError::HttpError {
        status: status.as_u16(),
      });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| {
      error!("{} 的响应无法解析为 JSON: {}", url, e);
      DetectionError::MalformedResponse(e)
    })
  }
}

fn file_part(file: &SelectedFile) -> Part {
  let part = || Part::bytes(file.as_ref().to_vec()).file_name(file.name().to_string());
  match file.mime() {
    Some(mime) => part().mime_str(mime).unwrap_or_else(|e| {
      warn!("忽略无效的 MIME 类型 {}: {}", mime, e);
      part()
    }),
    None => part(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builder_defaults_to_public_service() {
    let client = DetectionClient::builder().build().unwrap();
    assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
  }

  #[test]
  fn from_url_accepts_http_and_https() {
    for raw in ["http://127.0.0.1:8000/detect/", "https://example.com/detect/"] {
      let url = Url::parse(raw).unwrap();
      let client = DetectionClientBuilder::from_url(&url).unwrap().build().unwrap();
      assert_eq!(client.base_url(), &url);
    }
  }

  #[test]
  fn from_url_rejects_other_schemes() {
    let url = Url::parse("ftp://example.com/detect/").unwrap();
    assert!(matches!(
      DetectionClientBuilder::from_url(&url),
      Err(DetectionError::SchemeMismatch)
    ));
  }

  #[test]
  fn status_is_exposed_only_for_http_errors() {
    assert_eq!(DetectionError::HttpError { status: 503 }.status(), Some(503));
    assert_eq!(DetectionError::NoFileSelected.status(), None);
  }

  #[tokio::test]
  async fn injected_http_client_is_used() {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/detect/head"))
      .and(header("user-agent", "biodetect-test"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "success"})))
      .expect(1)
      .mount(&server)
      .await;

    let http = reqwest::Client::builder()
      .user_agent("biodetect-test")
      .build()
      .unwrap();
    let client = DetectionClient::builder()
      .base_url(Url::parse(&format!("{}/detect/", server.uri())).unwrap())
      .http_client(http)
      .build()
      .unwrap();

    let file = SelectedFile::new("a.png", vec![0u8]);
    let value = client.detect("head", &file).await.unwrap();
    assert_eq!(value, serde_json::json!({"status": "success"}));
  }
}
