// 该文件是 Biodetect 项目的一部分。
// src/store.rs - 检测会话状态
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

use std::{
  collections::HashMap,
  sync::{Mutex, MutexGuard, PoisonError},
};

use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
  client::{DetectionClient, DetectionError},
  file::SelectedFile,
  model::DetectReport,
};

const EVENT_CAPACITY: usize = 16;

/// 会话状态变化通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
  FileSelected { name: String },
  ResultStored { endpoint: String },
}

/// 检测会话：保存当前选择的文件，以及每个端点最近一次的返回结果。
///
/// 所有方法只需要 `&self`，可以放进 `Arc` 中在多个任务间共享。
/// 并发上传之间没有任何协调，同一端点以最后完成的请求为准。
pub struct DetectionStore {
  client: DetectionClient,
  file: Mutex<Option<SelectedFile>>,
  results: Mutex<HashMap<String, Value>>,
  events: broadcast::Sender<StoreEvent>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DetectionStore {
  pub fn new(client: DetectionClient) -> Self {
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    Self {
      client,
      file: Mutex::new(None),
      results: Mutex::new(HashMap::new()),
      events,
    }
  }

  pub fn base_url(&self) -> &Url {
    self.client.base_url()
  }

  /// 无条件替换当前文件
  pub fn set_file(&self, file: SelectedFile) {
    info!("选择文件: {} ({} 字节)", file.name(), file.len());
    let name = file.name().to_string();
    *lock(&self.file) = Some(file);
    let _ = self.events.send(StoreEvent::FileSelected { name });
  }

  pub fn file(&self) -> Option<SelectedFile> {
    lock(&self.file).clone()
  }

  pub fn has_file(&self) -> bool {
    lock(&self.file).is_some()
  }

  /// 上传当前文件到 `endpoint`，成功后把结果记录在该端点下并返回。
  ///
  /// 文件在调用开始时取快照，上传过程中重新选择文件不影响本次请求。
  pub async fn upload_image(&self, endpoint: &str) -> Result<Value, DetectionError> {
    let file = self.file().ok_or_else(|| {
      warn!("端点 {} 上传失败: 尚未选择文件", endpoint);
      DetectionError::NoFileSelected
    })?;

    let value = self.client.detect(endpoint, &file).await?;

    lock(&self.results).insert(endpoint.to_string(), value.clone());
    debug!("端点 {} 的结果已更新", endpoint);
    let _ = self.events.send(StoreEvent::ResultStored {
      endpoint: endpoint.to_string(),
    });

    Ok(value)
  }

  pub fn result(&self, endpoint: &str) -> Option<Value> {
    lock(&self.results).get(endpoint).cloned()
  }

  /// 所有端点结果的快照
  pub fn results(&self) -> HashMap<String, Value> {
    lock(&self.results).clone()
  }

  /// 按已知检测类型解析对应端点的结果，尚无结果时返回 `None`
  pub fn report<T: DetectReport>(&self) -> Result<Option<T>, DetectionError> {
    self
      .result(T::KIND.as_str())
      .map(|value| serde_json::from_value(value).map_err(DetectionError::MalformedResponse))
      .transpose()
  }

  pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
    self.events.subscribe()
  }
}
