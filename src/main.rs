// 该文件是 Biodetect 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use biodetect::{
  DetectionKind, DetectionStore, FromUrl, SelectedFile, client::DetectionClientBuilder,
};

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = args::Args::parse();

  info!("输入文件: {}", args.file.display());
  info!("检测服务: {}", args.base_url);
  info!("检测端点: {}", args.endpoints.join(", "));

  let client = DetectionClientBuilder::from_url(&args.base_url)?.build()?;
  let store = Arc::new(DetectionStore::new(client));
  store.set_file(SelectedFile::from_path(&args.file)?);

  let mut tasks = JoinSet::new();
  for endpoint in args.endpoints {
    if endpoint.parse::<DetectionKind>().is_err() {
      warn!("{} 不是已知的检测类型，仍然尝试上传", endpoint);
    }
    let store = Arc::clone(&store);
    tasks.spawn(async move {
      let outcome = store.upload_image(&endpoint).await;
      (endpoint, outcome)
    });
  }

  let mut failed = 0usize;
  while let Some(joined) = tasks.join_next().await {
    let (endpoint, outcome) = joined?;
    match outcome {
      Ok(_) => info!("端点 {} 检测完成", endpoint),
      Err(e) => {
        error!("端点 {} 检测失败: {}", endpoint, e);
        failed += 1;
      }
    }
  }

  let results: serde_json::Map<_, _> = store.results().into_iter().collect();
  println!("{}", serde_json::to_string_pretty(&results)?);

  if failed > 0 {
    bail!("{} 个端点检测失败", failed);
  }
  Ok(())
}
