// 该文件是 Biodetect 项目的一部分。
// src/model.rs - 检测结果
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

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::endpoint::DetectionKind;

const STATUS_SUCCESS: &str = "success";

/// 某个端点返回结果的强类型视图
pub trait DetectReport: DeserializeOwned {
  const KIND: DetectionKind;

  fn status(&self) -> &str;

  fn is_success(&self) -> bool {
    self.status() == STATUS_SUCCESS
  }
}

/// 像素坐标下的关键点，`z` 为相对深度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub index: Option<u32>,
  pub x: f64,
  pub y: f64,
  pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmReport {
  pub status: String,
  #[serde(default)]
  pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
  /// "left" 或 "right"
  pub label: String,
  pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandsReport {
  pub status: String,
  #[serde(default)]
  pub hands: Vec<Hand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyesReport {
  pub status: String,
  #[serde(default)]
  pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
  pub xmin: i64,
  pub ymin: i64,
  pub width: i64,
  pub height: i64,
  pub confidence: f32,
}

impl FaceBox {
  /// [x_min, y_min, x_max, y_max]
  pub fn bbox(&self) -> [i64; 4] {
    [
      self.xmin,
      self.ymin,
      self.xmin + self.width,
      self.ymin + self.height,
    ]
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadReport {
  pub status: String,
  #[serde(default)]
  pub faces: Vec<FaceBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeopleReport {
  pub status: String,
  #[serde(default)]
  pub count: u32,
  #[serde(default)]
  pub landmarks: Vec<Landmark>,
}

macro_rules! detect_report {
  ($($report:ty => $kind:expr),* $(,)?) => {
    $(
      impl DetectReport for $report {
        const KIND: DetectionKind = $kind;

        fn status(&self) -> &str {
          &self.status
        }
      }
    )*
  };
}

detect_report! {
  ArmReport => DetectionKind::Arm,
  HandsReport => DetectionKind::ArmFingers,
  EyesReport => DetectionKind::Eyes,
  HeadReport => DetectionKind::Head,
  PeopleReport => DetectionKind::People,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn head_report_decodes_faces() {
    let report: HeadReport = serde_json::from_value(json!({
      "status": "success",
      "faces": [{"xmin": 10, "ymin": 20, "width": 30, "height": 40, "confidence": 0.9}]
    }))
    .unwrap();

    assert!(report.is_success());
    assert_eq!(report.faces.len(), 1);
    assert_eq!(report.faces[0].bbox(), [10, 20, 40, 60]);
  }

  #[test]
  fn hands_report_keeps_indices() {
    let report: HandsReport = serde_json::from_value(json!({
      "status": "success",
      "hands": [{"label": "left", "landmarks": [{"index": 0, "x": 1.0, "y": 2.0, "z": -0.1}]}]
    }))
    .unwrap();

    let landmark = &report.hands[0].landmarks[0];
    assert_eq!(landmark.index, Some(0));
    assert_eq!(landmark.name, None);
  }

  #[test]
  fn empty_detection_is_not_success() {
    let report: PeopleReport = serde_json::from_value(json!({
      "status": "no_pose_detected",
      "count": 0,
      "landmarks": []
    }))
    .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.count, 0);
  }

  #[test]
  fn reports_know_their_endpoint() {
    assert_eq!(ArmReport::KIND.as_str(), "arm");
    assert_eq!(HandsReport::KIND.as_str(), "arm-fingers");
    assert_eq!(EyesReport::KIND.as_str(), "eyes");
    assert_eq!(HeadReport::KIND.as_str(), "head");
    assert_eq!(PeopleReport::KIND.as_str(), "people");
  }
}
