//! # 扫描记录提取器
//!
//! 把一个 `<scan>` 元素归一化为 [`ScanRecord`]：状态、驱动轴名、
//! 换算为 cps 的强度序列、计时基准，以及逐轴解析后的位置数值。
//!
//! 强度到 cps 的除法必须发生在任何跨扫描聚合之前，否则重复扫描
//! 的平均在数值上就是错的。
//!
//! ## 依赖关系
//! - 被 `xrdml/decoder.rs` 调用
//! - 使用 `xrdml/axis.rs` 解析位置块
//! - 使用 `models/dataset.rs` 的 AxisName, ScanStatus

use crate::error::{Result, XrdutilError};
use crate::models::{AxisName, ScanStatus};
use crate::xrdml::axis::{self, ResolvedAxis};
use crate::xrdml::diag::{DiagnosticKind, DiagnosticSink};
use crate::xrdml::document;
use roxmltree::Node;
use std::collections::BTreeMap;

/// 一次扫描的归一化记录
///
/// 生命周期很短：逐个产出后立刻被聚合器消费，单条记录不保留。
#[derive(Debug, Clone)]
pub struct ScanRecord {
    /// 文档内的扫描序号（从 0 计数）
    pub index: usize,
    /// 扫描状态
    pub status: ScanStatus,
    /// 驱动轴名（scanAxis 属性）
    pub scan_axis: Option<String>,
    /// 强度序列 (cps)
    pub intensities: Vec<f64>,
    /// 计时基准：定点计数模式为逐点序列，否则为单个共用计数时间
    pub time: Vec<f64>,
    /// 已解析的轴位置
    pub axes: BTreeMap<AxisName, ResolvedAxis>,
}

/// 提取一个扫描元素
///
/// 缺失强度块说明文档本身损坏，是致命错误；无法识别的轴名只记
/// 诊断并丢弃该轴。
pub fn extract(
    scan: Node,
    index: usize,
    filename: &str,
    diag: &mut DiagnosticSink,
) -> Result<ScanRecord> {
    let status = scan
        .attribute("status")
        .map(ScanStatus::parse)
        .unwrap_or_else(|| ScanStatus::Other(String::new()));
    let scan_axis = scan.attribute("scanAxis").map(|s| s.to_string());

    let data_points = document::find_child(scan, "dataPoints").ok_or_else(|| {
        XrdutilError::MalformedDocument {
            path: filename.to_string(),
            reason: format!("scan {} has no dataPoints block", index),
        }
    })?;

    let intensities_node = document::find_child(data_points, "intensities").ok_or_else(|| {
        XrdutilError::MalformedDocument {
            path: filename.to_string(),
            reason: format!("scan {} has no intensities block", index),
        }
    })?;
    let mut intensities = document::parse_float_list(intensities_node.text());
    let intensity_unit = intensities_node.attribute("unit");

    // 计时基准：定点计数模式记录逐点时间，否则是单个共用时间
    let time = if scan.attribute("mode") == Some("Pre-set counts") {
        document::parse_float_list(document::child_text(data_points, "countingTimes"))
    } else {
        document::parse_float_list(document::child_text(data_points, "commonCountingTime"))
    };

    // 原始计数先换算为 cps，之后才允许跨扫描聚合
    if intensity_unit == Some("counts") {
        divide_by_time(&mut intensities, &time, index, diag);
    }

    let n = intensities.len();
    let mut axes = BTreeMap::new();
    for positions in document::find_children(data_points, "positions") {
        let axis_attr = positions.attribute("axis").unwrap_or("");
        match AxisName::parse(axis_attr) {
            Some(name) => {
                let encoding = axis::decode_encoding(positions);
                let resolved = axis::resolve(encoding.as_ref(), n, name.as_str(), diag);
                axes.insert(name, resolved);
            }
            None => {
                diag.push(
                    DiagnosticKind::UnsupportedAxis,
                    format!("scan {}: axis type '{}' not supported", index, axis_attr),
                );
            }
        }
    }

    Ok(ScanRecord {
        index,
        status,
        scan_axis,
        intensities,
        time,
        axes,
    })
}

/// 逐元素用计时序列归一化强度
fn divide_by_time(intensities: &mut [f64], time: &[f64], index: usize, diag: &mut DiagnosticSink) {
    match time.len() {
        0 => {
            diag.push(
                DiagnosticKind::DataShapeMismatch,
                format!("scan {}: counts recorded without a counting time", index),
            );
        }
        1 => {
            for v in intensities.iter_mut() {
                *v /= time[0];
            }
        }
        n if n == intensities.len() => {
            for (v, t) in intensities.iter_mut().zip(time.iter()) {
                *v /= t;
            }
        }
        n => {
            diag.push(
                DiagnosticKind::DataShapeMismatch,
                format!(
                    "scan {}: {} counting times for {} data points",
                    index,
                    n,
                    intensities.len()
                ),
            );
            for v in intensities.iter_mut() {
                *v /= time[0];
            }
        }
    }
}
