//! # 轴位置解析器
//!
//! XRDML 的 `<positions>` 块用三种互斥的方式之一记录一条轴的位置：
//! 逐点列表（listPositions）、起止区间（startPosition/endPosition）
//! 或全程共值（commonPosition）。这里把属性探测式的分支固化为
//! 带标签的 [`AxisEncoding`]，在 XML 遍历时解码一次，再按所属扫描
//! 的点数解析为具体数值序列。
//!
//! ## 依赖关系
//! - 被 `xrdml/scan.rs` 调用
//! - 使用 `xrdml/document.rs` 和 `xrdml/diag.rs`

use crate::xrdml::diag::{DiagnosticKind, DiagnosticSink};
use crate::xrdml::document;
use roxmltree::Node;

/// 一条轴的原始编码
#[derive(Debug, Clone, PartialEq)]
pub enum AxisEncoding {
    /// 逐点位置列表
    Explicit(Vec<f64>),
    /// 起止区间，按点数线性插值
    Range { start: f64, end: f64 },
    /// 全程共值
    Constant(f64),
}

/// 解析后的轴数值
///
/// `Constant` 编码保持零维标量，广播到兄弟数组的长度是聚合阶段的
/// 职责，不在这里发生。
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAxis {
    Scalar(f64),
    Series(Vec<f64>),
}

impl ResolvedAxis {
    /// 展开为一行数值（标量成为单元素行）
    pub fn to_row(&self) -> Vec<f64> {
        match self {
            ResolvedAxis::Scalar(v) => vec![*v],
            ResolvedAxis::Series(v) => v.clone(),
        }
    }
}

/// 从 `<positions>` 元素解码轴编码
///
/// 子元素不含任何已知编码时返回 None，由 [`resolve`] 负责降级。
pub fn decode_encoding(positions: Node) -> Option<AxisEncoding> {
    if let Some(list) = document::find_child(positions, "listPositions") {
        return Some(AxisEncoding::Explicit(document::parse_float_list(
            list.text(),
        )));
    }

    let start = document::parse_double(document::child_text(positions, "startPosition"));
    let end = document::parse_double(document::child_text(positions, "endPosition"));
    if start.is_some() || end.is_some() {
        return Some(AxisEncoding::Range {
            start: start.unwrap_or(0.0),
            end: end.unwrap_or(0.0),
        });
    }

    if let Some(value) = document::parse_double(document::child_text(positions, "commonPosition")) {
        return Some(AxisEncoding::Constant(value));
    }

    None
}

/// 把轴编码解析为 `required_len` 个点的数值序列
///
/// 任何输入都不会导致错误：点数不足记 DataShapeMismatch 但照常
/// 使用，未知编码产出空序列并记诊断。
pub fn resolve(
    encoding: Option<&AxisEncoding>,
    required_len: usize,
    axis_label: &str,
    diag: &mut DiagnosticSink,
) -> ResolvedAxis {
    match encoding {
        Some(AxisEncoding::Explicit(values)) => {
            if values.len() < required_len {
                diag.push(
                    DiagnosticKind::DataShapeMismatch,
                    format!(
                        "axis '{}' lists {} positions for {} data points",
                        axis_label,
                        values.len(),
                        required_len
                    ),
                );
            }
            ResolvedAxis::Series(values.clone())
        }
        Some(AxisEncoding::Range { start, end }) => {
            ResolvedAxis::Series(linspace(*start, *end, required_len))
        }
        Some(AxisEncoding::Constant(value)) => ResolvedAxis::Scalar(*value),
        None => {
            diag.push(
                DiagnosticKind::UnsupportedEncoding,
                format!("axis '{}' uses an unsupported position encoding", axis_label),
            );
            ResolvedAxis::Series(Vec::new())
        }
    }
}

/// `n` 个从 start 到 end 的等距值，两端取准确值
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}
