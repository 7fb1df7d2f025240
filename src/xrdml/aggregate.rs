//! # 扫描聚合器
//!
//! 把逐条 [`ScanRecord`] 折叠成文档级数据：
//! - 完整性划分：测量类型为 Scan、或扫描状态为 Completed 的扫描
//!   进入主桶，其余进入附带桶（仅供检查）
//! - 孤立未完成扫描的提升：主桶为空且附带桶恰有一条时，把那一条
//!   视为真正的结果
//! - 冗余坍缩：全部取值一致 → 标量；各行一致 → 单行；否则按扫描
//!   堆叠为网格
//! - 重复扫描：主桶强度逐点取平均（各行已是 cps），计时乘以扫描数
//!
//! ## 依赖关系
//! - 被 `xrdml/decoder.rs` 调用
//! - 使用 `xrdml/scan.rs` 的 ScanRecord
//! - 使用 `models/dataset.rs` 的 AxisValues

use crate::models::{AxisName, AxisValues, MeasurementType};
use crate::xrdml::axis::ResolvedAxis;
use crate::xrdml::diag::{DiagnosticKind, DiagnosticSink};
use crate::xrdml::scan::ScanRecord;
use std::collections::BTreeMap;

/// 按扫描堆叠的原始行，坍缩前的形态
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    pub scan_numbers: Vec<usize>,
    pub intensities: Vec<Vec<f64>>,
    pub time: Vec<Vec<f64>>,
    pub axes: BTreeMap<AxisName, Vec<ResolvedAxis>>,
}

impl Bucket {
    pub fn is_empty(&self) -> bool {
        self.scan_numbers.is_empty()
    }

    pub fn scan_count(&self) -> usize {
        self.scan_numbers.len()
    }

    fn push(&mut self, record: ScanRecord) {
        self.scan_numbers.push(record.index);
        self.intensities.push(record.intensities);
        self.time.push(record.time);
        for (name, resolved) in record.axes {
            self.axes.entry(name).or_default().push(resolved);
        }
    }
}

/// 把扫描记录划分为 (主桶, 附带桶)
///
/// 提升规则在划分完成后作为纯后处理步骤执行：零条完成扫描加上
/// 恰好一条未完成扫描时，那一条就是测量结果。
pub fn aggregate(
    records: Vec<ScanRecord>,
    measurement_type: &MeasurementType,
    diag: &mut DiagnosticSink,
) -> (Bucket, Bucket) {
    let mut primary = Bucket::default();
    let mut incidental = Bucket::default();

    for record in records {
        if *measurement_type == MeasurementType::Scan || record.status.is_completed() {
            primary.push(record);
        } else {
            incidental.push(record);
        }
    }

    if primary.is_empty() && incidental.scan_count() == 1 {
        diag.push(
            DiagnosticKind::Note,
            "one and only incomplete scan found; treating it as complete",
        );
        primary = std::mem::take(&mut incidental);
    }

    (primary, incidental)
}

/// 坍缩一个轴字段的堆叠行
///
/// 规则按优先级：没有行 → None；全部取值一致 → `Scalar`；各行
/// 一致（或只有一行）→ 单行；否则保留 `Grid`，标量行成为单列行。
pub fn collapse_axis_rows(rows: &[ResolvedAxis]) -> Option<AxisValues> {
    if rows.is_empty() {
        return None;
    }

    let mut values = rows.iter().flat_map(|r| r.to_row());
    if let Some(first) = values.next() {
        if values.all(|v| v == first) {
            return Some(AxisValues::Scalar(first));
        }
    } else {
        // 所有行都是空序列（不支持的编码降级产物）
        return Some(AxisValues::Series(Vec::new()));
    }

    if rows.len() == 1 || rows.windows(2).all(|w| w[0] == w[1]) {
        return Some(match &rows[0] {
            ResolvedAxis::Scalar(v) => AxisValues::Scalar(*v),
            ResolvedAxis::Series(v) => AxisValues::Series(v.clone()),
        });
    }

    Some(AxisValues::Grid(rows.iter().map(|r| r.to_row()).collect()))
}

/// 坍缩计时等纯序列行，规则与 [`collapse_axis_rows`] 相同
pub fn collapse_series_rows(rows: &[Vec<f64>]) -> Option<AxisValues> {
    let as_resolved: Vec<ResolvedAxis> =
        rows.iter().map(|r| ResolvedAxis::Series(r.clone())).collect();
    collapse_axis_rows(&as_resolved)
}

/// 强度行不坍缩，只按行数决定 Series/Grid
pub fn stack_intensity_rows(rows: &[Vec<f64>]) -> AxisValues {
    match rows.len() {
        1 => AxisValues::Series(rows[0].clone()),
        _ => AxisValues::Grid(rows.to_vec()),
    }
}

/// 重复扫描的逐点平均
///
/// 每行必须已经是 cps，先平均后换算会得到错误的数值。行长不一致
/// 记诊断并截断到最短行。
pub fn average_intensity_rows(rows: &[Vec<f64>], diag: &mut DiagnosticSink) -> Vec<f64> {
    if rows.is_empty() {
        return Vec::new();
    }

    let len = rows.iter().map(|r| r.len()).min().unwrap_or(0);
    if rows.iter().any(|r| r.len() != len) {
        diag.push(
            DiagnosticKind::DataShapeMismatch,
            format!(
                "repeated scans differ in length; truncating to {} points",
                len
            ),
        );
    }

    let k = rows.len() as f64;
    (0..len)
        .map(|i| rows.iter().map(|r| r[i]).sum::<f64>() / k)
        .collect()
}
