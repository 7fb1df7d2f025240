//! # 诊断通道
//!
//! 解码过程中可恢复问题的收集器。解码器不直接打印也不持有全局
//! 状态，而是把诊断写入显式传入的 [`DiagnosticSink`]，由调用方
//! （命令层）决定如何呈现。任何非致命分支都必须留下一条记录。
//!
//! ## 依赖关系
//! - 被 `xrdml/` 各子模块写入
//! - 被 `commands/` 读取并经 `utils/output` 呈现

/// 非致命问题的分类，对应降级策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// 已知集合之外的位置轴名，该轴被丢弃
    UnsupportedAxis,
    /// 无法识别的 scanAxis / stepAxis，标签退化为 "unknown"
    UnsupportedScanAxis,
    /// 无法识别的 intended 辐射类型，回退到 Kα1
    UnsupportedWavelengthType,
    /// 无法识别的轴位置编码，产出空序列
    UnsupportedEncoding,
    /// 轴位置点数与强度点数不一致
    DataShapeMismatch,
    /// 单位不符合假定（如 mask/slit 非 mm）
    UnitAssumption,
    /// 其他提示性信息（如孤立未完成扫描的提升）
    Note,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiagnosticKind::UnsupportedAxis => "unsupported axis",
            DiagnosticKind::UnsupportedScanAxis => "unsupported scan axis",
            DiagnosticKind::UnsupportedWavelengthType => "unsupported wavelength type",
            DiagnosticKind::UnsupportedEncoding => "unsupported encoding",
            DiagnosticKind::DataShapeMismatch => "data shape mismatch",
            DiagnosticKind::UnitAssumption => "unit assumption",
            DiagnosticKind::Note => "note",
        };
        write!(f, "{}", name)
    }
}

/// 一条诊断记录
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// 诊断收集器
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一条诊断
    pub fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            kind,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// 是否包含某一类诊断
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_collects_in_order() {
        let mut sink = DiagnosticSink::new();
        assert!(sink.is_empty());

        sink.push(DiagnosticKind::UnsupportedAxis, "axis 'Chi' dropped");
        sink.push(DiagnosticKind::Note, "promoted lone incomplete scan");

        assert_eq!(sink.len(), 2);
        assert!(sink.contains(DiagnosticKind::UnsupportedAxis));
        assert!(!sink.contains(DiagnosticKind::DataShapeMismatch));

        let first = sink.iter().next().unwrap();
        assert_eq!(first.kind, DiagnosticKind::UnsupportedAxis);
        assert!(first.to_string().contains("Chi"));
    }
}
