//! # XRDML 文档解码
//!
//! PANalytical X 射线衍射仪的 `.xrdml` 测量文档解析，自底向上分为
//! 五层：XML 遍历辅助、schema 版本检测、轴位置解析、单扫描提取、
//! 跨扫描聚合，由解码器统一编排。

pub mod aggregate;
pub mod axis;
pub mod diag;
pub mod document;
pub mod decoder;
pub mod scan;
pub mod schema;

pub use decoder::{decode_str, read_xrdml};
pub use diag::{Diagnostic, DiagnosticKind, DiagnosticSink};
