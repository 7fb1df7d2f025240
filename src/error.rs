//! # 统一错误处理模块
//!
//! 定义 xrdutil 的所有错误类型，使用 `thiserror` 派生。
//!
//! 只有结构性/致命条件才会成为错误（文件缺失、无匹配的 schema 版本、
//! 必需块缺失）。可恢复的分类问题（不支持的轴名、波长类型等）走
//! `xrdml::diag` 的诊断通道，不在这里。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xrdutil 统一错误类型
#[derive(Error, Debug)]
pub enum XrdutilError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 文档错误
    // ─────────────────────────────────────────────────────────────
    #[error("Not a well-formed XML document: {path}")]
    XmlError {
        path: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Malformed XRDML document: {path}\nReason: {reason}")]
    MalformedDocument { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XrdutilError>;
