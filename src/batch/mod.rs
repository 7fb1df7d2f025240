//! # 批量处理模块
//!
//! 多文件导出的文件收集与并行执行。

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchResult, BatchRunner, ProcessResult};
