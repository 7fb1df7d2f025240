//! # info 子命令 CLI 定义
//!
//! 打印测量文档的元数据摘要、轴形状与解码诊断。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`

use clap::Args;
use std::path::PathBuf;

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Input .xrdml files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Suppress the decoding diagnostics section
    #[arg(long, default_value_t = false)]
    pub no_diagnostics: bool,
}
