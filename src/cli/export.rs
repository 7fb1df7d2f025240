//! # export 子命令 CLI 定义
//!
//! 解码 .xrdml 文件并导出为分隔符文本表格（文件或标准输出）。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/export.rs`

use clap::Args;
use std::path::PathBuf;

/// export 子命令参数
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Input .xrdml file or directory of files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file (single input) or directory (batch); defaults next to the input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the table to standard output instead of a file
    #[arg(long, default_value_t = false)]
    pub stdout: bool,

    /// Field delimiter for the output table
    #[arg(short, long, default_value = ",")]
    pub delimiter: char,

    /// Export q-space coordinates (q_par, q_perp) instead of angles
    #[arg(short, long, default_value_t = false)]
    pub qspace: bool,

    /// Offset added to the omega angle before the q-space transform
    #[arg(long, default_value_t = 0.0)]
    pub omega_offset: f64,

    /// Glob pattern for directory input
    #[arg(short, long, default_value = "*.xrdml")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
