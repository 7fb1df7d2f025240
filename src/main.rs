//! # Xrdutil - XRDML 测量文档工具箱
//!
//! 解码 PANalytical 衍射仪产出的 .xrdml 测量文档，导出为表格、
//! 摘要或图表，并提供倒易空间坐标换算。
//!
//! ## 子命令
//! - `export` - 解码并导出为分隔符文本表格（可选 q 空间坐标）
//! - `info`   - 打印元数据摘要与解码诊断
//! - `plot`   - 绘制一维扫描的衍射图谱
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── xrdml/   (测量文档解码)
//!   │     ├── qspace/  (倒易空间变换)
//!   │     └── models/  (数据模型)
//!   ├── batch/      (批量处理)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod qspace;
mod utils;
mod xrdml;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
