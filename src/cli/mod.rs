//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `export`: 解码并导出为分隔符文本表格
//! - `info`: 打印测量文档的元数据摘要与诊断
//! - `plot`: 绘制一维扫描的衍射图谱
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: export, info, plot

pub mod export;
pub mod info;
pub mod plot;

use clap::{Parser, Subcommand};

/// Xrdutil - XRDML 测量文档工具箱
#[derive(Parser)]
#[command(name = "xrdutil")]
#[command(version)]
#[command(about = "Decode, inspect and export PANalytical XRDML measurement files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Export decoded measurement data as a delimited text table
    Export(export::ExportArgs),

    /// Show metadata, axes and decoding diagnostics of a measurement file
    Info(info::InfoArgs),

    /// Plot a one-dimensional scan as PNG or SVG
    Plot(plot::PlotArgs),
}
