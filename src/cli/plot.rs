//! # plot 子命令 CLI 定义
//!
//! 把一维扫描绘制成 PNG 或 SVG 衍射图谱。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/plot.rs`

use clap::Args;
use std::path::PathBuf;

/// plot 子命令参数
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Input .xrdml file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output image path; defaults to the input name with .png/.svg extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Chart title; defaults to the sample id or file name
    #[arg(short, long)]
    pub title: Option<String>,

    /// Image width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Render SVG instead of PNG
    #[arg(long, default_value_t = false)]
    pub svg: bool,

    /// Use a logarithmic intensity axis
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
