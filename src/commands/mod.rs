//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `xrdml/`, `qspace/`, `batch/`, `utils/`
//! - 子模块: export, info, plot

pub mod export;
pub mod info;
pub mod plot;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Export(args) => export::execute(args),
        Commands::Info(args) => info::execute(args),
        Commands::Plot(args) => plot::execute(args),
    }
}
