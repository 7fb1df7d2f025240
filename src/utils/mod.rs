//! # 工具模块
//!
//! 终端输出样式与进度条的统一封装。

pub mod output;
pub mod progress;
