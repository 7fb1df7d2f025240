//! # 数据模型模块
//!
//! 定义归一化的测量数据集表示。
//!
//! ## 依赖关系
//! - 被 `xrdml/` 和 `commands/` 使用
//! - 子模块: dataset

pub mod dataset;

pub use dataset::{
    AxisName, AxisValues, Hkl, IncidentalScans, MeasurementDataset, MeasurementType, ScanStatus,
    Wavelength, WavelengthType,
};
