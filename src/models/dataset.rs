//! # 测量数据集数据模型
//!
//! 定义 XRDML 解码器的输出类型。原始仪器文件中按测量类型增减键的
//! 动态字典在这里被固定为显式的记录类型：不一定存在的字段用
//! `Option`，"已坍缩为标量 vs 数组" 的二象性用 [`AxisValues`] 表达。
//!
//! ## 依赖关系
//! - 被 `xrdml/` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 测角仪/样品台轴，XRDML 中已知的位置轴集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxisName {
    TwoTheta,
    Omega,
    Phi,
    Psi,
    X,
    Y,
    Z,
}

impl AxisName {
    /// 全部已知轴，按仪器文件中的惯用顺序
    pub const ALL: [AxisName; 7] = [
        AxisName::TwoTheta,
        AxisName::Omega,
        AxisName::Phi,
        AxisName::Psi,
        AxisName::X,
        AxisName::Y,
        AxisName::Z,
    ];

    /// 解析 XRDML 的 axis 属性值，未知轴名返回 None
    pub fn parse(name: &str) -> Option<AxisName> {
        match name {
            "2Theta" => Some(AxisName::TwoTheta),
            "Omega" => Some(AxisName::Omega),
            "Phi" => Some(AxisName::Phi),
            "Psi" => Some(AxisName::Psi),
            "X" => Some(AxisName::X),
            "Y" => Some(AxisName::Y),
            "Z" => Some(AxisName::Z),
            _ => None,
        }
    }

    /// XRDML 文件中使用的轴名
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisName::TwoTheta => "2Theta",
            AxisName::Omega => "Omega",
            AxisName::Phi => "Phi",
            AxisName::Psi => "Psi",
            AxisName::X => "X",
            AxisName::Y => "Y",
            AxisName::Z => "Z",
        }
    }
}

impl std::fmt::Display for AxisName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 轴字段的取值形态
///
/// - `Scalar`: 所有采样点取同一值，冗余信息已坍缩
/// - `Series`: 一维测量的逐点数值
/// - `Grid`: 二维测量按扫描堆叠的行（每行一个 scan）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AxisValues {
    Scalar(f64),
    Series(Vec<f64>),
    Grid(Vec<Vec<f64>>),
}

impl AxisValues {
    /// 总采样点数
    pub fn sample_count(&self) -> usize {
        match self {
            AxisValues::Scalar(_) => 1,
            AxisValues::Series(v) => v.len(),
            AxisValues::Grid(rows) => rows.iter().map(|r| r.len()).sum(),
        }
    }

    /// (行数, 最大列数)
    pub fn shape(&self) -> (usize, usize) {
        match self {
            AxisValues::Scalar(_) => (1, 1),
            AxisValues::Series(v) => (1, v.len()),
            AxisValues::Grid(rows) => (
                rows.len(),
                rows.iter().map(|r| r.len()).max().unwrap_or(0),
            ),
        }
    }

    /// 按行主序展平为一维数组
    pub fn flatten(&self) -> Vec<f64> {
        match self {
            AxisValues::Scalar(v) => vec![*v],
            AxisValues::Series(v) => v.clone(),
            AxisValues::Grid(rows) => rows.iter().flatten().copied().collect(),
        }
    }

    /// 展平并广播到 `n` 个采样点
    ///
    /// 标量重复 n 次；数组长度已满足时原样返回。
    pub fn broadcast(&self, n: usize) -> Vec<f64> {
        match self {
            AxisValues::Scalar(v) => vec![*v; n],
            _ => self.flatten(),
        }
    }

    /// 取 (行, 列) 处的值，标量对任何下标都成立，单行序列对任何
    /// 行号都成立
    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        match self {
            AxisValues::Scalar(v) => Some(*v),
            AxisValues::Series(v) => v.get(col).copied(),
            AxisValues::Grid(rows) => rows.get(row)?.get(col).copied(),
        }
    }
}

/// 扫描状态，`status` 属性
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Completed,
    Aborted,
    Interrupted,
    /// 仪器自定义的其他状态
    Other(String),
}

impl ScanStatus {
    pub fn parse(s: &str) -> ScanStatus {
        match s {
            "Completed" => ScanStatus::Completed,
            "Aborted" => ScanStatus::Aborted,
            "Interrupted" => ScanStatus::Interrupted,
            other => ScanStatus::Other(other.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ScanStatus::Completed)
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Completed => write!(f, "Completed"),
            ScanStatus::Aborted => write!(f, "Aborted"),
            ScanStatus::Interrupted => write!(f, "Interrupted"),
            ScanStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// 测量类型，`measurementType` 属性
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementType {
    /// 单次扫描
    Scan,
    /// 重复扫描，各次结果取平均
    RepeatedScan,
    /// 二维面扫描（扫描轴 × 步进轴）
    AreaMeasurement,
    /// 其他带步进轴的测量类型
    Other(String),
}

impl MeasurementType {
    pub fn parse(s: &str) -> MeasurementType {
        match s {
            "Scan" => MeasurementType::Scan,
            "Repeated scan" => MeasurementType::RepeatedScan,
            "Area measurement" => MeasurementType::AreaMeasurement,
            other => MeasurementType::Other(other.to_string()),
        }
    }

    /// 一维测量（无步进轴）
    pub fn is_one_dimensional(&self) -> bool {
        matches!(self, MeasurementType::Scan | MeasurementType::RepeatedScan)
    }
}

impl std::fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasurementType::Scan => write!(f, "Scan"),
            MeasurementType::RepeatedScan => write!(f, "Repeated scan"),
            MeasurementType::AreaMeasurement => write!(f, "Area measurement"),
            MeasurementType::Other(s) => write!(f, "{}", s),
        }
    }
}

/// `usedWavelength` 块的 intended 属性
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavelengthType {
    /// 单线 Kα1
    KAlpha1,
    /// Kα1/Kα2 加权平均
    KAlpha,
    Other(String),
}

impl WavelengthType {
    pub fn parse(s: &str) -> WavelengthType {
        match s {
            "K-Alpha 1" => WavelengthType::KAlpha1,
            "K-Alpha" => WavelengthType::KAlpha,
            other => WavelengthType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for WavelengthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WavelengthType::KAlpha1 => write!(f, "K-Alpha 1"),
            WavelengthType::KAlpha => write!(f, "K-Alpha"),
            WavelengthType::Other(s) => write!(f, "{}", s),
        }
    }
}

/// 解析后的波长块
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wavelength {
    /// Kα1 波长 (Å)
    pub k_alpha1: f64,
    /// Kα2 波长 (Å)
    pub k_alpha2: f64,
    /// Kβ 波长 (Å)
    pub k_beta: f64,
    /// Kα2/Kα1 强度比
    pub k_alpha_ratio: f64,
    /// 文件声明的辐射类型
    pub intended: WavelengthType,
    /// 按辐射类型解析出的有效波长 λ (Å)
    pub lambda: f64,
}

/// Miller 指数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hkl {
    pub h: i32,
    pub k: i32,
    pub l: i32,
}

/// 未完成扫描的附带数据
///
/// 仅供检查用途保留，不参与主数据数组。行按扫描顺序堆叠。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentalScans {
    /// 扫描序号（文档内从 0 计数）
    pub scan_numbers: Vec<usize>,
    /// 每次扫描的强度行 (cps)
    pub intensities: Vec<Vec<f64>>,
    /// 每次扫描的计时行
    pub time: Vec<Vec<f64>>,
    /// 每次扫描的轴位置行
    pub axes: BTreeMap<AxisName, AxisValues>,
}

/// 解码后的测量数据集
///
/// 字段形态随测量类型变化：一维测量（Scan / Repeated scan）的轴字段
/// 是 `Series` 或坍缩后的 `Scalar`；二维测量（Area measurement 及其他
/// 步进轴类型）按扫描堆叠为 `Grid`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementDataset {
    /// 来源文件名
    pub filename: String,
    /// 匹配到的 XRDML schema 版本号
    pub schema_version: String,
    /// 样品编号
    pub sample: Option<String>,
    /// 文档级状态属性
    pub status: Option<String>,
    /// 注释（仅第一条会被捕获，键固定为 "1"）
    pub comment: BTreeMap<String, String>,
    /// 测量类型
    pub measurement_type: MeasurementType,
    /// 扫描驱动轴名（取第一个 scan 的 scanAxis）
    pub scan_axis: Option<String>,
    /// 步进轴名，仅二维测量存在
    pub step_axis: Option<String>,
    /// 衬底材料，仅多扫描且存在 reflection 块时存在
    pub substrate: Option<String>,
    /// 反射的 Miller 指数，仅多扫描且存在 reflection 块时存在
    pub hkl: Option<Hkl>,
    /// 波长信息
    pub wavelength: Wavelength,
    /// 主数据包含的扫描序号；重复扫描合并后无意义，置 None
    pub scan_numbers: Option<Vec<usize>>,
    /// 强度 (cps)
    pub intensities: AxisValues,
    /// 计数时间 (s)，重复扫描合并后为总曝光时间
    pub time: AxisValues,

    // 轴位置字段，仅文件中出现的轴存在
    pub two_theta: Option<AxisValues>,
    pub omega: Option<AxisValues>,
    pub phi: Option<AxisValues>,
    pub psi: Option<AxisValues>,
    pub stage_x: Option<AxisValues>,
    pub stage_y: Option<AxisValues>,
    pub stage_z: Option<AxisValues>,

    /// 驱动轴数值的副本，仅一维测量填充
    pub x: Option<AxisValues>,
    /// 驱动轴的规范标签
    pub x_label: Option<String>,
    /// 驱动轴单位，未能确定时为哨兵值 "nd"
    pub x_unit: Option<String>,
    /// 步进轴标签，仅二维测量
    pub y_label: Option<String>,
    /// 步进轴单位，仅二维测量
    pub y_unit: Option<String>,

    /// 入射光路 mask 宽度 (mm)
    pub mask_width: Option<f64>,
    /// 发散狭缝高度 (mm)
    pub slit_height: Option<f64>,

    /// 未完成扫描的附带数据；为空时整体省略
    pub incidental: Option<IncidentalScans>,
}

impl MeasurementDataset {
    /// 按轴名读取轴字段
    pub fn axis(&self, name: AxisName) -> Option<&AxisValues> {
        match name {
            AxisName::TwoTheta => self.two_theta.as_ref(),
            AxisName::Omega => self.omega.as_ref(),
            AxisName::Phi => self.phi.as_ref(),
            AxisName::Psi => self.psi.as_ref(),
            AxisName::X => self.stage_x.as_ref(),
            AxisName::Y => self.stage_y.as_ref(),
            AxisName::Z => self.stage_z.as_ref(),
        }
    }

    /// 主数据的采样点总数
    pub fn point_count(&self) -> usize {
        self.intensities.sample_count()
    }
}
