//! # 角度-q 空间变换
//!
//! 无状态纯函数。除底层数学的定义域约束外没有错误路径：例如
//! 反正弦参数超出 [-1, 1] 时直接产出 NaN，由调用方自行识别，
//! 不在这里抛错。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块调用
//! - 使用 `models/dataset.rs` 的 MeasurementDataset, Hkl

use crate::error::{Result, XrdutilError};
use crate::models::{AxisValues, Hkl, MeasurementDataset};

/// 正交晶格常数 (a, b, c)，单位 Å
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LatticeParams {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        LatticeParams { a, b, c }
    }

    /// 立方晶格
    pub fn cubic(a: f64) -> Self {
        LatticeParams { a, b: a, c: a }
    }
}

/// SrTiO3 立方晶格，最常见的钙钛矿衬底
impl Default for LatticeParams {
    fn default() -> Self {
        LatticeParams::cubic(3.905)
    }
}

/// (2θ, ω, λ) → (q∥, q⊥)
///
/// 角度以度为单位，λ 以 Å 为单位，返回的 q 分量单位为 Å⁻¹。
pub fn angles_to_qvector(two_theta: f64, omega: f64, lambda: f64) -> (f64, f64) {
    let theta = two_theta.to_radians() / 2.0;
    let delta = theta - omega.to_radians();
    let delta_k = 2.0 / lambda * theta.sin();

    let q_par = delta_k * delta.sin();
    let q_perp = delta_k * delta.cos();
    (q_par, q_perp)
}

/// 把 q 空间坐标换算到以给定反射为基准的 hk 坐标
///
/// 面内分量除以该反射的面内倒易长度，面外分量乘以 c。
pub fn q_to_hkl_map(x: f64, y: f64, lattice: LatticeParams, hkl: &Hkl) -> (f64, f64) {
    let h = hkl.h as f64;
    let k = hkl.k as f64;
    let in_plane = ((h / lattice.a).powi(2) + (k / lattice.b).powi(2)).sqrt();
    (x / in_plane, y * lattice.c)
}

/// 给定反射的衍射几何角度 (2θ, ω, δ)
///
/// δ 是样品表面法线与衍射矢量的夹角（面外偏移），ω = θ - δ。
pub fn hkl_to_angles(hkl: &Hkl, lambda: f64, lattice: LatticeParams) -> (f64, f64, f64) {
    let h = hkl.h as f64;
    let k = hkl.k as f64;
    let l = hkl.l as f64;

    let d_hkl = 1.0
        / ((h / lattice.a).powi(2) + (k / lattice.b).powi(2) + (l / lattice.c).powi(2)).sqrt();

    let theta = (lambda / (2.0 * d_hkl)).asin().to_degrees();
    let out_of_plane = 1.0 / ((l / lattice.c).powi(2)).sqrt();
    let in_plane = 1.0 / ((h / lattice.a).powi(2) + (k / lattice.b).powi(2)).sqrt();
    let offset = (out_of_plane / in_plane).atan().to_degrees();

    (2.0 * theta, theta - offset, offset)
}

/// 数据集的逐点 q 空间映射
///
/// 以强度数组的形状为准逐点取 (2θ, ω) 对，按行主序换算为展平的
/// (q∥, q⊥) 序列，与 `intensities.flatten()` 逐元素对应。标量和
/// 单行轴按行广播。缺轴或下标无法对齐时报参数错误。
pub fn q_map(
    data: &MeasurementDataset,
    omega_offset: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let two_theta = data.two_theta.as_ref().ok_or_else(|| {
        XrdutilError::InvalidArgument(format!("{}: no 2Theta axis recorded", data.filename))
    })?;
    let omega = data.omega.as_ref().ok_or_else(|| {
        XrdutilError::InvalidArgument(format!("{}: no Omega axis recorded", data.filename))
    })?;

    let (rows, _) = data.intensities.shape();
    let lambda = data.wavelength.lambda;
    let mut q_par = Vec::with_capacity(data.intensities.sample_count());
    let mut q_perp = Vec::with_capacity(data.intensities.sample_count());

    for row in 0..rows {
        let cols = match &data.intensities {
            AxisValues::Grid(grid) => grid.get(row).map(|r| r.len()).unwrap_or(0),
            _ => data.intensities.shape().1,
        };
        for col in 0..cols {
            let tt = two_theta.value_at(row, col);
            let om = omega.value_at(row, col);
            match (tt, om) {
                (Some(tt), Some(om)) => {
                    let (par, perp) = angles_to_qvector(tt, om + omega_offset, lambda);
                    q_par.push(par);
                    q_perp.push(perp);
                }
                _ => {
                    return Err(XrdutilError::InvalidArgument(format!(
                        "{}: angle arrays do not cover data point ({}, {})",
                        data.filename, row, col
                    )));
                }
            }
        }
    }

    Ok((q_par, q_perp))
}
