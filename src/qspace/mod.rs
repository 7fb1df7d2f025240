//! # 倒易空间坐标变换
//!
//! 角度坐标 (2θ, ω) 与倒易空间坐标 (q∥, q⊥) 之间的纯数值换算，
//! 以及 Miller 指数到衍射几何角度的正向计算。

pub mod transform;

pub use transform::{
    angles_to_qvector, hkl_to_angles, q_map, q_to_hkl_map, LatticeParams,
};
