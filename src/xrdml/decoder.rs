//! # 测量文档解码器
//!
//! 编排整个解码流程：schema 版本检测、文档级元数据、逐扫描提取与
//! 聚合、轴标签/单位解析、面扫描形状修正、波长解析，最终产出
//! [`MeasurementDataset`]。
//!
//! 解码是文档字节的纯函数：不持有全局状态，同一文档解码两次得到
//! 完全相同的结果。结构性问题（无匹配 schema、必需块缺失）立即
//! 以错误返回；分类性问题一律降级并写入诊断通道，部分可识别的
//! 文件仍然产出可用的数据集。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块调用
//! - 使用 `xrdml/schema.rs`, `xrdml/scan.rs`, `xrdml/aggregate.rs`
//! - 使用 `models/dataset.rs` 数据模型

use crate::error::{Result, XrdutilError};
use crate::models::{
    AxisName, AxisValues, Hkl, IncidentalScans, MeasurementDataset, MeasurementType, Wavelength,
    WavelengthType,
};
use crate::xrdml::aggregate::{self, Bucket};
use crate::xrdml::diag::{DiagnosticKind, DiagnosticSink};
use crate::xrdml::document;
use crate::xrdml::scan;
use crate::xrdml::schema;
use roxmltree::{Document, Node};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 单位无法确定时的哨兵值
const UNIT_NOT_DETERMINED: &str = "nd";

/// Kα1:Kα2 布居比对应的加权平均分母
const K_ALPHA_WEIGHT: f64 = 1.5;

/// 读取并解码一个 `.xrdml` 文件
pub fn read_xrdml(path: &Path, diag: &mut DiagnosticSink) -> Result<MeasurementDataset> {
    if !path.exists() {
        return Err(XrdutilError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| XrdutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    decode_str(&content, &path.display().to_string(), diag)
}

/// 从字符串内容解码 XRDML 文档
pub fn decode_str(
    xml: &str,
    filename: &str,
    diag: &mut DiagnosticSink,
) -> Result<MeasurementDataset> {
    let doc = Document::parse(xml).map_err(|e| XrdutilError::XmlError {
        path: filename.to_string(),
        source: e,
    })?;

    let schema_version = schema::detect_version(&doc).ok_or_else(|| {
        XrdutilError::MalformedDocument {
            path: filename.to_string(),
            reason: format!(
                "no matching XRDML schema version (tried {})",
                schema::attempted_versions()
            ),
        }
    })?;

    let root = doc.root_element();
    let measurement = document::find_child(root, "xrdMeasurement").ok_or_else(|| {
        XrdutilError::MalformedDocument {
            path: filename.to_string(),
            reason: "missing mandatory xrdMeasurement block".to_string(),
        }
    })?;

    // ── 文档级元数据 ──────────────────────────────────────────
    let sample = document::path_text(root, &["sample", "id"]).map(|s| s.to_string());
    let status = root.attribute("status").map(|s| s.to_string());

    // 仅捕获第一条注释
    let mut comment = BTreeMap::new();
    comment.insert(
        "1".to_string(),
        document::path_text(root, &["comment", "entry"])
            .unwrap_or("")
            .to_string(),
    );

    let measurement_type = measurement
        .attribute("measurementType")
        .map(MeasurementType::parse)
        .unwrap_or_else(|| MeasurementType::Other(String::new()));

    let step_axis = if measurement_type.is_one_dimensional() {
        None
    } else {
        measurement
            .attribute("measurementStepAxis")
            .map(|s| s.to_string())
    };

    let scans = document::find_children(measurement, "scan");
    let nb_scans = scans.len();

    let scan_axis = scans
        .first()
        .and_then(|s| s.attribute("scanAxis"))
        .map(|s| s.to_string());

    // reflection 块只在多扫描文档里有意义
    let (substrate, hkl) = if nb_scans > 1 {
        read_reflection(scans[0], diag)
    } else {
        (None, None)
    };

    // ── 逐扫描提取与聚合 ──────────────────────────────────────
    let mut records = Vec::with_capacity(nb_scans);
    for (k, scan_node) in scans.iter().enumerate() {
        records.push(scan::extract(*scan_node, k, filename, diag)?);
    }
    let (primary, incidental) = aggregate::aggregate(records, &measurement_type, diag);

    let mut intensities = aggregate::stack_intensity_rows(&primary.intensities);
    let mut time = aggregate::collapse_series_rows(&primary.time)
        .unwrap_or_else(|| AxisValues::Series(Vec::new()));
    let mut scan_numbers = Some(primary.scan_numbers.clone());

    let mut dataset_axes: BTreeMap<AxisName, AxisValues> = BTreeMap::new();
    for name in AxisName::ALL {
        if let Some(rows) = primary.axes.get(&name) {
            if let Some(values) = aggregate::collapse_axis_rows(rows) {
                dataset_axes.insert(name, values);
            }
        }
    }

    // 重复扫描：各次已是 cps，逐点平均；计时变为总曝光；扫描序号
    // 合并后不再有意义
    if measurement_type == MeasurementType::RepeatedScan && !primary.is_empty() {
        let k = primary.scan_count();
        intensities =
            AxisValues::Series(aggregate::average_intensity_rows(&primary.intensities, diag));
        time = scale_values(time, k as f64);
        scan_numbers = None;
    }

    // ── 波长解析 ──────────────────────────────────────────────
    let wavelength = read_wavelength(measurement, filename, diag)?;

    // ── 轴标签与单位 ──────────────────────────────────────────
    let mut x = None;
    let mut x_label = None;
    let mut x_unit = None;
    let mut y_label = None;
    let mut y_unit = None;

    if nb_scans > 0 {
        if let Some(name) = scan_axis.as_deref() {
            let (label, physical) = resolve_axis_label(name, "scanAxis", diag);
            x_label = Some(label);
            x_unit = Some(unit_for_axis(scans[0], physical));
            if measurement_type.is_one_dimensional() {
                x = physical.and_then(|p| dataset_axes.get(&p)).cloned();
            }
        }

        if let Some(name) = step_axis.as_deref() {
            let (label, physical) = resolve_axis_label(name, "stepAxis", diag);
            y_label = Some(label);
            y_unit = Some(unit_for_axis(scans[0], physical));
        }
    }

    // ── 面扫描形状修正 ────────────────────────────────────────
    if measurement_type == MeasurementType::AreaMeasurement {
        reconcile_area_shapes(
            &mut dataset_axes,
            scan_axis.as_deref(),
            step_axis.as_deref(),
            diag,
        );
    }

    // ── 可选光路参数 ──────────────────────────────────────────
    let mask_width = read_beam_path_scalar(
        measurement,
        &["incidentBeamPath", "mask", "width"],
        "mask width",
        diag,
    );
    let slit_height = read_beam_path_scalar(
        measurement,
        &["incidentBeamPath", "divergenceSlit", "height"],
        "divergence slit height",
        diag,
    );

    let incidental = bucket_to_incidental(incidental);

    Ok(MeasurementDataset {
        filename: filename.to_string(),
        schema_version: schema_version.to_string(),
        sample,
        status,
        comment,
        measurement_type,
        scan_axis,
        step_axis,
        substrate,
        hkl,
        wavelength,
        scan_numbers,
        intensities,
        time,
        two_theta: dataset_axes.remove(&AxisName::TwoTheta),
        omega: dataset_axes.remove(&AxisName::Omega),
        phi: dataset_axes.remove(&AxisName::Phi),
        psi: dataset_axes.remove(&AxisName::Psi),
        stage_x: dataset_axes.remove(&AxisName::X),
        stage_y: dataset_axes.remove(&AxisName::Y),
        stage_z: dataset_axes.remove(&AxisName::Z),
        x,
        x_label,
        x_unit,
        y_label,
        y_unit,
        mask_width,
        slit_height,
        incidental,
    })
}

/// 扫描轴/步进轴名到规范标签与物理轴的查找状态机
///
/// 无法识别的名字映射到显式的 "unknown" 标签，不会失败。
pub fn resolve_axis_label(
    name: &str,
    role: &str,
    diag: &mut DiagnosticSink,
) -> (String, Option<AxisName>) {
    match name {
        "Gonio" => ("2Theta-Theta".to_string(), Some(AxisName::TwoTheta)),
        "2Theta" | "2Theta-Omega" => (name.to_string(), Some(AxisName::TwoTheta)),
        "Omega" | "Omega-2Theta" => (name.to_string(), Some(AxisName::Omega)),
        "Reciprocal Space" => ("Omega".to_string(), Some(AxisName::Omega)),
        "Phi" | "Psi" | "X" | "Y" | "Z" => (name.to_string(), AxisName::parse(name)),
        other => {
            diag.push(
                DiagnosticKind::UnsupportedScanAxis,
                format!("{} type '{}' is not supported", role, other),
            );
            ("unknown".to_string(), None)
        }
    }
}

/// 从第一个扫描的 positions 元数据里取物理轴的单位
fn unit_for_axis(first_scan: Node, physical: Option<AxisName>) -> String {
    let physical = match physical {
        Some(p) => p,
        None => return UNIT_NOT_DETERMINED.to_string(),
    };

    document::find_child(first_scan, "dataPoints")
        .map(|dp| document::find_children(dp, "positions"))
        .unwrap_or_default()
        .into_iter()
        .find(|pos| pos.attribute("axis") == Some(physical.as_str()))
        .and_then(|pos| pos.attribute("unit"))
        .unwrap_or(UNIT_NOT_DETERMINED)
        .to_string()
}

/// 读取第一个扫描下的 reflection 块（衬底与 Miller 指数）
fn read_reflection(
    first_scan: Node,
    diag: &mut DiagnosticSink,
) -> (Option<String>, Option<Hkl>) {
    let reflection = match document::find_child(first_scan, "reflection") {
        Some(node) => node,
        None => return (None, None),
    };

    let substrate = document::child_text(reflection, "material").map(|s| s.to_string());

    let hkl_node = document::find_child(reflection, "hkl");
    let hkl = hkl_node.and_then(|node| {
        let h = document::child_text(node, "h")?.trim().parse().ok()?;
        let k = document::child_text(node, "k")?.trim().parse().ok()?;
        let l = document::child_text(node, "l")?.trim().parse().ok()?;
        Some(Hkl { h, k, l })
    });
    if hkl_node.is_some() && hkl.is_none() {
        diag.push(
            DiagnosticKind::Note,
            "reflection block carries an incomplete hkl triple",
        );
    }

    (substrate, hkl)
}

/// 读取并解析 usedWavelength 块
fn read_wavelength(
    measurement: Node,
    filename: &str,
    diag: &mut DiagnosticSink,
) -> Result<Wavelength> {
    let node = document::find_child(measurement, "usedWavelength").ok_or_else(|| {
        XrdutilError::MalformedDocument {
            path: filename.to_string(),
            reason: "missing mandatory usedWavelength block".to_string(),
        }
    })?;

    let read = |name: &'static str| -> Result<f64> {
        document::parse_double(document::child_text(node, name)).ok_or_else(|| {
            XrdutilError::MalformedDocument {
                path: filename.to_string(),
                reason: format!("usedWavelength block is missing '{}'", name),
            }
        })
    };

    let k_alpha1 = read("kAlpha1")?;
    let k_alpha2 = read("kAlpha2")?;
    let k_beta = read("kBeta")?;
    let k_alpha_ratio = read("ratioKAlpha2KAlpha1")?;

    let intended = node
        .attribute("intended")
        .map(WavelengthType::parse)
        .unwrap_or_else(|| WavelengthType::Other(String::new()));

    let lambda = match &intended {
        WavelengthType::KAlpha1 => k_alpha1,
        WavelengthType::KAlpha => (k_alpha1 + k_alpha_ratio * k_alpha2) / K_ALPHA_WEIGHT,
        WavelengthType::Other(name) => {
            diag.push(
                DiagnosticKind::UnsupportedWavelengthType,
                format!(
                    "usedWavelength type '{}' is not supported, using K-Alpha 1",
                    name
                ),
            );
            k_alpha1
        }
    };

    Ok(Wavelength {
        k_alpha1,
        k_alpha2,
        k_beta,
        k_alpha_ratio,
        intended,
        lambda,
    })
}

/// 面扫描的 ω/2θ 形状修正
///
/// 驱动轴为 2Theta、步进轴为 Omega 且 ω 每行被坍缩成单值时，把 ω
/// 行广播到 2θ 的列数，否则逐点角度配对无从谈起。对称情形
/// （驱动 Omega、步进 2Theta）在原始行为中悬而未决，这里只记
/// 诊断，不做猜测性的修正。
fn reconcile_area_shapes(
    axes: &mut BTreeMap<AxisName, AxisValues>,
    scan_axis: Option<&str>,
    step_axis: Option<&str>,
    diag: &mut DiagnosticSink,
) {
    let tt_cols = match axes.get(&AxisName::TwoTheta) {
        Some(values) => values.shape().1,
        None => return,
    };
    let om_cols = match axes.get(&AxisName::Omega) {
        Some(values) => values.shape().1,
        None => return,
    };
    if tt_cols == om_cols {
        return;
    }

    match (scan_axis, step_axis) {
        (Some("2Theta"), Some("Omega")) => {
            if let Some(AxisValues::Grid(rows)) = axes.get(&AxisName::Omega) {
                let corrected: Vec<Vec<f64>> = rows
                    .iter()
                    .map(|row| {
                        let value = row.first().copied().unwrap_or(0.0);
                        vec![value; tt_cols]
                    })
                    .collect();
                axes.insert(AxisName::Omega, AxisValues::Grid(corrected));
                diag.push(
                    DiagnosticKind::Note,
                    "Omega array was broadcast to match the 2Theta grid",
                );
            }
        }
        (Some("Omega"), Some("2Theta")) => {
            diag.push(
                DiagnosticKind::DataShapeMismatch,
                "Omega-driven area measurement with a mismatched 2Theta grid is not reconciled",
            );
        }
        _ => {}
    }
}

/// 可选的光路标量（mask 宽度 / 狭缝高度）
///
/// 单位假定为 mm；不符时记诊断，数值仍按原样返回。
fn read_beam_path_scalar(
    measurement: Node,
    path: &[&str],
    what: &str,
    diag: &mut DiagnosticSink,
) -> Option<f64> {
    let node = document::find_path(measurement, path)?;
    if node.attribute("unit") != Some("mm") {
        diag.push(
            DiagnosticKind::UnitAssumption,
            format!("{} units are not 'mm'", what),
        );
    }
    document::parse_double(node.text())
}

/// 计时乘以扫描数（标量和数组统一处理）
fn scale_values(values: AxisValues, factor: f64) -> AxisValues {
    match values {
        AxisValues::Scalar(v) => AxisValues::Scalar(v * factor),
        AxisValues::Series(v) => AxisValues::Series(v.into_iter().map(|t| t * factor).collect()),
        AxisValues::Grid(rows) => AxisValues::Grid(
            rows.into_iter()
                .map(|row| row.into_iter().map(|t| t * factor).collect())
                .collect(),
        ),
    }
}

/// 附带桶转为数据集字段，为空时整体省略
fn bucket_to_incidental(bucket: Bucket) -> Option<IncidentalScans> {
    if bucket.is_empty() {
        return None;
    }

    let axes = bucket
        .axes
        .iter()
        .map(|(name, rows)| {
            (
                *name,
                AxisValues::Grid(rows.iter().map(|r| r.to_row()).collect()),
            )
        })
        .collect();

    Some(IncidentalScans {
        scan_numbers: bucket.scan_numbers,
        intensities: bucket.intensities,
        time: bucket.time,
        axes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://www.xrdml.com/XRDMeasurement/1.5";

    fn wavelength_block(intended: &str) -> String {
        format!(
            r#"<usedWavelength intended="{}">
                <kAlpha1>1.540598</kAlpha1>
                <kAlpha2>1.544426</kAlpha2>
                <kBeta>1.39225</kBeta>
                <ratioKAlpha2KAlpha1>0.5</ratioKAlpha2KAlpha1>
            </usedWavelength>"#,
            intended
        )
    }

    fn single_scan_doc(n: usize) -> String {
        let intensities: Vec<String> = (0..n).map(|i| format!("{}", (i % 7) + 1)).collect();
        format!(
            r#"<xrdMeasurements xmlns="{ns}" status="Completed">
                <sample><id>B11091</id></sample>
                <comment><entry>demo scan</entry></comment>
                <xrdMeasurement measurementType="Scan">
                    {wl}
                    <scan status="Completed" scanAxis="2Theta-Omega" mode="Continuous">
                        <dataPoints>
                            <positions axis="2Theta" unit="deg">
                                <startPosition>10.0</startPosition>
                                <endPosition>40.0</endPosition>
                            </positions>
                            <positions axis="Omega" unit="deg">
                                <commonPosition>5.0</commonPosition>
                            </positions>
                            <commonCountingTime unit="seconds">1.0</commonCountingTime>
                            <intensities unit="counts">{data}</intensities>
                        </dataPoints>
                    </scan>
                </xrdMeasurement>
            </xrdMeasurements>"#,
            ns = NS,
            wl = wavelength_block("K-Alpha 1"),
            data = intensities.join(" ")
        )
    }

    fn repeated_scan_doc(rows: &[&str], statuses: &[&str]) -> String {
        let scans: Vec<String> = rows
            .iter()
            .zip(statuses.iter())
            .map(|(row, status)| {
                format!(
                    r#"<scan status="{status}" scanAxis="Omega" mode="Continuous">
                        <dataPoints>
                            <positions axis="Omega" unit="deg">
                                <startPosition>1.0</startPosition>
                                <endPosition>2.0</endPosition>
                            </positions>
                            <commonCountingTime unit="seconds">2.0</commonCountingTime>
                            <intensities unit="counts per second">{row}</intensities>
                        </dataPoints>
                    </scan>"#,
                    status = status,
                    row = row
                )
            })
            .collect();
        format!(
            r#"<xrdMeasurements xmlns="{ns}" status="Completed">
                <xrdMeasurement measurementType="Repeated scan">
                    {wl}
                    {scans}
                </xrdMeasurement>
            </xrdMeasurements>"#,
            ns = NS,
            wl = wavelength_block("K-Alpha 1"),
            scans = scans.join("\n")
        )
    }

    fn area_doc(omegas: &[f64]) -> String {
        let scans: Vec<String> = omegas
            .iter()
            .map(|om| {
                format!(
                    r#"<scan status="Completed" scanAxis="2Theta" mode="Continuous">
                        <reflection>
                            <material>SrTiO3</material>
                            <hkl><h>0</h><k>1</k><l>3</l></hkl>
                        </reflection>
                        <dataPoints>
                            <positions axis="2Theta" unit="deg">
                                <startPosition>20.0</startPosition>
                                <endPosition>23.0</endPosition>
                            </positions>
                            <positions axis="Omega" unit="deg">
                                <commonPosition>{om}</commonPosition>
                            </positions>
                            <commonCountingTime unit="seconds">3.0</commonCountingTime>
                            <intensities unit="counts">4 8 12 16</intensities>
                        </dataPoints>
                    </scan>"#,
                    om = om
                )
            })
            .collect();
        format!(
            r#"<xrdMeasurements xmlns="{ns}" status="Completed">
                <sample><id>B11091</id></sample>
                <xrdMeasurement measurementType="Area measurement" measurementStepAxis="Omega">
                    {wl}
                    {scans}
                </xrdMeasurement>
            </xrdMeasurements>"#,
            ns = NS,
            wl = wavelength_block("K-Alpha 1"),
            scans = scans.join("\n")
        )
    }

    #[test]
    fn test_single_scan_end_to_end() {
        let xml = single_scan_doc(750);
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "scan.xrdml", &mut diag).unwrap();

        assert_eq!(data.measurement_type, MeasurementType::Scan);
        assert_eq!(data.schema_version, "1.5");
        assert_eq!(data.sample.as_deref(), Some("B11091"));
        assert_eq!(data.comment.get("1").map(|s| s.as_str()), Some("demo scan"));
        assert_eq!(data.scan_axis.as_deref(), Some("2Theta-Omega"));
        assert_eq!(data.step_axis, None);
        assert_eq!(data.x_label.as_deref(), Some("2Theta-Omega"));
        assert_eq!(data.x_unit.as_deref(), Some("deg"));

        // 2θ 序列跨 [10, 40]，ω 坍缩为标量
        let x = data.x.as_ref().expect("x should be populated");
        match x {
            AxisValues::Series(v) => {
                assert_eq!(v.len(), 750);
                assert_eq!(v[0], 10.0);
                assert_eq!(v[749], 40.0);
            }
            other => panic!("expected series, got {:?}", other),
        }
        assert_eq!(data.omega, Some(AxisValues::Scalar(5.0)));
        assert_eq!(data.time, AxisValues::Scalar(1.0));
        assert_eq!(data.wavelength.lambda, 1.540598);
        assert!(data.incidental.is_none());
        assert!(data.hkl.is_none());
        assert!(data.substrate.is_none());
    }

    #[test]
    fn test_decode_is_idempotent() {
        let xml = single_scan_doc(50);
        let mut diag1 = DiagnosticSink::new();
        let mut diag2 = DiagnosticSink::new();
        let first = decode_str(&xml, "scan.xrdml", &mut diag1).unwrap();
        let second = decode_str(&xml, "scan.xrdml", &mut diag2).unwrap();
        assert_eq!(first, second);
        assert_eq!(diag1.len(), diag2.len());
    }

    #[test]
    fn test_repeated_scan_averaging_and_exposure() {
        let xml = repeated_scan_doc(&["1 3", "3 5"], &["Completed", "Completed"]);
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "rep.xrdml", &mut diag).unwrap();

        assert_eq!(data.measurement_type, MeasurementType::RepeatedScan);
        assert_eq!(data.intensities, AxisValues::Series(vec![2.0, 4.0]));
        // 2 次扫描 × 2 s 共用计时
        assert_eq!(data.time, AxisValues::Scalar(4.0));
        assert_eq!(data.scan_numbers, None);
        // ω 两行一致，坍缩为单行
        assert_eq!(data.omega, Some(AxisValues::Series(vec![1.0, 2.0])));
        assert_eq!(data.x, Some(AxisValues::Series(vec![1.0, 2.0])));
    }

    #[test]
    fn test_lone_incomplete_scan_promoted() {
        let xml = repeated_scan_doc(&["7 9"], &["Aborted"]);
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "aborted.xrdml", &mut diag).unwrap();

        // 提升后重复扫描合并，平均即自身
        assert_eq!(data.intensities, AxisValues::Series(vec![7.0, 9.0]));
        assert!(data.incidental.is_none());
        assert!(diag.contains(DiagnosticKind::Note));
    }

    #[test]
    fn test_incomplete_scans_kept_incidental() {
        let xml = repeated_scan_doc(&["1 1", "2 2", "9 9"], &["Completed", "Aborted", "Aborted"]);
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "mixed.xrdml", &mut diag).unwrap();

        assert_eq!(data.intensities, AxisValues::Series(vec![1.0, 1.0]));
        let incidental = data.incidental.expect("incidental scans expected");
        assert_eq!(incidental.scan_numbers, vec![1, 2]);
        assert_eq!(incidental.intensities, vec![vec![2.0, 2.0], vec![9.0, 9.0]]);
    }

    #[test]
    fn test_area_measurement_reconciliation() {
        let xml = area_doc(&[4.0, 4.5, 5.0, 5.5, 6.0]);
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "area.xrdml", &mut diag).unwrap();

        assert_eq!(data.measurement_type, MeasurementType::AreaMeasurement);
        assert_eq!(data.step_axis.as_deref(), Some("Omega"));
        assert_eq!(data.y_label.as_deref(), Some("Omega"));
        assert_eq!(data.y_unit.as_deref(), Some("deg"));
        assert_eq!(data.substrate.as_deref(), Some("SrTiO3"));
        assert_eq!(data.hkl, Some(Hkl { h: 0, k: 1, l: 3 }));

        // ω [5×1] 被广播到 2θ 的 [5×4]
        let omega = data.omega.as_ref().unwrap();
        assert_eq!(omega.shape(), (5, 4));
        match omega {
            AxisValues::Grid(rows) => {
                assert_eq!(rows[0], vec![4.0, 4.0, 4.0, 4.0]);
                assert_eq!(rows[4], vec![6.0, 6.0, 6.0, 6.0]);
            }
            other => panic!("expected grid, got {:?}", other),
        }
        assert_eq!(data.two_theta.as_ref().unwrap().shape().1, 4);
        // 一维副本只属于一维测量
        assert!(data.x.is_none());
    }

    #[test]
    fn test_wavelength_weighted_average() {
        let xml = single_scan_doc(10).replace("K-Alpha 1", "K-Alpha");
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "scan.xrdml", &mut diag).unwrap();

        let expected = (1.540598 + 0.5 * 1.544426) / 1.5;
        assert!((data.wavelength.lambda - expected).abs() < 1e-12);
        assert_eq!(data.wavelength.intended, WavelengthType::KAlpha);
    }

    #[test]
    fn test_wavelength_unsupported_falls_back() {
        let xml = single_scan_doc(10).replace("K-Alpha 1", "K-Beta");
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "scan.xrdml", &mut diag).unwrap();

        assert_eq!(data.wavelength.lambda, 1.540598);
        assert!(diag.contains(DiagnosticKind::UnsupportedWavelengthType));
    }

    #[test]
    fn test_unknown_scan_axis_labelled_unknown() {
        let xml = single_scan_doc(10).replace("scanAxis=\"2Theta-Omega\"", "scanAxis=\"Banana\"");
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "scan.xrdml", &mut diag).unwrap();

        assert_eq!(data.x_label.as_deref(), Some("unknown"));
        assert_eq!(data.x_unit.as_deref(), Some("nd"));
        assert!(data.x.is_none());
        assert!(diag.contains(DiagnosticKind::UnsupportedScanAxis));
    }

    #[test]
    fn test_gonio_maps_to_two_theta_theta() {
        let xml = single_scan_doc(10).replace("scanAxis=\"2Theta-Omega\"", "scanAxis=\"Gonio\"");
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "scan.xrdml", &mut diag).unwrap();

        assert_eq!(data.x_label.as_deref(), Some("2Theta-Theta"));
        // 物理轴是 2θ，x 取 2θ 数值
        assert_eq!(data.x, data.two_theta);
    }

    #[test]
    fn test_schema_mismatch_is_malformed() {
        let xml = single_scan_doc(10).replace(NS, "http://www.xrdml.com/XRDMeasurement/9.9");
        let mut diag = DiagnosticSink::new();
        let err = decode_str(&xml, "scan.xrdml", &mut diag).unwrap_err();
        match err {
            XrdutilError::MalformedDocument { reason, .. } => {
                assert!(reason.contains("1.5"));
                assert!(reason.contains("1.0"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_wavelength_block_is_malformed() {
        let xml = single_scan_doc(10);
        let start = xml.find("<usedWavelength").unwrap();
        let end = xml.find("</usedWavelength>").unwrap() + "</usedWavelength>".len();
        let broken = format!("{}{}", &xml[..start], &xml[end..]);

        let mut diag = DiagnosticSink::new();
        let err = decode_str(&broken, "scan.xrdml", &mut diag).unwrap_err();
        assert!(matches!(err, XrdutilError::MalformedDocument { .. }));
    }

    #[test]
    fn test_beam_path_scalars_with_unit_assumption() {
        let beam = r#"<incidentBeamPath>
                <divergenceSlit><height unit="rad">0.38</height></divergenceSlit>
                <mask><width unit="mm">10.0</width></mask>
            </incidentBeamPath>"#;
        let xml = single_scan_doc(10).replace(
            "</xrdMeasurement>",
            &format!("{}</xrdMeasurement>", beam),
        );
        let mut diag = DiagnosticSink::new();
        let data = decode_str(&xml, "scan.xrdml", &mut diag).unwrap();

        assert_eq!(data.mask_width, Some(10.0));
        // 单位不对也照样返回原值
        assert_eq!(data.slit_height, Some(0.38));
        assert!(diag.contains(DiagnosticKind::UnitAssumption));
    }
}
