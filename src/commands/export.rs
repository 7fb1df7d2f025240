//! # export 命令实现
//!
//! 解码 .xrdml 文件并写出分隔符文本表格。
//!
//! ## 功能
//! - 单文件导出到文件或标准输出
//! - 目录输入的并行批量导出
//! - 可选的 q 空间坐标列（--qspace）
//!
//! ## 依赖关系
//! - 使用 `cli/export.rs` 定义的参数
//! - 使用 `xrdml/` 解码、`qspace/` 坐标变换
//! - 使用 `batch/`, `utils/output.rs`
//! - 使用 `csv` 库写表格

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::export::ExportArgs;
use crate::error::{Result, XrdutilError};
use crate::models::{AxisValues, MeasurementDataset};
use crate::qspace;
use crate::utils::output;
use crate::xrdml::{self, decoder, DiagnosticSink};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 执行 export 命令
pub fn execute(args: ExportArgs) -> Result<()> {
    if !args.delimiter.is_ascii() {
        return Err(XrdutilError::InvalidArgument(format!(
            "delimiter '{}' is not a single ASCII character",
            args.delimiter
        )));
    }

    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive);
    let files = collector.collect();

    if files.is_empty() {
        return Err(XrdutilError::NoFilesFound {
            pattern: format!("{} under {}", args.pattern, args.input.display()),
        });
    }

    if args.stdout {
        if files.len() > 1 {
            return Err(XrdutilError::InvalidArgument(
                "--stdout expects a single input file".to_string(),
            ));
        }
        return export_to_stdout(&files[0], &args);
    }

    if collector.is_single_file() {
        export_single(&files[0], &args)
    } else {
        export_batch(files, &args)
    }
}

/// 单文件导出，诊断逐条打印
fn export_single(path: &Path, args: &ExportArgs) -> Result<()> {
    let out_path = match &args.output {
        Some(p) => p.clone(),
        None => path.with_extension("csv"),
    };
    if out_path.exists() && !args.overwrite {
        output::print_warning(&format!(
            "{} already exists, use --overwrite to replace it",
            out_path.display()
        ));
        return Ok(());
    }

    let mut diag = DiagnosticSink::new();
    let data = xrdml::read_xrdml(path, &mut diag)?;
    for d in diag.iter() {
        output::print_diagnostic(&format!("{}: {}", path.display(), d));
    }

    write_table_to_file(&data, args, &out_path)?;
    output::print_conversion(&path.display().to_string(), &out_path.display().to_string());
    Ok(())
}

/// 标准输出导出，诊断走 stderr 之外的前缀行会污染表格，所以丢弃
fn export_to_stdout(path: &Path, args: &ExportArgs) -> Result<()> {
    let mut diag = DiagnosticSink::new();
    let data = xrdml::read_xrdml(path, &mut diag)?;

    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(args.delimiter as u8)
        .from_writer(stdout.lock());
    write_table(&data, args, &mut wtr)?;
    wtr.flush().map_err(|e| XrdutilError::FileWriteError {
        path: "<stdout>".to_string(),
        source: e,
    })?;
    Ok(())
}

/// 目录输入的并行批量导出
fn export_batch(files: Vec<PathBuf>, args: &ExportArgs) -> Result<()> {
    output::print_header("Exporting XRDML measurements");
    output::print_info(&format!("Found {} files to export", files.len()));

    let out_dir = match &args.output {
        Some(p) => p.clone(),
        None => args.input.clone(),
    };
    fs::create_dir_all(&out_dir).map_err(|e| XrdutilError::FileWriteError {
        path: out_dir.display().to_string(),
        source: e,
    })?;

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(files, |path| {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("measurement");
        let out_path = out_dir.join(format!("{}.csv", stem));
        if out_path.exists() && !args.overwrite {
            return ProcessResult::Skipped(path.display().to_string());
        }

        let mut diag = DiagnosticSink::new();
        match xrdml::read_xrdml(path, &mut diag)
            .and_then(|data| write_table_to_file(&data, args, &out_path))
        {
            Ok(()) => ProcessResult::Success(path.display().to_string()),
            Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
        }
    });

    output::print_separator();
    output::print_success(&format!(
        "Exported {} of {} file(s) ({} skipped)",
        result.success,
        result.total(),
        result.skipped
    ));
    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }
    if result.failed > 0 {
        return Err(XrdutilError::Other(format!(
            "{} file(s) failed to export",
            result.failed
        )));
    }
    Ok(())
}

fn write_table_to_file(
    data: &MeasurementDataset,
    args: &ExportArgs,
    out_path: &Path,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(args.delimiter as u8)
        .from_path(out_path)?;
    write_table(data, args, &mut wtr)?;
    wtr.flush().map_err(|e| XrdutilError::FileWriteError {
        path: out_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

/// 写出数据表格
///
/// 列布局取决于测量维度与 --qspace：
/// - q 空间:  q_par, q_perp, intensity
/// - 一维:    驱动轴, intensity
/// - 二维:    驱动轴, 步进轴, intensity
fn write_table<W: io::Write>(
    data: &MeasurementDataset,
    args: &ExportArgs,
    wtr: &mut csv::Writer<W>,
) -> Result<()> {
    if args.qspace {
        return write_qspace_table(data, args.omega_offset, wtr);
    }

    let x_header = column_header(data.x_label.as_deref(), data.x_unit.as_deref(), "x");
    if data.measurement_type.is_one_dimensional() {
        let x = data.x.as_ref().ok_or_else(|| {
            XrdutilError::InvalidArgument(format!(
                "{}: no driven-axis values recorded, nothing to export",
                data.filename
            ))
        })?;

        wtr.write_record([x_header.as_str(), "intensity (cps)"])?;
        for (col, value) in data.intensities.flatten().iter().enumerate() {
            let xv = x.value_at(0, col).ok_or_else(|| shape_error(data, 0, col))?;
            wtr.write_record([format!("{:.4}", xv), format!("{:.4}", value)])?;
        }
        return Ok(());
    }

    // 二维：逐单元写 (驱动轴, 步进轴, 强度)
    let y_header = column_header(data.y_label.as_deref(), data.y_unit.as_deref(), "y");
    let x_axis = physical_axis_values(data, data.scan_axis.as_deref())?;
    let y_axis = physical_axis_values(data, data.step_axis.as_deref())?;

    wtr.write_record([x_header.as_str(), y_header.as_str(), "intensity (cps)"])?;
    if let AxisValues::Grid(rows) = &data.intensities {
        for (row, intensities) in rows.iter().enumerate() {
            for (col, value) in intensities.iter().enumerate() {
                let xv = x_axis
                    .value_at(row, col)
                    .ok_or_else(|| shape_error(data, row, col))?;
                let yv = y_axis
                    .value_at(row, col)
                    .ok_or_else(|| shape_error(data, row, col))?;
                wtr.write_record([
                    format!("{:.4}", xv),
                    format!("{:.4}", yv),
                    format!("{:.4}", value),
                ])?;
            }
        }
    } else {
        for (col, value) in data.intensities.flatten().iter().enumerate() {
            let xv = x_axis.value_at(0, col).ok_or_else(|| shape_error(data, 0, col))?;
            let yv = y_axis.value_at(0, col).ok_or_else(|| shape_error(data, 0, col))?;
            wtr.write_record([
                format!("{:.4}", xv),
                format!("{:.4}", yv),
                format!("{:.4}", value),
            ])?;
        }
    }
    Ok(())
}

fn write_qspace_table<W: io::Write>(
    data: &MeasurementDataset,
    omega_offset: f64,
    wtr: &mut csv::Writer<W>,
) -> Result<()> {
    let (q_par, q_perp) = qspace::q_map(data, omega_offset)?;
    let intensities = data.intensities.flatten();

    wtr.write_record(["q_par (1/A)", "q_perp (1/A)", "intensity (cps)"])?;
    for ((par, perp), value) in q_par.iter().zip(q_perp.iter()).zip(intensities.iter()) {
        wtr.write_record([
            format!("{:.6}", par),
            format!("{:.6}", perp),
            format!("{:.4}", value),
        ])?;
    }
    Ok(())
}

/// "标签 (单位)" 形式的表头
fn column_header(label: Option<&str>, unit: Option<&str>, fallback: &str) -> String {
    format!("{} ({})", label.unwrap_or(fallback), unit.unwrap_or("nd"))
}

/// 轴名经标签状态机映射到物理轴后取数据集里的数值
fn physical_axis_values(
    data: &MeasurementDataset,
    axis_name: Option<&str>,
) -> Result<AxisValues> {
    let name = axis_name.ok_or_else(|| {
        XrdutilError::InvalidArgument(format!(
            "{}: measurement does not record its axis names",
            data.filename
        ))
    })?;

    // 标签已在解码时确定，这里只做轴名到物理轴的映射，重复诊断丢弃
    let mut scratch = DiagnosticSink::new();
    let (_, physical) = decoder::resolve_axis_label(name, "axis", &mut scratch);
    physical
        .and_then(|p| data.axis(p))
        .cloned()
        .ok_or_else(|| {
            XrdutilError::InvalidArgument(format!(
                "{}: no position values recorded for axis '{}'",
                data.filename, name
            ))
        })
}

fn shape_error(data: &MeasurementDataset, row: usize, col: usize) -> XrdutilError {
    XrdutilError::InvalidArgument(format!(
        "{}: axis arrays do not cover data point ({}, {})",
        data.filename, row, col
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xrdml::decode_str;

    fn scan_dataset() -> MeasurementDataset {
        let xml = r#"<xrdMeasurements xmlns="http://www.xrdml.com/XRDMeasurement/1.5" status="Completed">
            <xrdMeasurement measurementType="Scan">
                <usedWavelength intended="K-Alpha 1">
                    <kAlpha1>1.540598</kAlpha1>
                    <kAlpha2>1.544426</kAlpha2>
                    <kBeta>1.39225</kBeta>
                    <ratioKAlpha2KAlpha1>0.5</ratioKAlpha2KAlpha1>
                </usedWavelength>
                <scan status="Completed" scanAxis="2Theta-Omega" mode="Continuous">
                    <dataPoints>
                        <positions axis="2Theta" unit="deg">
                            <startPosition>10.0</startPosition>
                            <endPosition>12.0</endPosition>
                        </positions>
                        <positions axis="Omega" unit="deg">
                            <commonPosition>5.0</commonPosition>
                        </positions>
                        <commonCountingTime unit="seconds">1.0</commonCountingTime>
                        <intensities unit="counts">4 5 6</intensities>
                    </dataPoints>
                </scan>
            </xrdMeasurement>
        </xrdMeasurements>"#;
        let mut diag = DiagnosticSink::new();
        decode_str(xml, "scan.xrdml", &mut diag).unwrap()
    }

    fn render(data: &MeasurementDataset, args: &ExportArgs) -> String {
        let mut buf = Vec::new();
        {
            let mut wtr = csv::WriterBuilder::new()
                .delimiter(args.delimiter as u8)
                .from_writer(&mut buf);
            write_table(data, args, &mut wtr).unwrap();
            wtr.flush().unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    fn default_args() -> ExportArgs {
        ExportArgs {
            input: PathBuf::from("scan.xrdml"),
            output: None,
            stdout: false,
            delimiter: ',',
            qspace: false,
            omega_offset: 0.0,
            pattern: "*.xrdml".to_string(),
            recursive: false,
            jobs: 0,
            overwrite: false,
        }
    }

    #[test]
    fn test_one_dimensional_table_layout() {
        let data = scan_dataset();
        let table = render(&data, &default_args());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "2Theta-Omega (deg),intensity (cps)");
        assert_eq!(lines[1], "10.0000,4.0000");
        assert_eq!(lines[3], "12.0000,6.0000");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_custom_delimiter() {
        let data = scan_dataset();
        let mut args = default_args();
        args.delimiter = '\t';
        let table = render(&data, &args);
        assert!(table.starts_with("2Theta-Omega (deg)\tintensity (cps)"));
    }

    #[test]
    fn test_qspace_table_layout() {
        let data = scan_dataset();
        let mut args = default_args();
        args.qspace = true;
        let table = render(&data, &args);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "q_par (1/A),q_perp (1/A),intensity (cps)");
        // 3 个数据点 + 表头
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut args = default_args();
        args.delimiter = '—';
        let err = execute(args).unwrap_err();
        assert!(matches!(err, XrdutilError::InvalidArgument(_)));
    }
}
