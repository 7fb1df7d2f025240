//! # info 命令实现
//!
//! 打印测量文档的元数据摘要、轴形状与解码诊断。
//!
//! ## 依赖关系
//! - 使用 `cli/info.rs` 定义的参数
//! - 使用 `xrdml/` 解码
//! - 使用 `tabled` 打印摘要表格、`utils/output.rs` 输出样式

use crate::cli::info::InfoArgs;
use crate::error::Result;
use crate::models::{AxisName, AxisValues, MeasurementDataset};
use crate::utils::output;
use crate::xrdml::{self, DiagnosticSink};

use tabled::{Table, Tabled};

/// 摘要表格行
#[derive(Debug, Clone, Tabled)]
struct InfoRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl InfoRow {
    fn new(field: &str, value: String) -> Self {
        Self {
            field: field.to_string(),
            value,
        }
    }
}

/// 执行 info 命令
pub fn execute(args: InfoArgs) -> Result<()> {
    for path in &args.inputs {
        let mut diag = DiagnosticSink::new();
        let data = xrdml::read_xrdml(path, &mut diag)?;

        output::print_header(&data.filename);
        let table = Table::new(summary_rows(&data));
        println!("{}", table);

        if !args.no_diagnostics {
            println!();
            if diag.is_empty() {
                output::print_info("No decoding diagnostics");
            } else {
                for d in diag.iter() {
                    output::print_diagnostic(&d.to_string());
                }
            }
        }
    }
    Ok(())
}

fn summary_rows(data: &MeasurementDataset) -> Vec<InfoRow> {
    let mut rows = vec![
        InfoRow::new("Schema version", data.schema_version.clone()),
        InfoRow::new(
            "Sample",
            data.sample.clone().unwrap_or_else(|| "-".to_string()),
        ),
        InfoRow::new(
            "Document status",
            data.status.clone().unwrap_or_else(|| "-".to_string()),
        ),
        InfoRow::new("Measurement type", {
            let mt = data.measurement_type.to_string();
            if mt.is_empty() {
                "-".to_string()
            } else {
                mt
            }
        }),
        InfoRow::new(
            "Scan axis",
            data.scan_axis.clone().unwrap_or_else(|| "-".to_string()),
        ),
    ];

    if let Some(step) = &data.step_axis {
        rows.push(InfoRow::new("Step axis", step.clone()));
    }
    if let Some(numbers) = &data.scan_numbers {
        rows.push(InfoRow::new("Scans", numbers.len().to_string()));
    }
    rows.push(InfoRow::new("Data points", data.point_count().to_string()));
    rows.push(InfoRow::new(
        "Wavelength",
        format!("{:.6} A", data.wavelength.lambda),
    ));

    if let Some(substrate) = &data.substrate {
        rows.push(InfoRow::new("Substrate", substrate.clone()));
    }
    if let Some(hkl) = &data.hkl {
        rows.push(InfoRow::new(
            "Reflection",
            format!("({} {} {})", hkl.h, hkl.k, hkl.l),
        ));
    }
    if let Some(width) = data.mask_width {
        rows.push(InfoRow::new("Mask width", format!("{} mm", width)));
    }
    if let Some(height) = data.slit_height {
        rows.push(InfoRow::new("Slit height", format!("{} mm", height)));
    }

    for name in AxisName::ALL {
        if let Some(values) = data.axis(name) {
            rows.push(InfoRow::new(name.as_str(), describe_values(values)));
        }
    }

    if let Some(incidental) = &data.incidental {
        rows.push(InfoRow::new(
            "Incidental scans",
            format!("{} (incomplete, kept aside)", incidental.scan_numbers.len()),
        ));
    }

    if let Some(comment) = data.comment.get("1") {
        if !comment.is_empty() {
            rows.push(InfoRow::new("Comment", comment.clone()));
        }
    }

    rows
}

fn describe_values(values: &AxisValues) -> String {
    match values {
        AxisValues::Scalar(v) => format!("scalar {}", v),
        AxisValues::Series(v) => format!("series[{}]", v.len()),
        AxisValues::Grid(_) => {
            let (rows, cols) = values.shape();
            format!("grid[{}x{}]", rows, cols)
        }
    }
}
