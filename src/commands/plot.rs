//! # plot 命令实现
//!
//! 把一维扫描绘制成衍射图谱（强度对驱动轴角度的曲线）。
//!
//! ## 功能
//! - PNG / SVG 输出
//! - 可选对数强度轴
//!
//! ## 依赖关系
//! - 使用 `cli/plot.rs` 定义的参数
//! - 使用 `xrdml/` 解码
//! - 使用 `plotters` 渲染图表、`utils/output.rs` 输出样式

use crate::cli::plot::PlotArgs;
use crate::error::{Result, XrdutilError};
use crate::utils::output;
use crate::xrdml::{self, DiagnosticSink};

use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// 对数轴下替代零计数的下限
const LOG_FLOOR: f64 = 1e-2;

/// 执行 plot 命令
pub fn execute(args: PlotArgs) -> Result<()> {
    let mut diag = DiagnosticSink::new();
    let data = xrdml::read_xrdml(&args.input, &mut diag)?;
    for d in diag.iter() {
        output::print_diagnostic(&format!("{}: {}", args.input.display(), d));
    }

    if !data.measurement_type.is_one_dimensional() {
        return Err(XrdutilError::InvalidArgument(format!(
            "{}: only one-dimensional scans can be plotted as a line chart",
            data.filename
        )));
    }

    let x = data.x.as_ref().ok_or_else(|| {
        XrdutilError::InvalidArgument(format!(
            "{}: no driven-axis values recorded, nothing to plot",
            data.filename
        ))
    })?;

    let intensities = data.intensities.flatten();
    let points: Vec<(f64, f64)> = x
        .broadcast(intensities.len())
        .into_iter()
        .zip(intensities)
        .map(|(xv, yv)| {
            if args.log {
                (xv, yv.max(LOG_FLOOR).log10())
            } else {
                (xv, yv)
            }
        })
        .collect();

    if points.is_empty() {
        return Err(XrdutilError::InvalidArgument(format!(
            "{}: measurement contains no data points",
            data.filename
        )));
    }

    let title = args
        .title
        .clone()
        .or_else(|| data.sample.clone())
        .unwrap_or_else(|| data.filename.clone());
    let x_desc = format!(
        "{} ({})",
        data.x_label.as_deref().unwrap_or("x"),
        data.x_unit.as_deref().unwrap_or("nd")
    );
    let y_desc = if args.log {
        "log10 Intensity (cps)"
    } else {
        "Intensity (cps)"
    };

    let out_path = output_path(&args);
    if args.svg {
        let root =
            SVGBackend::new(&out_path, (args.width, args.height)).into_drawing_area();
        draw_scan_chart(&root, &points, &title, &x_desc, y_desc)?;
        root.present()
            .map_err(|e| XrdutilError::Other(e.to_string()))?;
    } else {
        let root =
            BitMapBackend::new(&out_path, (args.width, args.height)).into_drawing_area();
        draw_scan_chart(&root, &points, &title, &x_desc, y_desc)?;
        root.present()
            .map_err(|e| XrdutilError::Other(e.to_string()))?;
    }

    output::print_success(&format!("Plot saved to '{}'", out_path.display()));
    Ok(())
}

fn output_path(args: &PlotArgs) -> PathBuf {
    match &args.output {
        Some(p) => p.clone(),
        None => args
            .input
            .with_extension(if args.svg { "svg" } else { "png" }),
    }
}

/// 绘制扫描曲线
fn draw_scan_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    points: &[(f64, f64)],
    title: &str,
    x_desc: &str,
    y_desc: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| XrdutilError::Other(format!("{:?}", e)))?;

    let (x_min, x_max) = axis_range(points.iter().map(|(x, _)| *x));
    let (y_min, y_max) = axis_range(points.iter().map(|(_, y)| *y));
    let y_pad = (y_max - y_min).max(1.0) * 0.05;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, (y_min - y_pad)..(y_max + y_pad))
        .map_err(|e| XrdutilError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| XrdutilError::Other(format!("{:?}", e)))?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            line_color.stroke_width(2),
        ))
        .map_err(|e| XrdutilError::Other(format!("{:?}", e)))?;

    Ok(())
}

fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        (0.0, 1.0)
    } else if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_range_degenerate_inputs() {
        assert_eq!(axis_range(std::iter::empty()), (0.0, 1.0));
        assert_eq!(axis_range([5.0].into_iter()), (4.5, 5.5));
        assert_eq!(axis_range([1.0, 3.0, 2.0].into_iter()), (1.0, 3.0));
    }

    #[test]
    fn test_output_path_follows_backend() {
        let args = PlotArgs {
            input: PathBuf::from("scan.xrdml"),
            output: None,
            title: None,
            width: 1200,
            height: 800,
            svg: true,
            log: false,
        };
        assert_eq!(output_path(&args), PathBuf::from("scan.svg"));
    }
}
