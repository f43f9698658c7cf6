use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{BarGroup, ChartSpec, timestamped_path};
use crate::error::Result;
use itertools::Itertools;

/// Canvas layout in pixels.
const MARGIN: f32 = 24.0;
const AXIS_GUTTER: f32 = 64.0; // room for y tick labels
const PLOT_HEIGHT: f32 = 320.0;
const GROUP_WIDTH: f32 = 110.0;
const BAR_WIDTH: f32 = 64.0;
const TITLE_HEIGHT: f32 = 36.0;
const X_LABEL_HEIGHT: f32 = 44.0;
const LEGEND_WIDTH: f32 = 190.0;
const Y_TICKS: usize = 5;

/// HTML encode for SVG text content
pub fn html_encode(text: &str) -> String {
    text.replace("&", "&amp;")
        .replace("<", "&lt;")
        .replace(">", "&gt;")
        .replace("\"", "&quot;")
        .replace("'", "&#x27;")
}

/// Renders a chart description as a standalone SVG document.
pub fn render_svg<W: Write>(f: &mut W, spec: &ChartSpec) -> Result<()> {
    let plot_w = spec.groups.len().max(1) as f32 * GROUP_WIDTH;
    let width = (AXIS_GUTTER + plot_w + MARGIN * 2.0 + LEGEND_WIDTH) as u32;
    let height = (TITLE_HEIGHT + PLOT_HEIGHT + X_LABEL_HEIGHT + MARGIN) as u32;

    let base_y = TITLE_HEIGHT + PLOT_HEIGHT;
    let max = spec.max_group_total();
    let scale = if max > 0.0 { PLOT_HEIGHT / max as f32 } else { 0.0 };

    writeln!(
        f,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"##,
        width, height, width, height
    )?;
    writeln!(
        f,
        r##"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"##,
        width, height
    )?;

    // title
    writeln!(
        f,
        r##"<text x="{x}" y="22" font-family="Arial,sans-serif" font-size="16px" font-weight="bold" text-anchor="middle" fill="#000">{title}</text>"##,
        x = AXIS_GUTTER + plot_w / 2.0,
        title = html_encode(&spec.title)
    )?;

    draw_y_axis(f, max, base_y)?;

    // y axis title, rotated
    writeln!(
        f,
        r##"<text x="16" y="{y}" font-family="Arial,sans-serif" font-size="12px" text-anchor="middle" transform="rotate(-90 16 {y})" fill="#333">{label}</text>"##,
        y = TITLE_HEIGHT + PLOT_HEIGHT / 2.0,
        label = html_encode(&spec.y_label)
    )?;

    // baseline
    writeln!(
        f,
        r##"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="#333" stroke-width="1"/>"##,
        x1 = AXIS_GUTTER,
        x2 = AXIS_GUTTER + plot_w,
        y = base_y
    )?;

    for (i, group) in spec.groups.iter().enumerate() {
        draw_group(f, group, i, scale, base_y)?;
    }

    // x axis title
    writeln!(
        f,
        r##"<text x="{x}" y="{y}" font-family="Arial,sans-serif" font-size="12px" text-anchor="middle" fill="#333">{label}</text>"##,
        x = AXIS_GUTTER + plot_w / 2.0,
        y = base_y + X_LABEL_HEIGHT - 6.0,
        label = html_encode(&spec.x_label)
    )?;

    draw_legend(f, spec, AXIS_GUTTER + plot_w + MARGIN, TITLE_HEIGHT)?;

    writeln!(f, "</svg>")?;
    Ok(())
}

fn draw_y_axis<W: Write>(f: &mut W, max: f64, base_y: f32) -> Result<()> {
    writeln!(
        f,
        r##"<line x1="{x}" y1="{y1}" x2="{x}" y2="{y2}" stroke="#333" stroke-width="1"/>"##,
        x = AXIS_GUTTER,
        y1 = TITLE_HEIGHT,
        y2 = base_y
    )?;

    for i in 0..=Y_TICKS {
        let value = max * i as f64 / Y_TICKS as f64;
        let y = base_y - PLOT_HEIGHT * i as f32 / Y_TICKS as f32;
        writeln!(
            f,
            r##"<line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="#333" stroke-width="1"/>"##,
            x1 = AXIS_GUTTER - 4.0,
            x2 = AXIS_GUTTER,
            y = y
        )?;
        writeln!(
            f,
            r##"<text x="{x}" y="{y}" font-family="Arial,sans-serif" font-size="11px" text-anchor="end" dominant-baseline="middle" fill="#333">{value:.1}</text>"##,
            x = AXIS_GUTTER - 8.0,
            y = y,
            value = value
        )?;
    }
    Ok(())
}

fn draw_group<W: Write>(
    f: &mut W,
    group: &BarGroup,
    index: usize,
    scale: f32,
    base_y: f32,
) -> Result<()> {
    let x0 = AXIS_GUTTER + index as f32 * GROUP_WIDTH + (GROUP_WIDTH - BAR_WIDTH) / 2.0;

    // stack segments bottom-up
    let mut y_cursor = base_y;
    for segment in &group.segments {
        let seg_h = segment.value as f32 * scale;
        if seg_h <= 0.0 {
            continue;
        }
        y_cursor -= seg_h;
        writeln!(
            f,
            r##"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}" stroke="#333" stroke-width="0.5"/>"##,
            x = x0,
            y = y_cursor,
            w = BAR_WIDTH,
            h = seg_h,
            fill = segment.color
        )?;
    }

    writeln!(
        f,
        r##"<text x="{x}" y="{y}" font-family="Arial,sans-serif" font-size="12px" text-anchor="middle" fill="#000">{label}</text>"##,
        x = x0 + BAR_WIDTH / 2.0,
        y = base_y + 18.0,
        label = html_encode(&group.label)
    )?;
    Ok(())
}

fn draw_legend<W: Write>(f: &mut W, spec: &ChartSpec, x0: f32, y0: f32) -> Result<()> {
    let pad = 10.0f32;
    let row_h = 18.0f32;
    let sw = 12.0f32;
    let text_dx = 6.0f32;

    // one legend entry per distinct segment label, first appearance wins
    let entries: Vec<(&str, &str)> = spec
        .groups
        .iter()
        .flat_map(|g| g.segments.iter())
        .map(|s| (s.label.as_str(), s.color))
        .unique_by(|(label, _)| *label)
        .collect();
    if entries.is_empty() {
        return Ok(());
    }

    let box_h = pad * 2.0 + row_h * entries.len() as f32;
    writeln!(
        f,
        r##"<rect x="{x}" y="{y}" width="{bw}" height="{bh}" rx="8" ry="8" fill="#fff" stroke="#aaa" stroke-width="1"/>"##,
        x = x0,
        y = y0,
        bw = LEGEND_WIDTH - MARGIN,
        bh = box_h
    )?;

    let mut y = y0 + pad;
    for (label, color) in entries {
        writeln!(
            f,
            r##"<rect x="{x}" y="{y}" width="{sw}" height="{sh}" fill="{fill}" stroke="#666" stroke-width="0.5"/>"##,
            x = x0 + pad,
            y = y,
            sw = sw,
            sh = sw,
            fill = color
        )?;
        writeln!(
            f,
            r##"<text x="{x}" y="{y}" font-family="Arial,sans-serif" font-size="11px" dominant-baseline="middle" fill="#333">{label}</text>"##,
            x = x0 + pad + sw + text_dx,
            y = y + sw * 0.5,
            label = html_encode(label)
        )?;
        y += row_h;
    }
    Ok(())
}

/// Saves a chart as `<output_dir>/<prefix>_<timestamp>.svg`, creating the
/// directory if needed.
pub fn save_chart(spec: &ChartSpec, output_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let output_path = timestamped_path(output_dir, prefix, "svg")?;

    let file = File::create(&output_path)?;
    let mut f = BufWriter::new(file);
    render_svg(&mut f, spec)?;
    f.flush()?;

    Ok(output_path)
}
