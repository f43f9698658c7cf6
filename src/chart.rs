pub mod svg;

use crate::dataset::WasteObservation;
use crate::error::Result;
use crate::reduce::ImprovedObservation;
use crate::waste::color_of;

use chrono::Local;
use itertools::Itertools;
use serde::Serialize;
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const Y_AXIS_LABEL: &str = "Tons per Employee per Year";

/// How bars within a group are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Stack,
}

/// One colored slice of a stacked bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

/// One bar position on the x axis, stacking its segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub label: String,
    pub segments: Vec<BarSegment>,
}

impl BarGroup {
    pub fn total(&self) -> f64 {
        self.segments.iter().map(|s| s.value).sum()
    }
}

/// A renderer-independent chart description. The hosting UI (or the SVG
/// module) consumes this; nothing here draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bar_mode: BarMode,
    pub groups: Vec<BarGroup>,
}

impl ChartSpec {
    /// Tallest stacked bar, used for the y-axis scale.
    pub fn max_group_total(&self) -> f64 {
        self.groups.iter().map(BarGroup::total).fold(0.0, f64::max)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds the current-waste overview chart: one bar per waste type, ordered
/// by descending amount.
pub fn build_overview_chart(sector: &str, observations: &[WasteObservation]) -> ChartSpec {
    let groups = observations
        .iter()
        .sorted_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal))
        .map(|obs| BarGroup {
            label: obs.waste_type.to_string(),
            segments: vec![BarSegment {
                label: obs.waste_type.to_string(),
                value: obs.amount,
                color: color_of(obs.waste_type),
            }],
        })
        .collect();

    ChartSpec {
        title: format!("Current Waste Overview for {}", sector),
        x_label: "Waste Type".to_string(),
        y_label: Y_AXIS_LABEL.to_string(),
        bar_mode: BarMode::Stack,
        groups,
    }
}

/// Builds the current-vs-improved comparison chart: two category groups,
/// each stacking all four waste types with consistent colors.
pub fn build_comparison_chart(sector: &str, improved: &[ImprovedObservation]) -> ChartSpec {
    let current_segments = improved
        .iter()
        .map(|obs| BarSegment {
            label: obs.waste_type.to_string(),
            value: obs.amount,
            color: color_of(obs.waste_type),
        })
        .collect();
    let improved_segments = improved
        .iter()
        .map(|obs| BarSegment {
            label: obs.waste_type.to_string(),
            value: obs.improved,
            color: color_of(obs.waste_type),
        })
        .collect();

    ChartSpec {
        title: format!("Improvement Potential for {}", sector),
        x_label: "Category".to_string(),
        y_label: Y_AXIS_LABEL.to_string(),
        bar_mode: BarMode::Stack,
        groups: vec![
            BarGroup {
                label: "Current".to_string(),
                segments: current_segments,
            },
            BarGroup {
                label: "Improved".to_string(),
                segments: improved_segments,
            },
        ],
    }
}

/// Writes the chart description as pretty-printed JSON to
/// `<output_dir>/<prefix>_<timestamp>.json`.
pub fn save_chart_json(spec: &ChartSpec, output_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let output_path = timestamped_path(output_dir, prefix, "json")?;

    let file = File::create(&output_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(spec.to_json()?.as_bytes())?;
    writer.flush()?;

    Ok(output_path)
}

pub(crate) fn timestamped_path(output_dir: &Path, prefix: &str, ext: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let filename = format!("{prefix}_{timestamp}.{ext}")
        .to_lowercase()
        .replace(' ', "_");
    Ok(output_dir.join(filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{WasteRecord, WasteTable};
    use crate::reduce::compute_improved;
    use crate::waste::WasteType;

    fn retail_observations() -> Vec<WasteObservation> {
        WasteTable::from_records(vec![WasteRecord {
            sector: "Retail".to_string(),
            disposed: 10.0,
            recycle: 5.0,
            organics: 3.0,
            other: 2.0,
        }])
        .to_long()
    }

    #[test]
    fn test_overview_ordered_by_descending_amount() {
        let spec = build_overview_chart("Retail", &retail_observations());
        assert_eq!(spec.title, "Current Waste Overview for Retail");
        assert_eq!(spec.groups.len(), 4);

        let labels: Vec<&str> = spec.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Disposed", "Recycle", "Organics", "Other"]);
        for window in spec.groups.windows(2) {
            assert!(window[0].total() >= window[1].total());
        }
    }

    #[test]
    fn test_overview_colors_follow_waste_type() {
        let spec = build_overview_chart("Retail", &retail_observations());
        for group in &spec.groups {
            assert_eq!(group.segments.len(), 1);
            let segment = &group.segments[0];
            let waste_type: WasteType = segment.label.parse().unwrap();
            assert_eq!(segment.color, color_of(waste_type));
        }
    }

    #[test]
    fn test_comparison_groups() {
        let observations = retail_observations();
        let improved = compute_improved(&observations, &[]);
        let spec = build_comparison_chart("Retail", &improved);

        assert_eq!(spec.groups.len(), 2);
        assert_eq!(spec.groups[0].label, "Current");
        assert_eq!(spec.groups[1].label, "Improved");
        for group in &spec.groups {
            assert_eq!(group.segments.len(), 4);
        }
        // no actions active: both stacks have equal height
        assert_eq!(spec.groups[0].total(), spec.groups[1].total());
        assert_eq!(spec.max_group_total(), 20.0);
    }

    #[test]
    fn test_to_json_roundtrippable_fields() {
        let spec = build_overview_chart("Retail", &retail_observations());
        let json = spec.to_json().unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("Current Waste Overview for Retail"));
        assert!(json.contains("\"bar_mode\": \"stack\""));
    }

    #[test]
    fn test_save_chart_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let spec = build_overview_chart("Retail", &retail_observations());

        let path = save_chart_json(&spec, dir.path(), "overview").unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("overview_"));
        assert!(name.ends_with(".json"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Disposed"));
    }
}
