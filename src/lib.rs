pub mod actions;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod reduce;
pub mod session;
pub mod waste;

pub use actions::{ActionCatalog, ImprovementAction};
pub use chart::{
    BarGroup, BarMode, BarSegment, ChartSpec, build_comparison_chart, build_overview_chart,
    save_chart_json,
};
pub use chart::svg::save_chart;
pub use config::Config;
pub use dataset::{
    WasteObservation, WasteRecord, WasteTable, load_cached, read_waste_csv,
    read_waste_from_reader,
};
pub use error::WasteVizError;
pub use reduce::{ImprovedObservation, ToggleKey, ToggleState, compute_improved};
pub use session::{DashboardEvent, DashboardState, RenderOutput, on_interaction};
pub use waste::{WasteType, color_of};
