use crate::actions::ActionCatalog;
use crate::chart::{ChartSpec, build_comparison_chart, build_overview_chart};
use crate::dataset::WasteTable;
use crate::reduce::{ToggleKey, ToggleState, compute_improved};
use crate::waste::WasteType;

use log::warn;

/// A single user interaction with the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// A new sector was picked, or the selection was cleared.
    SelectSector(Option<String>),
    /// One improvement checkbox was switched on or off.
    SetAction {
        waste_type: WasteType,
        label: String,
        active: bool,
    },
}

/// The full per-session UI state: the selected sector and its toggles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    sector: Option<String>,
    toggles: ToggleState,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sector(&self) -> Option<&str> {
        self.sector.as_deref()
    }

    pub fn toggles(&self) -> &ToggleState {
        &self.toggles
    }

    /// Applies one event. Changing the sector discards all toggles so state
    /// never carries over between sectors.
    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::SelectSector(sector) => {
                if sector != self.sector {
                    self.toggles.clear();
                }
                self.sector = sector;
            }
            DashboardEvent::SetAction {
                waste_type,
                label,
                active,
            } => match &self.sector {
                Some(sector) => {
                    self.toggles
                        .set(ToggleKey::new(sector.clone(), waste_type, label), active);
                }
                None => warn!("Ignoring action toggle '{label}': no sector selected"),
            },
        }
    }
}

/// The two chart descriptions produced by one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub overview: ChartSpec,
    pub comparison: ChartSpec,
}

/// One synchronous render pass: a pure function of the current state, the
/// loaded dataset, and the action catalog. Returns `None` when no sector is
/// selected, and also when the selected sector is missing from the table
/// (stale selection), which renders nothing rather than failing.
pub fn on_interaction(
    state: &DashboardState,
    table: &WasteTable,
    catalog: &ActionCatalog,
) -> Option<RenderOutput> {
    let sector = state.sector()?;
    let observations = match table.sector_observations(sector) {
        Ok(observations) => observations,
        Err(e) => {
            warn!("Skipping render: {e}");
            return None;
        }
    };

    let active = state.toggles.active_actions(catalog, sector);
    let improved = compute_improved(&observations, &active);

    Some(RenderOutput {
        overview: build_overview_chart(sector, &observations),
        comparison: build_comparison_chart(sector, &improved),
    })
}
