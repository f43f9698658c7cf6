use crate::actions::{ActionCatalog, ImprovementAction};
use crate::dataset::WasteObservation;
use crate::waste::WasteType;

use serde::Serialize;
use std::collections::HashSet;

/// Composite key identifying one active toggle. Keyed per sector so state
/// cannot leak across sector switches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToggleKey {
    pub sector: String,
    pub waste_type: WasteType,
    pub label: String,
}

impl ToggleKey {
    pub fn new(
        sector: impl Into<String>,
        waste_type: WasteType,
        label: impl Into<String>,
    ) -> Self {
        Self {
            sector: sector.into(),
            waste_type,
            label: label.into(),
        }
    }
}

/// The set of currently active improvement toggles. Transient, owned by the
/// session; cleared when the selected sector changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleState {
    active: HashSet<ToggleKey>,
}

impl ToggleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one toggle on or off.
    pub fn set(&mut self, key: ToggleKey, active: bool) {
        if active {
            self.active.insert(key);
        } else {
            self.active.remove(&key);
        }
    }

    /// Flips one toggle, returning the new state.
    pub fn toggle(&mut self, key: ToggleKey) -> bool {
        if self.active.remove(&key) {
            false
        } else {
            self.active.insert(key);
            true
        }
    }

    pub fn is_active(&self, key: &ToggleKey) -> bool {
        self.active.contains(key)
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Resolves the active toggles for one sector against the catalog.
    /// Toggles whose key no longer matches a catalog entry are ignored.
    pub fn active_actions<'a>(
        &self,
        catalog: &'a ActionCatalog,
        sector: &str,
    ) -> Vec<&'a ImprovementAction> {
        catalog
            .actions()
            .iter()
            .filter(|action| {
                self.active.contains(&ToggleKey {
                    sector: sector.to_string(),
                    waste_type: action.waste_type,
                    label: action.label.clone(),
                })
            })
            .collect()
    }
}

/// A long-form observation with its improved amount alongside the original.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovedObservation {
    pub sector: String,
    pub waste_type: WasteType,
    pub amount: f64,
    pub improved: f64,
}

/// Applies every active action to the observations it matches:
/// `improved = amount * product of (1 - reduction)` over actions whose waste
/// type equals the observation's. With no matching action the amount passes
/// through unchanged. Pure and deterministic; multiplication makes the
/// application order irrelevant.
pub fn compute_improved(
    observations: &[WasteObservation],
    active_actions: &[&ImprovementAction],
) -> Vec<ImprovedObservation> {
    observations
        .iter()
        .map(|obs| {
            let factor: f64 = active_actions
                .iter()
                .filter(|action| action.waste_type == obs.waste_type)
                .map(|action| 1.0 - action.reduction)
                .product();
            ImprovedObservation {
                sector: obs.sector.clone(),
                waste_type: obs.waste_type,
                amount: obs.amount,
                improved: obs.amount * factor,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{WasteRecord, WasteTable};

    const TOLERANCE: f64 = 1e-9;

    fn retail_observations() -> Vec<WasteObservation> {
        let table = WasteTable::from_records(vec![WasteRecord {
            sector: "Retail".to_string(),
            disposed: 10.0,
            recycle: 5.0,
            organics: 3.0,
            other: 2.0,
        }]);
        table.to_long()
    }

    fn amount_of(improved: &[ImprovedObservation], waste_type: WasteType) -> f64 {
        improved
            .iter()
            .find(|o| o.waste_type == waste_type)
            .unwrap()
            .improved
    }

    #[test]
    fn test_identity_with_no_actions() {
        let observations = retail_observations();
        let improved = compute_improved(&observations, &[]);
        assert_eq!(improved.len(), observations.len());
        for (obs, imp) in observations.iter().zip(&improved) {
            assert_eq!(imp.improved, obs.amount);
            assert_eq!(imp.amount, obs.amount);
        }
    }

    #[test]
    fn test_retail_disposed_scenario() {
        // 5% sorting + 10% single-use reduction on Disposed=10 -> 8.55
        let observations = retail_observations();
        let catalog = ActionCatalog::default();
        let sorting = catalog.find_by_label("Implement waste sorting").unwrap();
        let single_use = catalog.find_by_label("Reduce single-use items").unwrap();

        let improved = compute_improved(&observations, &[sorting, single_use]);
        assert!((amount_of(&improved, WasteType::Disposed) - 8.55).abs() < TOLERANCE);

        // other types untouched
        assert_eq!(amount_of(&improved, WasteType::Recycle), 5.0);
        assert_eq!(amount_of(&improved, WasteType::Organics), 3.0);
        assert_eq!(amount_of(&improved, WasteType::Other), 2.0);
    }

    #[test]
    fn test_monotonic_non_increase() {
        let observations = retail_observations();
        let catalog = ActionCatalog::default();
        let all: Vec<&ImprovementAction> = catalog.actions().iter().collect();

        // every non-empty subset of a small catalog, via bitmask
        for mask in 1u32..(1 << all.len()) {
            let subset: Vec<&ImprovementAction> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, a)| *a)
                .collect();
            let improved = compute_improved(&observations, &subset);
            for imp in &improved {
                assert!(imp.improved <= imp.amount + TOLERANCE, "mask {mask}");
                assert!(imp.improved >= 0.0);
            }
        }
    }

    #[test]
    fn test_commutativity() {
        let observations = retail_observations();
        let a = ImprovementAction::new(WasteType::Disposed, "a", 0.05).unwrap();
        let b = ImprovementAction::new(WasteType::Disposed, "b", 0.10).unwrap();

        let ab = compute_improved(&observations, &[&a, &b]);
        let ba = compute_improved(&observations, &[&b, &a]);
        for (x, y) in ab.iter().zip(&ba) {
            assert!((x.improved - y.improved).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_toggle_off_restores_amount() {
        let observations = retail_observations();
        let catalog = ActionCatalog::default();
        let mut toggles = ToggleState::new();
        let key = ToggleKey::new("Retail", WasteType::Organics, "Start composting");

        let before = compute_improved(&observations, &toggles.active_actions(&catalog, "Retail"));

        assert!(toggles.toggle(key.clone()));
        let during = compute_improved(&observations, &toggles.active_actions(&catalog, "Retail"));
        assert!(
            (amount_of(&during, WasteType::Organics) - 3.0 * 0.80).abs() < TOLERANCE
        );

        assert!(!toggles.toggle(key));
        let after = compute_improved(&observations, &toggles.active_actions(&catalog, "Retail"));
        assert_eq!(before, after);
    }

    #[test]
    fn test_active_actions_scoped_to_sector() {
        let catalog = ActionCatalog::default();
        let mut toggles = ToggleState::new();
        toggles.set(
            ToggleKey::new("Retail", WasteType::Disposed, "Implement waste sorting"),
            true,
        );

        assert_eq!(toggles.active_actions(&catalog, "Retail").len(), 1);
        assert!(toggles.active_actions(&catalog, "Education").is_empty());
    }

    #[test]
    fn test_stale_toggle_ignored() {
        // a toggle that no longer matches any catalog entry contributes nothing
        let catalog = ActionCatalog::default();
        let mut toggles = ToggleState::new();
        toggles.set(
            ToggleKey::new("Retail", WasteType::Disposed, "Retired action"),
            true,
        );
        assert!(toggles.active_actions(&catalog, "Retail").is_empty());
    }
}
