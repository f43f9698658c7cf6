use crate::error::{Result, WasteVizError};
use crate::waste::WasteType;

use serde::{Deserialize, Serialize};

/// A named intervention that reduces one waste type by a fixed fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementAction {
    pub waste_type: WasteType,
    pub label: String,
    /// Fractional reduction in [0, 1). 0.05 means a 5% reduction.
    pub reduction: f64,
}

impl ImprovementAction {
    /// # Errors
    /// Returns `Config` if `reduction` lies outside [0, 1).
    pub fn new(waste_type: WasteType, label: impl Into<String>, reduction: f64) -> Result<Self> {
        let action = Self {
            waste_type,
            label: label.into(),
            reduction,
        };
        action.validate()?;
        Ok(action)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.reduction.is_finite() || !(0.0..1.0).contains(&self.reduction) {
            return Err(WasteVizError::Config(format!(
                "Reduction for '{}' must be in [0, 1), got {}",
                self.label, self.reduction
            )));
        }
        Ok(())
    }

    /// Reduction as a whole percentage, for display.
    pub fn percent(&self) -> u32 {
        (self.reduction * 100.0).round() as u32
    }
}

/// The fixed set of improvement actions offered to the user. Built once,
/// never mutated at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCatalog {
    actions: Vec<ImprovementAction>,
}

impl Default for ActionCatalog {
    /// The compiled-in catalog: two actions per waste type. The percentages
    /// are illustrative configuration values, not measured domain truth.
    fn default() -> Self {
        use WasteType::*;
        let entries = [
            (Disposed, "Implement waste sorting", 0.05),
            (Disposed, "Reduce single-use items", 0.10),
            (Recycle, "Improve sorting instructions", 0.10),
            (Recycle, "Upgrade recycling bins", 0.05),
            (Organics, "Start composting", 0.20),
            (Organics, "Enhance staff training on composting", 0.10),
            (Other, "Optimize material use", 0.15),
            (Other, "Improve process efficiency", 0.10),
        ];
        Self {
            actions: entries
                .into_iter()
                .map(|(waste_type, label, reduction)| ImprovementAction {
                    waste_type,
                    label: label.to_string(),
                    reduction,
                })
                .collect(),
        }
    }
}

impl ActionCatalog {
    /// Builds a catalog from explicit entries (e.g. a config override).
    ///
    /// # Errors
    /// Returns `Config` if any reduction lies outside [0, 1) or the same
    /// (waste type, label) pair appears twice.
    pub fn from_entries(actions: Vec<ImprovementAction>) -> Result<Self> {
        for (i, action) in actions.iter().enumerate() {
            action.validate()?;
            for earlier in &actions[..i] {
                if earlier.waste_type == action.waste_type && earlier.label == action.label {
                    return Err(WasteVizError::Config(format!(
                        "Duplicate improvement action for {}: {}",
                        action.waste_type, action.label
                    )));
                }
            }
        }
        Ok(Self { actions })
    }

    pub fn actions(&self) -> &[ImprovementAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// All actions applying to one waste type, in catalog order.
    pub fn for_type(&self, waste_type: WasteType) -> impl Iterator<Item = &ImprovementAction> {
        self.actions.iter().filter(move |a| a.waste_type == waste_type)
    }

    pub fn find(&self, waste_type: WasteType, label: &str) -> Option<&ImprovementAction> {
        self.actions
            .iter()
            .find(|a| a.waste_type == waste_type && a.label == label)
    }

    /// Finds an action by label alone. Labels are unique in the default
    /// catalog, so this is what the CLI resolves `--enable` against.
    pub fn find_by_label(&self, label: &str) -> Option<&ImprovementAction> {
        self.actions.iter().find(|a| a.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_catalog_shape() {
        let catalog = ActionCatalog::default();
        assert_eq!(catalog.len(), 8);
        for waste_type in WasteType::iter() {
            assert_eq!(catalog.for_type(waste_type).count(), 2);
        }
    }

    #[test]
    fn test_default_catalog_valid() {
        for action in ActionCatalog::default().actions() {
            assert!(action.validate().is_ok(), "invalid: {}", action.label);
        }
    }

    #[test]
    fn test_reduction_bounds() {
        assert!(ImprovementAction::new(WasteType::Disposed, "a", 0.0).is_ok());
        assert!(ImprovementAction::new(WasteType::Disposed, "a", 0.99).is_ok());
        assert!(ImprovementAction::new(WasteType::Disposed, "a", 1.0).is_err());
        assert!(ImprovementAction::new(WasteType::Disposed, "a", -0.1).is_err());
        assert!(ImprovementAction::new(WasteType::Disposed, "a", f64::NAN).is_err());
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let entries = vec![
            ImprovementAction::new(WasteType::Recycle, "Upgrade recycling bins", 0.05).unwrap(),
            ImprovementAction::new(WasteType::Recycle, "Upgrade recycling bins", 0.10).unwrap(),
        ];
        let err = ActionCatalog::from_entries(entries).unwrap_err();
        assert!(matches!(err, WasteVizError::Config(_)));
    }

    #[test]
    fn test_find_by_label() {
        let catalog = ActionCatalog::default();
        let action = catalog.find_by_label("Start composting").unwrap();
        assert_eq!(action.waste_type, WasteType::Organics);
        assert_eq!(action.percent(), 20);
        assert!(catalog.find_by_label("Burn everything").is_none());
    }
}
