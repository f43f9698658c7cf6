use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How a waste stream is handled, one category per dataset column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum WasteType {
    Disposed,
    Recycle,
    Organics,
    Other,
}

/// Display color of a waste type, kept identical across all charts.
pub fn color_of(waste_type: WasteType) -> &'static str {
    use WasteType::*;
    match waste_type {
        Disposed => "red",
        Recycle => "blue",
        Organics => "green",
        Other => "purple",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_waste_type_iteration_order_matches_columns() {
        let all: Vec<WasteType> = WasteType::iter().collect();
        assert_eq!(
            all,
            vec![
                WasteType::Disposed,
                WasteType::Recycle,
                WasteType::Organics,
                WasteType::Other
            ]
        );
    }

    #[test]
    fn test_waste_type_parse_case_insensitive() {
        assert_eq!(WasteType::from_str("disposed").unwrap(), WasteType::Disposed);
        assert_eq!(WasteType::from_str("Organics").unwrap(), WasteType::Organics);
        assert!(WasteType::from_str("compost").is_err());
    }

    #[test]
    fn test_colors_are_distinct() {
        let colors: Vec<&str> = WasteType::iter().map(color_of).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
