//! Country-independent conversion rules that can be tuned per deployment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::boundary::AdminLevelClassifier;

/// How differing left and right alternate names are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideConflict {
    /// Emit `name:left:<lang>` and `name:right:<lang>`.
    #[default]
    KeepSides,
    /// Emit `name:<lang>` holding `left;right`.
    Concatenate,
}

/// Administrative level lookup: a default table plus per-zone overrides.
///
/// # Examples
/// ```
/// use roadnet_core::{AdminLevelClassifier, AdminLevelTable};
///
/// let table = AdminLevelTable::default().with_override("Paris", 8, 9);
/// assert_eq!(table.admin_level("Paris", 8), Some(9));
/// assert_eq!(table.admin_level("Lyon", 8), Some(8));
/// assert_eq!(table.admin_level("Lyon", 1), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminLevelTable {
    /// Level code to OSM `admin_level`.
    pub levels: BTreeMap<u8, u8>,
    /// Zone name to level overrides, consulted first.
    pub zone_overrides: BTreeMap<String, BTreeMap<u8, u8>>,
}

impl Default for AdminLevelTable {
    fn default() -> Self {
        let levels = [
            (0, 2),
            (1, 4),
            (2, 5),
            (3, 6),
            (4, 6),
            (5, 7),
            (6, 7),
            (7, 8),
            (8, 8),
            (9, 9),
        ]
        .into_iter()
        .collect();
        Self {
            levels,
            zone_overrides: BTreeMap::new(),
        }
    }
}

impl AdminLevelTable {
    /// Override one level code for a zone.
    #[must_use]
    pub fn with_override(mut self, zone: &str, level_code: u8, admin_level: u8) -> Self {
        self.zone_overrides
            .entry(zone.to_owned())
            .or_default()
            .insert(level_code, admin_level);
        self
    }
}

impl AdminLevelClassifier for AdminLevelTable {
    fn admin_level(&self, zone: &str, level_code: u8) -> Option<u8> {
        self.zone_overrides
            .get(zone)
            .and_then(|levels| levels.get(&level_code))
            .or_else(|| self.levels.get(&level_code))
            .copied()
    }
}

fn default_languages() -> BTreeMap<String, String> {
    [
        ("CAT", "ca"),
        ("FRE", "fr"),
        ("DUT", "nl"),
        ("ENG", "en"),
        ("SPA", "es"),
        ("GER", "de"),
        ("ITA", "it"),
        ("POR", "pt"),
        ("BAS", "eu"),
        ("GLG", "gl"),
        ("LTZ", "lb"),
    ]
    .into_iter()
    .map(|(code, iso)| (code.to_owned(), iso.to_owned()))
    .collect()
}

/// Rules applied while deriving tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Distribution language code to ISO 639-1 code.
    pub languages: BTreeMap<String, String>,
    pub side_conflict: SideConflict,
    pub admin_levels: AdminLevelTable,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            side_conflict: SideConflict::default(),
            admin_levels: AdminLevelTable::default(),
        }
    }
}

impl ConversionSettings {
    /// ISO code for a distribution language code, case-insensitively.
    #[must_use]
    pub fn language(&self, code: &str) -> Option<&str> {
        self.languages
            .get(&code.to_ascii_uppercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CAT", Some("ca"))]
    #[case("fre", Some("fr"))]
    #[case("XYZ", None)]
    fn resolves_languages(#[case] code: &str, #[case] expected: Option<&str>) {
        assert_eq!(ConversionSettings::default().language(code), expected);
    }

    #[rstest]
    fn unmapped_level_code_has_no_level() {
        assert_eq!(AdminLevelTable::default().admin_level("Andorra", 12), None);
    }
}
