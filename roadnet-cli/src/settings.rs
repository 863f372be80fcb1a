//! Tag derivation settings layered from configuration files, `ROADNET_*`
//! environment variables and command-line flags.

use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use roadnet_core::{ConversionSettings, SideConflict};
use serde::{Deserialize, Serialize};

use crate::CliError;

pub(crate) const ARG_SIDE_CONFLICT: &str = "side-conflict";
pub(crate) const ARG_LANGUAGE: &str = "language";
pub(crate) const ARG_ADMIN_LEVEL: &str = "admin-level";
pub(crate) const ARG_ZONE_ADMIN_LEVEL: &str = "zone-admin-level";

/// Tag derivation options. Anything left unset keeps the built-in rules.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[ortho_config(prefix = "ROADNET")]
pub(crate) struct SettingsArgs {
    /// How differing left and right alternate names are tagged
    /// (`keep_sides` or `concatenate`).
    #[arg(long = ARG_SIDE_CONFLICT, value_name = "policy", value_parser = parse_side_conflict)]
    #[serde(default)]
    pub(crate) side_conflict: Option<SideConflict>,
    /// Extra or replacement language mapping, e.g. `LTZ=lb`.
    #[arg(long = ARG_LANGUAGE, value_name = "code=iso")]
    #[serde(default)]
    pub(crate) languages: Option<Vec<String>>,
    /// Default admin level for a level code, e.g. `8=8`.
    #[arg(long = ARG_ADMIN_LEVEL, value_name = "code=level")]
    #[serde(default)]
    pub(crate) admin_levels: Option<Vec<String>>,
    /// Admin level for a level code within one zone, e.g. `Paris:8=9`.
    #[arg(long = ARG_ZONE_ADMIN_LEVEL, value_name = "zone:code=level")]
    #[serde(default)]
    pub(crate) zone_admin_levels: Option<Vec<String>>,
}

impl SettingsArgs {
    /// Merge the configuration layers and apply them over the defaults.
    pub(crate) fn into_settings(self) -> Result<ConversionSettings, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        merged.resolve()
    }

    fn resolve(self) -> Result<ConversionSettings, CliError> {
        let mut settings = ConversionSettings::default();
        if let Some(side_conflict) = self.side_conflict {
            settings.side_conflict = side_conflict;
        }
        for entry in self.languages.unwrap_or_default() {
            let (code, iso) =
                parse_language(&entry).ok_or_else(|| invalid(ARG_LANGUAGE, &entry))?;
            settings.languages.insert(code, iso);
        }
        for entry in self.admin_levels.unwrap_or_default() {
            let (code, level) =
                parse_level(&entry).ok_or_else(|| invalid(ARG_ADMIN_LEVEL, &entry))?;
            settings.admin_levels.levels.insert(code, level);
        }
        for entry in self.zone_admin_levels.unwrap_or_default() {
            let (zone, code, level) =
                parse_zone_level(&entry).ok_or_else(|| invalid(ARG_ZONE_ADMIN_LEVEL, &entry))?;
            settings.admin_levels = settings.admin_levels.with_override(zone, code, level);
        }
        debug!(
            "conversion settings: {:?} side conflicts, {} languages",
            settings.side_conflict,
            settings.languages.len()
        );
        Ok(settings)
    }
}

fn invalid(field: &'static str, entry: &str) -> CliError {
    CliError::InvalidSetting {
        field,
        value: entry.to_owned(),
    }
}

fn parse_side_conflict(raw: &str) -> Result<SideConflict, String> {
    match raw {
        "keep_sides" => Ok(SideConflict::KeepSides),
        "concatenate" => Ok(SideConflict::Concatenate),
        other => Err(format!("expected keep_sides or concatenate, found {other:?}")),
    }
}

/// `CODE=iso`; the distribution code is stored upper-case.
fn parse_language(entry: &str) -> Option<(String, String)> {
    let (code, iso) = entry.split_once('=')?;
    let (code, iso) = (code.trim(), iso.trim());
    if code.is_empty() || iso.is_empty() {
        return None;
    }
    Some((code.to_ascii_uppercase(), iso.to_owned()))
}

fn parse_level(entry: &str) -> Option<(u8, u8)> {
    let (code, level) = entry.split_once('=')?;
    Some((code.trim().parse().ok()?, level.trim().parse().ok()?))
}

fn parse_zone_level(entry: &str) -> Option<(&str, u8, u8)> {
    let (zone, level) = entry.rsplit_once(':')?;
    let zone = zone.trim();
    if zone.is_empty() {
        return None;
    }
    let (code, level) = parse_level(level)?;
    Some((zone, code, level))
}

#[cfg(test)]
pub(crate) fn settings_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ConversionSettings, CliError> {
    let merged = SettingsArgs::merge_from_layers(layers).map_err(CliError::from)?;
    merged.resolve()
}
