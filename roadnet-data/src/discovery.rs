//! Zone discovery from a country's source files.

use std::{collections::BTreeSet, io};

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use thiserror::Error;

/// File-name suffixes of the themes that mark a zone.
pub const ZONE_SUFFIXES: [&str; 4] = [
    "_2dbd.shp",
    "___________nw.shp",
    "___________fe.shp",
    "______________a0.shp",
];

/// Errors raised while discovering zones.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The country directory could not be listed.
    #[error("failed to list country {country} at {path}: {source}")]
    Listing {
        country: String,
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Zone name of a theme file, or `None` for unrelated files.
///
/// # Examples
/// ```
/// use roadnet_data::zone_name;
///
/// assert_eq!(zone_name("andorra___________nw.shp"), Some("andorra"));
/// assert_eq!(zone_name("andorra___________nw.dbf"), None);
/// ```
#[must_use]
pub fn zone_name(file_name: &str) -> Option<&str> {
    ZONE_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .filter(|zone| !zone.is_empty())
}

/// Zones of a country, de-duplicated and in lexicographic order.
pub fn discover_zones(input_root: &Utf8Path, country: &str) -> Result<Vec<String>, DiscoveryError> {
    let path = input_root.join(country);
    let names = roadnet_fs::list_file_names(&path).map_err(|source| DiscoveryError::Listing {
        country: country.to_owned(),
        path: path.clone(),
        source,
    })?;
    let zones: BTreeSet<&str> = names.iter().filter_map(|name| zone_name(name)).collect();
    if zones.is_empty() {
        warn!("country {country}: no zone theme files in {path}");
    }
    debug!("country {country}: discovered {} zones", zones.len());
    Ok(zones.into_iter().map(str::to_owned).collect())
}
