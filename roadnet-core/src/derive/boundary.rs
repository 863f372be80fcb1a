//! Administrative boundary relations.

use geo::LineString;
use log::warn;

use crate::{
    AreaGeometry, AttributeStore, Centroid, Feature, LabelPoint, MemberRole, NameRow, Ring, Tags,
};

use super::{DerivationError, settings::ConversionSettings};

/// Maps a zone's boundary level codes to OSM `admin_level` values.
pub trait AdminLevelClassifier {
    /// OSM level for `level_code` in `zone`, or `None` when unmapped.
    fn admin_level(&self, zone: &str, level_code: u8) -> Option<u8>;
}

/// One administrative polygon read from an `a<level>.shp` layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPolygon {
    /// Source identifier, also the alternate-name join key.
    pub id: i64,
    /// Level digit of the layer the polygon came from.
    pub level_code: u8,
    pub rings: Vec<LineString<f64>>,
    pub name: Option<String>,
    pub population: Option<i64>,
    /// Official municipality code, emitted as `ref:INSEE`.
    pub official_code: Option<String>,
    /// City-centre join key; the polygon id is used when absent.
    pub city_center: Option<i64>,
}

/// Features produced for one boundary polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeatures {
    /// The boundary relation with its ring ways and label.
    pub relation: Feature,
    /// Place node at the city centre, when one was found.
    pub place: Option<Feature>,
}

/// Place class from the city-centre display class.
#[must_use]
pub const fn place_class(display_class: i64) -> &'static str {
    match display_class {
        ..=3 => "city",
        4..=6 => "town",
        7..=8 => "village",
        _ => "hamlet",
    }
}

/// `capital` value for a city centre seated above the polygon's own level.
///
/// National capitals are `yes`; seats of higher-order areas carry the OSM
/// level of that area. A centre ranked at or below the polygon level is not
/// a capital for tagging purposes.
fn capital<C>(classifier: &C, zone: &str, centre: &Centroid, level_code: u8) -> Option<String>
where
    C: AdminLevelClassifier + ?Sized,
{
    let rank = centre.admin_class.and_then(|class| u8::try_from(class).ok())?;
    match rank {
        0 => Some("yes".to_owned()),
        rank if rank < level_code => classifier
            .admin_level(zone, rank)
            .map(|level| level.to_string()),
        _ => None,
    }
}

fn alternate_name_tags(settings: &ConversionSettings, rows: &[&NameRow]) -> Tags {
    let mut tags = Tags::new();
    for row in rows {
        let Some(language) = row.language.as_deref().and_then(|code| settings.language(code))
        else {
            continue;
        };
        tags.entry(format!("name:{language}"))
            .and_modify(|value: &mut String| {
                if !value.split(';').any(|existing| existing == row.name) {
                    value.push(';');
                    value.push_str(&row.name);
                }
            })
            .or_insert_with(|| row.name.clone());
    }
    tags
}

pub(super) fn assemble<C>(
    settings: &ConversionSettings,
    classifier: &C,
    store: &AttributeStore,
    polygon: &BoundaryPolygon,
) -> Result<BoundaryFeatures, DerivationError>
where
    C: AdminLevelClassifier + ?Sized,
{
    let zone = store.zone();
    let admin_level = classifier
        .admin_level(zone, polygon.level_code)
        .ok_or_else(|| DerivationError::UnmappedAdminLevel {
            zone: zone.to_owned(),
            id: polygon.id,
            level_code: polygon.level_code,
        })?
        .to_string();

    let mut shared = alternate_name_tags(settings, &store.area_names(polygon.id)?);
    if let Some(name) = &polygon.name {
        shared.insert("name".to_owned(), name.clone());
    }
    if let Some(population) = polygon.population {
        shared.insert("population".to_owned(), population.to_string());
    }
    if let Some(code) = &polygon.official_code {
        shared.insert("ref:INSEE".to_owned(), code.clone());
    }
    shared.insert("ref:tomtom".to_owned(), polygon.id.to_string());

    let mut ring_tags = Tags::new();
    ring_tags.insert("boundary".to_owned(), "administrative".to_owned());
    ring_tags.insert("admin_level".to_owned(), admin_level.clone());
    if let Some(name) = &polygon.name {
        ring_tags.insert("name".to_owned(), name.clone());
    }
    let rings = polygon
        .rings
        .iter()
        .map(|line| Ring {
            role: MemberRole::Outer,
            line: line.clone(),
            tags: ring_tags.clone(),
        })
        .collect();

    let centre_key = polygon.city_center.unwrap_or(polygon.id);
    let centroid = store.centroid(centre_key)?;
    if centroid.is_none() {
        warn!(
            "zone {zone}: boundary {} has no city centre {centre_key}; emitting it without a label",
            polygon.id
        );
    }

    let label = centroid.map(|centre| LabelPoint {
        location: centre.location,
        tags: shared.clone(),
    });

    let place = centroid
        .map(|centre| -> Result<Feature, DerivationError> {
            let mut tags = alternate_name_tags(settings, &store.city_names(centre.id)?);
            if let Some(name) = centre.name.as_ref().or(polygon.name.as_ref()) {
                tags.insert("name".to_owned(), name.clone());
            }
            if let Some(population) = polygon.population {
                tags.insert("population".to_owned(), population.to_string());
            }
            if let Some(class) = centre.display_class {
                tags.insert("place".to_owned(), place_class(class).to_owned());
            }
            if let Some(capital) = capital(classifier, zone, centre, polygon.level_code) {
                tags.insert("capital".to_owned(), capital);
            }
            Ok(Feature::point(centre.id, centre.location, tags))
        })
        .transpose()?;

    let mut relation_tags = shared;
    relation_tags.insert("type".to_owned(), "boundary".to_owned());
    relation_tags.insert("boundary".to_owned(), "administrative".to_owned());
    relation_tags.insert("admin_level".to_owned(), admin_level);

    Ok(BoundaryFeatures {
        relation: Feature::area(polygon.id, AreaGeometry { rings, label }, relation_tags),
        place,
    })
}
