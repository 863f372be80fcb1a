//! Alternate street names from geocode rows.

use std::collections::BTreeMap;

use crate::{GeocodeRow, NameSide, Side, Tags};

use super::settings::{ConversionSettings, SideConflict};

#[derive(Debug, Default)]
struct LanguageNames<'a> {
    both: Vec<&'a str>,
    left: Vec<&'a str>,
    right: Vec<&'a str>,
}

fn push_unique<'a>(values: &mut Vec<&'a str>, value: &'a str) {
    if !values.contains(&value) {
        values.push(value);
    }
}

pub(super) fn alternate_names(settings: &ConversionSettings, rows: &[&GeocodeRow]) -> Tags {
    let mut by_language: BTreeMap<&str, LanguageNames<'_>> = BTreeMap::new();
    for row in rows {
        let (Some(name), Some(code)) = (row.name.as_deref(), row.language.as_deref()) else {
            continue;
        };
        let Some(language) = settings.language(code) else {
            continue;
        };
        let names = by_language.entry(language).or_default();
        let values = match row.name_side {
            NameSide::Both => &mut names.both,
            NameSide::Only(Side::Left) => &mut names.left,
            NameSide::Only(Side::Right) => &mut names.right,
        };
        push_unique(values, name);
    }

    let mut tags = Tags::new();
    for (language, mut names) in by_language {
        let mut sided = Vec::new();
        if !names.left.is_empty() && names.left == names.right {
            for value in names.left {
                push_unique(&mut names.both, value);
            }
        } else {
            match settings.side_conflict {
                SideConflict::KeepSides => {
                    sided.push((Side::Left, names.left));
                    sided.push((Side::Right, names.right));
                }
                SideConflict::Concatenate => {
                    for value in names.left.into_iter().chain(names.right) {
                        push_unique(&mut names.both, value);
                    }
                }
            }
        }
        if !names.both.is_empty() {
            tags.insert(format!("name:{language}"), names.both.join(";"));
        }
        for (side, values) in sided {
            if !values.is_empty() {
                tags.insert(
                    format!("name:{}:{language}", side.as_str()),
                    values.join(";"),
                );
            }
        }
    }
    tags
}
