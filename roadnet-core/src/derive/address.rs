//! Postcodes and house-number interpolation from geocode rows.

use crate::{AddressRange, GeocodeRow, Side, Tags};

fn first_postcode<'a>(rows: &[&'a GeocodeRow], side: Side) -> Option<&'a str> {
    rows.iter()
        .find_map(|row| row.range(side).postcode.as_deref())
}

pub(super) fn postcode(rows: &[&GeocodeRow]) -> Option<String> {
    match (first_postcode(rows, Side::Left), first_postcode(rows, Side::Right)) {
        (None, None) => None,
        (Some(left), Some(right)) if left == right => Some(left.to_owned()),
        (left, right) => Some(format!("{};{}", left.unwrap_or(""), right.unwrap_or(""))),
    }
}

fn first_bounded<'a>(rows: &[&'a GeocodeRow], side: Side) -> Option<&'a AddressRange> {
    rows.iter()
        .map(|row| row.range(side))
        .find(|range| range.bounds.is_some())
}

pub(super) fn interpolations(rows: &[&GeocodeRow]) -> Tags {
    [Side::Left, Side::Right]
        .into_iter()
        .filter_map(|side| {
            let bounds = first_bounded(rows, side)?.bounds.as_ref()?;
            Some((
                format!("interpolation:{}", side.as_str()),
                format!("{};{}", bounds.from, bounds.to),
            ))
        })
        .collect()
}

pub(super) fn interpolation_kinds(rows: &[&GeocodeRow]) -> Tags {
    [Side::Left, Side::Right]
        .into_iter()
        .filter_map(|side| {
            let kind = first_bounded(rows, side)?.kind?;
            Some((
                format!("addr:interpolation:{}", side.as_str()),
                kind.as_str().to_owned(),
            ))
        })
        .collect()
}
