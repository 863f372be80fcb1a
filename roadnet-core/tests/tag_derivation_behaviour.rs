//! Behavioural tests for segment tag derivation.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

use roadnet_core::{
    AttributeStore, Row, TableError, TableKind, TableSource, TagDerivationEngine, Tags,
};

#[derive(Debug, Default)]
struct Tables {
    speeds: Vec<Row>,
    geocodes: Vec<Row>,
}

impl TableSource for Tables {
    fn zone(&self) -> &str {
        "Andorra"
    }

    fn read_table(&self, kind: TableKind) -> Result<Vec<Row>, TableError> {
        match kind {
            TableKind::SpeedRestrictions => Ok(self.speeds.clone()),
            TableKind::Geocodes => Ok(self.geocodes.clone()),
            table => Err(TableError::Absent { table }),
        }
    }
}

#[fixture]
fn tables() -> RefCell<Tables> {
    RefCell::new(Tables::default())
}

#[fixture]
fn derived() -> RefCell<Tags> {
    RefCell::new(Tags::new())
}

fn segment_row(segment: i64) -> Row {
    Row::new().with_integer("ID", segment)
}

#[given("segment {segment} limited to {speed} km/h in the {direction} direction")]
fn given_speed_limit(
    #[from(tables)] tables: &RefCell<Tables>,
    segment: i64,
    speed: i64,
    direction: String,
) {
    let valdir = if direction == "positive" { 2 } else { 3 };
    tables.borrow_mut().speeds.push(
        segment_row(segment)
            .with_integer("SPEED", speed)
            .with_integer("VALDIR", valdir),
    );
}

#[given("segment {segment} with right postcode {postcode}")]
fn given_right_postcode(
    #[from(tables)] tables: &RefCell<Tables>,
    segment: i64,
    postcode: String,
) {
    tables
        .borrow_mut()
        .geocodes
        .push(segment_row(segment).with_text("R_PC", postcode.trim_matches('"')));
}

#[given("segment {segment} with right house numbers {from} to {to}")]
fn given_right_house_numbers(
    #[from(tables)] tables: &RefCell<Tables>,
    segment: i64,
    from: i64,
    to: i64,
) {
    tables.borrow_mut().geocodes.push(
        segment_row(segment)
            .with_integer("R_STRUCT", 3)
            .with_integer("R_F_ADD", from)
            .with_integer("R_T_ADD", to),
    );
}

#[when("I derive the tags of segment {segment}")]
fn when_derive(
    #[from(tables)] tables: &RefCell<Tables>,
    #[from(derived)] derived: &RefCell<Tags>,
    segment: i64,
) {
    let store = AttributeStore::load(
        &*tables.borrow(),
        &[TableKind::SpeedRestrictions, TableKind::Geocodes],
    )
    .expect("load attribute tables");
    let tags = TagDerivationEngine::default()
        .segment_tags(&store, segment)
        .expect("derive tags");
    *derived.borrow_mut() = tags;
}

#[then("tag {key} is {value}")]
fn then_tag_is(#[from(derived)] derived: &RefCell<Tags>, key: String, value: String) {
    let key = key.trim_matches('"');
    let expected = value.trim_matches('"');
    assert_eq!(
        derived.borrow().get(key).map(String::as_str),
        Some(expected),
        "unexpected value for {key}"
    );
}

#[then("no {key} tag is derived")]
fn then_tag_absent(#[from(derived)] derived: &RefCell<Tags>, key: String) {
    let key = key.trim_matches('"');
    assert!(!derived.borrow().contains_key(key), "{key} should be absent");
}

#[scenario(path = "tests/features/tag_derivation.feature", index = 0)]
fn scenario_directional_speeds(tables: RefCell<Tables>, derived: RefCell<Tags>) {
    let _ = (tables, derived);
}

#[scenario(path = "tests/features/tag_derivation.feature", index = 1)]
fn scenario_one_sided_postcode(tables: RefCell<Tables>, derived: RefCell<Tags>) {
    let _ = (tables, derived);
}

#[scenario(path = "tests/features/tag_derivation.feature", index = 2)]
fn scenario_one_sided_interpolation(tables: RefCell<Tables>, derived: RefCell<Tags>) {
    let _ = (tables, derived);
}
