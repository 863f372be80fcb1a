//! Orchestrator ordering and failure handling.

use super::helpers::{StubConversion, Workspace, way_ids};
use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn workspace() -> Workspace {
    let workspace = Workspace::new();
    workspace.add_zone("lux", "lux_b");
    workspace.add_zone("lux", "lux_a");
    workspace.add_zone("and", "and_x");
    workspace
}

#[rstest]
fn zones_and_countries_merge_in_order(workspace: Workspace) {
    let converter = StubConversion::default()
        .with_ways("lux_a", &[1, 2])
        .with_ways("lux_b", &[3])
        .with_ways("and_x", &[4]);
    let orchestrator = PipelineOrchestrator::new(workspace.config(&["lux", "and"]), converter);

    let report = orchestrator.run().expect("pipeline succeeds");

    assert_eq!(report.output, workspace.output_root.join("europe.osm.pbf"));
    assert_eq!(way_ids(&report.output), vec![1, 2, 3, 4]);
    assert_eq!(report.summary.ways, 4);
    let countries: Vec<_> = report.countries.iter().map(|c| c.country.as_str()).collect();
    assert_eq!(countries, vec!["lux", "and"]);
    assert_eq!(report.countries[0].zones, 2);
    assert_eq!(
        report.countries[0].path,
        workspace.output_root.join("lux").join("lux.osm.pbf")
    );
    assert_eq!(way_ids(&report.countries[1].path), vec![4]);
}

#[rstest]
fn country_order_follows_arguments(workspace: Workspace) {
    let converter = StubConversion::default()
        .with_ways("lux_a", &[1])
        .with_ways("and_x", &[2]);
    let orchestrator = PipelineOrchestrator::new(workspace.config(&["and", "lux"]), converter);

    let report = orchestrator.run().expect("pipeline succeeds");

    assert_eq!(way_ids(&report.output), vec![2, 1]);
}

#[rstest]
fn zone_archives_land_in_country_folders(workspace: Workspace) {
    let orchestrator =
        PipelineOrchestrator::new(workspace.config(&["and"]), StubConversion::default());

    orchestrator.run().expect("pipeline succeeds");

    assert!(
        workspace
            .output_root
            .join("and/pbfFiles/and_x.osm.pbf")
            .is_file()
    );
}

#[rstest]
fn country_without_zones_merges_an_empty_archive(workspace: Workspace) {
    workspace.add_file("ita", "readme.txt");
    let converter = StubConversion::default().with_ways("lux_a", &[1]);
    let orchestrator = PipelineOrchestrator::new(workspace.config(&["lux", "ita"]), converter);

    let report = orchestrator.run().expect("pipeline succeeds");

    let italy = &report.countries[1];
    assert_eq!(italy.country, "ita");
    assert_eq!(italy.zones, 0);
    assert!(way_ids(&italy.path).is_empty());
    assert_eq!(way_ids(&report.output), vec![1]);
}

#[rstest]
fn failing_zone_aborts_before_merging(workspace: Workspace) {
    let converter = StubConversion::default()
        .with_ways("lux_a", &[1])
        .failing("lux_b");
    let orchestrator = PipelineOrchestrator::new(workspace.config(&["lux", "and"]), converter);

    let err = orchestrator.run().expect_err("conversion failure");

    match err {
        PipelineError::Conversion { country, zone, .. } => {
            assert_eq!(country, "lux");
            assert_eq!(zone, "lux_b");
        }
        other => panic!("expected Conversion, found {other:?}"),
    }
    assert!(!orchestrator.output_path().exists());
    assert!(!workspace.output_root.join("lux/lux.osm.pbf").exists());
    assert!(!workspace.output_root.join("and").exists());
}

#[rstest]
fn unknown_country_fails_before_any_conversion(workspace: Workspace) {
    let converter = StubConversion::default();
    let calls = converter.call_log();
    let orchestrator = PipelineOrchestrator::new(workspace.config(&["lux", "bel"]), converter);

    let err = orchestrator.run().expect_err("discovery failure");

    assert!(matches!(
        err,
        PipelineError::Discovery(roadnet_data::DiscoveryError::Listing { .. })
    ));
    assert!(calls.zones().is_empty());
}

#[rstest]
fn duplicate_ids_across_zones_fail_the_merge(workspace: Workspace) {
    let converter = StubConversion::default()
        .with_ways("lux_a", &[7])
        .with_ways("lux_b", &[7]);
    let orchestrator = PipelineOrchestrator::new(workspace.config(&["lux"]), converter);

    let err = orchestrator.run().expect_err("duplicate ids");

    match err {
        PipelineError::Merge { output, .. } => {
            assert_eq!(output, workspace.output_root.join("lux/lux.osm.pbf"));
        }
        other => panic!("expected Merge, found {other:?}"),
    }
    assert!(!orchestrator.output_path().exists());
}

#[rstest]
fn every_zone_is_converted_once(workspace: Workspace) {
    workspace.add_zone("lux", "lux_c");
    let converter = StubConversion::default();
    let calls = converter.call_log();
    let orchestrator = PipelineOrchestrator::new(workspace.config(&["lux"]), converter);

    orchestrator.run().expect("pipeline succeeds");

    let mut zones = calls.zones();
    zones.sort();
    assert_eq!(zones, vec!["lux_a", "lux_b", "lux_c"]);
}
