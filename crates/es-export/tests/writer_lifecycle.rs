//! File-level behaviour of a single `ValueCsvWriter`.

use std::fs;
use std::path::Path;

use es_core::{Attribute, EntityClass, LinkType, NodeAttribute, NodeType, resolve_requests};
use es_engine::scripted::ScriptedNetwork;
use es_engine::{HydraulicEngine, InitFlag};
use es_export::{ExportError, ValueCsvWriter};

fn network() -> ScriptedNetwork {
    ScriptedNetwork::new(
        &[NodeType::Reservoir, NodeType::Junction, NodeType::Junction],
        &[LinkType::Pipe, LinkType::Pump],
    )
    .duration(4 * 3600)
}

fn writer(dir: &Path, class: EntityClass, name: &str, net: &ScriptedNetwork) -> ValueCsvWriter {
    let request = resolve_requests(class, &[name], dir).unwrap().remove(0);
    ValueCsvWriter::new(request, net).unwrap()
}

/// Run `steps` hydraulic steps, writing a row after each.
fn run_steps(net: &mut ScriptedNetwork, w: &mut ValueCsvWriter, steps: usize) {
    net.open_hydraulics().unwrap();
    net.init_hydraulics(InitFlag::NoSave).unwrap();
    for _ in 0..steps {
        let t = net.run_hydraulics().unwrap();
        w.write_step(&*net, t).unwrap();
        net.next_hydraulics().unwrap();
    }
    net.close_hydraulics().unwrap();
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn header_then_one_row_per_step() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = network();
    for steps in [0usize, 1, 3] {
        let mut w = writer(dir.path(), EntityClass::Node, "pressure", &net);
        assert_eq!(w.attribute(), Attribute::Node(NodeAttribute::Pressure));
        assert_eq!(w.entity_count(), 3);
        w.open(&net).unwrap();
        run_steps(&mut net, &mut w, steps);
        w.close().unwrap();

        let got = lines(&dir.path().join("pressure.csv"));
        assert_eq!(got.len(), 1 + steps, "steps={steps}");
        assert_eq!(got[0], "time;reservoir1;junction2;junction3");
        assert_eq!(w.rows_written(), steps);
    }
}

#[test]
fn rows_carry_time_and_values_in_index_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = network();
    let mut w = writer(dir.path(), EntityClass::Link, "FLOW", &net);
    w.open(&net).unwrap();
    run_steps(&mut net, &mut w, 2);
    w.close().unwrap();

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(dir.path().join("flow.csv"))
        .unwrap();
    let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
    assert_eq!(headers, ["time", "pipe1", "pump2"]);

    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "0");
    assert_eq!(&rows[1][0], "3600");
    // flow is link property 8
    assert_eq!(rows[1][1].parse::<f64>().unwrap(), 108.25);
    assert_eq!(rows[1][2].parse::<f64>().unwrap(), 208.25);
    for row in &rows {
        assert_eq!(row.len(), headers.len());
    }
}

#[test]
fn values_round_trip_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = network();
    let mut w = writer(dir.path(), EntityClass::Node, "head", &net);
    w.open(&net).unwrap();
    run_steps(&mut net, &mut w, 4);
    w.close().unwrap();

    let one = es_core::EntityIndex::new(1).unwrap();
    let got = lines(&dir.path().join("head.csv"));
    let last: Vec<&str> = got[4].split(';').collect();
    assert_eq!(last[0], "10800");
    let expected = ScriptedNetwork::value_at(one, 10, 10800);
    assert_eq!(last[1].parse::<f64>().unwrap(), expected);
}

#[test]
fn close_is_idempotent_and_keeps_content() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = network();
    let mut w = writer(dir.path(), EntityClass::Node, "demand", &net);
    w.open(&net).unwrap();
    run_steps(&mut net, &mut w, 2);

    w.close().unwrap();
    let once = fs::read_to_string(dir.path().join("demand.csv")).unwrap();
    w.close().unwrap();
    let twice = fs::read_to_string(dir.path().join("demand.csv")).unwrap();

    assert_eq!(once, twice);
    assert_eq!(once.lines().count(), 3);
    assert!(!w.is_open());
}

#[test]
fn existing_file_is_truncated_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("head.csv");
    fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();

    let net = network();
    let mut w = writer(dir.path(), EntityClass::Node, "head", &net);
    w.open(&net).unwrap();
    w.close().unwrap();

    assert_eq!(lines(&path), vec!["time;reservoir1;junction2;junction3"]);
}

#[test]
fn drop_flushes_written_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = network();
    {
        let mut w = writer(dir.path(), EntityClass::Node, "head", &net);
        w.open(&net).unwrap();
        run_steps(&mut net, &mut w, 2);
    }
    assert_eq!(lines(&dir.path().join("head.csv")).len(), 3);
}

#[test]
fn failed_query_leaves_no_partial_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut net = network().fail_queries_at(3600);
    let mut w = writer(dir.path(), EntityClass::Node, "head", &net);
    w.open(&net).unwrap();

    net.open_hydraulics().unwrap();
    net.init_hydraulics(InitFlag::NoSave).unwrap();
    let t = net.run_hydraulics().unwrap();
    w.write_step(&net, t).unwrap();
    net.next_hydraulics().unwrap();
    let t = net.run_hydraulics().unwrap();
    let err = w.write_step(&net, t).unwrap_err();
    assert!(matches!(err, ExportError::Engine(_)));
    w.close().unwrap();

    assert_eq!(lines(&dir.path().join("head.csv")).len(), 2);
    assert_eq!(w.rows_written(), 1);
}

#[test]
fn missing_directory_is_a_resource_error() {
    let dir = tempfile::tempdir().unwrap();
    let net = network();
    let mut w = writer(&dir.path().join("missing"), EntityClass::Node, "head", &net);
    let err = w.open(&net).unwrap_err();
    assert!(matches!(err, ExportError::Csv { .. }), "got {err}");
    assert!(!w.is_open());
}
