use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use graph_fixture::prelude::*;
use tempfile::TempDir;

/// Reads a plain adjacency list into sorted neighbor sets.
fn parse_lad(content: &str) -> Vec<BTreeSet<usize>> {
    let mut lines = content.lines();
    let node_count: usize = lines.next().unwrap().trim().parse().unwrap();

    let adjacency = lines
        .map(|line| {
            let mut values = line.split_whitespace().map(|v| v.parse::<usize>().unwrap());
            let degree = values.next().unwrap();
            let neighbors = values.collect::<BTreeSet<_>>();
            assert_eq!(neighbors.len(), degree);
            neighbors
        })
        .collect::<Vec<_>>();

    assert_eq!(adjacency.len(), node_count);
    adjacency
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn shortest_path_fixture() {
    let out_dir = TempDir::new().unwrap();

    let fixture = FixtureRequest::new(Family::ShortestPath, 5)
        .density(1.0)
        .seed(42)
        .generate()
        .unwrap();
    let files = fixture.write_to(out_dir.path()).unwrap();

    assert_eq!(files, vec![out_dir.path().join("dijkstra_generated.csv")]);

    let csv = read(&files[0]);
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("# start=v0 target=v4"));
    assert_eq!(lines.next(), Some("source,target,weight"));

    let edges = lines
        .map(|line| {
            let row = line.split(',').collect::<Vec<_>>();
            let weight = row[2].parse::<u32>().unwrap();
            (row[0].to_string(), row[1].to_string(), weight)
        })
        .collect::<Vec<_>>();

    for i in 0..4 {
        let (source, target) = (format!("v{i}"), format!("v{}", i + 1));
        let backbone = edges
            .iter()
            .find(|(s, t, _)| *s == source && *t == target)
            .expect("backbone edge");
        assert!((1..=20).contains(&backbone.2));
    }

    assert!(edges.iter().all(|(s, t, _)| s != t));
    assert!(edges.len() >= 4 && edges.len() <= 20);

    let metadata: Metadata = serde_json::from_str(&read(out_dir.path().join("metadata.json"))).unwrap();
    assert_eq!(metadata.algorithm, "shortest-path");
    assert_eq!(metadata.k, None);
    assert_eq!(metadata.seed, 42);
    assert_eq!(metadata.pattern_nodes, None);
}

#[test]
fn labelled_adjacency_fixture() {
    let out_dir = TempDir::new().unwrap();

    let fixture = FixtureRequest::new(Family::LabelledAdjacency, 10)
        .pattern_size(3)
        .seed(7)
        .generate()
        .unwrap();
    let files = fixture.write_to(out_dir.path()).unwrap();

    assert_eq!(
        files,
        vec![
            out_dir.path().join("glasgow_pattern.lad"),
            out_dir.path().join("glasgow_target.lad"),
        ]
    );

    let metadata: Metadata = serde_json::from_str(&read(out_dir.path().join("metadata.json"))).unwrap();
    assert_eq!(metadata.algorithm, "labelled-adjacency");
    assert_eq!(metadata.k, Some(3));
    assert_eq!(metadata.files.len(), 2);

    let pattern_nodes = metadata.pattern_nodes.unwrap();
    assert_eq!(pattern_nodes.len(), 3);

    let pattern = parse_lad(&read(&files[0]));
    let target = parse_lad(&read(&files[1]));
    assert_eq!(pattern.len(), 3);
    assert_eq!(target.len(), 10);
    assert!(pattern.iter().map(BTreeSet::len).sum::<usize>() >= 2);

    // Restricting the target to the pattern nodes reproduces the pattern.
    let induced = pattern_nodes
        .iter()
        .map(|&node| {
            target[node]
                .iter()
                .filter_map(|neighbor| pattern_nodes.iter().position(|n| n == neighbor))
                .collect::<BTreeSet<_>>()
        })
        .collect::<Vec<_>>();
    assert_eq!(induced, pattern);
}

#[test]
fn combined_fixture_writes_both_formats() {
    let out_dir = TempDir::new().unwrap();

    let fixture = FixtureRequest::new(Family::Combined, 20)
        .pattern_size(5)
        .density(0.1)
        .seed(11)
        .generate()
        .unwrap();
    let files = fixture.write_to(out_dir.path()).unwrap();

    let names = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "glasgow_pattern.lad",
            "glasgow_target.lad",
            "vf3_pattern.vf",
            "vf3_target.vf"
        ]
    );

    let target = read(&files[1]);
    let mut lines = target.lines().skip(1);
    assert!(lines.next().unwrap().starts_with("0 "));
    assert!(lines.next().unwrap().starts_with("1 "));

    let vf = read(&files[3]);
    let mut lines = vf.lines();
    assert_eq!(lines.next(), Some("20"));
    assert_eq!(lines.nth(6), Some("6 2"));
}

#[test]
fn same_seed_gives_identical_files() {
    let requests = [
        FixtureRequest::new(Family::Combined, 50)
            .pattern_size(6)
            .density(0.08),
        FixtureRequest::new(Family::ShortestPath, 40).density(0.1),
    ];

    for request in requests {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();

        let files = request
            .clone()
            .seed(1234)
            .generate()
            .unwrap()
            .write_to(first.path())
            .unwrap();
        request
            .seed(1234)
            .generate()
            .unwrap()
            .write_to(second.path())
            .unwrap();

        let names = files
            .iter()
            .map(|file| file.file_name().unwrap().to_owned())
            .chain([std::ffi::OsString::from("metadata.json")]);
        for name in names {
            assert_eq!(
                fs::read(first.path().join(&name)).unwrap(),
                fs::read(second.path().join(&name)).unwrap(),
                "{name:?} differs"
            );
        }
    }
}

#[test]
fn generated_target_is_connected() {
    for seed in 0..10 {
        let fixture = FixtureRequest::new(Family::LabelledEdgeBlock, 40)
            .pattern_size(4)
            .density(0.01)
            .seed(seed)
            .generate()
            .unwrap();

        let target = fixture.target();
        let mut dss = DisjointSetStruct::new(target.node_count());
        for edge in target.edges() {
            assert_ne!(edge.source, edge.target);
            dss.union(edge.source, edge.target);
        }
        assert_eq!(dss.components().len(), 1);
        assert!(target.edge_count() >= 39 && target.edge_count() <= 40 * 39 / 2);
    }
}

#[test]
fn invalid_request_writes_nothing() {
    let root = TempDir::new().unwrap();
    let out_dir = root.path().join("fixtures");

    let result = FixtureRequest::new(Family::LabelledEdgeBlock, 10)
        .density(0.5)
        .generate()
        .and_then(|fixture| fixture.write_to(&out_dir));

    assert!(matches!(result, Err(Error::MissingPatternSize { .. })));
    assert!(!out_dir.exists());
}

#[test]
fn plain_adjacency_round_trip() {
    let mut graph = Graph::with_nodes(false, false, ["A", "B", "C", "D"]);
    graph.add_edge(0, 1, 1);
    graph.add_edge(1, 2, 1);
    graph.add_edge(2, 3, 1);

    let mut output = Vec::new();
    Lad::plain().write_graph(&graph, &mut output).unwrap();
    let adjacency = parse_lad(&String::from_utf8(output).unwrap());

    let expected = [vec![1], vec![0, 2], vec![1, 3], vec![2]]
        .into_iter()
        .map(|neighbors| neighbors.into_iter().collect::<BTreeSet<_>>())
        .collect::<Vec<_>>();
    assert_eq!(adjacency, expected);

    let mut round_trip = Graph::with_nodes(false, false, ["A", "B", "C", "D"]);
    for (source, neighbors) in adjacency.iter().enumerate() {
        for &target in neighbors {
            round_trip.add_edge(source, target, 1);
        }
    }
    assert_eq!(round_trip.edge_count(), graph.edge_count());
    assert_eq!(round_trip.undirected_closure(), graph.undirected_closure());
}
