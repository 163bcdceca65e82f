use criterion::*;
use graph_fixture::prelude::*;
use graph_fixture::topology::SkipSampler;
use rand::prelude::*;

struct Input {
    name: &'static str,
    node_count: usize,
}

const SMALL: Input = Input {
    name: "small",
    node_count: 1_000,
};

const MEDIUM: Input = Input {
    name: "medium",
    node_count: 10_000,
};

const LARGE: Input = Input {
    name: "large",
    node_count: 100_000,
};

fn topologies(c: &mut Criterion) {
    let mut group = c.benchmark_group("topology_fill");
    group.sampling_mode(SamplingMode::Flat);

    for input in [SMALL, MEDIUM, LARGE] {
        let probability = 10.0 / input.node_count as f64;
        for topology in [
            Topology::Random { probability },
            Topology::Ring { neighbors: 6 },
            Topology::Path,
            Topology::Star,
        ] {
            group.bench_function(format!("{}_{topology:?}", input.name), |b| {
                bench_fill(b, topology, input.node_count)
            });
        }
    }

    group.finish();
}

fn bench_fill(b: &mut Bencher, topology: Topology, node_count: usize) {
    b.iter_batched(
        || Graph::with_nodes(false, true, (0..node_count).map(|i| i.to_string())),
        |mut graph| {
            let mut rng = StdRng::seed_from_u64(42);
            topology
                .fill(
                    &mut graph,
                    WeightRange::default(),
                    &mut rng,
                    &mut Progress::silent(),
                )
                .unwrap();
            black_box(graph)
        },
        BatchSize::LargeInput,
    )
}

fn skip_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("skip_sampling");
    group.sampling_mode(SamplingMode::Flat);

    for input in [SMALL, MEDIUM, LARGE] {
        let probability = 10.0 / input.node_count as f64;
        group.bench_function(input.name, |b| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                let mut sampler = SkipSampler::new(input.node_count, probability, true);
                let mut count = 0;
                while let Some(pair) = sampler.sample(&mut rng) {
                    black_box(pair);
                    count += 1;
                }
                count
            })
        });
    }

    group.finish();
}

criterion_group!(benches, topologies, skip_sampling);
criterion_main!(benches);
