use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lexirank::graph::diffusion::{build_personalization, personalized_pagerank};
use lexirank::graph::LexicalGraph;
use lexirank::SeedWeights;

/// Ring lattice with chords, written to a temp file the way production
/// graphs arrive.
fn build_graph(size: usize) -> LexicalGraph {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    let mut edges = Vec::with_capacity(size * 2);
    for i in 0..size {
        edges.push(format!(
            r#"{{"source": "word-en-n{}", "target": "word-en-n{}", "weight": 0.8}}"#,
            i,
            (i + 1) % size
        ));
        edges.push(format!(
            r#"{{"source": "word-en-n{}", "target": "word-en-n{}", "weight": 0.3}}"#,
            i,
            (i + 7) % size
        ));
    }
    std::fs::write(&path, format!(r#"{{"edges": [{}]}}"#, edges.join(","))).unwrap();
    LexicalGraph::load(&path, 0.0).unwrap()
}

fn bench_diffusion(c: &mut Criterion) {
    let graph = build_graph(2000);
    let seeds: SeedWeights = (0..20)
        .map(|i| (format!("word-en-n{}", i * 97), 1.0))
        .collect();
    let personalization = build_personalization(&graph, &seeds).unwrap();

    c.bench_function("ppr_2000_nodes_20_seeds", |b| {
        b.iter(|| {
            personalized_pagerank(
                black_box(&graph),
                black_box(&personalization),
                black_box(0.5),
            )
        })
    });
}

criterion_group!(benches, bench_diffusion);
criterion_main!(benches);
