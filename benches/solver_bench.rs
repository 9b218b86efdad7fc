//! Benchmarks for the frame solver across model sizes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frame_analysis::prelude::*;

fn create_cantilever_model() -> Model {
    let mut model = Model::new();

    model.add_material("Steel", Material::steel());
    model.add_section("Section", Section::rectangular(0.3, 0.5));

    model.add_node("N1", Node::new(0.0, 0.0, 0.0));
    model.add_node("N2", Node::new(10.0, 0.0, 0.0));

    model.add_member("M1", Member::new("N1", "N2", "Steel", "Section"));
    model.add_support("N1", Support::fixed());
    model.add_node_load("N2", NodeLoad::fy(-10000.0, "Case 1"));

    model
}

fn create_multi_story_frame(stories: usize, bays: usize) -> Model {
    let mut model = Model::new();

    model.add_material("Steel", Material::steel());
    model.add_section("Column", Section::rectangular(0.4, 0.4));
    model.add_section("Beam", Section::rectangular(0.3, 0.6));

    let story_height = 3.5;
    let bay_width = 6.0;

    for story in 0..=stories {
        for bay in 0..=bays {
            let name = format!("N{}_{}", story, bay);
            let x = bay as f64 * bay_width;
            let y = story as f64 * story_height;
            model.add_node(&name, Node::new(x, y, 0.0));
        }
    }

    for story in 0..stories {
        for bay in 0..=bays {
            let name = format!("Col{}_{}", story, bay);
            let i_node = format!("N{}_{}", story, bay);
            let j_node = format!("N{}_{}", story + 1, bay);
            model.add_member(&name, Member::new(&i_node, &j_node, "Steel", "Column"));
        }
    }

    for story in 1..=stories {
        for bay in 0..bays {
            let name = format!("Beam{}_{}", story, bay);
            let i_node = format!("N{}_{}", story, bay);
            let j_node = format!("N{}_{}", story, bay + 1);
            model.add_member(&name, Member::new(&i_node, &j_node, "Steel", "Beam"));
        }
    }

    for bay in 0..=bays {
        let name = format!("N0_{}", bay);
        model.add_support(&name, Support::fixed());
    }

    for story in 1..=stories {
        for bay in 0..=bays {
            let name = format!("N{}_{}", story, bay);
            model.add_node_load(&name, NodeLoad::fy(-50000.0, "Dead"));
        }
    }

    model
}

fn benchmark_cantilever(c: &mut Criterion) {
    let model = create_cantilever_model();
    let config = Config::default();
    c.bench_function("cantilever_linear", |b| {
        b.iter(|| black_box(solve(&model, "Case 1", &config).unwrap()))
    });
}

fn benchmark_small_frame(c: &mut Criterion) {
    let model = create_multi_story_frame(3, 2);
    let config = Config::default();
    c.bench_function("frame_3story_2bay_linear", |b| {
        b.iter(|| black_box(solve(&model, "Dead", &config).unwrap()))
    });
}

fn benchmark_medium_frame(c: &mut Criterion) {
    let model = create_multi_story_frame(10, 5);
    let config = Config::default();
    c.bench_function("frame_10story_5bay_linear", |b| {
        b.iter(|| black_box(solve(&model, "Dead", &config).unwrap()))
    });
}

fn benchmark_condensation(c: &mut Criterion) {
    let full = create_multi_story_frame(5, 3);
    let config = Config::default();
    let boundary: Vec<String> = (0..=3).map(|bay| format!("N0_{bay}")).collect();
    c.bench_function("frame_5story_3bay_condensation", |b| {
        b.iter(|| black_box(SuperElement::reduce("SE", &full, &boundary, &config).unwrap()))
    });
}

criterion_group!(
    benches,
    benchmark_cantilever,
    benchmark_small_frame,
    benchmark_medium_frame,
    benchmark_condensation,
);

criterion_main!(benches);
