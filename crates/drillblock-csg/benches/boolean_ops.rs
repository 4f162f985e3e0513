use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drillblock_csg::{centered_cube, centered_cylinder, Solid};

fn drill_tools(segments: u32) -> Vec<Solid> {
    let mut tools = vec![centered_cylinder(4.0, 70.0, segments).rotate(-90.0, 0.0, 0.0)];
    for y in [-20.0, 0.0, 20.0] {
        tools.push(
            centered_cylinder(4.0, 30.0, segments)
                .rotate(0.0, 90.0, 0.0)
                .translate(0.0, y, 0.0),
        );
        tools.push(centered_cylinder(4.0, 30.0, segments).translate(0.0, y, 0.0));
    }
    tools
}

fn bench_difference(c: &mut Criterion) {
    let cube = centered_cube(20.0, 20.0, 20.0);
    let cylinder = centered_cylinder(4.0, 30.0, 32);
    c.bench_function("cube_minus_cylinder", |b| {
        b.iter(|| black_box(&cube).difference(black_box(&cylinder)))
    });
}

fn bench_drilled_block(c: &mut Criterion) {
    let block = centered_cube(20.0, 60.0, 20.0);
    let mut group = c.benchmark_group("drilled_block");
    group.sample_size(10);
    for segments in [8, 16, 32] {
        let tools = drill_tools(segments);
        group.bench_function(format!("sequential_{segments}"), |b| {
            b.iter(|| {
                tools
                    .iter()
                    .fold(block.clone(), |solid, tool| solid.difference(black_box(tool)))
            })
        });
        group.bench_function(format!("single_pass_{segments}"), |b| {
            b.iter(|| black_box(&block).difference_all(black_box(&tools)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_difference, bench_drilled_block);
criterion_main!(benches);
