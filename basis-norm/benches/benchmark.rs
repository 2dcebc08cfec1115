use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use basis_norm::ShellSetBuilder;
use basis_parse::{parse_str, write_string, POLARIZATION_2DF_2PD};

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("parse_2df_2pd", |b| b.iter(|| parse_str(black_box(POLARIZATION_2DF_2PD))));
    let basis = parse_str(POLARIZATION_2DF_2PD).unwrap();
    c.bench_function("write_2df_2pd", |b| b.iter(|| write_string(black_box(&basis))));

    let mut group = c.benchmark_group("build");
    for elements in ["Li", "Li Be B C", "Li Be B C N O F Ne"] {
        let mut set = ShellSetBuilder::new();
        let _ = set.set_basis("6-311G(2df,2pd)");
        let _ = set.set_elements_str(elements);
        let nao = set.build().unwrap().get_nao();
        group.bench_function(BenchmarkId::from_parameter(nao), |b| b.iter(|| set.build()));
    }
    group.finish();
}
criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
