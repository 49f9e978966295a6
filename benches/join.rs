use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use omicsjoin::harmonize::unionize;
use omicsjoin::identifier::RuleSet;
use omicsjoin::join::{
    join_mutations_to_omics, join_omics_to_omics, MutationJoinOptions, GENE_COLUMN,
    LOCATION_COLUMN, MUTATION_COLUMN,
};
use omicsjoin::table::{Cell, ColumnKey, ColumnSelection, DataType, Table};

/// Sample-major omics table with every other sample duplicated as a normal
fn omics_table(data_type: DataType, num_samples: usize, num_genes: usize) -> Table {
    let index: Vec<String> = (0..num_samples)
        .map(|i| {
            if i % 2 == 0 {
                format!("C3L-{:05}", i)
            } else {
                format!("C3L-{:05}.N", i - 1)
            }
        })
        .collect();
    let columns = (0..num_genes)
        .map(|g| ColumnKey::gene(format!("GENE{}", g), format!("ENSG{:011}", g)))
        .collect();
    let rows = (0..num_samples)
        .map(|s| (0..num_genes).map(|g| Cell::Number((s * g) as f64 * 0.01)).collect())
        .collect();
    Table::for_type(data_type, index, columns, rows).unwrap()
}

fn mutation_table(num_samples: usize, calls_per_sample: usize) -> Table {
    const CLASSES: [&str; 4] = ["Missense_Mutation", "Silent", "Nonsense_Mutation", "Frame_Shift_Del"];
    let mut index = Vec::new();
    let mut rows = Vec::new();
    for s in (0..num_samples).step_by(2) {
        for c in 0..calls_per_sample {
            index.push(format!("C3L-{:05}", s));
            rows.push(vec![
                Cell::from(format!("GENE{}", c % 10)),
                Cell::from(CLASSES[(s + c) % CLASSES.len()]),
                Cell::from(format!("p.X{}Y", c)),
            ]);
        }
    }
    let columns = vec![
        ColumnKey::flat(GENE_COLUMN),
        ColumnKey::flat(MUTATION_COLUMN),
        ColumnKey::flat(LOCATION_COLUMN),
    ];
    Table::for_type(DataType::SomaticMutation, index, columns, rows).unwrap()
}

/// Benchmark identifier normalization with a typical two-rule set
fn bench_normalize(c: &mut Criterion) {
    let rules = RuleSet::from_pairs("bench", &[("_T$", ""), ("_A$", ".N")]).unwrap();
    let raw: Vec<String> = (0..1000)
        .map(|i| format!("C3L-{:05}_{}", i, if i % 3 == 0 { "A" } else { "T" }))
        .collect();

    let mut group = c.benchmark_group("normalize");
    group.throughput(Throughput::Elements(raw.len() as u64));
    group.bench_function("1000_ids", |b| {
        b.iter(|| rules.normalize_all(raw.iter().map(String::as_str)).unwrap())
    });
    group.finish();
}

/// Benchmark master index construction over growing tables
fn bench_unionize(c: &mut Criterion) {
    let mut group = c.benchmark_group("unionize");

    for num_samples in [100, 500, 2000] {
        let tables = vec![
            omics_table(DataType::Proteomics, num_samples, 10),
            omics_table(DataType::Transcriptomics, num_samples, 10),
        ];
        group.throughput(Throughput::Elements(num_samples as u64));
        group.bench_with_input(BenchmarkId::from_parameter(num_samples), &tables, |b, tables| {
            b.iter(|| unionize(black_box(tables.iter()), &[]))
        });
    }

    group.finish();
}

/// Benchmark the omics and mutation joins
fn bench_joins(c: &mut Criterion) {
    let mut group = c.benchmark_group("join");

    for num_genes in [100, 1000] {
        let prot = omics_table(DataType::Proteomics, 200, num_genes);
        let rna = omics_table(DataType::Transcriptomics, 200, num_genes);
        group.bench_with_input(BenchmarkId::new("omics_to_omics", num_genes), &num_genes, |b, _| {
            b.iter(|| {
                join_omics_to_omics(&prot, &rna, &ColumnSelection::All, &ColumnSelection::All).unwrap()
            })
        });
    }

    let prot = omics_table(DataType::Proteomics, 200, 50);
    let mutations = mutation_table(200, 20);
    let genes: Vec<String> = (0..10).map(|g| format!("GENE{}", g)).collect();
    for multiple_mutations in [false, true] {
        let options = MutationJoinOptions {
            multiple_mutations,
            ..Default::default()
        };
        let label = if multiple_mutations { "multiple" } else { "single" };
        group.bench_function(BenchmarkId::new("mutations_to_omics", label), |b| {
            b.iter(|| {
                join_mutations_to_omics(&mutations, &prot, &genes, &ColumnSelection::All, &options).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_unionize, bench_joins);
criterion_main!(benches);
