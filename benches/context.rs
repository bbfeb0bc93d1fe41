use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nexus::cache::CachedIndexer;
use nexus::compiler;
use nexus::filter;
use nexus::indexer::{CodeIndex, SourceIndexer};
use nexus::rules::{InMemoryRuleProvider, RuleProvider};
use std::fmt::Write;
use std::time::Duration;

fn setup_repo(files: usize, methods: usize) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in 0..files {
        let mut source = format!("public class Bench{file}Service\n{{\n");
        for method in 0..methods {
            let _ = writeln!(source, "    public void Op{method}() {{ }}");
        }
        source.push_str("}\n");
        std::fs::write(dir.path().join(format!("Bench{file}Service.cs")), source).unwrap();
    }
    dir
}

fn bench_index(c: &mut Criterion) {
    let repo = setup_repo(50, 20);
    let indexer = SourceIndexer::default();
    c.bench_function("index_50_files", |b| {
        b.iter(|| black_box(indexer.index(repo.path())))
    });

    let cache = CachedIndexer::new(SourceIndexer::default(), Duration::from_secs(300));
    cache.index(repo.path());
    c.bench_function("index_50_files_cached", |b| {
        b.iter(|| black_box(cache.index(repo.path())))
    });
}

fn bench_select_and_compile(c: &mut Criterion) {
    let repo = setup_repo(50, 20);
    let nodes = SourceIndexer::default().index(repo.path());
    let rules = InMemoryRuleProvider::new();
    let targets = vec!["Bench7".to_string(), "Op3".to_string(), "FN:42".to_string()];

    c.bench_function("filter_1000_nodes", |b| {
        b.iter(|| black_box(filter::filter_nodes(&nodes, &targets)))
    });
    c.bench_function("compile_1000_nodes", |b| {
        b.iter(|| black_box(compiler::compile(rules.get_all(), &nodes, &[])))
    });
}

criterion_group!(benches, bench_index, bench_select_and_compile);
criterion_main!(benches);
