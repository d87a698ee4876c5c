use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use lendstore_catalog::{Catalog, Item};

fn seeded_catalog(size: usize) -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .add_batch((0..size).map(|n| {
            Item::new(format!("key-{n}"), format!("Title {n}"), "Author", "Genre", 2000)
        }))
        .unwrap();
    catalog
}

/// Borrow + return of the last-inserted title (worst case for first-match title lookup).
fn bench_borrow_return(c: &mut Criterion) {
    let mut group = c.benchmark_group("borrow_return");

    for size in [100usize, 1_000, 10_000] {
        let mut catalog = seeded_catalog(size);
        let title = format!("Title {}", size - 1);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                catalog.borrow(black_box(&title), "Alice").unwrap();
                catalog.return_item(black_box(&title), "Alice").unwrap();
            })
        });
    }

    group.finish();
}

/// Key lookup (indexed) vs title lookup (linear scan).
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let size = 10_000;
    let catalog = seeded_catalog(size);
    let key = format!("key-{}", size - 1);
    let title = format!("Title {}", size - 1);

    group.bench_function("by_key", |b| {
        b.iter(|| catalog.find_by_key(black_box(&key)).unwrap().published_year())
    });
    group.bench_function("by_title", |b| {
        b.iter(|| catalog.find_by_title(black_box(&title)).unwrap().published_year())
    });

    group.finish();
}

criterion_group!(benches, bench_borrow_return, bench_lookup);
criterion_main!(benches);
