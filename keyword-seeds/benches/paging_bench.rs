//! Benchmarks for the paging loop.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use keyword_seeds::prelude::*;
use keyword_seeds::testing::{fast_rate_limiter, paged_ideas, ScriptedIdeaService};

fn paging_benchmark(c: &mut Criterion) {
    let pages = paged_ideas(1_000, "bench");

    c.bench_function("fetch_1000_ideas", |b| {
        b.iter(|| {
            let service = Arc::new(ScriptedIdeaService::with_pages(pages.clone()));
            let fetcher = PagedKeywordFetcher::new(
                TargetingIdeaSelector::keyword_ideas,
                ClientCustomerId::new(1),
                service,
                fast_rate_limiter(),
            )
            .with_observer(Arc::new(NoOpPageObserver));

            let estimates = futures::executor::block_on(fetcher.fetch_keywords_and_estimates());
            black_box(estimates)
        })
    });
}

criterion_group!(benches, paging_benchmark);
criterion_main!(benches);
