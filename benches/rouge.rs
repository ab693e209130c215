use criterion::{black_box, criterion_group, criterion_main, Criterion};
use refmetrics::rouge::{RougeScorer, RougeType};

const GENERATED: &str = "The committee approved the new budget on Tuesday.\n\
    Spending on public transport will rise by ten percent.\n\
    Critics argued that the plan ignores rural communities.";

const REFERENCE: &str = "On Tuesday the committee passed the budget.\n\
    Public transport spending increases by 10 percent.\n\
    Opponents said rural areas were left out of the plan.";

fn bench_rouge(c: &mut Criterion) {
    for rouge_type in [
        RougeType::Rouge1,
        RougeType::Rouge2,
        RougeType::RougeL,
        RougeType::RougeLsum,
    ] {
        let scorer = RougeScorer::new(rouge_type, true);
        c.bench_function(rouge_type.as_str(), |b| {
            b.iter(|| scorer.score(black_box(REFERENCE), black_box(GENERATED)))
        });
    }
}

criterion_group!(benches, bench_rouge);
criterion_main!(benches);
