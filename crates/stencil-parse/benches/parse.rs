use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use stencil_syntax::SyntaxNode;

const PAGE: &str = r#"
<ul class="users">
    @foreach (var user in Model.Users) {
        var name = user.Name; // display name
    }
    <li title="@user.Title">@user.Name (@(user.Age + 1))</li>
    <br/>
    @* hidden *@
</ul>
"#;

fn benchmark_parser(c: &mut Criterion) {
    let inputs = [("Simple", "<div>Hi</div>".to_owned()), ("Page", PAGE.repeat(50))];

    let mut group = c.benchmark_group("Parser Benchmark");
    for (name, text) in &inputs {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", name), text, |b, text| {
            b.iter(|| black_box(stencil_parse::parse(text)));
        });
    }
    group.finish();

    let text = PAGE.repeat(50);
    let root = SyntaxNode::new_root(stencil_parse::parse(&text));
    let mut group = c.benchmark_group("Find Token Benchmark");
    group.bench_function("find_token", |b| {
        b.iter(|| {
            for offset in (0..text.len() as u32).step_by(97) {
                black_box(root.find_token(offset.into(), false).ok());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
