//! # remeval 性能基准测试
//!
//! 使用 Criterion.rs 进行性能基准测试。
//!
//! ## 基准测试分组
//! - `frontend`: 词法与语法分析
//! - `interpreter`: 解释器执行
//! - `repl_loop`: 完整的读取-求值-输出循环
//!
//! ## 使用方法
//! ```bash
//! cargo bench              # 运行所有
//! cargo bench interpreter  # 只运行解释器测试
//! ```

use criterion::{criterion_group, criterion_main, Criterion};
use remeval::util::config::ReplConfig;
use std::hint::black_box;

const FIBONACCI: &str = "function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2) } fib(15)";

const LIST_OPS: &str = "\
let xs = []; let i = 0;
while (i < 500) { xs.push(i); i++ }
xs.map(x => x * 2).filter(x => x % 3 === 0).reduce((a, b) => a + b, 0)";

const STRING_CONCAT: &str = "\
let s = ''; for (let i = 0; i < 300; i++) { s += String(i) + ',' } s.length";

// ============================================================================
// Frontend
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_list_ops", |b| {
        b.iter(|| remeval::frontend::parse_source(black_box(LIST_OPS)).expect("parse failed"))
    });
}

// ============================================================================
// Interpreter
// ============================================================================

fn bench_fibonacci(c: &mut Criterion) {
    c.bench_function("fibonacci_recursive_15", |b| {
        b.iter(|| remeval::run(black_box(FIBONACCI)).expect("evaluation failed"))
    });
}

fn bench_list_ops(c: &mut Criterion) {
    c.bench_function("list_operations", |b| {
        b.iter(|| remeval::run(black_box(LIST_OPS)).expect("evaluation failed"))
    });
}

fn bench_string_concat(c: &mut Criterion) {
    c.bench_function("string_concat", |b| {
        b.iter(|| remeval::run(black_box(STRING_CONCAT)).expect("evaluation failed"))
    });
}

// ============================================================================
// Loop
// ============================================================================

fn bench_loop_session(c: &mut Criterion) {
    let input = "x = 5\nx + 1\n{a: [1, 2, 3]}\nenv\nmissing\n".repeat(20);
    let config = ReplConfig::default();
    c.bench_function("loop_session_100_lines", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(4096);
            remeval::run_loop(&config, black_box(input.as_bytes()), &mut out).expect("loop failed");
            out
        })
    });
}

// ============================================================================
// Criterion Groups
// ============================================================================

criterion_group!(
    name = frontend;
    config = Criterion::default().sample_size(50);
    targets = bench_parse
);

criterion_group!(
    name = interpreter;
    config = Criterion::default().sample_size(20);
    targets = bench_fibonacci, bench_list_ops, bench_string_concat
);

criterion_group!(
    name = repl_loop;
    config = Criterion::default().sample_size(20);
    targets = bench_loop_session
);

criterion_main!(frontend, interpreter, repl_loop);
