//! Benchmarks for the document driver
//!
//! Run with: cargo bench -p rstdoc-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rstdoc_core::{LineCursor, Parser, ParserConfig};

/// Representative document touching every production rule.
const RST_SAMPLE: &str = r#"==================
Benchmark Document
==================

Introduction
============

This is a paragraph with *emphasis*, **strong text**, and ``inline code``.
It demonstrates the basic capabilities of the format.

.. _docs: https://example.org/docs

Lists
-----

- First item with some content
- Second item with more content

  continued in a second paragraph
- Third item concluding the list

1. Step one of the process
2. Step two continues
3. Step three completes

term
    Definition of the term.

other : classifier
    Another definition.

Code Example
------------

.. code-block:: rust
   :linenos:

   fn fibonacci(n: u64) -> u64 {
       match n {
           0 => 0,
           1 => 1,
           _ => fibonacci(n - 1) + fibonacci(n - 2),
       }
   }

A literal block follows::

    $ rstcli parse README.rst

.. note:: Performance

   Parsing is a single pass over the lines.

.. |project| replace:: rstdoc

Tables
------

+---------+---------+--------+
| Name    | Speed   | Memory |
+=========+=========+========+
| Fast    | 100ms   | 10MB   |
+---------+---------+--------+
| Slow    | 1000ms  | 100MB  |
+---------+---------+--------+

=======  ======
Name     Speed
=======  ======
Fast     100ms
Slow     1000ms
=======  ======

Quote
-----

    The best code is no code at all.

    -- Someone wise

.. a comment that is dropped

----------

End of document.
"#;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(RST_SAMPLE.len() as u64));

    group.bench_function("fresh_parser", |b| {
        b.iter(|| {
            let mut parser = Parser::default();
            let doc = parser.parse(black_box(RST_SAMPLE)).unwrap();
            black_box(doc.len())
        })
    });

    group.bench_function("reused_parser", |b| {
        let mut parser = Parser::default();
        b.iter(|| {
            let doc = parser.parse(black_box(RST_SAMPLE)).unwrap();
            black_box(doc.len())
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for size in [1, 5, 10, 20].iter() {
        let content = vec![RST_SAMPLE; *size].join("\n");
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_with_input(BenchmarkId::new("rst", size), &content, |b, content| {
            b.iter(|| {
                let mut parser = Parser::default();
                let doc = parser.parse(black_box(content)).unwrap();
                black_box(doc.len())
            })
        });
    }

    group.finish();
}

fn bench_cursor_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");
    let config = ParserConfig::default();
    let content = vec![RST_SAMPLE; 20].join("\n");
    group.throughput(Throughput::Bytes(content.len() as u64));

    group.bench_function("load", |b| {
        let mut cursor = LineCursor::new();
        b.iter(|| {
            cursor.load(&config, black_box(&content));
            black_box(cursor.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_scaling, bench_cursor_load);
criterion_main!(benches);
