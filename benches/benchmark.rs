use criterion::{Criterion, criterion_group, criterion_main};
use nexalign::nexus::{Document, WriteOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

/// (name, ntax, nchar) of the generated alignments
const REGRESSION_ALIGNMENTS: &[(&str, usize, usize)] = &[
    ("dna-n20-1k", 20, 1_000),
    ("dna-n100-5k", 100, 5_000),
];

const REPORTING_ALIGNMENTS: &[(&str, usize, usize)] = &[("dna-n500-20k", 500, 20_000)];

/// Random interleaved DNA alignment with a character set and a codon partition.
fn alignment(ntax: usize, nchar: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    let rows: Vec<String> = (0..ntax)
        .map(|_| (0..nchar).map(|_| ['A', 'C', 'G', 'T', '-', '?'][rng.gen_range(0..6)]).collect())
        .collect();

    let mut text = format!(
        "#NEXUS\nbegin data;\n\tdimensions ntax={ntax} nchar={nchar};\n\tformat datatype=dna interleave;\nmatrix\n"
    );
    for start in (0..nchar).step_by(80) {
        for (i, row) in rows.iter().enumerate() {
            text.push_str(&format!("taxon_{i} {}\n", &row[start..(start + 80).min(nchar)]));
        }
        text.push('\n');
    }
    text.push_str(";\nend;\nbegin sets;\n");
    text.push_str(&format!("\tcharset first_half = 1-{};\n", nchar / 2));
    text.push_str(&format!(
        "\tcodonposset codons = 1: 1-{nchar}\\3, 2: 2-{nchar}\\3, 3: 3-{nchar}\\3;\nend;\n"
    ));
    text
}

fn nexus_reading(c: &mut Criterion) {
    for (name, ntax, nchar) in REGRESSION_ALIGNMENTS {
        let text = alignment(*ntax, *nchar);
        c.bench_function(&format!("read {name}"), |b| {
            b.iter(|| black_box(text.parse::<Document>().unwrap()));
        });
    }
}

fn nexus_writing(c: &mut Criterion) {
    for (name, ntax, nchar) in REGRESSION_ALIGNMENTS {
        let doc: Document = alignment(*ntax, *nchar).parse().unwrap();
        let options = WriteOptions::default().with_interleave(true).with_exclude((0..*nchar).step_by(7).collect());
        c.bench_function(&format!("write {name}"), |b| {
            b.iter(|| black_box(doc.to_nexus_string(&options).unwrap()));
        });
    }
}

fn nexus_reporting(c: &mut Criterion) {
    for (name, ntax, nchar) in REPORTING_ALIGNMENTS {
        let text = alignment(*ntax, *nchar);
        c.bench_function(&format!("read+constant {name}"), |b| {
            b.iter(|| {
                let doc: Document = text.parse().unwrap();
                black_box(doc.constant(&[], &[]).unwrap())
            });
        });
    }
}

criterion_group!(regression, nexus_reading, nexus_writing);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = nexus_reporting
}
criterion_main!(regression, reporting);
