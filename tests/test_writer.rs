use nexalign::nexus::{Document, NexusWriter, WriteOptions};
use nexalign::parse_nexus_file;
use proptest::prelude::*;
use std::path::Path;

fn primates() -> Document {
    parse_nexus_file(Path::new("tests").join("fixtures").join("primates.nex")).unwrap()
}

fn assert_same_data(read: &Document, written: &Document) {
    assert_eq!(read.taxlabels(), written.taxlabels());
    assert_eq!(read.nchar(), written.nchar());
    for taxon in written.taxlabels() {
        assert_eq!(read.sequence(taxon), written.sequence(taxon), "row of {taxon}");
    }
}

#[test]
fn test_round_trip_plain() {
    let doc = primates();
    let options = WriteOptions::default().with_trees(true).with_unknown_blocks(true);
    let text = doc.to_nexus_string(&options).unwrap();
    let read: Document = text.parse().unwrap();

    assert_same_data(&read, &doc);
    assert_eq!(read.datatype(), doc.datatype());
    assert_eq!(read.charlabels(), doc.charlabels());
    assert_eq!(read.charsets(), doc.charsets());
    assert_eq!(read.taxsets(), doc.taxsets());
    assert_eq!(read.charpartitions(), doc.charpartitions());
    assert_eq!(read.taxpartitions(), doc.taxpartitions());
    assert_eq!(read.unknown_blocks(), doc.unknown_blocks());

    assert_eq!(read.trees().len(), 2);
    for (read, written) in read.trees().iter().zip(doc.trees()) {
        assert_eq!(read.name(), written.name());
        assert_eq!(read.is_rooted(), written.is_rooted());
        assert_eq!(read.weight(), written.weight());
        assert_eq!(read.leaf_labels(), written.leaf_labels());
    }
}

#[test]
fn test_round_trip_interleaved() {
    let doc = primates();
    let text = doc
        .to_nexus_string(&WriteOptions::default().with_interleave(true).with_blocksize(7))
        .unwrap();
    assert!(text.contains("\tformat datatype=dna interleave;\n"));
    // three blocks of at most 7 columns
    assert!(text.contains("\nHuman            ACGTACG\n"));
    assert!(text.contains("\nHuman            TACGGCC\n"));
    assert!(text.contains("\nHuman            TTAAGG\n"));

    let read: Document = text.parse().unwrap();
    assert!(read.interleave());
    assert_same_data(&read, &doc);
    assert_eq!(read.charsets(), doc.charsets());
}

#[test]
fn test_excluded_characters_and_deleted_taxa() {
    let doc = primates();
    let delete = vec!["Pongo_pygmaeus".to_string()];
    let exclude = vec![0, 1, 2, 10];
    let text = doc
        .to_nexus_string(&WriteOptions::default().with_delete(delete.clone()).with_exclude(exclude.clone()))
        .unwrap();
    let read: Document = text.parse().unwrap();

    let cropped = doc.crop_matrix(&delete, &exclude).unwrap();
    assert_eq!(read.taxlabels(), ["Human", "Chimp", "Gorilla"]);
    assert_eq!(read.nchar(), 16);
    for (taxon, sequence) in &cropped {
        assert_eq!(read.sequence(taxon).unwrap().as_str(), sequence.as_str());
    }

    // sets shift to the remaining characters
    assert_eq!(read.charsets()["tail"], (7..16).collect::<Vec<_>>());
    assert_eq!(read.charsets()["first_codon"], [0, 3, 6, 8, 11, 14]);
    assert_eq!(read.taxsets()["apes"], ["Chimp", "Gorilla"]);
    assert_eq!(read.charlabels().get(&15).map(String::as_str), Some("last"));
    assert!(!read.charlabels().values().any(|l| l == "first"));
}

#[test]
fn test_mrbayes_names() {
    let doc = primates();
    let text = doc.to_nexus_string(&WriteOptions::default().with_mrbayes(true)).unwrap();
    assert!(text.contains("\nPongo_pygmaeus ACGTRCGTA?GGCCTTAAGG\n"));
    assert!(text.contains("taxset apes = Chimp Gorilla Pongo_pygmaeus;"));

    // underscores still match the original label
    let read: Document = text.parse().unwrap();
    assert_eq!(read.check_taxlabels("Pongo pygmaeus"), Some("Pongo_pygmaeus"));
}

#[test]
fn test_omit_header_and_comment() {
    let doc = primates();
    let mut writer = NexusWriter::new(Vec::new());
    writer
        .write_document(&doc, &WriteOptions::default().with_omit_nexus(true).with_comment("checked").with_append_sets(false))
        .unwrap();
    let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert!(text.starts_with("[checked]\nbegin data;\n"));
    assert!(!text.contains("#NEXUS"));
    assert!(text.ends_with(";\nend;\n"));
}

#[test]
fn test_partitions_as_separate_files() {
    let doc = primates();
    let texts = doc.write_partitions("genes", &WriteOptions::default()).unwrap();
    assert_eq!(texts.iter().map(|(m, _)| m.as_str()).collect::<Vec<_>>(), ["cox1", "cox2"]);

    let cox2: Document = texts[1].1.parse().unwrap();
    assert_eq!(cox2.nchar(), 10);
    assert_eq!(cox2.sequence("Gorilla").unwrap().as_str(), "GGCC?TAAGG");
    assert!(doc.write_partitions("nope", &WriteOptions::default()).is_err());
}

fn alignment() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    (prop::collection::btree_set("t[a-z0-9]{0,6}", 1..6), 1usize..40).prop_flat_map(|(names, nchar)| {
        let names: Vec<String> = names.into_iter().collect();
        let rows = prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!['A', 'C', 'G', 'T', 'N', 'R', '-', '?']), nchar)
                .prop_map(|row| row.into_iter().collect::<String>()),
            names.len(),
        );
        (Just(names), rows)
    })
}

proptest! {
    #[test]
    fn written_documents_read_back((names, rows) in alignment(), interleave in any::<bool>(), blocksize in 1usize..50) {
        let mut text = format!(
            "#NEXUS\nbegin data; dimensions ntax={} nchar={}; format datatype=dna;\nmatrix\n",
            names.len(),
            rows[0].len()
        );
        for (name, row) in names.iter().zip(&rows) {
            text.push_str(&format!("{name} {row}\n"));
        }
        text.push_str(";\nend;\n");
        let doc: Document = text.parse().unwrap();

        let options = WriteOptions::default().with_interleave(interleave).with_blocksize(blocksize);
        let written = doc.to_nexus_string(&options).unwrap();
        let read: Document = written.parse().unwrap();

        prop_assert_eq!(read.taxlabels(), doc.taxlabels());
        for (name, row) in names.iter().zip(&rows) {
            prop_assert_eq!(read.sequence(name).unwrap().as_str(), row.as_str());
        }
    }
}
