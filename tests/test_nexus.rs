use nexalign::model::DataType;
use nexalign::nexus::defs::DEFAULT_NEXUS;
use nexalign::nexus::{Burnin, Document, NexusParserBuilder};
use nexalign::parse_nexus_file;
use nexalign::parser::ParsingErrorType;
use std::fs::File;
use std::path::Path;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new("tests").join("fixtures").join(name)
}

fn primates() -> Document {
    let result = parse_nexus_file(fixture("primates.nex"));
    if let Err(e) = &result {
        eprintln!("Error parsing primates: {:?}", e);
    }
    result.unwrap()
}

#[test]
fn test_interleaved_matrix_with_comments() {
    let doc = primates();
    assert_eq!(doc.ntax(), 4);
    assert_eq!(doc.nchar(), 20);
    assert_eq!(doc.datatype(), DataType::Dna);
    assert!(doc.interleave());
    assert_eq!(doc.taxlabels(), ["Human", "Chimp", "Gorilla", "Pongo pygmaeus"]);
    assert_eq!(doc.declared_taxlabels(), doc.taxlabels());

    assert_eq!(doc.sequence("Human").unwrap().as_str(), "ACGTACGTACGGCCTTAAGG");
    assert_eq!(doc.sequence("Gorilla").unwrap().as_str(), "ACGTAC--ACGGCC?TAAGG");
    assert_eq!(doc.sequence("Pongo pygmaeus").unwrap().as_str(), "ACGTRCGTA?GGCCTTAAGG");

    for taxon in doc.taxlabels() {
        assert_eq!(doc.sequence(taxon).unwrap().len(), doc.nchar());
    }
}

#[test]
fn test_labels_and_sets() {
    let doc = primates();
    assert_eq!(doc.charlabels().get(&0).map(String::as_str), Some("first"));
    assert_eq!(doc.charlabels().get(&19).map(String::as_str), Some("last"));

    assert_eq!(doc.charsets()["first_codon"], [0, 3, 6, 9, 12, 15, 18]);
    assert_eq!(doc.charsets()["tail"], (10..20).collect::<Vec<_>>());
    assert_eq!(doc.charsets()["mixed"], [1, 2, 3, 5, 6, 7, 8, 11, 14, 17]);
    assert_eq!(doc.taxsets()["apes"], ["Chimp", "Gorilla", "Pongo pygmaeus"]);

    let genes = &doc.charpartitions()["genes"];
    assert_eq!(genes["cox1"], (0..10).collect::<Vec<_>>());
    assert_eq!(genes["cox2"], (10..20).collect::<Vec<_>>());
    let clades = &doc.taxpartitions()["clades"];
    assert_eq!(clades["hominini"], ["Chimp", "Human"]);
    assert_eq!(clades["others"], ["Gorilla", "Pongo pygmaeus"]);
}

#[test]
fn test_translated_trees() {
    let doc = primates();
    assert_eq!(doc.translate().unwrap().len(), 4);
    assert_eq!(doc.trees().len(), 2);

    let best = &doc.trees()[0];
    assert_eq!(best.name(), "best");
    assert!(best.is_rooted());
    assert_eq!(best.weight(), 0.5);
    assert!(best.is_valid());
    assert_eq!(best.leaf_labels(), ["Human", "Chimp", "Gorilla", "Pongo pygmaeus"]);

    let alt = &doc.trees()[1];
    assert!(!alt.is_rooted());
    assert_eq!(alt.weight(), 1.0);
    assert_eq!(alt.leaf_labels(), ["Human", "Gorilla", "Chimp", "Pongo pygmaeus"]);
}

#[test]
fn test_unknown_blocks_are_kept() {
    let doc = primates();
    assert_eq!(doc.unknown_blocks().len(), 1);
    assert_eq!(doc.unknown_blocks()[0].title, "paup");

    let parser = NexusParserBuilder::for_file(File::open(fixture("primates.nex")).unwrap())
        .unwrap()
        .discard_unknown_blocks()
        .with_burnin(Burnin::Count(1))
        .build()
        .unwrap();
    assert_eq!(parser.num_total_trees(), 2);
    assert_eq!(parser.num_trees(), 1);
    assert!(parser.document().unknown_blocks().is_empty());
}

#[test]
fn test_duplicate_taxa_are_disambiguated() {
    let doc = parse_nexus_file(fixture("duplicates.nex")).unwrap();
    assert_eq!(doc.taxlabels(), ["Fox", "Fox.copy", "Wolf"]);
    assert_eq!(doc.unaltered_taxlabels(), ["Fox", "Fox", "Wolf"]);
    assert_eq!(doc.sequence("Fox.copy").unwrap().as_str(), "ACGTT");
}

#[test]
fn test_matchchar_and_continued_rows() {
    let doc = parse_nexus_file(fixture("protein.nex")).unwrap();
    assert_eq!(doc.datatype(), DataType::Protein);
    assert_eq!(doc.missing(), 'X');
    assert_eq!(doc.gap(), '.');
    assert_eq!(doc.matchchar(), Some('*'));
    assert_eq!(doc.sequence("seq1").unwrap().as_str(), "MKVLAAGIVGLL");
    assert_eq!(doc.sequence("seq2").unwrap().as_str(), "MKILSA....LX");
}

#[test]
fn test_missing_file() {
    let err = parse_nexus_file(fixture("does_not_exist.nex")).unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::IoError(_)));
}

#[test]
fn test_dimension_mismatches() {
    let too_short = "#NEXUS\nbegin data; dimensions ntax=2 nchar=5; format datatype=dna;\n\
                     matrix\nA ACGTA\nB ACGT\n;\nend;";
    let err = too_short.parse::<Document>().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::DimensionMismatch(_)));

    let too_few_taxa = "#NEXUS\nbegin data; dimensions ntax=3 nchar=2; format datatype=dna;\n\
                        matrix\nA AC\nB AC\n;\nend;";
    let err = too_few_taxa.parse::<Document>().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::DimensionMismatch(_)));

    let too_many_taxa = "#NEXUS\nbegin data; dimensions ntax=1 nchar=2; format datatype=dna;\n\
                         matrix\nA AC\nB AC\n;\nend;";
    let err = too_many_taxa.parse::<Document>().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::DimensionMismatch(_)));
}

#[test]
fn test_block_structure_errors() {
    let unclosed = "#NEXUS\nbegin data; dimensions ntax=1 nchar=1;";
    let err = unclosed.parse::<Document>().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidBlockStructure(_)));

    let nested = "#NEXUS\nbegin data; begin sets; end; end;";
    let err = nested.parse::<Document>().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidBlockStructure(_)));

    let open_comment = "#NEXUS\nbegin data; [ dimensions ntax=1 nchar=1; end;";
    let err = open_comment.parse::<Document>().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::UnmatchedComment(_)));
}

#[test]
fn test_unresolved_set_members() {
    let text = "#NEXUS\nbegin data; dimensions ntax=2 nchar=4; format datatype=dna;\n\
                matrix\nA ACGT\nB ACGT\n;\nend;\n\
                begin sets; taxset outgroup = C; end;";
    let err = text.parse::<Document>().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::UnresolvedIdentifier(_)));

    let text = text.replace("taxset outgroup = C", "charset tail = 3-5");
    let err = text.parse::<Document>().unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::UnresolvedIdentifier(_)));
}

#[test]
fn test_new_document_matches_default_payload() {
    let parsed: Document = DEFAULT_NEXUS.parse().unwrap();
    let new = Document::new();
    assert_eq!(parsed.ntax(), new.ntax());
    assert_eq!(parsed.nchar(), new.nchar());
    assert_eq!(parsed.datatype(), new.datatype());
    assert_eq!(parsed.missing(), new.missing());
    assert_eq!(parsed.gap(), new.gap());
    assert_eq!(parsed.options(), new.options());
    assert!(parsed.taxlabels().is_empty());
}
