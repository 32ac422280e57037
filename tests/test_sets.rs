use nexalign::nexus::lexer::command_lines;
use nexalign::nexus::{Document, compact_for_nexus};
use nexalign::parser::ParsingErrorType;
use proptest::prelude::*;

fn document(nchar: usize) -> Document {
    let row = "A".repeat(nchar);
    format!(
        "#NEXUS
        begin taxa; dimensions ntax=5; taxlabels Human Chimp Gorilla 'Pongo abelii' Hylobates; end;
        begin data;
          dimensions nchar={nchar};
          format datatype=dna;
          matrix
            Human {row}
            Chimp {row}
            Gorilla {row}
            'Pongo abelii' {row}
            Hylobates {row}
          ;
        end;
        begin sets;
          charset stems = 1-4;
          taxset great = Human - 'Pongo abelii';
        end;"
    )
    .parse()
    .unwrap()
}

#[test]
fn test_compaction_reads_back() {
    let indices = [1, 2, 3, 5, 6, 7, 8, 11, 14, 17];
    let compact = compact_for_nexus(&indices);
    assert_eq!(compact, "2-4 6-9 12-18\\3");
    assert_eq!(document(20).resolve_charset(&compact).unwrap(), indices);
}

#[test]
fn test_named_sets_inside_definitions() {
    let doc = document(20);
    assert_eq!(doc.resolve_charset("stems 10-12").unwrap(), [0, 1, 2, 3, 9, 10, 11]);
    assert_eq!(doc.resolve_charset("4 stems").unwrap(), [0, 1, 2, 3]);
    assert_eq!(doc.resolve_charset("19-20\\5").unwrap(), [18]);

    let err = doc.resolve_charset("stems-6").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidFormatting(_)));
}

#[test]
fn test_taxon_ranges_and_numbers() {
    let doc = document(20);
    assert_eq!(doc.taxsets()["great"], ["Chimp", "Gorilla", "Human", "Pongo abelii"]);
    assert_eq!(doc.resolve_taxset("5 Pongo_abelii").unwrap(), ["Hylobates", "Pongo abelii"]);
    assert_eq!(doc.resolve_taxset("great").unwrap().len(), 4);

    let err = doc.resolve_taxset("6").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::UnresolvedIdentifier(_)));
    assert!(doc.resolve_taxset("human").is_err());
}

#[test]
fn test_quoted_member_names_keep_their_commas() {
    let doc: Document = "#NEXUS
        begin data; dimensions ntax=1 nchar=4; format datatype=dna; matrix A ACGT; end;
        begin sets;
          charpartition double = \"x,y\": 1-2, z: 3-4;
          charpartition single = 'x,y': 1-2, z: 3-4;
        end;"
        .parse()
        .unwrap();

    for name in ["double", "single"] {
        let partition = &doc.charpartitions()[name];
        assert_eq!(partition.len(), 2, "members of {name}");
        assert_eq!(partition["x,y"], [0, 1]);
        assert_eq!(partition["z"], [2, 3]);
    }
}

proptest! {
    #[test]
    fn compacted_sets_resolve_to_themselves(indices in prop::collection::vec(0usize..60, 0..40)) {
        let doc = document(60);
        let compact = compact_for_nexus(&indices);

        let mut expected = indices.clone();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(doc.resolve_charset(&compact).unwrap(), expected);
    }

    #[test]
    fn lexer_never_panics(text in "\\PC*") {
        let _ = command_lines(&text);
    }

    #[test]
    fn lexer_handles_bracket_soup(text in "[a-z;\\[\\]&' \n]{0,60}") {
        if let Ok(lines) = command_lines(&text) {
            prop_assert!(lines.iter().all(|l| !l.trim().is_empty()));
        }
    }
}
