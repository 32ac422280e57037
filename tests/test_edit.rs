use nexalign::model::DataType;
use nexalign::nexus::{Document, WriteOptions, combine};
use nexalign::parser::ParsingErrorType;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn doc(text: &str) -> Document {
    let _ = env_logger::builder().is_test(true).try_init();
    text.parse().unwrap()
}

#[test]
fn test_gap_insertion_shifts_sets() {
    let mut d = doc("#NEXUS
        begin data; dimensions ntax=2 nchar=10; format datatype=dna;
          matrix
            Fox  ACGTACGTAC
            Wolf ACGTACGTAC
          ;
          charlabels 6 six;
        end;
        begin sets;
          charset s = 3 4 9 10;
          charpartition p = one: 1-5, two: 6-10;
        end;");

    d.insert_gap(5, 3, false).unwrap();
    assert_eq!(d.nchar(), 13);
    assert_eq!(d.charsets()["s"], [2, 3, 11, 12]);
    assert_eq!(d.charpartitions()["p"]["one"], [0, 1, 2, 3, 4]);
    assert_eq!(d.charpartitions()["p"]["two"], [8, 9, 10, 11, 12]);
    assert_eq!(d.charlabels().get(&8).map(String::as_str), Some("six"));
    assert_eq!(d.sequence("Wolf").unwrap().as_str(), "ACGTA---CGTAC");

    // a left-greedy insertion right after a set member extends the set
    d.insert_gap(4, 1, true).unwrap();
    assert_eq!(d.charpartitions()["p"]["one"], [0, 1, 2, 3, 4, 5]);

    let err = d.insert_gap(99, 1, false).unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidEdit(_)));
}

#[test]
fn test_add_sequence() {
    let mut d = doc("begin data; dimensions ntax=1 nchar=4; format datatype=dna; matrix Fox ACGT; end;");

    assert_eq!(d.add_sequence("Fox", "AC").unwrap(), "Fox.copy");
    assert_eq!(d.sequence("Fox.copy").unwrap().as_str(), "AC??");

    assert_eq!(d.add_sequence("Wolf", "ACGTAA").unwrap(), "Wolf");
    assert_eq!(d.nchar(), 6);
    assert_eq!(d.ntax(), 3);
    assert_eq!(d.sequence("Fox").unwrap().as_str(), "ACGT--");

    let err = d.add_sequence("Cat", "ACJT").unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::IllegalCharacter { character: 'J', .. }));
    assert!(d.add_sequence("", "ACGT").is_err());
}

#[test]
fn test_bootstrap_is_reproducible() {
    let d = doc("begin data; dimensions ntax=3 nchar=8; format datatype=dna;
        matrix
          A ACGTACGT
          B AAAACCCC
          C GGGGTTTT
        ;
        end;");

    let rows = d.string_matrix();
    let first = d.bootstrap(&rows, &[], &[], &mut StdRng::seed_from_u64(11)).unwrap();
    let second = d.bootstrap(&rows, &[], &[], &mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(first, second);

    let replicate = d.bootstrap(&rows, &["C".to_string()], &[0, 1], &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(replicate.len(), 2);
    assert!(replicate.values().all(|row| row.len() == 6));
    // columns are resampled together
    let a: Vec<char> = replicate["A"].chars().collect();
    let b: Vec<char> = replicate["B"].chars().collect();
    for (x, y) in a.iter().zip(&b) {
        let column = "GTACGT".chars().zip("AACCCC".chars()).position(|pair| pair == (*x, *y));
        assert!(column.is_some());
    }
}

#[test]
fn test_combine_pads_missing_taxa() {
    let dna = doc("begin data; dimensions ntax=2 nchar=3; format datatype=dna;
        matrix\n Fox ACG\n Wolf AC-\n;
        charset codon = 1-3;
        end;");
    let protein = doc("begin data; dimensions ntax=2 nchar=2; format datatype=protein gap=~;
        matrix\n Wolf M~\n Cat KW\n;
        end;");

    let combined = combine(&[("nuc", &dna), ("aa", &protein)]).unwrap();
    assert_eq!(combined.datatype(), DataType::Indeterminate);
    assert_eq!(combined.taxlabels(), ["Fox", "Wolf", "Cat"]);
    assert_eq!(combined.ntax(), 3);
    assert_eq!(combined.nchar(), 5);
    assert_eq!(combined.sequence("Fox").unwrap().as_str(), "ACG??");
    assert_eq!(combined.sequence("Wolf").unwrap().as_str(), "AC-M-");
    assert_eq!(combined.sequence("Cat").unwrap().as_str(), "???KW");

    assert_eq!(combined.charsets()["nuc.codon"], [0, 1, 2]);
    assert_eq!(combined.charsets()["aa"], [3, 4]);
    assert_eq!(combined.charpartitions()["combined"]["nuc"], [0, 1, 2]);

    // an indeterminate datatype is not written
    let text = combined.to_nexus_string(&WriteOptions::default()).unwrap();
    assert!(text.contains("\tformat;\n"));

    let err = combine(&[]).unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::InvalidEdit(_)));
}

#[test]
fn test_site_queries() {
    let mut d = doc("begin data; dimensions ntax=3 nchar=6; format datatype=dna;
        matrix
          A -AC?G-
          B -AC-GN
          C ?ACTG-
        ;
        end;");

    assert_eq!(d.gaponly(false), Vec::<usize>::new());
    assert_eq!(d.gaponly(true), [0]);
    assert_eq!(d.invert(&[1, 2, 3]), [0, 4, 5]);
    // gaps count as missing data
    assert_eq!(d.constant(&[], &[]).unwrap(), [0, 1, 2, 3, 4, 5]);

    d.terminal_gap_to_missing(None, false);
    assert_eq!(d.sequence("A").unwrap().as_str(), "?AC?G?");
    assert_eq!(d.sequence("B").unwrap().as_str(), "?AC-G?");
    assert_eq!(d.sequence("C").unwrap().as_str(), "?ACTG?");
}

#[test]
fn test_exports() {
    let d = doc("begin data; dimensions ntax=2 nchar=6; format datatype=dna;
        matrix\n 'Red fox' ACGTAC\n Wolf AC-TAC\n;
        end;");
    assert_eq!(d.export_fasta(4), ">'Red fox'\nACGT\nAC\n>Wolf\nAC-T\nAC\n");
    assert_eq!(d.export_phylip(), "2 6\n'Red fox' ACGTAC\nWolf AC-TAC\n");
}

#[test]
fn test_stepmatrix_from_alignment() {
    let d = doc("begin data; dimensions ntax=2 nchar=4; format datatype=dna;
        matrix\n A AACC\n B AGCT\n;
        end;");

    assert_eq!(d.cstatus(1, &[], true).unwrap(), ['A', 'G']);
    let printed = d.weighted_stepmatrix("w", &[], &[]).unwrap();
    // A-G and C-T co-occur once each: frequency 0.5, cost ln 2
    assert!(printed.starts_with("usertype w stepmatrix=5\n"));
    assert!(printed.contains("[A]     .       inf.     0.69     inf.     inf.     \n"));
    assert!(printed.contains("[C]    inf.      .       inf.     0.69     inf.     \n"));
}
