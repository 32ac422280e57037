use nexalign::newick::{NewickParser, write_newick};
use nexalign::parse_newick_str;
use nexalign::parser::scanner::Scanner;

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_tree() {
    let tree = parse_newick_str("((A:1.0,B:2.0):3.0,C:4.0):0.5;").unwrap();

    // Test counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());

    // Test relationships
    // - Root has children (internal, C)
    let root = tree.root();
    let root_index = root.index();
    let [root_left, root_right] = root.children() else {
        panic!("root should have two children");
    };

    // - Internal vertex has children (A, B)
    let internal = tree.vertex(*root_left);
    assert!(internal.is_internal());
    assert_eq!(internal.branch_length(), Some(3.0));
    let [internal_left, internal_right] = internal.children() else {
        panic!("internal vertex should have two children");
    };

    // - Three leaves
    let leaf_a = tree.vertex(*internal_left);
    let leaf_b = tree.vertex(*internal_right);
    let leaf_c = tree.vertex(*root_right);
    assert_eq!(leaf_a.label(), Some("A"));
    assert_eq!(leaf_b.label(), Some("B"));
    assert_eq!(leaf_c.label(), Some("C"));
    assert_eq!(leaf_c.branch_length(), Some(4.0));

    // - Parent relationships
    assert_eq!(internal.parent_index(), Some(root_index));
    assert_eq!(leaf_a.parent_index(), Some(*root_left));
    assert_eq!(leaf_c.parent_index(), Some(root_index));
}

#[test]
fn test_multifurcation_and_internal_labels() {
    let tree = parse_newick_str("((A,B,C)95:0.1,D,E);").unwrap();
    assert_eq!(tree.num_leaves(), 5);
    assert_eq!(tree.root().children().len(), 3);
    assert_eq!(tree.vertex(tree.root().children()[0]).label(), Some("95"));
    assert_eq!(tree.to_newick(), "((A,B,C)95:0.1,D,E);");
}

#[test]
fn test_tree_with_quoted_labels() {
    let tree = parse_newick_str("(('Taxon one':1.5,'Second''s taxon':2.5):3.0,'3rd Taxon':4.0):0.0;").unwrap();
    assert_eq!(tree.leaf_labels(), ["Taxon one", "Second's taxon", "3rd Taxon"]);
    assert_eq!(tree.to_newick(), "(('Taxon one':1.5,'Second''s taxon':2.5):3,'3rd Taxon':4);");
}

#[test]
fn test_tree_with_scientific_notation() {
    let tree = parse_newick_str("((A:1e-5,B:2.5E+3):1.0e2,C:3.14E-10):0.0;").unwrap();
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_vertices(), 5);
}

#[test]
fn test_optional_and_negative_branch_lengths() {
    assert!(parse_newick_str("((A:1.0,B),C:4.0);").is_ok());
    let tree = parse_newick_str("((A:-0.5,B:1),C);").unwrap();
    assert_eq!(tree.vertex(tree.vertex(tree.root().children()[0]).children()[0]).branch_length(), Some(-0.5));
}

#[test]
fn test_newick_with_comments() {
    let newick = "[A tree of] ([Shags!] C:[King Commentoran] 2.2, (A[Great Commentoran]:0.33, B[&rate=0.5]:0.33):1.87):0.0[The end.];";
    let tree = parse_newick_str(newick);
    if tree.is_err() {
        eprintln!("Error parsing tree with comments: {:?}", tree.as_ref().err());
    }
    assert_eq!(tree.unwrap().leaf_labels(), ["C", "A", "B"]);
}

#[test]
fn test_parse_all_and_write() {
    let mut scanner = Scanner::new("(A,B); [second] (C,(D,E));\n");
    let trees = NewickParser::new().parse_all(&mut scanner).unwrap();
    assert_eq!(trees.len(), 2);
    assert_eq!(trees[1].num_leaves(), 3);

    let mut out = Vec::new();
    write_newick(&mut out, &trees).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "(A,B);\n(C,(D,E));\n");
}

// --- TESTS DEALING WITH CORRUPT NEWICK STRINGS ---
#[test]
fn test_missing_comma() {
    assert!(parse_newick_str("((A:1.0 B:2.0):3.0,C:4.0):0.5;").is_err());
}

#[test]
fn test_unmatched_parentheses() {
    assert!(parse_newick_str("((A:1.0,B:2.0:3.0,C:4.0):0.5;").is_err());
}

#[test]
fn test_invalid_branch_length() {
    assert!(parse_newick_str("((A:1.0,B:abc):3.0,C:4.0):0.5;").is_err());
}

#[test]
fn test_trailing_garbage() {
    assert!(parse_newick_str("(A,B)C D;").is_err());
}
