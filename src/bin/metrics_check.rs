use citemetrics::loader::{ColumnSelector, extract_citations, table_from_csv_bytes};
use citemetrics::metrics::{h_index, i10_index, ranked, summarize};

// Runnable end-to-end check of the calculator contract. `cargo test`
// covers the same ground; this binary prints its progress for a quick
// manual run.
fn main() {
    println!("=== Citation Metrics Check ===\n");

    println!("Test 1: Empty citation list");
    assert_eq!(h_index(&[]).unwrap(), 0);
    assert_eq!(i10_index(&[]).unwrap(), 0);
    println!("Empty list gives h=0, i10=0 - PASS\n");

    println!("Test 2: Textbook h-index example");
    let citations: Vec<i64> = vec![10, 8, 5, 4, 3];
    assert_eq!(h_index(&citations).unwrap(), 4);
    assert_eq!(i10_index(&citations).unwrap(), 1);
    println!("[10, 8, 5, 4, 3] gives h=4, i10=1 - PASS\n");

    println!("Test 3: Plateau");
    assert_eq!(h_index(&[5, 5, 5, 5, 5]).unwrap(), 5);
    println!("[5, 5, 5, 5, 5] gives h=5 - PASS\n");

    println!("Test 4: All zeros");
    assert_eq!(h_index(&[0, 0, 0]).unwrap(), 0);
    println!("[0, 0, 0] gives h=0 - PASS\n");

    println!("Test 5: Input is never mutated");
    let original = vec![3, 10, 4, 8, 5];
    let copy = original.clone();
    let first = h_index(&original).unwrap();
    let second = h_index(&original).unwrap();
    assert_eq!(first, second);
    assert_eq!(original, copy);
    assert_eq!(ranked(&original), vec![10, 8, 5, 4, 3]);
    assert_eq!(original, copy);
    println!("Repeated calls agree and leave the input unchanged - PASS\n");

    println!("Test 6: Negative counts are rejected");
    assert!(h_index(&[5, -1]).is_err());
    assert!(i10_index(&[-1]).is_err());
    println!("Negative counts give InvalidInput - PASS\n");

    println!("Test 7: Summary over a loaded CSV column");
    let csv = b"Title,Cited by\nA,12\nB,10\nC,\nD,7\nE,0\n";
    let table = table_from_csv_bytes(csv).unwrap();
    let citations =
        extract_citations(&table, &ColumnSelector::ByName("Cited by".to_string())).unwrap();
    assert_eq!(citations, vec![12, 10, 7, 0]);
    let summary = summarize(&citations).unwrap();
    assert_eq!(summary.h_index, 3);
    assert_eq!(summary.i10_index, 2);
    assert_eq!(summary.papers, 4);
    println!(
        "CSV column gives h={}, i10={} over {} papers - PASS\n",
        summary.h_index, summary.i10_index, summary.papers
    );

    println!("All tests completed.");
}
