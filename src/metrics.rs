use serde::Serialize;
use thiserror::Error;

/// Errors produced by the citation metrics core
///
/// The calculator assumes a clean list of non-negative citation counts.
/// Anything outside that domain is rejected up front with `InvalidInput`
/// and no partial result is produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    /// The citation data handed to the calculator (or extracted by the
    /// loader) is outside the non-negative-integer domain, or the requested
    /// citation column does not exist.
    #[error("invalid citation data: {0}")]
    InvalidInput(String),
}

/// Computed summary of a citation list
///
/// Derived, stateless values recomputed on every upload; there is no
/// lifecycle beyond the call that produces them.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CitationSummary {
    /// Largest `h` such that at least `h` papers have `h` or more citations
    pub h_index: usize,

    /// Number of papers with at least 10 citations
    pub i10_index: usize,

    /// Number of papers in the list
    pub papers: usize,

    /// Sum of all citation counts
    pub total_citations: i64,

    /// Highest citation count in the list
    pub max_citations: i64,
}

/// One analysed upload: the citation list plus everything the web page,
/// CLI and export layers present alongside it.
#[derive(Clone, Debug, Serialize)]
pub struct Analysis {
    /// Name of the uploaded file, used for download filenames
    pub filename: String,

    /// Header row of the source table
    pub headers: Vec<String>,

    /// First few data rows, rendered as display strings
    pub preview: Vec<Vec<String>>,

    /// Citation counts in upload order
    pub citations: Vec<i64>,

    /// The computed indices
    pub summary: CitationSummary,
}

impl Analysis {
    /// Build an analysis from an extracted citation list
    ///
    /// # Errors
    /// * `MetricsError::InvalidInput` if the list contains a negative count
    pub fn new(
        filename: String,
        headers: Vec<String>,
        preview: Vec<Vec<String>>,
        citations: Vec<i64>,
    ) -> Result<Self, MetricsError> {
        let summary = summarize(&citations)?;
        Ok(Analysis {
            filename,
            headers,
            preview,
            citations,
            summary,
        })
    }
}

/// Compute the h-index of a citation list
///
/// The h-index is the largest `h` such that at least `h` entries are
/// `>= h`. Equivalently, after sorting a copy in descending order, it is
/// the number of positions `i` (0-indexed) with `citations[i] > i`.
///
/// The caller's slice is never mutated; sorting happens on a copy.
///
/// # Arguments
/// * `citations` - Citation counts, one per paper, in any order
///
/// # Returns
/// * `Ok(h)` with `0 <= h <= citations.len()`
///
/// # Errors
/// * `MetricsError::InvalidInput` if any count is negative
///
/// # Examples
/// ```
/// use citemetrics::metrics::h_index;
///
/// assert_eq!(h_index(&[10, 8, 5, 4, 3]), Ok(4));
/// assert_eq!(h_index(&[]), Ok(0));
/// ```
pub fn h_index(citations: &[i64]) -> Result<usize, MetricsError> {
    reject_negative(citations)?;

    let mut sorted = citations.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    Ok(sorted
        .iter()
        .enumerate()
        .filter(|&(i, &c)| c > i as i64)
        .count())
}

/// Compute the i10-index of a citation list
///
/// The i10-index is the number of papers with at least 10 citations.
///
/// # Arguments
/// * `citations` - Citation counts, one per paper, in any order
///
/// # Returns
/// * `Ok(n)` with `0 <= n <= citations.len()`
///
/// # Errors
/// * `MetricsError::InvalidInput` if any count is negative
///
/// # Examples
/// ```
/// use citemetrics::metrics::i10_index;
///
/// assert_eq!(i10_index(&[10, 8, 5, 4, 3]), Ok(1));
/// assert_eq!(i10_index(&[12, 10, 9]), Ok(2));
/// ```
pub fn i10_index(citations: &[i64]) -> Result<usize, MetricsError> {
    reject_negative(citations)?;
    Ok(citations.iter().filter(|&&c| c >= 10).count())
}

/// Compute the full summary for a citation list
///
/// Bundles both indices with the paper count and citation totals shown on
/// the results page and in exports.
///
/// # Errors
/// * `MetricsError::InvalidInput` if any count is negative
pub fn summarize(citations: &[i64]) -> Result<CitationSummary, MetricsError> {
    Ok(CitationSummary {
        h_index: h_index(citations)?,
        i10_index: i10_index(citations)?,
        papers: citations.len(),
        total_citations: citations.iter().sum(),
        max_citations: citations.iter().copied().max().unwrap_or(0),
    })
}

/// Return a descending copy of the citation list
///
/// This is the sorted view the chart renderer plots; the input is left
/// untouched.
pub fn ranked(citations: &[i64]) -> Vec<i64> {
    let mut sorted = citations.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

fn reject_negative(citations: &[i64]) -> Result<(), MetricsError> {
    if let Some(c) = citations.iter().find(|&&c| c < 0) {
        return Err(MetricsError::InvalidInput(format!(
            "negative citation count {c}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h_index_empty_is_zero() {
        assert_eq!(h_index(&[]), Ok(0));
    }

    #[test]
    fn h_index_all_zero_is_zero() {
        assert_eq!(h_index(&[0, 0, 0]), Ok(0));
    }

    #[test]
    fn h_index_textbook_example() {
        assert_eq!(h_index(&[10, 8, 5, 4, 3]), Ok(4));
    }

    #[test]
    fn h_index_plateau() {
        assert_eq!(h_index(&[5, 5, 5, 5, 5]), Ok(5));
    }

    #[test]
    fn h_index_order_independent() {
        assert_eq!(h_index(&[3, 10, 4, 8, 5]), Ok(4));
        assert_eq!(h_index(&[3, 4, 5, 8, 10]), Ok(4));
    }

    #[test]
    fn h_index_single_paper() {
        assert_eq!(h_index(&[0]), Ok(0));
        assert_eq!(h_index(&[1]), Ok(1));
        assert_eq!(h_index(&[100]), Ok(1));
    }

    #[test]
    fn h_index_bounded_by_len() {
        let cases: Vec<Vec<i64>> = vec![
            vec![],
            vec![0],
            vec![1000, 1000],
            vec![1, 2, 3, 4, 5, 6, 7],
            vec![7, 7, 7, 0, 0],
        ];
        for citations in cases {
            let h = h_index(&citations).unwrap();
            assert!(h <= citations.len(), "h={} for {:?}", h, citations);
        }
    }

    #[test]
    fn h_index_rejects_negative() {
        assert!(matches!(
            h_index(&[5, -1, 3]),
            Err(MetricsError::InvalidInput(_))
        ));
    }

    #[test]
    fn h_index_does_not_mutate_input() {
        let citations = vec![3, 10, 4, 8, 5];
        let before = citations.clone();
        let first = h_index(&citations).unwrap();
        let second = h_index(&citations).unwrap();
        assert_eq!(first, second);
        assert_eq!(citations, before);
    }

    #[test]
    fn h_index_monotone_under_large_append() {
        let base: Vec<i64> = vec![10, 8, 5, 4, 3];
        let h_before = h_index(&base).unwrap();

        let mut grown = base.clone();
        let max = *base.iter().max().unwrap();
        grown.push(max + 1);
        let h_after = h_index(&grown).unwrap();

        assert!(h_after >= h_before);
    }

    #[test]
    fn i10_index_empty_is_zero() {
        assert_eq!(i10_index(&[]), Ok(0));
    }

    #[test]
    fn i10_index_counts_at_least_ten() {
        assert_eq!(i10_index(&[10, 8, 5, 4, 3]), Ok(1));
        assert_eq!(i10_index(&[10, 10, 9, 11]), Ok(3));
        assert_eq!(i10_index(&[9, 9, 9]), Ok(0));
    }

    #[test]
    fn i10_index_rejects_negative() {
        assert!(matches!(
            i10_index(&[-4]),
            Err(MetricsError::InvalidInput(_))
        ));
    }

    #[test]
    fn summarize_bundles_both_indices() {
        let summary = summarize(&[10, 8, 5, 4, 3]).unwrap();
        assert_eq!(summary.h_index, 4);
        assert_eq!(summary.i10_index, 1);
        assert_eq!(summary.papers, 5);
        assert_eq!(summary.total_citations, 30);
        assert_eq!(summary.max_citations, 10);
    }

    #[test]
    fn summarize_empty() {
        let summary = summarize(&[]).unwrap();
        assert_eq!(summary.h_index, 0);
        assert_eq!(summary.i10_index, 0);
        assert_eq!(summary.papers, 0);
        assert_eq!(summary.total_citations, 0);
        assert_eq!(summary.max_citations, 0);
    }

    #[test]
    fn ranked_sorts_descending_without_mutating() {
        let citations = vec![3, 10, 4];
        assert_eq!(ranked(&citations), vec![10, 4, 3]);
        assert_eq!(citations, vec![3, 10, 4]);
    }

    #[test]
    fn analysis_carries_summary() {
        let analysis = Analysis::new(
            "citations.csv".to_string(),
            vec!["Title".to_string(), "Cited by".to_string()],
            vec![vec!["Paper A".to_string(), "10".to_string()]],
            vec![10, 8, 5, 4, 3],
        )
        .unwrap();
        assert_eq!(analysis.summary.h_index, 4);
        assert_eq!(analysis.citations.len(), 5);
    }
}
