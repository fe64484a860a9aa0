//! Grid comparison

use gridmark_core::{CellAddress, Grid, SheetRange};

use crate::equality::values_equal;

/// The cell a compared grid's `(0, 0)` corresponds to on the sheet
///
/// Only used to label mismatches. A descriptor that does not parse, or
/// names only a sheet, falls back to `A1`; the comparison itself is
/// unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeOrigin {
    start: CellAddress,
    fallback: bool,
}

impl RangeOrigin {
    /// Resolve the origin of a range descriptor such as `"O3:O102"` or
    /// `"Sheet1!B2:D9"`
    pub fn from_descriptor(descriptor: Option<&str>) -> Self {
        match descriptor.map(SheetRange::parse) {
            Some(Ok(SheetRange {
                range: Some(range), ..
            })) => Self {
                start: range.start,
                fallback: false,
            },
            _ => Self {
                start: CellAddress::origin(),
                fallback: true,
            },
        }
    }

    /// Whether the descriptor was missing, malformed or had no start cell
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// A1 reference of the cell at `(row_offset, col_offset)` within the grid
    pub fn reference(&self, row_offset: usize, col_offset: usize) -> String {
        self.start.offset_reference(row_offset, col_offset)
    }
}

impl Default for RangeOrigin {
    fn default() -> Self {
        Self::from_descriptor(None)
    }
}

/// One cell that did not match the solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// A1 reference on the sheet, e.g. `"B2"`
    pub cell: String,
    /// The solution's text, empty if absent
    pub expected: String,
    /// The learner's text, empty if absent
    pub actual: String,
}

/// Outcome of comparing two grids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonResult {
    /// Cells visited in the bounding box of both grids
    pub total_cells: usize,
    /// Cells that matched
    pub correct_cells: usize,
    /// Every mismatch, in row-major order
    pub mismatches: Vec<Mismatch>,
}

impl ComparisonResult {
    /// Percentage of correct cells, rounded to the nearest integer
    ///
    /// An empty comparison scores 0.
    pub fn score(&self) -> u32 {
        if self.total_cells == 0 {
            return 0;
        }
        (self.correct_cells as f64 / self.total_cells as f64 * 100.0).round() as u32
    }

    /// Whether the score is exactly 100
    ///
    /// Rounding means a very large grid with a single wrong cell can still
    /// reach 100.
    pub fn is_success(&self) -> bool {
        self.score() == 100
    }
}

/// Compare a learner's grid with the solution grid
///
/// `tolerance` is the relative numeric tolerance and `range_descriptor` the
/// range both grids were read from, used to label mismatches.
pub fn compare(
    student: &Grid,
    solution: &Grid,
    tolerance: f64,
    range_descriptor: Option<&str>,
) -> ComparisonResult {
    compare_from(
        student,
        solution,
        tolerance,
        &RangeOrigin::from_descriptor(range_descriptor),
    )
}

/// [`compare`] with an already resolved origin
pub fn compare_from(
    student: &Grid,
    solution: &Grid,
    tolerance: f64,
    origin: &RangeOrigin,
) -> ComparisonResult {
    let mut result = ComparisonResult::default();
    let rows = student.row_count().max(solution.row_count());

    for row in 0..rows {
        let cols = student.row_len(row).max(solution.row_len(row));

        for col in 0..cols {
            result.total_cells += 1;

            let actual = student.get(row, col);
            let expected = solution.get(row, col);

            if values_equal(actual, expected, tolerance) {
                result.correct_cells += 1;
            } else {
                result.mismatches.push(Mismatch {
                    cell: origin.reference(row, col),
                    expected: expected.display_text(),
                    actual: actual.display_text(),
                });
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmark_core::CellValue;
    use pretty_assertions::assert_eq;

    fn grid(rows: Vec<Vec<&str>>) -> Grid {
        Grid::from_rows(rows)
    }

    #[test]
    fn test_identical_grids() {
        let g = grid(vec![vec!["a", "1"], vec!["b", "2"]]);
        let result = compare(&g, &g, 0.01, Some("A1:B2"));

        assert_eq!(result.total_cells, 4);
        assert_eq!(result.correct_cells, 4);
        assert!(result.mismatches.is_empty());
        assert!(result.is_success());
    }

    #[test]
    fn test_single_mismatch_is_labelled() {
        let student = grid(vec![vec!["10", "20"], vec!["30", "41"]]);
        let solution = grid(vec![vec!["10", "20"], vec!["30", "40"]]);
        let result = compare(&student, &solution, 0.01, Some("A1:B2"));

        assert_eq!(result.total_cells, 4);
        assert_eq!(result.correct_cells, 3);
        assert_eq!(
            result.mismatches,
            vec![Mismatch {
                cell: "B2".into(),
                expected: "40".into(),
                actual: "41".into(),
            }]
        );
        assert_eq!(result.score(), 75);
        assert!(!result.is_success());
    }

    #[test]
    fn test_bounding_box_covers_both_grids() {
        let student = grid(vec![vec!["1"]]);
        let solution = grid(vec![vec!["1", "2"], vec!["3"]]);
        let result = compare(&student, &solution, 0.01, Some("C5:D6"));

        assert_eq!(result.total_cells, 3);
        assert_eq!(result.correct_cells, 1);
        let cells: Vec<_> = result.mismatches.iter().map(|m| m.cell.as_str()).collect();
        assert_eq!(cells, vec!["D5", "C6"]);
        assert_eq!(result.mismatches[0].actual, "");
        assert_eq!(result.mismatches[0].expected, "2");
    }

    #[test]
    fn test_extra_learner_cells_count_against() {
        let student = grid(vec![vec!["1", "stray"]]);
        let solution = grid(vec![vec!["1"]]);
        let result = compare(&student, &solution, 0.01, Some("A1"));

        assert_eq!(result.total_cells, 2);
        assert_eq!(result.score(), 50);
        assert_eq!(result.mismatches[0].cell, "B1");
        assert_eq!(result.mismatches[0].expected, "");
    }

    #[test]
    fn test_malformed_range_falls_back_to_a1() {
        let student = grid(vec![vec!["x", "y"]]);
        let solution = grid(vec![vec!["x", "z"]]);

        let origin = RangeOrigin::from_descriptor(Some("1A:??"));
        assert!(origin.is_fallback());

        let result = compare_from(&student, &solution, 0.01, &origin);
        assert_eq!(result.correct_cells, 1);
        assert_eq!(result.mismatches[0].cell, "B1");

        let result = compare(&student, &solution, 0.01, None);
        assert_eq!(result.mismatches[0].cell, "B1");

        assert!(RangeOrigin::from_descriptor(Some("Answers")).is_fallback());
    }

    #[test]
    fn test_open_ended_ranges_keep_their_start() {
        let student = grid(vec![vec!["1"], vec!["2"]]);
        let solution = grid(vec![vec!["1"], vec!["3"]]);

        let origin = RangeOrigin::from_descriptor(Some("O3:O"));
        assert!(!origin.is_fallback());
        let result = compare_from(&student, &solution, 0.01, &origin);
        assert_eq!(result.mismatches[0].cell, "O4");

        let result = compare(&student, &solution, 0.01, Some("Sheet1!C:C"));
        assert_eq!(result.mismatches[0].cell, "C2");
    }

    #[test]
    fn test_columns_past_z() {
        let student = Grid::from_rows(vec![(0..4).map(|_| "x").collect::<Vec<_>>()]);
        let solution = Grid::from_rows(vec![(0..4).map(|_| "y").collect::<Vec<_>>()]);
        let result = compare(&student, &solution, 0.01, Some("Sheet1!Y3:AB3"));

        let cells: Vec<_> = result.mismatches.iter().map(|m| m.cell.as_str()).collect();
        assert_eq!(cells, vec!["Y3", "Z3", "AA3", "AB3"]);
    }

    #[test]
    fn test_empty_grids_score_zero() {
        let result = compare(&Grid::new(), &Grid::new(), 0.01, Some("A1:B2"));
        assert_eq!(result.total_cells, 0);
        assert_eq!(result.score(), 0);
        assert!(!result.is_success());
    }

    #[test]
    fn test_rounding_can_reach_full_score() {
        let solution = Grid::from_rows((0..1000).map(|i| vec![CellValue::from(i)]));
        let mut rows: Vec<Vec<CellValue>> = (0..1000).map(|i| vec![CellValue::from(i)]).collect();
        rows[7][0] = CellValue::from("wrong");
        let student = Grid::from(rows);

        let result = compare(&student, &solution, 0.01, Some("A1:A1000"));
        assert_eq!(result.correct_cells, 999);
        assert_eq!(result.mismatches.len(), 1);
        assert_eq!(result.mismatches[0].cell, "A8");
        assert_eq!(result.score(), 100);
        assert!(result.is_success());
    }
}
