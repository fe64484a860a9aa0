//! Row-major grid of cell values

use crate::cell::{CellRange, CellValue};

static EMPTY: CellValue = CellValue::Empty;

/// An ordered sequence of rows of cell values
///
/// Rows are not required to have equal length: a short row behaves as if it
/// were padded with [`CellValue::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from nested rows of anything convertible to [`CellValue`]
    pub fn from_rows<R, V>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Append a row
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    /// Number of rows, including empty ones
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of a row; rows past the end have length 0
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map_or(0, Vec::len)
    }

    /// Check whether the grid has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the value at `(row, col)`, or `Empty` outside the stored cells
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Iterate over the stored rows
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Extract the cells covered by `range`, treating this grid as a sheet
    /// whose first cell is A1. The result is [trimmed](Self::trimmed).
    pub fn window(&self, range: &CellRange) -> Grid {
        let first_row = range.start.row as usize;
        let first_col = range.start.col as usize;
        // Only stored cells can be non-empty, so clamp to them
        let row_end = (range.end.row as usize + 1).min(self.rows.len());

        let rows = (first_row..row_end)
            .map(|r| {
                let col_end = (range.end.col as usize + 1).min(self.row_len(r));
                self.rows[r]
                    .get(first_col..col_end.max(first_col))
                    .map(<[CellValue]>::to_vec)
                    .unwrap_or_default()
            })
            .collect();

        Grid { rows }.trimmed()
    }

    /// Drop trailing [blank](CellValue::is_blank) cells from every row, then
    /// trailing empty rows
    ///
    /// Spreadsheet values APIs omit trailing blanks the same way, so a range
    /// with nothing in it comes back as an empty grid. Blank cells between
    /// populated ones are kept as they are.
    pub fn trimmed(mut self) -> Grid {
        for row in &mut self.rows {
            while row.last().is_some_and(CellValue::is_blank) {
                row.pop();
            }
        }
        while self.rows.last().is_some_and(Vec::is_empty) {
            self.rows.pop();
        }
        self
    }
}

impl From<Vec<Vec<CellValue>>> for Grid {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sheet() -> Grid {
        Grid::from_rows(vec![
            vec!["a", "b", "c"],
            vec!["1", "2", "3"],
            vec!["4", "5"],
        ])
    }

    #[test]
    fn test_get_pads_short_rows() {
        let grid = sheet();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.row_len(2), 2);
        assert_eq!(grid.row_len(9), 0);
        assert_eq!(grid.get(2, 1), &CellValue::from("5"));
        assert!(grid.get(2, 2).is_empty());
        assert!(grid.get(10, 0).is_empty());
    }

    #[test]
    fn test_window() {
        let grid = sheet();
        let range = CellRange::parse("B2:C3").unwrap();
        assert_eq!(
            grid.window(&range),
            Grid::from_rows(vec![vec!["2", "3"], vec!["5"]])
        );
    }

    #[test]
    fn test_window_outside_data_is_empty() {
        let grid = sheet();
        let range = CellRange::parse("E10:F12").unwrap();
        assert!(grid.window(&range).is_empty());
    }

    #[test]
    fn test_window_drops_blank_text_at_right_edge() {
        // A blank field followed by data outside the window
        let grid = Grid::from(vec![vec![
            CellValue::from("1"),
            CellValue::from(""),
            CellValue::from("x"),
        ]]);

        let range = CellRange::parse("A1:B1").unwrap();
        assert_eq!(grid.window(&range), Grid::from_rows(vec![vec!["1"]]));

        let range = CellRange::parse("A1:C1").unwrap();
        assert_eq!(grid.window(&range).get(0, 1), &CellValue::from(""));
    }

    #[test]
    fn test_trimmed_keeps_interior_blanks() {
        let grid = Grid::from(vec![
            vec![CellValue::Empty, CellValue::from("x"), CellValue::Empty],
            vec![CellValue::Empty],
            vec![CellValue::from("y")],
            vec![],
        ])
        .trimmed();

        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.row_len(0), 2);
        assert_eq!(grid.row_len(1), 0);
    }
}
