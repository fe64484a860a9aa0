//! A1 addressing: cells, rectangular ranges and sheet-qualified descriptors

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Zero-based position of a cell on a sheet
///
/// Parsed from A1 notation. `$` markers (`$O$3`) are accepted and dropped:
/// descriptors copied from a formula bar often carry them and they do not
/// change which cell is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    pub col: u16,
}

impl CellAddress {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// `A1`
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Parse `B7`, `$O$3` or `xfd12`
    ///
    /// ```
    /// use gridmark_core::CellAddress;
    ///
    /// assert_eq!(CellAddress::parse("A1").unwrap(), CellAddress::new(0, 0));
    /// assert_eq!(CellAddress::parse("$O$3").unwrap(), CellAddress::new(2, 14));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = |why: &str| Error::InvalidAddress(format!("{} in '{}'", why, text));

        match parse_reference(text)? {
            (Some(col), Some(row)) => Ok(Self::new(row, col)),
            (None, _) => Err(invalid("no column letters")),
            (_, None) => Err(invalid("no row number")),
        }
    }

    /// Bijective base-26 column name: 0 is `A`, 25 is `Z`, 26 is `AA`
    ///
    /// Takes a `u32` so that offsets computed past the sheet limit still
    /// render as a letter sequence instead of wrapping.
    pub fn column_to_letters(col: u32) -> String {
        let mut letters = Vec::new();
        let mut n = col as u64 + 1;
        while n > 0 {
            let digit = (n - 1) % 26;
            letters.push(b'A' + digit as u8);
            n = (n - 1) / 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// Inverse of [`column_to_letters`](Self::column_to_letters), case-insensitive
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut n: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!("invalid column letter '{}'", c)));
            }
            n = n * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            // Checked per letter so long inputs cannot overflow
            if n > MAX_COLS as u32 {
                return Err(Error::ColumnOutOfBounds(n - 1, MAX_COLS - 1));
            }
        }

        Ok((n - 1) as u16)
    }

    /// A1 reference of the cell `row_offset` rows below and `col_offset`
    /// columns right of this one
    ///
    /// ```
    /// use gridmark_core::CellAddress;
    ///
    /// let start = CellAddress::parse("Y3").unwrap();
    /// assert_eq!(start.offset_reference(2, 3), "AB5");
    /// ```
    pub fn offset_reference(&self, row_offset: usize, col_offset: usize) -> String {
        let col = (self.col as u64 + col_offset as u64).min(u32::MAX as u64) as u32;
        let row = self.row as u64 + row_offset as u64 + 1;
        format!("{}{}", Self::column_to_letters(col), row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_to_letters(self.col as u32), self.row as u64 + 1)
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Rectangle of cells, `start` top-left and `end` bottom-right inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl CellRange {
    /// Build the rectangle spanned by two opposite corners, in either order
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        Self {
            start: CellAddress::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellAddress::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Every cell of a sheet
    pub fn whole_sheet() -> Self {
        Self::new(
            CellAddress::origin(),
            CellAddress::new(MAX_ROWS - 1, MAX_COLS - 1),
        )
    }

    /// Parse `A1:B10`, `B10:A1` or a single cell `C3`
    ///
    /// Either side of a colon may leave out its row or its column, and the
    /// missing bound runs to the edge of the sheet: `A:A` is all of column A,
    /// `3:5` rows 3 to 5 and `O3:O` column O from row 3 down.
    ///
    /// ```
    /// use gridmark_core::{CellAddress, CellRange};
    ///
    /// let r = CellRange::parse("O3:O").unwrap();
    /// assert_eq!(r.start, CellAddress::new(2, 14));
    /// assert_eq!(r.col_count(), 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Err(Error::InvalidRange("empty range".into()));
        }
        let invalid = |e: Error| Error::InvalidRange(format!("'{}': {}", text, e));

        let Some((a, b)) = text.split_once(':') else {
            let cell = CellAddress::parse(text).map_err(invalid)?;
            return Ok(Self::new(cell, cell));
        };

        let (start_col, start_row) = parse_reference(a).map_err(invalid)?;
        let (end_col, end_row) = parse_reference(b).map_err(invalid)?;
        if (start_row.is_none() && end_col.is_none()) || (start_col.is_none() && end_row.is_none())
        {
            return Err(Error::InvalidRange(format!(
                "'{}' mixes a whole column with a whole row",
                text
            )));
        }

        Ok(Self::new(
            CellAddress::new(start_row.unwrap_or(0), start_col.unwrap_or(0)),
            CellAddress::new(
                end_row.unwrap_or(MAX_ROWS - 1),
                end_col.unwrap_or(MAX_COLS - 1),
            ),
        ))
    }

    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range descriptor as it appears in exercise configuration,
/// optionally qualified by a sheet name: `Sheet1!A1:B2`, `'Q1 data'!C3`.
///
/// A bare sheet name such as `Answers` is also a descriptor; it covers the
/// whole sheet and has no [`range`](Self::range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    /// Sheet name, with any surrounding quotes removed
    pub sheet: Option<String>,
    /// The cell range on that sheet, `None` when only a sheet is named
    pub range: Option<CellRange>,
}

impl SheetRange {
    /// Parse a possibly sheet-qualified range descriptor
    ///
    /// Text without `!` or `:` that is not a cell reference is taken as a
    /// sheet name.
    ///
    /// ```
    /// use gridmark_core::SheetRange;
    ///
    /// let r = SheetRange::parse("'It''s'!O3:O102").unwrap();
    /// assert_eq!(r.sheet.as_deref(), Some("It's"));
    /// assert_eq!(r.range.unwrap().to_string(), "O3:O102");
    ///
    /// let r = SheetRange::parse("Answers").unwrap();
    /// assert_eq!(r.sheet.as_deref(), Some("Answers"));
    /// assert!(r.range.is_none());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidRange("empty range".into()));
        }

        if let Some(bang) = s.rfind('!') {
            let sheet = unquote_sheet_name(&s[..bang]);
            if sheet.is_empty() {
                return Err(Error::InvalidRange(format!("empty sheet name in '{}'", s)));
            }
            return Ok(Self {
                sheet: Some(sheet),
                range: Some(CellRange::parse(&s[bang + 1..])?),
            });
        }

        if s.contains(':') {
            return Ok(Self {
                sheet: None,
                range: Some(CellRange::parse(s)?),
            });
        }

        Ok(match CellAddress::parse(s) {
            Ok(cell) => Self {
                sheet: None,
                range: Some(CellRange::new(cell, cell)),
            },
            Err(_) => Self {
                sheet: Some(unquote_sheet_name(s)),
                range: None,
            },
        })
    }

    /// The cells covered, the whole sheet when no range was given
    pub fn cells(&self) -> CellRange {
        self.range.unwrap_or_else(CellRange::whole_sheet)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sheet) = &self.sheet {
            write!(f, "'{}'", sheet.replace('\'', "''"))?;
            if self.range.is_some() {
                f.write_str("!")?;
            }
        }
        match &self.range {
            Some(range) => write!(f, "{}", range),
            None => Ok(()),
        }
    }
}

impl FromStr for SheetRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Column and row of an A1 reference, either of which may be left out
/// but not both: `B7`, `$O$3`, `O` or `12`
fn parse_reference(text: &str) -> Result<(Option<u16>, Option<u32>)> {
    let text = text.trim();
    let invalid = |why: &str| Error::InvalidAddress(format!("{} in '{}'", why, text));

    let rest = text.strip_prefix('$').unwrap_or(text);
    let letters_end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let (letters, rest) = rest.split_at(letters_end);
    let col = if letters.is_empty() {
        None
    } else {
        Some(CellAddress::letters_to_column(letters)?)
    };

    let digits = match col {
        Some(_) => rest.strip_prefix('$').unwrap_or(rest),
        None => rest,
    };
    if digits.is_empty() {
        return match col {
            Some(_) => Ok((col, None)),
            None => Err(invalid("no cell reference")),
        };
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("invalid row number"));
    }
    let number: u64 = digits.parse().map_err(|_| invalid("invalid row number"))?;
    if number == 0 {
        return Err(invalid("row numbers start at 1"));
    }
    if number > MAX_ROWS as u64 {
        return Err(Error::RowOutOfBounds(
            (number - 1).min(u32::MAX as u64) as u32,
            MAX_ROWS - 1,
        ));
    }

    Ok((col, Some((number - 1) as u32)))
}

fn unquote_sheet_name(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        raw[1..raw.len() - 1].replace("''", "'")
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters_round_trip_boundaries() {
        let cases = [
            (0, "A"),
            (25, "Z"),
            (26, "AA"),
            (51, "AZ"),
            (52, "BA"),
            (701, "ZZ"),
            (702, "AAA"),
            (16383, "XFD"),
        ];
        for (index, letters) in cases {
            assert_eq!(CellAddress::column_to_letters(index), letters);
            assert_eq!(CellAddress::letters_to_column(letters).unwrap() as u32, index);
        }

        assert_eq!(CellAddress::letters_to_column("o").unwrap(), 14);
        assert!(CellAddress::letters_to_column("XFE").is_err());
        assert!(CellAddress::letters_to_column("AAAAAAAAAA").is_err());
    }

    #[test]
    fn test_parse_addresses() {
        assert_eq!(CellAddress::parse(" b2 ").unwrap(), CellAddress::new(1, 1));
        assert_eq!(CellAddress::parse("$A1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(CellAddress::parse("A$1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(
            CellAddress::parse("XFD1048576").unwrap(),
            CellAddress::new(1_048_575, 16383)
        );
        assert_eq!(CellAddress::new(2, 14).to_string(), "O3");
    }

    #[test]
    fn test_parse_address_errors() {
        for bad in ["", "A", "1", "A0", "A+1", "$$A1", "A1048577", "XFE1", "A99999999999"] {
            assert!(CellAddress::parse(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_offset_reference_crosses_z() {
        let start = CellAddress::origin();
        assert_eq!(start.offset_reference(0, 0), "A1");
        assert_eq!(start.offset_reference(1, 1), "B2");
        assert_eq!(start.offset_reference(0, 26), "AA1");

        let start = CellAddress::parse("Z10").unwrap();
        assert_eq!(start.offset_reference(0, 1), "AA10");
        assert_eq!(start.offset_reference(90, 0), "Z100");
    }

    #[test]
    fn test_parse_ranges() {
        let range = CellRange::parse("A1:B2").unwrap();
        assert_eq!(range.start, CellAddress::new(0, 0));
        assert_eq!(range.end, CellAddress::new(1, 1));
        assert_eq!((range.row_count(), range.col_count()), (2, 2));

        assert_eq!(CellRange::parse("B2:A1").unwrap(), range);
        assert_eq!(CellRange::parse("C1:A3").unwrap().to_string(), "A1:C3");

        let single = CellRange::parse("C3").unwrap();
        assert_eq!(single.start, single.end);
        assert_eq!(single.to_string(), "C3");

        assert!(CellRange::parse("").is_err());
        assert!(CellRange::parse("A1:").is_err());
        assert!(CellRange::parse("not a range").is_err());
    }

    #[test]
    fn test_sheet_range_parse() {
        let r = SheetRange::parse("Sheet1!A1:B2").unwrap();
        assert_eq!(r.sheet.as_deref(), Some("Sheet1"));
        assert_eq!(r.range, Some(CellRange::parse("A1:B2").unwrap()));

        let r = SheetRange::parse("O3:O102").unwrap();
        assert_eq!(r.sheet, None);
        assert_eq!(r.cells().row_count(), 100);

        assert!(SheetRange::parse("!A1").is_err());
        assert!(SheetRange::parse("Sheet1!").is_err());
        assert!(SheetRange::parse("   ").is_err());
        assert_eq!(
            SheetRange::parse("'My Sheet'!A1").unwrap().to_string(),
            "'My Sheet'!A1"
        );
    }

    #[test]
    fn test_open_ended_ranges() {
        let column = CellRange::parse("A:A").unwrap();
        assert_eq!(column.start, CellAddress::origin());
        assert_eq!(column.end, CellAddress::new(MAX_ROWS - 1, 0));

        let tail = CellRange::parse("$O3:$O").unwrap();
        assert_eq!(tail.start, CellAddress::new(2, 14));
        assert_eq!(tail.end, CellAddress::new(MAX_ROWS - 1, 14));

        let rows = CellRange::parse("3:5").unwrap();
        assert_eq!(rows.start, CellAddress::new(2, 0));
        assert_eq!(rows.end, CellAddress::new(4, MAX_COLS - 1));
        assert_eq!(rows.row_count(), 3);

        assert_eq!(CellRange::parse("B:A").unwrap().col_count(), 2);
        assert!(CellRange::parse("A:3").is_err());
        assert!(CellRange::parse("A").is_err());
        assert!(CellRange::parse("3").is_err());
    }

    #[test]
    fn test_bare_sheet_name_covers_whole_sheet() {
        let r = SheetRange::parse("Answers").unwrap();
        assert_eq!(r.sheet.as_deref(), Some("Answers"));
        assert_eq!(r.range, None);
        assert_eq!(r.cells(), CellRange::whole_sheet());
        assert_eq!(r.to_string(), "'Answers'");

        let r = SheetRange::parse("'Q1 data'").unwrap();
        assert_eq!(r.sheet.as_deref(), Some("Q1 data"));

        // A cell reference wins over a sheet of the same name
        let r = SheetRange::parse("C3").unwrap();
        assert_eq!(r.sheet, None);
        assert_eq!(r.cells().to_string(), "C3");

        assert!(SheetRange::parse("1A:??").is_err());
    }
}
