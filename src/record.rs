// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Fixed-width records and the positional builder that writes them.
//!
//! Columns are addressed the way bank layout manuals print them: 1-based,
//! inclusive ranges (`18..=32`). A [`RecordBuilder`] starts blank and every
//! column must be written exactly once before [`RecordBuilder::finish`]
//! accepts the record.

use crate::error::{FieldError, RemessaError};
use crate::format;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;
use std::ops::RangeInclusive;

/// The two national interchange standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// 240 columns, records grouped into lots.
    Cnab240,
    /// 400 columns, flat.
    Cnab400,
}

impl Layout {
    pub const fn width(self) -> usize {
        match self {
            Self::Cnab240 => 240,
            Self::Cnab400 => 400,
        }
    }

    /// 1-based column holding the record-type discriminator.
    pub const fn discriminator_column(self) -> usize {
        match self {
            Self::Cnab240 => 8,
            Self::Cnab400 => 1,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cnab240 => write!(f, "CNAB 240"),
            Self::Cnab400 => write!(f, "CNAB 400"),
        }
    }
}

/// Structural role of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    FileHeader,
    LotHeader,
    /// CNAB 240 detail segment (`P`, `Q`, `R`).
    Segment(char),
    /// CNAB 400 detail record; carries its type code (`1`, `2`).
    Detail(char),
    LotTrailer,
    FileTrailer,
}

impl RecordKind {
    /// Discriminator this kind must carry under `layout`.
    pub fn discriminator(self, layout: Layout) -> char {
        match (layout, self) {
            (_, Self::FileHeader) => '0',
            (_, Self::FileTrailer) => '9',
            (Layout::Cnab240, Self::LotHeader) => '1',
            (Layout::Cnab240, Self::LotTrailer) => '5',
            (Layout::Cnab240, Self::Segment(_)) => '3',
            (_, Self::Detail(code)) => code,
            // Lots do not exist in CNAB 400
            (Layout::Cnab400, _) => '?',
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileHeader => write!(f, "file header"),
            Self::LotHeader => write!(f, "lot header"),
            Self::Segment(segment) => write!(f, "segment {segment}"),
            Self::Detail(code) => write!(f, "detail type {code}"),
            Self::LotTrailer => write!(f, "lot trailer"),
            Self::FileTrailer => write!(f, "file trailer"),
        }
    }
}

/// One rendered fixed-width line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: RecordKind,
    line: String,
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Text at the 1-based inclusive column range, if in bounds.
    pub fn columns(&self, range: RangeInclusive<usize>) -> Option<&str> {
        let (begin, end) = range.into_inner();
        if begin == 0 || begin > end {
            return None;
        }
        self.line.get(begin - 1..end)
    }

    pub fn into_string(self) -> String {
        self.line
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Positional writer for a single record.
///
/// ```
/// use cnab_remessa::record::{Layout, RecordBuilder, RecordKind};
///
/// let mut r = RecordBuilder::new(Layout::Cnab400, RecordKind::FileTrailer, "341");
/// r.constant("record_type", 1..=1, "9")?;
/// r.blank("reserved", 2..=394)?;
/// r.number("sequence", 395..=400, 3)?;
/// let record = r.finish()?;
/// assert_eq!(record.columns(395..=400), Some("000003"));
/// # Ok::<(), cnab_remessa::RemessaError>(())
/// ```
#[derive(Debug)]
pub struct RecordBuilder {
    bank: &'static str,
    kind: RecordKind,
    buf: Vec<u8>,
    written: Vec<bool>,
}

impl RecordBuilder {
    pub fn new(layout: Layout, kind: RecordKind, bank: &'static str) -> Self {
        Self {
            bank,
            kind,
            buf: vec![b' '; layout.width()],
            written: vec![false; layout.width()],
        }
    }

    fn error(&self, field: &'static str, reason: FieldError) -> RemessaError {
        RemessaError::InvalidField {
            bank: self.bank,
            record: self.kind,
            field,
            reason,
        }
    }

    /// Writes an already-sized ASCII value at `range`, claiming the columns.
    fn put(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: &str,
    ) -> Result<&mut Self, RemessaError> {
        let (begin, end) = range.into_inner();
        if begin == 0 || begin > end || end > self.buf.len() {
            return Err(self.error(field, FieldError::OutOfRecord { begin, end }));
        }
        if value.len() != end - begin + 1 || !value.is_ascii() {
            return Err(self.error(
                field,
                FieldError::TooLong {
                    width: end - begin + 1,
                    len: value.len(),
                },
            ));
        }
        if self.written[begin - 1..end].iter().any(|&w| w) {
            return Err(self.error(field, FieldError::Overlap { begin, end }));
        }
        self.written[begin - 1..end].fill(true);
        self.buf[begin - 1..end].copy_from_slice(value.as_bytes());
        Ok(self)
    }

    fn width(range: &RangeInclusive<usize>) -> usize {
        (range.end() + 1).saturating_sub(*range.start())
    }

    /// Left-justified, space-filled text, clipped to the column width.
    pub fn text(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: &str,
    ) -> Result<&mut Self, RemessaError> {
        let width = Self::width(&range);
        let value = format::right_pad(&format::ascii_fold(value), width, ' ');
        self.put(field, range, &value)
    }

    /// Right-justified, space-filled text, clipped to the column width.
    pub fn text_right(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: &str,
    ) -> Result<&mut Self, RemessaError> {
        let width = Self::width(&range);
        let value = format::left_pad(&format::ascii_fold(value), width, ' ');
        self.put(field, range, &value)
    }

    /// Right-justified text padded with `fill`, for alphanumeric identifiers
    /// banks expect zero-filled.
    pub fn left_padded(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: &str,
        fill: char,
    ) -> Result<&mut Self, RemessaError> {
        let width = Self::width(&range);
        let value = format::left_pad(format::ascii_fold(value).trim(), width, fill);
        self.put(field, range, &value)
    }

    /// Literal value that must fill the range exactly.
    pub fn constant(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: &str,
    ) -> Result<&mut Self, RemessaError> {
        self.put(field, range, value)
    }

    /// Zero-filled digits. Fails rather than truncating.
    pub fn numeric(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: &str,
    ) -> Result<&mut Self, RemessaError> {
        let width = Self::width(&range);
        let value = format::numeric(value, width).map_err(|e| self.error(field, e))?;
        self.put(field, range, &value)
    }

    /// Zero-filled counter.
    pub fn number(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: u64,
    ) -> Result<&mut Self, RemessaError> {
        self.numeric(field, range, &value.to_string())
    }

    /// Monetary amount with two implied decimals.
    pub fn amount(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: Decimal,
    ) -> Result<&mut Self, RemessaError> {
        self.decimal(field, range, value, 2)
    }

    /// Fixed-point value with `scale` implied decimals.
    pub fn decimal(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: Decimal,
        scale: u32,
    ) -> Result<&mut Self, RemessaError> {
        let width = Self::width(&range);
        let value = format::decimal(value, scale, width).map_err(|e| self.error(field, e))?;
        self.put(field, range, &value)
    }

    /// `DDMMYYYY` (8 columns) or `DDMMYY` (6 columns); zeros when absent.
    pub fn date(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: Option<NaiveDate>,
    ) -> Result<&mut Self, RemessaError> {
        let width = Self::width(&range);
        let value = format::date(value, width).map_err(|e| self.error(field, e))?;
        self.put(field, range, &value)
    }

    /// `HHMMSS`.
    pub fn time(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        value: NaiveDateTime,
    ) -> Result<&mut Self, RemessaError> {
        let value = value.format("%H%M%S").to_string();
        self.numeric(field, range, &value)
    }

    /// Fills the range with spaces.
    pub fn blank(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
    ) -> Result<&mut Self, RemessaError> {
        self.fill(field, range, ' ')
    }

    /// Fills the range with zeros.
    pub fn zeros(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
    ) -> Result<&mut Self, RemessaError> {
        self.fill(field, range, '0')
    }

    pub fn fill(
        &mut self,
        field: &'static str,
        range: RangeInclusive<usize>,
        fill: char,
    ) -> Result<&mut Self, RemessaError> {
        let width = Self::width(&range);
        let value = fill.to_string().repeat(width);
        self.put(field, range, &value)
    }

    /// Single character column.
    pub fn flag(
        &mut self,
        field: &'static str,
        column: usize,
        value: char,
    ) -> Result<&mut Self, RemessaError> {
        let mut buf = [0u8; 4];
        self.constant(field, column..=column, value.encode_utf8(&mut buf))
    }

    /// Closes the record.
    ///
    /// # Errors
    ///
    /// [`FieldError::Unwritten`] if any column was never written.
    pub fn finish(self) -> Result<Record, RemessaError> {
        if let Some(gap) = self.written.iter().position(|&w| !w) {
            return Err(self.error("layout", FieldError::Unwritten(gap + 1)));
        }
        let Self { bank, kind, buf, .. } = self;
        let line = String::from_utf8(buf).map_err(|_| RemessaError::InvalidField {
            bank,
            record: kind,
            field: "layout",
            reason: FieldError::NotNumeric("non-ASCII content".into()),
        })?;
        Ok(Record { kind, line })
    }
}
