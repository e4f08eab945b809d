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

//! Error types for remessa assembly.

use crate::record::RecordKind;
use std::fmt;
use thiserror::Error;

/// Remessa assembly errors.
///
/// Assembly is all-or-nothing: any of these aborts the run and no partial
/// file is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemessaError {
    /// Creditor or payment data violates presence/length constraints
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A value cannot be rendered into its fixed-width column range
    #[error("bank {bank}, {record}: field `{field}` {reason}")]
    InvalidField {
        bank: &'static str,
        record: RecordKind,
        field: &'static str,
        reason: FieldError,
    },

    /// A barcode component cannot be rendered at its width
    #[error("bank {bank}, barcode: field `{field}` {reason}")]
    Barcode {
        bank: &'static str,
        field: &'static str,
        reason: FieldError,
    },

    /// No profile is registered for the requested bank code
    #[error("unsupported bank `{0}`")]
    UnsupportedBank(String),

    /// A checksum routine received non-digit input
    #[error("checksum input `{input}` is not digit-only")]
    ChecksumInput { input: String },

    /// Output format is not one of the enumerated formats (or not supported by the renderer)
    #[error("unsupported output format `{0}`")]
    UnsupportedFormat(String),
}

/// Field-level rendering failure, without record context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Value is not digit-only where a numeric field is required
    #[error("is not numeric: `{0}`")]
    NotNumeric(String),

    /// Value does not fit its width and the field forbids truncation
    #[error("has {len} digits, exceeds width {width}")]
    TooLong { width: usize, len: usize },

    /// Monetary or counter value is negative
    #[error("is negative")]
    Negative,

    /// Column range lies outside the record
    #[error("column range {begin}-{end} is outside the record")]
    OutOfRecord { begin: usize, end: usize },

    /// Column range overlaps a previously written field
    #[error("column range {begin}-{end} overlaps a written field")]
    Overlap { begin: usize, end: usize },

    /// Record finished with columns nobody wrote
    #[error("leaves column {0} unwritten")]
    Unwritten(usize),

    /// Assembled content disagrees with the file structure around it
    #[error("holds `{found}`, expected `{expected}`")]
    Mismatch { expected: String, found: String },
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Absent,
    OutOfBounds,
    InvalidTaxDocument,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::InvalidTaxDocument => write!(f, "must have 11 or 14 digits"),
        }
    }
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `payments[1].debtor.document`.
    pub field: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.kind)
    }
}

/// Every violation found in one validation pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed: {}", join(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns the violation recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.field == field)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
