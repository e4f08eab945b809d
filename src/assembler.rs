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

//! Remessa assembly.
//!
//! The [`Assembler`] is the central component: it validates the input, asks
//! the selected bank profile for every record in file order, and derives all
//! trailer counts from the lines it has actually produced.
//!
//! # Assembly
//!
//! - **CNAB 240**: file header, then per lot a lot header, the detail
//!   segments of each payment (numbered from 1 within the lot), and a lot
//!   trailer; finally the file trailer.
//! - **CNAB 400**: header, detail records, trailer. Lots do not exist, so
//!   grouped payments are written in order as one run.
//!
//! Assembly is all-or-nothing: any error aborts the run and no partial file
//! is returned. Before a [`Remessa`] is handed back every line is audited
//! for width, record-type discriminator, sequence numbers and trailer counts.

use crate::banks::{
    Bank, BankProfile, Cnab240, Cnab400, FileContext, FileTotals, LotSummary, Records,
};
use crate::error::{FieldError, RemessaError};
use crate::model::{Creditor, Payment};
use crate::record::{Layout, Record, RecordKind};
use crate::remessa::Remessa;
use crate::validator::{self, BASE_RULES, FieldRule};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Per-call settings threaded into every assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyOptions {
    /// Stamped into headers as generation date and time.
    pub generated_at: NaiveDateTime,
}

impl AssemblyOptions {
    pub fn new(generated_at: NaiveDateTime) -> Self {
        Self { generated_at }
    }
}

/// Builds remessa files for one bank.
///
/// The assembler holds no state between calls; a single instance may
/// assemble any number of files, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Assembler {
    bank: Bank,
    options: AssemblyOptions,
}

impl Assembler {
    pub fn new(bank: Bank, options: AssemblyOptions) -> Self {
        Self { bank, options }
    }

    /// Selects the bank by its three-digit code.
    ///
    /// # Errors
    ///
    /// [`RemessaError::UnsupportedBank`] for unknown codes. Nothing is
    /// validated or rendered.
    pub fn for_code(code: &str, options: AssemblyOptions) -> Result<Self, RemessaError> {
        Ok(Self::new(Bank::from_code(code)?, options))
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Assembles one file with all `payments` in a single lot.
    ///
    /// `sequence` is the caller-tracked file sequence number.
    ///
    /// # Errors
    ///
    /// - [`RemessaError::Validation`] - Creditor or payment data is incomplete;
    ///   no line is produced.
    /// - [`RemessaError::InvalidField`] - A value does not fit its columns.
    /// - [`RemessaError::ChecksumInput`] - A check digit was asked of non-digits.
    pub fn assemble(
        &self,
        creditor: &Creditor,
        payments: &[Payment],
        sequence: u32,
    ) -> Result<Remessa, RemessaError> {
        self.assemble_lots(creditor, &[payments], sequence)
    }

    /// Assembles one file with payments grouped into explicit lots, in order.
    ///
    /// # Errors
    ///
    /// Same as [`Assembler::assemble`].
    pub fn assemble_lots(
        &self,
        creditor: &Creditor,
        lots: &[&[Payment]],
        sequence: u32,
    ) -> Result<Remessa, RemessaError> {
        let profile = self.bank.profile();

        let rules: Vec<FieldRule> = BASE_RULES
            .iter()
            .chain(profile.creditor_rules())
            .copied()
            .collect();
        let limits = profile.payment_limits(creditor);
        if let Err(error) = validator::validate(creditor, &rules, limits, lots) {
            warn!(
                bank = profile.code(),
                violations = error.violations().len(),
                "remessa input rejected: {error}"
            );
            return Err(error.into());
        }

        let ctx = FileContext {
            creditor,
            sequence,
            generated_at: self.options.generated_at,
        };
        let records = match profile.records() {
            Records::Cnab240(renderer) => assemble_240(renderer, &ctx, lots)?,
            Records::Cnab400(renderer) => assemble_400(renderer, &ctx, lots)?,
        };

        let layout = profile.layout();
        audit(profile.code(), layout, &records)?;

        info!(
            bank = profile.code(),
            sequence,
            lines = records.len(),
            "remessa assembled"
        );
        Ok(Remessa::new(self.bank, layout, records))
    }
}

fn assemble_240(
    renderer: &dyn Cnab240,
    ctx: &FileContext<'_>,
    lots: &[&[Payment]],
) -> Result<Vec<Record>, RemessaError> {
    let mut records = vec![renderer.file_header(ctx)?];
    let mut lot_number = 0u32;

    for lot in lots {
        lot_number += 1;
        let lot_start = records.len();
        records.push(renderer.lot_header(ctx, lot_number)?);

        let mut sequence = 1u32;
        for payment in *lot {
            let segments = renderer.detail_segments(ctx, lot_number, sequence, payment)?;
            sequence += segments.len() as u32;
            records.extend(segments);
        }

        let summary = LotSummary {
            // Lines since the lot header, plus the trailer about to be written
            records: records.len() - lot_start + 1,
            payments: lot.len(),
            total_amount: lot.iter().map(|p| p.amount).sum(),
        };
        records.push(renderer.lot_trailer(lot_number, &summary)?);
        debug!(
            bank = renderer.code(),
            lot = lot_number,
            payments = summary.payments,
            lines = summary.records,
            "lot assembled"
        );
    }

    let totals = FileTotals {
        lots: lots.len(),
        records: records.len() + 1,
    };
    records.push(renderer.file_trailer(&totals)?);
    Ok(records)
}

fn assemble_400(
    renderer: &dyn Cnab400,
    ctx: &FileContext<'_>,
    lots: &[&[Payment]],
) -> Result<Vec<Record>, RemessaError> {
    let mut records = vec![renderer.header(ctx)?];
    for payment in lots.iter().flat_map(|lot| lot.iter()) {
        let next = records.len() as u32 + 1;
        records.extend(renderer.details(ctx, next, payment)?);
    }
    let next = records.len() as u32 + 1;
    records.push(renderer.trailer(ctx, next)?);
    Ok(records)
}

/// Checks every line against the structure it sits in.
fn audit(bank: &'static str, layout: Layout, records: &[Record]) -> Result<(), RemessaError> {
    let mismatch = |record: &Record, field, expected: String, found: Option<&str>| {
        RemessaError::InvalidField {
            bank,
            record: record.kind(),
            field,
            reason: FieldError::Mismatch {
                expected,
                found: found.unwrap_or_default().to_string(),
            },
        }
    };
    let check = |record: &Record, field, range, expected: String| {
        let found = record.columns(range);
        if found == Some(expected.as_str()) {
            Ok(())
        } else {
            Err(mismatch(record, field, expected, found))
        }
    };

    let column = layout.discriminator_column();
    let mut lot_start = 0;
    let mut lots = 0;
    let mut segment_sequence = 0;

    for (index, record) in records.iter().enumerate() {
        if record.len() != layout.width() {
            return Err(RemessaError::InvalidField {
                bank,
                record: record.kind(),
                field: "layout",
                reason: FieldError::Mismatch {
                    expected: layout.width().to_string(),
                    found: record.len().to_string(),
                },
            });
        }
        let kind = record.kind();
        let expected_role = match index {
            0 => Some(RecordKind::FileHeader),
            i if i + 1 == records.len() => Some(RecordKind::FileTrailer),
            _ => None,
        };
        let misplaced = match expected_role {
            Some(role) => kind != role,
            None => matches!(kind, RecordKind::FileHeader | RecordKind::FileTrailer),
        };
        if misplaced {
            let expected = expected_role
                .map_or_else(|| "a lot or detail record".to_string(), |r| r.to_string());
            let found = kind.to_string();
            return Err(mismatch(record, "record_type", expected, Some(&found)));
        }

        let discriminator = kind.discriminator(layout).to_string();
        check(record, "record_type", column..=column, discriminator)?;

        match (layout, kind) {
            (Layout::Cnab400, _) => {
                check(record, "sequence", 395..=400, format!("{:06}", index + 1))?;
            }
            (Layout::Cnab240, RecordKind::LotHeader) => {
                lots += 1;
                lot_start = index;
                segment_sequence = 0;
            }
            (Layout::Cnab240, RecordKind::Segment(_)) => {
                segment_sequence += 1;
                check(record, "sequence", 9..=13, format!("{segment_sequence:05}"))?;
            }
            (Layout::Cnab240, RecordKind::LotTrailer) => {
                let lines = index - lot_start + 1;
                check(record, "record_count", 18..=23, format!("{lines:06}"))?;
            }
            (Layout::Cnab240, RecordKind::FileTrailer) => {
                check(record, "lot_count", 18..=23, format!("{lots:06}"))?;
                check(record, "record_count", 24..=29, format!("{:06}", records.len()))?;
            }
            _ => {}
        }
    }
    Ok(())
}
