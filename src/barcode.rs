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

//! Barcode and digitable line composition.
//!
//! A boleto barcode is 44 digits:
//!
//! | positions | content |
//! |-----------|---------|
//! | 1-3 | bank code |
//! | 4 | currency (`9`, real) |
//! | 5 | general check digit |
//! | 6-9 | due factor |
//! | 10-19 | amount, two implied decimals |
//! | 20-44 | bank-defined free field |

use crate::checksum::{self, Mod11Policy};
use crate::error::{FieldError, RemessaError};
use crate::format;
use crate::model::Payment;
use chrono::NaiveDate;

/// Barcode length in digits.
pub const BARCODE_LEN: usize = 44;

/// Free field length in digits.
pub const FREE_FIELD_LEN: usize = 25;

const CURRENCY: char = '9';

/// Days since 1997-10-07, rolled back to 1000 once past 9999.
pub fn due_factor(due: NaiveDate) -> u32 {
    let Some(base) = NaiveDate::from_ymd_opt(1997, 10, 7) else {
        return 0;
    };
    let days = (due - base).num_days().max(0);
    let factor = if days > 9999 {
        (days - 10_000) % 9_000 + 1_000
    } else {
        days
    };
    u32::try_from(factor).unwrap_or(0)
}

/// Assembles the 44-digit barcode of `payment` under `bank`.
///
/// # Errors
///
/// [`RemessaError::Barcode`] if the free field is not 25 digits or the
/// amount does not fit ten digits.
pub fn compose(
    bank: &'static str,
    payment: &Payment,
    free_field: &str,
) -> Result<String, RemessaError> {
    let error = |field, reason| RemessaError::Barcode {
        bank,
        field,
        reason,
    };
    if free_field.len() != FREE_FIELD_LEN {
        return Err(error(
            "free_field",
            FieldError::TooLong {
                width: FREE_FIELD_LEN,
                len: free_field.len(),
            },
        ));
    }
    let free_field =
        format::numeric(free_field, FREE_FIELD_LEN).map_err(|e| error("free_field", e))?;
    let bank_code = format::numeric(bank, 3).map_err(|e| error("bank_code", e))?;
    let factor = format::numeric(&due_factor(payment.due_date).to_string(), 4)
        .map_err(|e| error("due_factor", e))?;
    let amount = format::decimal(payment.amount, 2, 10).map_err(|e| error("amount", e))?;

    let head = format!("{bank_code}{CURRENCY}");
    let tail = format!("{factor}{amount}{free_field}");
    let dv = checksum::mod11(&format!("{head}{tail}"), Mod11Policy::BARCODE)?;
    Ok(format!("{head}{dv}{tail}"))
}

/// The 47-digit typeable line of a barcode, grouped for display:
/// `AAAAA.AAAAA BBBBB.BBBBBB CCCCC.CCCCCC D EEEEEEEEEEEEEE`.
///
/// # Errors
///
/// [`RemessaError::ChecksumInput`] if `barcode` is not 44 digits.
pub fn digitable_line(barcode: &str) -> Result<String, RemessaError> {
    if barcode.len() != BARCODE_LEN || !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err(RemessaError::ChecksumInput {
            input: barcode.to_string(),
        });
    }
    let field1 = format!("{}{}", &barcode[0..4], &barcode[19..24]);
    let field2 = &barcode[24..34];
    let field3 = &barcode[34..44];

    let dv1 = checksum::mod10(&field1)?;
    let dv2 = checksum::mod10(field2)?;
    let dv3 = checksum::mod10(field3)?;

    Ok(format!(
        "{}.{}{dv1} {}.{}{dv2} {}.{}{dv3} {} {}",
        &field1[..5],
        &field1[5..],
        &field2[..5],
        &field2[5..],
        &field3[..5],
        &field3[5..],
        &barcode[4..5],
        &barcode[5..19],
    ))
}
