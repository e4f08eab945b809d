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

//! Fixed-width field formatting.
//!
//! Pure helpers that pad, clip and zero-fill values to an exact width. Every
//! function here returns exactly `width` characters (or an error); nothing
//! rounds by locale or wraps text.
//!
//! ```
//! use cnab_remessa::format;
//!
//! assert_eq!(format::right_pad("ABC", 5, ' '), "ABC  ");
//! assert_eq!(format::left_pad("42", 5, '0'), "00042");
//! assert_eq!(format::numeric("42", 5).unwrap(), "00042");
//! ```

use crate::error::FieldError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Left-aligns `value` and fills the remainder on the right with `fill`.
///
/// Longer values are clipped to `width`.
pub fn right_pad(value: &str, width: usize, fill: char) -> String {
    let mut out: String = value.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(fill, width - len));
    out
}

/// Right-aligns `value` and fills the remainder on the left with `fill`.
///
/// Longer values are clipped to `width`, dropping trailing characters.
pub fn left_pad(value: &str, width: usize, fill: char) -> String {
    let clipped = truncate(value, width);
    let len = clipped.chars().count();
    let mut out: String = std::iter::repeat_n(fill, width - len).collect();
    out.push_str(&clipped);
    out
}

/// Keeps at most `width` leading characters.
pub fn truncate(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

/// Zero-filled, right-justified digits.
///
/// # Errors
///
/// - [`FieldError::NotNumeric`] if `value` has a non-digit character.
/// - [`FieldError::TooLong`] if `value` has more than `width` digits.
pub fn numeric(value: &str, width: usize) -> Result<String, FieldError> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::NotNumeric(value.to_string()));
    }
    if value.len() > width {
        return Err(FieldError::TooLong {
            width,
            len: value.len(),
        });
    }
    Ok(left_pad(value, width, '0'))
}

/// Fixed-point digits of `value` with `scale` implied decimals, zero-filled.
///
/// `150.00` at scale 2 and width 15 renders as `000000000015000`.
pub fn decimal(value: Decimal, scale: u32, width: usize) -> Result<String, FieldError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FieldError::Negative);
    }
    let mut scaled = value.round_dp(scale);
    scaled.rescale(scale);
    let digits = scaled
        .mantissa()
        .to_u128()
        .ok_or(FieldError::Negative)?
        .to_string();
    numeric(&digits, width)
}

/// `DDMMYYYY` for width 8, `DDMMYY` for width 6; zeros when absent.
pub fn date(value: Option<NaiveDate>, width: usize) -> Result<String, FieldError> {
    let Some(date) = value else {
        return Ok("0".repeat(width));
    };
    let rendered = match width {
        6 => date.format("%d%m%y").to_string(),
        _ => date.format("%d%m%Y").to_string(),
    };
    numeric(&rendered, width)
}

/// Keeps only ASCII digits (strips `.`, `-`, `/` from tax documents and CEPs).
pub fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Folds Portuguese accents to ASCII and uppercases.
///
/// Characters with no ASCII counterpart become a blank so the width is kept.
pub fn ascii_fold(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            let folded = match c {
                'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
                'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'E',
                'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
                'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
                'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
                'ç' | 'Ç' => 'C',
                'ñ' | 'Ñ' => 'N',
                'º' | '°' => 'O',
                'ª' => 'A',
                c if c.is_ascii() && !c.is_ascii_control() => c,
                _ => ' ',
            };
            folded.to_ascii_uppercase()
        })
        .collect()
}
