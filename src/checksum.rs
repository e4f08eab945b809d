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

//! Check-digit (DV) algorithms.
//!
//! Two families cover every bank profile in this crate:
//!
//! - [`mod10`]: right-to-left weights 2,1,2,1...; products above 9 have 9
//!   subtracted; DV = `(10 - sum % 10) % 10`.
//! - [`mod11`]: right-to-left weights cycling `2..=max_weight`; raw DV =
//!   `11 - sum % 11`, then remapped by a per-bank [`Mod11Policy`].
//!
//! ```
//! use cnab_remessa::checksum::{self, Mod11Policy};
//!
//! assert_eq!(checksum::mod10("452378292").unwrap(), '0');
//! assert_eq!(checksum::mod11("6", Mod11Policy::BARCODE).unwrap(), '1');
//! ```

use crate::error::RemessaError;

/// How a mod-11 variant weights digits and remaps raw check digits.
///
/// The raw DV is `11 - sum % 11`, so it always falls in `1..=11`. Raw values
/// listed in `substitutions` are replaced; any other raw value above 9
/// collapses to `'0'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mod11Policy {
    /// Highest weight before cycling back to 2.
    pub max_weight: u32,
    /// `(raw DV, rendered DV)` replacements.
    pub substitutions: &'static [(u32, char)],
}

impl Mod11Policy {
    /// Barcode general digit: 0, 1, 10 and 11 all become `1`.
    pub const BARCODE: Self = Self {
        max_weight: 9,
        substitutions: &[(0, '1'), (1, '1'), (10, '1'), (11, '1')],
    };

    /// Bank code check digit printed beside the bank logo (`341-7`).
    pub const BANK_CODE: Self = Self {
        max_weight: 9,
        substitutions: &[],
    };

    /// Santander our number and account: remainders 0 and 1 give `0`.
    pub const SANTANDER: Self = Self {
        max_weight: 9,
        substitutions: &[(10, '0'), (11, '0')],
    };

    /// Caixa SIGCB: any raw DV above 9 gives `0`.
    pub const CAIXA: Self = Self {
        max_weight: 9,
        substitutions: &[(10, '0'), (11, '0')],
    };

    /// Banco do Brasil: 10 renders as `X`.
    pub const BANCO_DO_BRASIL: Self = Self {
        max_weight: 9,
        substitutions: &[(10, 'X'), (11, '0')],
    };

    /// Bradesco base 7: 10 renders as `P`.
    pub const BRADESCO: Self = Self {
        max_weight: 7,
        substitutions: &[(10, 'P'), (11, '0')],
    };

    fn render(&self, raw: u32) -> char {
        if let Some(&(_, dv)) = self.substitutions.iter().find(|(r, _)| *r == raw) {
            return dv;
        }
        char::from_digit(raw, 10).unwrap_or('0')
    }
}

fn digit_values(input: &str) -> Result<Vec<u32>, RemessaError> {
    if input.is_empty() {
        return Err(RemessaError::ChecksumInput {
            input: input.to_string(),
        });
    }
    input
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| RemessaError::ChecksumInput {
            input: input.to_string(),
        })
}

/// Mod-10 check digit (Luhn-style, 2-1 weights from the right).
///
/// # Errors
///
/// [`RemessaError::ChecksumInput`] if `input` is empty or has a non-digit.
pub fn mod10(input: &str) -> Result<char, RemessaError> {
    let sum: u32 = digit_values(input)?
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| {
            let product = if i % 2 == 0 { d * 2 } else { *d };
            if product > 9 { product - 9 } else { product }
        })
        .sum();
    let dv = (10 - sum % 10) % 10;
    Ok(char::from_digit(dv, 10).unwrap_or('0'))
}

/// Weighted sum used by [`mod11`], exposed for bank rules that need the
/// remainder itself.
pub fn mod11_sum(input: &str, max_weight: u32) -> Result<u32, RemessaError> {
    let mut weight = 2;
    let mut sum = 0;
    for d in digit_values(input)?.iter().rev() {
        sum += d * weight;
        weight = if weight >= max_weight { 2 } else { weight + 1 };
    }
    Ok(sum)
}

/// Mod-11 check digit under `policy`.
///
/// # Errors
///
/// [`RemessaError::ChecksumInput`] if `input` is empty or has a non-digit.
pub fn mod11(input: &str, policy: Mod11Policy) -> Result<char, RemessaError> {
    let sum = mod11_sum(input, policy.max_weight)?;
    Ok(policy.render(11 - sum % 11))
}
