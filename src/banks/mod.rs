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

//! Bank profiles.
//!
//! Every supported institution is one variant of [`Bank`], backed by a
//! stateless profile implementing [`BankProfile`] plus exactly one of the
//! record-rendering traits ([`Cnab240`] or [`Cnab400`]). Adding a bank means
//! adding a variant and its profile; the lookup and the assembler never
//! change.

mod banco_do_brasil;
mod bradesco;
mod caixa;
pub mod cnab240;
pub mod cnab400;
mod itau;
mod placeholder;
mod santander;

pub use banco_do_brasil::BancoDoBrasil;
pub use bradesco::Bradesco;
pub use caixa::Caixa;
pub use cnab240::Cnab240;
pub use cnab400::Cnab400;
pub use itau::Itau;
pub use placeholder::Placeholder;
pub use santander::Santander;

use crate::barcode;
use crate::error::RemessaError;
use crate::format;
use crate::model::{Creditor, Payment};
use crate::record::Layout;
use crate::validator::{FieldRule, PaymentLimits};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Per-file values every record renderer may need.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub creditor: &'a Creditor,
    /// Caller-tracked file sequence number (NSA).
    pub sequence: u32,
    pub generated_at: NaiveDateTime,
}

impl FileContext<'_> {
    pub fn generated_on(&self) -> NaiveDate {
        self.generated_at.date()
    }
}

/// Counts handed to a lot trailer, taken from the lines actually written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotSummary {
    /// Lines from the lot header through the lot trailer, inclusive.
    pub records: usize,
    pub payments: usize,
    pub total_amount: Decimal,
}

/// Counts handed to the file trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileTotals {
    pub lots: usize,
    /// Every line in the file, trailer included.
    pub records: usize,
}

/// Layout version codes published in header records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutVersion {
    pub file: &'static str,
    /// CNAB 240 only.
    pub lot: Option<&'static str>,
}

/// The record renderer a profile provides.
#[derive(Clone, Copy)]
pub enum Records<'a> {
    Cnab240(&'a dyn Cnab240),
    Cnab400(&'a dyn Cnab400),
}

/// Capabilities shared by every bank profile.
pub trait BankProfile: Send + Sync + fmt::Debug {
    /// Three-digit FEBRABAN bank code.
    fn code(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn layout_version(&self) -> LayoutVersion;

    fn records(&self) -> Records<'_>;

    fn layout(&self) -> Layout {
        match self.records() {
            Records::Cnab240(_) => Layout::Cnab240,
            Records::Cnab400(_) => Layout::Cnab400,
        }
    }

    /// Creditor constraints checked before assembly.
    fn creditor_rules(&self) -> &'static [FieldRule];

    fn payment_limits(&self, creditor: &Creditor) -> PaymentLimits;

    /// Account check digit computed from agency and account.
    fn account_check_digit(&self, agency: &str, account: &str) -> Result<char, RemessaError>;

    /// Our-number check digit; each bank picks the algorithm and the digits
    /// that feed it.
    fn our_number_check_digit(
        &self,
        agency: &str,
        account: &str,
        wallet: &str,
        our_number: &str,
    ) -> Result<char, RemessaError>;

    /// Caller-supplied account digit, or the computed one.
    fn resolved_account_check_digit(&self, creditor: &Creditor) -> Result<char, RemessaError> {
        match creditor
            .account_check_digit
            .as_deref()
            .and_then(|dv| dv.trim().chars().next())
        {
            Some(dv) => Ok(dv.to_ascii_uppercase()),
            None => self.account_check_digit(&creditor.agency, &creditor.account),
        }
    }

    /// Check digit of a payment's our number under this creditor.
    fn payment_check_digit(
        &self,
        creditor: &Creditor,
        payment: &Payment,
    ) -> Result<char, RemessaError> {
        self.our_number_check_digit(
            &creditor.agency,
            &creditor.account,
            &creditor.wallet,
            &payment.our_number,
        )
    }

    /// The 25-digit bank-defined tail of the barcode (campo livre).
    fn free_field(&self, creditor: &Creditor, payment: &Payment) -> Result<String, RemessaError>;

    /// 44-digit barcode value.
    fn barcode(&self, creditor: &Creditor, payment: &Payment) -> Result<String, RemessaError> {
        let free_field = self.free_field(creditor, payment)?;
        barcode::compose(self.code(), payment, &free_field)
    }

    /// Our number as printed on the boleto.
    fn our_number_display(
        &self,
        creditor: &Creditor,
        payment: &Payment,
    ) -> Result<String, RemessaError> {
        let dv = self.payment_check_digit(creditor, payment)?;
        Ok(format!("{}-{dv}", payment.our_number))
    }

    /// Agency / account as printed on the boleto.
    fn agency_account_display(&self, creditor: &Creditor) -> Result<String, RemessaError> {
        let dv = self.resolved_account_check_digit(creditor)?;
        Ok(format!("{} / {}-{dv}", creditor.agency, creditor.account))
    }
}

/// Caller-supplied agency check digit, `0` when absent.
pub(crate) fn agency_check_digit(creditor: &Creditor) -> char {
    creditor
        .agency_check_digit
        .as_deref()
        .and_then(|dv| dv.trim().chars().next())
        .unwrap_or('0')
}

/// Zero-filled barcode component of `bank`.
pub(crate) fn barcode_digits(
    bank: &'static str,
    field: &'static str,
    value: &str,
    width: usize,
) -> Result<String, RemessaError> {
    format::numeric(value.trim(), width).map_err(|reason| RemessaError::Barcode {
        bank,
        field,
        reason,
    })
}

/// Closed set of supported banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    BancoDoBrasil,
    Santander,
    Caixa,
    Bradesco,
    Itau,
    Placeholder,
}

impl Bank {
    pub const ALL: [Bank; 6] = [
        Bank::BancoDoBrasil,
        Bank::Santander,
        Bank::Caixa,
        Bank::Bradesco,
        Bank::Itau,
        Bank::Placeholder,
    ];

    /// Looks a bank up by its three-digit code.
    ///
    /// # Errors
    ///
    /// [`RemessaError::UnsupportedBank`] when no profile has that code.
    pub fn from_code(code: &str) -> Result<Self, RemessaError> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|bank| bank.profile().code() == code)
            .ok_or_else(|| RemessaError::UnsupportedBank(code.to_string()))
    }

    pub fn profile(self) -> &'static dyn BankProfile {
        match self {
            Self::BancoDoBrasil => &BancoDoBrasil,
            Self::Santander => &Santander,
            Self::Caixa => &Caixa,
            Self::Bradesco => &Bradesco,
            Self::Itau => &Itau,
            Self::Placeholder => &Placeholder,
        }
    }

    pub fn code(self) -> &'static str {
        self.profile().code()
    }
}

impl FromStr for Bank {
    type Err = RemessaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.profile();
        write!(f, "{} {}", profile.code(), profile.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_code() {
        assert_eq!(Bank::from_code("033"), Ok(Bank::Santander));
        assert_eq!(Bank::from_code(" 341 "), Ok(Bank::Itau));
        assert_eq!("104".parse::<Bank>(), Ok(Bank::Caixa));
        assert_eq!(
            Bank::from_code("999"),
            Err(RemessaError::UnsupportedBank("999".into()))
        );
    }

    #[test]
    fn codes_are_unique() {
        for (i, a) in Bank::ALL.iter().enumerate() {
            for b in &Bank::ALL[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn layouts_match_record_renderers() {
        assert_eq!(Bank::Santander.profile().layout(), Layout::Cnab240);
        assert_eq!(Bank::Caixa.profile().layout(), Layout::Cnab240);
        assert_eq!(Bank::BancoDoBrasil.profile().layout(), Layout::Cnab240);
        assert_eq!(Bank::Itau.profile().layout(), Layout::Cnab400);
        assert_eq!(Bank::Bradesco.profile().layout(), Layout::Cnab400);
        assert_eq!(Bank::Placeholder.profile().layout(), Layout::Cnab400);
    }

    #[test]
    fn display_names_bank() {
        assert_eq!(Bank::Santander.to_string(), "033 SANTANDER");
    }
}
