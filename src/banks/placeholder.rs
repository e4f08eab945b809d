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

//! Placeholder profile (`000`).
//!
//! Produces structurally valid CNAB 400 output and an all-zero barcode so
//! callers can exercise the assembly and rendering paths without a real
//! bank agreement.

use super::cnab400::{self, Cnab400, SEQUENCE};
use super::{BankProfile, FileContext, LayoutVersion, Records};
use crate::error::RemessaError;
use crate::model::{Creditor, Payment};
use crate::record::Record;
use crate::validator::{FieldRule, PaymentLimits};

const CODE: &str = "000";

#[derive(Debug, Clone, Copy, Default)]
pub struct Placeholder;

impl BankProfile for Placeholder {
    fn code(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        "PLACEHOLDER"
    }

    fn layout_version(&self) -> LayoutVersion {
        LayoutVersion {
            file: "000",
            lot: None,
        }
    }

    fn records(&self) -> Records<'_> {
        Records::Cnab400(self)
    }

    fn creditor_rules(&self) -> &'static [FieldRule] {
        &[]
    }

    fn payment_limits(&self, _creditor: &Creditor) -> PaymentLimits {
        PaymentLimits {
            our_number_max: 25,
            document_number_max: 25,
        }
    }

    fn account_check_digit(&self, _agency: &str, _account: &str) -> Result<char, RemessaError> {
        Ok('0')
    }

    fn our_number_check_digit(
        &self,
        _agency: &str,
        _account: &str,
        _wallet: &str,
        _our_number: &str,
    ) -> Result<char, RemessaError> {
        Ok('0')
    }

    fn free_field(&self, _creditor: &Creditor, _payment: &Payment) -> Result<String, RemessaError> {
        Ok("0".repeat(25))
    }

    fn barcode(&self, _creditor: &Creditor, _payment: &Payment) -> Result<String, RemessaError> {
        Ok("0".repeat(44))
    }

    fn our_number_display(
        &self,
        _creditor: &Creditor,
        _payment: &Payment,
    ) -> Result<String, RemessaError> {
        Ok(String::new())
    }

    fn agency_account_display(&self, _creditor: &Creditor) -> Result<String, RemessaError> {
        Ok(String::new())
    }
}

impl Cnab400 for Placeholder {
    fn header(&self, ctx: &FileContext<'_>) -> Result<Record, RemessaError> {
        let mut r = cnab400::header_prefix(self, ctx)?;
        r.blank("reserved", 27..=46)?.blank("reserved", 101..=394)?;
        r.finish()
    }

    fn details(
        &self,
        _ctx: &FileContext<'_>,
        sequence: u32,
        payment: &Payment,
    ) -> Result<Vec<Record>, RemessaError> {
        let mut r = cnab400::detail(CODE, '1');
        r.flag("record_type", 1, '1')?
            .text("our_number", 2..=26, &payment.our_number)?
            .text("document_number", 27..=51, &payment.document_number)?
            .date("due_date", 52..=57, Some(payment.due_date))?
            .amount("amount", 58..=70, payment.amount)?
            .blank("reserved", 71..=394)?
            .number("sequence", SEQUENCE, sequence.into())?;
        Ok(vec![r.finish()?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Debtor;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn barcode_is_all_zeros() {
        let payment = Payment::new(
            dec!(1.00),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            "1",
            "1",
            Debtor::default(),
        );
        let barcode = Placeholder.barcode(&Creditor::default(), &payment).unwrap();
        assert_eq!(barcode, "0".repeat(44));
    }

    #[test]
    fn display_fields_are_empty() {
        let creditor = Creditor {
            agency: "4042".into(),
            account: "61900".into(),
            ..Default::default()
        };
        let payment = Payment::new(
            dec!(1.00),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            "123",
            "1",
            Debtor::default(),
        );
        assert_eq!(Placeholder.our_number_display(&creditor, &payment).unwrap(), "");
        assert_eq!(Placeholder.agency_account_display(&creditor).unwrap(), "");
    }
}
