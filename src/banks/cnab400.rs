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

//! Shared CNAB 400 record shapes.
//!
//! CNAB 400 files are flat: one header, the detail records, one trailer.
//! The last six columns of every line carry the line's position in the file.

use super::{BankProfile, FileContext};
use crate::error::RemessaError;
use crate::model::{InterestKind, Payment, PersonKind};
use crate::record::{Layout, Record, RecordBuilder, RecordKind};
use rust_decimal::Decimal;

/// Columns carrying the file line number.
pub const SEQUENCE: std::ops::RangeInclusive<usize> = 395..=400;

/// Record rendering for banks on the 400-column layout.
pub trait Cnab400: BankProfile {
    /// File header; always line 1.
    fn header(&self, ctx: &FileContext<'_>) -> Result<Record, RemessaError>;

    /// Detail records of one payment, numbered from `sequence`.
    fn details(
        &self,
        ctx: &FileContext<'_>,
        sequence: u32,
        payment: &Payment,
    ) -> Result<Vec<Record>, RemessaError>;

    fn trailer(&self, _ctx: &FileContext<'_>, sequence: u32) -> Result<Record, RemessaError> {
        let mut r = RecordBuilder::new(Layout::Cnab400, RecordKind::FileTrailer, self.code());
        r.flag("record_type", 1, '9')?
            .blank("reserved", 2..=394)?
            .number("sequence", SEQUENCE, sequence.into())?;
        r.finish()
    }
}

/// Header columns common to banks on the FEBRABAN 400 template: 1-26,
/// 47-100 and the sequence.
pub(crate) fn header_prefix<B: Cnab400 + ?Sized>(
    bank: &B,
    ctx: &FileContext<'_>,
) -> Result<RecordBuilder, RemessaError> {
    let mut r = RecordBuilder::new(Layout::Cnab400, RecordKind::FileHeader, bank.code());
    r.flag("record_type", 1, '0')?
        .flag("operation", 2, '1')?
        .text("operation_name", 3..=9, "REMESSA")?
        .constant("service", 10..=11, "01")?
        .text("service_name", 12..=26, "COBRANCA")?
        .text("company_name", 47..=76, &ctx.creditor.name)?
        .numeric("bank_code", 77..=79, bank.code())?
        .text("bank_name", 80..=94, bank.name())?
        .date("generated_on", 95..=100, Some(ctx.generated_on()))?
        .number("sequence", SEQUENCE, 1)?;
    Ok(r)
}

pub(crate) fn detail(bank: &'static str, code: char) -> RecordBuilder {
    RecordBuilder::new(Layout::Cnab400, RecordKind::Detail(code), bank)
}

/// Two-digit person code of a tax document; `00` when it is neither CPF
/// nor CNPJ.
pub(crate) fn person_code(document: &str) -> &'static str {
    PersonKind::of(document).map_or("00", PersonKind::code2)
}

/// Interest charged per day late, derived from a monthly rate when needed.
pub(crate) fn daily_interest(payment: &Payment) -> Decimal {
    let interest = &payment.interest;
    match interest.kind {
        InterestKind::DailyAmount => interest.value,
        InterestKind::MonthlyRate => {
            (payment.amount * interest.value / Decimal::ONE_HUNDRED / Decimal::from(30)).round_dp(2)
        }
        InterestKind::Exempt => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Debtor;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn monthly_rate_becomes_daily_amount() {
        let mut payment = Payment::new(
            dec!(300.00),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            "1",
            "1",
            Debtor::default(),
        );
        assert_eq!(daily_interest(&payment), Decimal::ZERO);

        payment.interest.kind = InterestKind::MonthlyRate;
        payment.interest.value = dec!(3);
        assert_eq!(daily_interest(&payment), dec!(0.30));

        payment.interest.kind = InterestKind::DailyAmount;
        payment.interest.value = dec!(0.15);
        assert_eq!(daily_interest(&payment), dec!(0.15));
    }

    #[test]
    fn person_codes() {
        assert_eq!(person_code("12345678901"), "01");
        assert_eq!(person_code("12345678000190"), "02");
        assert_eq!(person_code(""), "00");
    }
}
