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

//! Bradesco (237), CNAB 400.
//!
//! The creditor's transmission code holds the company code assigned by the
//! bank. Our-number check digits are base-7 mod 11 over wallet and number.

use super::cnab400::{self, Cnab400, SEQUENCE};
use super::{BankProfile, FileContext, LayoutVersion, Records, barcode_digits};
use crate::checksum::{self, Mod11Policy};
use crate::error::RemessaError;
use crate::format;
use crate::model::{Creditor, FineKind, Payment};
use crate::record::Record;
use crate::validator::{CreditorField, FieldRule, PaymentLimits};
use rust_decimal::Decimal;

const CODE: &str = "237";

const RULES: &[FieldRule] = &[
    FieldRule::required(CreditorField::TransmissionCode).max(20),
    FieldRule::optional(CreditorField::Wallet).max(2),
    FieldRule::optional(CreditorField::Agency).max(4),
    FieldRule::optional(CreditorField::Account).max(7),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Bradesco;

impl BankProfile for Bradesco {
    fn code(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        "BRADESCO"
    }

    fn layout_version(&self) -> LayoutVersion {
        LayoutVersion {
            file: "400",
            lot: None,
        }
    }

    fn records(&self) -> Records<'_> {
        Records::Cnab400(self)
    }

    fn creditor_rules(&self) -> &'static [FieldRule] {
        RULES
    }

    fn payment_limits(&self, _creditor: &Creditor) -> PaymentLimits {
        PaymentLimits {
            our_number_max: 11,
            document_number_max: 10,
        }
    }

    fn account_check_digit(&self, _agency: &str, account: &str) -> Result<char, RemessaError> {
        checksum::mod11(account.trim(), Mod11Policy::BRADESCO)
    }

    fn our_number_check_digit(
        &self,
        _agency: &str,
        _account: &str,
        wallet: &str,
        our_number: &str,
    ) -> Result<char, RemessaError> {
        let wallet = format::left_pad(wallet.trim(), 2, '0');
        let our_number = format::left_pad(our_number.trim(), 11, '0');
        checksum::mod11(&format!("{wallet}{our_number}"), Mod11Policy::BRADESCO)
    }

    fn free_field(&self, creditor: &Creditor, payment: &Payment) -> Result<String, RemessaError> {
        let agency = barcode_digits(CODE, "agency", &creditor.agency, 4)?;
        let wallet = barcode_digits(CODE, "wallet", &creditor.wallet, 2)?;
        let our_number = barcode_digits(CODE, "our_number", &payment.our_number, 11)?;
        let account = barcode_digits(CODE, "account", &creditor.account, 7)?;
        Ok(format!("{agency}{wallet}{our_number}{account}0"))
    }

    fn our_number_display(
        &self,
        creditor: &Creditor,
        payment: &Payment,
    ) -> Result<String, RemessaError> {
        let wallet = format::left_pad(creditor.wallet.trim(), 2, '0');
        let our_number = format::left_pad(payment.our_number.trim(), 11, '0');
        let dv = self.payment_check_digit(creditor, payment)?;
        Ok(format!("{wallet}/{our_number}-{dv}"))
    }
}

impl Cnab400 for Bradesco {
    fn header(&self, ctx: &FileContext<'_>) -> Result<Record, RemessaError> {
        let mut r = cnab400::header_prefix(self, ctx)?;
        r.numeric("company_code", 27..=46, ctx.creditor.transmission_code().trim())?
            .blank("reserved", 101..=108)?
            .constant("system", 109..=110, "MX")?
            .number("file_sequence", 111..=117, ctx.sequence.into())?
            .blank("reserved", 118..=394)?;
        r.finish()
    }

    fn details(
        &self,
        ctx: &FileContext<'_>,
        sequence: u32,
        payment: &Payment,
    ) -> Result<Vec<Record>, RemessaError> {
        let creditor = ctx.creditor;
        let debtor = &payment.debtor;
        let address = &debtor.address;
        let account_dv = self.resolved_account_check_digit(creditor)?;
        let our_number_dv = self.payment_check_digit(creditor, payment)?;
        let fine = &payment.fine;
        let message = payment.message();
        let message_rest: String = message.chars().skip(12).collect();

        let mut r = cnab400::detail(CODE, '1');
        r.flag("record_type", 1, '1')?
            .zeros("debit_account", 2..=20)?
            .flag("reserved", 21, '0')?
            .numeric("wallet", 22..=24, creditor.wallet.trim())?
            .numeric("agency", 25..=29, creditor.agency.trim())?
            .numeric("account", 30..=36, creditor.account.trim())?
            .flag("account_check_digit", 37, account_dv)?
            .text("company_use", 38..=62, &payment.document_number)?
            .zeros("debit_bank", 63..=65)?
            .flag("fine_flag", 66, if fine.is_set() { '2' } else { '0' })?
            .amount("fine_percent", 67..=70, fine_percent(payment))?
            .numeric("our_number", 71..=81, payment.our_number.trim())?
            .flag("our_number_check_digit", 82, our_number_dv)?
            .zeros("daily_discount", 83..=92)?
            .flag("issuance", 93, '2')?
            .flag("automatic_debit", 94, 'N')?
            .blank("bank_operation", 95..=104)?
            .blank("apportionment", 105..=105)?
            .flag("debit_notice", 106, '2')?
            .blank("reserved", 107..=108)?
            .numeric("occurrence", 109..=110, payment.occurrence.code())?
            .text("document_number", 111..=120, &payment.document_number)?
            .date("due_date", 121..=126, Some(payment.due_date))?
            .amount("amount", 127..=139, payment.amount)?
            .zeros("collecting_bank", 140..=142)?
            .zeros("collecting_agency", 143..=147)?
            .numeric("kind", 148..=149, payment.kind.trim())?
            .flag("acceptance", 150, 'N')?
            .date(
                "issue_date",
                151..=156,
                Some(payment.issue_date.unwrap_or(ctx.generated_on())),
            )?
            .zeros("instruction_1", 157..=158)?
            .zeros("instruction_2", 159..=160)?
            .amount("daily_interest", 161..=173, cnab400::daily_interest(payment))?
            .date("discount_date", 174..=179, payment.discount.date)?
            .amount("discount_value", 180..=192, payment.discount.value)?
            .amount("iof", 193..=205, payment.iof)?
            .amount("abatement", 206..=218, payment.abatement)?
            .constant("debtor_person_kind", 219..=220, cnab400::person_code(&debtor.document))?
            .numeric("debtor_document", 221..=234, &debtor.document_digits())?
            .text("debtor_name", 235..=274, &debtor.name)?
            .text("debtor_street", 275..=314, &address.street)?
            .text("message_1", 315..=326, message)?
            .left_padded("debtor_zip", 327..=334, &format::digits(&address.zip), '0')?
            .text("message_2", 335..=394, &message_rest)?
            .number("sequence", SEQUENCE, sequence.into())?;
        Ok(vec![r.finish()?])
    }
}

/// Bradesco only carries a fine as a percentage; a fixed fine is expressed
/// as its share of the face amount.
fn fine_percent(payment: &Payment) -> Decimal {
    let fine = &payment.fine;
    match fine.kind {
        FineKind::None => Decimal::ZERO,
        FineKind::Percent => fine.value,
        FineKind::Fixed => (fine.value * Decimal::ONE_HUNDRED)
            .checked_div(payment.amount)
            .unwrap_or_default()
            .round_dp(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Debtor;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn creditor() -> Creditor {
        Creditor {
            document: "12345678000190".into(),
            name: "Empresa".into(),
            agency: "1172".into(),
            account: "0403005".into(),
            account_check_digit: Some("2".into()),
            wallet: "06".into(),
            transmission_code: Some("4327841".into()),
            ..Default::default()
        }
    }

    fn payment() -> Payment {
        let mut payment = Payment::new(
            dec!(199.90),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            "123",
            "6969",
            Debtor {
                name: "Pagador".into(),
                document: "12345678901".into(),
                ..Default::default()
            },
        );
        payment.fine.kind = FineKind::Percent;
        payment.fine.value = dec!(2.00);
        payment
    }

    #[test]
    fn free_field_layout() {
        let field = Bradesco.free_field(&creditor(), &payment()).unwrap();
        assert_eq!(field, "1172060000000012304030050");
    }

    #[test]
    fn check_digit_may_be_p() {
        let dv = checksum::mod11("6", Mod11Policy::BRADESCO).unwrap();
        assert_eq!(dv, 'P');
    }

    #[test]
    fn detail_layout() {
        let creditor = creditor();
        let ctx = FileContext {
            creditor: &creditor,
            sequence: 12,
            generated_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        };
        let header = Bradesco.header(&ctx).unwrap();
        assert_eq!(header.columns(27..=46), Some("00000000000004327841"));
        assert_eq!(header.columns(109..=117), Some("MX0000012"));

        let records = Bradesco.details(&ctx, 2, &payment()).unwrap();
        assert_eq!(records.len(), 1);
        let detail = &records[0];
        assert_eq!(detail.len(), 400);
        assert_eq!(detail.columns(21..=37), Some("00060117204030052"));
        assert_eq!(detail.columns(66..=70), Some("20200"));
        assert_eq!(detail.columns(71..=81), Some("00000000123"));
        assert_eq!(detail.columns(395..=400), Some("000002"));
    }

    fn ctx(creditor: &Creditor) -> FileContext<'_> {
        FileContext {
            creditor,
            sequence: 1,
            generated_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn accented_message_splits_on_characters() {
        let creditor = creditor();
        let mut p = payment();
        p.message = Some("Ação: pagar somente no banco".into());
        let records = Bradesco.details(&ctx(&creditor), 2, &p).unwrap();
        let detail = &records[0];
        assert_eq!(detail.columns(315..=326), Some("ACAO: PAGAR "));
        let rest = detail.columns(335..=394).unwrap();
        assert!(rest.starts_with("SOMENTE NO BANCO "));
        assert_eq!(rest.trim_end(), "SOMENTE NO BANCO");
    }

    #[test]
    fn fixed_fine_is_written_as_share_of_amount() {
        let creditor = creditor();
        let mut p = payment();
        p.amount = dec!(200.00);
        p.fine.kind = FineKind::Fixed;
        p.fine.value = dec!(5.00);
        let records = Bradesco.details(&ctx(&creditor), 2, &p).unwrap();
        assert_eq!(records[0].columns(66..=70), Some("20250"));
    }

    #[test]
    fn missing_fine_writes_zero_percent() {
        let creditor = creditor();
        let mut p = payment();
        p.fine.kind = FineKind::None;
        p.fine.value = dec!(3.00);
        let records = Bradesco.details(&ctx(&creditor), 2, &p).unwrap();
        assert_eq!(records[0].columns(66..=70), Some("00000"));
    }
}
