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

//! Itaú (341), CNAB 400.

use super::cnab400::{self, Cnab400, SEQUENCE};
use super::{BankProfile, FileContext, LayoutVersion, Records, barcode_digits};
use crate::checksum;
use crate::error::RemessaError;
use crate::format;
use crate::model::{Creditor, Payment};
use crate::record::Record;
use crate::validator::{CreditorField, FieldRule, PaymentLimits};

const CODE: &str = "341";

/// Wallets whose our-number check digit leaves agency and account out.
const WALLETS_WITHOUT_ACCOUNT: [&str; 5] = ["126", "131", "146", "150", "168"];

const RULES: &[FieldRule] = &[
    FieldRule::optional(CreditorField::Agency).max(4),
    FieldRule::optional(CreditorField::Account).max(5),
    FieldRule::optional(CreditorField::Wallet).max(3),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Itau;

impl BankProfile for Itau {
    fn code(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        "BANCO ITAU SA"
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
            our_number_max: 8,
            document_number_max: 10,
        }
    }

    fn account_check_digit(&self, agency: &str, account: &str) -> Result<char, RemessaError> {
        let agency = format::left_pad(agency.trim(), 4, '0');
        let account = format::left_pad(account.trim(), 5, '0');
        checksum::mod10(&format!("{agency}{account}"))
    }

    fn our_number_check_digit(
        &self,
        agency: &str,
        account: &str,
        wallet: &str,
        our_number: &str,
    ) -> Result<char, RemessaError> {
        let wallet = wallet.trim();
        let our_number = format::left_pad(our_number.trim(), 8, '0');
        if WALLETS_WITHOUT_ACCOUNT.contains(&wallet) {
            return checksum::mod10(&format!("{wallet}{our_number}"));
        }
        let agency = format::left_pad(agency.trim(), 4, '0');
        let account = format::left_pad(account.trim(), 5, '0');
        checksum::mod10(&format!("{agency}{account}{wallet}{our_number}"))
    }

    fn free_field(&self, creditor: &Creditor, payment: &Payment) -> Result<String, RemessaError> {
        let wallet = barcode_digits(CODE, "wallet", &creditor.wallet, 3)?;
        let our_number = barcode_digits(CODE, "our_number", &payment.our_number, 8)?;
        let our_number_dv = self.payment_check_digit(creditor, payment)?;
        let agency = barcode_digits(CODE, "agency", &creditor.agency, 4)?;
        let account = barcode_digits(CODE, "account", &creditor.account, 5)?;
        let account_dv = self.resolved_account_check_digit(creditor)?;
        Ok(format!(
            "{wallet}{our_number}{our_number_dv}{agency}{account}{account_dv}000"
        ))
    }

    fn our_number_display(
        &self,
        creditor: &Creditor,
        payment: &Payment,
    ) -> Result<String, RemessaError> {
        let our_number = format::left_pad(payment.our_number.trim(), 8, '0');
        let dv = self.payment_check_digit(creditor, payment)?;
        Ok(format!("{}/{our_number}-{dv}", creditor.wallet.trim()))
    }
}

impl Cnab400 for Itau {
    fn header(&self, ctx: &FileContext<'_>) -> Result<Record, RemessaError> {
        let creditor = ctx.creditor;
        let account_dv = self.resolved_account_check_digit(creditor)?;
        let mut r = cnab400::header_prefix(self, ctx)?;
        r.numeric("agency", 27..=30, creditor.agency.trim())?
            .zeros("complement", 31..=32)?
            .numeric("account", 33..=37, creditor.account.trim())?
            .flag("account_check_digit", 38, account_dv)?
            .blank("reserved", 39..=46)?
            .blank("reserved", 101..=394)?;
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
        let instruction = if payment.protest_days > 0 { "09" } else { "00" };

        let mut r = cnab400::detail(CODE, '1');
        r.flag("record_type", 1, '1')?
            .constant("person_kind", 2..=3, cnab400::person_code(&creditor.document))?
            .numeric("document", 4..=17, &creditor.document_digits())?
            .numeric("agency", 18..=21, creditor.agency.trim())?
            .zeros("complement", 22..=23)?
            .numeric("account", 24..=28, creditor.account.trim())?
            .flag("account_check_digit", 29, account_dv)?
            .blank("reserved", 30..=33)?
            .zeros("instruction_code", 34..=37)?
            .text("company_use", 38..=62, &payment.document_number)?
            .numeric("our_number", 63..=70, payment.our_number.trim())?
            .zeros("currency_quantity", 71..=83)?
            .numeric("wallet", 84..=86, creditor.wallet.trim())?
            .blank("bank_use", 87..=107)?
            .flag("wallet_code", 108, 'I')?
            .numeric("occurrence", 109..=110, payment.occurrence.code())?
            .text("document_number", 111..=120, &payment.document_number)?
            .date("due_date", 121..=126, Some(payment.due_date))?
            .amount("amount", 127..=139, payment.amount)?
            .numeric("bank_code", 140..=142, CODE)?
            .zeros("collecting_agency", 143..=147)?
            .numeric("kind", 148..=149, payment.kind.trim())?
            .flag("acceptance", 150, 'N')?
            .date(
                "issue_date",
                151..=156,
                Some(payment.issue_date.unwrap_or(ctx.generated_on())),
            )?
            .constant("instruction_1", 157..=158, instruction)?
            .zeros("instruction_2", 159..=160)?
            .amount("daily_interest", 161..=173, cnab400::daily_interest(payment))?
            .date("discount_date", 174..=179, payment.discount.date)?
            .amount("discount_value", 180..=192, payment.discount.value)?
            .amount("iof", 193..=205, payment.iof)?
            .amount("abatement", 206..=218, payment.abatement)?
            .constant("debtor_person_kind", 219..=220, cnab400::person_code(&debtor.document))?
            .numeric("debtor_document", 221..=234, &debtor.document_digits())?
            .text("debtor_name", 235..=264, &debtor.name)?
            .blank("reserved", 265..=274)?
            .text("debtor_street", 275..=314, &address.street)?
            .text("debtor_district", 315..=326, &address.district)?
            .left_padded("debtor_zip", 327..=334, &format::digits(&address.zip), '0')?
            .text("debtor_city", 335..=349, &address.city)?
            .text("debtor_state", 350..=351, &address.state)?
            .blank("guarantor", 352..=381)?
            .blank("reserved", 382..=385)?
            .date("interest_date", 386..=391, payment.interest_date())?
            .number("protest_days", 392..=393, payment.protest_days.into())?
            .blank("reserved", 394..=394)?
            .number("sequence", SEQUENCE, sequence.into())?;
        let mut records = vec![r.finish()?];

        let fine = &payment.fine;
        if fine.is_set() {
            let mut r = cnab400::detail(CODE, '2');
            r.flag("record_type", 1, '2')?
                .flag("fine_code", 2, fine.kind.code())?
                .date("fine_date", 3..=10, Some(fine.date.unwrap_or(payment.due_date)))?
                .amount("fine_value", 11..=23, fine.value)?
                .blank("reserved", 24..=394)?
                .number("sequence", SEQUENCE, (sequence + 1).into())?;
            records.push(r.finish()?);
        }
        Ok(records)
    }
}
