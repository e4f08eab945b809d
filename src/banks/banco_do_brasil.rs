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

//! Banco do Brasil (001), CNAB 240 layout 083/042.
//!
//! The creditor's transmission code holds the convênio. Six-digit convênios
//! number titles with five digits plus a check digit; seven-digit convênios
//! use ten digits and no check digit.

use super::cnab240::{self, Cnab240};
use super::{BankProfile, FileContext, LayoutVersion, Records, agency_check_digit, barcode_digits};
use crate::checksum::{self, Mod11Policy};
use crate::error::RemessaError;
use crate::model::{Creditor, Payment};
use crate::record::{Record, RecordBuilder};
use crate::validator::{CreditorField, FieldRule, PaymentLimits};

const CODE: &str = "001";

/// Cobrança simples product code.
const PRODUCT: &str = "0014";

const RULES: &[FieldRule] = &[
    FieldRule::required(CreditorField::TransmissionCode).length(6, 7),
    FieldRule::optional(CreditorField::Wallet).max(2),
    FieldRule::required(CreditorField::WalletVariation).max(3),
    FieldRule::optional(CreditorField::Agency).max(4),
    FieldRule::optional(CreditorField::Account).max(8),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BancoDoBrasil;

impl BancoDoBrasil {
    fn agreement(creditor: &Creditor) -> &str {
        creditor.transmission_code().trim()
    }

    fn wallet_variation(creditor: &Creditor) -> &str {
        creditor.wallet_variation.as_deref().unwrap_or_default().trim()
    }

    fn has_short_agreement(creditor: &Creditor) -> bool {
        Self::agreement(creditor).len() <= 6
    }

    /// Our number as registered: convênio followed by the sequential part,
    /// plus the check digit for six-digit convênios.
    fn full_our_number(
        &self,
        creditor: &Creditor,
        payment: &Payment,
    ) -> Result<String, RemessaError> {
        let agreement = Self::agreement(creditor);
        if Self::has_short_agreement(creditor) {
            let sequential = barcode_digits(CODE, "our_number", &payment.our_number, 5)?;
            let dv = self.payment_check_digit(creditor, payment)?;
            Ok(format!("{agreement}{sequential}{dv}"))
        } else {
            let sequential = barcode_digits(CODE, "our_number", &payment.our_number, 10)?;
            Ok(format!("{agreement}{sequential}"))
        }
    }
}

impl BankProfile for BancoDoBrasil {
    fn code(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        "BANCO DO BRASIL S.A."
    }

    fn layout_version(&self) -> LayoutVersion {
        LayoutVersion {
            file: "083",
            lot: Some("042"),
        }
    }

    fn records(&self) -> Records<'_> {
        Records::Cnab240(self)
    }

    fn creditor_rules(&self) -> &'static [FieldRule] {
        RULES
    }

    fn payment_limits(&self, creditor: &Creditor) -> PaymentLimits {
        PaymentLimits {
            our_number_max: if Self::has_short_agreement(creditor) { 5 } else { 10 },
            document_number_max: 15,
        }
    }

    fn account_check_digit(&self, _agency: &str, account: &str) -> Result<char, RemessaError> {
        checksum::mod11(account.trim(), Mod11Policy::BANCO_DO_BRASIL)
    }

    fn our_number_check_digit(
        &self,
        _agency: &str,
        _account: &str,
        _wallet: &str,
        our_number: &str,
    ) -> Result<char, RemessaError> {
        checksum::mod11(our_number.trim(), Mod11Policy::BANCO_DO_BRASIL)
    }

    /// Computed over convênio and sequential number together.
    fn payment_check_digit(
        &self,
        creditor: &Creditor,
        payment: &Payment,
    ) -> Result<char, RemessaError> {
        let width = if Self::has_short_agreement(creditor) { 5 } else { 10 };
        let sequential = barcode_digits(CODE, "our_number", &payment.our_number, width)?;
        let value = format!("{}{sequential}", Self::agreement(creditor));
        self.our_number_check_digit(&creditor.agency, &creditor.account, &creditor.wallet, &value)
    }

    fn free_field(&self, creditor: &Creditor, payment: &Payment) -> Result<String, RemessaError> {
        let wallet = barcode_digits(CODE, "wallet", &creditor.wallet, 2)?;
        let agreement = Self::agreement(creditor);
        if Self::has_short_agreement(creditor) {
            let agreement = barcode_digits(CODE, "agreement", agreement, 6)?;
            let sequential = barcode_digits(CODE, "our_number", &payment.our_number, 5)?;
            let agency = barcode_digits(CODE, "agency", &creditor.agency, 4)?;
            let account = barcode_digits(CODE, "account", &creditor.account, 8)?;
            Ok(format!("{agreement}{sequential}{agency}{account}{wallet}"))
        } else {
            let agreement = barcode_digits(CODE, "agreement", agreement, 7)?;
            let sequential = barcode_digits(CODE, "our_number", &payment.our_number, 10)?;
            Ok(format!("000000{agreement}{sequential}{wallet}"))
        }
    }

    fn our_number_display(
        &self,
        creditor: &Creditor,
        payment: &Payment,
    ) -> Result<String, RemessaError> {
        let full = self.full_our_number(creditor, payment)?;
        if Self::has_short_agreement(creditor) {
            let (number, dv) = full.split_at(full.len() - 1);
            Ok(format!("{number}-{dv}"))
        } else {
            Ok(full)
        }
    }
}

impl Cnab240 for BancoDoBrasil {
    fn file_header(&self, ctx: &FileContext<'_>) -> Result<Record, RemessaError> {
        let creditor = ctx.creditor;
        let account_dv = self.resolved_account_check_digit(creditor)?;
        let mut r = cnab240::file_header_prefix(CODE)?;
        r.blank("reserved", 9..=17)?
            .flag("person_kind", 18, cnab240::person_code(&creditor.document))?
            .numeric("document", 19..=32, &creditor.document_digits())?
            .numeric("agreement", 33..=41, Self::agreement(creditor))?
            .constant("product", 42..=45, PRODUCT)?
            .numeric("wallet", 46..=47, creditor.wallet.trim())?
            .numeric("wallet_variation", 48..=50, Self::wallet_variation(creditor))?
            .blank("reserved_bank", 51..=52)?
            .numeric("agency", 53..=57, creditor.agency.trim())?
            .flag("agency_check_digit", 58, agency_check_digit(creditor))?
            .numeric("account", 59..=70, creditor.account.trim())?
            .flag("account_check_digit", 71, account_dv)?
            .blank("agency_account_check_digit", 72..=72)?
            .text("company_name", 73..=102, &creditor.name)?
            .text("bank_name", 103..=132, self.name())?
            .blank("reserved", 133..=142)?
            .flag("remittance_code", 143, '1')?
            .date("generated_on", 144..=151, Some(ctx.generated_on()))?
            .time("generated_at", 152..=157, ctx.generated_at)?
            .number("file_sequence", 158..=163, ctx.sequence.into())?
            .numeric("layout_version", 164..=166, self.layout_version().file)?
            .zeros("density", 167..=171)?
            .blank("reserved", 172..=240)?;
        r.finish()
    }

    fn lot_header(&self, ctx: &FileContext<'_>, lot: u32) -> Result<Record, RemessaError> {
        let creditor = ctx.creditor;
        let account_dv = self.resolved_account_check_digit(creditor)?;
        let version = self.layout_version().lot.unwrap_or("042");
        let mut r = cnab240::lot_header_prefix(CODE, lot, "  ", version)?;
        r.flag("person_kind", 18, cnab240::person_code(&creditor.document))?
            .numeric("document", 19..=33, &creditor.document_digits())?
            .numeric("agreement", 34..=42, Self::agreement(creditor))?
            .constant("product", 43..=46, PRODUCT)?
            .numeric("wallet", 47..=48, creditor.wallet.trim())?
            .numeric("wallet_variation", 49..=51, Self::wallet_variation(creditor))?
            .blank("reserved_bank", 52..=53)?
            .numeric("agency", 54..=58, creditor.agency.trim())?
            .flag("agency_check_digit", 59, agency_check_digit(creditor))?
            .numeric("account", 60..=71, creditor.account.trim())?
            .flag("account_check_digit", 72, account_dv)?
            .blank("agency_account_check_digit", 73..=73)?
            .text("company_name", 74..=103, &creditor.name)?
            .text("message_1", 104..=143, creditor.message(0))?
            .text("message_2", 144..=183, creditor.message(1))?
            .number("remittance_number", 184..=191, ctx.sequence.into())?
            .date("recorded_on", 192..=199, Some(ctx.generated_on()))?
            .zeros("credit_date", 200..=207)?
            .blank("reserved", 208..=240)?;
        r.finish()
    }

    fn segment_p_identification(
        &self,
        r: &mut RecordBuilder,
        ctx: &FileContext<'_>,
        payment: &Payment,
    ) -> Result<(), RemessaError> {
        let creditor = ctx.creditor;
        let account_dv = self.resolved_account_check_digit(creditor)?;
        let our_number = self.full_our_number(creditor, payment)?;
        let wallet_kind = if creditor.wallet.trim() == "17" { '7' } else { '1' };
        r.numeric("agency", 18..=22, creditor.agency.trim())?
            .flag("agency_check_digit", 23, agency_check_digit(creditor))?
            .numeric("account", 24..=35, creditor.account.trim())?
            .flag("account_check_digit", 36, account_dv)?
            .blank("agency_account_check_digit", 37..=37)?
            .text("our_number", 38..=57, &our_number)?
            .flag("wallet_kind", 58, wallet_kind)?
            .flag("registration", 59, '1')?
            .flag("document_kind", 60, '1')?
            .flag("issuance", 61, '2')?
            .flag("distribution", 62, '2')?;
        Ok(())
    }

    fn segment_p_bank_fields(
        &self,
        r: &mut RecordBuilder,
        _ctx: &FileContext<'_>,
        payment: &Payment,
    ) -> Result<(), RemessaError> {
        r.text("document_number", 63..=77, &payment.document_number)?
            .zeros("collecting_agency", 101..=105)?
            .blank("collecting_agency_check_digit", 106..=106)?
            .flag("write_off_code", 224, '0')?
            .blank("write_off_days", 225..=227)?
            .constant("currency", 228..=229, "09")?
            .zeros("contract", 230..=239)?
            .blank("reserved", 240..=240)?;
        Ok(())
    }
}
