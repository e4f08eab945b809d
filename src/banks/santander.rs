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

//! Santander (033), CNAB 240 layout 040/030.

use super::cnab240::{self, Cnab240};
use super::{
    BankProfile, FileContext, FileTotals, LayoutVersion, LotSummary, Records, agency_check_digit,
    barcode_digits,
};
use crate::checksum::{self, Mod11Policy};
use crate::error::RemessaError;
use crate::format;
use crate::model::{Creditor, InterestKind, Payment};
use crate::record::{Record, RecordBuilder};
use crate::validator::{CreditorField, FieldRule, PaymentLimits};

const CODE: &str = "033";

const RULES: &[FieldRule] = &[
    FieldRule::required(CreditorField::TransmissionCode).max(15),
    FieldRule::optional(CreditorField::Wallet).max(3),
    FieldRule::optional(CreditorField::Agency).max(4),
    FieldRule::optional(CreditorField::Account).max(9),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Santander;

impl Santander {
    /// Seven-digit beneficiary code printed in the barcode: the trailing
    /// digits of the transmission code.
    fn beneficiary_code(creditor: &Creditor) -> String {
        let digits = format::digits(creditor.transmission_code());
        let skip = digits.len().saturating_sub(7);
        format::left_pad(&digits[skip..], 7, '0')
    }

    /// Our number followed by its check digit, zero-filled to `width`.
    fn our_number_with_dv(
        &self,
        creditor: &Creditor,
        payment: &Payment,
        width: usize,
    ) -> Result<String, RemessaError> {
        let dv = self.payment_check_digit(creditor, payment)?;
        let value = format!("{}{dv}", payment.our_number.trim());
        Ok(format::left_pad(&value, width, '0'))
    }
}

impl BankProfile for Santander {
    fn code(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        "SANTANDER"
    }

    fn layout_version(&self) -> LayoutVersion {
        LayoutVersion {
            file: "040",
            lot: Some("030"),
        }
    }

    fn records(&self) -> Records<'_> {
        Records::Cnab240(self)
    }

    fn creditor_rules(&self) -> &'static [FieldRule] {
        RULES
    }

    fn payment_limits(&self, _creditor: &Creditor) -> PaymentLimits {
        PaymentLimits {
            our_number_max: 7,
            document_number_max: 15,
        }
    }

    fn account_check_digit(&self, agency: &str, account: &str) -> Result<char, RemessaError> {
        checksum::mod11(&format!("{agency}{account}"), Mod11Policy::SANTANDER)
    }

    fn our_number_check_digit(
        &self,
        _agency: &str,
        _account: &str,
        _wallet: &str,
        our_number: &str,
    ) -> Result<char, RemessaError> {
        checksum::mod11(our_number.trim(), Mod11Policy::SANTANDER)
    }

    fn free_field(&self, creditor: &Creditor, payment: &Payment) -> Result<String, RemessaError> {
        let our_number = self.our_number_with_dv(creditor, payment, 13)?;
        let wallet = barcode_digits(CODE, "wallet", &creditor.wallet, 3)?;
        Ok(format!(
            "9{}{our_number}0{wallet}",
            Self::beneficiary_code(creditor)
        ))
    }

    fn agency_account_display(&self, creditor: &Creditor) -> Result<String, RemessaError> {
        Ok(format!(
            "{} / {}",
            creditor.agency,
            Self::beneficiary_code(creditor)
        ))
    }
}

impl Cnab240 for Santander {
    fn file_header(&self, ctx: &FileContext<'_>) -> Result<Record, RemessaError> {
        let creditor = ctx.creditor;
        let mut r = cnab240::file_header_prefix(CODE)?;
        r.blank("reserved", 9..=16)?
            .flag("person_kind", 17, cnab240::person_code(&creditor.document))?
            .numeric("document", 18..=32, &creditor.document_digits())?
            .numeric("transmission_code", 33..=47, creditor.transmission_code().trim())?
            .blank("reserved_bank", 48..=72)?
            .text("company_name", 73..=102, &creditor.name)?
            .text("bank_name", 103..=132, self.name())?
            .blank("reserved_bank", 133..=142)?
            .flag("remittance_code", 143, '1')?
            .date("generated_on", 144..=151, Some(ctx.generated_on()))?
            .blank("reserved_bank", 152..=157)?
            .number("file_sequence", 158..=163, ctx.sequence.into())?
            .numeric("layout_version", 164..=166, self.layout_version().file)?
            .blank("reserved_bank", 167..=240)?;
        r.finish()
    }

    fn lot_header(&self, ctx: &FileContext<'_>, lot: u32) -> Result<Record, RemessaError> {
        let creditor = ctx.creditor;
        let version = self.layout_version().lot.unwrap_or("030");
        let mut r = cnab240::lot_header_prefix(CODE, lot, "  ", version)?;
        r.flag("person_kind", 18, cnab240::person_code(&creditor.document))?
            .numeric("document", 19..=33, &creditor.document_digits())?
            .blank("reserved_bank", 34..=53)?
            .numeric("transmission_code", 54..=68, creditor.transmission_code().trim())?
            .blank("reserved_bank", 69..=73)?
            .text("company_name", 74..=103, &creditor.name)?
            .text("message_1", 104..=143, creditor.message(0))?
            .text("message_2", 144..=183, creditor.message(1))?
            .number("remittance_number", 184..=191, ctx.sequence.into())?
            .date("recorded_on", 192..=199, Some(ctx.generated_on()))?
            .blank("reserved", 200..=240)?;
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
        let our_number = self.our_number_with_dv(creditor, payment, 13)?;
        r.numeric("agency", 18..=21, creditor.agency.trim())?
            .flag("agency_check_digit", 22, agency_check_digit(creditor))?
            .numeric("account", 23..=31, creditor.account.trim())?
            .flag("account_check_digit", 32, account_dv)?
            .numeric("collection_account", 33..=41, creditor.account.trim())?
            .flag("collection_account_check_digit", 42, account_dv)?
            .blank("reserved", 43..=44)?
            .numeric("our_number", 45..=57, &our_number)?
            .flag("wallet_kind", 58, '1')?
            .flag("registration", 59, '1')?
            .flag("document_kind", 60, '1')?
            .blank("issuance", 61..=61)?
            .blank("distribution", 62..=62)?;
        Ok(())
    }

    fn segment_p_bank_fields(
        &self,
        r: &mut RecordBuilder,
        _ctx: &FileContext<'_>,
        payment: &Payment,
    ) -> Result<(), RemessaError> {
        r.left_padded("document_number", 63..=77, &payment.document_number, '0')?
            .zeros("collecting_agency", 101..=104)?
            .flag("collecting_agency_check_digit", 105, '0')?
            .blank("reserved", 106..=106)?
            .flag("write_off_code", 224, '1')?
            .flag("reserved", 225, '0')?
            .number("write_off_days", 226..=227, payment.write_off_days.into())?
            .constant("currency", 228..=229, "00")?
            .blank("reserved", 230..=240)?;
        Ok(())
    }

    fn interest_scale(&self, payment: &Payment) -> u32 {
        match payment.interest.kind {
            InterestKind::MonthlyRate => 5,
            _ => 2,
        }
    }

    fn segment_q_tail(&self, r: &mut RecordBuilder) -> Result<(), RemessaError> {
        r.zeros("reserved_bank", 210..=221)?
            .blank("reserved_bank", 222..=240)?;
        Ok(())
    }

    fn segment_r_tail(&self, r: &mut RecordBuilder) -> Result<(), RemessaError> {
        r.blank("reserved_bank", 180..=240)?;
        Ok(())
    }

    fn lot_trailer_tail(
        &self,
        r: &mut RecordBuilder,
        _summary: &LotSummary,
    ) -> Result<(), RemessaError> {
        r.blank("reserved", 24..=240)?;
        Ok(())
    }

    fn file_trailer_lot(&self, totals: &FileTotals) -> u64 {
        totals.lots as u64
    }

    fn file_trailer_tail(
        &self,
        r: &mut RecordBuilder,
        _totals: &FileTotals,
    ) -> Result<(), RemessaError> {
        r.blank("reserved", 30..=240)?;
        Ok(())
    }
}
