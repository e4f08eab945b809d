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

//! Caixa Econômica Federal (104), SIGCB on CNAB 240 layout 101/060.
//!
//! The creditor's transmission code carries the six-digit beneficiary code.
//! Our numbers are registered under modality `14` (registered, issued by
//! the beneficiary), giving the 17-digit form `14` + 15 digits.

use super::cnab240::{self, Cnab240};
use super::{BankProfile, FileContext, LayoutVersion, Records, agency_check_digit, barcode_digits};
use crate::checksum::{self, Mod11Policy};
use crate::error::RemessaError;
use crate::format;
use crate::model::{Creditor, Payment};
use crate::record::{Record, RecordBuilder};
use crate::validator::{CreditorField, FieldRule, PaymentLimits};

const CODE: &str = "104";

/// Registered, issued by the beneficiary.
const MODALITY: &str = "14";

const RULES: &[FieldRule] = &[
    FieldRule::required(CreditorField::TransmissionCode).length(6, 6),
    FieldRule::optional(CreditorField::Agency).max(5),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Caixa;

impl Caixa {
    fn beneficiary(creditor: &Creditor) -> Result<String, RemessaError> {
        barcode_digits(CODE, "beneficiary_code", creditor.transmission_code(), 6)
    }

    /// `14` followed by the zero-filled 15-digit our number.
    fn our_number17(payment: &Payment) -> Result<String, RemessaError> {
        let our_number = barcode_digits(CODE, "our_number", &payment.our_number, 15)?;
        Ok(format!("{MODALITY}{our_number}"))
    }
}

impl BankProfile for Caixa {
    fn code(&self) -> &'static str {
        CODE
    }

    fn name(&self) -> &'static str {
        "CAIXA ECONOMICA FEDERAL"
    }

    fn layout_version(&self) -> LayoutVersion {
        LayoutVersion {
            file: "101",
            lot: Some("060"),
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
            our_number_max: 15,
            document_number_max: 11,
        }
    }

    fn account_check_digit(&self, _agency: &str, account: &str) -> Result<char, RemessaError> {
        checksum::mod11(account.trim(), Mod11Policy::CAIXA)
    }

    fn our_number_check_digit(
        &self,
        _agency: &str,
        _account: &str,
        _wallet: &str,
        our_number: &str,
    ) -> Result<char, RemessaError> {
        let our_number = format::numeric(our_number.trim(), 15).map_err(|reason| {
            RemessaError::Barcode {
                bank: CODE,
                field: "our_number",
                reason,
            }
        })?;
        checksum::mod11(&format!("{MODALITY}{our_number}"), Mod11Policy::CAIXA)
    }

    fn free_field(&self, creditor: &Creditor, payment: &Payment) -> Result<String, RemessaError> {
        let beneficiary = Self::beneficiary(creditor)?;
        let beneficiary_dv = checksum::mod11(&beneficiary, Mod11Policy::CAIXA)?;
        let nn = Self::our_number17(payment)?;
        let body = format!(
            "{beneficiary}{beneficiary_dv}{}{}{}{}{}",
            &nn[2..5],
            &nn[0..1],
            &nn[5..8],
            &nn[1..2],
            &nn[8..17]
        );
        let dv = checksum::mod11(&body, Mod11Policy::CAIXA)?;
        Ok(format!("{body}{dv}"))
    }

    fn our_number_display(
        &self,
        creditor: &Creditor,
        payment: &Payment,
    ) -> Result<String, RemessaError> {
        let dv = self.payment_check_digit(creditor, payment)?;
        Ok(format!("{}-{dv}", Self::our_number17(payment)?))
    }

    fn agency_account_display(&self, creditor: &Creditor) -> Result<String, RemessaError> {
        let beneficiary = Self::beneficiary(creditor)?;
        let dv = checksum::mod11(&beneficiary, Mod11Policy::CAIXA)?;
        Ok(format!("{} / {beneficiary}-{dv}", creditor.agency))
    }
}

impl Cnab240 for Caixa {
    fn file_header(&self, ctx: &FileContext<'_>) -> Result<Record, RemessaError> {
        let creditor = ctx.creditor;
        let mut r = cnab240::file_header_prefix(CODE)?;
        r.blank("reserved", 9..=17)?
            .flag("person_kind", 18, cnab240::person_code(&creditor.document))?
            .numeric("document", 19..=32, &creditor.document_digits())?
            .zeros("agreement", 33..=52)?
            .numeric("agency", 53..=57, creditor.agency.trim())?
            .flag("agency_check_digit", 58, agency_check_digit(creditor))?
            .numeric("beneficiary_code", 59..=64, creditor.transmission_code().trim())?
            .zeros("reserved_bank", 65..=72)?
            .text("company_name", 73..=102, &creditor.name)?
            .text("bank_name", 103..=132, self.name())?
            .blank("reserved", 133..=142)?
            .flag("remittance_code", 143, '1')?
            .date("generated_on", 144..=151, Some(ctx.generated_on()))?
            .time("generated_at", 152..=157, ctx.generated_at)?
            .number("file_sequence", 158..=163, ctx.sequence.into())?
            .numeric("layout_version", 164..=166, self.layout_version().file)?
            .zeros("density", 167..=171)?
            .blank("reserved_bank", 172..=191)?
            .text("company_use", 192..=211, "REMESSA-PRODUCAO")?
            .blank("reserved", 212..=240)?;
        r.finish()
    }

    fn lot_header(&self, ctx: &FileContext<'_>, lot: u32) -> Result<Record, RemessaError> {
        let creditor = ctx.creditor;
        let version = self.layout_version().lot.unwrap_or("060");
        let beneficiary = creditor.transmission_code().trim();
        let mut r = cnab240::lot_header_prefix(CODE, lot, "00", version)?;
        r.flag("person_kind", 18, cnab240::person_code(&creditor.document))?
            .numeric("document", 19..=33, &creditor.document_digits())?
            .numeric("beneficiary_code", 34..=39, beneficiary)?
            .zeros("reserved_bank", 40..=53)?
            .numeric("agency", 54..=58, creditor.agency.trim())?
            .flag("agency_check_digit", 59, agency_check_digit(creditor))?
            .numeric("beneficiary_account", 60..=65, beneficiary)?
            .zeros("model", 66..=72)?
            .flag("reserved_bank", 73, '0')?
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
        r.numeric("agency", 18..=22, creditor.agency.trim())?
            .flag("agency_check_digit", 23, agency_check_digit(creditor))?
            .numeric("beneficiary_code", 24..=29, creditor.transmission_code().trim())?
            .zeros("reserved_bank", 30..=40)?
            .constant("modality", 41..=42, MODALITY)?
            .numeric("our_number", 43..=57, payment.our_number.trim())?
            .flag("wallet_kind", 58, '1')?
            .flag("registration", 59, '1')?
            .flag("document_kind", 60, '2')?
            .flag("issuance", 61, '2')?
            .flag("distribution", 62, '0')?;
        Ok(())
    }

    fn segment_p_bank_fields(
        &self,
        r: &mut RecordBuilder,
        _ctx: &FileContext<'_>,
        payment: &Payment,
    ) -> Result<(), RemessaError> {
        r.text("document_number", 63..=73, &payment.document_number)?
            .blank("reserved", 74..=77)?
            .zeros("collecting_agency", 101..=105)?
            .flag("collecting_agency_check_digit", 106, '0')?
            .flag("write_off_code", 224, '1')?
            .number("write_off_days", 225..=227, payment.write_off_days.into())?
            .constant("currency", 228..=229, "09")?
            .zeros("contract", 230..=239)?
            .blank("reserved", 240..=240)?;
        Ok(())
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
            agency: "1565".into(),
            account: "0".into(),
            wallet: "14".into(),
            transmission_code: Some("005507".into()),
            ..Default::default()
        }
    }

    fn payment() -> Payment {
        Payment::new(
            dec!(10.00),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            "19",
            "DOC1",
            Debtor::default(),
        )
    }

    #[test]
    fn free_field_interleaves_modality_digits() {
        let field = Caixa.free_field(&creditor(), &payment()).unwrap();
        assert_eq!(field.len(), 25);
        assert_eq!(&field[..6], "005507");
        // nn17 = 14000000000000019
        assert_eq!(&field[7..10], "000");
        assert_eq!(&field[10..11], "1");
        assert_eq!(&field[11..14], "000");
        assert_eq!(&field[14..15], "4");
        assert_eq!(&field[15..24], "000000019");
        let dv = checksum::mod11(&field[..24], Mod11Policy::CAIXA).unwrap();
        assert_eq!(field.chars().last(), Some(dv));
    }

    #[test]
    fn our_number_display_carries_modality() {
        let display = Caixa.our_number_display(&creditor(), &payment()).unwrap();
        assert_eq!(display, "14000000000000019-7");
    }

    #[test]
    fn our_number_digit_is_computed_over_seventeen_digits() {
        let padded = checksum::mod11("14000000000000019", Mod11Policy::CAIXA).unwrap();
        assert_eq!(Caixa.payment_check_digit(&creditor(), &payment()), Ok(padded));
        assert_eq!(padded, '7');
    }

    #[test]
    fn beneficiary_must_be_numeric_for_barcode() {
        let mut c = creditor();
        c.transmission_code = Some("ABC123".into());
        assert!(matches!(
            Caixa.free_field(&c, &payment()),
            Err(RemessaError::Barcode {
                field: "beneficiary_code",
                ..
            })
        ));
    }
}
