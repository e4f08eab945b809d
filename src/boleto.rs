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

//! Boleto display data.
//!
//! Everything a printed boleto shows that the core computes: barcode,
//! digitable line, formatted our number and agency/account strings.
//! Turning a [`Boleto`] into an image or PDF is left to a
//! [`BoletoRenderer`](crate::render::BoletoRenderer).

use crate::banks::Bank;
use crate::barcode;
use crate::checksum::{self, Mod11Policy};
use crate::error::RemessaError;
use crate::model::{Creditor, Payment};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Computed display strings for one payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Boleto {
    /// Bank code with its check digit, e.g. `341-7`.
    pub bank_code: String,
    pub bank_name: String,
    /// 44 digits.
    pub barcode: String,
    /// 47 digits, grouped with dots and spaces.
    pub digitable_line: String,
    pub due_factor: u32,
    pub our_number: String,
    pub agency_account: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub document_number: String,
    pub creditor_name: String,
    pub creditor_document: String,
    pub debtor_name: String,
    pub debtor_document: String,
    pub instructions: Vec<String>,
}

impl Boleto {
    /// Computes the display data of `payment` issued by `creditor` at `bank`.
    ///
    /// # Errors
    ///
    /// [`RemessaError::Barcode`] or [`RemessaError::ChecksumInput`] when an
    /// identifier does not fit its barcode position.
    pub fn new(bank: Bank, creditor: &Creditor, payment: &Payment) -> Result<Self, RemessaError> {
        let profile = bank.profile();
        let barcode = profile.barcode(creditor, payment)?;
        let digitable_line = barcode::digitable_line(&barcode)?;
        let bank_dv = checksum::mod11(profile.code(), Mod11Policy::BANK_CODE)?;

        let mut instructions: Vec<String> = creditor
            .messages
            .iter()
            .filter(|m| !m.trim().is_empty())
            .cloned()
            .collect();
        if let Some(message) = payment.message.as_ref().filter(|m| !m.trim().is_empty()) {
            instructions.push(message.clone());
        }

        Ok(Self {
            bank_code: format!("{}-{bank_dv}", profile.code()),
            bank_name: profile.name().to_string(),
            due_factor: barcode::due_factor(payment.due_date),
            our_number: profile.our_number_display(creditor, payment)?,
            agency_account: profile.agency_account_display(creditor)?,
            amount: payment.amount,
            due_date: payment.due_date,
            document_number: payment.document_number.clone(),
            creditor_name: creditor.name.clone(),
            creditor_document: creditor.document.clone(),
            debtor_name: payment.debtor.name.clone(),
            debtor_document: payment.debtor.document.clone(),
            barcode,
            digitable_line,
            instructions,
        })
    }

    /// Amount formatted the way boletos print it: `1.234,56`.
    pub fn amount_display(&self) -> String {
        let cents = self.amount.round_dp(2);
        let text = format!("{cents:.2}");
        let (units, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        let mut grouped = String::new();
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }
        format!("{grouped},{fraction}")
    }
}
