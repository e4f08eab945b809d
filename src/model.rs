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

//! Creditor (cedente), debtor (sacado) and payment instruction types.
//!
//! All of these are plain data built fresh per generation request; the
//! assembler only borrows them.

use crate::format;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Person type derived from a tax document's digit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonKind {
    /// CPF, 11 digits.
    Individual,
    /// CNPJ, 14 digits.
    Company,
}

impl PersonKind {
    /// Classifies a CPF/CNPJ, ignoring punctuation.
    pub fn of(document: &str) -> Option<Self> {
        match format::digits(document).len() {
            11 => Some(Self::Individual),
            14 => Some(Self::Company),
            _ => None,
        }
    }

    /// One-digit code used by CNAB 240 (`1` CPF, `2` CNPJ).
    pub fn code(self) -> char {
        match self {
            Self::Individual => '1',
            Self::Company => '2',
        }
    }

    /// Two-digit code used by CNAB 400 (`01` CPF, `02` CNPJ).
    pub fn code2(self) -> &'static str {
        match self {
            Self::Individual => "01",
            Self::Company => "02",
        }
    }
}

/// Postal address of a debtor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub district: String,
    /// CEP, eight digits (punctuation tolerated).
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub city: String,
    /// Two-letter state code (UF).
    #[serde(default)]
    pub state: String,
}

/// The creditor on whose behalf the file is generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creditor {
    /// CPF or CNPJ.
    pub document: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub agency: String,
    #[serde(default)]
    pub agency_check_digit: Option<String>,
    pub account: String,
    /// When absent, the bank profile computes it.
    #[serde(default)]
    pub account_check_digit: Option<String>,
    /// Carteira.
    pub wallet: String,
    /// Variação da carteira (Banco do Brasil).
    #[serde(default)]
    pub wallet_variation: Option<String>,
    /// Bank-assigned client identifier: transmission code, convênio or
    /// beneficiary code depending on the bank.
    #[serde(default)]
    pub transmission_code: Option<String>,
    /// Lot header messages.
    #[serde(default)]
    pub messages: Vec<String>,
}

impl Creditor {
    pub fn person_kind(&self) -> Option<PersonKind> {
        PersonKind::of(&self.document)
    }

    pub fn document_digits(&self) -> String {
        format::digits(&self.document)
    }

    pub fn transmission_code(&self) -> &str {
        self.transmission_code.as_deref().unwrap_or_default()
    }

    pub fn message(&self, index: usize) -> &str {
        self.messages.get(index).map(String::as_str).unwrap_or_default()
    }
}

/// The debtor named on a payment instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debtor {
    pub name: String,
    /// CPF or CNPJ.
    pub document: String,
    #[serde(default)]
    pub address: Address,
}

impl Debtor {
    pub fn person_kind(&self) -> Option<PersonKind> {
        PersonKind::of(&self.document)
    }

    pub fn document_digits(&self) -> String {
        format::digits(&self.document)
    }
}

/// Instruction the remessa conveys for one instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
    #[default]
    Register,
    WriteOff,
    Abatement,
    CancelAbatement,
    ChangeDueDate,
    Protest,
    CancelProtest,
}

impl Occurrence {
    /// FEBRABAN movement code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Register => "01",
            Self::WriteOff => "02",
            Self::Abatement => "04",
            Self::CancelAbatement => "05",
            Self::ChangeDueDate => "06",
            Self::Protest => "09",
            Self::CancelProtest => "10",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestKind {
    /// Fixed amount per day late.
    DailyAmount,
    /// Percentage per month.
    MonthlyRate,
    #[default]
    Exempt,
}

impl InterestKind {
    pub fn code(self) -> char {
        match self {
            Self::DailyAmount => '1',
            Self::MonthlyRate => '2',
            Self::Exempt => '3',
        }
    }
}

/// Juros de mora.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    pub kind: InterestKind,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub value: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FineKind {
    #[default]
    None,
    Fixed,
    Percent,
}

impl FineKind {
    pub fn code(self) -> char {
        match self {
            Self::None => '0',
            Self::Fixed => '1',
            Self::Percent => '2',
        }
    }
}

/// Multa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fine {
    pub kind: FineKind,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub value: Decimal,
}

impl Fine {
    pub fn is_set(&self) -> bool {
        self.kind != FineKind::None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    #[default]
    None,
    FixedUntilDate,
    PercentUntilDate,
}

impl DiscountKind {
    pub fn code(self) -> char {
        match self {
            Self::None => '0',
            Self::FixedUntilDate => '1',
            Self::PercentUntilDate => '2',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub kind: DiscountKind,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub value: Decimal,
}

impl Discount {
    pub fn is_set(&self) -> bool {
        self.kind != DiscountKind::None
    }
}

/// One payment instruction (boleto) placed into a remessa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Decimal,
    pub due_date: NaiveDate,
    /// Issue date; defaults to the generation date when absent.
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    /// Creditor's document number (seu número).
    pub document_number: String,
    /// Nosso número, without check digit.
    pub our_number: String,
    pub debtor: Debtor,
    #[serde(default)]
    pub occurrence: Occurrence,
    /// Espécie do título.
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub interest: Interest,
    #[serde(default)]
    pub fine: Fine,
    #[serde(default)]
    pub discount: Discount,
    #[serde(default)]
    pub second_discount: Discount,
    #[serde(default)]
    pub iof: Decimal,
    #[serde(default)]
    pub abatement: Decimal,
    /// Days after due date before protest; `0` means do not protest.
    #[serde(default)]
    pub protest_days: u32,
    /// Days after due date before automatic write-off.
    #[serde(default)]
    pub write_off_days: u32,
    /// Free-text message; clipped to the bank's column width.
    #[serde(default)]
    pub message: Option<String>,
}

fn default_kind() -> String {
    "02".to_string()
}

impl Payment {
    /// Minimal registration instruction; the remaining policies default to
    /// none/exempt.
    pub fn new(
        amount: Decimal,
        due_date: NaiveDate,
        our_number: impl Into<String>,
        document_number: impl Into<String>,
        debtor: Debtor,
    ) -> Self {
        Self {
            amount,
            due_date,
            issue_date: None,
            document_number: document_number.into(),
            our_number: our_number.into(),
            debtor,
            occurrence: Occurrence::Register,
            kind: default_kind(),
            interest: Interest::default(),
            fine: Fine::default(),
            discount: Discount::default(),
            second_discount: Discount::default(),
            iof: Decimal::ZERO,
            abatement: Decimal::ZERO,
            protest_days: 0,
            write_off_days: 0,
            message: None,
        }
    }

    /// FEBRABAN protest code: `1` protest after `protest_days`, `3` never.
    pub fn protest_code(&self) -> char {
        if self.protest_days > 0 { '1' } else { '3' }
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Date interest starts to accrue: the explicit date, else the due date.
    /// `None` when the payment is exempt from interest.
    pub fn interest_date(&self) -> Option<NaiveDate> {
        match self.interest.kind {
            InterestKind::Exempt => None,
            _ => self.interest.date.or(Some(self.due_date)),
        }
    }
}
