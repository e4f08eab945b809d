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

//! Presence and length checks run before any line is rendered.
//!
//! Each bank profile publishes a table of [`FieldRule`]s for the creditor.
//! Per field the checks run in order (presence, length bounds, tax-document
//! consistency) and stop at the first failure; across fields every violation
//! is collected so the caller can report all of them at once.

use crate::error::{ValidationError, Violation, ViolationKind};
use crate::format;
use crate::model::{Creditor, Payment, PersonKind};
use rust_decimal::Decimal;

/// Creditor fields a rule can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditorField {
    Document,
    Name,
    Agency,
    Account,
    AccountCheckDigit,
    Wallet,
    WalletVariation,
    TransmissionCode,
}

impl CreditorField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Name => "name",
            Self::Agency => "agency",
            Self::Account => "account",
            Self::AccountCheckDigit => "account_check_digit",
            Self::Wallet => "wallet",
            Self::WalletVariation => "wallet_variation",
            Self::TransmissionCode => "transmission_code",
        }
    }

    /// Blank values count as absent.
    fn value(self, creditor: &Creditor) -> Option<String> {
        let raw = match self {
            Self::Document => Some(format::digits(&creditor.document)),
            Self::Name => Some(creditor.name.clone()),
            Self::Agency => Some(creditor.agency.clone()),
            Self::Account => Some(creditor.account.clone()),
            Self::AccountCheckDigit => creditor.account_check_digit.clone(),
            Self::Wallet => Some(creditor.wallet.clone()),
            Self::WalletVariation => creditor.wallet_variation.clone(),
            Self::TransmissionCode => creditor.transmission_code.clone(),
        };
        raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
}

/// One declarative constraint on a creditor field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: CreditorField,
    pub required: bool,
    pub min: usize,
    pub max: usize,
}

impl FieldRule {
    /// Field must be present; any length.
    pub const fn required(field: CreditorField) -> Self {
        Self {
            field,
            required: true,
            min: 0,
            max: usize::MAX,
        }
    }

    /// Field may be absent; when present it must respect the bounds.
    pub const fn optional(field: CreditorField) -> Self {
        Self {
            field,
            required: false,
            min: 0,
            max: usize::MAX,
        }
    }

    pub const fn length(self, min: usize, max: usize) -> Self {
        Self { min, max, ..self }
    }

    pub const fn max(self, max: usize) -> Self {
        Self { max, ..self }
    }
}

/// Rules every profile starts from.
pub const BASE_RULES: &[FieldRule] = &[
    FieldRule::required(CreditorField::Document).length(11, 14),
    FieldRule::required(CreditorField::Name),
    FieldRule::required(CreditorField::Agency),
    FieldRule::required(CreditorField::Account),
];

/// Payment-level limits a profile imposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentLimits {
    /// Digits available for the our number (without its check digit).
    pub our_number_max: usize,
    /// Digits available for the document number (seu número).
    pub document_number_max: usize,
}

/// Validates the creditor and every payment against `rules`.
///
/// # Errors
///
/// [`ValidationError`] listing every violation found.
pub fn validate(
    creditor: &Creditor,
    rules: &[FieldRule],
    limits: PaymentLimits,
    lots: &[&[Payment]],
) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    check_creditor(creditor, rules, &mut violations);

    if lots.iter().all(|lot| lot.is_empty()) {
        violations.push(Violation::new("payments", ViolationKind::Absent));
    }
    for (lot_index, lot) in lots.iter().enumerate() {
        if lot.is_empty() && lots.len() > 1 {
            violations.push(Violation::new(
                format!("lots[{lot_index}]"),
                ViolationKind::Absent,
            ));
        }
    }

    for (index, payment) in lots.iter().flat_map(|lot| lot.iter()).enumerate() {
        check_payment(payment, &format!("payments[{index}]"), limits, &mut violations);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn check_creditor(creditor: &Creditor, rules: &[FieldRule], out: &mut Vec<Violation>) {
    // A field may appear in several rule tables; report it once.
    let mut failed: Vec<CreditorField> = Vec::new();
    for rule in rules {
        if failed.contains(&rule.field) {
            continue;
        }
        let path = format!("creditor.{}", rule.field.name());
        if let Some(kind) = check_rule(creditor, rule) {
            out.push(Violation::new(path, kind));
            failed.push(rule.field);
        }
    }
}

fn check_rule(creditor: &Creditor, rule: &FieldRule) -> Option<ViolationKind> {
    let Some(value) = rule.field.value(creditor) else {
        return rule.required.then_some(ViolationKind::Absent);
    };
    let len = value.chars().count();
    if len < rule.min || len > rule.max {
        return Some(ViolationKind::OutOfBounds);
    }
    if rule.field == CreditorField::Document && PersonKind::of(&value).is_none() {
        return Some(ViolationKind::InvalidTaxDocument);
    }
    None
}

fn check_payment(payment: &Payment, path: &str, limits: PaymentLimits, out: &mut Vec<Violation>) {
    let mut push = |field: &str, kind| out.push(Violation::new(format!("{path}.{field}"), kind));

    if payment.amount <= Decimal::ZERO {
        push("amount", ViolationKind::OutOfBounds);
    }

    let our_number = payment.our_number.trim();
    if our_number.is_empty() {
        push("our_number", ViolationKind::Absent);
    } else if our_number.len() > limits.our_number_max
        || !our_number.chars().all(|c| c.is_ascii_digit())
    {
        push("our_number", ViolationKind::OutOfBounds);
    }

    if payment.document_number.trim().chars().count() > limits.document_number_max {
        push("document_number", ViolationKind::OutOfBounds);
    }

    if payment.debtor.name.trim().is_empty() {
        push("debtor.name", ViolationKind::Absent);
    }

    let document = format::digits(&payment.debtor.document);
    if document.is_empty() {
        push("debtor.document", ViolationKind::Absent);
    } else if !(11..=14).contains(&document.len()) {
        push("debtor.document", ViolationKind::OutOfBounds);
    } else if PersonKind::of(&document).is_none() {
        push("debtor.document", ViolationKind::InvalidTaxDocument);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creditor() -> Creditor {
        Creditor {
            document: "12345678912".into(),
            name: "Kivanio Barbosa".into(),
            agency: "4042".into(),
            account: "61900".into(),
            wallet: "101".into(),
            ..Default::default()
        }
    }

    fn kinds(creditor: &Creditor, rules: &[FieldRule]) -> Vec<(String, ViolationKind)> {
        let mut out = Vec::new();
        check_creditor(creditor, rules, &mut out);
        out.into_iter().map(|v| (v.field, v.kind)).collect()
    }

    #[test]
    fn valid_creditor_passes_base_rules() {
        assert!(kinds(&creditor(), BASE_RULES).is_empty());
    }

    #[test]
    fn presence_is_checked_before_length() {
        let mut c = creditor();
        c.document = String::new();
        assert_eq!(
            kinds(&c, BASE_RULES),
            vec![("creditor.document".to_string(), ViolationKind::Absent)]
        );
    }

    #[test]
    fn document_length_out_of_bounds() {
        let mut c = creditor();
        c.document = "1234567891".into();
        assert_eq!(
            kinds(&c, BASE_RULES),
            vec![("creditor.document".to_string(), ViolationKind::OutOfBounds)]
        );
    }

    #[test]
    fn document_of_twelve_digits_is_inconsistent() {
        let mut c = creditor();
        c.document = "123456789123".into();
        assert_eq!(
            kinds(&c, BASE_RULES),
            vec![("creditor.document".to_string(), ViolationKind::InvalidTaxDocument)]
        );
    }

    #[test]
    fn punctuation_in_documents_is_ignored() {
        let mut c = creditor();
        c.document = "12.345.678/0001-90".into();
        assert!(kinds(&c, BASE_RULES).is_empty());
    }

    #[test]
    fn a_field_failing_twice_is_reported_once() {
        let rules = [
            FieldRule::required(CreditorField::TransmissionCode),
            FieldRule::optional(CreditorField::TransmissionCode).max(15),
        ];
        let mut c = creditor();
        assert_eq!(kinds(&c, &rules).len(), 1);
        c.transmission_code = Some("1".repeat(16));
        assert_eq!(
            kinds(&c, &rules),
            vec![("creditor.transmission_code".to_string(), ViolationKind::OutOfBounds)]
        );
    }

    #[test]
    fn optional_absent_field_passes() {
        let rules = [FieldRule::optional(CreditorField::WalletVariation).max(3)];
        assert!(kinds(&creditor(), &rules).is_empty());
    }
}
