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

//! Field formatting and check digit integration tests.

use chrono::NaiveDate;
use cnab_remessa::checksum::{self, Mod11Policy};
use cnab_remessa::record::RecordBuilder;
use cnab_remessa::{FieldError, Layout, RecordKind, RemessaError, format};
use rust_decimal_macros::dec;

#[test]
fn text_is_folded_padded_and_clipped() {
    assert_eq!(format::ascii_fold("São João"), "SAO JOAO");
    assert_eq!(format::right_pad("ABC", 5, ' '), "ABC  ");
    assert_eq!(format::right_pad("ABCDEFG", 5, ' '), "ABCDE");
    assert_eq!(format::left_pad("42", 5, '0'), "00042");
}

#[test]
fn numeric_rejects_overflow_instead_of_clipping() {
    assert_eq!(format::numeric("0", 3).unwrap(), "000");
    assert_eq!(
        format::numeric("12345", 4),
        Err(FieldError::TooLong { width: 4, len: 5 })
    );
    assert_eq!(
        format::numeric("12-3", 4),
        Err(FieldError::NotNumeric("12-3".into()))
    );
}

#[test]
fn decimals_render_with_implied_places() {
    assert_eq!(format::decimal(dec!(150.00), 2, 15).unwrap(), "000000000015000");
    assert_eq!(format::decimal(dec!(0), 2, 13).unwrap(), "0000000000000");
    assert_eq!(format::decimal(dec!(1.005), 2, 5).unwrap(), "00100");
    assert_eq!(format::decimal(dec!(2.5), 5, 10).unwrap(), "0000250000");
    assert_eq!(format::decimal(dec!(-1), 2, 5), Err(FieldError::Negative));
}

#[test]
fn dates_render_in_both_widths() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 10);
    assert_eq!(format::date(date, 8).unwrap(), "10062024");
    assert_eq!(format::date(date, 6).unwrap(), "100624");
    assert_eq!(format::date(None, 8).unwrap(), "00000000");
}

#[test]
fn tax_document_punctuation_is_stripped() {
    assert_eq!(format::digits("123.456.789-01"), "12345678901");
    assert_eq!(format::digits("12.345.678/0001-90"), "12345678000190");
}

#[test]
fn check_digits_of_known_identifiers() {
    // Itaú: agency + account
    assert_eq!(checksum::mod10("404261900").unwrap(), '9');
    // Itaú: agency + account + wallet + our number
    assert_eq!(checksum::mod10("40426190010912345678").unwrap(), '2');
    assert_eq!(checksum::mod11("341", Mod11Policy::BANK_CODE).unwrap(), '7');
    assert_eq!(checksum::mod11("001", Mod11Policy::BANK_CODE).unwrap(), '9');
}

#[test]
fn mod11_substitutions_differ_per_bank() {
    assert_eq!(checksum::mod11("1", Mod11Policy::SANTANDER).unwrap(), '9');
    // 6 * 2 = 12, raw DV 10
    assert_eq!(checksum::mod11("6", Mod11Policy::BANCO_DO_BRASIL).unwrap(), 'X');
    assert_eq!(checksum::mod11("6", Mod11Policy::BRADESCO).unwrap(), 'P');
    assert_eq!(checksum::mod11("6", Mod11Policy::CAIXA).unwrap(), '0');
    assert_eq!(checksum::mod11("6", Mod11Policy::BARCODE).unwrap(), '1');
}

#[test]
fn checksum_rejects_non_digits() {
    assert_eq!(
        checksum::mod10("12a"),
        Err(RemessaError::ChecksumInput {
            input: "12a".into()
        })
    );
    assert!(checksum::mod11("", Mod11Policy::BARCODE).is_err());
}

#[test]
fn builder_requires_full_coverage() {
    let mut r = RecordBuilder::new(Layout::Cnab400, RecordKind::FileHeader, "000");
    r.flag("record_type", 1, '0').unwrap();
    r.blank("reserved", 2..=394).unwrap();
    assert!(matches!(
        r.finish(),
        Err(RemessaError::InvalidField {
            reason: FieldError::Unwritten(_),
            ..
        })
    ));
}

#[test]
fn builder_rejects_overlapping_fields() {
    let mut r = RecordBuilder::new(Layout::Cnab240, RecordKind::FileHeader, "000");
    r.numeric("bank_code", 1..=3, "341").unwrap();
    let err = r.numeric("lot", 3..=7, "0").unwrap_err();
    assert!(matches!(
        err,
        RemessaError::InvalidField {
            field: "lot",
            reason: FieldError::Overlap { .. },
            ..
        }
    ));
}
