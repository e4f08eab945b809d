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

//! Property-based tests for remessa assembly.
//!
//! These tests verify structural invariants that must hold for any
//! valid input, whatever the bank.

use chrono::NaiveDate;
use cnab_remessa::{
    Assembler, AssemblyOptions, Bank, Creditor, Debtor, Layout, Payment, RecordKind, format,
};
use proptest::prelude::*;
use rayon::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate a positive amount (0.01 to 99,999,999.99).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=9_999_999_999i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Due dates inside the current barcode factor window.
fn arb_due_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..3_000).prop_map(|days| {
        NaiveDate::from_ymd_opt(2025, 2, 22).unwrap() + chrono::Duration::days(days)
    })
}

/// Free text with accents, possibly longer than any column.
fn arb_text() -> impl Strategy<Value = String> {
    "[A-Za-z çãéÇÃÉ]{1,120}"
}

fn arb_payment() -> impl Strategy<Value = Payment> {
    (arb_amount(), arb_due_date(), 1u32..=999_999, arb_text(), arb_text()).prop_map(
        |(amount, due, our_number, name, street)| {
            let mut debtor = Debtor {
                name: format!("X{name}"),
                document: "12345678901".into(),
                ..Default::default()
            };
            debtor.address.street = street;
            let mut payment = Payment::new(
                amount,
                due,
                our_number.to_string(),
                our_number.to_string(),
                debtor,
            );
            payment.message = Some(format!("Ref {our_number}"));
            payment
        },
    )
}

fn arb_bank() -> impl Strategy<Value = Bank> {
    prop::sample::select(Bank::ALL.to_vec())
}

fn creditor_for(bank: Bank, name: String) -> Creditor {
    let mut creditor = Creditor {
        document: "12345678000190".into(),
        name,
        agency: "4042".into(),
        account: "61900".into(),
        wallet: "109".into(),
        ..Default::default()
    };
    match bank {
        Bank::Santander => creditor.transmission_code = Some("404200006190".into()),
        Bank::Caixa => creditor.transmission_code = Some("005507".into()),
        Bank::BancoDoBrasil => {
            creditor.transmission_code = Some("1234567".into());
            creditor.wallet = "17".into();
            creditor.wallet_variation = Some("019".into());
        }
        Bank::Bradesco => {
            creditor.transmission_code = Some("4327841".into());
            creditor.wallet = "09".into();
        }
        Bank::Itau | Bank::Placeholder => {}
    }
    creditor
}

fn assembler(bank: Bank) -> Assembler {
    let generated_at = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap();
    Assembler::new(bank, AssemblyOptions::new(generated_at))
}

// =============================================================================
// Structural Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every emitted line has exactly the layout width, in ASCII.
    #[test]
    fn lines_have_exact_width(
        bank in arb_bank(),
        name in arb_text(),
        payments in prop::collection::vec(arb_payment(), 1..8),
    ) {
        let remessa = assembler(bank)
            .assemble(&creditor_for(bank, format!("X{name}")), &payments, 1)
            .unwrap();

        let width = remessa.layout().width();
        for line in remessa.lines() {
            prop_assert_eq!(line.len(), width);
            prop_assert!(line.is_ascii());
        }
    }

    /// File trailer counts match what was emitted, and lot trailers count
    /// their own lines.
    #[test]
    fn trailer_counts_match_output(
        bank in prop::sample::select(vec![Bank::Santander, Bank::Caixa, Bank::BancoDoBrasil]),
        lots in prop::collection::vec(prop::collection::vec(arb_payment(), 1..5), 1..4),
    ) {
        let groups: Vec<&[Payment]> = lots.iter().map(Vec::as_slice).collect();
        let remessa = assembler(bank)
            .assemble_lots(&creditor_for(bank, "Empresa".into()), &groups, 1)
            .unwrap();
        prop_assert_eq!(remessa.layout(), Layout::Cnab240);

        let records = remessa.records();
        let trailer = &records[records.len() - 1];
        let lot_count = format!("{:06}", lots.len());
        let record_count = format!("{:06}", records.len());
        prop_assert_eq!(trailer.columns(18..=23), Some(lot_count.as_str()));
        prop_assert_eq!(trailer.columns(24..=29), Some(record_count.as_str()));

        let mut lot_start = 0;
        let mut lot_headers = 0;
        for (i, record) in records.iter().enumerate() {
            match record.kind() {
                RecordKind::LotHeader => {
                    lot_start = i;
                    lot_headers += 1;
                    let lot = format!("{lot_headers:04}");
                    prop_assert_eq!(record.columns(4..=7), Some(lot.as_str()));
                }
                RecordKind::LotTrailer => {
                    let lines = i - lot_start + 1;
                    let lines = format!("{lines:06}");
                    prop_assert_eq!(record.columns(18..=23), Some(lines.as_str()));
                }
                _ => {}
            }
        }
        prop_assert_eq!(lot_headers, lots.len());
    }

    /// Segment sequence numbers run 1..n inside each lot without gaps.
    #[test]
    fn segment_sequence_is_contiguous(
        payments in prop::collection::vec(arb_payment(), 1..10),
    ) {
        let bank = Bank::Santander;
        let remessa = assembler(bank)
            .assemble(&creditor_for(bank, "Empresa".into()), &payments, 1)
            .unwrap();

        let sequences: Vec<u32> = remessa
            .records()
            .iter()
            .filter(|r| matches!(r.kind(), RecordKind::Segment(_)))
            .map(|r| r.columns(9..=13).unwrap().parse().unwrap())
            .collect();
        let expected: Vec<u32> = (1..=sequences.len() as u32).collect();
        prop_assert_eq!(sequences, expected);
    }

    /// Long or accented names are folded and clipped, never shifted.
    #[test]
    fn debtor_name_is_clipped_in_place(payment in arb_payment()) {
        let bank = Bank::Itau;
        let remessa = assembler(bank)
            .assemble(&creditor_for(bank, "Empresa".into()), std::slice::from_ref(&payment), 1)
            .unwrap();

        let detail = &remessa.records()[1];
        let expected = format::right_pad(&format::ascii_fold(&payment.debtor.name), 30, ' ');
        prop_assert_eq!(detail.columns(235..=264), Some(expected.as_str()));
    }
}

// =============================================================================
// Concurrency
// =============================================================================

/// Files for different creditors assembled in parallel are identical to
/// the sequential result.
#[test]
fn parallel_assembly_matches_sequential() {
    let payments: Vec<Payment> = (1..=50u32)
        .map(|i| {
            Payment::new(
                Decimal::new(i64::from(i) * 1_000, 2),
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                i.to_string(),
                i.to_string(),
                Debtor {
                    name: format!("Pagador {i}"),
                    document: "12345678901".into(),
                    ..Default::default()
                },
            )
        })
        .collect();

    let jobs: Vec<(Bank, Creditor)> = Bank::ALL
        .iter()
        .flat_map(|&bank| {
            (0..4).map(move |n| (bank, creditor_for(bank, format!("Empresa {n}"))))
        })
        .collect();

    let sequential: Vec<String> = jobs
        .iter()
        .map(|(bank, creditor)| {
            assembler(*bank)
                .assemble(creditor, &payments, 1)
                .unwrap()
                .to_text(&Default::default())
        })
        .collect();

    let parallel: Vec<String> = jobs
        .par_iter()
        .map(|(bank, creditor)| {
            assembler(*bank)
                .assemble(creditor, &payments, 1)
                .unwrap()
                .to_text(&Default::default())
        })
        .collect();

    assert_eq!(sequential, parallel);
}
