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

//! Benchmarks for remessa assembly.
//!
//! Run with: cargo bench
//!
//! Benchmarks include:
//! - Check digit and barcode computation
//! - Single-file assembly per layout
//! - Scaling with number of payments
//! - Parallel assembly across creditors

use chrono::NaiveDate;
use cnab_remessa::checksum::{self, Mod11Policy};
use cnab_remessa::{
    Assembler, AssemblyOptions, Bank, BankProfile, Boleto, Creditor, Debtor, OutputOptions,
    Payment,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rayon::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Helper Functions
// =============================================================================

fn make_creditor(bank: Bank) -> Creditor {
    let mut creditor = Creditor {
        document: "12345678000190".into(),
        name: "Empresa Exemplo Ltda".into(),
        agency: "4042".into(),
        account: "61900".into(),
        wallet: "109".into(),
        ..Default::default()
    };
    match bank {
        Bank::Santander => creditor.transmission_code = Some("404200006190".into()),
        Bank::Caixa => creditor.transmission_code = Some("005507".into()),
        _ => {}
    }
    creditor
}

fn make_payments(count: u32) -> Vec<Payment> {
    (1..=count)
        .map(|i| {
            Payment::new(
                Decimal::new(i64::from(i) * 1_234, 2),
                NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                i.to_string(),
                format!("NF{i}"),
                Debtor {
                    name: format!("Pagador Número {i}"),
                    document: "12345678901".into(),
                    ..Default::default()
                },
            )
        })
        .collect()
}

fn assembler(bank: Bank) -> Assembler {
    let generated_at = NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    Assembler::new(bank, AssemblyOptions::new(generated_at))
}

// =============================================================================
// Check Digit Benchmarks
// =============================================================================

fn bench_check_digits(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_digits");

    group.bench_function("mod10", |b| {
        b.iter(|| checksum::mod10(black_box("40426190010912345678")).unwrap())
    });
    group.bench_function("mod11_barcode", |b| {
        b.iter(|| {
            checksum::mod11(
                black_box("3419974300000150001091234567824042619009000"),
                Mod11Policy::BARCODE,
            )
            .unwrap()
        })
    });
    group.finish();
}

fn bench_boleto(c: &mut Criterion) {
    let creditor = make_creditor(Bank::Itau);
    let payment = make_payments(1).remove(0);

    c.bench_function("boleto_itau", |b| {
        b.iter(|| Boleto::new(Bank::Itau, black_box(&creditor), black_box(&payment)).unwrap())
    });
    c.bench_function("barcode_santander", |b| {
        let creditor = make_creditor(Bank::Santander);
        let profile = Bank::Santander.profile();
        b.iter(|| profile.barcode(black_box(&creditor), black_box(&payment)).unwrap())
    });
}

// =============================================================================
// Assembly Benchmarks
// =============================================================================

fn bench_single_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_file");
    let payments = make_payments(1);

    for bank in [Bank::Santander, Bank::Itau] {
        let creditor = make_creditor(bank);
        let assembler = assembler(bank);
        group.bench_function(bank.code(), |b| {
            b.iter(|| {
                assembler
                    .assemble(black_box(&creditor), black_box(&payments), 1)
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_payment_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("payment_throughput");
    let creditor = make_creditor(Bank::Caixa);
    let assembler = assembler(Bank::Caixa);

    for count in [100u32, 1_000, 10_000].iter() {
        let payments = make_payments(*count);
        group.throughput(Throughput::Elements(u64::from(*count)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &payments, |b, payments| {
            b.iter(|| {
                let remessa = assembler.assemble(&creditor, payments, 1).unwrap();
                black_box(remessa.to_text(&OutputOptions::default()));
            })
        });
    }
    group.finish();
}

// =============================================================================
// Parallel Benchmarks
// =============================================================================

fn bench_parallel_creditors(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_creditors");
    let payments = make_payments(100);

    for creditors in [4usize, 16, 64].iter() {
        let jobs: Vec<Creditor> = (0..*creditors)
            .map(|n| {
                let mut creditor = make_creditor(Bank::Santander);
                creditor.name = format!("Empresa {n}");
                creditor
            })
            .collect();
        group.throughput(Throughput::Elements(*creditors as u64));
        group.bench_with_input(BenchmarkId::from_parameter(creditors), &jobs, |b, jobs| {
            let assembler = assembler(Bank::Santander);
            b.iter(|| {
                let files: Vec<_> = jobs
                    .par_iter()
                    .map(|creditor| assembler.assemble(creditor, &payments, 1).unwrap())
                    .collect();
                black_box(files);
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_check_digits,
    bench_boleto,
    bench_single_file,
    bench_payment_throughput,
    bench_parallel_creditors,
);
criterion_main!(benches);
