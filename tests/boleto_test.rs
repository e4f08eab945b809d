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

//! Boleto display data integration tests.

use chrono::NaiveDate;
use cnab_remessa::{Bank, BankProfile, Boleto, Creditor, Debtor, Payment, RemessaError, barcode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn creditor(wallet: &str, transmission_code: Option<&str>) -> Creditor {
    Creditor {
        document: "12345678912".into(),
        name: "Kivanio Barbosa".into(),
        agency: "4042".into(),
        account: "61900".into(),
        wallet: wallet.into(),
        transmission_code: transmission_code.map(Into::into),
        messages: vec!["Não receber após o vencimento".into()],
        ..Default::default()
    }
}

fn make_payment(our_number: &str, amount: Decimal) -> Payment {
    Payment::new(
        amount,
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
        our_number,
        "NF-1",
        Debtor {
            name: "Pagador".into(),
            document: "12345678901".into(),
            ..Default::default()
        },
    )
}

#[test]
fn itau_boleto() {
    let boleto = Boleto::new(
        Bank::Itau,
        &creditor("109", None),
        &make_payment("12345678", dec!(150.00)),
    )
    .unwrap();

    assert_eq!(boleto.bank_code, "341-7");
    assert_eq!(boleto.due_factor, 9743);
    assert_eq!(boleto.barcode, "34191974300000150001091234567824042619009000");
    assert_eq!(
        boleto.digitable_line,
        "34191.09123 34567.824049 26190.090006 1 97430000015000"
    );
    assert_eq!(boleto.our_number, "109/12345678-2");
    assert_eq!(boleto.agency_account, "4042 / 61900-9");
    assert_eq!(boleto.amount_display(), "150,00");
    assert_eq!(boleto.instructions, vec!["Não receber após o vencimento"]);
}

#[test]
fn santander_boleto() {
    let boleto = Boleto::new(
        Bank::Santander,
        &creditor("101", Some("404200006190")),
        &make_payment("1", dec!(150.00)),
    )
    .unwrap();

    assert_eq!(boleto.bank_code, "033-7");
    assert_eq!(boleto.barcode, "03397974300000150009000619000000000000190101");
    assert_eq!(
        boleto.digitable_line,
        "03399.00060 19000.000000 00001.901016 7 97430000015000"
    );
}

#[test]
fn caixa_boleto() {
    let boleto = Boleto::new(
        Bank::Caixa,
        &creditor("14", Some("005507")),
        &make_payment("19", dec!(10.00)),
    )
    .unwrap();

    assert_eq!(boleto.bank_code, "104-0");
    assert_eq!(boleto.barcode, "10491974300000010000055077000100040000000190");
    assert_eq!(
        boleto.digitable_line,
        "10490.05505 77000.100048 00000.001909 1 97430000001000"
    );
    assert_eq!(boleto.our_number, "14000000000000019-7");
}

#[test]
fn payment_message_follows_creditor_instructions() {
    let mut payment = make_payment("1", dec!(1.00));
    payment.message = Some("Referente a junho".into());
    let boleto = Boleto::new(Bank::Itau, &creditor("109", None), &payment).unwrap();
    assert_eq!(
        boleto.instructions,
        vec!["Não receber após o vencimento", "Referente a junho"]
    );
}

#[test]
fn barcode_check_digit_matches_recomputation() {
    for bank in [Bank::Itau, Bank::Santander, Bank::Caixa] {
        let creditor = match bank {
            Bank::Santander => creditor("101", Some("404200006190")),
            Bank::Caixa => creditor("14", Some("005507")),
            _ => creditor("109", None),
        };
        let payment = make_payment("7", dec!(1234.56));
        let code = bank.profile().barcode(&creditor, &payment).unwrap();

        assert_eq!(code.len(), barcode::BARCODE_LEN);
        let without_dv = format!("{}{}", &code[..4], &code[5..]);
        let dv = cnab_remessa::checksum::mod11(
            &without_dv,
            cnab_remessa::checksum::Mod11Policy::BARCODE,
        )
        .unwrap();
        assert_eq!(code.chars().nth(4), Some(dv), "{bank}");
        assert_eq!(&code[9..19], "0000123456");
    }
}

#[test]
fn oversized_amount_cannot_enter_barcode() {
    let err = Boleto::new(
        Bank::Itau,
        &creditor("109", None),
        &make_payment("1", dec!(100000000.00)),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RemessaError::Barcode {
            field: "amount",
            ..
        }
    ));
}
