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

use clap::Parser;
use cnab_remessa::{
    Assembler, Bank, Boleto, Creditor, Debtor, Fine, FineKind, Interest, InterestKind, JobConfig,
    Payment, RemessaError,
};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Remessa generator - Build CNAB remessa files from payment CSVs
///
/// Reads the job (bank, sequence, creditor) from a TOML file and the
/// payments from a CSV file, then writes the remessa to stdout or a file.
#[derive(Parser, Debug)]
#[command(name = "cnab-remessa")]
#[command(about = "Assembles CNAB 240/400 remessa files", long_about = None)]
struct Args {
    /// Path to the TOML job description
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Path to CSV file with payments
    ///
    /// Expected columns: amount,due_date,our_number,document_number,
    /// debtor_name,debtor_document, plus optional address, lot and policy columns
    #[arg(value_name = "PAYMENTS")]
    payments: PathBuf,

    /// Write the remessa here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also write boleto display data (barcode, digitable line) as CSV
    #[arg(long, value_name = "FILE")]
    boletos: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let job = JobConfig::from_file(&args.config)?;
    let bank = job.bank()?;
    let options = job.assembly_options(chrono::Local::now().naive_local());

    let file = File::open(&args.payments)
        .map_err(|e| format!("opening '{}': {e}", args.payments.display()))?;
    let lots = read_payments(BufReader::new(file))?;
    let groups: Vec<&[Payment]> = lots.iter().map(Vec::as_slice).collect();

    let remessa = Assembler::new(bank, options).assemble_lots(&job.creditor, &groups, job.sequence)?;
    let boletos = match &args.boletos {
        Some(_) => build_boletos(bank, &job.creditor, lots.iter().flatten())?,
        None => Vec::new(),
    };

    match &args.output {
        Some(path) => remessa.write_to(BufWriter::new(File::create(path)?), &job.output)?,
        None => remessa.write_to(io::stdout().lock(), &job.output)?,
    }

    if let Some(path) = &args.boletos {
        write_boletos(&boletos, File::create(path)?)?;
    }

    info!(
        bank = %bank,
        lots = groups.len(),
        lines = remessa.len(),
        "remessa written"
    );
    Ok(())
}

/// Raw CSV row for one payment.
#[derive(Debug, Deserialize)]
struct CsvPayment {
    amount: Decimal,
    due_date: NaiveDate,
    our_number: String,
    document_number: String,
    debtor_name: String,
    debtor_document: String,
    #[serde(default)]
    debtor_street: String,
    #[serde(default)]
    debtor_district: String,
    #[serde(default)]
    debtor_zip: String,
    #[serde(default)]
    debtor_city: String,
    #[serde(default)]
    debtor_state: String,
    /// Lot the payment belongs to; rows without one join lot 1.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    lot: Option<u32>,
    /// Monthly interest rate, in percent.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    interest_rate: Option<Decimal>,
    /// Late payment fine, in percent.
    #[serde(default, deserialize_with = "csv::invalid_option")]
    fine_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    protest_days: Option<u32>,
    #[serde(default)]
    message: String,
}

impl CsvPayment {
    fn into_payment(self) -> (u32, Payment) {
        let debtor = Debtor {
            name: self.debtor_name,
            document: self.debtor_document,
            address: cnab_remessa::Address {
                street: self.debtor_street,
                district: self.debtor_district,
                zip: self.debtor_zip,
                city: self.debtor_city,
                state: self.debtor_state,
            },
        };
        let mut payment = Payment::new(
            self.amount,
            self.due_date,
            self.our_number,
            self.document_number,
            debtor,
        );
        if let Some(rate) = self.interest_rate {
            payment.interest = Interest {
                kind: InterestKind::MonthlyRate,
                date: None,
                value: rate,
            };
        }
        if let Some(percent) = self.fine_percent {
            payment.fine = Fine {
                kind: FineKind::Percent,
                date: None,
                value: percent,
            };
        }
        payment.protest_days = self.protest_days.unwrap_or(0);
        if !self.message.is_empty() {
            payment.message = Some(self.message);
        }
        (self.lot.unwrap_or(1), payment)
    }
}

/// Reads payments from CSV, grouped into lots in order of first appearance.
///
/// Unlike a best-effort import, a remessa is all-or-nothing: the first
/// malformed row aborts the read.
///
/// # Errors
///
/// Returns a CSV error if the reader fails or a row does not parse.
fn read_payments<R: Read>(reader: R) -> Result<Vec<Vec<Payment>>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);

    let mut lots: Vec<(u32, Vec<Payment>)> = Vec::new();
    for row in rdr.deserialize::<CsvPayment>() {
        let (lot, payment) = row?.into_payment();
        match lots.iter_mut().find(|(id, _)| *id == lot) {
            Some((_, payments)) => payments.push(payment),
            None => lots.push((lot, vec![payment])),
        }
    }
    Ok(lots.into_iter().map(|(_, payments)| payments).collect())
}

/// Flat boleto row; the full [`Boleto`] carries a list of instructions CSV
/// cannot hold.
#[derive(Debug, Serialize)]
struct CsvBoleto<'a> {
    bank_code: &'a str,
    document_number: &'a str,
    our_number: &'a str,
    agency_account: &'a str,
    due_date: NaiveDate,
    amount: String,
    debtor_name: &'a str,
    digitable_line: &'a str,
    barcode: &'a str,
}

fn build_boletos<'a>(
    bank: Bank,
    creditor: &Creditor,
    payments: impl Iterator<Item = &'a Payment>,
) -> Result<Vec<Boleto>, RemessaError> {
    payments
        .map(|payment| Boleto::new(bank, creditor, payment))
        .collect()
}

fn write_boletos<W: Write>(boletos: &[Boleto], writer: W) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(writer);
    for boleto in boletos {
        wtr.serialize(CsvBoleto {
            bank_code: &boleto.bank_code,
            document_number: &boleto.document_number,
            our_number: &boleto.our_number,
            agency_account: &boleto.agency_account,
            due_date: boleto.due_date,
            amount: boleto.amount_display(),
            debtor_name: &boleto.debtor_name,
            digitable_line: &boleto.digitable_line,
            barcode: &boleto.barcode,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
