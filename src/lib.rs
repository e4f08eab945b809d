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

//! # CNAB Remessa
//!
//! This library builds CNAB 240 and CNAB 400 remessa files: the fixed-width
//! text files a creditor uploads to a Brazilian bank to register, change or
//! cancel boletos.
//!
//! ## Core Components
//!
//! - [`Assembler`]: Validates input and assembles a complete, audited file
//! - [`BankProfile`]: Per-bank layout, validation rules and check digits
//! - [`Bank`]: The supported banks, selectable by three-digit code
//! - [`Boleto`]: Barcode, digitable line and display strings of a payment
//! - [`RemessaError`]: Error types for assembly failures
//!
//! ## Example
//!
//! ```
//! use cnab_remessa::{Assembler, AssemblyOptions, Bank, Creditor, Debtor, OutputOptions, Payment};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let generated_at = NaiveDate::from_ymd_opt(2024, 6, 1)
//!     .unwrap()
//!     .and_hms_opt(9, 15, 0)
//!     .unwrap();
//! let assembler = Assembler::new(Bank::Santander, AssemblyOptions::new(generated_at));
//!
//! let creditor = Creditor {
//!     document: "12345678912".into(),
//!     name: "Kivanio Barbosa".into(),
//!     agency: "4042".into(),
//!     account: "61900".into(),
//!     wallet: "101".into(),
//!     transmission_code: Some("404200006190".into()),
//!     ..Default::default()
//! };
//! let debtor = Debtor {
//!     name: "Pagador".into(),
//!     document: "12345678901".into(),
//!     ..Default::default()
//! };
//! let due = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
//! let payment = Payment::new(dec!(150.00), due, "1", "1", debtor);
//!
//! let remessa = assembler.assemble(&creditor, &[payment], 1).unwrap();
//! assert!(remessa.lines().all(|line| line.len() == 240));
//!
//! let text = remessa.to_text(&OutputOptions::default());
//! assert!(text.starts_with("033"));
//! ```
//!
//! ## Thread Safety
//!
//! Profiles are stateless and the assembler keeps nothing between calls,
//! so files for different creditors may be assembled in parallel.

mod assembler;
pub mod banks;
pub mod barcode;
mod boleto;
pub mod checksum;
pub mod config;
pub mod error;
pub mod format;
mod model;
pub mod record;
mod remessa;
pub mod render;
pub mod validator;

pub use assembler::{Assembler, AssemblyOptions};
pub use banks::{Bank, BankProfile};
pub use boleto::Boleto;
pub use config::{ConfigError, JobConfig};
pub use error::{FieldError, RemessaError, ValidationError, Violation, ViolationKind};
pub use model::{
    Address, Creditor, Debtor, Discount, DiscountKind, Fine, FineKind, Interest, InterestKind,
    Occurrence, Payment, PersonKind,
};
pub use record::{Layout, Record, RecordKind};
pub use remessa::{LineEnding, OutputOptions, Remessa};
pub use render::{BoletoRenderer, OutputFormat, RenderConfig};
