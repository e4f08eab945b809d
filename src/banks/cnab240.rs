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

//! Shared CNAB 240 record shapes.
//!
//! Segments P, Q and R, the lot trailer and the file trailer follow the
//! FEBRABAN layout for every bank; profiles fill in the bank-specific column
//! ranges through the required methods and override the tail hooks when
//! their manual diverges.

use super::{BankProfile, FileContext, FileTotals, LotSummary};
use crate::error::RemessaError;
use crate::format;
use crate::model::{Payment, PersonKind};
use crate::record::{Layout, Record, RecordBuilder, RecordKind};

/// Record rendering for banks on the 240-column layout.
pub trait Cnab240: BankProfile {
    fn file_header(&self, ctx: &FileContext<'_>) -> Result<Record, RemessaError>;

    fn lot_header(&self, ctx: &FileContext<'_>, lot: u32) -> Result<Record, RemessaError>;

    /// Segment P columns 18-62: creditor account and our number.
    fn segment_p_identification(
        &self,
        r: &mut RecordBuilder,
        ctx: &FileContext<'_>,
        payment: &Payment,
    ) -> Result<(), RemessaError>;

    /// Segment P columns 63-77, 101-106 and 224-240.
    fn segment_p_bank_fields(
        &self,
        r: &mut RecordBuilder,
        ctx: &FileContext<'_>,
        payment: &Payment,
    ) -> Result<(), RemessaError>;

    /// Implied decimals of the interest value in segment P.
    fn interest_scale(&self, _payment: &Payment) -> u32 {
        2
    }

    fn needs_segment_r(&self, payment: &Payment) -> bool {
        payment.fine.is_set()
            || payment.second_discount.is_set()
            || !payment.message().trim().is_empty()
    }

    /// Segment Q columns 210-240.
    fn segment_q_tail(&self, r: &mut RecordBuilder) -> Result<(), RemessaError> {
        r.zeros("correspondent_bank", 210..=212)?
            .blank("correspondent_our_number", 213..=232)?
            .blank("reserved", 233..=240)?;
        Ok(())
    }

    /// Segment R columns 180-240.
    fn segment_r_tail(&self, r: &mut RecordBuilder) -> Result<(), RemessaError> {
        r.blank("debit_occurrence", 180..=199)?
            .zeros("debit_account", 200..=207)?
            .blank("reserved", 208..=240)?;
        Ok(())
    }

    /// Lot trailer columns 24-240.
    fn lot_trailer_tail(
        &self,
        r: &mut RecordBuilder,
        summary: &LotSummary,
    ) -> Result<(), RemessaError> {
        r.number("simple_count", 24..=29, summary.payments as u64)?
            .amount("simple_total", 30..=46, summary.total_amount)?
            .zeros("linked_count", 47..=52)?
            .zeros("linked_total", 53..=69)?
            .zeros("secured_count", 70..=75)?
            .zeros("secured_total", 76..=92)?
            .zeros("discounted_count", 93..=98)?
            .zeros("discounted_total", 99..=115)?
            .blank("notice_number", 116..=123)?
            .blank("reserved", 124..=240)?;
        Ok(())
    }

    /// Lot number written in file trailer columns 4-7.
    fn file_trailer_lot(&self, _totals: &FileTotals) -> u64 {
        9999
    }

    /// File trailer columns 30-240.
    fn file_trailer_tail(
        &self,
        r: &mut RecordBuilder,
        _totals: &FileTotals,
    ) -> Result<(), RemessaError> {
        r.zeros("reconciliation_accounts", 30..=35)?
            .blank("reserved", 36..=240)?;
        Ok(())
    }

    /// Detail segments of one payment, numbered from `sequence` within the
    /// lot: P, Q and R when [`Cnab240::needs_segment_r`] holds.
    fn detail_segments(
        &self,
        ctx: &FileContext<'_>,
        lot: u32,
        sequence: u32,
        payment: &Payment,
    ) -> Result<Vec<Record>, RemessaError> {
        let mut records = vec![
            segment_p(self, ctx, lot, sequence, payment)?,
            segment_q(self, lot, sequence + 1, payment)?,
        ];
        if self.needs_segment_r(payment) {
            records.push(segment_r(self, lot, sequence + 2, payment)?);
        }
        Ok(records)
    }

    fn lot_trailer(&self, lot: u32, summary: &LotSummary) -> Result<Record, RemessaError> {
        let mut r = RecordBuilder::new(Layout::Cnab240, RecordKind::LotTrailer, self.code());
        r.numeric("bank_code", 1..=3, self.code())?
            .number("lot", 4..=7, lot.into())?
            .flag("record_type", 8, '5')?
            .blank("reserved", 9..=17)?
            .number("record_count", 18..=23, summary.records as u64)?;
        self.lot_trailer_tail(&mut r, summary)?;
        r.finish()
    }

    fn file_trailer(&self, totals: &FileTotals) -> Result<Record, RemessaError> {
        let mut r = RecordBuilder::new(Layout::Cnab240, RecordKind::FileTrailer, self.code());
        r.numeric("bank_code", 1..=3, self.code())?
            .number("lot", 4..=7, self.file_trailer_lot(totals))?
            .flag("record_type", 8, '9')?
            .blank("reserved", 9..=17)?
            .number("lot_count", 18..=23, totals.lots as u64)?
            .number("record_count", 24..=29, totals.records as u64)?;
        self.file_trailer_tail(&mut r, totals)?;
        r.finish()
    }
}

/// Columns 1-17 shared by every detail segment.
fn segment_prefix<B: Cnab240 + ?Sized>(
    bank: &B,
    segment: char,
    lot: u32,
    sequence: u32,
    payment: &Payment,
) -> Result<RecordBuilder, RemessaError> {
    let mut r = RecordBuilder::new(Layout::Cnab240, RecordKind::Segment(segment), bank.code());
    r.numeric("bank_code", 1..=3, bank.code())?
        .number("lot", 4..=7, lot.into())?
        .flag("record_type", 8, '3')?
        .number("sequence", 9..=13, sequence.into())?
        .flag("segment", 14, segment)?
        .blank("reserved", 15..=15)?
        .numeric("occurrence", 16..=17, payment.occurrence.code())?;
    Ok(r)
}

/// Person-type code of a tax document; `0` when it is neither CPF nor CNPJ.
pub(crate) fn person_code(document: &str) -> char {
    PersonKind::of(document).map_or('0', PersonKind::code)
}

fn segment_p<B: Cnab240 + ?Sized>(
    bank: &B,
    ctx: &FileContext<'_>,
    lot: u32,
    sequence: u32,
    payment: &Payment,
) -> Result<Record, RemessaError> {
    let mut r = segment_prefix(bank, 'P', lot, sequence, payment)?;
    bank.segment_p_identification(&mut r, ctx, payment)?;
    bank.segment_p_bank_fields(&mut r, ctx, payment)?;

    let interest = &payment.interest;
    let discount = &payment.discount;

    r.date("due_date", 78..=85, Some(payment.due_date))?
        .amount("amount", 86..=100, payment.amount)?
        .numeric("kind", 107..=108, payment.kind.trim())?
        .flag("acceptance", 109, 'N')?
        .date(
            "issue_date",
            110..=117,
            Some(payment.issue_date.unwrap_or(ctx.generated_on())),
        )?
        .flag("interest_code", 118, interest.kind.code())?
        .date("interest_date", 119..=126, payment.interest_date())?
        .decimal(
            "interest_value",
            127..=141,
            interest.value,
            bank.interest_scale(payment),
        )?
        .flag("discount_code", 142, discount.kind.code())?
        .date("discount_date", 143..=150, discount.date)?
        .amount("discount_value", 151..=165, discount.value)?
        .amount("iof", 166..=180, payment.iof)?
        .amount("abatement", 181..=195, payment.abatement)?
        .text("company_use", 196..=220, &payment.document_number)?
        .flag("protest_code", 221, payment.protest_code())?
        .number("protest_days", 222..=223, payment.protest_days.into())?;
    r.finish()
}

fn segment_q<B: Cnab240 + ?Sized>(
    bank: &B,
    lot: u32,
    sequence: u32,
    payment: &Payment,
) -> Result<Record, RemessaError> {
    let debtor = &payment.debtor;
    let address = &debtor.address;
    let zip = format::left_pad(&format::digits(&address.zip), 8, '0');

    let mut r = segment_prefix(bank, 'Q', lot, sequence, payment)?;
    r.flag("debtor_person_kind", 18, person_code(&debtor.document))?
        .numeric("debtor_document", 19..=33, &debtor.document_digits())?
        .text("debtor_name", 34..=73, &debtor.name)?
        .text("debtor_street", 74..=113, &address.street)?
        .text("debtor_district", 114..=128, &address.district)?
        .numeric("debtor_zip", 129..=133, &zip[..5])?
        .numeric("debtor_zip_suffix", 134..=136, &zip[5..])?
        .text("debtor_city", 137..=151, &address.city)?
        .text("debtor_state", 152..=153, &address.state)?
        .flag("guarantor_person_kind", 154, '0')?
        .zeros("guarantor_document", 155..=169)?
        .blank("guarantor_name", 170..=209)?;
    bank.segment_q_tail(&mut r)?;
    r.finish()
}

fn segment_r<B: Cnab240 + ?Sized>(
    bank: &B,
    lot: u32,
    sequence: u32,
    payment: &Payment,
) -> Result<Record, RemessaError> {
    let second = &payment.second_discount;
    let fine = &payment.fine;

    let mut r = segment_prefix(bank, 'R', lot, sequence, payment)?;
    r.flag("second_discount_code", 18, second.kind.code())?
        .date("second_discount_date", 19..=26, second.date)?
        .amount("second_discount_value", 27..=41, second.value)?
        .blank("third_discount", 42..=65)?
        .flag("fine_code", 66, fine.kind.code())?
        .date(
            "fine_date",
            67..=74,
            fine.is_set().then(|| fine.date.unwrap_or(payment.due_date)),
        )?
        .amount("fine_value", 75..=89, fine.value)?
        .blank("debtor_notice", 90..=99)?
        .text("message", 100..=179, payment.message())?;
    bank.segment_r_tail(&mut r)?;
    r.finish()
}

/// Columns 1-8 of a file header.
pub(crate) fn file_header_prefix(bank: &'static str) -> Result<RecordBuilder, RemessaError> {
    let mut r = RecordBuilder::new(Layout::Cnab240, RecordKind::FileHeader, bank);
    r.numeric("bank_code", 1..=3, bank)?
        .zeros("lot", 4..=7)?
        .flag("record_type", 8, '0')?;
    Ok(r)
}

/// Columns 1-17 of a lot header for a remittance of receivables.
pub(crate) fn lot_header_prefix(
    bank: &'static str,
    lot: u32,
    service_use: &str,
    version: &str,
) -> Result<RecordBuilder, RemessaError> {
    let mut r = RecordBuilder::new(Layout::Cnab240, RecordKind::LotHeader, bank);
    r.numeric("bank_code", 1..=3, bank)?
        .number("lot", 4..=7, lot.into())?
        .flag("record_type", 8, '1')?
        .flag("operation", 9, 'R')?
        .constant("service", 10..=11, "01")?
        .constant("service_use", 12..=13, service_use)?
        .numeric("layout_version", 14..=16, version)?
        .blank("reserved", 17..=17)?;
    Ok(r)
}
