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

//! Assembled remessa files and their serialization.

use crate::banks::Bank;
use crate::record::{Layout, Record};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Line separator written between records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n`, what bank transmission channels expect.
    #[default]
    Crlf,
    /// `\n`.
    Lf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "\r\n",
            Self::Lf => "\n",
        }
    }
}

/// How records are joined when written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub line_ending: LineEnding,
    /// Terminate the last record with a line ending too.
    pub final_newline: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Crlf,
            final_newline: true,
        }
    }
}

/// A complete, audited remessa file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remessa {
    bank: Bank,
    layout: Layout,
    records: Vec<Record>,
}

impl Remessa {
    pub(crate) fn new(bank: Bank, layout: Layout, records: Vec<Record>) -> Self {
        Self {
            bank,
            layout,
            records,
        }
    }

    pub fn bank(&self) -> Bank {
        self.bank
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Record lines in file order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(Record::as_str)
    }

    /// Number of lines in the file.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The whole file as text.
    pub fn to_text(&self, options: &OutputOptions) -> String {
        let separator = options.line_ending.as_str();
        let mut text = self.lines().collect::<Vec<_>>().join(separator);
        if options.final_newline && !self.records.is_empty() {
            text.push_str(separator);
        }
        text
    }

    /// Streams the file to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W, options: &OutputOptions) -> io::Result<()> {
        let separator = options.line_ending.as_str().as_bytes();
        let last = self.records.len().saturating_sub(1);
        for (i, line) in self.lines().enumerate() {
            writer.write_all(line.as_bytes())?;
            if i < last || options.final_newline {
                writer.write_all(separator)?;
            }
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecordBuilder, RecordKind};

    fn remessa() -> Remessa {
        let records = ['0', '9']
            .into_iter()
            .enumerate()
            .map(|(i, kind)| {
                let record_kind = if kind == '0' {
                    RecordKind::FileHeader
                } else {
                    RecordKind::FileTrailer
                };
                let mut r = RecordBuilder::new(Layout::Cnab400, record_kind, "000");
                r.flag("record_type", 1, kind).unwrap();
                r.blank("reserved", 2..=394).unwrap();
                r.number("sequence", 395..=400, i as u64 + 1).unwrap();
                r.finish().unwrap()
            })
            .collect();
        Remessa::new(Bank::Placeholder, Layout::Cnab400, records)
    }

    #[test]
    fn text_uses_crlf_by_default() {
        let text = remessa().to_text(&OutputOptions::default());
        assert_eq!(text.len(), 2 * 402);
        assert!(text.ends_with("000002\r\n"));
        assert_eq!(text.matches("\r\n").count(), 2);
    }

    #[test]
    fn text_with_lf_and_no_final_newline() {
        let options = OutputOptions {
            line_ending: LineEnding::Lf,
            final_newline: false,
        };
        let text = remessa().to_text(&options);
        assert_eq!(text.len(), 801);
        assert!(text.ends_with("000002"));
    }

    #[test]
    fn write_to_matches_to_text() {
        let options = OutputOptions::default();
        let remessa = remessa();
        let mut buf = Vec::new();
        remessa.write_to(&mut buf, &options).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), remessa.to_text(&options));
    }
}
