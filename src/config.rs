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

//! Job configuration.
//!
//! A remessa job is described by a TOML file naming the bank, the file
//! sequence number and the creditor:
//!
//! ```toml
//! bank = "033"
//! sequence = 1
//! generated_at = "2024-06-01T09:15:00"
//!
//! [output]
//! line_ending = "crlf"
//! final_newline = true
//!
//! [creditor]
//! document = "12345678912"
//! name = "Kivanio Barbosa"
//! agency = "4042"
//! account = "61900"
//! wallet = "101"
//! transmission_code = "404200006190"
//! ```

use crate::assembler::AssemblyOptions;
use crate::banks::Bank;
use crate::error::RemessaError;
use crate::model::Creditor;
use crate::remessa::OutputOptions;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error(transparent)]
    Bank(#[from] RemessaError),
}

/// One remessa job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Three-digit bank code.
    pub bank: String,

    /// File sequence number, tracked by the caller across files.
    #[serde(default = "default_sequence")]
    pub sequence: u32,

    /// Fixed generation timestamp; the current local time when absent.
    #[serde(default)]
    pub generated_at: Option<NaiveDateTime>,

    #[serde(default)]
    pub output: OutputOptions,

    pub creditor: Creditor,
}

fn default_sequence() -> u32 {
    1
}

impl JobConfig {
    /// Loads a job from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        content.parse()
    }

    /// Resolves the configured bank code.
    pub fn bank(&self) -> Result<Bank, ConfigError> {
        Ok(Bank::from_code(&self.bank)?)
    }

    /// Assembly options, stamping `now` unless a timestamp is configured.
    pub fn assembly_options(&self, now: NaiveDateTime) -> AssemblyOptions {
        AssemblyOptions::new(self.generated_at.unwrap_or(now))
    }
}

impl std::str::FromStr for JobConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
