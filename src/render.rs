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

//! Boleto rendering seam.
//!
//! Producing images or documents is delegated to a [`BoletoRenderer`]
//! implementation. This module fixes the set of output formats and checks a
//! request against what the renderer declares before handing it over.

use crate::boleto::Boleto;
use crate::error::RemessaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output formats a renderer may produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Jpg,
    Png,
    Tif,
    Ps,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Pdf,
        OutputFormat::Jpg,
        OutputFormat::Png,
        OutputFormat::Tif,
        OutputFormat::Ps,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Tif => "tif",
            Self::Ps => "ps",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tif => "image/tiff",
            Self::Ps => "application/postscript",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RemessaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == name)
            .ok_or_else(|| RemessaError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Rendering settings, passed explicitly with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    /// Dots per inch for raster formats.
    pub resolution: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pdf,
            resolution: 150,
        }
    }
}

/// Something that turns boleto display data into a document.
pub trait BoletoRenderer {
    /// Formats this renderer can produce.
    fn formats(&self) -> &[OutputFormat];

    /// Renders `boletos` as a single document in `config.format`.
    fn render(&self, boletos: &[Boleto], config: &RenderConfig) -> Result<Vec<u8>, RemessaError>;
}

/// Renders `boletos` through `renderer`.
///
/// # Errors
///
/// [`RemessaError::UnsupportedFormat`] if the renderer does not declare
/// `config.format`; otherwise whatever the renderer reports.
pub fn render<R: BoletoRenderer + ?Sized>(
    renderer: &R,
    boletos: &[Boleto],
    config: &RenderConfig,
) -> Result<Vec<u8>, RemessaError> {
    if !renderer.formats().contains(&config.format) {
        return Err(RemessaError::UnsupportedFormat(config.format.to_string()));
    }
    tracing::debug!(
        format = %config.format,
        resolution = config.resolution,
        boletos = boletos.len(),
        "rendering boletos"
    );
    renderer.render(boletos, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PngOnly;

    impl BoletoRenderer for PngOnly {
        fn formats(&self) -> &[OutputFormat] {
            &[OutputFormat::Png]
        }

        fn render(&self, boletos: &[Boleto], config: &RenderConfig) -> Result<Vec<u8>, RemessaError> {
            Ok(format!("{} boletos at {} dpi", boletos.len(), config.resolution).into_bytes())
        }
    }

    #[test]
    fn parses_known_formats() {
        assert_eq!("PDF".parse::<OutputFormat>(), Ok(OutputFormat::Pdf));
        assert_eq!("tif".parse::<OutputFormat>(), Ok(OutputFormat::Tif));
        assert_eq!(
            "bmp".parse::<OutputFormat>(),
            Err(RemessaError::UnsupportedFormat("bmp".into()))
        );
    }

    #[test]
    fn default_config_is_pdf_at_150() {
        let config = RenderConfig::default();
        assert_eq!(config.format, OutputFormat::Pdf);
        assert_eq!(config.resolution, 150);
    }

    #[test]
    fn rejects_formats_the_renderer_lacks() {
        let err = render(&PngOnly, &[], &RenderConfig::default()).unwrap_err();
        assert_eq!(err, RemessaError::UnsupportedFormat("pdf".into()));

        let config = RenderConfig {
            format: OutputFormat::Png,
            resolution: 300,
        };
        assert_eq!(render(&PngOnly, &[], &config).unwrap(), b"0 boletos at 300 dpi");
    }
}
