//! Report presentation settings.
//!
//! Every field has a default, so an empty or partial configuration source
//! deserializes into a usable [`ReportConfig`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CvpError;
use crate::CvpResult;

pub const DEFAULT_FILE_NAME: &str = "finance_report.pdf";
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Top-level configuration for assembling and exporting a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Document and screen title
    pub title: String,
    /// Fixed label printed before every monetary amount
    pub currency_label: String,
    pub sections: SectionToggles,
    /// Include the per-product breakdown table in the contribution section
    pub product_table: bool,
    pub export: ExportConfig,
}

/// Which report sections to render. Order is fixed regardless of toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionToggles {
    pub company_details: bool,
    pub production_stop: bool,
    pub contribution_chart: bool,
    pub break_even: bool,
    pub supplier_evaluation: bool,
}

/// Document export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Whether a document is produced alongside the screen summary
    pub enabled: bool,
    pub file_name: String,
    /// Where the transient chart image is written while a document is
    /// built. Defaults to the system temp directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_dir: Option<PathBuf>,
    pub chart: ChartStyle,
}

/// Raster chart dimensions and bar colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    /// RGB
    pub bar_color: [u8; 3],
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: "Finance Report".to_string(),
            currency_label: "Rs.".to_string(),
            sections: SectionToggles::default(),
            product_table: true,
            export: ExportConfig::default(),
        }
    }
}

impl Default for SectionToggles {
    fn default() -> Self {
        SectionToggles {
            company_details: true,
            production_stop: true,
            contribution_chart: true,
            break_even: true,
            supplier_evaluation: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            enabled: true,
            file_name: DEFAULT_FILE_NAME.to_string(),
            artifact_dir: None,
            chart: ChartStyle::default(),
        }
    }
}

impl ExportConfig {
    /// The file name is handed to callers for saving or download, so it must
    /// be a bare name with no directory part.
    pub fn validate(&self) -> CvpResult<()> {
        let name = self.file_name.trim();
        if name.is_empty() {
            return Err(CvpError::invalid("export.file_name", "must not be empty"));
        }
        if name.contains(|c: char| c == '/' || c == '\\') || name == "." || name == ".." {
            return Err(CvpError::invalid(
                "export.file_name",
                format!("'{}' must be a bare file name", self.file_name),
            ));
        }
        Ok(())
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            width: 800,
            height: 480,
            bar_color: [220, 38, 38],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let cfg: ReportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ReportConfig::default());
        assert_eq!(cfg.export.file_name, "finance_report.pdf");
    }

    #[test]
    fn test_partial_section_toggles() {
        let cfg: ReportConfig =
            serde_json::from_str(r#"{"sections": {"supplier_evaluation": false}}"#).unwrap();
        assert!(!cfg.sections.supplier_evaluation);
        assert!(cfg.sections.company_details);
        assert_eq!(cfg.currency_label, "Rs.");
    }

    #[test]
    fn test_default_file_name_is_valid() {
        assert!(ExportConfig::default().validate().is_ok());
    }

    #[test]
    fn test_file_name_must_be_bare() {
        for bad in ["", "  ", "../escape.pdf", "reports/q3.pdf", "C:\\q3.pdf", ".."] {
            let config = ExportConfig {
                file_name: bad.to_string(),
                ..ExportConfig::default()
            };
            match config.validate() {
                Err(CvpError::InvalidInput { field, .. }) => assert_eq!(field, "export.file_name"),
                other => panic!("expected InvalidInput for {:?}, got {:?}", bad, other),
            }
        }
    }
}
