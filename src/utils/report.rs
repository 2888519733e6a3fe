//! ISO 20022-inspired XML report for a finished scan

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::types::AssetResult;
use crate::utils::constants::{
    REPORT_DEFAULT_NOTE, REPORT_ISSUER, REPORT_NAMESPACE, REPORT_STANDARD,
};

/// Fixed-schema validation report built from an `AssetResult`
#[derive(Debug, Clone, Serialize)]
pub struct IsoReport {
    pub asset_id: String,
    pub asset_type: String,
    pub risk_score: u8,
    pub note: String,
    pub validation_date: DateTime<Utc>,
}

impl IsoReport {
    pub fn from_result(result: &AssetResult) -> Self {
        Self::at(result, Utc::now())
    }

    /// Report with an explicit validation timestamp
    pub fn at(result: &AssetResult, validation_date: DateTime<Utc>) -> Self {
        let note = if result.info.trim().is_empty() {
            REPORT_DEFAULT_NOTE.to_string()
        } else {
            result.info.clone()
        };

        Self {
            asset_id: result.input.clone(),
            asset_type: result.category.as_str().to_string(),
            risk_score: result.risk_score,
            note,
            validation_date,
        }
    }

    /// Suggested download name for the report
    pub fn file_name(&self) -> String {
        let safe: String = self
            .asset_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{}_iso20022.xml", safe)
    }

    pub fn to_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Document xmlns="{ns}">
    <AssetValidationReport>
        <AssetID>{id}</AssetID>
        <AssetType>{kind}</AssetType>
        <RiskScore>{score}</RiskScore>
        <ValidationNote>{note}</ValidationNote>
        <ValidationDate>{date}</ValidationDate>
        <Standard>{standard}</Standard>
        <Issuer>{issuer}</Issuer>
    </AssetValidationReport>
</Document>"#,
            ns = REPORT_NAMESPACE,
            id = xml_escape(&self.asset_id),
            kind = xml_escape(&self.asset_type),
            score = self.risk_score,
            note = xml_escape(&self.note),
            date = self.validation_date.format("%Y-%m-%dT%H:%M:%SZ"),
            standard = REPORT_STANDARD,
            issuer = xml_escape(REPORT_ISSUER),
        )
    }
}

fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{AssetQuery, Category, Network};
    use chrono::TimeZone;

    #[test]
    fn test_report_schema() {
        let result = AssetResult {
            input: "ETH".to_string(),
            category: Category::Coin,
            network: Network::Native,
            balance: None,
            info: "Price: $3000.00, Volume: $1.00, Market Cap: $2.00".to_string(),
            risk_score: 80,
            degraded: false,
        };
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let xml = IsoReport::at(&result, date).to_xml();

        assert!(xml.contains(r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:pain.001.001.03">"#));
        assert!(xml.contains("<AssetID>ETH</AssetID>"));
        assert!(xml.contains("<AssetType>Coin</AssetType>"));
        assert!(xml.contains("<RiskScore>80</RiskScore>"));
        assert!(xml.contains("<ValidationDate>2024-05-01T12:30:00Z</ValidationDate>"));
        assert!(xml.contains("<Standard>ISO 20022-Inspired</Standard>"));
        assert!(xml.contains("<Issuer>ADC AssetGuard + AI</Issuer>"));
    }

    #[test]
    fn test_report_escapes_input() {
        let result = AssetResult::unsupported(&AssetQuery::new("<script>&"));
        let report = IsoReport::from_result(&result);
        let xml = report.to_xml();

        assert!(xml.contains("<AssetID>&lt;script&gt;&amp;</AssetID>"));
        assert!(!xml.contains("<script>"));
        assert_eq!(report.file_name(), "_script___iso20022.xml");
    }

    #[test]
    fn test_empty_info_uses_default_note() {
        let mut result = AssetResult::unsupported(&AssetQuery::new("x"));
        result.info.clear();
        let report = IsoReport::from_result(&result);
        assert_eq!(report.note, "Validated via ADC AssetGuard");
    }
}
