//! Fund abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Scheme level details, passed through from the upstream API unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundMetadata {
    pub fund_house: String,
    pub scheme_type: String,
    pub scheme_category: String,
    pub scheme_code: i64,
    pub scheme_name: String,
}

impl FundMetadata {
    /// Upstream answers unknown scheme codes with `200 OK` and an empty `meta`
    /// object, so an all-zero metadata is how a missing fund shows up.
    pub fn is_empty(&self) -> bool {
        self.fund_house.is_empty()
            && self.scheme_type.is_empty()
            && self.scheme_category.is_empty()
            && self.scheme_code == 0
            && self.scheme_name.is_empty()
    }
}

/// A single NAV observation. Both values are kept as the upstream strings
/// (`dd-mm-yyyy` date, decimal NAV).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavPoint {
    pub date: String,
    pub nav: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FundRecord {
    #[serde(default)]
    pub meta: FundMetadata,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<NavPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilteredResponse {
    pub meta: FundMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub data: Vec<NavPoint>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<NavPoint>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<NavPoint>>::deserialize(deserializer)?.unwrap_or_default())
}

#[async_trait]
pub trait FundProvider: Send + Sync {
    async fn fetch_fund(&self, identifier: &str) -> Result<FundRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_metadata_detection() {
        assert!(FundMetadata::default().is_empty());

        let only_code = FundMetadata {
            scheme_code: 119551,
            ..Default::default()
        };
        assert!(!only_code.is_empty());

        let only_house = FundMetadata {
            fund_house: "Aditya Birla Sun Life Mutual Fund".to_string(),
            ..Default::default()
        };
        assert!(!only_house.is_empty());
    }

    #[test]
    fn test_fund_record_deserialization() {
        let json = r#"{
            "meta": {
                "fund_house": "Aditya Birla Sun Life Mutual Fund",
                "scheme_type": "Open Ended Schemes",
                "scheme_category": "Debt Scheme - Banking and PSU Fund",
                "scheme_code": 119551,
                "scheme_name": "Aditya Birla Sun Life Banking & PSU Debt Fund - DIRECT - IDCW"
            },
            "data": [
                {"date": "15-02-2023", "nav": "107.19090"},
                {"date": "15-01-2023", "nav": "106.87470"}
            ],
            "status": "SUCCESS"
        }"#;

        let record: FundRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.meta.scheme_code, 119551);
        assert_eq!(record.meta.scheme_type, "Open Ended Schemes");
        assert_eq!(record.data.len(), 2);
        assert_eq!(record.data[0].date, "15-02-2023");
        assert_eq!(record.data[0].nav, "107.19090");
        assert!(!record.meta.is_empty());
    }

    #[test]
    fn test_unknown_fund_deserializes_to_empty_metadata() {
        let record: FundRecord =
            serde_json::from_str(r#"{"meta": {}, "data": [], "status": "SUCCESS"}"#).unwrap();
        assert!(record.meta.is_empty());
        assert!(record.data.is_empty());

        let record: FundRecord = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(record.meta.is_empty());
        assert!(record.data.is_empty());
    }

    #[test]
    fn test_period_omitted_when_absent() {
        let response = FilteredResponse {
            meta: FundMetadata::default(),
            period: None,
            data: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("period").is_none());
        assert_eq!(json["data"], serde_json::json!([]));

        let response = FilteredResponse {
            period: Some("01-01-2023 to 31-01-2023".to_string()),
            ..response
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["period"], "01-01-2023 to 31-01-2023");
    }
}
