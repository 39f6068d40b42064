//! The `params` form field and the records returned for it.
//!
//! ```json
//! [{"title": "RFI", "titleHeader": "Open raise", "table_title": "6-max",
//!   "value": [{"max_bb": 40, "min_bb": 0, "min_bet_bb": 0, "max_bet_bb": 5,
//!              "min_seat": 6, "max_seat": 6, "title": "Short"}]}]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use handscope_engine::{Filters, PositionGroupFrequencies};

use crate::errors::UploadError;

#[derive(Debug, Clone, Deserialize)]
struct RawGroup {
    title: Option<String>,
    #[serde(rename = "titleHeader")]
    title_header: Option<String>,
    table_title: Option<String>,
    value: Option<Vec<RawSet>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSet {
    max_bb: Option<f64>,
    min_bb: Option<f64>,
    min_bet_bb: Option<f64>,
    max_bet_bb: Option<f64>,
    min_seat: Option<usize>,
    max_seat: Option<usize>,
    title: Option<String>,
}

impl RawSet {
    fn validate(self) -> Option<ParameterSet> {
        Some(ParameterSet {
            title: self.title?,
            filters: Filters {
                max_bb: self.max_bb?,
                min_bb: self.min_bb?,
                min_bet_bb: self.min_bet_bb?,
                max_bet_bb: self.max_bet_bb?,
                min_seat: self.min_seat?,
                max_seat: self.max_seat?,
            },
        })
    }
}

impl RawGroup {
    fn validate(self) -> Option<ParameterGroup> {
        let sets = self
            .value?
            .into_iter()
            .map(RawSet::validate)
            .collect::<Option<Vec<_>>>()?;
        Some(ParameterGroup {
            title: self.title?,
            title_header: self.title_header?,
            table_title: self.table_title?,
            sets,
        })
    }
}

/// One titled filter combination.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub title: String,
    pub filters: Filters,
}

/// A display category holding one or more parameter sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGroup {
    pub title: String,
    pub title_header: String,
    pub table_title: String,
    pub sets: Vec<ParameterSet>,
}

/// Validated analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub player_name: String,
    pub groups: Vec<ParameterGroup>,
}

impl AnalysisRequest {
    /// Validates the `params` and `player_name` form fields.
    ///
    /// Every field of every group and set is required, and so is a
    /// non-blank player name.
    pub fn from_form(
        params: Option<&str>,
        player_name: Option<&str>,
    ) -> Result<Self, UploadError> {
        let params = params
            .filter(|p| !p.trim().is_empty())
            .ok_or(UploadError::NoParameters)?;
        let raw: Vec<RawGroup> =
            serde_json::from_str(params).map_err(UploadError::InvalidParameters)?;
        let groups = raw
            .into_iter()
            .map(RawGroup::validate)
            .collect::<Option<Vec<_>>>()
            .ok_or(UploadError::MissingParameters)?;
        let player_name = player_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(UploadError::MissingParameters)?;

        Ok(Self {
            player_name: player_name.to_string(),
            groups,
        })
    }

    pub fn set_count(&self) -> usize {
        self.groups.iter().map(|g| g.sets.len()).sum()
    }
}

/// Result for one parameter set: a percentage per position group plus the
/// display fields of the set and its group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRecord {
    #[serde(flatten)]
    pub frequencies: BTreeMap<String, f64>,
    pub title: String,
    pub category: String,
    pub title_header: String,
    pub table_title: String,
}

impl FrequencyRecord {
    pub fn new(
        group: &ParameterGroup,
        set: &ParameterSet,
        frequencies: &PositionGroupFrequencies,
    ) -> Self {
        Self {
            frequencies: frequencies
                .percentages()
                .map(|(label, pct)| (label.to_string(), pct))
                .collect(),
            title: set.title.clone(),
            category: group.title.clone(),
            title_header: group.title_header.clone(),
            table_title: group.table_title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyResponse {
    pub data: Vec<FrequencyRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &str = r#"[
        {"title": "RFI", "titleHeader": "Open raise", "table_title": "Ring",
         "value": [
            {"max_bb": 40, "min_bb": 0, "min_bet_bb": 0, "max_bet_bb": 5,
             "min_seat": 7, "max_seat": 9, "title": "Standard"},
            {"max_bb": 100, "min_bb": 40, "min_bet_bb": 2, "max_bet_bb": 3.5,
             "min_seat": 6, "max_seat": 6, "title": "Deep"}
         ]}
    ]"#;

    #[test]
    fn parses_groups_and_sets() {
        let request = AnalysisRequest::from_form(Some(PARAMS), Some(" Hero ")).expect("valid");
        assert_eq!(request.player_name, "Hero");
        assert_eq!(request.set_count(), 2);
        let group = &request.groups[0];
        assert_eq!(group.title_header, "Open raise");
        assert_eq!(group.sets[0].filters, Filters::default());
        assert_eq!(group.sets[1].filters.max_bet_bb, 3.5);
        assert_eq!(group.sets[1].filters.min_seat, 6);
    }

    #[test]
    fn missing_or_blank_params_are_rejected() {
        assert!(matches!(
            AnalysisRequest::from_form(None, Some("Hero")),
            Err(UploadError::NoParameters)
        ));
        assert!(matches!(
            AnalysisRequest::from_form(Some("  "), Some("Hero")),
            Err(UploadError::NoParameters)
        ));
    }

    #[test]
    fn malformed_json_is_invalid_format() {
        assert!(matches!(
            AnalysisRequest::from_form(Some("[{"), Some("Hero")),
            Err(UploadError::InvalidParameters(_))
        ));
        assert!(matches!(
            AnalysisRequest::from_form(Some(r#"{"title": "x"}"#), Some("Hero")),
            Err(UploadError::InvalidParameters(_))
        ));
    }

    #[test]
    fn missing_field_or_player_is_missing_parameters() {
        let no_max_seat = PARAMS.replace(r#", "max_seat": 9"#, "");
        assert!(matches!(
            AnalysisRequest::from_form(Some(&no_max_seat), Some("Hero")),
            Err(UploadError::MissingParameters)
        ));
        let null_title = PARAMS.replace(r#""title": "Deep""#, r#""title": null"#);
        assert!(matches!(
            AnalysisRequest::from_form(Some(&null_title), Some("Hero")),
            Err(UploadError::MissingParameters)
        ));
        assert!(matches!(
            AnalysisRequest::from_form(Some(PARAMS), None),
            Err(UploadError::MissingParameters)
        ));
        assert!(matches!(
            AnalysisRequest::from_form(Some(PARAMS), Some("")),
            Err(UploadError::MissingParameters)
        ));
    }

    #[test]
    fn record_flattens_group_percentages() {
        let request = AnalysisRequest::from_form(Some(PARAMS), Some("Hero")).expect("valid");
        let group = &request.groups[0];
        let record = FrequencyRecord::new(group, &group.sets[0], &PositionGroupFrequencies::default());
        let json = serde_json::to_value(FrequencyResponse { data: vec![record] }).expect("json");
        let first = &json["data"][0];
        assert_eq!(first["title"], "Standard");
        assert_eq!(first["category"], "RFI");
        assert_eq!(first["title_header"], "Open raise");
        assert_eq!(first["table_title"], "Ring");
    }
}
