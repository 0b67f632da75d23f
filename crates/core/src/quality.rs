//! Farmer rubber-sheet quality review.
//!
//! Graded samples are loaded without their impurity analysis. Analysis is
//! requested per sample and cached by the sample's position in the full list,
//! so a sample is never submitted twice while the list is unchanged. Reloading
//! the list drops the cache.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{flexible_string, lenient_f64, lenient_string};

/// Grades an operator may assign when uploading a sample by hand.
pub const UPLOAD_GRADES: &[&str] = &["1", "2", "3", "3 after", "4", "4 after"];

/// A row from `GET /get_rubber_sheet_quality`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySample {
    #[serde(default, deserialize_with = "flexible_string")]
    pub farmer_id: String,
    /// URL of the sheet photograph.
    #[serde(default, deserialize_with = "flexible_string")]
    pub file_path: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub predicted_class: String,
    #[serde(default, deserialize_with = "created_at")]
    pub created_at: Option<NaiveDateTime>,
}

/// Response of `POST /impurity_detection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpurityResult {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub impurity_percentage: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub masked_image_path: Option<String>,
}

fn created_at<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = lenient_string(deserializer)?;
    Ok(raw.and_then(|s| parse_timestamp(&s)))
}

/// Parse the timestamp shapes the quality service emits.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Created-at range (inclusive days) and predicted grade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QualityFilter {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub grade: Option<String>,
}

impl QualityFilter {
    pub fn matches(&self, sample: &QualitySample) -> bool {
        let day = sample.created_at.map(|dt| dt.date());
        let in_range = match (day, self.from, self.to) {
            (_, None, None) => true,
            (None, _, _) => false,
            (Some(d), from, to) => from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t),
        };
        let grade_ok = match self.grade.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(g) => sample.predicted_class == g,
        };
        in_range && grade_ok
    }
}

/// A sample plus whatever analysis is known for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    /// Position in the full sample list.
    pub index: usize,
    #[serde(flatten)]
    pub sample: QualitySample,
    pub impurity: Option<ImpurityResult>,
    pub detecting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityView {
    pub farmer_id: String,
    pub rows: Vec<SampleRow>,
    /// Distinct predicted grades across all samples.
    pub grades: Vec<String>,
    pub upload_grades: Vec<String>,
    pub total: usize,
    pub error: Option<String>,
}

/// Review state for one farmer's samples.
#[derive(Debug, Clone, Default)]
pub struct QualityReview {
    farmer_id: String,
    samples: Vec<QualitySample>,
    results: BTreeMap<usize, ImpurityResult>,
    in_flight: BTreeSet<usize>,
    /// Bumped on every reload so analyses of an older list can be told apart.
    generation: u64,
    pub error: Option<String>,
}

/// A sample claimed for analysis, tied to the list it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub generation: u64,
    pub index: usize,
    pub sample: QualitySample,
}

impl QualityReview {
    pub fn new(farmer_id: impl Into<String>) -> Self {
        Self {
            farmer_id: farmer_id.into(),
            ..Default::default()
        }
    }

    pub fn farmer_id(&self) -> &str {
        &self.farmer_id
    }

    pub fn samples(&self) -> &[QualitySample] {
        &self.samples
    }

    /// Replace the sample list. Cached results are keyed by position, so they
    /// are dropped with the old list.
    pub fn replace_samples(&mut self, samples: Vec<QualitySample>) {
        self.samples = samples;
        self.results.clear();
        self.in_flight.clear();
        self.generation += 1;
        self.error = None;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self, index: usize) -> Option<&ImpurityResult> {
        self.results.get(&index)
    }

    /// Positions of the samples matching `filter`, in list order.
    pub fn filtered_positions(&self, filter: &QualityFilter) -> Vec<usize> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| filter.matches(s))
            .map(|(i, _)| i)
            .collect()
    }

    /// Claim sample `index` for analysis.
    ///
    /// Returns `None` when the sample is already analysed or being analysed.
    pub fn begin_detection(&mut self, index: usize) -> Result<Option<Detection>, CoreError> {
        let sample = self
            .samples
            .get(index)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity: "QualitySample",
                key: index.to_string(),
            })?;
        if self.results.contains_key(&index) || !self.in_flight.insert(index) {
            return Ok(None);
        }
        Ok(Some(Detection {
            generation: self.generation,
            index,
            sample,
        }))
    }

    /// Record the outcome of an analysis claimed with [`begin_detection`].
    ///
    /// Outcomes for a list that has since been reloaded are dropped; the
    /// position may hold a different sample now. Returns whether the outcome
    /// was applied.
    ///
    /// [`begin_detection`]: Self::begin_detection
    pub fn finish_detection(
        &mut self,
        detection: &Detection,
        outcome: Result<ImpurityResult, String>,
    ) -> bool {
        if detection.generation != self.generation {
            return false;
        }
        self.in_flight.remove(&detection.index);
        match outcome {
            Ok(result) => {
                self.results.insert(detection.index, result);
            }
            Err(message) => self.error = Some(message),
        }
        true
    }

    /// Distinct predicted grades, sorted.
    pub fn grade_choices(&self) -> Vec<String> {
        self.samples
            .iter()
            .map(|s| s.predicted_class.clone())
            .filter(|g| !g.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn view(&self, filter: &QualityFilter) -> QualityView {
        let rows = self
            .filtered_positions(filter)
            .into_iter()
            .map(|index| SampleRow {
                index,
                sample: self.samples[index].clone(),
                impurity: self.results.get(&index).cloned(),
                detecting: self.in_flight.contains(&index),
            })
            .collect();
        QualityView {
            farmer_id: self.farmer_id.clone(),
            rows,
            grades: self.grade_choices(),
            upload_grades: UPLOAD_GRADES.iter().map(|g| g.to_string()).collect(),
            total: self.samples.len(),
            error: self.error.clone(),
        }
    }
}

/// Check a manual upload before it is sent.
pub fn validate_upload(grade: &str, has_image: bool) -> Result<(), CoreError> {
    let mut fields = BTreeMap::new();
    if !has_image {
        fields.insert("image_file".to_string(), "Image is required".to_string());
    }
    if !UPLOAD_GRADES.contains(&grade.trim()) {
        fields.insert("rubber_grade".to_string(), "Grade is required".to_string());
    }
    if fields.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidFields(fields))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sample(grade: &str, created: &str) -> QualitySample {
        QualitySample {
            farmer_id: "F1".into(),
            file_path: format!("https://img/{grade}.jpg"),
            predicted_class: grade.into(),
            created_at: parse_timestamp(created),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn review() -> QualityReview {
        let mut review = QualityReview::new("F1");
        review.replace_samples(vec![
            sample("RSS1", "2025-01-01T08:00:00"),
            sample("RSS3", "2025-01-05 17:30:00"),
            sample("RSS1", "2025-01-10T23:59:59Z"),
        ]);
        review
    }

    #[test]
    fn timestamps_in_several_shapes_parse() {
        assert!(parse_timestamp("2025-01-01T08:00:00.123").is_some());
        assert!(parse_timestamp("2025-01-01T08:00:00+05:30").is_some());
        assert!(parse_timestamp("2025-01-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn to_date_includes_the_whole_day() {
        let filter = QualityFilter {
            from: Some(date("2025-01-05")),
            to: Some(date("2025-01-10")),
            grade: None,
        };
        assert_eq!(review().filtered_positions(&filter), vec![1, 2]);
    }

    #[test]
    fn grade_filter_is_exact() {
        let filter = QualityFilter {
            grade: Some("RSS1".into()),
            ..Default::default()
        };
        assert_eq!(review().filtered_positions(&filter), vec![0, 2]);
        assert_eq!(review().grade_choices(), vec!["RSS1", "RSS3"]);
    }

    fn impurity(percentage: f64) -> ImpurityResult {
        ImpurityResult {
            impurity_percentage: percentage,
            masked_image_path: None,
        }
    }

    #[test]
    fn analysed_samples_are_not_resubmitted() {
        let mut review = review();
        let claim = review.begin_detection(1).unwrap().unwrap();
        assert_eq!(claim.sample.predicted_class, "RSS3");
        assert!(review.begin_detection(1).unwrap().is_none(), "in flight");
        assert!(review.finish_detection(&claim, Ok(impurity(4.2))));
        assert!(review.begin_detection(1).unwrap().is_none(), "cached");
        assert_eq!(review.result(1).unwrap().impurity_percentage, 4.2);
    }

    #[test]
    fn failed_analysis_can_be_retried() {
        let mut review = review();
        let claim = review.begin_detection(0).unwrap().unwrap();
        review.finish_detection(&claim, Err("Could not analyze impurity.".into()));
        assert!(review.error.is_some());
        assert!(review.begin_detection(0).unwrap().is_some());
    }

    #[test]
    fn out_of_range_sample_is_not_found() {
        assert_matches!(review().begin_detection(9), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn reload_drops_cached_results() {
        let mut review = review();
        let claim = review.begin_detection(0).unwrap().unwrap();
        review.finish_detection(&claim, Ok(impurity(1.0)));
        review.replace_samples(vec![sample("RSS2", "2025-02-01")]);
        assert!(review.result(0).is_none());
    }

    #[test]
    fn analysis_of_a_replaced_list_is_dropped() {
        let mut review = review();
        let claim = review.begin_detection(0).unwrap().unwrap();
        review.replace_samples(vec![sample("RSS2", "2025-02-01")]);

        assert!(!review.finish_detection(&claim, Ok(impurity(3.5))));
        assert!(review.result(0).is_none());
        assert!(!review.view(&QualityFilter::default()).rows[0].detecting);

        let fresh = review.begin_detection(0).unwrap().unwrap();
        assert_eq!(fresh.generation, review.generation());
        assert_eq!(fresh.sample.predicted_class, "RSS2");
    }

    #[test]
    fn failure_from_a_replaced_list_leaves_no_banner() {
        let mut review = review();
        let claim = review.begin_detection(1).unwrap().unwrap();
        review.replace_samples(vec![sample("RSS2", "2025-02-01")]);

        review.finish_detection(&claim, Err("Could not analyze impurity.".into()));
        assert!(review.error.is_none());
    }

    #[test]
    fn view_keeps_full_list_positions() {
        let mut review = review();
        review.begin_detection(2).unwrap();
        let filter = QualityFilter {
            grade: Some("RSS1".into()),
            ..Default::default()
        };
        let view = review.view(&filter);
        let indices: Vec<_> = view.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(view.rows[1].detecting);
        assert_eq!(view.upload_grades.len(), 6);
    }

    #[test]
    fn upload_requires_image_and_known_grade() {
        assert!(validate_upload("3 after", true).is_ok());
        assert_matches!(validate_upload("5", false), Err(CoreError::InvalidFields(f)) => {
            assert_eq!(f.len(), 2);
        });
    }
}
