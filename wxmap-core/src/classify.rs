//! Threshold rules and the time-indexed color lookup.
//!
//! A [`DataSeries`] names a weather field and carries an ordered rule list.
//! Rules are tried in declaration order and the first match wins; a sample
//! that matches nothing, or that cannot be read at all, gets the series'
//! base color. Overlapping rules are the user's business and are never
//! reordered.

use crate::error::{DashboardError, Result};
use crate::region::Region;
use crate::series::{hour_index, SampleSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color used for a region whose data source no longer exists.
pub const UNKNOWN_SOURCE_COLOR: &str = "#6b7280";

/// Color given to a freshly added rule.
pub const NEW_RULE_COLOR: &str = "#3b82f6";

/// One threshold rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClassificationRule {
    /// `sample < threshold`
    LessThan { threshold: f64, color: String },
    /// `sample >= threshold`
    AtLeast { threshold: f64, color: String },
    /// `low <= sample < high`
    Range { low: f64, high: f64, color: String },
}

impl ClassificationRule {
    pub fn less_than(threshold: f64, color: impl Into<String>) -> Self {
        Self::LessThan {
            threshold,
            color: color.into(),
        }
    }

    pub fn at_least(threshold: f64, color: impl Into<String>) -> Self {
        Self::AtLeast {
            threshold,
            color: color.into(),
        }
    }

    pub fn range(low: f64, high: f64, color: impl Into<String>) -> Self {
        Self::Range {
            low,
            high,
            color: color.into(),
        }
    }

    /// Whether `value` satisfies the rule. NaN satisfies nothing.
    pub fn matches(&self, value: f64) -> bool {
        match self {
            Self::LessThan { threshold, .. } => value < *threshold,
            Self::AtLeast { threshold, .. } => value >= *threshold,
            Self::Range { low, high, .. } => *low <= value && value < *high,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Self::LessThan { color, .. } | Self::AtLeast { color, .. } | Self::Range { color, .. } => {
                color
            }
        }
    }
}

/// A named weather parameter and its classification rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSeries {
    pub id: String,
    pub display_name: String,
    pub sample_field_key: String,
    pub base_color: String,
    #[serde(default)]
    pub rules: Vec<ClassificationRule>,
}

impl DataSeries {
    /// Color for a sample: first matching rule, else the base color.
    pub fn classify(&self, value: f64) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matches(value))
            .map(ClassificationRule::color)
            .unwrap_or(self.base_color.as_str())
    }

    /// Append the default rule used by the rule editor.
    pub fn add_rule(&mut self) {
        self.rules
            .push(ClassificationRule::at_least(0.0, NEW_RULE_COLOR));
    }

    pub fn update_rule(&mut self, index: usize, rule: ClassificationRule) -> Result<()> {
        let len = self.rules.len();
        let slot = self
            .rules
            .get_mut(index)
            .ok_or(DashboardError::RuleIndex { index, len })?;
        *slot = rule;
        Ok(())
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<ClassificationRule> {
        if index >= self.rules.len() {
            return Err(DashboardError::RuleIndex {
                index,
                len: self.rules.len(),
            });
        }
        Ok(self.rules.remove(index))
    }

    /// The four sources the dashboard starts with.
    pub fn builtin() -> Vec<DataSeries> {
        vec![
            Self::with_three_bands(
                "temperature",
                "Temperature",
                crate::series::TEMPERATURE,
                "#ff6b6b",
                (10.0, 25.0),
                ["#3b82f6", "#10b981", "#ef4444"],
            ),
            Self::with_three_bands(
                "humidity",
                "Humidity",
                crate::series::RELATIVE_HUMIDITY,
                "#06b6d4",
                (40.0, 70.0),
                ["#f59e0b", "#10b981", "#3b82f6"],
            ),
            Self::with_three_bands(
                "precipitation",
                "Precipitation",
                crate::series::PRECIPITATION,
                "#8b5cf6",
                (0.1, 2.0),
                ["#f3f4f6", "#60a5fa", "#1d4ed8"],
            ),
            Self::with_three_bands(
                "wind_speed",
                "Wind Speed",
                crate::series::WIND_SPEED,
                "#f59e0b",
                (5.0, 15.0),
                ["#10b981", "#f59e0b", "#ef4444"],
            ),
        ]
    }

    fn with_three_bands(
        id: &str,
        display_name: &str,
        field: &str,
        base_color: &str,
        (low, high): (f64, f64),
        [below, between, above]: [&str; 3],
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            sample_field_key: field.to_string(),
            base_color: base_color.to_string(),
            rules: vec![
                ClassificationRule::less_than(low, below),
                ClassificationRule::range(low, high, between),
                ClassificationRule::at_least(high, above),
            ],
        }
    }
}

/// Look up a data source by id.
pub fn find_source<'a>(sources: &'a [DataSeries], id: &str) -> Option<&'a DataSeries> {
    sources.iter().find(|s| s.id == id)
}

/// Sample of `definition`'s field at the hour `current` falls in, counted
/// from `range_start`.
pub fn sample_at(
    definition: &DataSeries,
    samples: Option<&SampleSeries>,
    range_start: DateTime<Utc>,
    current: DateTime<Utc>,
) -> Option<f64> {
    let index = hour_index(range_start, current)?;
    samples?.sample(&definition.sample_field_key, index)
}

/// Display color of a region's data source at `current`.
///
/// Never fails: a missing series, missing field, out-of-range hour or an
/// unmatched sample all yield the source's base color.
pub fn color_for<'a>(
    definition: &'a DataSeries,
    samples: Option<&SampleSeries>,
    range_start: DateTime<Utc>,
    current: DateTime<Utc>,
) -> &'a str {
    match sample_at(definition, samples, range_start, current) {
        Some(value) => definition.classify(value),
        None => definition.base_color.as_str(),
    }
}

/// [`color_for`] resolved through the region's data source id.
pub fn region_color<'a>(
    region: &Region,
    sources: &'a [DataSeries],
    samples: Option<&SampleSeries>,
    range_start: DateTime<Utc>,
    current: DateTime<Utc>,
) -> &'a str {
    match find_source(sources, region.data_source_id()) {
        Some(definition) => color_for(definition, samples, range_start, current),
        None => UNKNOWN_SOURCE_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TEMPERATURE;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn series(values: &[f64]) -> SampleSeries {
        let timestamps = (0..values.len())
            .map(|i| start() + Duration::hours(i as i64))
            .collect();
        let mut fields = BTreeMap::new();
        fields.insert(TEMPERATURE.to_string(), values.to_vec());
        SampleSeries::try_new(timestamps, fields).unwrap()
    }

    fn blue_red() -> DataSeries {
        DataSeries {
            id: "temperature".to_string(),
            display_name: "Temperature".to_string(),
            sample_field_key: TEMPERATURE.to_string(),
            base_color: "grey".to_string(),
            rules: vec![
                ClassificationRule::less_than(10.0, "blue"),
                ClassificationRule::at_least(10.0, "red"),
            ],
        }
    }

    #[test]
    fn test_rule_predicates() {
        assert!(ClassificationRule::less_than(10.0, "c").matches(9.9));
        assert!(!ClassificationRule::less_than(10.0, "c").matches(10.0));
        assert!(ClassificationRule::at_least(10.0, "c").matches(10.0));
        assert!(ClassificationRule::range(1.0, 2.0, "c").matches(1.0));
        assert!(!ClassificationRule::range(1.0, 2.0, "c").matches(2.0));
        assert!(!ClassificationRule::at_least(0.0, "c").matches(f64::NAN));
    }

    #[test]
    fn test_first_declared_rule_wins() {
        let mut ds = blue_red();
        ds.rules = vec![
            ClassificationRule::range(0.0, 100.0, "first"),
            ClassificationRule::at_least(5.0, "second"),
        ];
        assert_eq!(ds.classify(50.0), "first");
        ds.rules.swap(0, 1);
        assert_eq!(ds.classify(50.0), "second");
    }

    #[test]
    fn test_color_follows_time() {
        let ds = blue_red();
        let s = series(&[8.0, 12.0, 0.0]);
        assert_eq!(color_for(&ds, Some(&s), start(), start()), "blue");
        assert_eq!(
            color_for(&ds, Some(&s), start(), start() + Duration::minutes(90)),
            "red"
        );
        // a real zero is a sample, not a gap
        assert_eq!(
            color_for(&ds, Some(&s), start(), start() + Duration::hours(2)),
            "blue"
        );
    }

    #[test]
    fn test_fallbacks_to_base_color() {
        let ds = blue_red();
        let s = series(&[8.0]);
        assert_eq!(color_for(&ds, None, start(), start()), "grey");
        assert_eq!(
            color_for(&ds, Some(&s), start(), start() + Duration::hours(1)),
            "grey"
        );
        assert_eq!(
            color_for(&ds, Some(&s), start(), start() - Duration::minutes(1)),
            "grey"
        );

        let mut other_field = ds.clone();
        other_field.sample_field_key = "wind_speed_10m".to_string();
        assert_eq!(color_for(&other_field, Some(&s), start(), start()), "grey");

        let mut no_rules = ds.clone();
        no_rules.rules.clear();
        assert_eq!(color_for(&no_rules, Some(&s), start(), start()), "grey");
    }

    #[test]
    fn test_rule_editing() {
        let mut ds = blue_red();
        ds.add_rule();
        assert_eq!(ds.rules[2], ClassificationRule::at_least(0.0, NEW_RULE_COLOR));
        ds.update_rule(0, ClassificationRule::less_than(5.0, "navy")).unwrap();
        assert_eq!(ds.rules[0].color(), "navy");
        assert_eq!(
            ds.update_rule(9, ClassificationRule::less_than(5.0, "x")),
            Err(DashboardError::RuleIndex { index: 9, len: 3 })
        );
        let removed = ds.remove_rule(1).unwrap();
        assert_eq!(removed.color(), "red");
        assert_eq!(ds.rules.len(), 2);
        assert!(ds.remove_rule(2).is_err());
    }

    #[test]
    fn test_builtin_sources() {
        let sources = DataSeries::builtin();
        assert_eq!(sources.len(), 4);
        let temp = find_source(&sources, "temperature").unwrap();
        assert_eq!(temp.classify(5.0), "#3b82f6");
        assert_eq!(temp.classify(10.0), "#10b981");
        assert_eq!(temp.classify(30.0), "#ef4444");
        let precip = find_source(&sources, "precipitation").unwrap();
        assert_eq!(precip.classify(0.0), "#f3f4f6");
        assert!(find_source(&sources, "pressure").is_none());
    }

    #[test]
    fn test_rule_serde_shape() {
        let json = serde_json::to_value(ClassificationRule::range(1.0, 2.0, "#fff")).unwrap();
        assert_eq!(json["kind"], "range");
        assert_eq!(json["low"], 1.0);
        let back: ClassificationRule =
            serde_json::from_str(r##"{"kind":"lessThan","threshold":3,"color":"#000"}"##).unwrap();
        assert_eq!(back, ClassificationRule::less_than(3.0, "#000"));
    }

    proptest! {
        #[test]
        fn prop_classification_is_total(
            values in proptest::collection::vec(-100.0f64..100.0, 0..48),
            offset_minutes in -600i64..6000,
            thresholds in proptest::collection::vec(-50.0f64..50.0, 0..5),
        ) {
            let mut ds = blue_red();
            ds.rules = thresholds
                .iter()
                .enumerate()
                .map(|(i, t)| if i % 2 == 0 {
                    ClassificationRule::less_than(*t, format!("c{}", i))
                } else {
                    ClassificationRule::range(*t, t + 10.0, format!("c{}", i))
                })
                .collect();
            let s = series(&values);
            let current = start() + Duration::minutes(offset_minutes);
            let color = color_for(&ds, Some(&s), start(), current);
            let known = color == ds.base_color || ds.rules.iter().any(|r| r.color() == color);
            prop_assert!(known);
        }
    }
}
