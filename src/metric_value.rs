//! The value object returned by every metric

use crate::validation::ReferenceBasedInputs;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-pair metric values together with the inputs they were computed from
///
/// A `MetricValue` is built once per metric call and never mutated
/// afterwards; all fields are read through accessors. The lengths of
/// `generated_outputs`, `reference_outputs`, `metric_values` and (when
/// present) `prompts` always agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMetricValue")]
pub struct MetricValue {
    metric_name: String,
    prompts: Option<Vec<String>>,
    generated_outputs: Vec<String>,
    reference_outputs: Vec<String>,
    sources: Option<Vec<String>>,
    explanations: Option<Vec<String>>,
    metric_values: Vec<f64>,
    language: String,
}

#[derive(Deserialize)]
struct RawMetricValue {
    metric_name: String,
    #[serde(default)]
    prompts: Option<Vec<String>>,
    generated_outputs: Vec<String>,
    reference_outputs: Vec<String>,
    #[serde(default)]
    sources: Option<Vec<String>>,
    #[serde(default)]
    explanations: Option<Vec<String>>,
    metric_values: Vec<f64>,
    language: String,
}

impl TryFrom<RawMetricValue> for MetricValue {
    type Error = Error;

    fn try_from(raw: RawMetricValue) -> Result<Self> {
        let inputs = ReferenceBasedInputs {
            generated_outputs: raw.generated_outputs,
            reference_outputs: raw.reference_outputs,
            prompts: raw.prompts,
        };
        let mut value = MetricValue::new(raw.metric_name, inputs, raw.metric_values, raw.language)?;
        value.sources = check_optional_len("sources", raw.sources, value.len())?;
        value.explanations = check_optional_len("explanations", raw.explanations, value.len())?;
        Ok(value)
    }
}

fn check_optional_len(
    what: &'static str,
    values: Option<Vec<String>>,
    expected: usize,
) -> Result<Option<Vec<String>>> {
    match values {
        Some(values) if values.len() != expected => Err(Error::LengthMismatch {
            what,
            expected,
            found: values.len(),
        }),
        values => Ok(values),
    }
}

impl MetricValue {
    /// Bundle validated inputs with their per-pair scores
    pub fn new(
        metric_name: impl Into<String>,
        inputs: ReferenceBasedInputs,
        metric_values: Vec<f64>,
        language: impl Into<String>,
    ) -> Result<Self> {
        let expected = inputs.generated_outputs.len();
        let checks = [
            ("reference_outputs", inputs.reference_outputs.len()),
            ("metric_values", metric_values.len()),
        ];
        for (what, found) in checks {
            if found != expected {
                return Err(Error::LengthMismatch {
                    what,
                    expected,
                    found,
                });
            }
        }
        let prompts = check_optional_len("prompts", inputs.prompts, expected)?;

        Ok(MetricValue {
            metric_name: metric_name.into(),
            prompts,
            generated_outputs: inputs.generated_outputs,
            reference_outputs: inputs.reference_outputs,
            sources: None,
            explanations: None,
            metric_values,
            language: language.into(),
        })
    }

    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    pub fn prompts(&self) -> Option<&[String]> {
        self.prompts.as_deref()
    }

    pub fn generated_outputs(&self) -> &[String] {
        &self.generated_outputs
    }

    pub fn reference_outputs(&self) -> &[String] {
        &self.reference_outputs
    }

    pub fn sources(&self) -> Option<&[String]> {
        self.sources.as_deref()
    }

    pub fn explanations(&self) -> Option<&[String]> {
        self.explanations.as_deref()
    }

    pub fn metric_values(&self) -> &[f64] {
        &self.metric_values
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Number of scored pairs
    pub fn len(&self) -> usize {
        self.metric_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metric_values.is_empty()
    }

    /// Iterate over the scored pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = MetricRecord<'_>> {
        (0..self.len()).map(move |i| MetricRecord {
            prompt: self.prompts.as_ref().map(|p| p[i].as_str()),
            generated_output: &self.generated_outputs[i],
            reference_output: &self.reference_outputs[i],
            metric_value: self.metric_values[i],
        })
    }
}

/// One row of a [`MetricValue`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRecord<'a> {
    pub prompt: Option<&'a str>,
    pub generated_output: &'a str,
    pub reference_output: &'a str,
    pub metric_value: f64,
}

const CELL_WIDTH: usize = 32;

fn cell(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= CELL_WIDTH {
        flat
    } else {
        let mut cut: String = flat.chars().take(CELL_WIDTH - 3).collect();
        cut.push_str("...");
        cut
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Metric: {} (language: {}, pairs: {})",
            self.metric_name,
            self.language,
            self.len()
        )?;
        let w = CELL_WIDTH;
        writeln!(
            f,
            "{:>5}  {:<w$}  {:<w$}  {:<w$}  {:>10}",
            "#", "prompt", "generated_output", "reference_output", "value"
        )?;
        for (i, record) in self.iter().enumerate() {
            writeln!(
                f,
                "{:>5}  {:<w$}  {:<w$}  {:<w$}  {:>10.6}",
                i,
                cell(record.prompt.unwrap_or("-")),
                cell(record.generated_output),
                cell(record.reference_output),
                record.metric_value
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(n: usize) -> ReferenceBasedInputs {
        ReferenceBasedInputs {
            generated_outputs: (0..n).map(|i| format!("gen {i}")).collect(),
            reference_outputs: (0..n).map(|i| format!("ref {i}")).collect(),
            prompts: None,
        }
    }

    #[test]
    fn test_new_checks_value_count() {
        let err = MetricValue::new("rouge1", inputs(2), vec![0.5], "en").unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                what: "metric_values",
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_accessors_and_records() {
        let mut with_prompts = inputs(2);
        with_prompts.prompts = Some(vec!["p0".into(), "p1".into()]);
        let value = MetricValue::new("rouge2", with_prompts, vec![0.25, 1.0], "en").unwrap();

        assert_eq!(value.metric_name(), "rouge2");
        assert_eq!(value.language(), "en");
        assert_eq!(value.len(), 2);
        assert!(value.sources().is_none());
        assert!(value.explanations().is_none());

        let records: Vec<_> = value.iter().collect();
        assert_eq!(records[1].prompt, Some("p1"));
        assert_eq!(records[1].generated_output, "gen 1");
        assert_eq!(records[1].reference_output, "ref 1");
        assert_eq!(records[1].metric_value, 1.0);
    }

    #[test]
    fn test_json_round_trip_rejects_misaligned_values() {
        let value = MetricValue::new("rougeL", inputs(1), vec![0.5], "en").unwrap();
        let json = serde_json::to_value(&value).unwrap();
        let back: MetricValue = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, value);

        let mut broken = json;
        broken["metric_values"] = serde_json::json!([0.5, 0.7]);
        assert!(serde_json::from_value::<MetricValue>(broken).is_err());
    }

    #[test]
    fn test_display_truncates_long_cells() {
        let long = ReferenceBasedInputs {
            generated_outputs: vec!["word ".repeat(20)],
            reference_outputs: vec!["short\nlines".into()],
            prompts: None,
        };
        let value = MetricValue::new("rouge1", long, vec![0.125], "en").unwrap();
        let rendered = value.to_string();

        assert!(rendered.starts_with("Metric: rouge1 (language: en, pairs: 1)"));
        assert!(rendered.contains("..."));
        assert!(rendered.contains("short lines"));
        assert!(rendered.contains("0.125000"));
    }
}
