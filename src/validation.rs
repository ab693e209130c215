//! Input normalization for reference-based metrics
//!
//! Every metric accepts either a single string or a list of strings for its
//! generated outputs, reference outputs and prompts. Validation turns those
//! into aligned lists of equal length.

use crate::{Error, Result};

/// A single text or an ordered batch of texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Single(String),
    Batch(Vec<String>),
}

impl TextInput {
    /// Number of texts this input expands to
    pub fn len(&self) -> usize {
        match self {
            TextInput::Single(_) => 1,
            TextInput::Batch(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expand into an ordered list; a single string becomes a list of one
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TextInput::Single(text) => vec![text],
            TextInput::Batch(texts) => texts,
        }
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Single(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Single(text)
    }
}

impl From<&String> for TextInput {
    fn from(text: &String) -> Self {
        TextInput::Single(text.clone())
    }
}

impl From<Vec<String>> for TextInput {
    fn from(texts: Vec<String>) -> Self {
        TextInput::Batch(texts)
    }
}

impl From<Vec<&str>> for TextInput {
    fn from(texts: Vec<&str>) -> Self {
        TextInput::Batch(texts.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for TextInput {
    fn from(texts: &[&str]) -> Self {
        TextInput::Batch(texts.iter().map(|t| t.to_string()).collect())
    }
}

impl From<&[String]> for TextInput {
    fn from(texts: &[String]) -> Self {
        TextInput::Batch(texts.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for TextInput {
    fn from(texts: [&str; N]) -> Self {
        TextInput::Batch(texts.iter().map(|t| t.to_string()).collect())
    }
}

/// Aligned inputs of a reference-based metric
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceBasedInputs {
    pub generated_outputs: Vec<String>,
    pub reference_outputs: Vec<String>,
    pub prompts: Option<Vec<String>>,
}

impl ReferenceBasedInputs {
    /// Number of generated/reference pairs
    pub fn len(&self) -> usize {
        self.generated_outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generated_outputs.is_empty()
    }
}

/// Normalize and length-check the inputs of a reference-based metric
///
/// Fails with [`Error::LengthMismatch`] when the reference outputs or the
/// prompts do not line up with the generated outputs.
pub fn validate_reference_based(
    generated_outputs: TextInput,
    reference_outputs: TextInput,
    prompts: Option<TextInput>,
) -> Result<ReferenceBasedInputs> {
    let generated_outputs = generated_outputs.into_vec();
    let reference_outputs = reference_outputs.into_vec();
    let expected = generated_outputs.len();

    if reference_outputs.len() != expected {
        return Err(Error::LengthMismatch {
            what: "reference_outputs",
            expected,
            found: reference_outputs.len(),
        });
    }

    let prompts = prompts.map(TextInput::into_vec);
    if let Some(prompts) = &prompts {
        if prompts.len() != expected {
            return Err(Error::LengthMismatch {
                what: "prompts",
                expected,
                found: prompts.len(),
            });
        }
    }

    Ok(ReferenceBasedInputs {
        generated_outputs,
        reference_outputs,
        prompts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_strings_become_lists() {
        let inputs = validate_reference_based("a cat".into(), "the cat".into(), Some("p".into()))
            .unwrap();

        assert_eq!(inputs.generated_outputs, vec!["a cat"]);
        assert_eq!(inputs.reference_outputs, vec!["the cat"]);
        assert_eq!(inputs.prompts, Some(vec!["p".to_string()]));
        assert_eq!(inputs.len(), 1);
    }

    #[test]
    fn test_lists_pass_through_in_order() {
        let inputs =
            validate_reference_based(vec!["a", "b"].into(), vec!["c", "d"].into(), None).unwrap();

        assert_eq!(inputs.generated_outputs, vec!["a", "b"]);
        assert_eq!(inputs.reference_outputs, vec!["c", "d"]);
        assert!(inputs.prompts.is_none());
    }

    #[test]
    fn test_reference_length_mismatch() {
        let err = validate_reference_based(["a", "b"].into(), "c".into(), None).unwrap_err();

        match err {
            Error::LengthMismatch {
                what,
                expected,
                found,
            } => {
                assert_eq!(what, "reference_outputs");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prompt_length_mismatch() {
        let err = validate_reference_based(
            ["a", "b"].into(),
            ["c", "d"].into(),
            Some(["p1", "p2", "p3"].into()),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::LengthMismatch {
                what: "prompts",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_lists_are_valid() {
        let empty: Vec<String> = Vec::new();
        let inputs =
            validate_reference_based(empty.clone().into(), empty.into(), None).unwrap();

        assert!(inputs.is_empty());
    }
}
