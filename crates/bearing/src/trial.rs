use derive_more::{AsRef, Deref, Display, From, Into};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Label(String);

crate::impl_string_newtype!(Label);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    From,
    Into,
)]
#[serde(transparent)]
pub struct TaskId(u32);

/// One origin/facing/target prompt.
///
/// The task source names the first two objects `from` and `to`; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub id: TaskId,
    #[serde(alias = "from")]
    pub origin: Label,
    #[serde(alias = "to")]
    pub facing: Label,
    pub target: Label,
    #[serde(default)]
    pub reference_angle: Option<f64>,
    /// Worked example shown with its answer; never committed.
    #[serde(default)]
    pub showcase: bool,
}

impl Trial {
    pub fn new(
        id: u32,
        origin: impl Into<String>,
        facing: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: TaskId::from(id),
            origin: Label::new(origin),
            facing: Label::new(facing),
            target: Label::new(target),
            reference_angle: None,
            showcase: false,
        }
    }

    pub fn with_reference(mut self, degrees: f64) -> Self {
        self.reference_angle = Some(degrees);
        self
    }

    pub fn into_showcase(mut self) -> Self {
        self.showcase = true;
        self
    }

    pub fn prompt(&self) -> String {
        let body = format!(
            "Imagine you're standing at the {}, facing the {}. Point to the {}.",
            self.origin, self.facing, self.target
        );
        if self.showcase {
            format!("Example: {body}")
        } else {
            body
        }
    }
}

#[derive(Error, Debug)]
pub enum TrialError {
    #[error("Failed to read trials: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed trial list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Trial list is empty")]
    Empty,
}

pub fn parse_trials(json: &str) -> Result<Vec<Trial>, TrialError> {
    let trials: Vec<Trial> = serde_json::from_str(json)?;
    if trials.is_empty() {
        return Err(TrialError::Empty);
    }
    Ok(trials)
}

pub fn load_trials(path: &Path) -> Result<Vec<Trial>, TrialError> {
    let json = fs::read_to_string(path)?;
    let trials = parse_trials(&json)?;
    log::info!("Loaded {} trials from {}", trials.len(), path.display());
    Ok(trials)
}

/// Bundled set, opening with the flower/tree/cat worked example.
pub fn default_trials() -> Result<Vec<Trial>, TrialError> {
    parse_trials(DEFAULT_TRIALS)
}

const DEFAULT_TRIALS: &str = include_str!("default_trials.json");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_source_field_names() {
        let json = r#"[{"id": 7, "from": "bell", "to": "tree", "target": "house"}]"#;
        let trials = parse_trials(json).unwrap();
        assert_eq!(trials, vec![Trial::new(7, "bell", "tree", "house")]);
    }

    #[test]
    fn test_optional_fields() {
        let json = r#"[{
            "id": 1, "origin": "flower", "facing": "tree", "target": "cat",
            "reference_angle": 301.0, "showcase": true
        }]"#;
        let trial = &parse_trials(json).unwrap()[0];
        assert_eq!(trial.reference_angle, Some(301.0));
        assert!(trial.showcase);
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(matches!(parse_trials("[]"), Err(TrialError::Empty)));
        assert!(matches!(parse_trials("{"), Err(TrialError::Parse(_))));
    }

    #[test]
    fn test_default_trials_open_with_showcase() {
        let trials = default_trials().unwrap();
        assert!(trials.len() > 1);
        assert!(trials[0].showcase);
        assert!(trials[0].reference_angle.is_some());
        assert!(trials[1..].iter().all(|t| !t.showcase));
    }

    #[test]
    fn test_prompt() {
        let trial = Trial::new(3, "bell", "tree", "house");
        assert_eq!(
            trial.prompt(),
            "Imagine you're standing at the bell, facing the tree. Point to the house."
        );
        assert!(trial.into_showcase().prompt().starts_with("Example: "));
    }
}
