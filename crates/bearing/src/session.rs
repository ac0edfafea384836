use crate::dial::{Dial, DialError};
use crate::trial::{TaskId, Trial};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Participant(String);

crate::impl_string_newtype!(Participant);

impl Participant {
    /// Trims `name`, rejecting it when nothing is left.
    pub fn parse(name: &str) -> Result<Self, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::BlankParticipant);
        }
        Ok(Self::new(name))
    }
}

/// One committed answer, in the shape the scoring backend consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub name: Participant,
    pub task_id: TaskId,
    pub logged_angle: u16,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("All trials have been completed")]
    Finished,
    #[error("Participant name must not be blank")]
    BlankParticipant,
    #[error("Dial shows trial {dial:?} but the session is on trial {expected}")]
    TrialMismatch {
        expected: TaskId,
        dial: Option<TaskId>,
    },
    #[error(transparent)]
    Dial(#[from] DialError),
}

/// Walks a participant through an ordered list of trials.
pub struct Session {
    participant: Participant,
    trials: Vec<Trial>,
    index: usize,
    responses: Vec<Response>,
}

impl Session {
    pub fn new(participant: Participant, trials: Vec<Trial>) -> Self {
        Self {
            participant,
            trials,
            index: 0,
            responses: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<&Trial> {
        self.trials.get(self.index)
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.trials.len()
    }

    /// 1-based position of the current trial, and the total.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.trials.len();
        ((self.index + 1).min(total), total)
    }

    /// Commits the dial for the current trial and moves on.
    ///
    /// A showcase is skipped without a response. The dial must hold the
    /// current trial. On error nothing advances, so the participant can retry.
    pub fn submit(&mut self, dial: &Dial) -> Result<Option<Response>, SessionError> {
        let trial = self.current().ok_or(SessionError::Finished)?;

        let on_dial = dial.trial().map(|t| t.id);
        if on_dial != Some(trial.id) {
            return Err(SessionError::TrialMismatch {
                expected: trial.id,
                dial: on_dial,
            });
        }

        if trial.showcase {
            self.index += 1;
            return Ok(None);
        }

        let response = Response {
            name: self.participant.clone(),
            task_id: trial.id,
            logged_angle: dial.commit()?,
        };
        log::info!(
            "Trial {} answered with {}°",
            response.task_id,
            response.logged_angle
        );

        self.responses.push(response.clone());
        self.index += 1;
        if self.is_finished() {
            log::info!(
                "Session for {} finished with {} responses",
                self.participant,
                self.responses.len()
            );
        }
        Ok(Some(response))
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dial::{DialGeometry, InteractionMode};
    use crate::geometry::Point;

    fn trials() -> Vec<Trial> {
        vec![
            Trial::new(0, "flower", "tree", "cat")
                .with_reference(301.0)
                .into_showcase(),
            Trial::new(1, "car", "traffic light", "stop sign"),
            Trial::new(2, "cat", "tree", "car"),
        ]
    }

    fn dial() -> Dial {
        Dial::new(
            DialGeometry::new(Point::new(200.0, 200.0), 100.0, 20.0),
            InteractionMode::Absolute,
        )
    }

    #[test]
    fn test_full_session() {
        let mut session = Session::new(Participant::new("ada"), trials());
        let mut dial = dial();

        dial.load_trial(session.current().unwrap());
        assert_eq!(session.submit(&dial), Ok(None));
        assert_eq!(session.progress(), (2, 3));

        dial.load_trial(session.current().unwrap());
        dial.pointer_down(Point::new(200.0, 100.0));
        dial.pointer_up();
        let response = session.submit(&dial).unwrap().unwrap();
        assert_eq!(
            response,
            Response {
                name: Participant::new("ada"),
                task_id: TaskId::from(1u32),
                logged_angle: 90,
            }
        );

        dial.load_trial(session.current().unwrap());
        dial.pointer_down(Point::new(300.0, 200.0));
        session.submit(&dial).unwrap();

        assert!(session.is_finished());
        assert_eq!(session.progress(), (3, 3));
        assert_eq!(session.responses().len(), 2);
        assert_eq!(session.responses()[1].logged_angle, 0);
        assert_eq!(session.submit(&dial), Err(SessionError::Finished));
    }

    #[test]
    fn test_missing_selection_does_not_advance() {
        let mut session = Session::new(Participant::new("ada"), trials()[1..].to_vec());
        let mut dial = dial();
        dial.load_trial(session.current().unwrap());

        assert_eq!(
            session.submit(&dial),
            Err(SessionError::Dial(DialError::NoSelection))
        );
        assert_eq!(session.progress(), (1, 2));
        assert!(session.responses().is_empty());
    }

    #[test]
    fn test_response_payload_shape() {
        let response = Response {
            name: Participant::new("ada"),
            task_id: TaskId::from(4u32),
            logged_angle: 270,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "ada", "task_id": 4, "logged_angle": 270 })
        );
    }

    #[test]
    fn test_answer_for_another_trial_is_refused() {
        let mut session = Session::new(Participant::new("ada"), trials()[1..].to_vec());
        let mut dial = dial();
        dial.load_trial(&Trial::new(99, "bell", "tree", "house"));
        dial.pointer_down(Point::new(200.0, 100.0));

        assert_eq!(
            session.submit(&dial),
            Err(SessionError::TrialMismatch {
                expected: TaskId::from(1u32),
                dial: Some(TaskId::from(99u32)),
            })
        );
        assert_eq!(session.progress(), (1, 2));
        assert!(session.responses().is_empty());
    }

    #[test]
    fn test_empty_dial_is_refused() {
        let mut session = Session::new(Participant::new("ada"), trials());
        assert_eq!(
            session.submit(&dial()),
            Err(SessionError::TrialMismatch {
                expected: TaskId::from(0u32),
                dial: None,
            })
        );
        assert_eq!(session.progress(), (1, 3));
    }

    #[test]
    fn test_participant_name_is_required() {
        assert_eq!(Participant::parse(" grace ").unwrap().as_str(), "grace");
        for blank in ["", "   ", "\t\n"] {
            assert_eq!(
                Participant::parse(blank),
                Err(SessionError::BlankParticipant)
            );
        }
    }
}
