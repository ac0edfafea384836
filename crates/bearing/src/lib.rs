pub mod dial;
pub mod geometry;
pub mod macros;
pub mod scene;
pub mod session;
pub mod trial;

pub use dial::{Dial, DialAction, DialError, DialGeometry, DialState, InteractionMode};
pub use geometry::Point;
pub use scene::Scene;
pub use session::{Participant, Response, Session, SessionError};
pub use trial::{Label, TaskId, Trial, TrialError};
