use crate::geometry::{self, Point};
use crate::trial::Trial;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

pub const DEFAULT_RADIUS: f64 = 150.0;
pub const DEFAULT_LABEL_OFFSET: f64 = 20.0; // gap between circle edge and label anchor

/// How a drag turns pointer motion into a selection.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// The line jumps to wherever the pointer is.
    #[default]
    #[strum(to_string = "absolute", serialize = "abs")]
    Absolute,
    /// The line rotates from its prior position by the pointer's angular travel.
    #[strum(to_string = "anchored", serialize = "relative", serialize = "rel")]
    Anchored,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DialError {
    #[error("No direction selected")]
    NoSelection,
    #[error("Worked examples cannot be committed")]
    Showcase,
    #[error("Invalid dial radius: {0}")]
    InvalidRadius(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialGeometry {
    pub center: Point,
    pub radius: f64,
    pub label_offset: f64,
}

impl DialGeometry {
    pub fn new(center: Point, radius: f64, label_offset: f64) -> Self {
        Self {
            center,
            radius,
            label_offset,
        }
    }

    pub fn angle_of(&self, cursor: Point) -> f64 {
        geometry::pointer_angle(self.center, cursor)
    }

    pub fn point_at(&self, degrees: f64, distance: f64) -> Point {
        geometry::point_at(self.center, degrees, distance)
    }

    /// End of a full-length line drawn at `degrees`.
    pub fn rim(&self, degrees: f64) -> Point {
        self.point_at(degrees, self.radius)
    }

    /// Label anchor just outside the circle at `degrees`.
    pub fn label_anchor(&self, degrees: f64) -> Point {
        self.point_at(degrees, self.radius + self.label_offset)
    }
}

impl Default for DialGeometry {
    fn default() -> Self {
        Self::new(
            Point::new(200.0, 200.0),
            DEFAULT_RADIUS,
            DEFAULT_LABEL_OFFSET,
        )
    }
}

/// Pointer-driven state. `None` means nothing selected; 0.0 is a real selection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DialState {
    pub selected_angle: Option<f64>,
    pub is_dragging: bool,
    pub drag_anchor_mouse_angle: Option<f64>,
    pub drag_anchor_selected_angle: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialAction {
    pub should_redraw: bool,
}

impl DialAction {
    pub fn new(should_redraw: bool) -> Self {
        Self { should_redraw }
    }

    pub fn redraw() -> Self {
        Self::new(true)
    }

    pub fn none() -> Self {
        Self::new(false)
    }
}

/// The direction dial: geometry, the loaded trial and the participant's selection.
pub struct Dial {
    geometry: DialGeometry,
    mode: InteractionMode,
    pending_mode: Option<InteractionMode>,
    trial: Option<Trial>,
    reference: Option<f64>,
    state: DialState,
}

impl Dial {
    pub fn new(geometry: DialGeometry, mode: InteractionMode) -> Self {
        Self {
            geometry,
            mode,
            pending_mode: None,
            trial: None,
            reference: None,
            state: DialState::default(),
        }
    }

    pub fn load_trial(&mut self, trial: &Trial) -> DialAction {
        if let Some(mode) = self.pending_mode.take() {
            log::info!("Interaction mode is now {}", mode);
            self.mode = mode;
        }
        self.reference = trial
            .reference_angle
            .filter(|a| a.is_finite())
            .map(geometry::normalize);
        self.state = DialState::default();
        self.trial = Some(trial.clone());

        log::info!(
            "Loaded trial {} ({} / {} / {}){}",
            trial.id,
            trial.origin,
            trial.facing,
            trial.target,
            if trial.showcase { " as worked example" } else { "" }
        );
        DialAction::redraw()
    }

    /// Drops the trial, leaving only the bare circle.
    pub fn clear(&mut self) -> DialAction {
        self.trial = None;
        self.reference = None;
        self.state = DialState::default();
        DialAction::redraw()
    }

    pub fn pointer_down(&mut self, cursor: Point) -> DialAction {
        if !self.is_interactive() || !cursor.is_finite() {
            return DialAction::none();
        }

        let mouse = self.geometry.angle_of(cursor);
        let prior = self.state.selected_angle;
        let selected = match (self.mode, prior) {
            (InteractionMode::Anchored, Some(prior)) => prior,
            _ => mouse,
        };

        self.state = DialState {
            selected_angle: Some(selected),
            is_dragging: true,
            drag_anchor_mouse_angle: Some(mouse),
            drag_anchor_selected_angle: prior,
        };
        log::debug!("Drag started at {:.1}°", mouse);

        DialAction::new(prior != Some(selected))
    }

    pub fn pointer_move(&mut self, cursor: Point) -> DialAction {
        if !self.state.is_dragging || !cursor.is_finite() {
            return DialAction::none();
        }

        let mouse = self.geometry.angle_of(cursor);
        let selected = match self.mode {
            InteractionMode::Absolute => mouse,
            InteractionMode::Anchored => {
                let anchor = self.state.drag_anchor_mouse_angle.unwrap_or(mouse);
                let baseline = self.state.drag_anchor_selected_angle.unwrap_or(anchor);
                geometry::normalize(baseline + (mouse - anchor))
            }
        };
        self.state.selected_angle = Some(selected);

        DialAction::redraw()
    }

    pub fn pointer_up(&mut self) -> DialAction {
        self.end_drag()
    }

    pub fn pointer_leave(&mut self) -> DialAction {
        self.end_drag()
    }

    fn end_drag(&mut self) -> DialAction {
        if self.state.is_dragging {
            self.state.is_dragging = false;
            self.state.drag_anchor_mouse_angle = None;
            self.state.drag_anchor_selected_angle = None;
            log::debug!("Drag ended at {:?}", self.state.selected_angle);
        }
        DialAction::none()
    }

    /// The selection in whole degrees, `[0, 360)`.
    pub fn commit(&self) -> Result<u16, DialError> {
        if self.trial.as_ref().is_some_and(|t| t.showcase) {
            return Err(DialError::Showcase);
        }
        self.state
            .selected_angle
            .map(geometry::round_degrees)
            .ok_or(DialError::NoSelection)
    }

    pub fn resize(&mut self, radius: f64) -> Result<DialAction, DialError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(DialError::InvalidRadius(radius));
        }
        self.geometry.radius = radius;
        Ok(DialAction::redraw())
    }

    pub fn set_center(&mut self, center: Point) -> DialAction {
        if !center.is_finite() || center == self.geometry.center {
            return DialAction::none();
        }
        self.geometry.center = center;
        DialAction::redraw()
    }

    pub fn set_label_offset(&mut self, offset: f64) -> DialAction {
        if !offset.is_finite() || offset == self.geometry.label_offset {
            return DialAction::none();
        }
        self.geometry.label_offset = offset;
        DialAction::redraw()
    }

    /// Applies immediately on an empty dial, otherwise at the next `load_trial`
    /// so a single trial never mixes modes.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.trial.is_none() {
            self.mode = mode;
            self.pending_mode = None;
        } else if mode != self.mode {
            self.pending_mode = Some(mode);
        } else {
            self.pending_mode = None;
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.trial.as_ref().is_some_and(|t| !t.showcase)
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging
    }

    pub fn selected_angle(&self) -> Option<f64> {
        self.state.selected_angle
    }

    /// Angle the target label follows: the selection, or the worked answer on a showcase.
    pub fn displayed_angle(&self) -> Option<f64> {
        match &self.trial {
            Some(t) if t.showcase => self.reference,
            Some(_) => self.state.selected_angle,
            None => None,
        }
    }

    pub fn reference(&self) -> Option<f64> {
        self.reference
    }

    pub fn state(&self) -> &DialState {
        &self.state
    }

    pub fn geometry(&self) -> &DialGeometry {
        &self.geometry
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn trial(&self) -> Option<&Trial> {
        self.trial.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn dial(mode: InteractionMode) -> Dial {
        let mut dial = Dial::new(
            DialGeometry::new(Point::new(200.0, 200.0), 100.0, DEFAULT_LABEL_OFFSET),
            mode,
        );
        dial.load_trial(&Trial::new(1, "bell", "tree", "house"));
        dial
    }

    fn click(dial: &mut Dial, x: f64, y: f64) {
        dial.pointer_down(Point::new(x, y));
        dial.pointer_up();
    }

    #[test]
    fn test_click_scenarios() {
        let cases = [
            ((300.0, 200.0), 0),
            ((200.0, 100.0), 90),
            ((100.0, 200.0), 180),
            ((200.0, 300.0), 270),
        ];
        let mut dial = dial(InteractionMode::Absolute);
        for ((x, y), expected) in cases {
            click(&mut dial, x, y);
            assert_eq!(dial.commit(), Ok(expected), "click at ({x}, {y})");
        }
    }

    #[test]
    fn test_press_then_commit_is_in_range() {
        for mode in [InteractionMode::Absolute, InteractionMode::Anchored] {
            for (x, y) in [
                (200.0, 200.0),
                (-5000.0, 12.5),
                (199.999, 200.001),
                (1e9, -1e9),
                (200.0, 199.0),
            ] {
                let mut dial = dial(mode);
                dial.pointer_down(Point::new(x, y));
                let angle = dial.commit().unwrap();
                assert!(angle < 360, "{mode}: ({x}, {y}) -> {angle}");
            }
        }
    }

    #[test]
    fn test_round_trip_is_independent_of_radius() {
        for radius in [10.0, 100.0, 640.0] {
            for degrees in [0.4, 12.6, 179.3, 359.7] {
                let mut dial = dial(InteractionMode::Absolute);
                dial.resize(radius).unwrap();
                let p = dial.geometry().point_at(degrees, radius * 0.5);
                dial.pointer_down(p);
                let expected = geometry::round_degrees(degrees);
                assert_eq!(dial.commit(), Ok(expected), "{degrees}° at r={radius}");
            }
        }
    }

    #[test]
    fn test_zero_is_a_selection() {
        let mut dial = dial(InteractionMode::Absolute);
        click(&mut dial, 250.0, 200.0);
        assert_eq!(dial.selected_angle(), Some(0.0));
        assert_eq!(dial.commit(), Ok(0));
    }

    #[test]
    fn test_commit_without_selection() {
        let dial = dial(InteractionMode::Absolute);
        assert_eq!(dial.commit(), Err(DialError::NoSelection));
    }

    #[test]
    fn test_reference_angle_is_not_a_selection() {
        let mut dial = dial(InteractionMode::Absolute);
        dial.load_trial(&Trial::new(2, "bell", "tree", "house").with_reference(45.0));
        assert_eq!(dial.reference(), Some(45.0));
        assert_eq!(dial.selected_angle(), None);
        assert_eq!(dial.commit(), Err(DialError::NoSelection));
    }

    #[test]
    fn test_showcase_ignores_pointer_and_refuses_commit() {
        let mut dial = dial(InteractionMode::Absolute);
        let trial = Trial::new(0, "flower", "tree", "cat")
            .with_reference(-59.0)
            .into_showcase();
        dial.load_trial(&trial);

        assert!(!dial.is_interactive());
        assert_eq!(dial.pointer_down(Point::new(300.0, 200.0)), DialAction::none());
        assert!(!dial.is_dragging());
        assert_eq!(dial.selected_angle(), None);
        assert!((dial.displayed_angle().unwrap() - 301.0).abs() < EPS);
        assert_eq!(dial.commit(), Err(DialError::Showcase));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut dial = dial(InteractionMode::Absolute);
        let action = dial.pointer_move(Point::new(300.0, 200.0));
        assert!(!action.should_redraw);
        assert_eq!(dial.selected_angle(), None);
    }

    #[test]
    fn test_drag_follows_pointer() {
        let mut dial = dial(InteractionMode::Absolute);
        dial.pointer_down(Point::new(300.0, 200.0));
        assert!(dial.is_dragging());
        assert!(dial.pointer_move(Point::new(200.0, 100.0)).should_redraw);
        assert!((dial.selected_angle().unwrap() - 90.0).abs() < EPS);
        dial.pointer_leave();
        assert!(!dial.is_dragging());
        assert_eq!(dial.commit(), Ok(90));
    }

    #[test]
    fn test_move_after_release_is_idempotent() {
        let mut dial = dial(InteractionMode::Absolute);
        dial.pointer_down(Point::new(200.0, 100.0));
        dial.pointer_up();
        let before = *dial.state();
        for _ in 0..3 {
            dial.pointer_move(Point::new(100.0, 200.0));
        }
        assert_eq!(*dial.state(), before);
    }

    #[test]
    fn test_release_keeps_selection() {
        let mut dial = dial(InteractionMode::Absolute);
        dial.pointer_down(Point::new(100.0, 200.0));
        let selected = dial.selected_angle();
        dial.pointer_up();
        dial.pointer_up();
        assert_eq!(dial.selected_angle(), selected);
        assert_eq!(dial.state().drag_anchor_mouse_angle, None);
    }

    #[test]
    fn test_anchored_rotates_from_prior_selection() {
        let mut dial = dial(InteractionMode::Anchored);
        // first press has nothing to anchor to, so it selects the pointer angle
        click(&mut dial, 200.0, 100.0);
        assert_eq!(dial.commit(), Ok(90));

        // grab at east, sweep a quarter turn clockwise to south
        dial.pointer_down(Point::new(300.0, 200.0));
        assert_eq!(dial.commit(), Ok(90));
        assert_eq!(dial.state().drag_anchor_selected_angle, dial.selected_angle());
        dial.pointer_move(Point::new(200.0, 300.0));
        dial.pointer_up();
        assert_eq!(dial.commit(), Ok(0));
    }

    #[test]
    fn test_anchored_wraps_below_zero() {
        let mut dial = dial(InteractionMode::Anchored);
        click(&mut dial, 300.0, 200.0);
        dial.pointer_down(Point::new(200.0, 100.0));
        dial.pointer_move(Point::new(300.0, 200.0));
        assert_eq!(dial.commit(), Ok(270));
    }

    #[test]
    fn test_resize_mid_drag_preserves_state() {
        let mut dial = dial(InteractionMode::Absolute);
        dial.pointer_down(Point::new(200.0, 100.0));
        let before = *dial.state();

        assert!(dial.resize(40.0).unwrap().should_redraw);
        assert_eq!(*dial.state(), before);
        assert!(dial.is_dragging());
        assert_eq!(dial.geometry().radius, 40.0);

        let rim = dial.geometry().rim(90.0);
        assert!((rim.y - 160.0).abs() < EPS);
    }

    #[test]
    fn test_resize_rejects_bad_radius() {
        let mut dial = dial(InteractionMode::Absolute);
        for radius in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                dial.resize(radius),
                Err(DialError::InvalidRadius(_))
            ));
        }
        assert_eq!(dial.geometry().radius, 100.0);
    }

    #[test]
    fn test_load_trial_resets_selection() {
        let mut dial = dial(InteractionMode::Absolute);
        dial.pointer_down(Point::new(200.0, 100.0));
        dial.load_trial(&Trial::new(2, "car", "cat", "tree"));
        assert_eq!(*dial.state(), DialState::default());
        assert_eq!(dial.commit(), Err(DialError::NoSelection));
    }

    #[test]
    fn test_mode_change_waits_for_next_trial() {
        let mut dial = dial(InteractionMode::Absolute);
        dial.set_mode(InteractionMode::Anchored);
        assert_eq!(dial.mode(), InteractionMode::Absolute);
        dial.load_trial(&Trial::new(2, "car", "cat", "tree"));
        assert_eq!(dial.mode(), InteractionMode::Anchored);
    }

    #[test]
    fn test_non_finite_pointer_is_ignored() {
        let mut dial = dial(InteractionMode::Absolute);
        dial.pointer_down(Point::new(f64::NAN, 10.0));
        assert!(!dial.is_dragging());
        assert_eq!(dial.selected_angle(), None);
    }

    #[test]
    fn test_no_trial_is_inert() {
        let mut dial = Dial::new(DialGeometry::default(), InteractionMode::Absolute);
        dial.pointer_down(Point::new(0.0, 0.0));
        assert!(!dial.is_dragging());
        assert_eq!(dial.commit(), Err(DialError::NoSelection));
    }

    #[test]
    fn test_mode_parsing() {
        let cases = vec![
            ("\"absolute\"", InteractionMode::Absolute),
            ("\"ABS\"", InteractionMode::Absolute),
            ("\"anchored\"", InteractionMode::Anchored),
            ("\"Relative\"", InteractionMode::Anchored),
        ];
        for (json, expected) in cases {
            let mode: InteractionMode = serde_json::from_str(json).unwrap();
            assert_eq!(mode, expected);
        }
        assert_eq!(InteractionMode::Anchored.to_string(), "anchored");
    }
}
