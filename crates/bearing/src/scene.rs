use crate::dial::Dial;
use crate::geometry::Point;
use crate::trial::Label;

const NORTH: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Display-only reference on an interactive trial.
    Hint,
    /// The participant's current selection.
    Pending,
    /// The worked answer on a showcase trial.
    Showcase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionLine {
    pub kind: LineKind,
    pub angle: f64,
    pub end: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Origin,
    Facing,
    Target,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    pub role: LabelRole,
    pub text: Label,
    pub position: Point,
}

/// Everything needed to paint one frame of the dial, in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub center: Point,
    pub radius: f64,
    pub north: Point,
    pub lines: Vec<DirectionLine>,
    pub labels: Vec<PlacedLabel>,
}

impl Scene {
    pub fn label(&self, role: LabelRole) -> Option<&PlacedLabel> {
        self.labels.iter().find(|l| l.role == role)
    }

    pub fn line(&self, kind: LineKind) -> Option<&DirectionLine> {
        self.lines.iter().find(|l| l.kind == kind)
    }
}

impl Dial {
    /// Lays out circle, north reference, direction lines and labels.
    ///
    /// The origin sits on the center and the facing object above the north line.
    /// The target follows the far end of the displayed direction and is left out
    /// until there is one.
    pub fn scene(&self) -> Scene {
        let geometry = self.geometry();
        let mut scene = Scene {
            center: geometry.center,
            radius: geometry.radius,
            north: geometry.rim(NORTH),
            lines: Vec::new(),
            labels: Vec::new(),
        };

        let Some(trial) = self.trial() else {
            return scene;
        };

        let line = |kind, angle| DirectionLine {
            kind,
            angle,
            end: geometry.rim(angle),
        };

        if let Some(reference) = self.reference() {
            let kind = if trial.showcase {
                LineKind::Showcase
            } else {
                LineKind::Hint
            };
            scene.lines.push(line(kind, reference));
        }
        if let Some(selected) = self.selected_angle() {
            scene.lines.push(line(LineKind::Pending, selected));
        }

        scene.labels.push(PlacedLabel {
            role: LabelRole::Origin,
            text: trial.origin.clone(),
            position: geometry.center,
        });
        scene.labels.push(PlacedLabel {
            role: LabelRole::Facing,
            text: trial.facing.clone(),
            position: geometry.label_anchor(NORTH),
        });
        if let Some(angle) = self.displayed_angle() {
            scene.labels.push(PlacedLabel {
                role: LabelRole::Target,
                text: trial.target.clone(),
                position: geometry.label_anchor(angle),
            });
        }

        scene
    }
}
