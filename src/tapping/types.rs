//! Sample and result types for the finger tapping assessment.
//!
//! Samples keep the raw location of every touch so that misses outside the
//! two targets remain available for downstream analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which target a touch landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonIdentifier {
    Left,
    Right,
    /// Touch outside both target regions
    None,
}

impl ButtonIdentifier {
    /// The opposite target, or `None` for a miss.
    pub fn alternate(self) -> Option<ButtonIdentifier> {
        match self {
            ButtonIdentifier::Left => Some(ButtonIdentifier::Right),
            ButtonIdentifier::Right => Some(ButtonIdentifier::Left),
            ButtonIdentifier::None => None,
        }
    }

    /// Whether touches on this target can count towards the tap score.
    pub fn is_target(self) -> bool {
        !matches!(self, ButtonIdentifier::None)
    }
}

/// A point in the step view's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in the step view's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Half-open containment: the far edges are outside the rectangle.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x < self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y < self.origin.y + self.size.height
    }
}

/// Layout of the two tap targets, captured once the step view is on screen.
///
/// The targets are assumed not to move for the rest of the step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TapRegions {
    pub left: Rect,
    pub right: Rect,
    pub view_size: Size,
}

impl TapRegions {
    pub fn new(left: Rect, right: Rect, view_size: Size) -> Self {
        Self {
            left,
            right,
            view_size,
        }
    }

    /// Classify a touch location against the two targets.
    pub fn hit_test(&self, location: Point) -> ButtonIdentifier {
        if self.left.contains(location) {
            ButtonIdentifier::Left
        } else if self.right.contains(location) {
            ButtonIdentifier::Right
        } else {
            ButtonIdentifier::None
        }
    }
}

/// A single recorded touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapSample {
    /// Seconds since the session clock started
    pub uptime: f64,
    /// Seconds since the first armed touch
    pub timestamp: f64,
    /// Path of the step that recorded the sample
    pub step_path: String,
    /// Target the touch landed on
    pub button_identifier: ButtonIdentifier,
    /// Touch location in the step view
    pub location: Point,
    /// How long the touch was held; zero until the release arrives
    pub duration: f64,
}

/// The aggregate result of one tapping step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TappingResult {
    pub identifier: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Left target region
    pub button_rect1: Rect,
    /// Right target region
    pub button_rect2: Rect,
    pub step_view_size: Size,
    pub samples: Vec<TapSample>,
    /// Number of scored (alternating) taps
    pub tap_count: u32,
}

impl TappingResult {
    /// Create an empty result for the given step.
    pub fn new(identifier: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.into(),
            start_date,
            end_date: start_date,
            button_rect1: Rect::default(),
            button_rect2: Rect::default(),
            step_view_size: Size::default(),
            samples: Vec::new(),
            tap_count: 0,
        }
    }

    /// Samples that landed outside both targets.
    pub fn missed_samples(&self) -> impl Iterator<Item = &TapSample> {
        self.samples
            .iter()
            .filter(|s| s.button_identifier == ButtonIdentifier::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternate_button() {
        assert_eq!(ButtonIdentifier::Left.alternate(), Some(ButtonIdentifier::Right));
        assert_eq!(ButtonIdentifier::Right.alternate(), Some(ButtonIdentifier::Left));
        assert_eq!(ButtonIdentifier::None.alternate(), None);
    }

    #[test]
    fn test_hit_test() {
        let regions = TapRegions::new(
            Rect::new(0.0, 100.0, 50.0, 50.0),
            Rect::new(100.0, 100.0, 50.0, 50.0),
            Size::new(200.0, 400.0),
        );

        assert_eq!(regions.hit_test(Point::new(10.0, 120.0)), ButtonIdentifier::Left);
        assert_eq!(regions.hit_test(Point::new(149.0, 149.0)), ButtonIdentifier::Right);
        assert_eq!(regions.hit_test(Point::new(150.0, 120.0)), ButtonIdentifier::None);
        assert_eq!(regions.hit_test(Point::new(75.0, 10.0)), ButtonIdentifier::None);
    }

    #[test]
    fn test_button_serialization() {
        let json = serde_json::to_string(&ButtonIdentifier::None).unwrap();
        assert_eq!(json, "\"none\"");
    }
}
