//! Hand selection and the per-run hand order.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn other(self) -> Hand {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }

    /// Lower-case identifier, as used for section results.
    pub fn as_str(self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }

    /// Capitalized identifier, as used after a variant prefix ("restingLeft").
    pub fn capitalized(self) -> &'static str {
        match self {
            Hand::Left => "Left",
            Hand::Right => "Right",
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hand {
    type Err = ParseHandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Hand::Left),
            "right" => Ok(Hand::Right),
            other => Err(ParseHandError(other.to_string())),
        }
    }
}

/// Which hands the participant said they can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSelection {
    Left,
    Right,
    #[default]
    Both,
}

impl HandSelection {
    pub fn as_str(self) -> &'static str {
        match self {
            HandSelection::Left => "left",
            HandSelection::Right => "right",
            HandSelection::Both => "both",
        }
    }
}

impl From<Hand> for HandSelection {
    fn from(hand: Hand) -> Self {
        match hand {
            Hand::Left => HandSelection::Left,
            Hand::Right => HandSelection::Right,
        }
    }
}

impl std::fmt::Display for HandSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandSelection {
    type Err = ParseHandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(HandSelection::Left),
            "right" => Ok(HandSelection::Right),
            "both" => Ok(HandSelection::Both),
            other => Err(ParseHandError(other.to_string())),
        }
    }
}

/// Error for an unrecognized hand string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHandError(pub String);

impl std::fmt::Display for ParseHandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unrecognized hand: {}", self.0)
    }
}

impl std::error::Error for ParseHandError {}

/// The order in which hands perform a two-hand assessment.
///
/// Always holds one or two distinct hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Hand>", into = "Vec<Hand>")]
pub struct HandOrder(Vec<Hand>);

impl HandOrder {
    /// An order containing a single hand.
    pub fn single(hand: Hand) -> Self {
        Self(vec![hand])
    }

    /// Both hands, `first` going first.
    pub fn both(first: Hand) -> Self {
        Self(vec![first, first.other()])
    }

    pub fn first(&self) -> Hand {
        self.0[0]
    }

    pub fn last(&self) -> Hand {
        self.0[self.0.len() - 1]
    }

    pub fn hands(&self) -> &[Hand] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segment identifiers for the hands in order ("left", "right").
    pub fn identifiers(&self) -> Vec<String> {
        self.0.iter().map(|h| h.as_str().to_string()).collect()
    }

    /// Decode an order stored as a JSON string array in the result tree.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.identifiers())
    }
}

impl TryFrom<Vec<Hand>> for HandOrder {
    type Error = String;

    fn try_from(hands: Vec<Hand>) -> Result<Self, Self::Error> {
        match hands.as_slice() {
            [_] => Ok(Self(hands)),
            [a, b] if a != b => Ok(Self(hands)),
            _ => Err(format!("invalid hand order: {hands:?}")),
        }
    }
}

impl From<HandOrder> for Vec<Hand> {
    fn from(order: HandOrder) -> Self {
        order.0
    }
}

/// Resolve the hand order for a selection.
///
/// `Both` picks either direction with equal probability; a single hand yields
/// a one-element order.
pub fn resolve_order<R: Rng + ?Sized>(selection: HandSelection, rng: &mut R) -> HandOrder {
    match selection {
        HandSelection::Left => HandOrder::single(Hand::Left),
        HandSelection::Right => HandOrder::single(Hand::Right),
        HandSelection::Both => {
            if rng.gen_bool(0.5) {
                HandOrder::both(Hand::Left)
            } else {
                HandOrder::both(Hand::Right)
            }
        }
    }
}

/// What the continue button should offer once a hand finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinuePrompt {
    /// Move on to the other hand
    ContinueWith(Hand),
    /// This was the last hand
    Finish,
}

/// Decide the continue prompt for `hand` within `order`.
pub fn continue_prompt(order: &HandOrder, hand: Hand) -> ContinuePrompt {
    if hand != order.last() {
        ContinuePrompt::ContinueWith(hand.other())
    } else {
        ContinuePrompt::Finish
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_single_hand_orders() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(resolve_order(HandSelection::Left, &mut rng).hands(), &[Hand::Left]);
            assert_eq!(resolve_order(HandSelection::Right, &mut rng).hands(), &[Hand::Right]);
        }
    }

    #[test]
    fn test_both_produces_each_direction() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut left_first = 0;
        let mut right_first = 0;
        for _ in 0..200 {
            let order = resolve_order(HandSelection::Both, &mut rng);
            assert_eq!(order.len(), 2);
            assert_ne!(order.first(), order.last());
            match order.first() {
                Hand::Left => left_first += 1,
                Hand::Right => right_first += 1,
            }
        }
        assert!(left_first > 50, "left first only {left_first} times");
        assert!(right_first > 50, "right first only {right_first} times");
    }

    #[test]
    fn test_order_json() {
        let order = HandOrder::both(Hand::Right);
        assert_eq!(order.to_json(), serde_json::json!(["right", "left"]));
        assert_eq!(HandOrder::from_json(&order.to_json()), Some(order));
        assert_eq!(HandOrder::from_json(&serde_json::json!(["left", "left"])), None);
        assert_eq!(HandOrder::from_json(&serde_json::json!([])), None);
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!("both".parse::<HandSelection>(), Ok(HandSelection::Both));
        assert!("Both".parse::<HandSelection>().is_err());
        assert_eq!(HandSelection::default(), HandSelection::Both);
    }

    #[test]
    fn test_continue_prompt() {
        let order = HandOrder::both(Hand::Left);
        assert_eq!(continue_prompt(&order, Hand::Left), ContinuePrompt::ContinueWith(Hand::Right));
        assert_eq!(continue_prompt(&order, Hand::Right), ContinuePrompt::Finish);
        assert_eq!(continue_prompt(&HandOrder::single(Hand::Right), Hand::Right), ContinuePrompt::Finish);
    }
}
