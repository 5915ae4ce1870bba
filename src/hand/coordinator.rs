//! Cross-step agreement on which hand goes first.
//!
//! The selection step resolves a hand order once per task run and writes it
//! into the task result. Every later hand-scoped step works out which hand it
//! is for by reading that order and looking at which hand sections have
//! already completed in its ancestor chain. No step holds a shared cursor.

use crate::hand::selection::{resolve_order, Hand, HandOrder, HandSelection};
use crate::hand::store::{PreferenceStore, StoreError};
use crate::result::{AncestorChain, CollectionResult, ResultKind, StepResult, TaskResult};
use rand::Rng;
use std::collections::HashMap;

/// Identifier of the hand-selection collection and of its selection answer.
pub const SELECTION_KEY: &str = "handSelection";

/// Identifier of the randomized hand-order answer.
pub const HAND_ORDER_KEY: &str = "handOrder";

/// Prefixes used by tasks that run several sub-steps per hand.
pub const VARIANT_PREFIXES: [&str; 2] = ["resting", "kinetic"];

/// Resolves, caches and persists hand orders for task runs.
pub struct HandOrderCoordinator<S: PreferenceStore> {
    store: S,
    /// Resolved order per run root, with the selection it was resolved from
    orders: HashMap<String, (HandSelection, HandOrder)>,
}

impl<S: PreferenceStore> HandOrderCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            orders: HashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Key under which the last selection for a task is stored.
    pub fn preference_key(root_identifier: &str) -> String {
        format!("{root_identifier}_lastHandSelection")
    }

    /// The selection to pre-fill for a new run, defaulting to `Both`.
    pub fn initial_selection(&self, root_identifier: &str) -> HandSelection {
        self.store
            .get(&Self::preference_key(root_identifier))
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Remember `selection` as the default for the next run of this task.
    pub fn persist_preference(
        &mut self,
        root_identifier: &str,
        selection: HandSelection,
    ) -> Result<(), StoreError> {
        self.store
            .set(&Self::preference_key(root_identifier), selection.as_str())
    }

    /// Resolve the order for a run.
    ///
    /// Repeated calls for the same run and selection return the cached order;
    /// a different selection resolves afresh.
    pub fn resolve_order<R: Rng + ?Sized>(
        &mut self,
        root_identifier: &str,
        selection: HandSelection,
        rng: &mut R,
    ) -> HandOrder {
        if let Some((cached_selection, order)) = self.orders.get(root_identifier) {
            if *cached_selection == selection {
                return order.clone();
            }
        }

        let order = resolve_order(selection, rng);
        tracing::info!(
            "Resolved hand order {:?} for {} (selection: {})",
            order.hands(),
            root_identifier,
            selection
        );
        self.orders
            .insert(root_identifier.to_string(), (selection, order.clone()));
        order
    }

    /// The order already resolved for a run, if any.
    pub fn cached_order(&self, root_identifier: &str) -> Option<&HandOrder> {
        self.orders.get(root_identifier).map(|(_, order)| order)
    }

    /// Forget the cached order once a run finishes.
    pub fn end_run(&mut self, root_identifier: &str) {
        self.orders.remove(root_identifier);
    }

    /// Handle the participant's answer to the hand-selection step.
    ///
    /// Persists the preference, resolves the order and writes both into the
    /// task result so descendant steps can find them.
    pub fn record_selection<R: Rng + ?Sized>(
        &mut self,
        task_result: &mut TaskResult,
        selection: HandSelection,
        rng: &mut R,
    ) -> HandOrder {
        let root = task_result.identifier.clone();
        if let Err(e) = self.persist_preference(&root, selection) {
            tracing::warn!("Could not persist hand selection for {}: {}", root, e);
        }

        let order = self.resolve_order(&root, selection, rng);

        let mut collection = CollectionResult::default();
        collection.append_input_result(StepResult::answer(
            SELECTION_KEY,
            serde_json::Value::from(selection.as_str()),
        ));
        collection.append_input_result(StepResult::answer(HAND_ORDER_KEY, order.to_json()));
        task_result.append_step_history(StepResult::new(
            SELECTION_KEY,
            ResultKind::Collection(collection),
        ));

        order
    }
}

/// Find the hand order recorded anywhere in the ancestor chain.
pub fn hand_order(chain: &AncestorChain<'_>) -> Option<HandOrder> {
    chain.levels().iter().find_map(|level| {
        level
            .result
            .find_result(SELECTION_KEY)
            .and_then(StepResult::as_collection)
            .and_then(|c| c.find_answer(HAND_ORDER_KEY))
            .and_then(HandOrder::from_json)
    })
}

/// Which hand is up next, judged by which hand results have completed.
///
/// Returns the last hand of the order once a result for the first hand is
/// found anywhere in the chain, otherwise the first hand.
pub fn current_hand(order: &HandOrder, chain: &AncestorChain<'_>) -> Hand {
    let first = order.first();
    let prefixes: Vec<&str> = VARIANT_PREFIXES
        .iter()
        .copied()
        .filter(|prefix| {
            chain.step_identifier().contains(prefix)
                || chain.parent_identifier().is_some_and(|p| p.contains(prefix))
        })
        .collect();

    for level in chain.levels() {
        for prefix in &prefixes {
            let variant = format!("{prefix}{}", first.capitalized());
            if level.result.find_result(&variant).is_some() {
                return order.last();
            }
        }
        if level.result.find_result(first.as_str()).is_some() {
            return order.last();
        }
    }

    first
}

/// The hand a step is for.
///
/// A hand encoded in the enclosing section identifier ("left",
/// "restingRight") wins; otherwise the recorded order decides.
pub fn which_hand(chain: &AncestorChain<'_>) -> Option<Hand> {
    if let Some(hand) = chain.parent_identifier().and_then(explicit_hand) {
        return Some(hand);
    }
    hand_order(chain).map(|order| current_hand(&order, chain))
}

/// Parse a hand out of a section identifier after dropping variant prefixes.
fn explicit_hand(identifier: &str) -> Option<Hand> {
    let stripped = VARIANT_PREFIXES
        .iter()
        .fold(identifier.to_string(), |id, prefix| id.replace(prefix, ""));
    stripped.to_lowercase().parse().ok()
}
