//! Hand selection and hand-order coordination for two-hand assessments.

pub mod coordinator;
pub mod selection;
pub mod store;

// Re-export commonly used types
pub use coordinator::{
    current_hand, hand_order, which_hand, HandOrderCoordinator, HAND_ORDER_KEY, SELECTION_KEY,
};
pub use selection::{
    continue_prompt, resolve_order, ContinuePrompt, Hand, HandOrder, HandSelection,
    ParseHandError,
};
pub use store::{JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore, StoreError};
