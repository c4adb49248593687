//! Per-visitor UI state kept next to the cart.

use serde::{Deserialize, Serialize};

/// State that lives for as long as the visitor's storage does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisitorState {
    /// The home page intro heading has already animated for this visitor.
    pub intro_played: bool,
}
