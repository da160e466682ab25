//! Shared primitive types used across the review engine.

/// Stable identifier of a reviewable item (a catalogue data set).
pub type ItemId = String;

/// Identifier of the user responsible for an item.
pub type OwnerId = String;

/// The canonical run identifier.
pub type RunId = String;
