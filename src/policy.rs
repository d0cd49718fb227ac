use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the tabular adapter picks the value cell out of a matched row.
///
/// Both variants are heuristics with known failure modes (multi-column
/// statements chief among them); keeping them named and swappable lets a
/// later refinement land without touching the adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "PascalCase")]
pub enum RowValuePolicy {
    /// Labels precede values left to right, so the rightmost numeric-looking
    /// cell is the figure. The conservative default.
    #[default]
    LastNumericCell,

    /// Take the leftmost numeric-looking cell instead. Useful for layouts
    /// that lead with the current period and trail with comparatives.
    FirstNumericCell,
}

/// How far past a label occurrence the free-text adapter looks for an
/// amount token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "PascalCase", tag = "window")]
pub enum TextLookahead {
    /// The amount must appear before the next line break. Statement lines
    /// pair label and figure on one row of print, and stopping at the
    /// newline keeps a label from capturing a figure that belongs to the
    /// item printed below it.
    #[default]
    SameLine,

    /// The amount may appear within the next `limit` characters, across
    /// line breaks. For sources whose text layer reflows label and figure
    /// onto separate lines.
    Chars { limit: usize },
}

/// The resolution heuristics shared by the source adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ResolutionPolicy {
    pub row_value: RowValuePolicy,
    pub lookahead: TextLookahead,
}
