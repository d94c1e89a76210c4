use serde::{Deserialize, Serialize};

use crate::core::geometry::Side;

/// One glide authorization: a box labelled `label` whose `neighbor_side`
/// neighbour is labelled `neighbor_label` may glide towards `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlideRule {
    pub label: String,
    pub neighbor_side: Side,
    pub neighbor_label: String,
    pub direction: Side,
}

impl GlideRule {
    pub fn new(label: &str, neighbor_side: Side, neighbor_label: &str, direction: Side) -> Self {
        Self {
            label: label.to_string(),
            neighbor_side,
            neighbor_label: neighbor_label.to_string(),
            direction,
        }
    }
}

/// The full rule set of the glide-enabled board.
pub fn default_rules() -> Vec<GlideRule> {
    vec![
        GlideRule::new("o", Side::Left, "p", Side::Right),
        GlideRule::new("o", Side::Right, "k", Side::Left),
        GlideRule::new("d", Side::Left, "o", Side::Below),
        GlideRule::new("p", Side::Left, "o", Side::Above),
        GlideRule::new("b", Side::Right, "o", Side::Above),
        GlideRule::new("v", Side::Right, "o", Side::Below),
    ]
}

/// Direction authorized for `label`, given a lookup of neighbour labels by
/// side. First matching rule wins. Unknown or empty labels never glide.
pub fn find_glide<'a, F>(rules: &[GlideRule], label: &str, neighbor_label: F) -> Option<Side>
where
    F: Fn(Side) -> Option<&'a str>,
{
    if label.is_empty() {
        return None;
    }
    rules
        .iter()
        .filter(|r| r.label == label)
        .find(|r| neighbor_label(r.neighbor_side).map_or(false, |l| l == r.neighbor_label))
        .map(|r| r.direction)
}
