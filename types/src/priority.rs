//! Priority classes for submitted transactions.

use serde::{Deserialize, Serialize};

/// The five-level priority class declared by the submitter.
///
/// The class weight is a fixed multiplier in the admission queue's priority
/// score; it cannot be tuned per transaction beyond choosing a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityClass {
    Bulk,
    Standard,
    Expedited,
    Priority,
    Critical,
}

impl PriorityClass {
    /// Fixed score multiplier for this class.
    pub fn weight(&self) -> f64 {
        match self {
            PriorityClass::Bulk => 0.5,
            PriorityClass::Standard => 1.0,
            PriorityClass::Expedited => 2.0,
            PriorityClass::Priority => 4.0,
            PriorityClass::Critical => 8.0,
        }
    }
}

impl Default for PriorityClass {
    fn default() -> Self {
        PriorityClass::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_strictly_increase_with_class() {
        let classes = [
            PriorityClass::Bulk,
            PriorityClass::Standard,
            PriorityClass::Expedited,
            PriorityClass::Priority,
            PriorityClass::Critical,
        ];
        for pair in classes.windows(2) {
            assert!(pair[0].weight() < pair[1].weight());
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn default_is_standard() {
        assert_eq!(PriorityClass::default(), PriorityClass::Standard);
    }
}
