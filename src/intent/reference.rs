//! Typed positions for the command executor

use crate::intent::types::{NormalizedIntent, ReferencePoint};

/// A position expressed as a skip count from a reference point
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Reference {
    Start(i64),
    Current(i64),
    End(i64),
}

impl Reference {
    pub fn new(point: ReferencePoint, offset: i64) -> Self {
        match point {
            ReferencePoint::Start => Self::Start(offset),
            ReferencePoint::Current => Self::Current(offset),
            ReferencePoint::End => Self::End(offset),
        }
    }

    pub fn offset(&self) -> i64 {
        match self {
            Self::Start(c) | Self::Current(c) | Self::End(c) => *c,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.offset() >= 0
    }
}

impl NormalizedIntent {
    /// Every entity that carries an offset, paired with its position
    pub fn references(&self) -> Vec<(&str, Reference)> {
        self.entities
            .iter()
            .filter_map(|e| {
                e.offset
                    .map(|offset| (e.entity.as_str(), Reference::new(self.reference, offset)))
            })
            .collect()
    }

    /// First entity carrying a description, with its index
    pub fn first_description(&self) -> Option<(&str, usize)> {
        self.entities
            .iter()
            .enumerate()
            .find_map(|(i, e)| e.description().map(|d| (d, i)))
    }
}
