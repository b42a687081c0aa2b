use serde::Serialize;
use shuttle_matrix_providers::duration_provider::Minutes;

use crate::problem::virtual_stop::NodeIdx;

/// Duration used for pairs whose lookup failed.
pub const UNKNOWN_DURATION: Minutes = 999;

/// Square matrix of travel minutes between virtual stops.
///
/// Stored row-major: the duration from `i` to `j` is at `i * size + j`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeMatrix {
    size: usize,
    values: Vec<Minutes>,
}

impl TimeMatrix {
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            values: vec![0; size * size],
        }
    }

    /// # Panics
    ///
    /// Panics if `rows` is not square.
    pub fn from_rows(rows: Vec<Vec<Minutes>>) -> Self {
        let size = rows.len();
        assert!(
            rows.iter().all(|row| row.len() == size),
            "time matrix rows must all have {size} columns"
        );

        Self {
            size,
            values: rows.into_iter().flatten().collect(),
        }
    }

    #[inline(always)]
    pub fn get(&self, from: NodeIdx, to: NodeIdx) -> Minutes {
        self.values[from.get() * self.size + to.get()]
    }

    #[inline(always)]
    pub fn set(&mut self, from: NodeIdx, to: NodeIdx, minutes: Minutes) {
        self.values[from.get() * self.size + to.get()] = minutes;
    }

    pub fn size(&self) -> usize {
        self.size
    }
}
