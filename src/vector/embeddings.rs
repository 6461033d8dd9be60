// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

/// A dense embedding vector as stored in the document index
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    data: Vec<f32>,
    dimension: usize,
}

impl Embedding {
    pub fn new(data: Vec<f32>) -> Self {
        let dimension = data.len();
        Self { data, dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Squared L2 distance, the metric of a flat L2 index.
    /// Lower means more similar.
    pub fn squared_l2_distance(&self, other: &[f32]) -> f32 {
        if self.dimension != other.len() {
            return f32::INFINITY;
        }

        self.data
            .iter()
            .zip(other.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }
}
