// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed-size character windows with overlap, split on paragraph boundaries

use tracing::warn;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;
const PARAGRAPH_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,
    /// Characters of trailing paragraphs repeated at the start of the next chunk
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            ));
        }
        Ok(())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Length of `parts` joined by the paragraph separator
fn joined_len(parts: &[&str]) -> usize {
    let sep = char_len(PARAGRAPH_SEPARATOR);
    parts.iter().map(|p| char_len(p)).sum::<usize>() + sep * parts.len().saturating_sub(1)
}

/// Split `text` into chunks of at most `chunk_size` characters.
///
/// Paragraphs are never cut; a single paragraph longer than `chunk_size`
/// becomes its own oversized chunk.
pub fn split_text(text: &str, config: &ChunkerConfig) -> Vec<String> {
    let paragraphs: Vec<&str> = text
        .split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for paragraph in paragraphs {
        let mut candidate = current.clone();
        candidate.push(paragraph);

        if !current.is_empty() && joined_len(&candidate) > config.chunk_size {
            chunks.push(current.join(PARAGRAPH_SEPARATOR));

            // Carry trailing paragraphs that fit in the overlap
            while !current.is_empty()
                && (joined_len(&current) > config.chunk_overlap
                    || joined_len(&candidate_with(&current, paragraph)) > config.chunk_size)
            {
                current.remove(0);
            }
        }

        current.push(paragraph);
        if current.len() == 1 && char_len(paragraph) > config.chunk_size {
            warn!(
                "Paragraph of {} chars exceeds chunk size {}",
                char_len(paragraph),
                config.chunk_size
            );
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(PARAGRAPH_SEPARATOR));
    }

    chunks
}

fn candidate_with<'a>(current: &[&'a str], next: &'a str) -> Vec<&'a str> {
    let mut parts = current.to_vec();
    parts.push(next);
    parts
}
