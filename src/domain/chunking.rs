//! Overlapping character windows over document text.
//!
//! Windows are measured in characters, not bytes, so offsets stay meaningful for
//! non-Latin scripts. Each window ends on the strongest natural boundary found
//! in its second half (paragraph, line, sentence, word) and falls back to a hard
//! cut when none exists. The next window always starts exactly `chunk_overlap`
//! characters before the previous one ended.

use tracing::{debug, warn};

use crate::domain::{Chunk, Document, DomainError};

pub const DEFAULT_CHUNK_SIZE: usize = 2000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 300;

const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<Vec<char>>,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, DomainError> {
        if chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be positive"));
        }
        if chunk_overlap >= chunk_size {
            return Err(DomainError::validation(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self::with_sizes(chunk_size, chunk_overlap))
    }

    fn with_sizes(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: SEPARATORS.iter().map(|s| s.chars().collect()).collect(),
        }
    }

    /// Splits every document, keeping positional order within each one.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        if documents.is_empty() {
            warn!("no documents to split");
            return Vec::new();
        }

        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.content)
                    .into_iter()
                    .map(|(start, text)| Chunk::new(doc.filename(), text, start))
            })
            .collect();

        debug!(documents = documents.len(), chunks = chunks.len(), "documents split");
        chunks
    }

    /// Returns `(start_index, text)` windows over `text`.
    pub fn split_text(&self, text: &str) -> Vec<(usize, String)> {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut windows = Vec::new();
        if len == 0 {
            return windows;
        }

        let mut start = 0;
        loop {
            let hard_end = (start + self.chunk_size).min(len);
            if hard_end == len {
                windows.push((start, chars[start..len].iter().collect()));
                break;
            }

            let end = self.find_boundary(&chars, start, hard_end);
            windows.push((start, chars[start..end].iter().collect()));
            start = end - self.chunk_overlap;
        }

        windows
    }

    /// Picks the end of the window starting at `start`. The result is always
    /// greater than `start + chunk_overlap` so the next window makes progress.
    fn find_boundary(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let floor = start + (self.chunk_size / 2).max(self.chunk_overlap + 1);

        for separator in &self.separators {
            let width = separator.len();
            let mut end = hard_end;
            while end >= floor && end >= width {
                if chars[end - width..end] == separator[..] {
                    return end;
                }
                end -= 1;
            }
        }

        hard_end
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::with_sizes(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}
