//! Incremental block splitter driven by [`ChunkBounds`].
//!
//! Text is buffered until at least `min_chars` characters are available and a
//! break of the preferred style lands inside `[min_chars, max_chars]`. Once the
//! buffer reaches `max_chars` without such a break, weaker breaks are tried
//! (paragraph, newline, sentence end, whitespace) before a hard split.
//! All lengths are counted in chars, so multi-byte text is never cut mid-codepoint.

use crate::chunking::{BreakPreference, ChunkBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakKind {
    Paragraph,
    Newline,
    Sentence,
    Whitespace,
}

impl From<BreakPreference> for BreakKind {
    fn from(pref: BreakPreference) -> Self {
        match pref {
            BreakPreference::Paragraph => BreakKind::Paragraph,
            BreakPreference::Newline => BreakKind::Newline,
            BreakPreference::Sentence => BreakKind::Sentence,
        }
    }
}

const FALLBACK_ORDER: [BreakKind; 4] = [
    BreakKind::Paragraph,
    BreakKind::Newline,
    BreakKind::Sentence,
    BreakKind::Whitespace,
];

#[derive(Debug, Clone)]
pub struct BlockChunker {
    bounds: ChunkBounds,
    buffer: String,
}

impl BlockChunker {
    pub fn new(bounds: ChunkBounds) -> Self {
        Self {
            bounds,
            buffer: String::new(),
        }
    }

    pub fn bounds(&self) -> ChunkBounds {
        self.bounds
    }

    /// Characters waiting for the next break.
    pub fn pending(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Append streamed text and return every block that is ready to send.
    pub fn push(&mut self, delta: &str) -> Vec<String> {
        self.buffer.push_str(delta);
        let mut ready = Vec::new();

        loop {
            let len = self.pending();
            if len < self.bounds.min_chars {
                break;
            }
            let preferred = BreakKind::from(self.bounds.break_preference);
            let split = find_break(
                &self.buffer,
                self.bounds.min_chars,
                self.bounds.max_chars,
                preferred,
            )
            .or_else(|| (len >= self.bounds.max_chars).then(|| self.forced_split()));
            match split {
                Some(at) => self.emit(at, &mut ready),
                None => break,
            }
        }

        ready
    }

    /// Drain whatever is buffered, still honouring `max_chars`.
    pub fn flush(&mut self) -> Vec<String> {
        let mut ready = Vec::new();
        while self.pending() > self.bounds.max_chars {
            let at = self.forced_split();
            self.emit(at, &mut ready);
        }
        let rest = std::mem::take(&mut self.buffer);
        let rest = rest.trim_end();
        if !rest.is_empty() {
            ready.push(rest.to_string());
        }
        ready
    }

    /// Split a complete text in one go.
    pub fn split(bounds: ChunkBounds, text: &str) -> Vec<String> {
        let mut chunker = Self::new(bounds);
        let mut chunks = chunker.push(text);
        chunks.extend(chunker.flush());
        chunks
    }

    fn forced_split(&self) -> usize {
        let preferred = BreakKind::from(self.bounds.break_preference);
        std::iter::once(preferred)
            .chain(FALLBACK_ORDER)
            .find_map(|kind| find_break(&self.buffer, 1, self.bounds.max_chars, kind))
            .unwrap_or_else(|| byte_offset(&self.buffer, self.bounds.max_chars))
    }

    fn emit(&mut self, at: usize, ready: &mut Vec<String>) {
        let rest = self.buffer.split_off(at);
        let chunk = self.buffer.trim_end();
        if !chunk.is_empty() {
            ready.push(chunk.to_string());
        }
        self.buffer = rest.trim_start().to_string();
    }
}

/// Byte index just past the last `kind` break whose end falls within
/// `[lo, hi]` characters of `text`.
fn find_break(text: &str, lo: usize, hi: usize, kind: BreakKind) -> Option<usize> {
    let window = &text[..byte_offset(text, hi)];
    let end = match kind {
        BreakKind::Paragraph => window.rfind("\n\n").map(|i| i + 2),
        BreakKind::Newline => window.rfind('\n').map(|i| i + 1),
        BreakKind::Sentence => last_sentence_end(window),
        BreakKind::Whitespace => window
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8()),
    }?;
    (window[..end].chars().count() >= lo).then_some(end)
}

/// Position after a `.`, `!` or `?` that is followed by whitespace.
fn last_sentence_end(window: &str) -> Option<usize> {
    let mut chars = window.char_indices().peekable();
    let mut last = None;
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some((_, next)) = chars.peek() {
                if next.is_whitespace() {
                    last = Some(i + c.len_utf8());
                }
            }
        }
    }
    last
}

/// Byte offset of the `chars`-th character, or the full length.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
