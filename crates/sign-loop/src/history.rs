use std::collections::VecDeque;

/// How many accepted detections the running translation keeps.
pub const MAX_HISTORY: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub gesture: String,
    pub confidence: f32,
}

/// Ring of the most recent accepted detections, newest first.
///
/// Consecutive repeats of the same gesture collapse into one entry so
/// a result held across many ticks does not flood the transcript.
#[derive(Debug, Default)]
pub struct TranslationHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl TranslationHistory {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, gesture: impl Into<String>, confidence: f32) {
        let gesture = gesture.into();
        if self.entries.front().is_some_and(|e| e.gesture == gesture) {
            return;
        }
        self.entries.push_front(HistoryEntry {
            gesture,
            confidence,
        });
        self.entries.truncate(self.capacity);
    }

    /// The running translation, newest gesture first.
    pub fn transcript(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.gesture.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
