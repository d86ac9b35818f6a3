use std::ops::Index;

use crate::foundation::error::{TimelineError, TimelineResult};
use crate::model::frame::Frame;

/// Ordered, validated list of frames.
///
/// Invariant: periods are strictly increasing and positions are the contiguous indices
/// `0..len()`. An empty sequence is valid (a parcel without history) but cannot be played.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Frame>,
}

impl FrameSequence {
    /// Validate ordering and wrap `frames`.
    pub fn new(frames: Vec<Frame>) -> TimelineResult<Self> {
        for (i, pair) in frames.windows(2).enumerate() {
            if pair[0].period >= pair[1].period {
                return Err(TimelineError::validation(format!(
                    "frame periods must be strictly increasing: frame {} ({}) is not before frame {} ({})",
                    i,
                    pair[0].period.key(),
                    i + 1,
                    pair[1].period.key()
                )));
            }
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Last valid position, `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.frames.len().checked_sub(1)
    }

    /// Image URLs of `index` for positions in `range`, skipping frames without imagery.
    pub fn image_urls(&self, index: &str, range: std::ops::Range<usize>) -> Vec<String> {
        let end = range.end.min(self.frames.len());
        let start = range.start.min(end);
        self.frames[start..end]
            .iter()
            .filter_map(|f| f.image_url(index).map(str::to_owned))
            .collect()
    }
}

impl Index<usize> for FrameSequence {
    type Output = Frame;

    fn index(&self, index: usize) -> &Self::Output {
        &self.frames[index]
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/sequence.rs"]
mod tests;
