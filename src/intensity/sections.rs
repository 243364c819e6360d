use serde::Serialize;
use std::ops::Range;

/// Half-open `[start, end)` range into a track's samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    pub start: usize,
    pub end: usize,
}

impl Section {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `sample_count` samples into `section_count` equal, contiguous sections.
///
/// Each section is `sample_count / section_count` samples long; samples left
/// over at the tail are not covered. A count of zero falls back to a single
/// section spanning the whole track.
pub fn partition(sample_count: usize, section_count: usize) -> Vec<Section> {
    if section_count == 0 {
        log::warn!("Section count 0 is invalid, scoring the whole track as one section");
        return vec![Section {
            start: 0,
            end: sample_count,
        }];
    }

    let section_len = sample_count / section_count;
    let dropped = sample_count - section_len * section_count;
    if dropped > 0 {
        log::debug!("Dropping {} trailing samples that do not fill a section", dropped);
    }

    (0..section_count)
        .map(|i| Section {
            start: i * section_len,
            end: (i + 1) * section_len,
        })
        .collect()
}
