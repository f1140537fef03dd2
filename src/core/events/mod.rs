#[cfg(test)]
use mockall::automock;

pub use ttest::{TTestParams, TTestSegmenter};

mod ttest;

/// A stable measurement region of the normalized signal.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Event {
    pub start: usize,
    pub length: usize,
    pub mean: f32,
    pub stdv: f32,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct EventTable {
    events: Vec<Event>,
}

impl EventTable {
    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<Event>> for EventTable {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}

#[cfg_attr(test, automock)]
pub trait Segmenter {
    fn segment(&self, signal: &[f32]) -> EventTable;
}
