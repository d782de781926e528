//! Append-only studio history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of notable event recorded in the chronicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChronicleCategory {
    FilmRelease,
    ArcResolution,
    TierAdvance,
    AwardsOutcome,
    FestivalOutcome,
    CrisisResolved,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChronicleEntry {
    pub week: u32,
    pub date: NaiveDate,
    pub category: ChronicleCategory,
    pub description: String,
}

/// History log. Entries can be appended and read, never edited or removed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Chronicle {
    entries: Vec<ChronicleEntry>,
}

impl Chronicle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        week: u32,
        date: NaiveDate,
        category: ChronicleCategory,
        description: impl Into<String>,
    ) {
        let description = description.into();
        tracing::debug!(week, ?category, %description, "chronicle entry");
        self.entries.push(ChronicleEntry {
            week,
            date,
            category,
            description,
        });
    }

    pub fn entries(&self) -> &[ChronicleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn of_category(&self, category: ChronicleCategory) -> impl Iterator<Item = &ChronicleEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn latest(&self) -> Option<&ChronicleEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::default_season_start;

    #[test]
    fn entries_append_in_order() {
        let mut log = Chronicle::new();
        let d = default_season_start();
        log.record(1, d, ChronicleCategory::FilmRelease, "first");
        log.record(2, d, ChronicleCategory::TierAdvance, "second");
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].description, "first");
        assert_eq!(log.latest().map(|e| e.week), Some(2));
        assert_eq!(log.of_category(ChronicleCategory::TierAdvance).count(), 1);
    }
}
