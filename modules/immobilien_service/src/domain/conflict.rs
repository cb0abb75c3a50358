//! Interval overlap detection for exclusive relationship kinds

use chrono::NaiveDate;

/// Date range of a relationship; a missing end is open-ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn closed(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    fn end_or_max(&self) -> NaiveDate {
        self.end.unwrap_or(NaiveDate::MAX)
    }

    /// Closed-interval overlap: `s1 <= e2 && e1 >= s2`
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end_or_max() && self.end_or_max() >= other.start
    }
}

/// Decides which date pairs take part in the overlap test
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector {
    open_ended: bool,
}

impl ConflictDetector {
    pub fn new(open_ended: bool) -> Self {
        Self { open_ended }
    }

    /// Range for a relationship's dates, or `None` when it is not checked.
    ///
    /// Without open-ended mode both dates are required.
    pub fn range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<DateRange> {
        match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::closed(start, end)),
            (Some(start), None) if self.open_ended => Some(DateRange::new(start, None)),
            _ => None,
        }
    }

    /// Whether `candidate` overlaps any of `existing`
    pub fn has_overlap<I>(&self, candidate: &DateRange, existing: I) -> bool
    where
        I: IntoIterator<Item = DateRange>,
    {
        existing.into_iter().any(|range| candidate.overlaps(&range))
    }
}
