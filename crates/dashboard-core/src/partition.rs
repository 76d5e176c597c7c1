//! Before/after partitioning around the price-change date.

use std::ops::Add;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::PeriodSplit;

/// Default threshold: the 15 January 2021 price increase.
pub const DEFAULT_THRESHOLD_DATE: &str = "2021-01-15";

/// Which side of the threshold a date falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Before,
    After,
}

/// Splits every time series at a single calendar date.
///
/// Dates strictly earlier than the threshold are [`Period::Before`]; the
/// threshold itself and later dates are [`Period::After`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRule {
    threshold: NaiveDate,
}

impl PartitionRule {
    pub fn new(threshold: NaiveDate) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> NaiveDate {
        self.threshold
    }

    pub fn period_of(&self, date: NaiveDate) -> Period {
        if date < self.threshold {
            Period::Before
        } else {
            Period::After
        }
    }

    /// Sum `(date, value)` pairs into a [`PeriodSplit`].
    pub fn split<T, I>(&self, items: I) -> PeriodSplit<T>
    where
        T: Copy + Default + Add<Output = T>,
        I: IntoIterator<Item = (NaiveDate, T)>,
    {
        let mut split = PeriodSplit::<T>::default();
        for (date, value) in items {
            match self.period_of(date) {
                Period::Before => split.before = split.before + value,
                Period::After => split.after = split.after + value,
            }
        }
        split
    }
}
