//! Aggregation window - the time range over which messages are counted
//!
//! Both bounds are inclusive. Commands may give either bound as a sentinel:
//! `today` (resolved against the configured local offset, full calendar day)
//! or `since-last` (resolved from the most recent aggregation record).

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Resolved time window with inclusive start and end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AggregationWindow {
    /// Create a window, rejecting `start > end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive containment check
    #[inline]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// One boundary of a window, possibly a sentinel awaiting resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBound {
    /// The current calendar day in the configured local offset
    Today,
    /// The instant of the most recent aggregation for the server
    SinceLast,
    /// An explicit calendar day in the configured local offset
    Date(NaiveDate),
}

impl WindowBound {
    /// Parse a command argument: `t`/`today`, `last`/`since-last`, or `YYYYMMDD`
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t" | "today" => Ok(Self::Today),
            "last" | "since-last" => Ok(Self::SinceLast),
            raw => NaiveDate::parse_from_str(raw, "%Y%m%d")
                .map(Self::Date)
                .map_err(|_| {
                    DomainError::ValidationError(format!(
                        "invalid window bound '{s}' (expected YYYYMMDD, 'today' or 'since-last')"
                    ))
                }),
        }
    }

    /// Resolve this bound as a window start.
    ///
    /// Calendar-day bounds resolve to 00:00:00 local; `SinceLast` resolves to
    /// the last aggregation instant and fails with `NoPriorAggregation` when
    /// no history exists.
    pub fn resolve_start(
        &self,
        now: DateTime<Utc>,
        offset: FixedOffset,
        last_aggregated_at: Option<DateTime<Utc>>,
    ) -> Result<DateTime<Utc>, DomainError> {
        match self {
            Self::SinceLast => last_aggregated_at.ok_or(DomainError::NoPriorAggregation),
            Self::Today => Ok(day_start_utc(now.with_timezone(&offset).date_naive(), offset)),
            Self::Date(date) => Ok(day_start_utc(*date, offset)),
        }
    }

    /// Resolve this bound as a window end (23:59:59 local for day bounds).
    pub fn resolve_end(
        &self,
        now: DateTime<Utc>,
        offset: FixedOffset,
        last_aggregated_at: Option<DateTime<Utc>>,
    ) -> Result<DateTime<Utc>, DomainError> {
        match self {
            Self::SinceLast => last_aggregated_at.ok_or(DomainError::NoPriorAggregation),
            Self::Today => Ok(day_end_utc(now.with_timezone(&offset).date_naive(), offset)),
            Self::Date(date) => Ok(day_end_utc(*date, offset)),
        }
    }
}

/// Unresolved pair of window bounds as given by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub start: WindowBound,
    pub end: WindowBound,
}

impl WindowSpec {
    pub fn new(start: WindowBound, end: WindowBound) -> Self {
        Self { start, end }
    }

    /// Resolve both bounds and validate ordering
    pub fn resolve(
        &self,
        now: DateTime<Utc>,
        offset: FixedOffset,
        last_aggregated_at: Option<DateTime<Utc>>,
    ) -> Result<AggregationWindow, DomainError> {
        let start = self.start.resolve_start(now, offset, last_aggregated_at)?;
        let end = self.end.resolve_end(now, offset, last_aggregated_at)?;
        AggregationWindow::new(start, end)
    }
}

fn day_start_utc(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = date.and_hms_opt(0, 0, 0).expect("valid midnight");
    offset
        .from_local_datetime(&local)
        .single()
        .expect("fixed offsets have no DST gaps")
        .with_timezone(&Utc)
}

fn day_end_utc(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = date.and_hms_opt(23, 59, 59).expect("valid end of day");
    offset
        .from_local_datetime(&local)
        .single()
        .expect("fixed offsets have no DST gaps")
        .with_timezone(&Utc)
}
