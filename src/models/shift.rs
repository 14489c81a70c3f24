use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A pause inside a shift. `end == None` while the break is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Break {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
}

impl Break {
    pub fn minutes(&self) -> i64 {
        self.end
            .map(|end| (end - self.start).num_minutes())
            .unwrap_or(0)
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: i64,
    pub start: NaiveDateTime,     // ⇔ shifts.start (TEXT "YYYY-MM-DD HH:MM")
    pub end: Option<NaiveDateTime>, // ⇔ shifts.end (NULL while active)
    pub km_start: i64,
    pub km_end: Option<i64>,
    pub breaks: Vec<Break>, // ⇔ shifts.breaks (JSON)
    pub notes: String,
    pub created_at: String,
}

impl Shift {
    pub fn is_active(&self) -> bool {
        self.end.is_none()
    }

    pub fn open_break(&self) -> Option<&Break> {
        self.breaks.iter().find(|b| b.is_open())
    }

    pub fn total_km(&self) -> i64 {
        self.km_end.map(|end| end - self.km_start).unwrap_or(0)
    }

    pub fn break_minutes(&self) -> i64 {
        self.breaks.iter().map(Break::minutes).sum()
    }

    /// Net minutes worked. For an active shift `now` closes the interval.
    pub fn worked_minutes_at(&self, now: NaiveDateTime) -> i64 {
        let end = self.end.unwrap_or(now);
        let open_break = self
            .open_break()
            .map(|b| (now - b.start).num_minutes().max(0))
            .unwrap_or(0);
        ((end - self.start).num_minutes() - self.break_minutes() - open_break).max(0)
    }

    pub fn worked_minutes(&self) -> i64 {
        match self.end {
            Some(end) => self.worked_minutes_at(end),
            None => 0,
        }
    }
}
