//! Standings order and the flat table used for display and export.

use crate::models::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io;

/// Order two participants by standing: active before dropped, then points,
/// tiebreak1 and tiebreak2, all descending.
pub fn compare_standing(a: &Participant, b: &Participant) -> Ordering {
    a.dropped
        .cmp(&b.dropped)
        .then_with(|| b.points.total_cmp(&a.points))
        .then_with(|| b.tiebreak1.total_cmp(&a.tiebreak1))
        .then_with(|| b.tiebreak2.total_cmp(&a.tiebreak2))
}

/// Participants best-ranked first. Full ties keep their input order.
pub fn sort_standings(participants: &[Participant]) -> Vec<Participant> {
    let mut sorted = participants.to_vec();
    sorted.sort_by(compare_standing);
    sorted
}

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    /// 1-based position.
    pub rank: usize,
    pub id: ParticipantId,
    pub name: String,
    pub points: f64,
    pub tiebreak1: f64,
    pub tiebreak2: f64,
    pub dropped: bool,
}

pub fn standings_table(participants: &[Participant]) -> Vec<StandingRow> {
    sort_standings(participants)
        .into_iter()
        .enumerate()
        .map(|(i, p)| StandingRow {
            rank: i + 1,
            id: p.id,
            name: p.name,
            points: p.points,
            tiebreak1: p.tiebreak1,
            tiebreak2: p.tiebreak2,
            dropped: p.dropped,
        })
        .collect()
}

/// Write the table as CSV with a header row.
pub fn write_standings_csv<W: io::Write>(rows: &[StandingRow], writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}
