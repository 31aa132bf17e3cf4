use super::{car, timestamp};
use crate::domain::entity::RawRaceControl;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawRaceControlMessage {
    pub date: Option<String>,
    pub category: Option<String>,
    pub flag: Option<String>,
    pub scope: Option<String>,
    pub driver_number: Option<u32>,
    pub lap_number: Option<u32>,
    pub message: Option<String>,
}

/// Messages in time order with exact repeats removed. Text is left
/// untranslated; translation happens when messages enter the sequence log.
pub fn normalize(raw: Vec<RawRaceControlMessage>) -> Vec<RawRaceControl> {
    let mut messages: Vec<RawRaceControl> = raw
        .into_iter()
        .filter_map(|r| {
            let message = r.message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty())?;
            Some(RawRaceControl {
                at: timestamp(&r.date)?,
                category_hint: r.category,
                flag: r.flag.filter(|f| !f.is_empty()),
                scope: r.scope,
                car: car(r.driver_number),
                lap: r.lap_number,
                message,
            })
        })
        .collect();
    // Stable, so same-instant messages keep upstream order.
    messages.sort_by_key(|m| m.at);
    messages.dedup();
    messages
}
