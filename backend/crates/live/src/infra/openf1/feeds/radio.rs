use super::{car, timestamp};
use crate::domain::entity::RadioMessage;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Deserialize)]
pub struct RawRadio {
    pub driver_number: Option<u32>,
    pub recording_url: Option<String>,
    pub date: Option<String>,
}

/// The newest `window` clips, oldest first.
pub fn normalize(raw: Vec<RawRadio>, window: usize) -> Vec<RadioMessage> {
    let mut clips: Vec<RadioMessage> = raw
        .into_iter()
        .filter_map(|r| {
            Some(RadioMessage {
                car: car(r.driver_number)?,
                at: timestamp(&r.date)?,
                recording_url: r.recording_url.filter(|url| !url.is_empty())?,
            })
        })
        .collect();
    clips.sort_by_key(|c| c.at);

    let mut seen = HashSet::new();
    clips.retain(|c| seen.insert(c.recording_url.clone()));
    let skip = clips.len().saturating_sub(window);
    clips.split_off(skip)
}
