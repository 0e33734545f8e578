//! Decoded recording, as handed to JSON serialization.
//!
//! Optional content is omitted from the output rather than written as
//! `null`: a lead that was not recorded has no key in `samples`, and a file
//! without an `info` block has no `info` key.

use serde::Serialize;

use crate::block::{FormatBlock, InfoBlock, Lead};

/// Per-lead sample arrays.  Only leads present in the file are populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EcgSamples {
    #[serde(rename = "leadI", skip_serializing_if = "Option::is_none")]
    pub lead_i: Option<Vec<i16>>,
    #[serde(rename = "leadII", skip_serializing_if = "Option::is_none")]
    pub lead_ii: Option<Vec<i16>>,
    #[serde(rename = "leadIII", skip_serializing_if = "Option::is_none")]
    pub lead_iii: Option<Vec<i16>>,
    #[serde(rename = "aVR", skip_serializing_if = "Option::is_none")]
    pub avr: Option<Vec<i16>>,
    #[serde(rename = "aVL", skip_serializing_if = "Option::is_none")]
    pub avl: Option<Vec<i16>>,
    #[serde(rename = "aVF", skip_serializing_if = "Option::is_none")]
    pub avf: Option<Vec<i16>>,
}

impl EcgSamples {
    pub fn get(&self, lead: Lead) -> Option<&[i16]> {
        self.slot(lead).as_deref()
    }

    pub fn set(&mut self, lead: Lead, samples: Vec<i16>) {
        *self.slot_mut(lead) = Some(samples);
    }

    /// Leads that carry data, in canonical order.
    pub fn leads(&self) -> Vec<Lead> {
        Lead::ALL.into_iter().filter(|l| self.get(*l).is_some()).collect()
    }

    fn slot(&self, lead: Lead) -> &Option<Vec<i16>> {
        match lead {
            Lead::I => &self.lead_i,
            Lead::II => &self.lead_ii,
            Lead::III => &self.lead_iii,
            Lead::AVR => &self.avr,
            Lead::AVL => &self.avl,
            Lead::AVF => &self.avf,
        }
    }

    fn slot_mut(&mut self, lead: Lead) -> &mut Option<Vec<i16>> {
        match lead {
            Lead::I => &mut self.lead_i,
            Lead::II => &mut self.lead_ii,
            Lead::III => &mut self.lead_iii,
            Lead::AVR => &mut self.avr,
            Lead::AVL => &mut self.avl,
            Lead::AVF => &mut self.avf,
        }
    }
}

/// Text view of an [`InfoBlock`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingInfo {
    pub date_recorded: String,
    pub recording_uuid: String,
    pub phone_udid: String,
    pub phone_model: String,
    pub recorder_software: String,
    pub recorder_hardware: String,
    pub location: String,
}

/// Decode one fixed-width slot: cut at the first NUL, replace invalid UTF-8,
/// trim surrounding whitespace.
pub fn slot_text(slot: &[u8]) -> String {
    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    String::from_utf8_lossy(&slot[..end]).trim().to_string()
}

impl From<&InfoBlock> for RecordingInfo {
    fn from(b: &InfoBlock) -> Self {
        RecordingInfo {
            date_recorded:     slot_text(&b.date_recorded),
            recording_uuid:    slot_text(&b.recording_uuid),
            phone_udid:        slot_text(&b.phone_udid),
            phone_model:       slot_text(&b.phone_model),
            recorder_software: slot_text(&b.recorder_software),
            recorder_hardware: slot_text(&b.recorder_hardware),
            location:          slot_text(&b.location),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcgData {
    pub frequency: f32,
    pub mains_frequency: u32,
    pub gain: f32,
    pub samples: EcgSamples,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<RecordingInfo>,
}

impl EcgData {
    pub fn new(fmt: &FormatBlock, samples: EcgSamples, info: Option<&InfoBlock>) -> Self {
        Self {
            frequency: fmt.frequency as f32,
            mains_frequency: fmt.mains_frequency(),
            gain: fmt.gain(),
            samples,
            info: info.map(RecordingInfo::from),
        }
    }

    /// Samples of `lead` scaled to millivolts with the recording's gain.
    pub fn millivolts(&self, lead: Lead) -> Option<Vec<f32>> {
        self.samples.get(lead).map(|s| calc_millivolts(s, self.gain))
    }

    /// Recording length in seconds, from Lead I.
    pub fn duration_secs(&self) -> Option<f32> {
        let n = self.samples.get(Lead::I)?.len();
        (self.frequency > 0.0).then(|| n as f32 / self.frequency)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

pub fn calc_millivolts(data: &[i16], scale: f32) -> Vec<f32> {
    data.iter().map(|&s| s as f32 / scale).collect()
}
