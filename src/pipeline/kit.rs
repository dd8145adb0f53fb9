// The sample library: which file and color each instrument uses.
// Read once at startup from <kit_dir>/kit.json; anything the file leaves out
// falls back to <kit_dir>/<instrument>.wav and the built-in palette.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::shared::Instrument;

const KIT_FILE: &str = "kit.json";

#[derive(Debug, Error)]
pub enum KitError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("bad color {value:?} for {instrument:?}, expected #rrggbb")]
    Color { instrument: Instrument, value: String },
}

// what kit.json looks like on disk; every field is optional
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitFile {
    #[serde(default)]
    pub instruments: BTreeMap<Instrument, InstrumentOverride>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstrumentOverride {
    pub sample: Option<String>, // relative to the kit dir
    pub color: Option<String>,  // "#rrggbb"
    pub gain: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KitEntry {
    pub instrument: Instrument,
    pub sample_path: PathBuf,
    pub color: (u8, u8, u8),
    pub gain: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Kit {
    pub dir: PathBuf,
    entries: Vec<KitEntry>, // indexed by Instrument::index()
}

impl Kit {
    pub fn defaults(dir: &Path) -> Self {
        let entries = Instrument::ALL
            .iter()
            .map(|&instrument| KitEntry {
                instrument,
                sample_path: dir.join(format!("{}.wav", instrument.file_stem())),
                color: default_color(instrument),
                gain: 0.8,
            })
            .collect();
        Self {
            dir: dir.to_path_buf(),
            entries,
        }
    }

    /// A missing kit.json is not an error; a broken one is.
    pub fn load(dir: &Path) -> Result<Self, KitError> {
        let path = dir.join(KIT_FILE);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults(dir)),
            Err(source) => return Err(KitError::Io { path, source }),
        };
        let file: KitFile =
            serde_json::from_str(&data).map_err(|source| KitError::Parse { path, source })?;
        Self::from_file(dir, &file)
    }

    pub fn from_file(dir: &Path, file: &KitFile) -> Result<Self, KitError> {
        let mut kit = Self::defaults(dir);
        for (&instrument, over) in &file.instruments {
            let entry = &mut kit.entries[instrument.index()];
            if let Some(sample) = &over.sample {
                entry.sample_path = dir.join(sample);
            }
            if let Some(value) = &over.color {
                entry.color = parse_hex_color(value).ok_or_else(|| KitError::Color {
                    instrument,
                    value: value.clone(),
                })?;
            }
            if let Some(gain) = over.gain {
                entry.gain = gain.clamp(0.0, 2.0);
            }
        }
        Ok(kit)
    }

    pub fn entry(&self, instrument: Instrument) -> &KitEntry {
        &self.entries[instrument.index()]
    }

    pub fn entries(&self) -> &[KitEntry] {
        &self.entries
    }
}

fn default_color(instrument: Instrument) -> (u8, u8, u8) {
    match instrument {
        Instrument::Kick => (255, 95, 95),
        Instrument::Snare => (255, 175, 80),
        Instrument::ClosedHat => (240, 230, 90),
        Instrument::OpenHat => (150, 230, 100),
        Instrument::Clap => (80, 220, 200),
        Instrument::Tom => (100, 170, 255),
        Instrument::Rim => (180, 130, 255),
        Instrument::Cowbell => (255, 130, 210),
    }
}

pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    // from_str_radix alone would also take a sign, as in "+f"
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
