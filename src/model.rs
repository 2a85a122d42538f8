use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// SampleSeries
// ────────────────────────────────────────────────────────────────────────────

/// One scalar quantity sampled once per model number.
///
/// Model numbers are 1-based and contiguous; index `model - 1` into the
/// backing array. Every series of one run has the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries(Vec<f64>);

impl SampleSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Sample for a 1-based model number.
    pub fn value_at(&self, model: u32) -> Option<f64> {
        if model == 0 {
            return None;
        }
        self.0.get(model as usize - 1).copied()
    }

    pub fn first(&self) -> Option<f64> {
        self.0.first().copied()
    }

    /// Largest finite sample, ignoring NaN.
    pub fn max_finite(&self) -> Option<f64> {
        self.0
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}

impl From<Vec<f64>> for SampleSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// History
// ────────────────────────────────────────────────────────────────────────────

/// Full time series of one simulation run: an ordered map of named series
/// plus the model numbers for which a profile snapshot exists.
///
/// Series order preserves the export order, which keeps CLI output stable
/// across runs. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub series: IndexMap<String, SampleSeries>,
    /// Sorted, possibly gapped subset of 1..=num_models.
    pub model_numbers_available: Vec<u32>,
}

impl History {
    pub fn get(&self, name: &str) -> Option<&SampleSeries> {
        self.series.get(name)
    }

    /// Number of models in the run (length of every series).
    pub fn num_models(&self) -> usize {
        self.series.first().map(|(_, s)| s.len()).unwrap_or(0)
    }

    /// Age (years) of a 1-based model number.
    pub fn age_of(&self, model: u32) -> Option<f64> {
        self.get("star_age")?.value_at(model)
    }

    /// Initial stellar mass (Msun), taken from the first mass sample.
    pub fn initial_mass(&self) -> Option<f64> {
        self.get("star_mass")?.first()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profile
// ────────────────────────────────────────────────────────────────────────────

/// One interior snapshot: radially varying arrays at a single model number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub model_number: u32,
    /// Age (years), copied from the history at load time.
    pub age: f64,
    /// Initial stellar mass (Msun), copied from the history at load time.
    pub initial_mass: f64,
    /// Ordered map of per-zone arrays, all the same length.
    pub columns: IndexMap<String, Vec<f64>>,
}

impl Profile {
    /// 0-based index of this snapshot into any history series.
    pub fn index(&self) -> usize {
        self.model_number.saturating_sub(1) as usize
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn num_zones(&self) -> usize {
        self.columns.first().map(|(_, v)| v.len()).unwrap_or(0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RunDoc – binary serialization wrapper
// ────────────────────────────────────────────────────────────────────────────

const MAGIC: &[u8; 9] = b"RUSTYMESA";
const VERSION: u32 = 1;

/// A fully loaded run, cacheable as a single binary file so repeated viewer
/// launches skip the JSON ingestion entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDoc {
    pub history: History,
    /// Profiles sorted by model number, matching `model_numbers_available`.
    pub profiles: Vec<Profile>,
}

impl RunDoc {
    /// Profile for a model number, if one was exported.
    pub fn profile(&self, model: u32) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.model_number == model)
    }

    /// Save to a binary cache file with magic bytes and versioning.
    pub fn save_to_binary<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        std::io::Write::write_all(&mut writer, MAGIC)?;
        std::io::Write::write_all(&mut writer, &VERSION.to_le_bytes())?;
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())?;
        Ok(())
    }

    /// Load from a binary cache file, checking magic bytes and version.
    pub fn load_from_binary<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        let mut magic = [0u8; 9];
        std::io::Read::read_exact(&mut reader, &mut magic)?;
        if &magic != MAGIC {
            anyhow::bail!("Invalid magic bytes: expected 'RUSTYMESA'");
        }
        let mut version_bytes = [0u8; 4];
        std::io::Read::read_exact(&mut reader, &mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != VERSION {
            anyhow::bail!("Unsupported cache version: {}", version);
        }
        let doc: RunDoc =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())?;
        Ok(doc)
    }
}
