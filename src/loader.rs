//! Run-data ingestion.
//!
//! The simulation's native output format is a collaborator concern; runs
//! arrive as plain JSON exports of named numeric arrays. A run is either a
//! directory (`history.json` plus `profile<N>.json` files) or a `.zip`
//! archive with the same layout.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Deserialize;
use std::io::{Read, Seek};
use walkdir::WalkDir;

use crate::model::{History, Profile, RunDoc, SampleSeries};

/// Trait for abstracting file I/O (filesystem vs. ZIP source).
pub trait ContentSource {
    /// Read a file at the given logical path and return its content as a string.
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String>;
    /// List files below a directory path, returning full paths.
    fn list_dir(&mut self, path: &Utf8Path) -> Result<Vec<Utf8PathBuf>>;
}

/// Reads files directly from the local filesystem.
pub struct FsSource;

impl ContentSource for FsSource {
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String> {
        std::fs::read_to_string(path.as_str()).with_context(|| format!("Failed to read {}", path))
    }

    fn list_dir(&mut self, path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(path.as_std_path()).max_depth(1) {
            let entry = entry.with_context(|| format!("Read dir {}", path))?;
            if entry.file_type().is_file() {
                let p = Utf8PathBuf::from_path_buf(entry.into_path())
                    .map_err(|_| anyhow::anyhow!("Non-UTF8 path in {}", path))?;
                files.push(p);
            }
        }
        Ok(files)
    }
}

/// Reads files from a ZIP archive (zipped run exports).
pub struct ZipSource<R: Read + Seek> {
    zip: zip::ZipArchive<R>,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        let zip = zip::ZipArchive::new(reader).context("Failed to open zip archive")?;
        Ok(Self { zip })
    }
}

impl<R: Read + Seek> ContentSource for ZipSource<R> {
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String> {
        let p = path
            .as_str()
            .trim_start_matches("./")
            .trim_start_matches('/')
            .to_string();
        let mut f = self
            .zip
            .by_name(&p)
            .with_context(|| format!("File {} not found in zip", p))?;
        let mut s = String::new();
        f.read_to_string(&mut s)
            .with_context(|| format!("Failed to read {} from zip", p))?;
        Ok(s)
    }

    fn list_dir(&mut self, path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        let mut prefix = path
            .as_str()
            .trim_start_matches("./")
            .trim_start_matches('/')
            .to_string();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        let mut files = Vec::new();
        for i in 0..self.zip.len() {
            let name = self.zip.by_index(i)?.name().to_string();
            if name.starts_with(&prefix) && !name.ends_with('/') {
                files.push(Utf8PathBuf::from(name));
            }
        }
        Ok(files)
    }
}

#[derive(Deserialize)]
struct HistoryFile {
    series: IndexMap<String, Vec<f64>>,
    #[serde(default)]
    model_numbers: Vec<u32>,
}

#[derive(Deserialize)]
struct ProfileFile {
    model_number: u32,
    columns: IndexMap<String, Vec<f64>>,
}

/// Series every history export must carry for the viewer to work.
const REQUIRED_SERIES: [&str; 4] = ["star_age", "star_mass", "log_Teff", "log_L"];

/// Loads a run through a [`ContentSource`], so the same code reads from a
/// directory ([`FsSource`]) or a zipped export ([`ZipSource`]).
pub struct RunLoader<S: ContentSource> {
    root: Utf8PathBuf,
    source: S,
}

impl<S: ContentSource> RunLoader<S> {
    pub fn new(root: impl AsRef<Utf8Path>, source: S) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            source,
        }
    }

    /// Load and validate `history.json`.
    pub fn load_history(&mut self) -> Result<History> {
        let path = self.root.join("history.json");
        let text = self.source.read_to_string(&path)?;
        let file: HistoryFile =
            serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path))?;
        let history = History {
            series: file
                .series
                .into_iter()
                .map(|(name, values)| (name, SampleSeries::new(values)))
                .collect(),
            model_numbers_available: file.model_numbers,
        };
        validate_history(&history)?;
        Ok(history)
    }

    /// Load one profile snapshot, picking up age and initial mass from the
    /// already-loaded history.
    pub fn load_profile(&mut self, history: &History, model: u32) -> Result<Profile> {
        let path = self.root.join(format!("profile{}.json", model));
        let text = self.source.read_to_string(&path)?;
        parse_profile(&text, model, history).with_context(|| format!("Failed to parse {}", path))
    }

    /// Model numbers with a profile file present, sorted. Falls back to the
    /// history's availability list for sources that cannot list files.
    pub fn available_profiles(&mut self, history: &History) -> Result<Vec<u32>> {
        let listed = self.source.list_dir(&self.root)?;
        let mut models: Vec<u32> = listed
            .iter()
            .filter_map(|p| {
                let name = p.file_name()?;
                let digits = name.strip_prefix("profile")?.strip_suffix(".json")?;
                digits.parse().ok()
            })
            .collect();
        if models.is_empty() {
            models = history.model_numbers_available.clone();
        }
        models.sort_unstable();
        models.dedup();
        Ok(models)
    }

    /// Load the whole run: history plus every available profile. File reads
    /// stay sequential (the source may be a zip stream); JSON parsing of the
    /// profiles fans out across threads.
    pub fn load_run(&mut self) -> Result<RunDoc> {
        let history = self.load_history()?;
        let models = self.available_profiles(&history)?;
        let mut texts = Vec::with_capacity(models.len());
        for &model in &models {
            let path = self.root.join(format!("profile{}.json", model));
            let text = self
                .source
                .read_to_string(&path)
                .with_context(|| format!("Failed to read profile for model {}", model))?;
            texts.push((model, text));
        }
        let profiles: Vec<Profile> = texts
            .par_iter()
            .map(|(model, text)| {
                parse_profile(text, *model, &history)
                    .with_context(|| format!("Failed to parse profile for model {}", model))
            })
            .collect::<Result<_>>()?;
        Ok(RunDoc { history, profiles })
    }
}

/// Open a run at `path`: a `.zip` archive or a directory.
pub fn open_run(path: &Utf8Path) -> Result<RunDoc> {
    if path.extension() == Some("zip") {
        let file =
            std::fs::File::open(path.as_std_path()).with_context(|| format!("Open {}", path))?;
        let reader = std::io::BufReader::new(file);
        let mut loader = RunLoader::new("", ZipSource::new(reader)?);
        loader.load_run()
    } else {
        let mut loader = RunLoader::new(path, FsSource);
        loader.load_run()
    }
}

fn parse_profile(text: &str, model: u32, history: &History) -> Result<Profile> {
    let file: ProfileFile = serde_json::from_str(text)?;
    anyhow::ensure!(
        file.model_number == model,
        "profile file says model {} but was loaded as model {}",
        file.model_number,
        model
    );
    let mut lengths = file.columns.values().map(|v| v.len());
    if let Some(first) = lengths.next() {
        anyhow::ensure!(
            lengths.all(|len| len == first),
            "profile columns disagree in length"
        );
    }
    Ok(Profile {
        model_number: model,
        age: history.age_of(model).unwrap_or(f64::NAN),
        initial_mass: history.initial_mass().unwrap_or(f64::NAN),
        columns: file.columns,
    })
}

fn validate_history(history: &History) -> Result<()> {
    anyhow::ensure!(!history.series.is_empty(), "history has no series");
    let num_models = history.num_models();
    anyhow::ensure!(num_models > 0, "history series are empty");
    for (name, series) in &history.series {
        anyhow::ensure!(
            series.len() == num_models,
            "series '{}' has {} samples, expected {}",
            name,
            series.len(),
            num_models
        );
    }
    for name in REQUIRED_SERIES {
        anyhow::ensure!(
            history.get(name).is_some(),
            "history is missing required series '{}'",
            name
        );
    }
    let mut last = 0u32;
    for &model in &history.model_numbers_available {
        anyhow::ensure!(
            model > last && model as usize <= num_models,
            "model_numbers must be sorted, unique, and within 1..={}",
            num_models
        );
        last = model;
    }
    Ok(())
}
