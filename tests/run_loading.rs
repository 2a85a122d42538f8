use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

use rustymesa::loader::{open_run, ContentSource, FsSource, RunLoader, ZipSource};
use rustymesa::model::RunDoc;

struct MemSource {
    files: HashMap<String, String>,
}

impl ContentSource for MemSource {
    fn read_to_string(&mut self, path: &Utf8Path) -> Result<String> {
        self.files
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("not found: {}", path))
    }
    fn list_dir(&mut self, _path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
        Ok(vec![])
    }
}

const HISTORY_JSON: &str = r#"{
  "series": {
    "star_age": [1e6, 2e6, 3e6],
    "star_mass": [1.0, 1.0, 0.99],
    "log_Teff": [3.76, 3.75, 3.74],
    "log_L": [0.0, 0.05, 0.1],
    "he_core_radius": [0.0, 0.0, 0.1]
  },
  "model_numbers": [1, 3]
}"#;

fn profile_json(model: u32) -> String {
    format!(
        r#"{{
  "model_number": {model},
  "columns": {{
    "radius": [0.9, 0.5, 0.1],
    "h1": [0.7, 0.7, 0.3],
    "he4": [0.28, 0.28, 0.68]
  }}
}}"#
    )
}

fn mem_loader() -> RunLoader<MemSource> {
    let mut files = HashMap::new();
    files.insert("run/history.json".to_string(), HISTORY_JSON.to_string());
    files.insert("run/profile1.json".to_string(), profile_json(1));
    files.insert("run/profile3.json".to_string(), profile_json(3));
    RunLoader::new("run", MemSource { files })
}

#[test]
fn loads_history_and_profiles() -> Result<()> {
    let mut loader = mem_loader();
    let run = loader.load_run()?;
    assert_eq!(run.history.num_models(), 3);
    assert_eq!(run.history.model_numbers_available, vec![1, 3]);
    assert_eq!(run.profiles.len(), 2);
    let p3 = run.profile(3).expect("profile 3 loaded");
    assert_eq!(p3.age, 3e6);
    assert_eq!(p3.initial_mass, 1.0);
    assert_eq!(p3.num_zones(), 3);
    assert_eq!(p3.column("h1"), Some([0.7, 0.7, 0.3].as_slice()));
    Ok(())
}

#[test]
fn ragged_history_series_is_rejected() {
    let mut files = HashMap::new();
    files.insert(
        "run/history.json".to_string(),
        r#"{"series": {"star_age": [1.0, 2.0], "star_mass": [1.0],
             "log_Teff": [3.7, 3.7], "log_L": [0.0, 0.1]},
            "model_numbers": []}"#
            .to_string(),
    );
    let mut loader = RunLoader::new("run", MemSource { files });
    let err = loader.load_history().unwrap_err();
    assert!(err.to_string().contains("star_mass"), "{err:#}");
}

#[test]
fn missing_required_series_is_rejected() {
    let mut files = HashMap::new();
    files.insert(
        "run/history.json".to_string(),
        r#"{"series": {"star_age": [1.0], "star_mass": [1.0], "log_Teff": [3.7]},
            "model_numbers": [1]}"#
            .to_string(),
    );
    let mut loader = RunLoader::new("run", MemSource { files });
    let err = loader.load_history().unwrap_err();
    assert!(err.to_string().contains("log_L"), "{err:#}");
}

#[test]
fn out_of_range_model_numbers_are_rejected() {
    let mut files = HashMap::new();
    files.insert(
        "run/history.json".to_string(),
        r#"{"series": {"star_age": [1.0, 2.0], "star_mass": [1.0, 1.0],
             "log_Teff": [3.7, 3.7], "log_L": [0.0, 0.1]},
            "model_numbers": [1, 5]}"#
            .to_string(),
    );
    let mut loader = RunLoader::new("run", MemSource { files });
    assert!(loader.load_history().is_err());
}

#[test]
fn profile_with_wrong_model_number_is_rejected() {
    let mut files = HashMap::new();
    files.insert("run/history.json".to_string(), HISTORY_JSON.to_string());
    files.insert("run/profile1.json".to_string(), profile_json(2));
    let mut loader = RunLoader::new("run", MemSource { files });
    let history = loader.load_history().unwrap();
    assert!(loader.load_profile(&history, 1).is_err());
}

#[test]
fn fs_and_zip_sources_load_identical_runs() -> Result<()> {
    // Directory layout on disk.
    let dir = tempfile::tempdir()?;
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    std::fs::write(root.join("history.json"), HISTORY_JSON)?;
    std::fs::write(root.join("profile1.json"), profile_json(1))?;
    std::fs::write(root.join("profile3.json"), profile_json(3))?;
    let mut fs_loader = RunLoader::new(&root, FsSource);
    let from_fs = fs_loader.load_run()?;

    // Same files zipped.
    let mut buf = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buf);
        let options = zip::write::FileOptions::default();
        writer.start_file("history.json", options)?;
        writer.write_all(HISTORY_JSON.as_bytes())?;
        writer.start_file("profile1.json", options)?;
        writer.write_all(profile_json(1).as_bytes())?;
        writer.start_file("profile3.json", options)?;
        writer.write_all(profile_json(3).as_bytes())?;
        writer.finish()?;
    }
    buf.set_position(0);
    let mut zip_loader = RunLoader::new("", ZipSource::new(buf)?);
    let from_zip = zip_loader.load_run()?;

    assert_eq!(from_fs, from_zip);
    Ok(())
}

#[test]
fn open_run_dispatches_on_directory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    std::fs::write(root.join("history.json"), HISTORY_JSON)?;
    std::fs::write(root.join("profile1.json"), profile_json(1))?;
    std::fs::write(root.join("profile3.json"), profile_json(3))?;
    let run = open_run(&root)?;
    assert_eq!(run.profiles.len(), 2);
    Ok(())
}

#[test]
fn binary_cache_round_trips() -> Result<()> {
    let mut loader = mem_loader();
    let doc = loader.load_run()?;

    let temp_file = NamedTempFile::new()?;
    doc.save_to_binary(temp_file.path())?;
    let loaded = RunDoc::load_from_binary(temp_file.path())?;
    assert_eq!(loaded, doc);
    Ok(())
}

#[test]
fn binary_cache_rejects_foreign_files() -> Result<()> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(b"PNG\x89 definitely not a run cache")?;
    temp_file.flush()?;
    assert!(RunDoc::load_from_binary(temp_file.path()).is_err());
    Ok(())
}
