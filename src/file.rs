// src/file.rs

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::{PipelineError, Result};

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> PipelineError + '_ {
    move |source| PipelineError::Io { path: path.to_path_buf(), source }
}

/// Ensure parent dir exists; create/truncate file.
fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent).map_err(io_err(path))?;
        }
    }
    let file = File::create(path).map_err(io_err(path))?;
    Ok(BufWriter::new(file))
}

/// Pretty-printed UTF-8 JSON, non-ASCII kept as is.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut out = create(path)?;
    serde_json::to_writer_pretty(&mut out, value)
        .map_err(|source| PipelineError::Json { path: path.to_path_buf(), source })?;
    out.flush().map_err(io_err(path))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(io_err(path))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| PipelineError::Json { path: path.to_path_buf(), source })
}

/// One CSV row per item, header from the field names. `headers` is written
/// on its own when there are no rows, so an empty table still says what it is.
pub fn write_csv<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    let csv_err = |source| PipelineError::Csv { path: path.to_path_buf(), source };

    let mut w = csv::Writer::from_writer(create(path)?);
    if rows.is_empty() {
        w.write_record(headers).map_err(csv_err)?;
    }
    for row in rows {
        w.serialize(row).map_err(csv_err)?;
    }
    w.flush().map_err(io_err(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Pair {
        a: u32,
        b: Option<u32>,
    }

    fn tmp_dir(name: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("sfc_file_{}", name));
        let _ = fs::remove_dir_all(&p);
        p
    }

    #[test]
    fn csv_writes_header_even_when_empty() {
        let dir = tmp_dir("csv_empty");
        let path = dir.join("nested").join("t.csv");
        write_csv::<Pair>(&path, &["a", "b"], &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n");

        write_csv(&path, &["a", "b"], &[Pair { a: 1, b: None }, Pair { a: 2, b: Some(3) }]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,\n2,3\n");
    }

    #[test]
    fn json_keeps_unicode() {
        let dir = tmp_dir("json");
        let path = dir.join("x.json");
        write_json(&path, &vec!["證監會"]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("證監會"));
        let back: Vec<String> = read_json(&path).unwrap();
        assert_eq!(back, vec!["證監會"]);
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = tmp_dir("ensure");
        ensure_directory(&dir).unwrap();
        let f = dir.join("plain");
        fs::write(&f, "x").unwrap();
        assert!(ensure_directory(&f).is_err());
    }
}
