use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

fn is_gzip(path: &Path) -> bool {
    path.extension().map(|ext| ext == "gz").unwrap_or(false)
}

/// Write a value as pretty JSON, gzip-compressed if the path ends in `.gz`.
pub fn write_serialized<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = BufWriter::new(File::create(path)?);
    if is_gzip(path) {
        let mut encoder = GzEncoder::new(file, Compression::best());
        serde_json::to_writer_pretty(&mut encoder, value)?;
        encoder.finish()?.flush()
    } else {
        let mut file = file;
        serde_json::to_writer_pretty(&mut file, value)?;
        file.flush()
    }
}

pub fn read_serialized<T: DeserializeOwned>(path: &Path) -> io::Result<T> {
    let file = BufReader::new(File::open(path)?);
    let value = if is_gzip(path) {
        serde_json::from_reader(GzDecoder::new(file))?
    } else {
        serde_json::from_reader(file)?
    };
    Ok(value)
}

/// Hex SHA-1 digest of a file's contents.
pub fn file_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; 8192];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_serialized_round_trip_with_and_without_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let mut value = BTreeMap::new();
        value.insert("alice".to_string(), 2.5);

        for name in &["out/report.json", "out/report.json.gz"] {
            let path = dir.path().join(name);
            write_serialized(&path, &value).unwrap();
            let read: BTreeMap<String, f64> = read_serialized(&path).unwrap();
            assert_eq!(read, value);
        }
    }

    #[test]
    fn test_file_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.csv");
        std::fs::write(&path, "abc").unwrap();

        assert_eq!(
            file_hash(&path).unwrap(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }
}
