//! Download and unpacking of the vendor documentation archive

use flate2::read::GzDecoder;
use opdocs_config::ArchiveConfig;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("download of {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} failed with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> FetchError + '_ {
    move |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Make sure `<input>/<subdir>` exists, downloading and unpacking the archive as needed.
/// Returns the corpus directory.
pub fn ensure_corpus(
    archive: &ArchiveConfig,
    input: &Path,
    download: &Path,
) -> Result<PathBuf, FetchError> {
    let corpus_dir = input.join(&archive.subdir);
    if corpus_dir.is_dir() {
        tracing::info!(path = %corpus_dir.display(), "using extracted documentation");
        return Ok(corpus_dir);
    }

    let archive_path = download.join(&archive.name);
    if !archive_path.is_file() {
        download_archive(&archive.url, download, &archive_path)?;
    }
    extract_archive(&archive_path, input, &corpus_dir)?;
    Ok(corpus_dir)
}

fn download_archive(url: &str, folder: &Path, target: &Path) -> Result<(), FetchError> {
    if !folder.exists() {
        tracing::info!(path = %folder.display(), "creating download folder");
        fs::create_dir_all(folder).map_err(io_error(folder))?;
    } else if !folder.is_dir() {
        return Err(FetchError::NotADirectory(folder.to_path_buf()));
    }

    tracing::info!(url, "downloading archive");
    let http_error = |source| FetchError::Http {
        url: url.to_string(),
        source,
    };
    // The archive is tens of megabytes; the default request timeout is too short.
    let client = reqwest::blocking::Client::builder()
        .timeout(None)
        .build()
        .map_err(http_error)?;
    let mut response = client.get(url).send().map_err(http_error)?;
    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    let partial = target.with_extension("part");
    let mut file = File::create(&partial).map_err(io_error(&partial))?;
    response.copy_to(&mut file).map_err(http_error)?;
    drop(file);
    fs::rename(&partial, target).map_err(io_error(target))?;
    tracing::info!(path = %target.display(), "archive downloaded");
    Ok(())
}

/// Unpack `archive` into `input`, first removing stale documents from `corpus_dir`.
pub fn extract_archive(archive: &Path, input: &Path, corpus_dir: &Path) -> Result<(), FetchError> {
    if corpus_dir.is_dir() {
        remove_documents(corpus_dir)?;
    }

    tracing::info!(archive = %archive.display(), into = %input.display(), "extracting archive");
    let file = File::open(archive).map_err(io_error(archive))?;
    let reader: Box<dyn Read> = if is_gzip(archive) {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    tar::Archive::new(reader)
        .unpack(input)
        .map_err(io_error(archive))
}

fn is_gzip(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    name.ends_with(".gz") || name.ends_with(".tgz")
}

fn remove_documents(dir: &Path) -> Result<(), FetchError> {
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        if path.is_dir() {
            remove_documents(&path)?;
        } else if path.extension().is_some_and(|ext| ext == "xml") {
            fs::remove_file(&path).map_err(io_error(&path))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn archive_config(subdir: &str) -> ArchiveConfig {
        ArchiveConfig {
            url: "http://127.0.0.1:9/unreachable.tar.gz".to_string(),
            name: "docs.tar.gz".to_string(),
            subdir: subdir.to_string(),
        }
    }

    fn write_archive(path: &Path, subdir: &str, files: &[(&str, &str)]) {
        let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, format!("{subdir}/{name}"), contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_existing_corpus_is_used_as_is() {
        let input = tempfile::tempdir().unwrap();
        fs::create_dir(input.path().join("docs")).unwrap();
        let download = tempfile::tempdir().unwrap();

        let dir = ensure_corpus(&archive_config("docs"), input.path(), download.path()).unwrap();
        assert_eq!(dir, input.path().join("docs"));
    }

    #[test]
    fn test_cached_archive_is_extracted() {
        let input = tempfile::tempdir().unwrap();
        let download = tempfile::tempdir().unwrap();
        write_archive(
            &download.path().join("docs.tar.gz"),
            "docs",
            &[("add.xml", "<instructionsection/>")],
        );

        let dir = ensure_corpus(&archive_config("docs"), input.path(), download.path()).unwrap();
        assert!(dir.join("add.xml").is_file());
    }

    #[test]
    fn test_extract_removes_stale_documents() {
        let input = tempfile::tempdir().unwrap();
        let corpus = input.path().join("docs");
        fs::create_dir(&corpus).unwrap();
        fs::write(corpus.join("stale.xml"), "<x/>").unwrap();
        fs::write(corpus.join("readme.txt"), "kept").unwrap();

        let download = tempfile::tempdir().unwrap();
        let archive = download.path().join("docs.tar.gz");
        write_archive(&archive, "docs", &[("fresh.xml", "<x/>")]);

        extract_archive(&archive, input.path(), &corpus).unwrap();
        assert!(!corpus.join("stale.xml").exists());
        assert!(corpus.join("fresh.xml").is_file());
        assert!(corpus.join("readme.txt").is_file());
    }

    #[test]
    fn test_download_folder_must_be_a_directory() {
        let input = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let not_a_dir = scratch.path().join("file");
        fs::write(&not_a_dir, "").unwrap();

        let err = ensure_corpus(&archive_config("docs"), input.path(), &not_a_dir).unwrap_err();
        assert!(matches!(err, FetchError::NotADirectory(_)));
    }
}
