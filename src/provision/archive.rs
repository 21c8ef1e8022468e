use crate::error::BootstrapError;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Unpacks a `.tar.gz` archive into `target_dir` on the blocking pool
pub(crate) async fn extract_tar_gz(archive: &Path, target_dir: &Path) -> Result<(), BootstrapError> {
    let archive_path = archive.to_path_buf();
    let target = target_dir.to_path_buf();

    let unpacked = tokio::task::spawn_blocking(move || unpack(&archive_path, &target))
        .await
        .map_err(std::io::Error::other)
        .and_then(|result| result);

    unpacked.map_err(|source| BootstrapError::Extract {
        archive: archive.to_path_buf(),
        source,
    })
}

fn unpack(archive: &Path, target_dir: &Path) -> std::io::Result<()> {
    debug!(archive = %archive.display(), target = %target_dir.display(), "Extracting");
    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    tar.set_preserve_permissions(true);
    tar.unpack(target_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fn build_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[tokio::test]
    async fn test_extract_tar_gz() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("mediamtx_darwin_arm64.tar.gz");
        build_archive(
            &archive,
            &[
                ("mediamtx", b"#!/bin/sh\nexit 0\n"),
                ("mediamtx.yml", b"logLevel: info\n"),
                ("LICENSE", b"MIT\n"),
            ],
        );

        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        extract_tar_gz(&archive, &out).await.unwrap();

        assert_eq!(
            std::fs::read(out.join("mediamtx")).unwrap(),
            b"#!/bin/sh\nexit 0\n"
        );
        assert!(out.join("mediamtx.yml").is_file());
        assert!(out.join("LICENSE").is_file());
    }

    #[tokio::test]
    async fn test_extract_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.tar.gz");
        std::fs::write(&archive, b"<html>Not Found</html>").unwrap();

        let error = extract_tar_gz(&archive, dir.path()).await.unwrap_err();
        match error {
            BootstrapError::Extract { archive: path, .. } => assert_eq!(path, archive),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let error = extract_tar_gz(&dir.path().join("absent.tar.gz"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(error, BootstrapError::Extract { .. }));
        assert_eq!(error.exit_code(), 1);
    }
}
