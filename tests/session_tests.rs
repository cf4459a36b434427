//! Session, history and metadata tests

use b64sniff::naming::file_extension;
use b64sniff::{FileRecord, MimeType, Operation, Options, Session};
use rstest::*;
use std::fs;
use tempfile::TempDir;

#[fixture]
fn session() -> Session {
    Session::default()
}

/// Writes `contents` to `name` inside a fresh temporary directory.
fn temp_file(name: &str, contents: &[u8]) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn encode_path(session: &Session, path: &std::path::Path) -> FileRecord {
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    let declared = MimeType::declared_by_extension(file_extension(&name));
    session
        .encode_file(&name, fs::read(path).unwrap(), declared)
        .unwrap()
}

#[rstest]
fn test_extension_is_trusted_over_content(session: Session) {
    let (_dir, path) = temp_file("report.csv", b"%PDF-1.4 not really");
    let record = encode_path(&session, &path);
    assert_eq!(record.mime, MimeType::CSV);
}

#[rstest]
fn test_unknown_extension_falls_back_to_sniffing(session: Session) {
    let (_dir, path) = temp_file("upload.dat", b"%PDF-1.4\n%%EOF");
    let record = encode_path(&session, &path);
    assert_eq!(record.mime, MimeType::PDF);
    assert!(record.data_url.starts_with("data:application/pdf;base64,"));
}

#[rstest]
fn test_file_survives_encode_decode(session: Session) {
    let contents: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
    let (dir, path) = temp_file("blob.bin", &contents);

    let encoded = encode_path(&session, &path);
    let decoded = session.decode_text(&encoded.data_url).unwrap();
    assert_eq!(decoded.bytes, contents);
    assert_eq!(decoded.mime, MimeType::OCTET_STREAM);
    assert_eq!(decoded.name, "decoded-file.bin");

    let out = dir.path().join(&decoded.name);
    fs::write(&out, &decoded.bytes).unwrap();
    assert_eq!(fs::read(&out).unwrap(), contents);
}

#[rstest]
fn test_history_keeps_ten_newest(session: Session) {
    for i in 0..12 {
        session
            .encode_file(&format!("f{i}.txt"), vec![b'a'; i], None)
            .unwrap();
    }
    let history = session.history();
    assert_eq!(history.len(), 10);
    assert_eq!(history[0].file_name, "f11.txt");
    assert_eq!(history[9].file_name, "f2.txt");
    assert!(history.iter().all(|e| e.operation == Operation::Encode));
}

#[test]
fn test_options_file_controls_session() {
    let (_dir, path) = temp_file("options.json", br#"{"history_capacity": 1, "chunk_size": 6}"#);
    let session = Session::new(Options::load(&path).unwrap());
    assert_eq!(session.codec().chunk_size(), 6);

    session.decode_text("YQ==").unwrap();
    session.decode_text("Yg==").unwrap();
    let history = session.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].size, 1);
}

#[rstest]
fn test_record_metadata(session: Session) {
    let record = session
        .decode_text("data:application/pdf;base64,JVBERi0xLjQKL1R5cGUgL1BhZ2UgCg==")
        .unwrap();
    let metadata = record.metadata();
    assert_eq!(metadata.page_count, Some(1));
    assert_eq!(metadata.sha256.len(), 64);
}

#[rstest]
fn test_record_serializes_without_bytes(session: Session) {
    let record = session.encode_file("a.txt", b"hi".to_vec(), None).unwrap();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["mime"], "text/plain");
    assert_eq!(json["data_url"], "data:text/plain;base64,aGk=");
    assert!(json.get("bytes").is_none());
}
