//! End-to-end runs over temporary directory trees.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use trainticket_core::{ConfigError, DateField, Error, RunConfig, RunSummary, run};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn xbrl(travel: &str, issue: &str, dep: &str, dst: &str) -> String {
    format!(
        concat!(
            r#"<xbrl xmlns:rai="urn:rai">"#,
            "<rai:TravelDate>{}</rai:TravelDate>",
            "<rai:DateOfIssue>{}</rai:DateOfIssue>",
            "<rai:DepartureStation>{}</rai:DepartureStation>",
            "<rai:DestinationStation>{}</rai:DestinationStation>",
            "</xbrl>"
        ),
        travel, issue, dep, dst
    )
}

fn plain_pdf(travel: &str, dep: &str, dst: &str) -> Vec<u8> {
    format!(
        "%PDF-1.7\n1 0 obj\n<</Type/Metadata>>stream\n{}\nendstream\nendobj\n%%EOF\n",
        xbrl(travel, "2026-02-28", dep, dst)
    )
    .into_bytes()
}

fn embedded_pdf(travel: &str, dep: &str, dst: &str) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(xbrl(travel, "2026-02-28", dep, dst).as_bytes())
        .unwrap();
    let comp = encoder.finish().unwrap();

    let mut pdf = b"%PDF-1.7\r\n".to_vec();
    pdf.extend_from_slice(b"10 0 obj\r\n<</Length 3923>>stream\r\nx\r\nendstream\r\nendobj\r\n");
    pdf.extend_from_slice(b"44 0 obj\r\n<</Filter/FlateDecode/Length 45 0 R/Type/EmbeddedFile>>stream\r\n");
    pdf.extend_from_slice(&comp);
    pdf.extend_from_slice(b"\r\nendstream\r\nendobj\r\n45 0 obj\r\n");
    pdf.extend_from_slice(comp.len().to_string().as_bytes());
    pdf.extend_from_slice(b"\r\nendobj\r\n%%EOF\r\n");
    pdf
}

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
        } else {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Set the "encrypted" flag bit in both headers of `entry`, so the entry can
/// no longer be opened without a password.
fn mark_encrypted(zip: &mut [u8], entry: &str) {
    let u16_at = |data: &[u8], pos: usize| usize::from(u16::from_le_bytes([data[pos], data[pos + 1]]));
    let mut marked = 0;
    for pos in 0..zip.len().saturating_sub(46) {
        let (flags, name_len_at, name_at) = match &zip[pos..pos + 4] {
            b"PK\x03\x04" => (6, 26, 30),
            b"PK\x01\x02" => (8, 28, 46),
            _ => continue,
        };
        let name_len = u16_at(zip, pos + name_len_at);
        let name_start = pos + name_at;
        if zip.get(name_start..name_start + name_len) == Some(entry.as_bytes()) {
            zip[pos + flags] |= 1;
            marked += 1;
        }
    }
    assert_eq!(marked, 2, "local and central header of {entry}");
}

fn put(root: &Path, rel: &str, data: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
}

fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

struct Fixture {
    _dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output");
        fs::create_dir_all(&input).unwrap();
        Self { _dir: dir, input, output }
    }

    fn run(&self, field: DateField) -> (RunSummary, Vec<String>) {
        let mut lines = Vec::new();
        let config = RunConfig::new(&self.input, &self.output, field);
        let summary = run(&config, |line| lines.push(line.to_string())).unwrap();
        (summary, lines)
    }
}

fn summary(found_pdf: u64, succeeded: u64, failed: u64) -> RunSummary {
    RunSummary { found_pdf, succeeded, failed }
}

#[test]
fn test_renames_plain_and_embedded() {
    let fx = Fixture::new();
    put(&fx.input, "a.pdf", &plain_pdf("2026-02-24", "郑州东", "三门峡南"));
    put(&fx.input, "sub/b.pdf", &embedded_pdf("20260211", "三门峡南", "郑州"));
    put(&fx.input, "notes.txt", b"ignored");

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(2, 2, 0));
    assert_eq!(
        output_names(&fx.output),
        vec!["2026-02-11-三门峡南-郑州.pdf", "2026-02-24-郑州东-三门峡南.pdf"]
    );
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.starts_with("OK: ")), "{lines:?}");
    assert_eq!(
        fs::read(fx.output.join("2026-02-11-三门峡南-郑州.pdf")).unwrap(),
        embedded_pdf("20260211", "三门峡南", "郑州")
    );
}

#[test]
fn test_issue_date_field() {
    let fx = Fixture::new();
    put(&fx.input, "a.pdf", &plain_pdf("2026-02-24", "郑州东", "三门峡南"));

    let (sum, _) = fx.run(DateField::Issue);

    assert_eq!(sum, summary(1, 1, 0));
    assert_eq!(output_names(&fx.output), vec!["2026-02-28-郑州东-三门峡南.pdf"]);
}

#[test]
fn test_collisions_get_numeric_suffix() {
    let fx = Fixture::new();
    put(&fx.input, "a.pdf", &plain_pdf("2026-02-24", "A", "B"));
    put(&fx.input, "b.pdf", &embedded_pdf("2026/02/24", "A", "B"));
    put(&fx.input, "c.pdf", &plain_pdf("20260224", "A", "B"));

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(3, 3, 0));
    assert_eq!(
        output_names(&fx.output),
        vec!["2026-02-24-A-B-2.pdf", "2026-02-24-A-B-3.pdf", "2026-02-24-A-B.pdf"]
    );
    assert!(lines[0].contains("a.pdf -> ") && lines[0].ends_with("2026-02-24-A-B.pdf"));
    assert!(lines[1].ends_with("2026-02-24-A-B-2.pdf"));
}

#[test]
fn test_dedup_across_directories() {
    let fx = Fixture::new();
    put(&fx.input, "x/Ticket.pdf", &plain_pdf("2026-02-24", "A", "B"));
    put(&fx.input, "y/ ticket.PDF", &plain_pdf("2026-03-01", "C", "D"));

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(1, 1, 0));
    assert_eq!(output_names(&fx.output), vec!["2026-02-24-A-B.pdf"]);
    let skips: Vec<_> = lines.iter().filter(|l| l.starts_with("SKIP: ")).collect();
    assert_eq!(skips.len(), 1);
    assert!(skips[0].contains("ticket.PDF"));
}

#[test]
fn test_nested_zip_is_traversed() {
    let fx = Fixture::new();
    let inner = zip_bytes(&[("deep/t.pdf", &embedded_pdf("2026-02-24", "郑州东", "三门峡南"))]);
    let outer = zip_bytes(&[
        ("docs/", b""),
        ("docs/readme.txt", b"hello"),
        ("inner.zip", &inner),
    ]);
    put(&fx.input, "outer.zip", &outer);

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(1, 1, 0));
    assert_eq!(output_names(&fx.output), vec!["2026-02-24-郑州东-三门峡南.pdf"]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("outer.zip!inner.zip!deep/t.pdf -> "), "{lines:?}");
}

#[test]
fn test_encrypted_unrecognised_entry_is_ignored() {
    let fx = Fixture::new();
    let mut archive = zip_bytes(&[
        ("secret.txt", b"top secret"),
        ("t.pdf", &plain_pdf("2026-02-24", "A", "B")),
    ]);
    mark_encrypted(&mut archive, "secret.txt");
    put(&fx.input, "a.zip", &archive);

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(1, 1, 0));
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].starts_with("OK: "));
}

#[test]
fn test_encrypted_pdf_entry_fails_with_its_name() {
    let fx = Fixture::new();
    let mut archive = zip_bytes(&[
        ("docs/locked.pdf", &plain_pdf("2026-02-24", "A", "B")),
        ("open.pdf", &plain_pdf("2026-03-01", "C", "D")),
    ]);
    mark_encrypted(&mut archive, "docs/locked.pdf");
    put(&fx.input, "a.zip", &archive);

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(2, 1, 1));
    assert_eq!(output_names(&fx.output), vec!["2026-03-01-C-D.pdf"]);
    assert!(
        lines[0].starts_with("ERR: ") && lines[0].contains("a.zip!docs/locked.pdf: failed to open ZIP entry"),
        "{lines:?}"
    );
}

#[test]
fn test_file_named_only_by_extension() {
    let fx = Fixture::new();
    put(&fx.input, ".pdf", &plain_pdf("2026-02-24", "A", "B"));
    put(&fx.input, "b.zip", &zip_bytes(&[("x/.PDF", &plain_pdf("2026-03-01", "C", "D"))]));

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(1, 1, 0));
    assert_eq!(output_names(&fx.output), vec!["2026-02-24-A-B.pdf"]);
    assert!(lines[1].starts_with("SKIP: ") && lines[1].ends_with("b.zip!x/.PDF"), "{lines:?}");
}

#[test]
fn test_dedup_across_archives_and_disk() {
    let fx = Fixture::new();
    put(&fx.input, "a.zip", &zip_bytes(&[("one/t.pdf", &plain_pdf("2026-02-24", "A", "B"))]));
    put(&fx.input, "b.zip", &zip_bytes(&[("two/T.pdf", &plain_pdf("2026-03-01", "C", "D"))]));
    put(&fx.input, "c/t.pdf", &plain_pdf("2026-04-01", "E", "F"));

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(1, 1, 0));
    assert_eq!(output_names(&fx.output), vec!["2026-02-24-A-B.pdf"]);
    let skips: Vec<_> = lines.iter().filter(|l| l.starts_with("SKIP: ")).collect();
    assert_eq!(skips.len(), 2);
    assert!(skips[0].ends_with("b.zip!two/T.pdf"), "{skips:?}");
}

#[test]
fn test_failures_do_not_abort_the_walk() {
    let fx = Fixture::new();
    put(&fx.input, "a-bad.pdf", b"%PDF-1.7\n%%EOF\n");
    put(&fx.input, "b-broken.zip", b"definitely not a zip");
    put(&fx.input, "c-bundle.zip", &zip_bytes(&[
        ("no-date.pdf", &plain_pdf("", "A", "B")),
        ("junk.zip", b"not a zip either"),
    ]));
    put(&fx.input, "d-good.pdf", &plain_pdf("2026-02-24", "A", "B"));

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(3, 1, 4));
    assert_eq!(output_names(&fx.output), vec!["2026-02-24-A-B.pdf"]);

    let errs: Vec<_> = lines.iter().filter(|l| l.starts_with("ERR: ")).collect();
    assert_eq!(errs.len(), 4, "{lines:?}");
    assert!(errs[0].contains("a-bad.pdf: no parsable XBRL found in PDF"));
    assert!(errs[1].contains("b-broken.zip: failed to parse ZIP"));
    assert!(errs[2].contains("c-bundle.zip!no-date.pdf: missing travel date (TravelDate)"));
    assert!(errs[3].contains("c-bundle.zip!junk.zip: failed to parse nested ZIP"));
    assert!(lines.last().unwrap().starts_with("OK: "));
}

#[test]
fn test_output_inside_input_is_pruned() {
    let fx = Fixture::new();
    let output = fx.input.join("renamed");
    put(&output, "old.pdf", &plain_pdf("2020-01-01", "X", "Y"));
    put(&fx.input, "new.pdf", &plain_pdf("2026-02-24", "A", "B"));

    let mut lines = Vec::new();
    let config = RunConfig::new(&fx.input, &output, DateField::Travel);
    let sum = run(&config, |line| lines.push(line.to_string())).unwrap();

    assert_eq!(sum, summary(1, 1, 0));
    assert!(lines[0].starts_with("INFO: "), "{lines:?}");
    assert_eq!(output_names(&output), vec!["2026-02-24-A-B.pdf", "old.pdf"]);
}

#[test]
fn test_missing_input_dir_is_a_walk_error() {
    let fx = Fixture::new();
    fs::remove_dir(&fx.input).unwrap();

    let (sum, lines) = fx.run(DateField::Travel);

    assert_eq!(sum, summary(0, 0, 1));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("ERR: cannot access "));
    assert!(fx.output.is_dir());
}

#[test]
fn test_configuration_errors_are_fatal() {
    let fx = Fixture::new();
    let mut logged = 0;

    let same = RunConfig::new(&fx.input, fx.input.join("."), DateField::Travel);
    let err = run(&same, |_| logged += 1).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::SameDirectory)), "{err:?}");

    let blank = RunConfig::new("  ", &fx.output, DateField::Travel);
    let err = run(&blank, |_| logged += 1).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::EmptyInputDir)), "{err:?}");

    let blank = RunConfig::new(&fx.input, "", DateField::Travel);
    let err = run(&blank, |_| logged += 1).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::EmptyOutputDir)), "{err:?}");

    assert_eq!(logged, 0);
    assert!(!fx.output.exists());
}
