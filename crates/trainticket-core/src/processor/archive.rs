//! ZIP traversal, including archives nested inside archives.

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use tracing::{debug, trace};
use zip::ZipArchive;

use super::{InputKind, RunContext, dedup};
use crate::error::{Error, Result};

impl<F: FnMut(&str)> RunContext<F> {
    /// Open a ZIP on disk and process its entries.
    ///
    /// An archive that cannot be opened is a single failure; entry failures
    /// are reported individually.
    pub(super) fn process_zip_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(Error::io("failed to open ZIP"))?;
        let mut archive = ZipArchive::new(file).map_err(Error::archive("failed to parse ZIP"))?;
        self.process_zip_archive(&path.display().to_string(), &mut archive);
        Ok(())
    }

    /// Visit entries in central-directory order. `context` is the `!`-joined
    /// path of the archive, e.g. `outer.zip!inner.zip`.
    fn process_zip_archive<R: Read + Seek>(&mut self, context: &str, archive: &mut ZipArchive<R>) {
        debug!("Opened {context} ({} entries)", archive.len());
        for index in 0..archive.len() {
            // Raw access reads the header only; nothing is decrypted or inflated.
            let (name, is_dir) = match archive.by_index_raw(index) {
                Ok(entry) => (entry.name().to_string(), entry.is_dir()),
                Err(err) => {
                    let source = format!("{context}!#{index}");
                    self.fail(&source, &Error::archive("failed to read ZIP entry header")(err));
                    continue;
                }
            };
            if is_dir {
                continue;
            }

            let source = format!("{context}!{name}");
            let result = match InputKind::from_name(&name) {
                Some(InputKind::Pdf) => {
                    if !self.admit_pdf(&dedup::key_for_entry(&name), &source) {
                        continue;
                    }
                    read_entry(archive, index, "failed to read PDF in ZIP")
                        .and_then(|pdf| self.process_pdf_bytes(&source, &pdf))
                        .map(|()| self.summary.succeeded += 1)
                }
                Some(InputKind::Zip) => read_entry(archive, index, "failed to read ZIP in ZIP")
                    .and_then(|bytes| self.process_nested_zip(&source, bytes)),
                None => {
                    trace!("Ignoring {source}");
                    Ok(())
                }
            };
            if let Err(err) = result {
                self.fail(&source, &err);
            }
        }
    }

    fn process_nested_zip(&mut self, context: &str, bytes: Vec<u8>) -> Result<()> {
        let mut nested =
            ZipArchive::new(Cursor::new(bytes)).map_err(Error::archive("failed to parse nested ZIP"))?;
        self.process_zip_archive(context, &mut nested);
        Ok(())
    }
}

/// Open entry `index` for decoding and read it whole.
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    context: &'static str,
) -> Result<Vec<u8>> {
    let mut entry = archive
        .by_index(index)
        .map_err(Error::archive("failed to open ZIP entry"))?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).map_err(Error::io(context))?;
    Ok(buf)
}
