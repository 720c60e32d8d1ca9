//! Module identity resolution - binary format and build id of a candidate.
//!
//! The authoritative path runs the target's objdump against the image's
//! `.note.gnu.build-id` section and parses the textual dump; that works for
//! files the debugger cannot read directly (remote targets, PE images the
//! host's loaders know nothing about). When the file is locally readable the
//! header is classified with goblin instead, skipping the external process.

use std::path::Path;
use std::time::Duration;

use crate::config::DyldConfig;
use crate::platform::Platform;
use crate::registry::Triple;

/// Bound on every remote command this module runs.
pub const OBJDUMP_TIMEOUT: Duration = Duration::from_secs(15);

/// Result of classifying one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    /// `None` when the format is unrecognized; the caller skips the
    /// candidate (the common case for non-module file mappings).
    pub triple: Option<Triple>,
    /// Lower-case hex of the build-id payload; empty when absent.
    pub build_id: String,
}

/// Determine format and build id of the image at `path` on the target.
///
/// Soft-fails to `None` when the inspection tool cannot be run or exits
/// non-zero; the candidate is skipped, the scan continues.
pub fn resolve(platform: &dyn Platform, config: &DyldConfig, path: &str) -> Option<FileIdentity> {
    if platform.is_host() {
        if let Some(identity) = classify_local(Path::new(path)) {
            return Some(identity);
        }
    }

    let command = format!(
        "\"{}\" -s -j .note.gnu.build-id '{}'",
        config.objdump_path, path
    );
    let output = match platform.run_shell_command(&command, None, OBJDUMP_TIMEOUT) {
        Ok(output) => output,
        Err(err) => {
            log::debug!("Inspection of {path} failed: {err}");
            return None;
        }
    };
    if !output.success() {
        log::debug!("`{command}` failed with status {}", output.status);
        return None;
    }

    Some(parse_objdump_output(&output.stdout))
}

/// Classify a locally readable file without spawning the external tool.
fn classify_local(path: &Path) -> Option<FileIdentity> {
    let data = std::fs::read(path).ok()?;
    match goblin::Object::parse(&data).ok()? {
        goblin::Object::PE(_) => Some(FileIdentity {
            triple: Some(Triple::Windows),
            build_id: String::new(),
        }),
        goblin::Object::Elf(elf) => Some(FileIdentity {
            triple: Some(Triple::Linux),
            build_id: elf_build_id(&elf, &data).unwrap_or_default(),
        }),
        _ => None,
    }
}

fn elf_build_id(elf: &goblin::elf::Elf<'_>, data: &[u8]) -> Option<String> {
    let notes = elf.iter_note_sections(data, Some(".note.gnu.build-id"))?;
    for note in notes {
        let note = note.ok()?;
        if note.n_type == goblin::elf::note::NT_GNU_BUILD_ID && note.name == "GNU" {
            return Some(hex::encode(note.desc));
        }
    }
    None
}

/// Pull file format and build id out of the tool's stdout.
fn parse_objdump_output(output: &str) -> FileIdentity {
    let mut triple = None;
    let mut build_id = String::new();

    let mut rest = output;
    while !rest.is_empty() {
        let (line, tail) = rest.split_once('\n').unwrap_or((rest, ""));
        if let Some(format) = try_extract_file_format(line) {
            triple = classify_format(format);
        }
        if line.starts_with("Contents of section .note.gnu.build-id") {
            build_id = extract_build_id_hex(tail);
            break;
        }
        rest = tail;
    }

    FileIdentity { triple, build_id }
}

// The format declaration looks like `/path/to/file:     file format elf64-x86-64`.
fn try_extract_file_format(line: &str) -> Option<&str> {
    let (_, after_colon) = line.split_once(':')?;
    let (_, format) = after_colon.split_once("file format ")?;
    let format = format.trim();
    (!format.is_empty()).then_some(format)
}

fn classify_format(format: &str) -> Option<Triple> {
    let lower = format.to_ascii_lowercase();
    if lower.starts_with("pe") || lower.starts_with("coff") {
        Some(Triple::Windows)
    } else if lower.starts_with("elf") {
        Some(Triple::Linux)
    } else {
        None
    }
}

/// Extract the build id from a section hex dump.
///
/// Dump rows look like ` 0328 99ceaff4 c722...  ....` - a hex offset, one
/// space, runs of hex digits each followed by a single space, then two
/// consecutive spaces starting the printable-ASCII column. The first row
/// holds the 16-byte note header, not id bytes, and is skipped; the id is the
/// concatenation of the digits of the remaining rows, lower-cased. A row that
/// doesn't open with "offset, single space" ends the dump; a row whose digit
/// run hits end-of-line before the double-space terminator yields an empty id
/// rather than an error.
fn extract_build_id_hex(section: &str) -> String {
    let mut result = String::new();
    let mut lines = section.lines();
    lines.next();

    for line in lines {
        let mut bytes = line.bytes().peekable();
        while bytes.next_if_eq(&b' ').is_some() {}

        let mut saw_offset = false;
        while bytes.next_if(u8::is_ascii_hexdigit).is_some() {
            saw_offset = true;
        }
        if !saw_offset || bytes.next() != Some(b' ') {
            break;
        }

        let mut c = bytes.next().unwrap_or(0);
        loop {
            while c.is_ascii_hexdigit() {
                result.push(c.to_ascii_lowercase() as char);
                c = bytes.next().unwrap_or(0);
            }
            if c != b' ' {
                // Ran off the row without reaching the ASCII column.
                return String::new();
            }
            c = bytes.next().unwrap_or(0);
            if c == b' ' {
                break;
            }
        }
    }

    result
}
