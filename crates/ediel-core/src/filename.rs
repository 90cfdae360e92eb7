// Rust guideline compliant 2026-02-06

//! MIG filename recognition and directory discovery.
//!
//! MIG exports are named
//! `<sender>.<receiver>.<sequence>.EXPORT<nn>[...].MIG[...].csv`, where sender
//! and receiver are 13-digit party identifiers. Matching is case-insensitive
//! and anchored at the start of the path only, so trailing text after `.csv`
//! is tolerated.

use crate::Result;
use serde::Serialize;
use std::path::Path;

const PARTY_ID_LEN: usize = 13;

/// Components of a recognised MIG filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigFileName {
    /// Matched text from the start of the input through `.csv`.
    pub path: String,
    /// File name portion of the match.
    pub filename: String,
    /// Sender party identifier.
    pub sender: String,
    /// Receiver party identifier.
    pub receiver: String,
    /// Sequence number (may be empty).
    pub sequence: String,
    /// Full export segment, e.g. `EXPORT91_MMR`.
    pub export: String,
    /// Two-digit export number.
    pub export_no: String,
    /// MIG version segment, e.g. `MIG3`.
    pub mig: String,
}

/// Matches a path or file name against the MIG naming pattern.
///
/// Directory prefixes are tried from the last `/` backwards, then the whole
/// input, mirroring a greedy optional `.*/` prefix.
///
/// # Returns
///
/// The filename components, or `None` if the input does not match.
pub fn match_filename(filename: &str) -> Option<MigFileName> {
    let mut starts: Vec<usize> = filename
        .match_indices('/')
        .map(|(i, _)| i + 1)
        .collect();
    starts.reverse();
    starts.push(0);

    starts.into_iter().find_map(|start| {
        let (parts, len) = match_components(&filename[start..])?;
        let end = start + len;
        Some(MigFileName {
            path: filename[..end].to_string(),
            filename: filename[start..end].to_string(),
            ..parts
        })
    })
}

/// Matches the file name components at the very start of `text`.
///
/// Returns the components and the byte length of the match.
fn match_components(text: &str) -> Option<(MigFileName, usize)> {
    let mut rest = text;

    let sender = take_digits(&mut rest, Some(PARTY_ID_LEN))?;
    expect_dot(&mut rest)?;
    let receiver = take_digits(&mut rest, Some(PARTY_ID_LEN))?;
    expect_dot(&mut rest)?;
    let sequence = take_digits(&mut rest, None)?;
    expect_dot(&mut rest)?;

    let export = take_segment(&mut rest)?;
    if !starts_with_ignore_case(export, "EXPORT") {
        return None;
    }
    let export_no = export.get(6..8)?;
    if !export_no.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    expect_dot(&mut rest)?;

    let mig = take_segment(&mut rest)?;
    if !starts_with_ignore_case(mig, "MIG") {
        return None;
    }
    expect_dot(&mut rest)?;

    if !starts_with_ignore_case(rest, "csv") {
        return None;
    }
    let len = text.len() - rest.len() + 3;

    Some((
        MigFileName {
            path: String::new(),
            filename: String::new(),
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            sequence: sequence.to_string(),
            export: export.to_string(),
            export_no: export_no.to_string(),
            mig: mig.to_string(),
        },
        len,
    ))
}

fn take_digits<'a>(rest: &mut &'a str, exact: Option<usize>) -> Option<&'a str> {
    let count = rest.bytes().take_while(u8::is_ascii_digit).count();
    let take = match exact {
        Some(n) if count < n => return None,
        Some(n) => n,
        None => count,
    };
    let (digits, tail) = rest.split_at(take);
    *rest = tail;
    Some(digits)
}

fn take_segment<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let end = rest.find('.')?;
    let (segment, tail) = rest.split_at(end);
    *rest = tail;
    Some(segment)
}

fn expect_dot(rest: &mut &str) -> Option<()> {
    *rest = rest.strip_prefix('.')?;
    Some(())
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Finds all MIG files directly inside a directory.
///
/// Hidden entries are skipped and results are sorted by path.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn find_files(dir: &Path) -> Result<Vec<MigFileName>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let path_text = path.to_string_lossy().replace('\\', "/");
        match match_filename(&path_text) {
            Some(matched) => found.push(matched),
            None => tracing::trace!(path = %path_text, "skipping non-MIG entry"),
        }
    }
    found.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "5414488000004.5414567000007.123.EXPORT91_MMR.MIG3.csv";

    #[test]
    fn test_match_plain_name() {
        let m = match_filename(NAME).unwrap();
        assert_eq!(m.sender, "5414488000004");
        assert_eq!(m.receiver, "5414567000007");
        assert_eq!(m.sequence, "123");
        assert_eq!(m.export, "EXPORT91_MMR");
        assert_eq!(m.export_no, "91");
        assert_eq!(m.mig, "MIG3");
        assert_eq!(m.filename, NAME);
        assert_eq!(m.path, NAME);
    }

    #[test]
    fn test_match_with_directory() {
        let input = format!("data/mig/{}", NAME);
        let m = match_filename(&input).unwrap();
        assert_eq!(m.filename, NAME);
        assert_eq!(m.path, input);
    }

    #[test]
    fn test_match_case_insensitive_and_trailing_text() {
        let input = "5414488000004.5414567000007..export95.mig30.CSV.bak";
        let m = match_filename(input).unwrap();
        assert_eq!(m.sequence, "");
        assert_eq!(m.export_no, "95");
        assert_eq!(m.path, "5414488000004.5414567000007..export95.mig30.CSV");
    }

    #[test]
    fn test_reject_short_party_id() {
        assert!(match_filename("541448800000.5414567000007.1.EXPORT91.MIG3.csv").is_none());
    }

    #[test]
    fn test_reject_wrong_extension() {
        assert!(match_filename("5414488000004.5414567000007.1.EXPORT91.MIG3.txt").is_none());
        assert!(match_filename("5414488000004.5414567000007.1.EXPORTXX.MIG3.csv").is_none());
    }
}
