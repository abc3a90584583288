//! MIME type lookup for the `mime` rule.

use mime_guess::mime;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Leading bytes read for content sniffing.
const SNIFF_LEN: u64 = 8192;

/// Resolves the MIME type of a file path.
///
/// Returning `None` means the type could not be determined; the `mime`
/// rule treats that as a failure.
pub trait MimeProbe: fmt::Debug + Send + Sync {
    fn probe(&self, path: &Path) -> Option<String>;
}

/// File-system probe: the path must name an existing regular file, and the
/// type is sniffed from its content.
///
/// Binary formats are identified by their magic numbers. Content with no
/// known signature is `text/plain` when it reads as text, or
/// `application/octet-stream` otherwise. For text, a textual type implied
/// by the extension (`.json`, `.csv`, ...) refines `text/plain`. An empty
/// file is `application/x-empty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMimeProbe;

impl MimeProbe for FsMimeProbe {
    fn probe(&self, path: &Path) -> Option<String> {
        let metadata = std::fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }

        let mut head = Vec::new();
        File::open(path)
            .ok()?
            .take(SNIFF_LEN)
            .read_to_end(&mut head)
            .ok()?;

        Some(sniff(path, &head))
    }
}

fn sniff(path: &Path, head: &[u8]) -> String {
    if head.is_empty() {
        return "application/x-empty".to_string();
    }
    if let Some(kind) = infer::get(head) {
        return kind.mime_type().to_string();
    }
    if !looks_like_text(head) {
        return mime::APPLICATION_OCTET_STREAM.essence_str().to_string();
    }

    match mime_guess::from_path(path).first() {
        Some(guess) if is_textual(&guess) => guess.essence_str().to_string(),
        _ => mime::TEXT_PLAIN.essence_str().to_string(),
    }
}

/// Valid UTF-8 (allowing a character cut off by the read limit) with no
/// control characters other than whitespace.
fn looks_like_text(head: &[u8]) -> bool {
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(e) if e.error_len().is_none() => {
            // Only the trailing, truncated character is invalid
            match std::str::from_utf8(&head[..e.valid_up_to()]) {
                Ok(text) => text,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };
    !text
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r' | '\x0c'))
}

fn is_textual(guess: &mime::Mime) -> bool {
    guess.type_() == mime::TEXT
        || (guess.type_() == mime::APPLICATION
            && (guess.subtype() == mime::JSON
                || guess.subtype() == mime::XML
                || guess.subtype() == mime::JAVASCRIPT))
}
