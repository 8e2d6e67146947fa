/// Content sniffing: magic-number signatures and a printable-text heuristic
/// over the first bytes of a file.
use super::Family;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// A recognisable file header.
#[derive(Debug)]
pub struct Signature {
    pub tag: &'static str,
    pub family: Family,
    magic: &'static [u8],
}

const SIGNATURES: &[Signature] = &[
    Signature { tag: "png", family: Family::Image, magic: b"\x89PNG\r\n\x1a\n" },
    Signature { tag: "jpeg", family: Family::Image, magic: b"\xff\xd8\xff" },
    Signature { tag: "gif", family: Family::Image, magic: b"GIF87a" },
    Signature { tag: "gif", family: Family::Image, magic: b"GIF89a" },
    Signature { tag: "pdf", family: Family::Document, magic: b"%PDF-" },
    Signature { tag: "zip", family: Family::Archive, magic: b"PK\x03\x04" },
    Signature { tag: "zip", family: Family::Archive, magic: b"PK\x05\x06" },
    Signature { tag: "7z", family: Family::Archive, magic: b"7z\xbc\xaf\x27\x1c" },
    Signature { tag: "rar", family: Family::Archive, magic: b"Rar!\x1a\x07" },
    Signature { tag: "gzip", family: Family::Archive, magic: b"\x1f\x8b" },
    Signature { tag: "mach-o", family: Family::Binary, magic: b"\xfe\xed\xfa\xce" },
    Signature { tag: "mach-o", family: Family::Binary, magic: b"\xfe\xed\xfa\xcf" },
    Signature { tag: "mach-o", family: Family::Binary, magic: b"\xce\xfa\xed\xfe" },
    Signature { tag: "mach-o", family: Family::Binary, magic: b"\xcf\xfa\xed\xfe" },
    Signature { tag: "mach-o", family: Family::Binary, magic: b"\xca\xfe\xba\xbe" },
    Signature { tag: "elf", family: Family::Binary, magic: b"\x7fELF" },
];

/// Read at most `max` bytes from the start of `path`.
///
/// Only regular files are opened: opening a FIFO blocks until a writer
/// appears, and device nodes never end.
pub fn read_head(path: &Path, max: usize) -> io::Result<Vec<u8>> {
    if !fs::metadata(path)?.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    let mut buf = Vec::with_capacity(max.min(64 * 1024));
    File::open(path)?.take(max as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

pub fn match_signature(sample: &[u8]) -> Option<&'static Signature> {
    SIGNATURES.iter().find(|sig| sample.starts_with(sig.magic))
}

/// `true` when more than `ratio` of the bytes are printable. Printable
/// means ASCII graphic, space, common whitespace, or any byte >= 0x80 (UTF-8
/// continuation and single-byte code pages alike). NUL bytes and empty
/// samples are never text.
pub fn looks_like_text(sample: &[u8], ratio: f32) -> bool {
    if sample.is_empty() || sample.contains(&0) {
        return false;
    }
    let printable = sample
        .iter()
        .filter(|&&b| matches!(b, b'\n' | b'\r' | b'\t' | 0x0c | 0x20..=0x7e | 0x80..=0xff))
        .count();
    printable as f32 / sample.len() as f32 > ratio
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_are_recognised() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(match_signature(png).unwrap().tag, "png");
        assert_eq!(match_signature(b"%PDF-1.7\n").unwrap().family, Family::Document);
        assert_eq!(match_signature(b"\xcf\xfa\xed\xfe\x07\0\0\x01").unwrap().tag, "mach-o");
        assert_eq!(match_signature(b"PK\x03\x04rest").unwrap().tag, "zip");
        assert!(match_signature(b"hello").is_none());
        assert!(match_signature(b"").is_none());
    }

    #[test]
    fn plain_and_utf8_text_pass() {
        assert!(looks_like_text(b"fn main() {\n\tprintln!(\"hi\");\n}\n", 0.95));
        assert!(looks_like_text("h\u{e9}llo w\u{f6}rld\n".as_bytes(), 0.95));
    }

    #[test]
    fn single_byte_latin_text_passes() {
        // "café crème" in Latin-1: not valid UTF-8
        assert!(looks_like_text(b"caf\xe9 cr\xe8me\n", 0.95));
    }

    #[test]
    fn ratio_counts_bytes() {
        // 19 printable bytes out of 20
        let mut sample = b"abcdefghijklmnopqrs".to_vec();
        sample.push(0x07);
        assert!(looks_like_text(&sample, 0.9));
        assert!(!looks_like_text(&sample, 0.96));
    }

    #[test]
    fn directories_are_not_read() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = read_head(tmp.path(), 16).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn binary_fails() {
        assert!(!looks_like_text(&[0x00, 0x01, 0x02, 0x41], 0.95));
        let noisy: Vec<u8> = (0u8..=255).filter(|b| *b != 0).collect();
        assert!(!looks_like_text(&noisy, 0.95));
        assert!(!looks_like_text(b"", 0.95));
    }
}
