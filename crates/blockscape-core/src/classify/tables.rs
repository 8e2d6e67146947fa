/// Static lookup tables: extension aliases, extension → family, and the
/// type-identifier capability table.
///
/// All inputs are expected lowercase; [`crate::model::FileNode`] already
/// stores its extension that way.
use super::Family;

/// Collapse spelling variants onto one canonical tag so that `photo.jpg` and
/// `photo.jpeg` share a colour.
pub fn normalize_extension(ext: &str) -> &str {
    match ext {
        "jpg" | "jpe" | "jfif" => "jpeg",
        "tif" => "tiff",
        "htm" => "html",
        "yml" => "yaml",
        "mpg" | "mpe" => "mpeg",
        "markdown" | "mdown" | "mkd" => "md",
        "mid" => "midi",
        "aif" => "aiff",
        "cc" | "cxx" => "cpp",
        "hh" | "hxx" => "hpp",
        "text" => "txt",
        "tgz" => "gz",
        other => other,
    }
}

/// Family for a normalized extension.
pub fn extension_family(ext: &str) -> Option<Family> {
    let family = match ext {
        "jpeg" | "png" | "gif" | "bmp" | "svg" | "webp" | "ico" | "icns" | "tiff" | "psd"
        | "raw" | "cr2" | "nef" | "dng" | "heic" | "heif" | "avif" => Family::Image,
        "mp4" | "mkv" | "avi" | "mov" | "wmv" | "flv" | "webm" | "m4v" | "mpeg" | "3gp" => {
            Family::Video
        }
        "mp3" | "wav" | "flac" | "aac" | "ogg" | "wma" | "m4a" | "opus" | "aiff" | "midi" => {
            Family::Audio
        }
        "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" | "xz" | "zst" | "cab" | "iso" | "dmg"
        | "jar" => Family::Archive,
        "pdf" | "doc" | "docx" | "rtf" | "odt" | "xls" | "xlsx" | "ods" | "ppt" | "pptx"
        | "odp" | "pages" | "numbers" | "key" | "epub" => Family::Document,
        "txt" | "md" | "csv" | "tsv" | "log" | "rst" | "ini" | "cfg" | "conf" => Family::Text,
        "rs" | "py" | "js" | "ts" | "jsx" | "tsx" | "c" | "cpp" | "h" | "hpp" | "cs" | "java"
        | "go" | "rb" | "php" | "swift" | "kt" | "scala" | "m" | "mm" | "html" | "css"
        | "scss" | "json" | "xml" | "yaml" | "toml" | "sql" | "sh" | "bash" | "zsh" | "ps1"
        | "bat" | "lua" | "vue" | "svelte" => Family::Code,
        "exe" | "dll" | "so" | "dylib" | "o" | "a" | "lib" | "bin" | "msi" | "wasm" => {
            Family::Binary
        }
        _ => return None,
    };
    Some(family)
}

/// Exact type identifiers, checked before the pattern rules below.
const TYPE_IDS: &[(&str, Family)] = &[
    ("public.jpeg", Family::Image),
    ("public.png", Family::Image),
    ("public.heic", Family::Image),
    ("public.image", Family::Image),
    ("com.compuserve.gif", Family::Image),
    ("public.movie", Family::Video),
    ("public.video", Family::Video),
    ("public.mpeg-4", Family::Video),
    ("com.apple.quicktime-movie", Family::Video),
    ("public.audio", Family::Audio),
    ("public.mp3", Family::Audio),
    ("public.archive", Family::Archive),
    ("public.zip-archive", Family::Archive),
    ("org.gnu.gnu-zip-archive", Family::Archive),
    ("com.apple.disk-image", Family::Archive),
    ("com.adobe.pdf", Family::Document),
    ("public.composite-content", Family::Document),
    ("org.openxmlformats.wordprocessingml.document", Family::Document),
    ("public.plain-text", Family::Text),
    ("public.text", Family::Text),
    ("public.source-code", Family::Code),
    ("public.script", Family::Code),
    ("public.shell-script", Family::Code),
    ("public.json", Family::Code),
    ("com.apple.application", Family::App),
    ("com.apple.application-bundle", Family::App),
    ("public.executable", Family::Binary),
    ("public.unix-executable", Family::Binary),
    ("com.microsoft.windows-executable", Family::Binary),
];

/// Family for a type identifier: exact entry, then MIME top-level type,
/// then the capability words a conforming identifier carries.
pub fn type_family(type_id: &str) -> Option<Family> {
    let id = type_id.to_ascii_lowercase();
    if let Some((_, family)) = TYPE_IDS.iter().find(|(known, _)| *known == id) {
        return Some(*family);
    }

    if let Some((top, sub)) = id.split_once('/') {
        return match top {
            "image" => Some(Family::Image),
            "video" => Some(Family::Video),
            "audio" => Some(Family::Audio),
            "text" => Some(Family::Text),
            "application" if sub.contains("zip") || sub.contains("compressed") => {
                Some(Family::Archive)
            }
            "application" if sub == "pdf" => Some(Family::Document),
            _ => None,
        };
    }

    const CAPABILITIES: &[(&str, Family)] = &[
        ("archive", Family::Archive),
        ("image", Family::Image),
        ("movie", Family::Video),
        ("video", Family::Video),
        ("audio", Family::Audio),
        ("source", Family::Code),
        ("script", Family::Code),
        ("executable", Family::Binary),
        ("text", Family::Text),
    ];
    CAPABILITIES
        .iter()
        .find(|(word, _)| id.contains(word))
        .map(|(_, family)| *family)
}
