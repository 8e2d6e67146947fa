/// Platform-specific allocated size and hidden-attribute lookups.
///
/// Allocated size is what the volume actually spends on a file (block or
/// cluster rounded, compressed, sparse). Where the platform cannot tell us,
/// callers fall back to the logical length.
use std::fs::Metadata;
use std::path::Path;

#[cfg(unix)]
pub fn allocated_size(_path: &Path, meta: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    // st_blocks is always in 512-byte units, whatever the filesystem block size.
    Some(meta.blocks().saturating_mul(512))
}

#[cfg(windows)]
pub fn allocated_size(path: &Path, meta: &Metadata) -> Option<u64> {
    use std::os::windows::ffi::OsStrExt;
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::GetCompressedFileSizeW;

    if meta.is_dir() {
        return None;
    }

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0u16))
        .collect();
    let mut high: u32 = 0;
    let low = unsafe { GetCompressedFileSizeW(PCWSTR(wide.as_ptr()), Some(&mut high as *mut u32)) };

    // INVALID_FILE_SIZE with a zero high word signals failure.
    if low == u32::MAX && high == 0 {
        return None;
    }
    Some((u64::from(high) << 32) | u64::from(low))
}

#[cfg(not(any(unix, windows)))]
pub fn allocated_size(_path: &Path, _meta: &Metadata) -> Option<u64> {
    None
}

#[cfg(windows)]
pub fn has_hidden_attribute(meta: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
pub fn has_hidden_attribute(_meta: &Metadata) -> bool {
    false
}
