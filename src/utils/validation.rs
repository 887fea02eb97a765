use uuid::Uuid;

/// Extensions accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Returns the lowercased final extension of a filename, if any.
///
/// Mirrors a `rsplit('.', 1)` split: only the text after the last dot
/// counts, so `archive.tar.png` yields `png` and `noext` yields nothing.
pub fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Validates a filename against the extension allow-list (no content sniffing)
pub fn is_allowed_extension(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Derives a collision-free storage name for an uploaded file.
///
/// The name is a 128-bit random hex identifier plus the original's
/// lowercased extension. Nothing of the original base name survives, so
/// path traversal and ambiguous characters in client filenames cannot
/// reach the filesystem.
///
/// Callers must have validated the name with [`is_allowed_extension`]
/// first; an extensionless name cannot reach this point.
pub fn unique_filename(original: &str) -> String {
    let ext = file_extension(original).expect("filename validated before name generation");
    format!("{}.{}", Uuid::new_v4().simple(), ext)
}

/// Name of the processed counterpart of an upload: same stem, `.png`
pub fn processed_filename(upload_name: &str) -> String {
    let stem = upload_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(upload_name);
    format!("{stem}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed_extension() {
        assert!(is_allowed_extension("photo.jpg"));
        assert!(is_allowed_extension("photo.jpeg"));
        assert!(is_allowed_extension("photo.png"));
        assert!(is_allowed_extension("photo.JPG"));
        assert!(is_allowed_extension("photo.PnG"));
        assert!(is_allowed_extension("archive.tar.png"));

        assert!(!is_allowed_extension("malware.exe"));
        assert!(!is_allowed_extension("photo.gif"));
        assert!(!is_allowed_extension("photo.jpg.exe"));
        assert!(!is_allowed_extension("noextension"));
        assert!(!is_allowed_extension(""));
        assert!(!is_allowed_extension("trailingdot."));
    }

    #[test]
    fn test_unique_filename_preserves_extension() {
        let name = unique_filename("photo.JPG");
        assert!(name.ends_with(".jpg"));
        // 32 hex chars + "." + ext
        assert_eq!(name.len(), 32 + 1 + 3);
        assert!(name[..32].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_unique_filename_no_collisions() {
        let a = unique_filename("a.png");
        let b = unique_filename("a.png");
        assert_ne!(a, b);
    }

    #[test]
    fn test_unique_filename_ignores_base_name() {
        let name = unique_filename("../../../etc/passwd.png");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_processed_filename() {
        assert_eq!(processed_filename("abc123.jpg"), "abc123.png");
        assert_eq!(processed_filename("abc123.png"), "abc123.png");
        assert_eq!(processed_filename("a.tar.jpeg"), "a.tar.png");
    }
}
