//! Filesystem helpers for the registry: permission probing for the working
//! dir and sanitization of client-supplied upload names.

use crate::constants::ALLOWED_UPLOAD_EXT;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of probing directory permissions by attempting real operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirPermissions {
    pub read: bool,
    pub write: bool,
    pub execute: bool, // "traverse" on Unix
}

impl DirPermissions {
    pub const fn all() -> Self {
        Self {
            read: true,
            write: true,
            execute: true,
        }
    }
}

/// Probe read, write, and traverse permissions for a directory. The checks
/// try the concrete operations instead of inspecting permission bits, so
/// they report what the current process can actually do.
pub fn check_dir_permissions<P: AsRef<Path>>(dir: P) -> DirPermissions {
    let dir = dir.as_ref();

    match fs::metadata(dir) {
        Ok(md) if md.is_dir() => {}
        _ => {
            return DirPermissions {
                read: false,
                write: false,
                execute: false,
            };
        }
    }

    let read = fs::read_dir(dir).is_ok();
    // Canonicalize requires traverse permission on each component.
    let execute = fs::canonicalize(dir).is_ok();
    let write = try_create_ephemeral_file(dir);

    DirPermissions {
        read,
        write,
        execute,
    }
}

fn try_create_ephemeral_file(dir: &Path) -> bool {
    let name = format!(
        ".perm_check_{}_{}.tmp",
        std::process::id(),
        rand::random::<u64>()
    );
    let path: PathBuf = dir.join(name);
    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
    {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(&path);
            true
        }
        Err(_) => false,
    }
}

/// Reduce an untrusted upload name to its final path component. Returns
/// None when nothing usable remains (empty input, bare separators, dot
/// components).
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    let candidate = Path::new(trimmed).file_name()?.to_str()?;
    if candidate.is_empty() || candidate == "." || candidate == ".." {
        return None;
    }
    Some(candidate.to_string())
}

/// Uploads are restricted to graph documents by extension.
pub fn has_allowed_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ALLOWED_UPLOAD_EXT))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_current_dir_permissions() {
        let perms = check_dir_permissions(".");
        assert!(
            perms.execute,
            "Expected to be able to traverse current directory"
        );
    }

    #[test]
    fn missing_dir_has_no_permissions() {
        let perms = check_dir_permissions("/definitely/not/a/real/dir");
        assert_eq!(
            perms,
            DirPermissions {
                read: false,
                write: false,
                execute: false
            }
        );
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(
            sanitize_file_name("../../etc/passwd.json").as_deref(),
            Some("passwd.json")
        );
        assert_eq!(
            sanitize_file_name("/abs/dir/graph.json").as_deref(),
            Some("graph.json")
        );
        assert_eq!(sanitize_file_name("plain.json").as_deref(), Some("plain.json"));
    }

    #[test]
    fn sanitize_rejects_unusable_names() {
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name("   "), None);
        assert_eq!(sanitize_file_name("/"), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("dir/.."), None);
    }

    #[test]
    fn extension_gate() {
        assert!(has_allowed_extension("a.json"));
        assert!(has_allowed_extension("A.JSON"));
        assert!(!has_allowed_extension("a.yaml"));
        assert!(!has_allowed_extension("json"));
        assert!(!has_allowed_extension("a."));
    }
}
