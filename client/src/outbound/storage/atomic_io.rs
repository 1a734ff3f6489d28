//! Atomic file replacement inside a capability directory.
//!
//! Contents are written to a hidden temporary sibling, synced, then renamed
//! over the target so readers never observe a partial file.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::LocalStorageError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `path` in `dir` with `contents`.
///
/// # Errors
///
/// Returns [`LocalStorageError::Io`] when `path` is not a plain file name
/// or any write, sync or rename step fails.
pub(super) fn write_atomic(
    dir: &Dir,
    path: &Utf8Path,
    contents: &[u8],
) -> Result<(), LocalStorageError> {
    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(LocalStorageError::io(format!(
            "{path} must be a file name inside the state directory"
        )));
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{file_name}.tmp.{}.{nanos}.{counter}",
        std::process::id()
    );

    write_temp(dir, &tmp_name, contents).map_err(|err| {
        drop(dir.remove_file(&tmp_name));
        LocalStorageError::io(format!("writing {tmp_name}: {err}"))
    })?;
    dir.rename(&tmp_name, dir, file_name).map_err(|err| {
        drop(dir.remove_file(&tmp_name));
        LocalStorageError::io(format!("replacing {path}: {err}"))
    })?;

    // Directory sync is best effort.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
    Ok(())
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;

    fn temp_dir() -> (tempfile::TempDir, Dir) {
        let temp = tempfile::tempdir().expect("temp dir");
        let dir = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open dir");
        (temp, dir)
    }

    #[test]
    fn replaces_existing_contents_without_leftovers() {
        let (_temp, dir) = temp_dir();
        let path = Utf8Path::new("session.json");

        write_atomic(&dir, path, b"{\"a\":\"1\"}").expect("first write");
        write_atomic(&dir, path, b"{\"a\":\"2\"}").expect("second write");

        assert_eq!(dir.read_to_string(path).expect("read"), "{\"a\":\"2\"}");
        let names = dir
            .entries()
            .expect("entries")
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["session.json".to_owned()]);
    }

    #[test]
    fn nested_paths_are_refused() {
        let (_temp, dir) = temp_dir();
        let err = write_atomic(&dir, Utf8Path::new("nested/session.json"), b"{}")
            .expect_err("nested path");
        assert!(matches!(err, LocalStorageError::Io { .. }));
    }
}
