//! File system operations
//!
//! This module handles:
//! - Folder validation
//! - Image scanning (per folder and per sub-folder)
//! - Two-phase batch rename with best-effort rollback
//! - Restoring names from an undo entry

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RenameError;
use crate::types::{is_image_file, lowercase_extension, FileRecord};

/// Prefix of the temporary names used between the two rename passes
const TEMP_PREFIX: &str = "__renam_temp_";

/// Check that `folder` is set, exists and is a directory
pub fn check_folder(folder: &Path) -> Result<(), RenameError> {
    if !folder.exists() {
        return Err(RenameError::NotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(RenameError::NotADirectory(folder.to_path_buf()));
    }
    Ok(())
}

/// Validate a folder, returning a human-readable reason when it is unusable
pub fn validate_folder(folder: Option<&Path>) -> (bool, String) {
    let Some(folder) = folder.filter(|f| !f.as_os_str().is_empty()) else {
        return (false, "No folder selected".to_string());
    };

    match check_folder(folder) {
        Ok(()) => (true, String::new()),
        Err(RenameError::NotFound(_)) => (false, "Folder does not exist".to_string()),
        Err(RenameError::NotADirectory(_)) => (false, "Not a valid folder".to_string()),
        Err(e) => (false, e.to_string()),
    }
}

/// Creation time with a fallback to modification time where the platform lacks it
fn creation_time(metadata: &fs::Metadata) -> DateTime<Local> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now())
}

/// Build a record for one file on disk
pub fn read_record(path: &Path) -> Result<FileRecord, RenameError> {
    let metadata = fs::metadata(path).map_err(|e| RenameError::from_io(e, path.display()))?;
    Ok(FileRecord::new(path.to_path_buf(), creation_time(&metadata)))
}

/// List image files directly inside `folder` (not recursive), sorted by name
pub fn scan(folder: &Path) -> Result<Vec<FileRecord>, RenameError> {
    debug!("scan called: folder={:?}", folder);
    check_folder(folder)?;

    let entries = fs::read_dir(folder).map_err(|e| {
        warn!("Failed to read directory {:?}: {}", folder, e);
        RenameError::from_io(e, folder.display())
    })?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_image_file(&path) {
            skipped += 1;
            continue;
        }
        match read_record(&path) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping unreadable file {:?}: {}", path, e);
                skipped += 1;
            }
        }
    }

    records.sort_by(|a, b| a.original_name.cmp(&b.original_name));

    info!(
        "Scanned {:?}: {} images ({} other entries skipped)",
        folder,
        records.len(),
        skipped
    );

    Ok(records)
}

/// Scan the sub-folder `name` of `folder`
pub fn scan_subfolder(folder: &Path, name: &str) -> Result<Vec<FileRecord>, RenameError> {
    scan(&folder.join(name))
}

/// Names of the immediate sub-folders of `folder`, hidden ones excluded
pub fn list_subfolders(folder: &Path) -> Result<Vec<String>, RenameError> {
    check_folder(folder)?;

    let entries = fs::read_dir(folder).map_err(|e| RenameError::from_io(e, folder.display()))?;

    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| !name.starts_with('.'))
        .collect();

    names.sort_by_key(|n| n.to_lowercase());
    debug!("Found {} sub-folders in {:?}", names.len(), folder);
    Ok(names)
}

/// Everything currently in `folder`, used to keep temporary names collision-free
fn existing_names(folder: &Path) -> Result<HashSet<String>, RenameError> {
    let entries = fs::read_dir(folder).map_err(|e| RenameError::from_io(e, folder.display()))?;
    Ok(entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect())
}

/// A single path component that stays inside the folder
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Temporary name for position `index`, unused in the folder and among final names
fn temp_name(index: usize, extension: &str, taken: &HashSet<String>) -> String {
    let base = format!("{}{}__{}", TEMP_PREFIX, index, extension);
    if !taken.contains(&base) {
        return base;
    }

    let mut attempt = 1;
    loop {
        let candidate = format!("{}{}_{}__{}", TEMP_PREFIX, index, attempt, extension);
        if !taken.contains(&candidate) {
            return candidate;
        }
        attempt += 1;
    }
}

/// Completed renames, kept so a failed batch can be walked back
#[derive(Default)]
struct RenameJournal {
    done: Vec<(PathBuf, PathBuf)>,
}

impl RenameJournal {
    fn rename(&mut self, from: &Path, to: &Path) -> Result<(), RenameError> {
        debug!("rename {:?} -> {:?}", from, to);
        fs::rename(from, to).map_err(|e| {
            RenameError::from_io(
                e,
                format!(
                    "{} -> {}",
                    from.file_name().unwrap_or_default().to_string_lossy(),
                    to.file_name().unwrap_or_default().to_string_lossy()
                ),
            )
        })?;
        self.done.push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    /// Reverse completed renames, newest first; failures are logged and skipped
    fn roll_back(self) {
        let total = self.done.len();
        let mut failed = 0;

        for (from, to) in self.done.into_iter().rev() {
            if let Err(e) = fs::rename(&to, &from) {
                failed += 1;
                warn!("Rollback failed for {:?} -> {:?}: {}", to, from, e);
            }
        }

        if failed == 0 {
            info!("Rolled back {} renames", total);
        } else {
            warn!("Rollback incomplete: {} of {} renames not reversed", failed, total);
        }
    }
}

/// Run both passes through `journal`; the caller rolls back on error
fn two_phase(
    journal: &mut RenameJournal,
    moves: &[(PathBuf, PathBuf, PathBuf)],
) -> Result<(), RenameError> {
    for (source, temp, _) in moves {
        journal.rename(source, temp)?;
    }
    for (_, temp, target) in moves {
        journal.rename(temp, target)?;
    }
    Ok(())
}

/// Rename `records` in `folder` to their `new_name`, in two passes
///
/// Pass 1 moves every file to a unique temporary name, pass 2 moves the
/// temporary files to their final names, so permutations such as a swap are
/// safe. Callers must reject duplicate `new_name`s beforehand. On failure the
/// renames already done are reversed as far as possible; records are updated
/// only when the whole batch succeeds.
pub fn rename_batch(folder: &Path, records: &mut [FileRecord]) -> Result<(), RenameError> {
    info!("rename_batch: folder={:?}, files={}", folder, records.len());
    check_folder(folder)?;

    if let Some(record) = records.iter().find(|r| r.new_name.is_empty()) {
        return Err(RenameError::MissingNewName(record.original_name.clone()));
    }
    if let Some(record) = records.iter().find(|r| !is_plain_name(&r.new_name)) {
        return Err(RenameError::InvalidName(record.new_name.clone()));
    }

    // Files outside the batch must never be replaced
    let existing = existing_names(folder)?;
    let sources: HashSet<&str> = records.iter().map(|r| r.original_name.as_str()).collect();
    if let Some(record) = records
        .iter()
        .find(|r| existing.contains(&r.new_name) && !sources.contains(r.new_name.as_str()))
    {
        return Err(RenameError::TargetExists(record.new_name.clone()));
    }

    let mut taken = existing;
    taken.extend(records.iter().map(|r| r.new_name.clone()));

    let mut moves = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let temp = temp_name(i, &record.extension, &taken);
        taken.insert(temp.clone());
        moves.push((
            record.original_path.clone(),
            folder.join(temp),
            folder.join(&record.new_name),
        ));
    }

    let mut journal = RenameJournal::default();
    if let Err(e) = two_phase(&mut journal, &moves) {
        warn!("Batch rename failed in {:?}: {}", folder, e);
        journal.roll_back();
        return Err(e);
    }

    for (record, (_, _, target)) in records.iter_mut().zip(moves) {
        record.original_path = target;
        record.original_name = record.new_name.clone();
    }

    info!("Renamed {} files in {:?}", records.len(), folder);
    Ok(())
}

/// Put files named in `after` back to the matching name in `before`
///
/// Pairs whose `after` file no longer exists are skipped, which tolerates
/// partially applied batches. Uses the same two passes as `rename_batch` so
/// undoing a permutation does not overwrite anything.
pub fn restore(folder: &Path, before: &[String], after: &[String]) -> Result<(), RenameError> {
    info!("restore: folder={:?}, pairs={}", folder, before.len());
    check_folder(folder)?;

    if before.len() != after.len() {
        return Err(RenameError::MismatchedNames {
            before: before.len(),
            after: after.len(),
        });
    }

    if let Some(name) = before.iter().chain(after).find(|n| !is_plain_name(n)) {
        return Err(RenameError::InvalidName(name.clone()));
    }

    let mut pairs = Vec::new();
    let mut skipped = 0;
    for (i, (original, current)) in before.iter().zip(after).enumerate() {
        if folder.join(current).exists() {
            pairs.push((i, original, current));
        } else {
            debug!("Skipping missing file {:?}", folder.join(current));
            skipped += 1;
        }
    }

    // A file that reappeared under an original name is not ours to replace
    let existing = existing_names(folder)?;
    let sources: HashSet<&str> = pairs.iter().map(|(_, _, current)| current.as_str()).collect();
    if let Some((_, original, _)) = pairs
        .iter()
        .find(|(_, original, _)| existing.contains(*original) && !sources.contains(original.as_str()))
    {
        return Err(RenameError::TargetExists((*original).clone()));
    }

    let mut taken = existing;
    taken.extend(before.iter().cloned());

    let mut moves = Vec::with_capacity(pairs.len());
    for (i, original, current) in pairs {
        let current_path = folder.join(current);
        let extension = lowercase_extension(&current_path);
        let temp = temp_name(i, &extension, &taken);
        taken.insert(temp.clone());
        moves.push((current_path, folder.join(temp), folder.join(original)));
    }

    let mut journal = RenameJournal::default();
    if let Err(e) = two_phase(&mut journal, &moves) {
        warn!("Restore failed in {:?}: {}", folder, e);
        journal.roll_back();
        return Err(e);
    }

    if skipped > 0 {
        warn!("Restore skipped {} missing files in {:?}", skipped, folder);
    }
    info!("Restored {} files in {:?}", moves.len(), folder);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::rename_patterns::apply_pattern;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn read(dir: &Path, name: &str) -> String {
        fs::read_to_string(dir.join(name)).unwrap()
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ========== validate_folder / scan tests ==========

    #[test]
    fn test_validate_folder_unset() {
        assert_eq!(
            validate_folder(None),
            (false, "No folder selected".to_string())
        );
        assert!(!validate_folder(Some(Path::new(""))).0);
    }

    #[test]
    fn test_validate_folder_missing_and_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "a");

        let (ok, msg) = validate_folder(Some(&dir.path().join("nope")));
        assert!(!ok);
        assert_eq!(msg, "Folder does not exist");

        let (ok, msg) = validate_folder(Some(&dir.path().join("a.jpg")));
        assert!(!ok);
        assert_eq!(msg, "Not a valid folder");

        assert_eq!(validate_folder(Some(dir.path())), (true, String::new()));
    }

    #[test]
    fn test_scan_filters_images() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.PNG", "");
        touch(dir.path(), "a.jpg", "");
        touch(dir.path(), "notes.txt", "");
        fs::create_dir(dir.path().join("nested.jpg")).unwrap();
        touch(&dir.path().join("nested.jpg"), "inner.jpg", "");

        let records = scan(dir.path()).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.original_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG"]);
        assert_eq!(records[1].extension, ".png");
    }

    #[test]
    fn test_scan_missing_folder() {
        let dir = TempDir::new().unwrap();
        let result = scan(&dir.path().join("missing"));
        assert!(matches!(result, Err(RenameError::NotFound(_))));
    }

    #[test]
    fn test_scan_not_a_directory() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "");
        let result = scan(&dir.path().join("a.jpg"));
        assert!(matches!(result, Err(RenameError::NotADirectory(_))));
    }

    #[test]
    fn test_subfolders() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("trip")).unwrap();
        fs::create_dir(dir.path().join("Beach")).unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        touch(dir.path(), "x.jpg", "");
        touch(&dir.path().join("trip"), "1.jpg", "");

        assert_eq!(list_subfolders(dir.path()).unwrap(), strings(&["Beach", "trip"]));

        let records = scan_subfolder(dir.path(), "trip").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original_name, "1.jpg");
    }

    // ========== temp_name tests ==========

    #[test]
    fn test_temp_name_avoids_taken() {
        let mut taken = HashSet::new();
        assert_eq!(temp_name(0, ".jpg", &taken), "__renam_temp_0__.jpg");
        taken.insert("__renam_temp_0__.jpg".to_string());
        assert_eq!(temp_name(0, ".jpg", &taken), "__renam_temp_0_1__.jpg");
    }

    // ========== rename_batch tests ==========

    #[test]
    fn test_rename_batch_swap() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "A");
        touch(dir.path(), "b.jpg", "B");

        let mut records = scan(dir.path()).unwrap();
        records[0].new_name = "b.jpg".to_string();
        records[1].new_name = "a.jpg".to_string();

        rename_batch(dir.path(), &mut records).unwrap();

        assert_eq!(read(dir.path(), "b.jpg"), "A");
        assert_eq!(read(dir.path(), "a.jpg"), "B");
        assert_eq!(listing(dir.path()), strings(&["a.jpg", "b.jpg"]));
        assert_eq!(records[0].original_name, "b.jpg");
        assert_eq!(records[0].original_path, dir.path().join("b.jpg"));
    }

    #[test]
    fn test_rename_batch_with_pattern() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "x.png", "X");
        touch(dir.path(), "y.jpg", "Y");

        let mut records = scan(dir.path()).unwrap();
        apply_pattern(&mut records, "IMG_{000}");
        rename_batch(dir.path(), &mut records).unwrap();

        assert_eq!(listing(dir.path()), strings(&["IMG_001.png", "IMG_002.jpg"]));
        assert_eq!(read(dir.path(), "IMG_001.png"), "X");
    }

    #[test]
    fn test_rename_batch_missing_new_name() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "A");

        let mut records = scan(dir.path()).unwrap();
        let result = rename_batch(dir.path(), &mut records);
        assert!(matches!(result, Err(RenameError::MissingNewName(_))));
        assert_eq!(listing(dir.path()), strings(&["a.jpg"]));
    }

    #[test]
    fn test_rename_batch_failure_rolls_back() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "A");
        touch(dir.path(), "b.jpg", "B");

        let mut records = scan(dir.path()).unwrap();
        records[0].new_name = "first.jpg".to_string();
        // Longer than any file system allows, so pass 2 fails on it
        records[1].new_name = format!("{}.jpg", "x".repeat(300));

        let result = rename_batch(dir.path(), &mut records);
        assert!(matches!(result, Err(RenameError::Filesystem(_))));

        assert_eq!(listing(dir.path()), strings(&["a.jpg", "b.jpg"]));
        assert_eq!(read(dir.path(), "a.jpg"), "A");
        assert_eq!(records[0].original_name, "a.jpg");
    }

    #[test]
    fn test_rename_batch_source_vanished() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "A");
        touch(dir.path(), "b.jpg", "B");

        let mut records = scan(dir.path()).unwrap();
        apply_pattern(&mut records, "{n}");
        fs::remove_file(dir.path().join("b.jpg")).unwrap();

        assert!(rename_batch(dir.path(), &mut records).is_err());
        assert_eq!(listing(dir.path()), strings(&["a.jpg"]));
    }

    #[test]
    fn test_rename_batch_keeps_files_outside_batch() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "A");
        touch(dir.path(), "b.jpg", "B");

        let mut records = vec![read_record(&dir.path().join("a.jpg")).unwrap()];
        records[0].new_name = "b.jpg".to_string();

        let result = rename_batch(dir.path(), &mut records);
        assert!(matches!(result, Err(RenameError::TargetExists(ref name)) if name == "b.jpg"));
        assert_eq!(read(dir.path(), "a.jpg"), "A");
        assert_eq!(read(dir.path(), "b.jpg"), "B");
        assert_eq!(records[0].original_name, "a.jpg");
    }

    #[test]
    fn test_rename_batch_rejects_paths_in_new_names() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("inner")).unwrap();
        touch(&dir.path().join("inner"), "a.jpg", "A");
        let inner = dir.path().join("inner");

        for bad in ["../1.jpg", "sub/1.jpg", "..", "a\\b.jpg"] {
            let mut records = scan(&inner).unwrap();
            records[0].new_name = bad.to_string();
            let result = rename_batch(&inner, &mut records);
            assert!(matches!(result, Err(RenameError::InvalidName(_))), "{}", bad);
        }
        assert_eq!(listing(&inner), strings(&["a.jpg"]));
        assert_eq!(listing(dir.path()), strings(&["inner"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_rename_batch_read_only_folder() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "A");
        let mut records = scan(dir.path()).unwrap();
        apply_pattern(&mut records, "{n}");

        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();
        // Privileged users ignore directory permissions
        if fs::write(dir.path().join("writable"), "").is_ok() {
            fs::remove_file(dir.path().join("writable")).unwrap();
            fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = rename_batch(dir.path(), &mut records);
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert!(err.is_permission(), "{}", err);
        assert_eq!(listing(dir.path()), strings(&["a.jpg"]));
    }

    // ========== restore tests ==========

    #[test]
    fn test_restore_round_trip_reverse_order() {
        let dir = TempDir::new().unwrap();
        for (name, content) in [("1.jpg", "one"), ("2.jpg", "two"), ("3.png", "three")] {
            touch(dir.path(), name, content);
        }

        let mut records = scan(dir.path()).unwrap();
        records.reverse();
        apply_pattern(&mut records, "{n}");

        let before: Vec<String> = records.iter().map(|r| r.original_name.clone()).collect();
        let after: Vec<String> = records.iter().map(|r| r.new_name.clone()).collect();

        rename_batch(dir.path(), &mut records).unwrap();
        assert_eq!(read(dir.path(), "1.png"), "three");
        assert_eq!(read(dir.path(), "3.jpg"), "one");

        restore(dir.path(), &before, &after).unwrap();
        assert_eq!(listing(dir.path()), strings(&["1.jpg", "2.jpg", "3.png"]));
        assert_eq!(read(dir.path(), "1.jpg"), "one");
        assert_eq!(read(dir.path(), "3.png"), "three");
    }

    #[test]
    fn test_restore_swap() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "B");
        touch(dir.path(), "b.jpg", "A");

        restore(
            dir.path(),
            &strings(&["a.jpg", "b.jpg"]),
            &strings(&["b.jpg", "a.jpg"]),
        )
        .unwrap();

        assert_eq!(read(dir.path(), "a.jpg"), "A");
        assert_eq!(read(dir.path(), "b.jpg"), "B");
    }

    #[test]
    fn test_restore_skips_missing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "1.jpg", "x");

        restore(
            dir.path(),
            &strings(&["x.jpg", "y.jpg"]),
            &strings(&["1.jpg", "2.jpg"]),
        )
        .unwrap();

        assert_eq!(listing(dir.path()), strings(&["x.jpg"]));
    }

    #[test]
    fn test_restore_keeps_file_created_after_rename() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.jpg", "A");

        let mut records = scan(dir.path()).unwrap();
        apply_pattern(&mut records, "{n}");
        rename_batch(dir.path(), &mut records).unwrap();
        touch(dir.path(), "a.jpg", "new");

        let result = restore(dir.path(), &strings(&["a.jpg"]), &strings(&["1.jpg"]));
        assert!(matches!(result, Err(RenameError::TargetExists(ref name)) if name == "a.jpg"));
        assert_eq!(read(dir.path(), "a.jpg"), "new");
        assert_eq!(read(dir.path(), "1.jpg"), "A");
    }

    #[test]
    fn test_restore_rejects_paths() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "1.jpg", "x");
        let result = restore(dir.path(), &strings(&["../a.jpg"]), &strings(&["1.jpg"]));
        assert!(matches!(result, Err(RenameError::InvalidName(_))));
        assert_eq!(listing(dir.path()), strings(&["1.jpg"]));
    }

    #[test]
    fn test_restore_mismatched_lengths() {
        let dir = TempDir::new().unwrap();
        let result = restore(dir.path(), &strings(&["a.jpg"]), &[]);
        assert!(matches!(
            result,
            Err(RenameError::MismatchedNames { before: 1, after: 0 })
        ));
    }
}
