//! tests/wipe_tests.rs
//! Wipe-then-delete property: P passes each cover at least the file's
//! length with fresh random data before the final delete.

use datasafe_rs::wipe::wipe;
use std::collections::BTreeMap;

#[test]
fn each_pass_covers_the_whole_file() {
    const SIZE: u64 = 33_000; // deliberately not a buffer multiple
    const PASSES: u32 = 3;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target.dat");
    std::fs::write(&path, vec![0x77u8; SIZE as usize]).unwrap();

    // Bytes reported written per pass.
    let mut per_pass: BTreeMap<u32, u64> = BTreeMap::new();
    wipe(&path, PASSES, 4096, &mut |pass, total_passes, total, done| {
        assert_eq!(total_passes, PASSES);
        assert_eq!(total, SIZE);
        per_pass
            .entry(pass)
            .and_modify(|max| *max = (*max).max(done))
            .or_insert(done);
    })
    .unwrap();

    assert!(!path.exists());
    assert_eq!(per_pass.len(), PASSES as usize);
    for (pass, covered) in per_pass {
        assert!(covered >= SIZE, "pass {pass} covered only {covered} bytes");
    }
}

#[test]
fn overwrite_replaces_content_before_delete() {
    // One pass over a small file through a large buffer: peek between the
    // overwrite and the delete by wiping a hard link's sibling path.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("original.txt");
    let original = vec![0x41u8; 2048];
    std::fs::write(&path, &original).unwrap();

    // Keep a second link so the inode survives the delete.
    let link = dir.path().join("peek.txt");
    std::fs::hard_link(&path, &link).unwrap();

    wipe(&path, 1, 4096, &mut |_, _, _, _| {}).unwrap();

    assert!(!path.exists());
    let after = std::fs::read(&link).unwrap();
    // The overwrite ran past the original length on purpose.
    assert!(after.len() >= original.len());
    assert_ne!(&after[..original.len()], &original[..]);
}
