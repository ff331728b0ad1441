//! tests/provider_tests.rs
//! The provider contract on both shipped implementations: a tempdir-backed
//! local tree and the in-memory map, plus decoding straight off a provider.

mod common;

use common::*;
use encfs_rs::{FileProvider, LocalFileProvider, MemoryProvider};
use std::io::{Read, Write};

const FILE_IV: [u8; 8] = [9, 8, 7, 6, 5, 4, 3, 2];

// —————————————————————————————————————————————————————————————————————————
// Local filesystem provider
// —————————————————————————————————————————————————————————————————————————

#[test]
fn local_create_exists_delete() {
    let dir = tempfile::tempdir().unwrap();
    let provider = LocalFileProvider::new(dir.path());

    assert!(!provider.exists("a.bin").unwrap());
    let info = provider.create_file("a.bin").unwrap();
    assert_eq!(info.name, "a.bin");
    assert_eq!(info.size, 0);
    assert!(!info.is_dir);
    assert!(provider.exists("a.bin").unwrap());

    // Creating over an existing path is refused.
    assert!(provider.create_file("a.bin").is_err());

    provider.delete("a.bin").unwrap();
    assert!(!provider.exists("a.bin").unwrap());
}

#[test]
fn local_parent_path_quirk() {
    let dir = tempfile::tempdir().unwrap();
    let provider = LocalFileProvider::new(dir.path());

    provider.mkdirs("sub/deeper").unwrap();
    provider.create_file("top.txt").unwrap();
    provider.create_file("sub/inner.txt").unwrap();
    provider.create_file("sub/deeper/leaf.txt").unwrap();

    // Root and direct children of the root both report "/".
    assert_eq!(provider.file_info("/").unwrap().parent_path, "/");
    assert_eq!(provider.file_info("top.txt").unwrap().parent_path, "/");
    assert_eq!(provider.file_info("sub").unwrap().parent_path, "/");

    // Deeper entries report their real parent.
    assert_eq!(provider.file_info("sub/inner.txt").unwrap().parent_path, "/sub");
    assert_eq!(
        provider.file_info("sub/deeper/leaf.txt").unwrap().parent_path,
        "/sub/deeper"
    );
}

#[test]
fn local_mkdir_requires_parent() {
    let dir = tempfile::tempdir().unwrap();
    let provider = LocalFileProvider::new(dir.path());

    assert!(provider.mkdir("missing/child").is_err());
    provider.mkdir("present").unwrap();
    provider.mkdir("present/child").unwrap();
    assert!(provider.is_directory("present/child").unwrap());

    provider.mkdirs("a/b/c").unwrap();
    assert!(provider.is_directory("a/b/c").unwrap());
}

#[test]
fn local_rename_copy_and_listing() {
    let dir = tempfile::tempdir().unwrap();
    let provider = LocalFileProvider::new(dir.path());

    provider
        .open_output("one.bin", 3)
        .unwrap()
        .write_all(b"abc")
        .unwrap();
    provider.copy("one.bin", "two.bin").unwrap();
    provider.rename("two.bin", "three.bin").unwrap();

    // Renaming something that isn't there is an error, not a false.
    assert!(provider.rename("two.bin", "four.bin").is_err());
    assert!(provider.copy("two.bin", "four.bin").is_err());

    let mut names: Vec<String> = provider
        .list_children("/")
        .unwrap()
        .into_iter()
        .map(|info| info.name)
        .collect();
    names.sort();
    assert_eq!(names, ["one.bin", "three.bin"]);

    let mut contents = String::new();
    provider
        .open_input("three.bin")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "abc");
    assert_eq!(provider.file_info("three.bin").unwrap().size, 3);
}

// —————————————————————————————————————————————————————————————————————————
// In-memory provider
// —————————————————————————————————————————————————————————————————————————

#[test]
fn memory_mirrors_the_contract() {
    let provider = MemoryProvider::new();

    assert!(provider.exists("/").unwrap());
    assert!(provider.is_directory("/").unwrap());
    assert!(!provider.exists("a.bin").unwrap());

    assert!(provider.mkdir("missing/child").is_err());
    provider.mkdirs("sub/deeper").unwrap();
    provider.create_file("sub/inner.txt").unwrap();
    assert!(provider.create_file("sub/inner.txt").is_err());

    assert_eq!(provider.file_info("sub/inner.txt").unwrap().parent_path, "/sub");
    assert_eq!(provider.file_info("sub").unwrap().parent_path, "/");

    // Non-empty directories don't delete.
    assert!(provider.delete("sub").is_err());
    provider.delete("sub/inner.txt").unwrap();
    provider.delete("sub/deeper").unwrap();
    provider.delete("sub").unwrap();
    assert!(!provider.exists("sub").unwrap());
}

#[test]
fn memory_output_commits_on_drop_and_flush() {
    let provider = MemoryProvider::new();

    {
        let mut sink = provider.open_output("data.bin", 0).unwrap();
        sink.write_all(b"first half ").unwrap();
        sink.flush().unwrap();
        assert_eq!(provider.file_info("data.bin").unwrap().size, 11);
        sink.write_all(b"second half").unwrap();
    } // drop commits the rest

    let mut contents = String::new();
    provider
        .open_input("data.bin")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "first half second half");
}

#[test]
fn memory_rename_moves_subtrees() {
    let provider = MemoryProvider::new();
    provider.insert("dir/a.bin", b"a".to_vec());
    provider.insert("dir/nested/b.bin", b"b".to_vec());

    provider.rename("dir", "moved").unwrap();

    assert!(!provider.exists("dir").unwrap());
    assert!(provider.exists("moved/a.bin").unwrap());
    assert!(provider.exists("moved/nested/b.bin").unwrap());

    let mut names: Vec<String> = provider
        .list_children("moved")
        .unwrap()
        .into_iter()
        .map(|info| info.name)
        .collect();
    names.sort();
    assert_eq!(names, ["a.bin", "nested"]);
}

// —————————————————————————————————————————————————————————————————————————
// Decoding straight off a provider
// —————————————————————————————————————————————————————————————————————————

#[test]
fn open_read_decodes_from_local_disk() {
    let dir = tempfile::tempdir().unwrap();
    let provider = LocalFileProvider::new(dir.path());
    let volume = volume(mac_config());

    let cipher_text = encrypt_file(&volume, FILE_IV, TEST_TEXT);
    provider.mkdirs("raw").unwrap();
    provider
        .open_output("raw/file.enc", cipher_text.len() as u64)
        .unwrap()
        .write_all(&cipher_text)
        .unwrap();

    let mut stream = volume.open_read(&provider, "raw/file.enc").unwrap();
    let mut plain = Vec::new();
    stream.read_to_end(&mut plain).unwrap();
    assert_eq!(plain, TEST_TEXT);
}

#[test]
fn open_read_decodes_from_memory() {
    let provider = MemoryProvider::new();
    let volume = volume(padded_mac_config());

    let plain: Vec<u8> = (0..600u16).map(|i| (i % 256) as u8).collect();
    provider.insert("vault/big.enc", encrypt_file(&volume, FILE_IV, &plain));

    let mut stream = volume.open_read(&provider, "vault/big.enc").unwrap();
    let mut decoded = Vec::new();
    stream.read_to_end(&mut decoded).unwrap();
    assert_eq!(decoded, plain);
}
