use crate::common::COMMIT_DATE;
use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with `1.txt` and `a/2.txt` committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_bitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n".to_string(),
    ));

    bitlet_add(repository_dir.path(), &["1.txt", "a/2.txt"])
        .assert()
        .success();
    bitlet_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

pub fn run_bitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bitlet").expect("Failed to find bitlet binary");
    cmd.envs(vec![
        ("NO_PAGER", "1"),
        ("NO_COLOR", "1"),
        ("BITLET_COMMIT_DATE", COMMIT_DATE),
    ]);
    cmd.env_remove("BITLET_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn bitlet_add(dir: &Path, files: &[&str]) -> Command {
    let mut args = vec!["add"];
    args.extend_from_slice(files);
    run_bitlet_command(dir, &args)
}

pub fn bitlet_commit(dir: &Path, message: &str) -> Command {
    run_bitlet_command(dir, &["commit", message])
}

/// Write a file, stage it and commit it
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(file), content.to_string()));
    bitlet_add(dir, &[file]).assert().success();
    bitlet_commit(dir, message).assert().success();
}

/// Commit ID a branch points at, read straight from the refs directory
pub fn branch_tip(dir: &Path, branch: &str) -> String {
    let ref_path = dir.join(".gitlet").join("refs").join("heads").join(branch);
    std::fs::read_to_string(&ref_path)
        .unwrap_or_else(|e| panic!("Failed to read ref {:?}: {}", ref_path, e))
        .trim()
        .to_string()
}
