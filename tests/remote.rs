use crate::common::command::{branch_tip, commit_file, repository_dir, run_bitlet_command};
use crate::common::file::read_file;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use std::path::PathBuf;

mod common;

/// A local and a remote repository side by side, with the remote registered as `R1`
struct Pair {
    _dir: TempDir,
    local: PathBuf,
    remote: PathBuf,
}

#[fixture]
fn pair(repository_dir: TempDir) -> Pair {
    let local = repository_dir.path().join("local");
    let remote = repository_dir.path().join("remote");

    for dir in [&local, &remote] {
        std::fs::create_dir_all(dir).unwrap();
        run_bitlet_command(dir, &["init"]).assert().success();
    }
    run_bitlet_command(&local, &["add-remote", "R1", "../remote/.gitlet"])
        .assert()
        .success();

    Pair {
        _dir: repository_dir,
        local,
        remote,
    }
}

#[rstest]
fn remote_registry_errors_are_reported(pair: Pair) {
    run_bitlet_command(&pair.local, &["add-remote", "R1", "../elsewhere"])
        .assert()
        .success()
        .stdout("A remote with that name already exists.\n");
    run_bitlet_command(&pair.local, &["rm-remote", "R2"])
        .assert()
        .success()
        .stdout("A remote with that name does not exist.\n");

    run_bitlet_command(&pair.local, &["rm-remote", "R1"])
        .assert()
        .success();
    run_bitlet_command(&pair.local, &["fetch", "R1", "master"])
        .assert()
        .success()
        .stdout("A remote with that name does not exist.\n");
}

#[rstest]
fn fetch_errors_are_reported(pair: Pair) {
    run_bitlet_command(&pair.local, &["add-remote", "ghost", "../missing"])
        .assert()
        .success();

    run_bitlet_command(&pair.local, &["fetch", "ghost", "master"])
        .assert()
        .success()
        .stdout("Remote directory not found.\n");
    run_bitlet_command(&pair.local, &["fetch", "R1", "nope"])
        .assert()
        .success()
        .stdout("That remote does not have that branch.\n");
}

#[rstest]
fn fetch_creates_a_remote_tracking_branch(pair: Pair) {
    commit_file(&pair.remote, "r.txt", "remote\n", "remote work");
    let remote_tip = branch_tip(&pair.remote, "master");

    run_bitlet_command(&pair.local, &["fetch", "R1", "master"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(branch_tip(&pair.local, "R1/master"), remote_tip);
    run_bitlet_command(&pair.local, &["checkout", "R1/master"])
        .assert()
        .success();
    assert_eq!(read_file(&pair.local.join("r.txt")), "remote\n");
}

#[rstest]
fn push_fast_forwards_the_remote_branch(pair: Pair) {
    commit_file(&pair.local, "l.txt", "local\n", "local work");
    let local_tip = branch_tip(&pair.local, "master");

    run_bitlet_command(&pair.local, &["push", "R1", "master"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(branch_tip(&pair.remote, "master"), local_tip);
    run_bitlet_command(&pair.remote, &["checkout", "--", "l.txt"])
        .assert()
        .success();
    assert_eq!(read_file(&pair.remote.join("l.txt")), "local\n");
}

#[rstest]
fn push_to_a_new_remote_branch_creates_it(pair: Pair) {
    commit_file(&pair.local, "l.txt", "local\n", "local work");

    run_bitlet_command(&pair.local, &["push", "R1", "topic"])
        .assert()
        .success();

    assert_eq!(
        branch_tip(&pair.remote, "topic"),
        branch_tip(&pair.local, "master")
    );
}

#[rstest]
fn diverged_push_is_rejected(pair: Pair) {
    commit_file(&pair.remote, "r.txt", "remote\n", "remote work");
    commit_file(&pair.local, "l.txt", "local\n", "local work");
    let remote_tip = branch_tip(&pair.remote, "master");

    run_bitlet_command(&pair.local, &["push", "R1", "master"])
        .assert()
        .success()
        .stdout("Please pull down remote changes before pushing.\n");

    assert_eq!(branch_tip(&pair.remote, "master"), remote_tip);
}

#[rstest]
fn pull_merges_the_remote_branch_then_push_succeeds(pair: Pair) {
    commit_file(&pair.remote, "r.txt", "remote\n", "remote work");
    commit_file(&pair.local, "l.txt", "local\n", "local work");

    run_bitlet_command(&pair.local, &["pull", "R1", "master"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(read_file(&pair.local.join("r.txt")), "remote\n");
    assert_eq!(read_file(&pair.local.join("l.txt")), "local\n");

    run_bitlet_command(&pair.local, &["push", "R1", "master"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert_eq!(
        branch_tip(&pair.remote, "master"),
        branch_tip(&pair.local, "master")
    );
}

#[rstest]
fn pull_into_an_empty_history_fast_forwards(pair: Pair) {
    commit_file(&pair.remote, "r.txt", "remote\n", "remote work");

    run_bitlet_command(&pair.local, &["pull", "R1", "master"])
        .assert()
        .success()
        .stdout("Current branch fast-forwarded.\n");

    assert_eq!(
        branch_tip(&pair.local, "master"),
        branch_tip(&pair.remote, "master")
    );
}
