use crate::common::command::{
    branch_tip, commit_file, init_repository_dir, run_bitlet_command,
};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

fn stdout_of(dir: &std::path::Path, args: &[&str]) -> String {
    let output = run_bitlet_command(dir, args).output().unwrap();
    String::from_utf8(output.stdout).unwrap()
}

#[rstest]
fn log_prints_first_parent_history(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let tip = branch_tip(dir, "master");
    let root = stdout_of(dir, &["find", "initial commit"]).trim().to_string();

    let log = stdout_of(dir, &["log"]);

    assert_eq!(
        log,
        format!(
            "===\ncommit {tip}\nDate: Sat Jan 1 12:00:00 2022 +0000\nInitial commit\n\n\
             ===\ncommit {root}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n"
        )
    );
}

#[rstest]
fn log_shows_both_parents_of_a_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "feature"]).assert().success();
    commit_file(dir, "m.txt", "master\n", "master work");
    run_bitlet_command(dir, &["checkout", "feature"]).assert().success();
    commit_file(dir, "f.txt", "feature\n", "feature work");
    let feature_tip = branch_tip(dir, "feature");
    run_bitlet_command(dir, &["checkout", "master"]).assert().success();
    let master_tip = branch_tip(dir, "master");

    run_bitlet_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let log = stdout_of(dir, &["log"]);
    let entries = log.split("===\n").filter(|entry| !entry.is_empty()).collect::<Vec<_>>();

    assert!(entries[0].contains(&format!(
        "Merge: {} {}\n",
        &master_tip[..7],
        &feature_tip[..7]
    )));
    assert!(entries[0].ends_with("Merged feature into master.\n\n"));
    // the first-parent walk never enters the feature branch
    assert!(!log.contains("feature work"));
    assert_eq!(entries.len(), 4);
}

#[rstest]
fn global_log_lists_every_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_bitlet_command(dir, &["branch", "feature"]).assert().success();
    run_bitlet_command(dir, &["checkout", "feature"]).assert().success();
    commit_file(dir, "f.txt", "feature\n", "feature work");
    run_bitlet_command(dir, &["checkout", "master"]).assert().success();

    let global_log = stdout_of(dir, &["global-log"]);

    assert_eq!(global_log.matches("===\n").count(), 3);
    for message in ["initial commit", "Initial commit", "feature work"] {
        assert!(global_log.contains(&format!("{message}\n\n")));
    }
}

#[rstest]
fn find_prints_every_matching_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "x.txt", "x\n", "same message");
    let first = branch_tip(dir, "master");
    commit_file(dir, "y.txt", "y\n", "same message");
    let second = branch_tip(dir, "master");

    let mut expected = vec![first, second];
    expected.sort();

    run_bitlet_command(dir, &["find", "same message"])
        .assert()
        .success()
        .stdout(format!("{}\n{}\n", expected[0], expected[1]));
}

#[rstest]
fn find_without_match_is_reported(init_repository_dir: TempDir) {
    run_bitlet_command(init_repository_dir.path(), &["find", "no such message"])
        .assert()
        .success()
        .stdout("Found no commit with that message.\n");
}
