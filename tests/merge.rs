use crate::common::command::{
    bitlet_add, branch_tip, commit_file, init_repository_dir, repository_dir, run_bitlet_command,
};
use crate::common::file::{FileSpec, delete_file, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

mod common;

fn fork(dir: &Path, branch: &str) {
    run_bitlet_command(dir, &["branch", branch]).assert().success();
}

fn switch(dir: &Path, branch: &str) {
    run_bitlet_command(dir, &["checkout", branch]).assert().success();
}

#[rstest]
fn merging_a_branch_with_itself_is_refused(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let tip = branch_tip(dir, "master");

    run_bitlet_command(dir, &["merge", "master"])
        .assert()
        .success()
        .stdout("Cannot merge a branch with itself.\n");
    assert_eq!(branch_tip(dir, "master"), tip);
}

#[rstest]
fn merge_precondition_errors_are_reported(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    fork(dir, "feature");

    run_bitlet_command(dir, &["merge", "nope"])
        .assert()
        .success()
        .stdout("A branch with that name does not exist.\n");

    write_file(FileSpec::new(dir.join("3.txt"), "three\n".to_string()));
    bitlet_add(dir, &["3.txt"]).assert().success();
    run_bitlet_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout("You have uncommitted changes.\n");
}

#[rstest]
fn merging_an_ancestor_changes_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    fork(dir, "old");
    commit_file(dir, "3.txt", "three\n", "add three");
    let tip = branch_tip(dir, "master");

    run_bitlet_command(dir, &["merge", "old"])
        .assert()
        .success()
        .stdout("Given branch is an ancestor of the current branch.\n");
    assert_eq!(branch_tip(dir, "master"), tip);
}

#[rstest]
fn merging_a_descendant_fast_forwards(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    fork(dir, "feature");
    switch(dir, "feature");
    commit_file(dir, "3.txt", "three\n", "add three");
    let feature_tip = branch_tip(dir, "feature");
    switch(dir, "master");

    run_bitlet_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout("Current branch fast-forwarded.\n");

    assert_eq!(branch_tip(dir, "master"), feature_tip);
    assert_eq!(read_file(&dir.join("3.txt")), "three\n");
    // no merge commit was created
    let global_log = run_bitlet_command(dir, &["global-log"]).output().unwrap().stdout;
    assert_eq!(String::from_utf8(global_log).unwrap().matches("===\n").count(), 3);
}

#[rstest]
fn hello_world_mars_produces_a_conflict(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_bitlet_command(dir, &["init"]).assert().success();
    commit_file(dir, "f.txt", "hello", "first");
    fork(dir, "b2");
    switch(dir, "b2");
    commit_file(dir, "f.txt", "world", "second");
    let b2_tip = branch_tip(dir, "b2");
    switch(dir, "master");
    commit_file(dir, "f.txt", "mars", "third");
    let master_tip = branch_tip(dir, "master");

    run_bitlet_command(dir, &["merge", "b2"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(&dir.join("f.txt")),
        "<<<<<<< HEAD\nmars\n=======\nworld\n>>>>>>>\n"
    );

    let merge_commit = branch_tip(dir, "master");
    run_bitlet_command(dir, &["cat-file", "-p", &merge_commit])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!(
            "parent {master_tip}\nparent {b2_tip}\n"
        )))
        .stdout(predicate::str::ends_with("\nMerged b2 into master."));

    // the conflicted content is what got committed
    run_bitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Modifications Not Staged For Commit ===\n\n=== Untracked Files ===\n\n",
        ));
}

#[rstest]
fn merge_applies_the_per_path_rule(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "keep.txt", "base\n", "base files");
    commit_file(dir, "gone.txt", "base\n", "more base files");
    fork(dir, "other");

    // master edits keep.txt, other deletes gone.txt and adds new.txt
    commit_file(dir, "keep.txt", "master edit\n", "master edit");
    switch(dir, "other");
    run_bitlet_command(dir, &["rm", "gone.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("new.txt"), "new\n".to_string()));
    bitlet_add(dir, &["new.txt"]).assert().success();
    run_bitlet_command(dir, &["commit", "other changes"])
        .assert()
        .success();
    switch(dir, "master");

    run_bitlet_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(read_file(&dir.join("keep.txt")), "master edit\n");
    assert_eq!(read_file(&dir.join("new.txt")), "new\n");
    assert!(!dir.join("gone.txt").exists());
    run_bitlet_command(dir, &["checkout", "--", "gone.txt"])
        .assert()
        .success()
        .stdout("File does not exist in that commit.\n");
}

#[rstest]
fn conflict_against_a_deleted_file_keeps_the_surviving_side(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    fork(dir, "other");
    commit_file(dir, "1.txt", "master one\n", "edit one");
    switch(dir, "other");
    run_bitlet_command(dir, &["rm", "1.txt"]).assert().success();
    run_bitlet_command(dir, &["commit", "drop one"])
        .assert()
        .success();
    switch(dir, "master");

    run_bitlet_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    assert_eq!(
        read_file(&dir.join("1.txt")),
        "<<<<<<< HEAD\nmaster one\n=======\n>>>>>>>\n"
    );
}

#[rstest]
fn untracked_file_in_the_way_blocks_the_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    fork(dir, "other");
    commit_file(dir, "m.txt", "m\n", "master work");
    switch(dir, "other");
    commit_file(dir, "f.txt", "from other\n", "other work");
    switch(dir, "master");
    let tip = branch_tip(dir, "master");

    write_file(FileSpec::new(dir.join("f.txt"), "mine\n".to_string()));

    run_bitlet_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout(
            "There is an untracked file in the way; delete it, or add and commit it first.\n",
        );
    assert_eq!(branch_tip(dir, "master"), tip);
    assert_eq!(read_file(&dir.join("f.txt")), "mine\n");

    delete_file(&dir.join("f.txt"));
    run_bitlet_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert_eq!(read_file(&dir.join("f.txt")), "from other\n");
}
