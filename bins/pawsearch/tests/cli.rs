use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const BREEDS: &str = "Golden Retriever\nGolden Retriever Mix\nLabrador Retriever\nPug\n";

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("breeds.txt"), BREEDS).unwrap();
    let config = format!(
        "[vocabulary]\nfile = \"{}\"\n\n[storage]\ndir = \"{}\"\n",
        dir.path().join("breeds.txt").display(),
        dir.path().join("store").display()
    );
    fs::write(dir.path().join(".pawsearch.toml"), config).unwrap();
    dir
}

fn pawsearch(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pawsearch").unwrap();
    cmd.current_dir(dir.path()).env_remove("PAWSEARCH_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn match_ranks_vocabulary() {
    let dir = workspace();
    pawsearch(&dir)
        .args(["match", "Golden"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Golden Retriever"))
        .stdout(predicate::str::contains("2. Golden Retriever Mix"));
}

#[test]
fn match_with_vocab_flag_and_scores() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("breeds.json"), r#"["Pug", "Beagle"]"#).unwrap();
    pawsearch(&dir)
        .args(["--vocab", "breeds.json", "match", "pug", "--scores"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Pug"))
        .stdout(predicate::str::contains("(100)"));
}

#[test]
fn match_without_results_exits_2() {
    let dir = workspace();
    pawsearch(&dir)
        .args(["match", "Labradoor"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Did you mean:"))
        .stdout(predicate::str::contains("Labrador Retriever"));
}

#[test]
fn did_you_mean_json() {
    let dir = workspace();
    pawsearch(&dir)
        .args(["--format", "json", "did-you-mean", "Labradoor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Labrador Retriever\""));
}

#[test]
fn distance_kitten_sitting() {
    let dir = TempDir::new().unwrap();
    pawsearch(&dir)
        .args(["distance", "kitten", "sitting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("distance:   3"));
}

#[test]
fn missing_config_exits_3() {
    let dir = TempDir::new().unwrap();
    pawsearch(&dir)
        .args(["--config", "nope.toml", "distance", "a", "b"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("E3001"));
}

#[test]
fn empty_vocabulary_exits_3() {
    let dir = TempDir::new().unwrap();
    pawsearch(&dir)
        .args(["match", "pug"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No vocabulary terms"));
}

#[test]
fn interactive_search_is_remembered() {
    let dir = workspace();
    pawsearch(&dir)
        .args(["--format", "json", "interactive"])
        .write_stdin("Golden\n:enter\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"event":"search","text":"Golden"}"#));

    pawsearch(&dir)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Golden"));

    pawsearch(&dir).args(["history", "clear"]).assert().success();

    pawsearch(&dir)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No search history"));
}

#[test]
fn interactive_wait_lets_selection_follow_results() {
    let dir = workspace();
    pawsearch(&dir)
        .args(["--format", "json", "interactive"])
        .write_stdin("gold\n:wait\n:next\n:enter\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"event":"select","text":"Golden Retriever"}"#));
}

#[test]
fn interactive_trailing_blur_closes_before_exit() {
    let dir = workspace();
    let output = pawsearch(&dir)
        .args(["--format", "json", "interactive"])
        .write_stdin("gold\n:wait\n:blur\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let last = stdout.lines().last().unwrap();
    assert!(last.contains(r#""state":{"state":"closed"}"#), "{last}");
}

#[test]
fn interactive_verbose_prints_metrics() {
    let dir = workspace();
    pawsearch(&dir)
        .args(["--verbose", "interactive"])
        .write_stdin("gold\n:wait\n:quit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("typeahead.resolves"));
}
