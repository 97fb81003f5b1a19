//! Integration tests for the `pgn-replay` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn pgn_replay() -> Command {
    Command::cargo_bin("pgn-replay").expect("binary exists")
}

fn pgn_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write pgn");
    file
}

#[test]
fn replays_a_game_and_prints_the_final_position() {
    let file = pgn_file("[Event \"?\"]\n1. e4 e5 2. Nf3 *\n");
    pgn_replay()
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("bR|bN|bB|bQ|bK|bB|bN|bR"))
        .stdout(predicate::str::contains("wR|wN|wB|wQ|wK|wB|  |wR"));
}

#[test]
fn unresolvable_move_exits_nonzero() {
    let file = pgn_file("1. Qd4\n");
    pgn_replay()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to replay"));
}

#[test]
fn missing_file_exits_nonzero() {
    pgn_replay()
        .arg("no-such-file.pgn")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}

#[test]
fn missing_argument_exits_nonzero() {
    pgn_replay().assert().failure();
}
