//! Integration tests for the complete parley pipeline
//!
//! These tests drive whole lines through a shell built with `build_shell`:
//! - English utterance → pattern table → adapter → literal command → filesystem
//! - literal commands and English sharing one session
//! - free-text routing the way the HTTP transport applies it
//!
//! Run with: cargo test --test integration_tests

use std::fs;

use anyhow::Result;
use parley_nl::{build_shell, route_free_text};
use parley_shell::{Output, Session};
use tempfile::tempdir;

fn text(output: Output) -> String {
    match output {
        Output::Text(text) => text,
        other => panic!("expected text, got {other:?}"),
    }
}

// ============================================================================
// Resolution front door
// ============================================================================

#[test]
fn blank_utterance_asks_for_input() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    let mut session = Session::new(dir.path());
    let out = text(shell.execute_line(&mut session, "nlp    "));
    assert_eq!(
        out,
        "Please enter a natural language command. Type 'nlp help' for examples."
    );
    Ok(())
}

#[test]
fn help_keyword_lists_examples_in_any_case() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    let mut session = Session::new(dir.path());
    for line in ["nlp help", "nlp HELP", "nlp Examples"] {
        let out = text(shell.execute_line(&mut session, line));
        assert!(out.starts_with("Natural Language Command Examples:"), "{line}");
    }
    // Nothing was dispatched beyond the `nlp` lines themselves.
    assert_eq!(session.history().len(), 3);
    Ok(())
}

#[test]
fn unknown_utterance_is_echoed() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    let mut session = Session::new(dir.path());
    let out = text(shell.execute_line(&mut session, "nlp frobnicate the zonkulator"));
    assert!(out.contains("'frobnicate the zonkulator'"));
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

// ============================================================================
// Delegating adapters
// ============================================================================

#[test]
fn folder_names_with_spaces_stay_one_argument() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    let mut session = Session::new(dir.path());

    shell.execute_line(&mut session, "nlp create a new folder called Projects Folder");

    assert!(dir.path().join("Projects Folder").is_dir());
    assert!(!dir.path().join("Projects").exists());
    assert_eq!(
        session.history(),
        [
            "nlp create a new folder called Projects Folder".to_string(),
            "mkdir 'Projects Folder'".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn listing_uses_the_slot_or_the_current_directory() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("Downloads"))?;
    fs::write(dir.path().join("Downloads/song.mp3"), b"")?;
    fs::write(dir.path().join("top.txt"), b"")?;
    let mut session = Session::new(dir.path());

    let inside = text(shell.execute_line(&mut session, "nlp show files in Downloads"));
    assert_eq!(inside, "song.mp3");

    let here = text(shell.execute_line(&mut session, "nlp show files in"));
    assert_eq!(here.lines().collect::<Vec<_>>(), ["Downloads/", "top.txt"]);
    assert_eq!(session.history().last().map(String::as_str), Some("ls ."));
    Ok(())
}

// ============================================================================
// Direct adapters
// ============================================================================

#[test]
fn move_into_an_existing_directory_joins_the_name() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("Documents"))?;
    fs::write(dir.path().join("report.pdf"), b"%PDF")?;
    let mut session = Session::new(dir.path());

    let out = text(shell.execute_line(&mut session, "nlp move report.pdf to Documents"));

    assert_eq!(out, "Moved report.pdf to Documents");
    assert!(dir.path().join("Documents/report.pdf").is_file());
    assert!(!dir.path().join("report.pdf").exists());
    Ok(())
}

#[test]
fn move_to_a_missing_destination_is_a_literal_path() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    fs::write(dir.path().join("report.pdf"), b"%PDF")?;
    let mut session = Session::new(dir.path());

    shell.execute_line(&mut session, "nlp move report.pdf to Documents");

    let moved = dir.path().join("Documents");
    assert!(moved.is_file());
    assert_eq!(fs::read(moved)?, b"%PDF");
    Ok(())
}

#[test]
fn failed_transfers_are_reported_as_text() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    let mut session = Session::new(dir.path());

    let out = text(shell.execute_line(&mut session, "nlp copy file ghost.txt to Backup"));

    assert!(out.starts_with("Error copying ghost.txt to Backup:"), "{out}");
    assert!(!dir.path().join("Backup").exists());
    Ok(())
}

// ============================================================================
// One session across English and literal lines
// ============================================================================

#[test]
fn navigation_carries_over_to_literal_commands() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    let root = dir.path().canonicalize()?;
    fs::create_dir(root.join("Projects"))?;
    let mut session = Session::new(&root);

    shell.execute_line(&mut session, "nlp go to Projects");
    shell.execute_line(&mut session, "touch plan.md");

    assert_eq!(text(shell.execute_line(&mut session, "pwd")), root.join("Projects").display().to_string());
    assert!(root.join("Projects/plan.md").is_file());
    Ok(())
}

#[test]
fn routed_free_text_reaches_the_resolver() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    let mut session = Session::new(dir.path());

    let line = route_free_text(&shell, "create a new file called todo.txt");
    assert_eq!(line, "nlp create a new file called todo.txt");
    shell.execute_line(&mut session, &line);
    assert!(dir.path().join("todo.txt").is_file());

    // A leading command name wins, even when the rest reads like English.
    assert_eq!(route_free_text(&shell, "ls it all"), "ls it all");
    Ok(())
}

#[test]
fn exit_and_clear_are_signals_not_text() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    let mut session = Session::new(dir.path());

    assert!(matches!(shell.execute_line(&mut session, "nlp clear the screen"), Output::Clear));
    assert!(matches!(shell.execute_line(&mut session, "nlp exit terminal"), Output::Exit));
    Ok(())
}

#[test]
fn routed_blank_slots_never_touch_the_working_directory() -> Result<()> {
    let shell = build_shell()?;
    let dir = tempdir()?;
    fs::write(dir.path().join("keep.txt"), b"keep")?;
    let mut session = Session::new(dir.path());

    // Quoted blanks survive tokenizing and reach the slots as whitespace.
    for typed in [
        "\"delete  !\"",
        "delete '  '",
        "move ' ' to Elsewhere",
        "copy ' ' to Elsewhere",
    ] {
        let line = route_free_text(&shell, typed);
        let out = text(shell.execute_line(&mut session, &line));
        assert!(out.starts_with("No "), "{typed}: {out}");
    }

    assert!(dir.path().join("keep.txt").is_file());
    assert!(!dir.path().join("Elsewhere").exists());
    assert!(session.history().iter().all(|line| line.starts_with("nlp ")));
    Ok(())
}
