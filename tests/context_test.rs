// Context assembly over a realistic vault layout

use std::fs;
use tempfile::TempDir;
use vaultchat::config::constants::CONTEXT_TOKEN_CEILING;
use vaultchat::context::{estimate_tokens, ContextBuffer};

/// A vault mixing notes, attachments, and a subfolder.
fn build_vault() -> TempDir {
    let vault = TempDir::new().unwrap();
    fs::write(vault.path().join("01-inbox.md"), "inbox items").unwrap();
    fs::write(vault.path().join("02-projects.md"), "project list").unwrap();
    fs::write(vault.path().join("03-journal.txt"), "journal entry").unwrap();
    fs::write(vault.path().join("photo.png"), [0u8, 1, 2]).unwrap();
    fs::write(vault.path().join(".hidden.md.bak"), "backup").unwrap();

    let sub = vault.path().join("archive");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("old.md"), "archived note").unwrap();

    vault
}

#[test]
fn only_top_level_notes_in_name_order() {
    let vault = build_vault();

    let mut buffer = ContextBuffer::new();
    buffer.rebuild_from_folder(vault.path(), "summarize").unwrap();

    assert_eq!(buffer.included().len(), 3);
    assert!(!buffer.text().contains("archived note"), "no recursion");
    assert!(!buffer.text().contains("backup"));

    let inbox = buffer.text().find("inbox items").unwrap();
    let projects = buffer.text().find("project list").unwrap();
    let journal = buffer.text().find("journal entry").unwrap();
    assert!(inbox < projects && projects < journal);
}

#[test]
fn budget_property_holds_for_many_sizes() {
    for prompt_chars in [1usize, 500, 5_000, 40_000] {
        let vault = TempDir::new().unwrap();
        for i in 0..25 {
            fs::write(
                vault.path().join(format!("{i:02}.md")),
                "n".repeat(500 + i * 997),
            )
            .unwrap();
        }

        let prompt = "p".repeat(prompt_chars);
        let mut buffer = ContextBuffer::new();
        buffer.rebuild_from_folder(vault.path(), &prompt).unwrap();

        assert!(
            estimate_tokens(buffer.text()) + estimate_tokens(&prompt)
                <= CONTEXT_TOKEN_CEILING
                || buffer.text().is_empty(),
            "prompt of {prompt_chars} chars broke the budget"
        );
        assert_eq!(
            buffer.included().len() + buffer.dropped(),
            25,
            "every note is either included or counted as dropped"
        );
    }
}

#[test]
fn rebuilds_replace_across_sources() {
    let vault = build_vault();
    let single = TempDir::new().unwrap();
    let note = single.path().join("solo.md");
    fs::write(&note, "the only note").unwrap();

    let mut buffer = ContextBuffer::new();
    buffer.rebuild_from_folder(vault.path(), "q").unwrap();
    assert!(buffer.text().contains("inbox items"));

    buffer.rebuild_from_file(&note, "q").unwrap();
    assert_eq!(buffer.text(), "the only note");
    assert!(!buffer.text().contains("inbox items"));
}
