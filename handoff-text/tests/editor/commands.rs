//! Editing sessions driven through `EditorCommand`, checked by their export.

use handoff_text::{
    to_storage, Editor, EditorCommand, FormatTag, HeadingLevel, ListKind, Position, Range,
};

fn run(editor: &mut Editor, commands: Vec<EditorCommand>) {
    for command in commands {
        editor.handle_command(command).unwrap();
    }
}

#[test]
fn test_typed_handoff_exports_rich_markup() {
    let mut editor = Editor::new();
    run(
        &mut editor,
        vec![
            EditorCommand::InsertText("Shift Notes\nStatus: OK\nA\nB".to_string()),
            EditorCommand::MoveTo(Position::new(1, 0)),
            EditorCommand::SetHeading(HeadingLevel::H2),
            EditorCommand::Select(Range::on_line(2, 0, 6)),
            EditorCommand::ToggleBold,
            EditorCommand::Select(Range::new(Position::new(3, 0), Position::new(4, 1))),
            EditorCommand::SetList(ListKind::Bullet),
        ],
    );

    assert_eq!(
        to_storage(editor.document()).unwrap(),
        "<h2>Shift Notes</h2>\n<p><strong>Status:</strong> OK</p>\n<ul><li>A</li><li>B</li></ul>"
    );
}

#[test]
fn test_pending_format_while_typing() {
    let mut editor = Editor::new();
    run(
        &mut editor,
        vec![
            EditorCommand::ToggleBold,
            EditorCommand::InsertText("Status:".to_string()),
            EditorCommand::ToggleBold,
            EditorCommand::InsertText(" OK".to_string()),
        ],
    );

    assert_eq!(
        to_storage(editor.document()).unwrap(),
        "<p><strong>Status:</strong> OK</p>"
    );
}

#[test]
fn test_new_line_inherits_list_slot() {
    let mut editor = Editor::new();
    run(
        &mut editor,
        vec![
            EditorCommand::InsertText("first".to_string()),
            EditorCommand::SetList(ListKind::Numbered),
            EditorCommand::InsertText("\nsecond".to_string()),
        ],
    );

    assert_eq!(
        to_storage(editor.document()).unwrap(),
        "<ol><li>first</li><li>second</li></ol>"
    );
}

#[test]
fn test_deleting_across_lines_keeps_first_line_slots() {
    let mut editor = Editor::new();
    run(
        &mut editor,
        vec![
            EditorCommand::InsertText("Title\nbody".to_string()),
            EditorCommand::MoveTo(Position::new(1, 0)),
            EditorCommand::SetHeading(HeadingLevel::H1),
            EditorCommand::Select(Range::new(Position::new(1, 5), Position::new(2, 0))),
            EditorCommand::DeleteSelection,
        ],
    );

    assert_eq!(editor.document().text(), "Titlebody");
    assert_eq!(to_storage(editor.document()).unwrap(), "<h1>Titlebody</h1>");
}

#[test]
fn test_clear_formatting_on_selection() {
    let mut editor = Editor::new();
    run(
        &mut editor,
        vec![
            EditorCommand::InsertText("loud".to_string()),
            EditorCommand::Select(Range::on_line(1, 0, 4)),
            EditorCommand::ToggleBold,
            EditorCommand::ToggleUnderline,
            EditorCommand::SetHeading(HeadingLevel::H3),
            EditorCommand::ClearFormatting,
        ],
    );

    assert!(editor
        .tags_at(Position::new(1, 1))
        .unwrap()
        .is_empty());
    assert_eq!(to_storage(editor.document()).unwrap(), "<p>loud</p>");
}

#[test]
fn test_failed_command_leaves_document_unchanged() {
    let mut editor = Editor::new();
    editor
        .handle_command(EditorCommand::InsertText("abc".to_string()))
        .unwrap();
    let before = editor.document().clone();

    let result = editor.toggle(FormatTag::Bold, Range::on_line(1, 0, 9));

    assert!(result.is_err());
    assert_eq!(editor.document(), &before);
}
