//! Drives an editor the way a host does: events, ticks, persistence and a
//! final export, all against a file-backed store.

use std::fs;
use std::io::Cursor;
use std::rc::Rc;

use chrono::NaiveDate;
use draftpad_engine::{
    ClipboardItem, DirectorySink, Editor, EditorOptions, ExportOptions, FileStore, ManualClock,
    NotificationCenter, NotificationKind, Paragraph, Restoration, StoredDraft, export, run_export,
};
use tempfile::TempDir;

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([0, 0, 0]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn open(dir: &TempDir, clock: &ManualClock) -> Editor {
    Editor::open(
        Box::new(FileStore::new(dir.path())),
        Rc::new(clock.clone()),
        EditorOptions::default(),
    )
}

#[test]
fn type_paste_save_reopen_and_export() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(1_700_000_000_000);

    let mut editor = open(&dir, &clock);
    editor.type_text("Intro");
    editor.tick();
    let outcome = editor.paste(&[ClipboardItem::new("image/png", png(1200, 300))]);
    assert_eq!(outcome.widgets.len(), 1);
    assert_eq!(editor.tick().restored, Some(Restoration::Exact));
    editor.type_text("after the picture");

    clock.advance(1_000);
    assert!(editor.tick().saved);

    let stored = fs::read_to_string(dir.path().join("draftpad-content.json")).unwrap();
    let stored = StoredDraft::from_json(&stored).unwrap();
    assert_eq!(stored.content, editor.snapshot().content);

    let reopened = open(&dir, &clock);
    assert_eq!(reopened.snapshot().content, editor.snapshot().content);
    assert_eq!(reopened.tree().widgets().len(), 1);

    let document = export(reopened.snapshot(), &ExportOptions::default());
    assert_eq!(document.paragraphs.len(), 3);
    assert_eq!(document.paragraphs[0], Paragraph::text("Intro"));
    match &document.paragraphs[1] {
        Paragraph::Image(image) => assert_eq!((image.width, image.height), (600, 150)),
        other => panic!("expected image, got {other:?}"),
    }
    assert_eq!(document.paragraphs[2], Paragraph::text("after the picture"));

    let out = dir.path().join("exports");
    let mut sink = DirectorySink::new(&out);
    let mut notifier = NotificationCenter::new(Rc::new(clock.clone()), 3000);
    let name = run_export(
        reopened.snapshot(),
        &ExportOptions::default(),
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        &mut sink,
        &mut notifier,
    )
    .unwrap();
    assert_eq!(name, "draft-2024-05-01.docx");
    assert!(fs::read(out.join(&name)).unwrap().starts_with(b"PK"));
    assert_eq!(
        notifier.visible().map(|n| n.kind),
        Some(NotificationKind::Success)
    );
}

#[test]
fn clear_is_persisted_after_confirmation() {
    let dir = TempDir::new().unwrap();
    let clock = ManualClock::new(0);

    let mut editor = open(&dir, &clock);
    editor.type_text("temporary");
    editor.flush();

    editor.clear(&mut |_: &str| true);
    editor.flush();

    let reopened = open(&dir, &clock);
    assert!(reopened.tree().is_empty());
    assert_eq!(reopened.plain_text(), "");
}
