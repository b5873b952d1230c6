//! Integration tests for the editor crate

use folio_editor::{
    DocumentStore, EditSession, EditorError, Intent, RecentReports, ReportDocument, INITIAL_SECTION_ID,
};
use folio_model::{BlockId, BlockKind, BlockPatch, Forest};
use serde_json::json;

fn add(session: &mut EditSession, kind: BlockKind) -> BlockId {
    let change = session
        .dispatch(Intent::AddBlock {
            section: INITIAL_SECTION_ID.to_string(),
            kind,
            container_id: None,
            column_index: None,
        })
        .unwrap()
        .unwrap();
    let last = change.forest.len() - 1;
    change.forest.get(last).unwrap().id().clone()
}

fn root_ids(session: &EditSession) -> Vec<String> {
    let forest: &Forest = session.document.store().get(INITIAL_SECTION_ID).unwrap();
    forest.root_ids().into_iter().map(String::from).collect()
}

#[test]
fn test_drag_reorder_flow() {
    let mut session = EditSession::new("client", ReportDocument::new("Title"));
    let layout = root_ids(&session)[0].clone();
    let a = add(&mut session, BlockKind::Text);
    let b = add(&mut session, BlockKind::Table);

    // drag b onto the layout: b lands first
    session
        .dispatch(Intent::DragStart { section: INITIAL_SECTION_ID.into(), id: b.clone() })
        .unwrap();
    let change = session
        .dispatch(Intent::DropOnBlock { section: INITIAL_SECTION_ID.into(), target_id: layout.as_str().into() })
        .unwrap()
        .expect("drop produces a new forest");
    assert_eq!(change.forest.root_ids(), vec![b.as_str(), layout.as_str(), a.as_str()]);
    assert!(!session.drag_state().is_dragging());

    // drag b onto the container: back to the end
    session
        .dispatch(Intent::DragStart { section: INITIAL_SECTION_ID.into(), id: b.clone() })
        .unwrap();
    session
        .dispatch(Intent::DropOnContainer { section: INITIAL_SECTION_ID.into() })
        .unwrap();
    assert_eq!(root_ids(&session), vec![layout.clone(), a.to_string(), b.to_string()]);

    // dropping a block on itself changes nothing
    session
        .dispatch(Intent::DragStart { section: INITIAL_SECTION_ID.into(), id: a.clone() })
        .unwrap();
    let change = session
        .dispatch(Intent::DropOnBlock { section: INITIAL_SECTION_ID.into(), target_id: a.clone() })
        .unwrap();
    assert!(change.is_none());
}

#[test]
fn test_replay_from_json() {
    let mut session = EditSession::new("client", ReportDocument::new("Title"));
    let layout = root_ids(&session)[0].clone();

    let intents: Vec<Intent> = serde_json::from_value(json!([
        { "intent": "addBlock", "section": INITIAL_SECTION_ID, "kind": "subheader",
          "containerId": layout, "columnIndex": 0 },
        { "intent": "addBlock", "section": INITIAL_SECTION_ID, "kind": "text",
          "containerId": layout, "columnIndex": 7 },
        { "intent": "dropOnBlock", "section": INITIAL_SECTION_ID, "targetId": layout },
        { "intent": "deleteBlock", "section": INITIAL_SECTION_ID, "id": "no-such-block" }
    ]))
    .unwrap();

    let changes = session.replay(intents).unwrap();
    // the out-of-range column falls back to column 0; the drop and the
    // stale delete change nothing
    assert_eq!(changes.len(), 2);
    let forest = session.document.store().get(INITIAL_SECTION_ID).unwrap();
    let column = &forest.find(&layout).unwrap().as_layout().unwrap().children[0];
    assert_eq!(column.len(), 2);
    assert_eq!(changes[1].version, changes[0].version + 1);
}

#[test]
fn test_update_with_wrong_variant_is_ignored() {
    let mut session = EditSession::new("client", ReportDocument::new("Title"));
    let table = add(&mut session, BlockKind::Table);
    let before = session.document.store().get(INITIAL_SECTION_ID).unwrap().clone();

    let change = session
        .dispatch(Intent::UpdateBlock {
            section: INITIAL_SECTION_ID.into(),
            id: table,
            patch: BlockPatch::content(BlockKind::Text, "not a table").unwrap(),
        })
        .unwrap();
    assert!(change.is_none());
    assert_eq!(session.document.store().get(INITIAL_SECTION_ID).unwrap(), &before);
}

#[test]
fn test_subscriber_sees_every_replacement() {
    let mut store = DocumentStore::with_initial_section("Title");
    let rx = store.subscribe();

    let second = store.add_section("Second");
    store.replace(INITIAL_SECTION_ID, Forest::new());

    let received: Vec<_> = rx.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].section_id, second);
    assert_eq!(received[1].section_id, INITIAL_SECTION_ID);
    assert!(received[1].forest.is_empty());
    assert!(received[0].version < received[1].version);
}

#[test]
fn test_save_and_load_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.json");

    let mut session = EditSession::new("client", ReportDocument::new("Findings"));
    add(&mut session, BlockKind::ImageGrid);
    add(&mut session, BlockKind::Layout);
    let store = session.document.store_mut();
    let deleted = store.add_section("Scratch");
    store.delete_section(&deleted)?;
    store.set_field("clientName", json!("ACME"));
    session.document.save_as(&path)?;
    assert!(!session.document.is_dirty());

    let loaded = ReportDocument::load(&path)?;
    assert_eq!(loaded.path.as_deref(), Some(path.as_path()));
    assert_eq!(loaded.store().sections(), session.document.store().sections());
    assert_eq!(
        loaded.store().get(INITIAL_SECTION_ID),
        session.document.store().get(INITIAL_SECTION_ID)
    );
    assert_eq!(loaded.store().field("clientName"), Some(&json!("ACME")));
    assert_eq!(loaded.store().title(INITIAL_SECTION_ID), Some("Findings"));

    // the deleted section's blocks survive as a plain field
    assert!(loaded.store().field(&deleted).is_some());
    assert_eq!(loaded.to_file()?, session.document.to_file()?);
    Ok(())
}

#[test]
fn test_recent_reports_persist() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("recent.json");

    let document = ReportDocument::new("Title");
    let mut recent = RecentReports::load(&path, 2)?;
    recent.record("first", document.to_file()?);
    recent.record("second", document.to_file()?);
    recent.record("third", document.to_file()?);
    recent.save(&path)?;

    let reloaded = RecentReports::load(&path, 2)?;
    assert_eq!(reloaded, recent);
    assert_eq!(reloaded.entries()[0].name, "third");
    assert!(reloaded.find("first").is_none());
    Ok(())
}

#[test]
fn test_locked_section_refuses_intents() {
    let mut session = EditSession::new("client", ReportDocument::new("Title"));
    session.document.store_mut().toggle_lock(INITIAL_SECTION_ID).unwrap();

    let result = session.dispatch(Intent::AddBlock {
        section: INITIAL_SECTION_ID.to_string(),
        kind: BlockKind::Text,
        container_id: None,
        column_index: None,
    });
    assert!(matches!(result, Err(EditorError::SectionLocked(_))));
}
