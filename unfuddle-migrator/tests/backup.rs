use std::path::PathBuf;

use unfuddle_migrator::{Backup, BackupError, SourceAttachment, TicketStatus};

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[test]
fn load_backup_from_fixture() {
    let backup = Backup::load(&fixtures_root().join("backup")).unwrap();
    let project = &backup.project;

    assert_eq!(project.components.len(), 2);
    assert_eq!(project.components[1].name, None);
    assert_eq!(project.field_values[0].value.as_deref(), Some("Bug"));

    assert_eq!(project.milestones.len(), 2);
    assert_eq!(project.milestones[0].title, "Launch");
    assert!(!project.milestones[0].completed);
    assert!(project.milestones[1].completed);
    assert_eq!(project.milestones[1].description, "");

    let cart = &project.tickets[0];
    assert_eq!(cart.id, "100");
    assert_eq!(cart.status, TicketStatus::Closed);
    assert_eq!(cart.description, "Totals ignore discounts & coupons");
    assert_eq!(cart.milestone_id.as_deref(), Some("5"));
    assert_eq!(cart.priority, 2);
    assert_eq!(cart.comments.len(), 2);
    assert_eq!(cart.comments[1].author_id.as_deref(), Some("77"));
    assert_eq!(
        cart.comments[1].attachments,
        vec![SourceAttachment {
            id: "901".to_string(),
            filename: "deploy.txt".to_string(),
        }]
    );

    let wishlist = &project.tickets[1];
    assert_eq!(wishlist.status, TicketStatus::New);
    assert_eq!(wishlist.assignee_id, None);
    assert_eq!(wishlist.milestone_id, None);
    assert_eq!(wishlist.resolution, None);
    assert!(wishlist.comments.is_empty());
}

#[test]
fn attachment_bytes_live_under_media_attachments() {
    let backup = Backup::load(&fixtures_root().join("backup")).unwrap();
    let attachment = &backup.project.tickets[0].attachments[0];

    let path = attachment.local_path(&backup.attachments_dir());
    assert!(path.ends_with("media/attachments/900"));
    assert_eq!(std::fs::read(path).unwrap(), b"PNGDATA");
}

#[test]
fn missing_backup_document_is_reported() {
    let result = Backup::load(&fixtures_root().join("does-not-exist"));
    assert!(matches!(result, Err(BackupError::IoError { .. })));
}
