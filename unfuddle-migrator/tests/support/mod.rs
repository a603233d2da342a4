//! Recording fakes of the remote capabilities and backup builders.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use unfuddle_migrator::{
    Backup, IssueDraft, IssueState, IssueTracker, MigrationOptions, MilestoneState, NewMilestone,
    ObjectStore, RemoteMilestone, StorageError, StorageLayout, TrackerError,
};

/// Remote side effect observed by a fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ListMilestones,
    DeleteMilestone(u64),
    CreateMilestone { title: String, state: MilestoneState, number: u64 },
    CreateIssue { number: u64, draft: IssueDraft },
    EditIssue { number: u64, state: IssueState },
    CreateComment { number: u64, body: String, user: String },
    PutObject { bucket: String, key: String, content_type: String, size: usize },
}

/// Ordered log shared by the tracker and store fakes.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    pub fn record(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

/// Issue tracker fake that records every call.
pub struct FakeTracker {
    journal: Journal,
    existing: Mutex<Vec<RemoteMilestone>>,
    next_milestone: AtomicU64,
    next_issue: AtomicU64,
    fail_on: Option<&'static str>,
}

impl FakeTracker {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            existing: Mutex::new(Vec::new()),
            next_milestone: AtomicU64::new(1),
            next_issue: AtomicU64::new(1),
            fail_on: None,
        }
    }

    /// Milestones already present on the remote before the run.
    pub fn with_existing_milestones(self, milestones: &[(u64, &str)]) -> Self {
        *self.existing.lock().unwrap() = milestones
            .iter()
            .map(|(number, title)| RemoteMilestone {
                number: *number,
                title: title.to_string(),
            })
            .collect();
        self
    }

    /// First number handed out to created milestones.
    pub fn with_first_milestone_number(self, number: u64) -> Self {
        self.next_milestone.store(number, Ordering::SeqCst);
        self
    }

    /// Makes the named operation fail.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn remaining_milestones(&self) -> Vec<RemoteMilestone> {
        self.existing.lock().unwrap().clone()
    }

    fn check(&self, operation: &'static str) -> Result<(), TrackerError> {
        if self.fail_on == Some(operation) {
            return Err(TrackerError::Rejected {
                operation,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn list_milestones(
        &self,
        _state: MilestoneState,
        _per_page: u8,
    ) -> Result<Vec<RemoteMilestone>, TrackerError> {
        self.check("list_milestones")?;
        self.journal.record(Event::ListMilestones);
        Ok(self.existing.lock().unwrap().clone())
    }

    async fn delete_milestone(&self, number: u64) -> Result<(), TrackerError> {
        self.check("delete_milestone")?;
        self.journal.record(Event::DeleteMilestone(number));
        self.existing.lock().unwrap().retain(|m| m.number != number);
        Ok(())
    }

    async fn create_milestone(&self, milestone: &NewMilestone) -> Result<u64, TrackerError> {
        self.check("create_milestone")?;
        let number = self.next_milestone.fetch_add(1, Ordering::SeqCst);
        self.existing.lock().unwrap().push(RemoteMilestone {
            number,
            title: milestone.title.clone(),
        });
        self.journal.record(Event::CreateMilestone {
            title: milestone.title.clone(),
            state: milestone.state,
            number,
        });
        Ok(number)
    }

    async fn create_issue(&self, issue: &IssueDraft) -> Result<u64, TrackerError> {
        self.check("create_issue")?;
        let number = self.next_issue.fetch_add(1, Ordering::SeqCst);
        self.journal.record(Event::CreateIssue {
            number,
            draft: issue.clone(),
        });
        Ok(number)
    }

    async fn edit_issue(&self, number: u64, state: IssueState) -> Result<(), TrackerError> {
        self.check("edit_issue")?;
        self.journal.record(Event::EditIssue { number, state });
        Ok(())
    }

    async fn create_comment(
        &self,
        number: u64,
        body: &str,
        user: &str,
    ) -> Result<(), TrackerError> {
        self.check("create_comment")?;
        self.journal.record(Event::CreateComment {
            number,
            body: body.to_string(),
            user: user.to_string(),
        });
        Ok(())
    }
}

/// Object store fake with optional per-key latency.
pub struct FakeStore {
    journal: Journal,
    delays: HashMap<String, Duration>,
    fail_key: Option<String>,
}

impl FakeStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            delays: HashMap::new(),
            fail_key: None,
        }
    }

    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.fail_key = Some(key.to_string());
        self
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_key.as_deref() == Some(key) {
            return Err(StorageError::Rejected {
                key: key.to_string(),
                message: "injected failure".to_string(),
            });
        }
        self.journal.record(Event::PutObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
        });
        Ok(())
    }
}

/// Public URL of an attachment under [`layout`].
pub fn url(filename: &str) -> String {
    format!("http://bucket.s3.amazonaws.com/unfuddle_imports/{filename}")
}

pub fn layout() -> StorageLayout {
    StorageLayout::new("bucket", "unfuddle_imports", None)
}

pub fn options(backup: &Backup) -> MigrationOptions {
    MigrationOptions::new(layout(), "import-bot", backup.attachments_dir())
}

/// Writes a backup directory with the given project body and attachment files.
pub fn write_backup(project: &str, attachments: &[(&str, &str)]) -> (TempDir, Backup) {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("backup.xml"),
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<account><projects><project>{project}</project></projects></account>"
        ),
    )
    .unwrap();

    let dir = temp.path().join("media/attachments");
    fs::create_dir_all(&dir).unwrap();
    for (id, contents) in attachments {
        fs::write(dir.join(id), contents).unwrap();
    }

    let backup = Backup::load(temp.path()).unwrap();
    (temp, backup)
}

/// Loads the checked-in sample backup.
pub fn fixture_backup() -> Backup {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/backup");
    Backup::load(&root).unwrap()
}

/// A ticket element with the fields every ticket needs.
pub fn ticket(id: &str, status: &str, extra: &str) -> String {
    format!(
        "<ticket><id>{id}</id><summary>Ticket {id}</summary><description>Description {id}</description>\
<status>{status}</status><priority>3</priority>{extra}</ticket>"
    )
}

/// Formatted `INFO` log output collected from the current thread.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Routes this thread's events into the capture until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_max_level(Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Drains the captured lines.
    pub fn take_lines(&self) -> Vec<String> {
        let bytes = std::mem::take(&mut *self.0.lock().unwrap());
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
