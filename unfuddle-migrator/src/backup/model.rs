//! Typed source entities read from the backup.
//!
//! Relationships between entities (ticket to milestone, comment to author)
//! are plain identifiers. They are resolved later through lookup tables and
//! may dangle.

use super::error::BackupError;
use super::xml::XmlNode;
use std::fmt;
use std::path::{Path, PathBuf};

/// A project component, used as a label source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComponent {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A value of the project's first custom field, used as a label source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFieldValue {
    pub id: Option<String>,
    pub value: Option<String>,
}

/// A project milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMilestone {
    pub id: String,
    pub title: String,
    /// Only a literal `false` keeps a milestone open.
    pub completed: bool,
    pub description: String,
}

/// A file attached to a ticket or comment.
///
/// The bytes live in the backup's attachment directory under [`Self::id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttachment {
    pub id: String,
    pub filename: String,
}

impl SourceAttachment {
    /// Location of the attachment's bytes inside an attachment directory.
    #[must_use]
    pub fn local_path(&self, attachments_dir: &Path) -> PathBuf {
        attachments_dir.join(&self.id)
    }
}

/// A comment on a ticket. Order within the ticket is creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComment {
    pub id: String,
    pub author_id: Option<String>,
    pub created_at: String,
    pub body: String,
    pub attachments: Vec<SourceAttachment>,
}

/// Workflow status of a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketStatus {
    New,
    Unaccepted,
    Accepted,
    Reassigned,
    Reopened,
    Resolved,
    Closed,
    /// Any status this tool does not know about.
    Other(String),
}

impl TicketStatus {
    /// Parses an Unfuddle status string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "new" => Self::New,
            "unaccepted" => Self::Unaccepted,
            "accepted" => Self::Accepted,
            "reassigned" => Self::Reassigned,
            "reopened" => Self::Reopened,
            "resolved" => Self::Resolved,
            "closed" => Self::Closed,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Returns true when the remote issue must be closed after migration.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Unaccepted => write!(f, "unaccepted"),
            Self::Accepted => write!(f, "accepted"),
            Self::Reassigned => write!(f, "reassigned"),
            Self::Reopened => write!(f, "reopened"),
            Self::Resolved => write!(f, "resolved"),
            Self::Closed => write!(f, "closed"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

/// A ticket to be migrated into one remote issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTicket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub assignee_id: Option<String>,
    pub milestone_id: Option<String>,
    pub component_id: Option<String>,
    pub field_value_id: Option<String>,
    pub priority: u32,
    pub resolution: Option<String>,
    pub comments: Vec<SourceComment>,
    pub attachments: Vec<SourceAttachment>,
}

/// The single project contained in a backup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceProject {
    pub components: Vec<SourceComponent>,
    pub field_values: Vec<SourceFieldValue>,
    pub milestones: Vec<SourceMilestone>,
    pub tickets: Vec<SourceTicket>,
}

impl SourceProject {
    /// Maps a `<project>` element into typed entities.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError`] when a required ticket, comment, attachment or
    /// milestone field is missing or malformed.
    pub fn from_node(project: &XmlNode) -> Result<Self, BackupError> {
        let components = section(project, &["components"], "component")
            .map(|node| SourceComponent {
                id: node.field("id").map(str::to_string),
                name: node.field("name").map(str::to_string),
            })
            .collect();

        let field_values = section(
            project,
            &["custom-field-values", "custom_field_values"],
            "custom-field-value",
        )
        .map(|node| SourceFieldValue {
            id: node.field("id").map(str::to_string),
            value: node.field("value").map(str::to_string),
        })
        .collect();

        let milestones = section(project, &["milestones"], "milestone")
            .map(parse_milestone)
            .collect::<Result<_, _>>()?;

        let tickets = section(project, &["tickets"], "ticket")
            .map(parse_ticket)
            .collect::<Result<_, _>>()?;

        Ok(Self {
            components,
            field_values,
            milestones,
            tickets,
        })
    }
}

/// Iterates the entries of a list section, trying each container spelling.
fn section<'a>(
    parent: &'a XmlNode,
    containers: &'a [&'a str],
    entry: &'a str,
) -> impl Iterator<Item = &'a XmlNode> + 'a {
    containers
        .iter()
        .flat_map(move |container| parent.children_named(*container))
        .flat_map(move |container| container.children_named(entry))
}

fn required<'a>(
    node: &'a XmlNode,
    entity: &'static str,
    id: &str,
    field: &'static str,
) -> Result<&'a str, BackupError> {
    node.field(field).ok_or_else(|| BackupError::MissingField {
        entity,
        id: id.to_string(),
        field,
    })
}

fn entity_id(node: &XmlNode, entity: &'static str) -> Result<String, BackupError> {
    required(node, entity, "?", "id").map(str::to_string)
}

fn parse_milestone(node: &XmlNode) -> Result<SourceMilestone, BackupError> {
    let id = entity_id(node, "milestone")?;
    let title = node
        .text_field("title")
        .ok_or_else(|| BackupError::MissingField {
            entity: "milestone",
            id: id.clone(),
            field: "title",
        })?
        .to_string();

    Ok(SourceMilestone {
        completed: node.field("completed") != Some("false"),
        description: node.text_field("description").unwrap_or_default().to_string(),
        title,
        id,
    })
}

fn parse_attachments(node: &XmlNode) -> Result<Vec<SourceAttachment>, BackupError> {
    section(node, &["attachments"], "attachment")
        .map(|attachment| {
            let id = entity_id(attachment, "attachment")?;
            let filename = required(attachment, "attachment", &id, "filename")?.to_string();
            Ok(SourceAttachment { id, filename })
        })
        .collect()
}

fn parse_comment(node: &XmlNode) -> Result<SourceComment, BackupError> {
    let id = entity_id(node, "comment")?;
    Ok(SourceComment {
        author_id: node.field("author-id").map(str::to_string),
        created_at: node.field("created-at").unwrap_or_default().to_string(),
        body: node.text_field("body").unwrap_or_default().to_string(),
        attachments: parse_attachments(node)?,
        id,
    })
}

fn parse_ticket(node: &XmlNode) -> Result<SourceTicket, BackupError> {
    let id = entity_id(node, "ticket")?;
    let title = node
        .text_field("summary")
        .ok_or_else(|| BackupError::MissingField {
            entity: "ticket",
            id: id.clone(),
            field: "summary",
        })?
        .to_string();

    let raw_priority = required(node, "ticket", &id, "priority")?;
    let priority = raw_priority
        .parse::<u32>()
        .map_err(|_| BackupError::InvalidValue {
            entity: "ticket",
            id: id.clone(),
            field: "priority",
            value: raw_priority.to_string(),
        })?;

    let comments = section(node, &["comments"], "comment")
        .map(parse_comment)
        .collect::<Result<_, _>>()?;

    Ok(SourceTicket {
        title,
        description: node.text_field("description").unwrap_or_default().to_string(),
        status: TicketStatus::parse(node.field("status").unwrap_or_default()),
        assignee_id: node.field("assignee-id").map(str::to_string),
        milestone_id: node.field("milestone-id").map(str::to_string),
        component_id: node.field("component-id").map(str::to_string),
        field_value_id: node.field("field1-value-id").map(str::to_string),
        priority,
        resolution: node
            .text_field("resolution-description")
            .map(str::to_string),
        comments,
        attachments: parse_attachments(node)?,
        id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::xml::parse_document;

    fn project(xml: &str) -> Result<SourceProject, BackupError> {
        SourceProject::from_node(&parse_document(xml).unwrap())
    }

    #[test]
    fn parses_ticket_with_comments_and_attachments() {
        let project = project(
            r#"<project>
  <tickets>
    <ticket>
      <id>7</id>
      <summary>Broken login</summary>
      <description>Steps to reproduce</description>
      <status>closed</status>
      <assignee-id>42</assignee-id>
      <milestone-id nil="true"></milestone-id>
      <component-id>3</component-id>
      <field1-value-id></field1-value-id>
      <priority>2</priority>
      <resolution-description>Fixed in r12</resolution-description>
      <attachments>
        <attachment><id>900</id><filename>trace.txt</filename></attachment>
      </attachments>
      <comments>
        <comment>
          <id>1</id><author-id>42</author-id><created-at>2012-01-01T10:00:00Z</created-at>
          <body>First</body>
          <attachments>
</attachments>
        </comment>
        <comment>
          <id>2</id><author-id>43</author-id><created-at>2012-01-02T10:00:00Z</created-at>
          <body>Second</body>
        </comment>
      </comments>
    </ticket>
  </tickets>
</project>"#,
        )
        .unwrap();

        let ticket = &project.tickets[0];
        assert_eq!(ticket.id, "7");
        assert_eq!(ticket.title, "Broken login");
        assert!(ticket.status.is_closed());
        assert_eq!(ticket.assignee_id.as_deref(), Some("42"));
        assert_eq!(ticket.milestone_id, None);
        assert_eq!(ticket.field_value_id, None);
        assert_eq!(ticket.priority, 2);
        assert_eq!(ticket.resolution.as_deref(), Some("Fixed in r12"));
        assert_eq!(
            ticket.attachments,
            vec![SourceAttachment {
                id: "900".to_string(),
                filename: "trace.txt".to_string()
            }]
        );
        let bodies: Vec<_> = ticket.comments.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["First", "Second"]);
        assert!(ticket.comments[0].attachments.is_empty());
    }

    #[test]
    fn accepts_both_custom_field_spellings() {
        let project = project(
            r#"<project>
  <custom-field-values><custom-field-value><id>1</id><value>Bug</value></custom-field-value></custom-field-values>
  <custom_field_values><custom-field-value><id>2</id><value>Task</value></custom-field-value></custom_field_values>
</project>"#,
        )
        .unwrap();

        assert_eq!(project.field_values.len(), 2);
        assert_eq!(project.field_values[1].value.as_deref(), Some("Task"));
    }

    #[test]
    fn milestone_completed_is_false_only_for_literal_false() {
        let project = project(
            r#"<project><milestones>
  <milestone><id>1</id><title>Alpha</title><completed>false</completed></milestone>
  <milestone><id>2</id><title>Beta</title><completed>true</completed><description>Done</description></milestone>
  <milestone><id>3</id><title>Gamma</title></milestone>
</milestones></project>"#,
        )
        .unwrap();

        let completed: Vec<_> = project.milestones.iter().map(|m| m.completed).collect();
        assert_eq!(completed, vec![false, true, true]);
        assert_eq!(project.milestones[1].description, "Done");
        assert_eq!(project.milestones[0].description, "");
    }

    #[test]
    fn rejects_ticket_without_priority() {
        let result = project(
            "<project><tickets><ticket><id>9</id><summary>x</summary></ticket></tickets></project>",
        );

        assert!(matches!(
            result,
            Err(BackupError::MissingField {
                field: "priority",
                ..
            })
        ));
    }

    #[test]
    fn rejects_non_numeric_priority() {
        let result = project(
            "<project><tickets><ticket><id>9</id><summary>x</summary><priority>high</priority></ticket></tickets></project>",
        );

        assert!(matches!(result, Err(BackupError::InvalidValue { .. })));
    }

    #[test]
    fn parses_unknown_status_verbatim() {
        assert_eq!(
            TicketStatus::parse("Needs Info"),
            TicketStatus::Other("Needs Info".to_string())
        );
        assert_eq!(TicketStatus::parse(" Closed "), TicketStatus::Closed);
        assert!(!TicketStatus::parse("resolved").is_closed());
    }
}
