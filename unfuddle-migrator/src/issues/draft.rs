//! Issue drafts and created issues.

use crate::tracker::IssueState;

/// An issue composed from a ticket but not yet created remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    /// GitHub username of the assignee.
    pub assignee: Option<String>,
    /// Remote milestone number.
    pub milestone: Option<u64>,
    pub labels: Vec<String>,
}

impl IssueDraft {
    /// Creates a draft with only a title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            assignee: None,
            milestone: None,
            labels: Vec::new(),
        }
    }

    /// Appends one `Attached file` line per URL to the body.
    pub fn append_attachment_links(&mut self, urls: &[String]) {
        append_attachment_links(&mut self.body, urls);
    }

    /// Merges the number assigned by the tracker into the draft.
    #[must_use]
    pub fn commit(self, number: u64) -> RemoteIssue {
        RemoteIssue {
            number,
            state: IssueState::Open,
            draft: self,
        }
    }
}

/// An issue that exists on the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIssue {
    /// Remote issue number.
    pub number: u64,
    /// Current remote state.
    pub state: IssueState,
    /// Content the issue was created with.
    pub draft: IssueDraft,
}

impl RemoteIssue {
    /// Issue title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.draft.title
    }
}

/// Appends one `Attached file: <url>` line per URL, in the given order.
pub fn append_attachment_links(body: &mut String, urls: &[String]) {
    for url in urls {
        body.push_str("\nAttached file: ");
        body.push_str(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_line_per_url() {
        let mut draft = IssueDraft::new("Title", "Body");
        draft.append_attachment_links(&["http://a/1.png".to_string(), "http://a/2.txt".to_string()]);

        assert_eq!(
            draft.body,
            "Body\nAttached file: http://a/1.png\nAttached file: http://a/2.txt"
        );
    }

    #[test]
    fn commit_keeps_content_and_opens_issue() {
        let issue = IssueDraft::new("Title", "Body").commit(17);

        assert_eq!(issue.number, 17);
        assert_eq!(issue.state, IssueState::Open);
        assert_eq!(issue.title(), "Title");
    }
}
