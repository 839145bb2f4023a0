// ABOUTME: Restoration prompt renderer: turns the latest stored session into prompt text.
// ABOUTME: Pure formatting: missing record fields are shown as fixed placeholders.

use crate::session::StoredSession;

const UNKNOWN: &str = "Unknown";
const NONE: &str = "None";
const NO_CONVERSATION: &str = "No previous conversation specified";

/// Inputs for one restoration prompt.
#[derive(Debug, Clone, Copy)]
pub struct RestorationPrompt<'a> {
    /// Workspace the prompt is generated for (not necessarily the record's).
    pub workspace: &'a str,
    pub session: &'a StoredSession,
    /// Conversation to resume. Empty strings count as absent.
    pub conversation_id: Option<&'a str>,
}

impl<'a> RestorationPrompt<'a> {
    pub fn new(workspace: &'a str, session: &'a StoredSession) -> Self {
        Self {
            workspace,
            session,
            conversation_id: None,
        }
    }

    pub fn conversation(mut self, id: Option<&'a str>) -> Self {
        self.conversation_id = id;
        self
    }

    /// Renders the fixed template.
    pub fn build(&self) -> String {
        let session = self.session;
        let timestamp = session
            .timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let open_files = format!("{:?}", session.open_files.as_deref().unwrap_or_default());
        let git_status = session.git_status.as_deref().unwrap_or(UNKNOWN);
        let terminal = session.active_terminal.as_deref().unwrap_or(NONE);
        let conversation = match self.conversation_id.filter(|id| !id.is_empty()) {
            Some(id) => format!("Load conversation ID: {id}"),
            None => NO_CONVERSATION.to_string(),
        };

        format!(
            "
CONTEXT RESTORATION REQUEST

Workspace: {workspace}
Last Session: {timestamp}

WORKSPACE STATE:
- Open Files: {open_files}
- Git Status: {git_status}
- Active Terminal: {terminal}

PREVIOUS CONVERSATION:
{conversation}

RESTORATION GOALS:
1. Restore technical context from previous session
2. Continue work seamlessly where we left off
3. Maintain awareness of current workspace state
4. Bridge any time gap since last session

Please bootstrap context for continuing our development work.
",
            workspace = self.workspace,
        )
    }
}

/// Render the restoration prompt for `session`.
pub fn render(session: &StoredSession, workspace: &str, conversation_id: Option<&str>) -> String {
    RestorationPrompt::new(workspace, session)
        .conversation(conversation_id)
        .build()
}
