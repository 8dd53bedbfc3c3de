use crate::backend::StoryBackend;
use crate::clipboard::ClipboardChain;
use crate::error::WorkflowError;
use log::error;
use std::sync::LazyLock;

/// Separator between prompts in a bulk copy, visible when pasted.
pub const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

// A full set is 13 prompts:
// 0 cover
// 1..10 paragraphs 1..10
// 11 wish
// 12 back cover
static LABELS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let mut labels = Vec::with_capacity(13);
    labels.push("Cover".to_string());
    for i in 1..=10 {
        labels.push(format!("Paragraph {}", i));
    }
    labels.push("Wish".to_string());
    labels.push("Back cover".to_string());
    labels
});

/// Positional label for a prompt. Position is truth: the lookup never
/// inspects prompt content, and positions past the table get a generic
/// 1-based fallback instead of failing.
pub fn label_for(index: usize) -> String {
    LABELS
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("Prompt {}", index + 1))
}

/// The ordered prompt texts of one session, exactly as the backend
/// returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptSet(Vec<String>);

impl PromptSet {
    pub fn new(prompts: Vec<String>) -> Self {
        Self(prompts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// All prompts joined with [`PROMPT_SEPARATOR`], for bulk export.
    pub fn joined(&self) -> String {
        self.0.join(PROMPT_SEPARATOR)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    Idle,
    Loading,
    Ready(PromptSet),
    Error(String),
}

/// Request lifecycle for one session's illustration prompts.
///
/// `Idle --load--> Loading --success--> Ready --load--> Loading` and
/// `Loading --failure--> Error --load--> Loading`. Ready and Error only
/// change on the next load; there is no automatic retry.
pub struct PromptWorkflow {
    backend: Box<dyn StoryBackend>,
    clipboard: ClipboardChain,
    state: WorkflowState,
}

impl PromptWorkflow {
    pub fn new(backend: Box<dyn StoryBackend>, clipboard: ClipboardChain) -> Self {
        Self {
            backend,
            clipboard,
            state: WorkflowState::Idle,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn backend(&self) -> &dyn StoryBackend {
        self.backend.as_ref()
    }

    /// Issue (or re-issue) the generate request for a session.
    ///
    /// Every call hits the backend again; prior Ready or Error content is
    /// discarded as soon as the request goes out. Without a session id the
    /// request is not attempted at all and the workflow stays Idle.
    pub async fn load(&mut self, sip_id: Option<&str>) -> Result<(), WorkflowError> {
        let sip_id = match sip_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                self.state = WorkflowState::Idle;
                return Err(WorkflowError::MissingIdentifier);
            }
        };

        self.state = WorkflowState::Loading;

        match self.backend.generate_prompts(sip_id).await {
            Ok(prompts) => {
                self.state = WorkflowState::Ready(PromptSet::new(prompts));
                Ok(())
            }
            Err(e) => {
                error!("Failed loading prompts: {:#}", e);
                self.state =
                    WorkflowState::Error("Failed to generate prompts. Try again.".to_string());
                Err(WorkflowError::RequestFailed(e))
            }
        }
    }

    /// Copy every prompt to the clipboard in one write, separated for
    /// readability. Best-effort: a failed copy is logged, never fatal.
    pub fn copy_all(&mut self, set: &PromptSet) -> bool {
        self.clipboard.copy_best_effort(&set.joined())
    }

    /// Copy a single prompt. Same best-effort contract as [`copy_all`].
    ///
    /// [`copy_all`]: PromptWorkflow::copy_all
    pub fn copy_one(&mut self, text: &str) -> bool {
        self.clipboard.copy_best_effort(text)
    }
}
