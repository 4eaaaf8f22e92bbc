//! Keyword edit session: a short-lived guided edit over one parsed resume text.
//!
//! Steps run `SelectItem -> SelectAction -> Compose`, ending in `apply` (which yields
//! the updated text) or cancellation (dropping the session). Every transition that
//! changes what a pending suggestion was computed for bumps `epoch`; a suggestion
//! only lands if its ticket still carries the current epoch.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::integration::apply::{insert_after, prefix_at, replace_line, DEFAULT_BULLET_PREFIX};
use crate::integration::fallback::{compose_bullet, enhance_bullet};
use crate::integration::rewrite::{FailureCause, RewriteError, RewriteRequest};
use crate::parsing::{parse_sections, ParsedItem, SectionType};

/// Upper bound on simultaneously active keywords, origin keyword included.
pub const MAX_KEYWORDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditStep {
    SelectItem,
    SelectAction,
    Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    Enhance,
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordToggle {
    Added,
    Removed,
    /// A fourth keyword was rejected.
    LimitReached,
    /// The keyword that opened the session cannot be removed.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Low,
}

/// Outcome of a suggestion request, surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionNotice {
    pub source: SuggestionSource,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<FailureCause>,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Keyword session {0} not found")]
    NotFound(Uuid),

    #[error("Operation not allowed in step {0:?}")]
    WrongStep(EditStep),

    #[error("No item at index {0}")]
    UnknownItem(usize),

    #[error("No bullet at index {0}")]
    UnknownBullet(usize),

    #[error("Selected item has no bullets to enhance; compose a new bullet instead")]
    NoBulletsToEnhance,

    #[error("Select a bullet before requesting a suggestion")]
    NoBulletSelected,

    #[error("Nothing to apply: the draft is empty, unchanged or incomplete")]
    ApplyDisabled,

    #[error("A suggestion is already in flight")]
    SuggestionInFlight,

    #[error("Suggestion no longer matches the session state")]
    StaleSuggestion,

    #[error("Keyword cannot be empty")]
    EmptyKeyword,

    #[error("Already at the first step")]
    NoPreviousStep,

    #[error("Line {0} is outside the resume text")]
    LineOutOfRange(usize),
}

/// Everything a rewrite call needs, captured under the store lock so the call itself
/// can run without holding it.
#[derive(Debug, Clone)]
pub struct SuggestionTicket {
    pub session_id: Uuid,
    pub epoch: u64,
    pub action: EditAction,
    pub request: RewriteRequest,
}

#[derive(Debug, Clone)]
pub struct KeywordEditSession {
    id: Uuid,
    text: String,
    items: Vec<ParsedItem>,
    step: EditStep,
    selected_item: Option<usize>,
    action: Option<EditAction>,
    selected_bullet: Option<usize>,
    draft: String,
    /// First entry is the origin keyword.
    keywords: Vec<String>,
    epoch: u64,
    suggestion_in_flight: bool,
    last_notice: Option<SuggestionNotice>,
}

/// Serializable snapshot returned by every session endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub step: EditStep,
    pub items: Vec<ParsedItem>,
    pub selected_item: Option<usize>,
    pub action: Option<EditAction>,
    pub selected_bullet: Option<usize>,
    pub draft: String,
    pub keywords: Vec<String>,
    pub origin_keyword: String,
    pub suggestion_in_flight: bool,
    pub can_apply: bool,
    pub last_notice: Option<SuggestionNotice>,
}

impl KeywordEditSession {
    /// Parses `text` and starts a session seeded with the originating keyword.
    pub fn open(text: &str, keyword: &str) -> Result<Self, SessionError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(SessionError::EmptyKeyword);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            items: parse_sections(text),
            step: EditStep::SelectItem,
            selected_item: None,
            action: None,
            selected_bullet: None,
            draft: String::new(),
            keywords: vec![keyword.to_string()],
            epoch: 0,
            suggestion_in_flight: false,
            last_notice: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            step: self.step,
            items: self.items.clone(),
            selected_item: self.selected_item,
            action: self.action,
            selected_bullet: self.selected_bullet,
            draft: self.draft.clone(),
            keywords: self.keywords.clone(),
            origin_keyword: self.keywords.first().cloned().unwrap_or_default(),
            suggestion_in_flight: self.suggestion_in_flight,
            can_apply: self.can_apply(),
            last_notice: self.last_notice.clone(),
        }
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    pub fn select_item(&mut self, index: usize) -> Result<(), SessionError> {
        self.expect_step(EditStep::SelectItem)?;
        if index >= self.items.len() {
            return Err(SessionError::UnknownItem(index));
        }
        self.selected_item = Some(index);
        self.step = EditStep::SelectAction;
        self.invalidate();
        Ok(())
    }

    /// Enhance on an item without bullets is rejected and the session stays put, so
    /// the caller can redirect to `New`.
    pub fn select_action(&mut self, action: EditAction) -> Result<(), SessionError> {
        self.expect_step(EditStep::SelectAction)?;
        if action == EditAction::Enhance && self.current_item()?.bullets.is_empty() {
            return Err(SessionError::NoBulletsToEnhance);
        }
        self.action = Some(action);
        self.selected_bullet = None;
        self.draft.clear();
        self.step = EditStep::Compose;
        self.invalidate();
        Ok(())
    }

    /// Picks the bullet to enhance and seeds the draft with its text.
    pub fn select_bullet(&mut self, index: usize) -> Result<(), SessionError> {
        self.expect_step(EditStep::Compose)?;
        if self.action != Some(EditAction::Enhance) {
            return Err(SessionError::WrongStep(self.step));
        }
        let text = self
            .current_item()?
            .bullets
            .get(index)
            .map(|b| b.text.clone())
            .ok_or(SessionError::UnknownBullet(index))?;
        self.selected_bullet = Some(index);
        self.draft = text;
        self.invalidate();
        Ok(())
    }

    pub fn set_draft(&mut self, draft: &str) -> Result<(), SessionError> {
        self.expect_step(EditStep::Compose)?;
        if self.suggestion_in_flight {
            return Err(SessionError::SuggestionInFlight);
        }
        self.draft = draft.to_string();
        Ok(())
    }

    /// Steps back one stage, clearing whatever the stage being left collected.
    pub fn back(&mut self) -> Result<(), SessionError> {
        match self.step {
            EditStep::SelectItem => return Err(SessionError::NoPreviousStep),
            EditStep::SelectAction => {
                self.selected_item = None;
                self.step = EditStep::SelectItem;
            }
            EditStep::Compose => {
                self.action = None;
                self.selected_bullet = None;
                self.draft.clear();
                self.last_notice = None;
                self.step = EditStep::SelectAction;
            }
        }
        self.invalidate();
        Ok(())
    }

    // ── Keywords ────────────────────────────────────────────────────────────

    pub fn toggle_keyword(&mut self, keyword: &str) -> Result<KeywordToggle, SessionError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(SessionError::EmptyKeyword);
        }
        let existing = self
            .keywords
            .iter()
            .position(|k| k.eq_ignore_ascii_case(keyword));
        let outcome = match existing {
            Some(0) => KeywordToggle::Locked,
            Some(pos) => {
                self.keywords.remove(pos);
                KeywordToggle::Removed
            }
            None if self.keywords.len() >= MAX_KEYWORDS => KeywordToggle::LimitReached,
            None => {
                self.keywords.push(keyword.to_string());
                KeywordToggle::Added
            }
        };
        if matches!(outcome, KeywordToggle::Added | KeywordToggle::Removed) {
            // a suggestion computed for the old keyword set must not land
            self.invalidate();
        }
        Ok(outcome)
    }

    // ── Suggestions ─────────────────────────────────────────────────────────

    /// Marks a suggestion as in flight and captures what the rewrite call needs.
    pub fn begin_suggestion(&mut self) -> Result<SuggestionTicket, SessionError> {
        self.expect_step(EditStep::Compose)?;
        if self.suggestion_in_flight {
            return Err(SessionError::SuggestionInFlight);
        }
        let action = self.action.ok_or(SessionError::WrongStep(self.step))?;
        let item = self.current_item()?;

        let original_bullet = match action {
            EditAction::Enhance => {
                let index = self.selected_bullet.ok_or(SessionError::NoBulletSelected)?;
                item.bullets
                    .get(index)
                    .map(|b| b.text.clone())
                    .ok_or(SessionError::UnknownBullet(index))?
            }
            EditAction::New => seed_bullet(item),
        };
        let request = RewriteRequest {
            original_bullet,
            keywords: self.keywords.clone(),
            context_hint: context_hint(item),
        };

        self.suggestion_in_flight = true;
        Ok(SuggestionTicket {
            session_id: self.id,
            epoch: self.epoch,
            action,
            request,
        })
    }

    /// Lands a suggestion outcome. Failures and blank results go through the local
    /// fallback generator and produce a low-confidence notice.
    pub fn finish_suggestion<R: Rng>(
        &mut self,
        ticket: &SuggestionTicket,
        outcome: Result<String, RewriteError>,
        rng: &mut R,
    ) -> Result<SuggestionNotice, SessionError> {
        if ticket.session_id != self.id || ticket.epoch != self.epoch {
            debug!(
                session_id = %self.id,
                ticket_epoch = ticket.epoch,
                epoch = self.epoch,
                "Dropping stale suggestion"
            );
            return Err(SessionError::StaleSuggestion);
        }
        self.suggestion_in_flight = false;

        let outcome = outcome.and_then(|text| {
            let text = text.trim().to_string();
            if text.is_empty() {
                Err(RewriteError::Malformed("blank rewrite".to_string()))
            } else {
                Ok(text)
            }
        });

        let notice = match outcome {
            Ok(text) => {
                self.draft = text;
                SuggestionNotice {
                    source: SuggestionSource::Ai,
                    confidence: Confidence::High,
                    cause: None,
                    message: "AI suggestion ready".to_string(),
                }
            }
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Rewrite failed, using fallback template");
                let request = &ticket.request;
                self.draft = match ticket.action {
                    EditAction::Enhance => {
                        enhance_bullet(&request.original_bullet, &request.keywords, rng)
                    }
                    EditAction::New => compose_bullet(&request.keywords, rng),
                };
                SuggestionNotice {
                    source: SuggestionSource::Fallback,
                    confidence: Confidence::Low,
                    cause: Some(e.cause()),
                    message: "AI assistance unavailable; a template suggestion was used instead"
                        .to_string(),
                }
            }
        };
        self.last_notice = Some(notice.clone());
        Ok(notice)
    }

    // ── Apply ───────────────────────────────────────────────────────────────

    pub fn can_apply(&self) -> bool {
        if self.step != EditStep::Compose || self.suggestion_in_flight {
            return false;
        }
        let draft = self.draft.trim();
        if draft.is_empty() {
            return false;
        }
        match self.action {
            Some(EditAction::Enhance) => self
                .selected_bullet_ref()
                .is_some_and(|b| b.text.trim() != draft),
            Some(EditAction::New) => true,
            None => false,
        }
    }

    /// Commits the draft and returns the full updated text.
    ///
    /// Enhance keeps the line count; new adds exactly one line.
    pub fn apply(&self) -> Result<String, SessionError> {
        if self.suggestion_in_flight {
            return Err(SessionError::SuggestionInFlight);
        }
        if !self.can_apply() {
            return Err(SessionError::ApplyDisabled);
        }
        let item = self.current_item()?;
        match self.action {
            Some(EditAction::Enhance) => {
                let bullet = self.selected_bullet_ref().ok_or(SessionError::NoBulletSelected)?;
                replace_line(&self.text, bullet.source_line_index, &self.draft)
                    .ok_or(SessionError::LineOutOfRange(bullet.source_line_index))
            }
            Some(EditAction::New) => {
                let prefix = item
                    .bullets
                    .first()
                    .and_then(|b| prefix_at(&self.text, b.source_line_index))
                    .unwrap_or_else(|| DEFAULT_BULLET_PREFIX.to_string());
                let after = item.last_line_index();
                insert_after(&self.text, after, &prefix, &self.draft)
                    .ok_or(SessionError::LineOutOfRange(after))
            }
            None => Err(SessionError::ApplyDisabled),
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────────

    fn expect_step(&self, step: EditStep) -> Result<(), SessionError> {
        if self.step == step {
            Ok(())
        } else {
            Err(SessionError::WrongStep(self.step))
        }
    }

    fn current_item(&self) -> Result<&ParsedItem, SessionError> {
        let index = self.selected_item.ok_or(SessionError::WrongStep(self.step))?;
        self.items.get(index).ok_or(SessionError::UnknownItem(index))
    }

    fn selected_bullet_ref(&self) -> Option<&crate::parsing::ParsedBullet> {
        let item = self.items.get(self.selected_item?)?;
        item.bullets.get(self.selected_bullet?)
    }

    /// Any pending suggestion was computed for state that no longer exists.
    fn invalidate(&mut self) {
        self.epoch += 1;
        self.suggestion_in_flight = false;
    }
}

fn section_label(section: SectionType) -> &'static str {
    match section {
        SectionType::Experience => "experience",
        SectionType::Project => "project",
    }
}

fn context_hint(item: &ParsedItem) -> String {
    format!("{} ({})", item.title, section_label(item.section_type))
}

/// Seed sentence sent to the rewrite service when composing a new bullet.
fn seed_bullet(item: &ParsedItem) -> String {
    match item.section_type {
        SectionType::Experience => format!("Contributed to key initiatives at {}", item.title),
        SectionType::Project => format!("Extended {} with new functionality", item.title),
    }
}
