//! Chat-driven image generation.
//!
//! The transcript lives here; the wire protocol lives in [`client`]. One
//! request is in flight at most: the send control is disabled while a
//! request is outstanding, and an abandoned request simply has nobody
//! listening when its thread finishes.

pub mod client;

use std::sync::mpsc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RemoteError;
use crate::image::SourceImage;
use client::{ChatReply, ChatRequest, ChatTurn, GeminiClient, TurnRole, dispatch};

/// What the assistant is being asked to do; selects the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiMode {
    #[default]
    Background,
    GenerateUi,
    Enhance,
    Edit,
}

impl AiMode {
    pub const ALL: [AiMode; 4] = [
        AiMode::Background,
        AiMode::GenerateUi,
        AiMode::Enhance,
        AiMode::Edit,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            AiMode::Background => "Background",
            AiMode::GenerateUi => "Generate UI",
            AiMode::Enhance => "Enhance",
            AiMode::Edit => "Edit",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            AiMode::Background => {
                "You are an assistant inside the screengloss screenshot editor. \
                 Generate beautiful abstract background images when asked. \
                 Make backgrounds subtle, elegant, and suitable for placing behind \
                 screenshots. Use soft gradients, smooth transitions, and \
                 aesthetically pleasing colors. No text, no objects, just abstract \
                 patterns or gradients. Always generate an image with your response."
            }
            AiMode::GenerateUi => {
                "You are an assistant inside the screengloss screenshot editor. \
                 Generate realistic UI mockups and app screenshots when asked. \
                 Create professional-looking interfaces with realistic content, \
                 icons, and layouts. The generated images should look like real \
                 app screenshots. Always generate an image with your response."
            }
            AiMode::Enhance => {
                "You are an assistant inside the screengloss screenshot editor. \
                 Help users enhance, edit, and improve their screenshots. You can \
                 remove elements, add context, improve lighting, or make other \
                 edits. When given a screenshot, apply the requested changes \
                 naturally and seamlessly. Always generate an image with your \
                 response."
            }
            AiMode::Edit => {
                "You are an assistant inside the screengloss screenshot editor. \
                 Help users with their screenshot editing tasks. You can generate \
                 backgrounds, create mockups, enhance screenshots, or give advice. \
                 When the user asks for visual changes, generate an image. Be \
                 helpful and creative."
            }
        }
    }

    /// Whether requests in this mode attach the current screenshot.
    pub fn wants_screenshot(&self) -> bool {
        matches!(self, AiMode::Enhance | AiMode::Edit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry; assistant messages may carry a generated image.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub image: Option<SourceImage>,
}

impl ChatMessage {
    fn new(role: Role, content: String, image: Option<SourceImage>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            image,
        }
    }
}

/// Chat transcript plus the single in-flight request slot.
pub struct AiSession {
    pub mode: AiMode,
    pub input: String,
    messages: Vec<ChatMessage>,
    in_flight: Option<mpsc::Receiver<Result<ChatReply, RemoteError>>>,
    error: Option<String>,
    last_generated: Option<SourceImage>,
}

impl Default for AiSession {
    fn default() -> Self {
        Self {
            mode: AiMode::Background,
            input: String::new(),
            messages: Vec::new(),
            in_flight: None,
            error: None,
            last_generated: None,
        }
    }
}

impl AiSession {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The most recent generated image, ready to apply as a background.
    pub fn last_generated(&self) -> Option<&SourceImage> {
        self.last_generated.as_ref()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.input.clear();
        self.error = None;
        self.last_generated = None;
    }

    /// Rebuild the multi-turn history for the wire request.
    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .map(|msg| ChatTurn {
                role: match msg.role {
                    Role::User => TurnRole::User,
                    Role::Assistant => TurnRole::Model,
                },
                text: msg.content.clone(),
                image_png: msg.image.as_ref().and_then(|img| img.to_png_bytes().ok()),
            })
            .collect()
    }

    /// Send the typed prompt. No-op while a request is already outstanding
    /// or the input is empty.
    pub fn send(&mut self, client: GeminiClient, current_screenshot: Option<Vec<u8>>) {
        if self.is_generating() {
            return;
        }
        let prompt = self.input.trim().to_owned();
        if prompt.is_empty() {
            return;
        }

        let request = ChatRequest {
            prompt: prompt.clone(),
            mode: self.mode,
            history: self.history(),
            current_screenshot: if self.mode.wants_screenshot() {
                current_screenshot
            } else {
                None
            },
        };

        self.messages
            .push(ChatMessage::new(Role::User, prompt, None));
        self.input.clear();
        self.error = None;
        self.in_flight = Some(dispatch(client, request));
    }

    /// Drain a finished request, if any. Call once per frame.
    pub fn poll(&mut self) {
        let Some(rx) = &self.in_flight else { return };
        match rx.try_recv() {
            Ok(Ok(reply)) => {
                if let Some(image) = &reply.image {
                    self.last_generated = Some(image.clone());
                }
                self.messages.push(ChatMessage::new(
                    Role::Assistant,
                    reply.text,
                    reply.image,
                ));
                self.in_flight = None;
            }
            Ok(Err(err)) => {
                log::warn!("generation request failed: {err}");
                self.error = Some(err.to_string());
                self.in_flight = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.error = Some("generation worker vanished".to_owned());
                self.in_flight = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_maps_roles_to_wire_roles() {
        let mut session = AiSession::default();
        session
            .messages
            .push(ChatMessage::new(Role::User, "make it blue".into(), None));
        session.messages.push(ChatMessage::new(
            Role::Assistant,
            "here you go".into(),
            None,
        ));

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, TurnRole::User);
        assert_eq!(history[1].role, TurnRole::Model);
    }

    #[test]
    fn screenshot_only_attaches_in_editing_modes() {
        assert!(!AiMode::Background.wants_screenshot());
        assert!(!AiMode::GenerateUi.wants_screenshot());
        assert!(AiMode::Enhance.wants_screenshot());
        assert!(AiMode::Edit.wants_screenshot());
    }

    #[test]
    fn clear_resets_transcript_and_error() {
        let mut session = AiSession::default();
        session
            .messages
            .push(ChatMessage::new(Role::User, "hi".into(), None));
        session.error = Some("boom".into());
        session.clear();
        assert!(session.messages().is_empty());
        assert!(session.error().is_none());
    }
}
