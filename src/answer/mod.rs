//! Question answering over the current directory

use crate::llm::{ChatMessage, ContentPart, VisionModel};
use crate::session::Session;
use crate::utils::text::truncate;
use serde::Serialize;
use tracing::{debug, error, info};

/// Phrases that mark an answer the model could not ground in the context
const UNCERTAIN_PHRASES: &[&str] = &["I don't have enough information", "I need more context"];

/// The result of one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    /// Post-processed text shown to the user
    pub response: String,
    /// Navigation suggestions computed from the question
    pub suggestions: Vec<String>,
    /// Number of images sent with the prompt
    pub images: usize,
}

pub struct QuestionAnswerer {
    model: Box<dyn VisionModel>,
}

impl QuestionAnswerer {
    pub fn new(model: Box<dyn VisionModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn VisionModel {
        self.model.as_ref()
    }

    /// Answer `question` using the session's current directory as context.
    ///
    /// Never fails: a model error becomes the response text.
    pub async fn ask(&self, session: &Session, question: &str) -> Answer {
        info!("Received question: {}", question);
        let summary = session.summarize();
        let images = session.load_images();
        let suggestions = session.suggest_navigation(question);

        let messages = build_messages(&summary, question, images.len());
        debug!(
            summary_chars = summary.chars().count(),
            images = images.len(),
            "Asking {}: {}",
            self.model.model_name(),
            truncate(question, 80)
        );

        let response = match self.model.respond(&messages, &images).await {
            Ok(response) => post_process(response, &suggestions),
            Err(e) => {
                error!("Error answering question: {}", e);
                format!("An error occurred while processing your question: {}", e)
            }
        };

        Answer {
            response,
            suggestions,
            images: images.len(),
        }
    }
}

/// One user message: every image placeholder first, then the context, then
/// the question
pub fn build_messages(summary: &str, question: &str, image_count: usize) -> Vec<ChatMessage> {
    let mut content = vec![ContentPart::Image; image_count];
    content.push(ContentPart::text(format!("Context: {}", summary)));
    content.push(ContentPart::text(format!("Question: {}", question)));
    vec![ChatMessage::user(content)]
}

/// Append navigation hints to a model response
pub fn post_process(mut response: String, suggestions: &[String]) -> String {
    if !suggestions.is_empty() {
        response.push_str("\n\nBased on your question, you might want to explore the following:");
        for suggestion in suggestions {
            response.push_str("\n- ");
            response.push_str(suggestion);
        }
        response.push_str("\nUse 'ls' after changing directories to see the contents.");
    } else if UNCERTAIN_PHRASES.iter().any(|phrase| response.contains(phrase)) {
        response.push_str("\n\nTo find more information, you can:");
        response.push_str("\n- Use 'ls' to list the contents of the current directory.");
        response.push_str("\n- Use 'cd <directory_name>' to navigate to a subdirectory.");
        response.push_str("\n- Use 'cd ..' to go up one level in the directory structure.");
    }
    response
}
