//! The AI tutor gateway.
//!
//! [`Tutor`] builds prompts for the five tutoring operations, parses the
//! text-generation service's replies into typed shapes, and shields callers
//! from the service's failure modes.
//!
//! The failure policy is deliberately not uniform: question generation
//! propagates errors, because a partial or empty question set would corrupt
//! the test-creation flow requesting it; the four interactive operations
//! (explanation, answer analysis, study plan, chat) swallow failures and
//! return a fixed fallback, because they sit on user-visible paths where an
//! error dialog is worse than a canned reply.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ModelError;
use crate::model::{ChatMessage, Difficulty};
use crate::traits::{extract_json_from_markdown, ChatModel, ChatRequest, ChatTurn};

/// Returned by explanation generation when the service is unreachable.
pub const EXPLANATION_FALLBACK: &str =
    "Failed to generate an explanation. Please try again later.";

/// Returned by chat when the service is unreachable.
pub const CHAT_FALLBACK: &str =
    "I'm having trouble connecting right now. Please try again later.";

const CHAT_PERSONA: &str = "You are a helpful AI assistant for Romanian Bacalaureat exam preparation. Provide concise, accurate information about Romanian curriculum subjects including Romanian Language and Literature, Mathematics, English, Biology, Chemistry, Physics, History, and Geography. When explaining concepts, use examples relevant to the Romanian educational system. Keep explanations clear and appropriate for high school students.";

/// A generated multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    /// Exactly four options.
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: u8,
    pub explanation: String,
}

/// Structured grade for a free-response answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerAnalysis {
    /// 0-10.
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub model_answer: String,
}

/// A personalized study plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanSuggestion {
    pub tasks: Vec<PlannedTask>,
}

/// One suggested study task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedTask {
    pub title: String,
    pub description: String,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub priority: bool,
    #[serde(default)]
    pub recommended: bool,
}

/// Generation settings applied to every tutor request.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

/// The tutoring gateway over a [`ChatModel`] backend.
pub struct Tutor {
    model: Arc<dyn ChatModel>,
    config: TutorConfig,
}

impl Tutor {
    pub fn new(model: Arc<dyn ChatModel>, config: TutorConfig) -> Self {
        Self { model, config }
    }

    fn request(&self, messages: Vec<ChatTurn>, json_mode: bool) -> ChatRequest {
        ChatRequest {
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            json_mode,
        }
    }

    /// Generate `count` multiple-choice questions about a topic.
    ///
    /// Unlike the other operations, this one fails loudly: any service or
    /// parse failure is returned as an error instead of a degraded result.
    pub async fn generate_questions(
        &self,
        subject: &str,
        topic: &str,
        difficulty: Difficulty,
        count: u32,
    ) -> Result<Vec<GeneratedQuestion>> {
        let instruction = format!(
            "You are an expert Romanian Bacalaureat exam tutor. Generate {count} multiple-choice questions about {topic} for the {subject} subject. The difficulty level should be {difficulty}. Each question should have 4 options with only one correct answer. Format your response as a JSON object with a \"questions\" array where each question is an object with: \"question\", \"options\" (array of 4 strings), \"correctAnswer\" (index 0-3), and \"explanation\"."
        );

        let reply = self
            .model
            .complete(&self.request(vec![ChatTurn::system(instruction)], true))
            .await
            .context("question generation request failed")?;

        let questions = parse_questions(&reply.content)?;
        Ok(questions)
    }

    /// Explain a concept in free text. Never fails: service errors yield
    /// [`EXPLANATION_FALLBACK`].
    pub async fn generate_explanation(&self, subject: &str, concept: &str) -> String {
        let messages = vec![
            ChatTurn::system(
                "You are an expert Romanian Bacalaureat exam tutor. Provide a clear, concise explanation of the concept, with examples relevant to the Romanian curriculum.",
            ),
            ChatTurn::user(format!(
                "Please explain the concept of \"{concept}\" in the subject of {subject}, as it relates to the Romanian Bacalaureat exam."
            )),
        ];

        match self.model.complete(&self.request(messages, false)).await {
            Ok(reply) if reply.content.trim().is_empty() => {
                "No explanation available.".to_string()
            }
            Ok(reply) => reply.content,
            Err(error) => {
                warn!(%error, subject, concept, "explanation generation failed, using fallback");
                EXPLANATION_FALLBACK.to_string()
            }
        }
    }

    /// Grade a free-response answer. Never fails: any failure yields a
    /// zero-score analysis with an apology.
    pub async fn analyze_answer(
        &self,
        question: &str,
        student_answer: &str,
        subject: &str,
    ) -> AnswerAnalysis {
        let messages = vec![
            ChatTurn::system(
                "You are an expert Romanian Bacalaureat exam grader. Analyze the student's answer and provide feedback based on the Romanian grading criteria for the Bacalaureat exam.",
            ),
            ChatTurn::user(format!(
                "Question: {question}\n\nStudent's Answer: {student_answer}\n\nSubject: {subject}\n\nPlease analyze this answer and provide a JSON object with: \"score\" (0-10), \"feedback\", \"strengths\" (array), \"improvements\" (array), and \"modelAnswer\" (an answer that would receive full marks)."
            )),
        ];

        match self.model.complete(&self.request(messages, true)).await {
            Ok(reply) => {
                match serde_json::from_str::<AnswerAnalysis>(&extract_json_from_markdown(
                    &reply.content,
                )) {
                    Ok(mut analysis) => {
                        analysis.score = analysis.score.min(10);
                        analysis
                    }
                    Err(error) => {
                        warn!(%error, "answer analysis reply unparseable, using fallback");
                        fallback_analysis()
                    }
                }
            }
            Err(error) => {
                warn!(%error, subject, "answer analysis failed, using fallback");
                fallback_analysis()
            }
        }
    }

    /// Build a four-task study plan from performance data. Never fails: any
    /// failure yields a single task recommending review of the weakest
    /// subject.
    pub async fn generate_study_plan(
        &self,
        user_id: u32,
        performance: &serde_json::Value,
    ) -> StudyPlanSuggestion {
        let messages = vec![
            ChatTurn::system(
                "You are an expert Romanian Bacalaureat exam tutor. Generate a personalized study plan based on the student's performance data. The plan should include specific topics to focus on and time recommendations.",
            ),
            ChatTurn::user(format!(
                "Here is the student's performance data: {performance}. Generate a study plan for today with 4 specific tasks. Return a JSON object with a \"tasks\" array, each task an object with \"title\", \"description\", \"duration\" (in minutes), \"priority\" (boolean), and \"recommended\" (boolean, true when it targets a weak area)."
            )),
        ];

        match self.model.complete(&self.request(messages, true)).await {
            Ok(reply) => {
                match serde_json::from_str::<StudyPlanSuggestion>(&extract_json_from_markdown(
                    &reply.content,
                )) {
                    Ok(plan) => plan,
                    Err(error) => {
                        warn!(%error, user_id, "study plan reply unparseable, using fallback");
                        fallback_plan()
                    }
                }
            }
            Err(error) => {
                warn!(%error, user_id, "study plan generation failed, using fallback");
                fallback_plan()
            }
        }
    }

    /// Answer the latest message of a chat transcript. Never fails: service
    /// errors yield [`CHAT_FALLBACK`].
    ///
    /// Stored messages are role-tagged for the service (`is_user` becomes
    /// "user", everything else "assistant") behind a fixed tutoring persona.
    pub async fn chat(&self, history: &[ChatMessage]) -> String {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatTurn::system(CHAT_PERSONA));
        for message in history {
            messages.push(if message.is_user {
                ChatTurn::user(message.content.clone())
            } else {
                ChatTurn::assistant(message.content.clone())
            });
        }

        match self.model.complete(&self.request(messages, false)).await {
            Ok(reply) if reply.content.trim().is_empty() => {
                "I don't have an answer for that right now.".to_string()
            }
            Ok(reply) => reply.content,
            Err(error) => {
                warn!(%error, "chat completion failed, using fallback");
                CHAT_FALLBACK.to_string()
            }
        }
    }
}

/// Parse and validate a question-generation reply.
///
/// Accepts either `{"questions": [...]}` or a bare array.
fn parse_questions(content: &str) -> Result<Vec<GeneratedQuestion>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum QuestionsPayload {
        Wrapped { questions: Vec<GeneratedQuestion> },
        Bare(Vec<GeneratedQuestion>),
    }

    let payload = extract_json_from_markdown(content);
    let questions = match serde_json::from_str::<QuestionsPayload>(&payload) {
        Ok(QuestionsPayload::Wrapped { questions }) | Ok(QuestionsPayload::Bare(questions)) => {
            questions
        }
        Err(error) => {
            return Err(ModelError::MalformedReply(format!(
                "question set is not valid JSON: {error}"
            ))
            .into())
        }
    };

    for (index, question) in questions.iter().enumerate() {
        if question.options.len() != 4 {
            return Err(ModelError::MalformedReply(format!(
                "question {index} has {} options, expected 4",
                question.options.len()
            ))
            .into());
        }
        if question.correct_answer > 3 {
            return Err(ModelError::MalformedReply(format!(
                "question {index} has correctAnswer {} outside 0-3",
                question.correct_answer
            ))
            .into());
        }
    }

    Ok(questions)
}

fn fallback_analysis() -> AnswerAnalysis {
    AnswerAnalysis {
        score: 0,
        feedback: "Failed to analyze your answer. Please try again later.".to_string(),
        strengths: Vec::new(),
        improvements: Vec::new(),
        model_answer: String::new(),
    }
}

fn fallback_plan() -> StudyPlanSuggestion {
    StudyPlanSuggestion {
        tasks: vec![PlannedTask {
            title: "Review your weakest subject".to_string(),
            description: "Focus on topics you scored lowest on in your recent tests".to_string(),
            duration: 30,
            priority: true,
            recommended: true,
        }],
    }
}
