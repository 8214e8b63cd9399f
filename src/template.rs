//! Built-in flow templates offered when starting a new agent.

use crate::error::MalformedFlowError;
use crate::flow::{Flow, IntoFlow};
use crate::serializer;
use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

/// A catalog entry: descriptive metadata plus the seed the new flow is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub difficulty: Difficulty,
    seed_json: &'static str,
}

impl Template {
    /// Parses the template's seed document.
    pub fn seed(&self) -> Result<TemplateSeed, MalformedFlowError> {
        serde_json::from_str(self.seed_json)
            .map_err(|e| MalformedFlowError::JsonParseError(e.to_string()))
    }

    /// Builds a fresh, unsaved flow from this template.
    pub fn instantiate(&self) -> Result<Flow, MalformedFlowError> {
        self.seed()?.into_flow()
    }
}

/// The `{name, nodes}` seed a template supplies. Nodes use the flow document's node shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplateSeed {
    pub name: String,
    pub nodes: Value,
}

impl IntoFlow for TemplateSeed {
    fn into_flow(self) -> Result<Flow, MalformedFlowError> {
        let mut flow = serializer::deserialize(&json!({
            "name": self.name,
            "nodes": self.nodes,
        }))?;
        // Seeds describe new flows; never carry an identity over.
        flow.id = None;
        flow.created_at = None;
        Ok(flow)
    }
}

/// All built-in templates, in catalog order.
pub fn builtin_templates() -> &'static [Template] {
    TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

static TEMPLATES: &[Template] = &[
    Template {
        id: "template-1",
        title: "Customer Support Bot",
        description: "A bot that handles basic customer service inquiries and routes complex questions to human agents.",
        category: "business",
        difficulty: Difficulty::Beginner,
        seed_json: CUSTOMER_SUPPORT_SEED,
    },
    Template {
        id: "template-2",
        title: "Appointment Scheduler",
        description: "Helps users book and manage appointments through conversational interface.",
        category: "business",
        difficulty: Difficulty::Intermediate,
        seed_json: APPOINTMENT_SEED,
    },
    Template {
        id: "template-3",
        title: "Product Catalog Browser",
        description: "Allows users to browse and search your product catalog via chat.",
        category: "commerce",
        difficulty: Difficulty::Intermediate,
        seed_json: CATALOG_SEED,
    },
    Template {
        id: "template-4",
        title: "Lead Generation Bot",
        description: "Gathers user information and qualifies leads before human follow-up.",
        category: "marketing",
        difficulty: Difficulty::Beginner,
        seed_json: LEAD_SEED,
    },
    Template {
        id: "template-5",
        title: "FAQ Assistant",
        description: "Answers common questions using a knowledge base of frequently asked questions.",
        category: "support",
        difficulty: Difficulty::Beginner,
        seed_json: FAQ_SEED,
    },
    Template {
        id: "template-6",
        title: "Personalized Recommendations",
        description: "Provides tailored product or content recommendations based on user preferences.",
        category: "commerce",
        difficulty: Difficulty::Advanced,
        seed_json: RECOMMENDATION_SEED,
    },
];

const CUSTOMER_SUPPORT_SEED: &str = r#"{
  "name": "Customer Support Bot",
  "nodes": [
    {"id": "start", "type": "message", "data": {"content": "Hello! How can I assist you today?"},
     "position": {"x": 100, "y": 100}, "connections": ["user_input"]},
    {"id": "user_input", "type": "input", "data": {"variable": "user_query", "content": "Please tell me what you'd like to do"},
     "position": {"x": 100, "y": 300}, "connections": ["process_query"]},
    {"id": "process_query", "type": "llm", "data": {"model": "gpt-3.5-turbo", "prompt": "The user has said: {{user_query}}. Determine their intent."},
     "position": {"x": 100, "y": 500}, "connections": ["condition_check"]},
    {"id": "condition_check", "type": "condition", "data": {"condition": "intent == 'booking'"},
     "position": {"x": 100, "y": 700}, "connections": ["booking_flow", "general_response"]},
    {"id": "booking_flow", "type": "message", "data": {"content": "I'll help you book an appointment."},
     "position": {"x": 100, "y": 900}},
    {"id": "general_response", "type": "message", "data": {"content": "Thank you for your query. I'll do my best to assist you."},
     "position": {"x": 450, "y": 900}}
  ]
}"#;

const APPOINTMENT_SEED: &str = r#"{
  "name": "Appointment Scheduler",
  "nodes": [
    {"id": "greeting", "type": "message", "data": {"content": "Hi! Let's find a time that works for you."},
     "position": {"x": 100, "y": 100}, "connections": ["ask_time"]},
    {"id": "ask_time", "type": "input", "data": {"variable": "preferred_time", "content": "When would you like to come in?"},
     "position": {"x": 100, "y": 300}, "connections": ["book"]},
    {"id": "book", "type": "api", "data": {"endpoint": "https://api.example.com/appointments", "method": "POST"},
     "position": {"x": 100, "y": 500}, "connections": ["notify"]},
    {"id": "notify", "type": "webhook", "data": {"webhookUrl": "https://hooks.example.com/appointments", "body": "{\"time\": \"{{preferred_time}}\"}"},
     "position": {"x": 100, "y": 700}, "connections": ["confirm"]},
    {"id": "confirm", "type": "message", "data": {"content": "You're booked for {{preferred_time}}. See you then!"},
     "position": {"x": 100, "y": 900}}
  ]
}"#;

const CATALOG_SEED: &str = r#"{
  "name": "Product Catalog Browser",
  "nodes": [
    {"id": "welcome", "type": "message", "data": {"content": "What are you looking for today?"},
     "position": {"x": 100, "y": 100}, "connections": ["query"]},
    {"id": "query", "type": "input", "data": {"variable": "search_query", "content": "Describe the product"},
     "position": {"x": 100, "y": 300}, "connections": ["search"]},
    {"id": "search", "type": "api", "data": {"endpoint": "https://api.example.com/products/search", "method": "GET"},
     "position": {"x": 100, "y": 500}, "connections": ["summarize"]},
    {"id": "summarize", "type": "llm", "data": {"model": "gpt-4o", "prompt": "Summarize the matching products for: {{search_query}}"},
     "position": {"x": 100, "y": 700}, "connections": ["results"]},
    {"id": "results", "type": "message", "data": {"content": "Here is what I found."},
     "position": {"x": 100, "y": 900}}
  ]
}"#;

const LEAD_SEED: &str = r#"{
  "name": "Lead Generation Bot",
  "nodes": [
    {"id": "intro", "type": "message", "data": {"content": "Thanks for your interest! Can I get a few details?"},
     "position": {"x": 100, "y": 100}, "connections": ["ask_name"]},
    {"id": "ask_name", "type": "input", "data": {"variable": "name", "content": "What's your name?"},
     "position": {"x": 100, "y": 300}, "connections": ["ask_email"]},
    {"id": "ask_email", "type": "input", "data": {"variable": "email", "content": "And your email address?"},
     "position": {"x": 100, "y": 500}, "connections": ["send_lead"]},
    {"id": "send_lead", "type": "webhook", "data": {"webhookUrl": "https://hooks.example.com/leads", "body": "{\"name\": \"{{name}}\", \"email\": \"{{email}}\"}"},
     "position": {"x": 100, "y": 700}, "connections": ["thanks"]},
    {"id": "thanks", "type": "message", "data": {"content": "Thanks {{name}}, someone from our team will be in touch."},
     "position": {"x": 100, "y": 900}}
  ]
}"#;

const FAQ_SEED: &str = r#"{
  "name": "FAQ Assistant",
  "nodes": [
    {"id": "hello", "type": "message", "data": {"content": "Ask me anything about our service."},
     "position": {"x": 100, "y": 100}, "connections": ["question"]},
    {"id": "question", "type": "input", "data": {"variable": "question", "content": "Your question"},
     "position": {"x": 100, "y": 300}, "connections": ["answer"]},
    {"id": "answer", "type": "llm", "data": {"model": "claude-3-5-sonnet", "prompt": "Answer using the FAQ knowledge base: {{question}}"},
     "position": {"x": 100, "y": 500}, "connections": ["reply"]},
    {"id": "reply", "type": "message", "data": {"content": "{{answer}}"},
     "position": {"x": 100, "y": 700}}
  ]
}"#;

const RECOMMENDATION_SEED: &str = r#"{
  "name": "Personalized Recommendations",
  "nodes": [
    {"id": "start", "type": "message", "data": {"content": "Let's find something you'll love."},
     "position": {"x": 100, "y": 100}, "connections": ["preferences"]},
    {"id": "preferences", "type": "input", "data": {"variable": "preferences", "content": "Tell me what you like"},
     "position": {"x": 100, "y": 300}, "connections": ["recommend"]},
    {"id": "recommend", "type": "llm", "data": {"model": "mistral-large", "prompt": "Recommend three items for someone who likes {{preferences}}."},
     "position": {"x": 100, "y": 500}, "connections": ["pause"]},
    {"id": "pause", "type": "delay", "data": {"delay": 2},
     "position": {"x": 100, "y": 700}, "connections": ["present"]},
    {"id": "present", "type": "message", "data": {"content": "Here are my picks for you."},
     "position": {"x": 100, "y": 900}}
  ]
}"#;
