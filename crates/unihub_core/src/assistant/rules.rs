//! Ordered keyword rules that answer assistant queries.
//!
//! # Responsibility
//! - Normalize free text and pick the first rule whose keywords match.
//! - Render answers from a `ContextSnapshot` with record text kept verbatim.
//!
//! # Invariants
//! - `RULES` order is the evaluation order; first match wins.
//! - The last rule always matches, so every input (including empty text)
//!   gets a non-empty answer.

use crate::assistant::context::ContextSnapshot;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

pub const NO_NOTICES_RESPONSE: &str =
    "There are currently no notices available. Check back later for updates!";
pub const NO_EXAMS_RESPONSE: &str =
    "No upcoming exams scheduled at the moment. Stay tuned for updates!";
pub const NO_EVENTS_RESPONSE: &str =
    "No upcoming events scheduled. Check the calendar regularly for updates!";

/// Keyword predicate over normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Matches when any keyword is contained in the text.
    AnyOf(&'static [&'static str]),
    Always,
}

impl Matcher {
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Self::AnyOf(keywords) => keywords.iter().any(|keyword| normalized.contains(keyword)),
            Self::Always => true,
        }
    }
}

/// One `(matcher, responder)` pair of the cascade.
///
/// The responder receives the original (trimmed) query so the fallback can
/// echo it.
#[derive(Clone, Copy)]
pub struct Rule {
    pub topic: &'static str,
    pub matcher: Matcher,
    pub respond: fn(&str, &ContextSnapshot) -> String,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("topic", &self.topic)
            .field("matcher", &self.matcher)
            .finish()
    }
}

pub const RULES: &[Rule] = &[
    Rule {
        topic: "notices",
        matcher: Matcher::AnyOf(&["notice", "announcement"]),
        respond: notices_response,
    },
    Rule {
        topic: "exams",
        matcher: Matcher::AnyOf(&["exam", "test"]),
        respond: exams_response,
    },
    Rule {
        topic: "events",
        matcher: Matcher::AnyOf(&["calendar", "event"]),
        respond: events_response,
    },
    Rule {
        topic: "semester",
        matcher: Matcher::AnyOf(&["semester", "academic year"]),
        respond: semester_response,
    },
    Rule {
        topic: "profile",
        matcher: Matcher::AnyOf(&["profile", "account"]),
        respond: profile_response,
    },
    Rule {
        topic: "help",
        matcher: Matcher::AnyOf(&["help", "how to"]),
        respond: help_response,
    },
    Rule {
        topic: "grades",
        matcher: Matcher::AnyOf(&["gpa", "grade"]),
        respond: grades_response,
    },
    Rule {
        topic: "university",
        matcher: Matcher::AnyOf(&["university", "vavuniya"]),
        respond: university_response,
    },
    Rule {
        topic: "fallback",
        matcher: Matcher::Always,
        respond: fallback_response,
    },
];

/// Case-folds and collapses whitespace.
pub fn normalize(raw: &str) -> String {
    WHITESPACE_RE
        .replace_all(raw.trim(), " ")
        .to_lowercase()
}

/// First rule matching `raw` after normalization.
pub fn matching_rule(raw: &str) -> &'static Rule {
    let normalized = normalize(raw);
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(&normalized))
        .unwrap_or(&FALLBACK_RULE)
}

const FALLBACK_RULE: Rule = Rule {
    topic: "fallback",
    matcher: Matcher::Always,
    respond: fallback_response,
};

/// Answers `raw` from `snapshot`. Total and deterministic.
pub fn resolve(raw: &str, snapshot: &ContextSnapshot) -> String {
    (matching_rule(raw).respond)(raw.trim(), snapshot)
}

/// Failure reported by a resolver backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Backend returned an error.
    Backend(String),
    /// Backend panicked; payload summary only.
    Panicked(String),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(message) => write!(f, "resolver backend failed: {message}"),
            Self::Panicked(message) => write!(f, "resolver panicked: {message}"),
        }
    }
}

impl Error for ResolveError {}

/// Seam between the session and whatever produces answers.
///
/// The rule cascade never fails; other backends may.
pub trait Resolver {
    fn resolve(&self, text: &str, snapshot: &ContextSnapshot) -> Result<String, ResolveError>;
}

/// Resolver backed by `RULES`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleCascade;

impl Resolver for RuleCascade {
    fn resolve(&self, text: &str, snapshot: &ContextSnapshot) -> Result<String, ResolveError> {
        Ok(resolve(text, snapshot))
    }
}

fn bullet_list<T>(items: &[T], render: impl Fn(&T) -> String) -> String {
    items
        .iter()
        .map(|item| format!("• {}", render(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn notices_response(_query: &str, snapshot: &ContextSnapshot) -> String {
    if snapshot.notices.is_empty() {
        return NO_NOTICES_RESPONSE.to_string();
    }
    let list = bullet_list(&snapshot.notices, |notice| {
        format!("{} ({})", notice.title, notice.created_at)
    });
    format!(
        "Here are the latest notices:\n\n{list}\n\nYou can view all notices in the Notice Board section."
    )
}

fn exams_response(_query: &str, snapshot: &ContextSnapshot) -> String {
    if snapshot.upcoming_exams.is_empty() {
        return NO_EXAMS_RESPONSE.to_string();
    }
    let list = bullet_list(&snapshot.upcoming_exams, |exam| {
        format!("{} - {} at {}", exam.subject, exam.date, exam.time)
    });
    format!(
        "Here are your upcoming exams:\n\n{list}\n\nCheck the Exam Schedules section for more details."
    )
}

fn events_response(_query: &str, snapshot: &ContextSnapshot) -> String {
    if snapshot.upcoming_events.is_empty() {
        return NO_EVENTS_RESPONSE.to_string();
    }
    let list = bullet_list(&snapshot.upcoming_events, |event| {
        format!("{} - {}", event.title, event.date)
    });
    format!("Here are upcoming events:\n\n{list}\n\nView the full calendar for more details.")
}

fn semester_response(_query: &str, _snapshot: &ContextSnapshot) -> String {
    "For semester calculations and academic planning, please visit the Semester Calculator \
     section. Only administrators can set up semester schedules, but all users can view the \
     calculated dates."
        .to_string()
}

fn profile_response(_query: &str, _snapshot: &ContextSnapshot) -> String {
    "You can update your profile information including your profile picture, contact details, \
     and password in the Profile section."
        .to_string()
}

fn help_response(_query: &str, snapshot: &ContextSnapshot) -> String {
    format!(
        "Hi {name}! Here's how you can use Uni-Hub:\n\n\
         • View your dashboard for an overview\n\
         • Check the calendar for events\n\
         • Browse notices for announcements\n\
         • View exam schedules\n\
         • Update your profile\n\
         • Use the semester calculator\n\n\
         As a {role}, you have access to all relevant sections. \
         Is there something specific you'd like to know about?",
        name = snapshot.user_name,
        role = snapshot.user_role
    )
}

fn grades_response(_query: &str, _snapshot: &ContextSnapshot) -> String {
    "GPA calculations are typically done based on your course grades. The grading system \
     usually follows:\n\
     • A: 4.0 (90-100%)\n\
     • B: 3.0 (80-89%)\n\
     • C: 2.0 (70-79%)\n\
     • D: 1.0 (60-69%)\n\
     • F: 0.0 (Below 60%)\n\n\
     Contact your academic advisor for specific GPA calculations."
        .to_string()
}

fn university_response(_query: &str, _snapshot: &ContextSnapshot) -> String {
    "The University of Vavuniya is a leading institution in Northern Sri Lanka, offering \
     diverse academic programs. This Uni-Hub system helps streamline academic activities for \
     students, teachers, and administrators."
        .to_string()
}

fn fallback_response(query: &str, _snapshot: &ContextSnapshot) -> String {
    format!(
        "I understand you're asking about \"{query}\". While I specialize in academic \
         information from your Uni-Hub system, I can help you with:\n\n\
         • Latest notices and announcements\n\
         • Upcoming exams and schedules\n\
         • Calendar events\n\
         • Academic procedures\n\
         • System navigation\n\n\
         Could you please rephrase your question or ask about any of these topics?"
    )
}
