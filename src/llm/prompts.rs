//! Persona prompt templates for the two assistant modes

use clap::ValueEnum;
use std::fmt;

/// Behavioral persona selected for a turn. Determines which template the
/// prompt is rendered from; nothing else in the pipeline branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Resume critique against the job description.
    #[default]
    #[value(name = "coach")]
    CareerCoach,
    /// Simulated interview, no coaching.
    #[value(name = "interviewer")]
    HiringManager,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::CareerCoach => write!(f, "Career Coach (Analysis)"),
            Mode::HiringManager => write!(f, "Hiring Manager (Mock Interview)"),
        }
    }
}

/// Render the instruction string for one turn. Pure and total: missing
/// fields interpolate as empty strings, identical inputs yield identical
/// output.
pub fn build_prompt(mode: Mode, job: &str, resume: &str, user_input: &str) -> String {
    let template = match mode {
        Mode::CareerCoach => COACH_TEMPLATE,
        Mode::HiringManager => INTERVIEWER_TEMPLATE,
    };

    template
        .replace("{job}", job)
        .replace("{resume}", resume)
        .replace("{input}", user_input)
}

const COACH_TEMPLATE: &str = r#"ROLE: Expert Technical Recruiter with 15+ years of experience.
CONTEXT:
JOB DESCRIPTION: {job}
CANDIDATE RESUME: {resume}
USER QUERY: "{input}"

INSTRUCTIONS:
Analyze the User Query and decide the best response format:

SCENARIO A: If the user asks for a general Resume Review:
Provide a comprehensive analysis using this exact structure:
1. Executive Summary: A 2-sentence verdict on fit.
2. Strengths: 3 bullet points specific to the resume.
3. Critical Gaps: 3 missing keywords/skills required by the JD.
4. Action Plan: 1 specific, high-impact fix.

SCENARIO B: If the user asks a SPECIFIC question:
- Answer ONLY that question directly.
- Be concise and tactical.
- Do NOT use the structured format from Scenario A unless a general review was requested."#;

const INTERVIEWER_TEMPLATE: &str = r#"ROLE: You are a strict Hiring Manager at the company described in the job description.
CONTEXT:
JOB DESCRIPTION: {job}
CANDIDATE RESUME: {resume}

TASK: Conduct a text-based interview.
1. Do not provide help or coaching.
2. If the user input is a greeting, ask exactly one challenging technical question based on gaps between the resume and the job description.
3. If the user answers a question, rate the answer from 1 to 5 with a brief justification, then ask one follow-up question.

USER INPUT: "{input}""#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_is_idempotent() {
        let a = build_prompt(Mode::CareerCoach, "Rust engineer", "Jane Doe, 5y Rust", "review");
        let b = build_prompt(Mode::CareerCoach, "Rust engineer", "Jane Doe, 5y Rust", "review");
        assert_eq!(a, b);
    }

    #[test]
    fn test_coach_skeleton_is_fixed_across_inputs() {
        let a = build_prompt(Mode::CareerCoach, "jd one", "resume one", "question one");
        let b = build_prompt(Mode::CareerCoach, "jd two", "resume two", "question two");

        for prompt in [&a, &b] {
            assert!(prompt.contains("Expert Technical Recruiter"));
            assert!(prompt.contains("1. Executive Summary"));
            assert!(prompt.contains("2. Strengths"));
            assert!(prompt.contains("3. Critical Gaps"));
            assert!(prompt.contains("4. Action Plan"));
            assert!(prompt.contains("SCENARIO B"));
        }
        assert!(a.contains("jd one") && !a.contains("jd two"));
        assert!(b.contains("resume two") && !b.contains("resume one"));
    }

    #[test]
    fn test_interviewer_asks_one_question_and_never_coaches() {
        let prompt = build_prompt(Mode::HiringManager, "Senior Rust role", "resume text", "Hi");

        assert!(prompt.contains("Do not provide help or coaching."));
        assert!(prompt.contains("ask exactly one challenging technical question"));
        assert!(prompt.contains("rate the answer from 1 to 5"));
        assert!(prompt.contains("USER INPUT: \"Hi\""));
        // Interview mode must not carry the coach's structured review.
        assert!(!prompt.contains("Executive Summary"));
    }

    #[test]
    fn test_missing_fields_interpolate_as_empty() {
        let prompt = build_prompt(Mode::CareerCoach, "", "", "");
        assert!(prompt.contains("JOB DESCRIPTION: \n"));
        assert!(prompt.contains("CANDIDATE RESUME: \n"));
        assert!(prompt.contains("USER QUERY: \"\""));
    }
}
