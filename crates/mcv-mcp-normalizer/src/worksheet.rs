//! Assignment worksheet normalizer.
//!
//! Produces the structured question list plus a plain-text summary that an
//! assistant can read back to the student as-is.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};

use mcv_mcp_core::{AssignmentDetail, Choice, Question, QuestionKind};

use crate::html::{attr, first, selector, text_of};

lazy_static! {
    static ref DUE_ON: Regex = Regex::new(r"Due on (.+)").unwrap();
}

const SUMMARY_RULE_WIDTH: usize = 40;

fn choice_letter(index: usize) -> char {
    char::from_u32('A' as u32 + index as u32).unwrap_or('?')
}

fn question_summary(number: usize, text: &str, kind: QuestionKind, points: u32, choices: &[Choice]) -> String {
    let head = format!("Q{number}. {text} ({points} pt)");
    match kind {
        QuestionKind::MultipleChoice => {
            let lines: Vec<String> = choices
                .iter()
                .enumerate()
                .map(|(i, c)| format!("  {}) {}", choice_letter(i), c.label))
                .collect();
            format!("{head}\n{}", lines.join("\n"))
        }
        QuestionKind::OpenText => format!("{head} [Text Answer]"),
        QuestionKind::Unknown => head,
    }
}

fn parse_question(wrapper: ElementRef<'_>, number: usize) -> Question {
    let text_sel = selector(".cvqs-qstn-question");
    let mc_sel = selector(".cvqs-answer-multiplechoice");
    let choice_item_sel = selector(".cvqs-answer-multiplechoice-choiceitem");
    let radio_sel = selector("input[type='radio']");
    let label_sel = selector(".cvqs-answer-multiplechoice-content");
    let open_text_sel = selector(".cvqs-answer-opentext");
    let point_sel = selector("[data-part='point']");

    let question = first(wrapper, &text_sel).map(text_of).unwrap_or_default();

    let mut kind = QuestionKind::Unknown;
    let mut choices = Vec::new();

    if let Some(mc) = first(wrapper, &mc_sel) {
        kind = QuestionKind::MultipleChoice;
        choices = mc
            .select(&choice_item_sel)
            .filter_map(|item| {
                let input = first(item, &radio_sel)?;
                let label = first(item, &label_sel)?;
                Some(Choice {
                    value: attr(input, "value").to_string(),
                    label: text_of(label),
                })
            })
            .collect();
    }

    if first(wrapper, &open_text_sel).is_some() {
        kind = QuestionKind::OpenText;
    }

    let points = first(wrapper, &point_sel)
        .and_then(|p| text_of(p).parse().ok())
        .unwrap_or(1);

    Question {
        id: attr(wrapper, "qstn_nid").to_string(),
        number,
        summary: question_summary(number, &question, kind, points, &choices),
        question,
        kind,
        choices,
        points,
    }
}

fn worksheet_summary(title: &str, due_date: &str, instruction: &str, questions: &[Question]) -> String {
    let mut lines = vec![
        format!("📝 {title}"),
        format!("⏰ Due: {due_date}"),
        format!("📊 Total: {} questions", questions.len()),
        String::new(),
    ];

    if !instruction.is_empty() && instruction != "undefined" {
        lines.push(format!("📋 Instructions: {instruction}"));
        lines.push(String::new());
    }

    lines.push("─".repeat(SUMMARY_RULE_WIDTH));
    for question in questions {
        lines.push(question.summary.clone());
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Parse a worksheet page into an [`AssignmentDetail`].
///
/// The due date is copied verbatim from the first screen-reader label that
/// reads `Due on ...`.
pub fn parse_worksheet(html: &str, cv_cid: u64, assignment_id: u64) -> AssignmentDetail {
    let document = Html::parse_document(html);

    let title_sel = selector("#courseville-worksheet-title");
    let sr_only_sel = selector(".sr-only");
    let instruction_sel = selector("#courseville-worksheet-instruction-body");
    let wrapper_sel = selector(".cvqs-qstn-wrapper");

    let title = document.select(&title_sel).next().map(text_of).unwrap_or_default();

    let due_date = document
        .select(&sr_only_sel)
        .find_map(|el| {
            let text = el.text().collect::<String>();
            DUE_ON.captures(&text).map(|caps| caps[1].trim().to_string())
        })
        .unwrap_or_default();

    let instruction = document
        .select(&instruction_sel)
        .next()
        .map(text_of)
        .unwrap_or_default();

    let questions: Vec<Question> = document
        .select(&wrapper_sel)
        .enumerate()
        .map(|(idx, wrapper)| parse_question(wrapper, idx + 1))
        .collect();

    tracing::debug!(
        "Parsed worksheet {}/{}: {} questions",
        cv_cid,
        assignment_id,
        questions.len()
    );

    AssignmentDetail {
        cv_cid,
        assignment_id,
        human_summary: worksheet_summary(&title, &due_date, &instruction, &questions),
        total_questions: questions.len(),
        title,
        due_date,
        instruction,
        questions,
    }
}
