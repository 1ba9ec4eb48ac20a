use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Placeholders: {level}, {language} and {text} are substituted by the generation service.

pub const QUIZ_GENERATOR_PROMPT: &str = "You are an expert quiz creator for students. Based on the following study material, create a 5-question multiple-choice quiz tailored for a {level} level.

Tasks:
1. Identify the most important key entities (people, places, concepts, dates).
2. Generate a 5-question multiple-choice quiz. Each question must have exactly 4 options, one correct answer, and a brief explanation for why the answer is correct.
3. The correct answer must be copied exactly, character for character, from one of the 4 options.
4. The difficulty, vocabulary, and question structure should be appropriate for a {level} student.
5. The questions, answers, and explanations must be derived *directly* from the provided text.

Study Material:
---
{text}
---";

pub const SUMMARISER_PROMPT: &str = "You are a skilled academic summarizer. Read the following lecture material and provide a concise title and a well-structured summary. The summary should capture the main arguments, key evidence, and overall conclusion of the text, making it easy for a student to review.

Lecture Material:
---
{text}
---";

pub const FLASHCARD_GENERATOR_PROMPT: &str = "You are an AI assistant that creates study aids. Based on the provided text, generate a set of 5-10 flashcards. Each flashcard should have a distinct 'term' (a key concept, person, or vocabulary word) and a concise 'definition' based directly on the text. Also, identify 3-5 high-level concepts from the text.

Study Material:
---
{text}
---";

pub const TRANSLATOR_PROMPT: &str = "You are a highly skilled translator. Translate the following text into {language}.
Provide only the translated text as a raw string, with no additional commentary, labels, or explanations.

Text to Translate:
---
{text}
---";

pub const OCR_PROMPT: &str = "You are an expert at Optical Character Recognition (OCR). Extract all text from the provided image. Preserve the original formatting, including paragraphs and line breaks, as much as possible. Provide only the extracted text as a raw string, with no additional commentary, labels, or explanations.";

pub const DEFAULT_STUDENT_LEVEL: &str = "High School";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder regex is valid"));

/// Fills `{name}` placeholders in one pass. Substituted values are never rescanned,
/// and placeholders without a value are left as written.
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            substitutions
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
