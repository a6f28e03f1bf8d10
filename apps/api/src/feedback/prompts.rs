// Feedback prompt templates.
// Every template ends with the JSON shape the normalizer expects back.

use crate::llm_client::template::fill;
use crate::models::language::{Language, LearnerSubmission};

use super::VocabularyHint;

const STATEMENT_TEMPLATE: &str = r#"You are analyzing a language learner's response to a controversial statement in a discussion exercise.

Context: {context}
Statement: "{statement}"
User's position: {position}
User's response: "{response}"

Provide feedback in this exact JSON format:
{
  "briefFeedback": "One sentence of encouraging feedback about their argument or expression",
  "vocabularyImprovements": ["suggestion 1", "suggestion 2", "suggestion 3"]
}

Guidelines:
- briefFeedback: One sentence only! Be encouraging but specific about what they did well in their argument or language use.
- vocabularyImprovements: Exactly 1-3 concrete vocabulary suggestions that would make their response more sophisticated or natural. Focus on better word choices, phrases, or expressions they could have used.

Examples of good vocabulary improvements:
- "Instead of 'I think', try 'I believe' or 'In my opinion' for stronger expression"
- "Use 'furthermore' or 'moreover' instead of 'also' to sound more academic"
- "Replace 'really good' with 'highly effective' or 'extremely beneficial'"

Respond only with valid JSON. No other text."#;

pub fn statement_prompt(submission: &LearnerSubmission, position: &str, context: &str) -> String {
    fill(
        STATEMENT_TEMPLATE,
        &[
            ("context", context),
            ("statement", submission.source_text.as_str()),
            ("position", position),
            ("response", submission.learner_response.as_str()),
        ],
    )
}

const SENTENCE_TEMPLATE: &str = r#"I'm learning {language} vocabulary and trying to practice using the word "{word}" in a sentence.

Here is my sentence: "{sentence}"

Please check if my sentence correctly uses the word "{word}" and provide feedback.

Format your response as a JSON object with the following structure:
{
  "isCorrect": boolean, // true if the sentence is correct grammatically and uses the word properly, false otherwise
  "feedback": "detailed feedback on the sentence, including grammar issues, word usage, etc. Place great emphasis on the word usage and whether it is used naturally or not. How would the native speaker use the word?",
  "improvedSentence": "a corrected or improved version of the original sentence that maintains the same meaning. Also, include some other much better expanded examples of how to use the word correctly and naturally."
}

Make sure the feedback is encouraging and helpful, focusing on both strengths and areas for improvement."#;

/// `source_text` is the practised word, `learner_response` the sentence.
pub fn sentence_prompt(submission: &LearnerSubmission) -> String {
    fill(
        SENTENCE_TEMPLATE,
        &[
            ("language", submission.language.name()),
            ("word", submission.source_text.as_str()),
            ("sentence", submission.learner_response.as_str()),
        ],
    )
}

pub const ANSWER_CHECK_SYSTEM: &str = "You are a language learning assistant. Evaluate the student's \
    response and provide helpful, encouraging feedback.";

pub fn answer_check_user(question: &str, answer: &str, expected: &str) -> String {
    format!(
        "Question: \"{question}\"\n\nStudent's answer: \"{answer}\"\n\nCorrect/expected word: \"{expected}\"\n\n\
         Please provide detailed feedback on the student's answer. Consider whether they used the correct \
         word or similar alternatives. Focus on the meaning rather than minor grammar mistakes. \
         Be encouraging even if the answer isn't perfect."
    )
}

const SPOKEN_ANSWER_TEMPLATE: &str = r#"You are an expert {language} language teacher evaluating a student's speaking practice response.

Question: "{question}"
{hints}{vocabulary}

Student's Answer: "{answer}"

Please evaluate this answer and provide detailed feedback. Consider:
1. Content relevance and completeness
2. Language accuracy (grammar, vocabulary usage)
3. Natural flow and coherence
4. Use of relevant vocabulary from the provided list
5. Following the hints provided

Format your response as a JSON object with the following structure:
{
  "score": number, // Score from 1-100
  "feedback": "detailed constructive feedback focusing on what they did well and what could be improved",
  "improvedAnswer": "an improved version of their answer that maintains their ideas but enhances language, structure, and vocabulary usage",
  "strengths": ["strength 1", "strength 2", "strength 3"], // What they did well
  "improvements": ["improvement 1", "improvement 2", "improvement 3"] // Specific areas to work on
}

Be encouraging and constructive. Focus on practical improvements they can apply to future responses."#;

pub fn spoken_answer_prompt(
    submission: &LearnerSubmission,
    hints: &[String],
    vocabulary: &[VocabularyHint],
) -> String {
    let hints_block = if hints.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = hints
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{}. {h}", i + 1))
            .collect();
        format!("\nHints provided:\n{}\n", lines.join("\n"))
    };
    let vocabulary_block = if vocabulary.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = vocabulary
            .iter()
            .map(|v| format!("- {}: {} ({})", v.text, v.meaning, v.kind))
            .collect();
        format!("\nRelevant vocabulary for this question:\n{}\n", lines.join("\n"))
    };

    fill(
        SPOKEN_ANSWER_TEMPLATE,
        &[
            ("language", submission.language.name()),
            ("question", submission.source_text.as_str()),
            ("hints", hints_block.as_str()),
            ("vocabulary", vocabulary_block.as_str()),
            ("answer", submission.learner_response.as_str()),
        ],
    )
}

const USAGE_TEMPLATE: &str = r#"I'm learning {language} vocabulary and want to know how to use the word "{word}" in sentences.

Please provide usage examples and tips for this word.

Format your response as a JSON object with the following structure:
{
  "examples": [
    "example sentence 1 using the word",
    "example sentence 2 using the word",
    "example sentence 3 using the word"
  ],
  "tips": [
    "usage tip 1",
    "usage tip 2",
    "alternative phrasings or collocations"
  ]
}

Provide 3-5 natural, everyday examples that show different ways to use the word. The tips should help me understand how to use the word properly in different contexts."#;

pub fn usage_prompt(word: &str, language: Language) -> String {
    fill(USAGE_TEMPLATE, &[("language", language.name()), ("word", word)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoken_answer_prompt_lists_hints_and_vocabulary() {
        let submission =
            LearnerSubmission::new("Describe your hometown.", "It is small.", Language::En);
        let prompt = spoken_answer_prompt(
            &submission,
            &["Mention the size".to_string()],
            &[VocabularyHint {
                text: "bustling".into(),
                meaning: "full of activity".into(),
                kind: "adjective".into(),
            }],
        );
        assert!(prompt.contains("1. Mention the size"));
        assert!(prompt.contains("- bustling: full of activity (adjective)"));
        assert!(prompt.contains("Student's Answer: \"It is small.\""));
    }

    #[test]
    fn test_spoken_answer_prompt_without_extras() {
        let submission = LearnerSubmission::new("Q?", "A.", Language::De);
        let prompt = spoken_answer_prompt(&submission, &[], &[]);
        assert!(prompt.contains("expert German language teacher"));
        assert!(!prompt.contains("Hints provided"));
        assert!(!prompt.contains("{hints}"));
    }

    #[test]
    fn test_sentence_prompt_names_word_twice() {
        let submission = LearnerSubmission::new("ubiquitous", "Phones are ubiquitous.", Language::En);
        let prompt = sentence_prompt(&submission);
        assert_eq!(prompt.matches("\"ubiquitous\"").count(), 2);
    }

    #[test]
    fn test_statement_prompt_keeps_braces_in_learner_text() {
        let submission =
            LearnerSubmission::new("Cities beat villages.", "I agree with {statement}.", Language::En);
        let prompt = statement_prompt(&submission, "agree", "Quote: {response}");
        assert!(prompt.contains("Context: Quote: {response}"));
        assert!(prompt.contains("User's response: \"I agree with {statement}.\""));
        assert!(prompt.contains("Statement: \"Cities beat villages.\""));
    }

    #[test]
    fn test_sentence_prompt_keeps_braces_in_learner_text() {
        let submission = LearnerSubmission::new("{sentence}", "I went to school", Language::En);
        let prompt = sentence_prompt(&submission);
        assert!(prompt.contains("using the word \"{sentence}\""));
        assert!(prompt.contains("Here is my sentence: \"I went to school\""));
    }

    #[test]
    fn test_spoken_answer_prompt_keeps_braces_in_learner_text() {
        let submission = LearnerSubmission::new("Why {answer}?", "My {language} is fine.", Language::De);
        let prompt = spoken_answer_prompt(&submission, &["Say {hints}".to_string()], &[]);
        assert!(prompt.contains("Question: \"Why {answer}?\""));
        assert!(prompt.contains("1. Say {hints}"));
        assert!(prompt.contains("Student's Answer: \"My {language} is fine.\""));
    }

    #[test]
    fn test_usage_prompt_keeps_braces_in_word() {
        let prompt = usage_prompt("{language}", Language::En);
        assert!(prompt.contains("use the word \"{language}\" in sentences"));
        assert!(prompt.starts_with("I'm learning English vocabulary"));
    }
}
