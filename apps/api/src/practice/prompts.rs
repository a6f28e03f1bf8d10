// Practice prompt templates.

use crate::llm_client::template::fill;
use crate::models::language::Language;

use super::scenarios::MissionData;

const OWN_TASK_TEMPLATE: &str = r#"Generate a language learning task for {language} learners.

The task should help users practice their vocabulary and language skills with practical, everyday scenarios.

Format your response as a JSON object with the following structure:
{
  "language": "{code}",
  "question": "A question that prompts using a specific word or phrase in {language}",
  "meantWord": "The target word or phrase that should be used in the answer",
  "alternativeWords": ["array", "of", "similar", "words", "or", "synonyms"],
  "example": "An example sentence using the target word in context"
}

Make the question natural and conversational. Focus on common, useful vocabulary and phrases."#;

pub fn own_task_prompt(language: Language) -> String {
    fill(
        OWN_TASK_TEMPLATE,
        &[("language", language.name()), ("code", language.code())],
    )
}

const CONTEXT_TEMPLATE: &str = r#"You are creating a discussion context for a language learning exercise.

Given this statement: "{statement}"

Create a short, natural context (1-2 sentences) for a discussion scenario. Examples:
- "You are having coffee with a friend and this topic comes up in conversation."
- "You're at a dinner party and someone mentions this during casual discussion."
- "A colleague brings this up during your lunch break."
- "You're discussing current events with your family."

Make it feel natural and conversational. Only respond with the context, nothing else."#;

pub fn context_prompt(statement: &str) -> String {
    fill(CONTEXT_TEMPLATE, &[("statement", statement)])
}

const AGREE_DISAGREE_TEMPLATE: &str = r#"You are creating a statement analysis mission for language learning.

User Requirements:
- Question/Topic: "{question}"
- AI Notes: "{notes}"

Create a controversial statement based on the user's question that allows for both agreement and disagreement. Also provide a natural conversational context.

Return your response as JSON with this exact format:
{
  "statement": "A controversial statement that relates to the user's question and prompts discussion",
  "context": "A natural, conversational context where this topic might come up (1-2 sentences)",
  "missionType": "agreeDisagree"
}

Guidelines:
- The statement should be thought-provoking and allow for both agreement and disagreement
- Make it relevant to the user's specified question/topic
- The context should feel natural and realistic
- Consider the AI notes when formulating the statement complexity and focus areas

Example format:
{
  "statement": "Social media platforms should be held legally responsible for the mental health impacts of their algorithms on teenagers.",
  "context": "You're having a discussion with friends about technology and its effects on young people.",
  "missionType": "agreeDisagree"
}

Respond only with valid JSON."#;

const SITUATION_TEMPLATE: &str = r#"You are creating a situational reaction mission for language learning.

User Requirements:
- Situation: "{situation}"
- Task: "{task}"
- AI Notes: "{notes}"

Create a specific scenario where someone (like a friend, colleague, or family member) is in the described situation, and the user needs to respond according to the task. Make it feel like a real conversation.

Return your response as JSON with this exact format:
{
  "statement": "What the other person says to you about their situation",
  "context": "Setting up the scenario - who is speaking and in what context",
  "missionType": "situationReact"
}

Guidelines:
- The statement should be what someone would actually say in this situation
- Make it feel natural and conversational
- The context should set up who is speaking and where
- Consider the AI notes for the tone and complexity
- The user should be able to naturally respond with empathy, advice, or appropriate reaction

Example:
If situation is "friend lost his stuff" and task is "react to that":
{
  "statement": "I can't believe it! I've been looking everywhere for my keys and wallet. I think I left them at the restaurant, but they said they haven't found anything. I'm completely stuck and don't know what to do.",
  "context": "Your close friend calls you sounding stressed and frustrated.",
  "missionType": "situationReact"
}

Respond only with valid JSON."#;

pub fn mission_prompt(data: &MissionData) -> String {
    let notes = data.ai_notes.as_deref().unwrap_or("None");
    if data.is_agree_disagree() {
        fill(
            AGREE_DISAGREE_TEMPLATE,
            &[
                ("question", data.question.as_deref().unwrap_or_default()),
                ("notes", notes),
            ],
        )
    } else {
        fill(
            SITUATION_TEMPLATE,
            &[
                ("situation", data.situation.as_deref().unwrap_or_default()),
                ("task", data.task.as_deref().unwrap_or_default()),
                ("notes", notes),
            ],
        )
    }
}
