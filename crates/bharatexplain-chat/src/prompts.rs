//! Prompt construction for explanations, doubts and translations.

use bharatexplain_core::{
    language_label, DifficultyLevel, DoubtItem, ExplanationRequest, TopicCategory,
};

use crate::types::{ChatMessage, GenerationParams};

pub const EXPLANATION_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: usize = 4096;

pub const SYSTEM_INSTRUCTION: &str = r#"You are BharatExplain AI, an intelligent assistant designed to explain complex Bharat topics (exams, policies, laws, tech) to common citizens and students.

YOUR GOAL:
Make the information simple, accessible, and culturally relevant to Bharat.

GUIDELINES FOR OUTPUT:
- Structure: Use Markdown formatting (Headers, Bullet points).
- Tone: Helpful, neutral, and encouraging.
- Currency: Always use INR (₹).
- Examples: Use Bharat context (e.g., "Imagine a shopkeeper in Mumbai..." or "Like booking a Tatkal ticket...").

DIFFICULTY ADJUSTMENT:
- If "Simple": Use analogies, 5th-grade reading level, no technical terms.
- If "Student": Focus on key points, definitions, and exam relevance.
- If "Advanced": detailed breakdown, nuances, and pros/cons.

SAFETY & DISCLAIMERS (CRITICAL):
- Do NOT provide legal advice. Always add: "Please consult a lawyer for official legal advice."
- Do NOT provide financial guarantees.
- If the topic is controversial, remain neutral and stick to facts.

FORMAT:
Start with a catchy 1-line summary.
Then, the explanation body.
End with a "Key Takeaway" or "Bharat Fact".
"#;

pub const CHATBOT_INSTRUCTION: &str = r#"You are "Bhartiya", a friendly, witty, and knowledgeable Bharat AI companion.

YOUR PERSONA:
- You are like a helpful knowledgeable friend or "Dost".
- You use simple Bharat English (Hinglish flavor is okay but keep it professional).
- You are polite, using terms like "Ji" or "Friend" where appropriate.
- You answer general queries about daily life in Bharat, culture, advice, or general chat.

GUIDELINES:
- Keep answers concise and helpful.
- Use emojis to make it engaging.
- Avoid complex jargon.
- If asked about dangerous/illegal things, gently refuse.
"#;

/// Output-length rule that makes each difficulty produce a visibly different answer.
pub fn length_instruction(difficulty: DifficultyLevel) -> &'static str {
    match difficulty {
        DifficultyLevel::Simple => "STRICT OUTPUT RULE: Keep the answer SHORT (approx 100-150 words). Use very simple vocabulary, everyday analogies, and avoid deep technical details. Explain it like I am 10 years old.",
        DifficultyLevel::Student => "STRICT OUTPUT RULE: Provide a MEDIUM length answer (approx 300 words). Focus on educational value, key points, definitions, and exam-relevant details. Structure with clear bullet points and headings.",
        DifficultyLevel::Advanced => "STRICT OUTPUT RULE: Provide a LONG, DETAILED answer (approx 600+ words). Deep dive into nuances, history, specific legal sections/tech specs, pros/cons, and future implications. Comprehensive coverage required.",
    }
}

/// Messages and parameters for an explanation request.
pub fn explanation(request: &ExplanationRequest) -> (Vec<ChatMessage>, GenerationParams) {
    let tourism_location = match request.category {
        TopicCategory::Tourism => request.location,
        _ => None,
    };

    let (system, prompt) = if request.category.is_catch_all() {
        (
            CHATBOT_INSTRUCTION,
            format!(
                "User Query: \"{}\"\n\nAnswer as Bhartiya. Be helpful and engaging.",
                request.topic
            ),
        )
    } else {
        let mut prompt = format!(
            "Please explain the following:\n\n\
             1. Topic: {}\n\
             2. Category: {}\n\
             3. Difficulty: {}\n\n\
             {}\n",
            request.topic,
            request.category,
            request.difficulty,
            length_instruction(request.difficulty),
        );
        if let Some(loc) = tourism_location {
            prompt.push_str(&format!(
                "\n4. Context: User is located at Lat: {}, Lng: {}. Use the Google Maps tool to find specific places, ratings, and locations if relevant to the topic.\n",
                loc.lat, loc.lng
            ));
        }
        (SYSTEM_INSTRUCTION, prompt)
    };

    let params = GenerationParams {
        temperature: Some(EXPLANATION_TEMPERATURE),
        max_tokens: DEFAULT_MAX_TOKENS,
        maps_location: tourism_location,
    };

    (
        vec![ChatMessage::system(system), ChatMessage::user(prompt)],
        params,
    )
}

/// Messages for translating Markdown into `target_code`'s language.
pub fn translation(text: &str, target_code: &str) -> (Vec<ChatMessage>, GenerationParams) {
    let target = language_label(target_code);
    let prompt = format!(
        "Translate the following Markdown content into {target}.\n\n\
         IMPORTANT INSTRUCTIONS:\n\
         1. Maintain ALL Markdown formatting (headers, bold, lists, links).\n\
         2. Keep the tone natural, helpful, and culturally appropriate for the target language.\n\
         3. Do not translate code blocks, specific proper nouns that shouldn't be translated, or URLs.\n\
         4. Return ONLY the translated content, do not add introductory text like \"Here is the translation\".\n\n\
         Content to translate:\n{text}"
    );

    (
        vec![ChatMessage::user(prompt)],
        GenerationParams {
            max_tokens: DEFAULT_MAX_TOKENS,
            ..GenerationParams::default()
        },
    )
}

/// Prior doubts rendered as a transcript, or empty when there are none.
pub fn format_history(history: &[DoubtItem]) -> String {
    if history.is_empty() {
        return String::new();
    }
    let turns = history
        .iter()
        .map(|h| format!("User: {}\nBharatExplain: {}", h.question, h.answer))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Past conversation about this topic:\n{turns}\n\n")
}

/// Messages for answering a follow-up doubt about an explanation.
pub fn doubt(
    question: &str,
    topic: &str,
    explanation: &str,
    history: &[DoubtItem],
) -> (Vec<ChatMessage>, GenerationParams) {
    let prompt = format!(
        "Context:\n\
         The user is asking about the topic: \"{topic}\".\n\
         I have already provided this explanation:\n\
         \"{explanation}\"\n\n\
         {history}\n\
         User's New Doubt: \"{question}\"\n\n\
         Instructions:\n\
         - Answer the doubt clearly and concisely.\n\
         - Maintain the persona of BharatExplain (Simple, Bharat context, Helpful).\n\
         - If the doubt is unrelated to the topic, politely guide them back or answer briefly if simple.\n\
         - Use Bharat examples if applicable.",
        history = format_history(history),
    );

    (
        vec![ChatMessage::system(SYSTEM_INSTRUCTION), ChatMessage::user(prompt)],
        GenerationParams {
            max_tokens: DEFAULT_MAX_TOKENS,
            ..GenerationParams::default()
        },
    )
}
