//! Prompt construction for a day of prompts

use tracekeep_core::DayCohort;
use tracing::debug;

const MAX_TOTAL_CHARS: usize = 6000;
const TRUNCATED_PROMPT_CHARS: usize = 200;

pub const SYSTEM_PROMPT: &str = "\
You are a thinking-pattern analysis engine.
You receive the list of prompts a user sent to an AI assistant during one day.
Extract that day's thinking patterns.

Respond with a single JSON object in exactly this shape and nothing else:

{
  \"core_topics\": [\"topic 1\", \"topic 2\", ...],
  \"interests\": [\"interest 1\", \"interest 2\", ...],
  \"mood_tension\": \"free-form description of the day's mood and tension\",
  \"energy_level\": \"one of high|medium|low|scattered\",
  \"key_questions\": [\"underlying question 1\", \"underlying question 2\", ...],
  \"domain_tags\": [\"engineer\", \"philosopher\", ...]
}

Rules:
- core_topics: 3 to 7 items. Concrete topic names.
- interests: 2 to 5 items. Broader areas of interest than core_topics.
- mood_tension: 1 or 2 sentences inferred from tone and content.
- energy_level: high = focused/productive, medium = normal, low = tired/minimal, scattered = spread across many directions.
- key_questions: 2 to 5 items. The fundamental questions beneath the prompts, not surface questions.
- domain_tags: pick the matching ones from engineer/philosopher/life/creative/learning/health/meta.
";

/// Numbered prompt list for one day
///
/// When the day's prompts exceed the character budget every prompt is cut
/// to a short prefix so the request stays within the model's context.
pub fn build_user_prompt(cohort: &DayCohort) -> String {
    let total_chars: usize = cohort.prompts.iter().map(|p| p.chars().count()).sum();

    let prompts: Vec<String> = if total_chars > MAX_TOTAL_CHARS {
        let cut: Vec<String> = cohort
            .prompts
            .iter()
            .map(|p| p.chars().take(TRUNCATED_PROMPT_CHARS).collect())
            .collect();
        debug!(
            "Truncated prompts for {}: {} chars -> {} chars",
            cohort.date,
            total_chars,
            cut.iter().map(|p| p.chars().count()).sum::<usize>()
        );
        cut
    } else {
        cohort.prompts.clone()
    };

    let mut header = format!("Date: {} (prompts: {})", cohort.date, cohort.prompt_count);
    if !cohort.gem_names.is_empty() {
        header.push_str(&format!("\nGems used: {}", cohort.gem_names.join(", ")));
    }

    let items: Vec<String> = prompts
        .iter()
        .enumerate()
        .map(|(i, p)| format!("[{}] {}", i + 1, p))
        .collect();

    format!("{}\n\n{}", header, items.join("\n\n"))
}
