use tracekeep_core::{Delta, Distillation};

fn bullets(lines: &mut Vec<String>, items: &[String]) {
    if items.is_empty() {
        lines.push("- (none)".to_string());
    } else {
        lines.extend(items.iter().map(|item| format!("- {}", item)));
    }
}

/// Day summary document, with a delta section when a previous day exists
pub fn render_distillation(distillation: &Distillation, delta: Option<&Delta>) -> String {
    let d = distillation;
    let mut lines = vec![
        "---".to_string(),
        format!("created: {}", d.date),
        "tags: [log/distill, type/self_observation]".to_string(),
        "status: auto_generated".to_string(),
        "source: gemini_distill".to_string(),
        format!("prompt_count: {}", d.prompt_count),
        format!("model: {}", d.model),
    ];
    if let Some(energy) = d.energy_level {
        lines.push(format!("energy: {}", energy));
    }
    if !d.domain_tags.is_empty() {
        lines.push(format!("domains: [{}]", d.domain_tags.join(", ")));
    }
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push(format!("# Self-Distillation: {}", d.date));
    lines.push(String::new());

    lines.push("## Core Topics".to_string());
    bullets(&mut lines, &d.core_topics);
    lines.push(String::new());

    lines.push("## Interests".to_string());
    bullets(&mut lines, &d.interests);
    lines.push(String::new());

    lines.push("## Mood & Tension".to_string());
    lines.push(if d.mood_tension.is_empty() {
        "(no data)".to_string()
    } else {
        d.mood_tension.clone()
    });
    lines.push(String::new());

    lines.push("## Key Questions".to_string());
    bullets(&mut lines, &d.key_questions);
    lines.push(String::new());

    lines.push("## Domain Tags".to_string());
    lines.push(if d.domain_tags.is_empty() {
        "(none)".to_string()
    } else {
        d.domain_tags.join(", ")
    });
    lines.push(String::new());

    if let Some(delta) = delta {
        render_delta(&mut lines, delta);
    }

    lines.join("\n")
}

fn render_delta(lines: &mut Vec<String>, delta: &Delta) {
    lines.push(format!("## Delta (from {})", delta.previous_date));

    lines.push("### New".to_string());
    bullets(lines, &delta.new_topics);
    lines.push("### Shifted".to_string());
    bullets(lines, &delta.shifted_topics);
    lines.push("### Faded".to_string());
    bullets(lines, &delta.faded_topics);

    if !delta.mood_shift.is_empty() {
        lines.push("### Energy Shift".to_string());
        lines.push(delta.mood_shift.clone());
    }
    if !delta.new_domains.is_empty() {
        lines.push("### New Domains".to_string());
        lines.push(delta.new_domains.join(", "));
    }
    if !delta.lost_domains.is_empty() {
        lines.push("### Lost Domains".to_string());
        lines.push(delta.lost_domains.join(", "));
    }

    lines.push(String::new());
}

pub fn distillation_filename(date: &str) -> String {
    format!("DIST-{}.md", date)
}
