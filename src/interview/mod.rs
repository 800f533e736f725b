//! The interview runner: walks the prompt schema in order and collects
//! answers interactively.
//!
//! Visibility is re-checked against the answers gathered so far before
//! each question; a prompt whose `when` comes out false is skipped and
//! leaves no answer behind. The walk only moves forward, so an answered
//! prompt is never re-evaluated.

use anyhow::{Context as _, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};

use crate::answers::{Answers, Value};
use crate::meta::{Prompt, PromptKind};

/// Run the interview and return the finalized answer model.
pub fn run(prompts: &[Prompt]) -> Result<Answers> {
    let theme = ColorfulTheme::default();
    let mut answers = Answers::new();

    for prompt in prompts {
        if !prompt.visible_given(&answers) {
            tracing::debug!("prompt `{}` hidden by its visibility expression", prompt.name);
            continue;
        }
        let value = ask(&theme, prompt)
            .with_context(|| format!("prompt `{}` failed", prompt.name))?;
        answers.insert(prompt.name.clone(), value);
    }

    Ok(answers)
}

fn ask(theme: &ColorfulTheme, prompt: &Prompt) -> Result<Value> {
    match prompt.kind {
        PromptKind::Text => ask_text(theme, prompt),
        PromptKind::Boolean => ask_boolean(theme, prompt),
        PromptKind::SingleChoice => ask_single_choice(theme, prompt),
        PromptKind::MultiChoice => ask_multi_choice(theme, prompt),
    }
}

fn ask_text(theme: &ColorfulTheme, prompt: &Prompt) -> Result<Value> {
    let mut input = Input::<String>::with_theme(theme).with_prompt(&prompt.message);

    if let Some(Value::Text(default)) = &prompt.default {
        input = input.default(default.clone());
    }
    // dialoguer rejects empty input unless explicitly allowed; required
    // prompts keep that behavior
    if !prompt.required && prompt.default.is_none() {
        input = input.allow_empty(true);
    }

    Ok(Value::Text(input.interact_text()?))
}

fn ask_boolean(theme: &ColorfulTheme, prompt: &Prompt) -> Result<Value> {
    let default = matches!(prompt.default, Some(Value::Bool(true)));
    let answer = Confirm::with_theme(theme)
        .with_prompt(&prompt.message)
        .default(default)
        .interact()?;
    Ok(Value::Bool(answer))
}

fn ask_single_choice(theme: &ColorfulTheme, prompt: &Prompt) -> Result<Value> {
    let labels: Vec<&str> = prompt.choices.iter().map(|c| c.name.as_str()).collect();
    let default_index = match &prompt.default {
        Some(Value::Text(value)) => prompt
            .choices
            .iter()
            .position(|c| &c.value == value)
            .unwrap_or(0),
        _ => 0,
    };

    let index = Select::with_theme(theme)
        .with_prompt(&prompt.message)
        .items(&labels)
        .default(default_index)
        .interact()?;
    Ok(Value::Text(prompt.choices[index].value.clone()))
}

fn ask_multi_choice(theme: &ColorfulTheme, prompt: &Prompt) -> Result<Value> {
    let labels: Vec<&str> = prompt.choices.iter().map(|c| c.name.as_str()).collect();
    let preselected: Vec<bool> = match &prompt.default {
        Some(Value::List(defaults)) => prompt
            .choices
            .iter()
            .map(|c| defaults.contains(&c.value))
            .collect(),
        _ => vec![false; prompt.choices.len()],
    };

    let selected = MultiSelect::with_theme(theme)
        .with_prompt(&prompt.message)
        .items(&labels)
        .defaults(&preselected)
        .interact()?;

    // selection keeps the choices' declaration order
    Ok(Value::List(
        selected
            .into_iter()
            .map(|index| prompt.choices[index].value.clone())
            .collect(),
    ))
}
