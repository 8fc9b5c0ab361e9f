use std::sync::Arc;

use anyhow::bail;
use client::ProgressFn;
use common::{Id, MaterialType, ThemeWeek};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// Free-text field. `initial` is pre-filled when editing.
pub fn text(label: &str, initial: &str, required: bool) -> anyhow::Result<String> {
    let theme = theme();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(label)
        .allow_empty(!required);
    if !initial.is_empty() {
        input = input.with_initial_text(initial);
    }
    Ok(input.interact_text()?)
}

pub fn password(confirm: bool) -> anyhow::Result<String> {
    let theme = theme();
    let mut prompt = Password::with_theme(&theme).with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Repeat password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

pub fn yes_no(label: &str, default: bool) -> anyhow::Result<bool> {
    Ok(Confirm::with_theme(&theme())
        .with_prompt(label)
        .default(default)
        .interact()?)
}

/// Confirmation for destructive actions. `assume_yes` answers for the user.
pub fn confirmer(assume_yes: bool) -> impl Fn(&str) -> bool {
    move |prompt: &str| {
        assume_yes
            || Confirm::with_theme(&theme())
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or(false)
    }
}

/// Pick a theme week. Videos and materials cannot exist without one.
pub fn week(weeks: &[ThemeWeek]) -> anyhow::Result<Id> {
    if weeks.is_empty() {
        bail!("There are no theme weeks yet. Create one with `restart admin weeks add`.");
    }
    let labels: Vec<String> = weeks
        .iter()
        .map(|w| format!("{} (#{})", w.title, w.id))
        .collect();
    let picked = Select::with_theme(&theme())
        .with_prompt("Theme week")
        .items(&labels)
        .default(weeks.len() - 1)
        .interact()?;
    Ok(weeks[picked].id.clone())
}

pub fn material_type() -> anyhow::Result<MaterialType> {
    let labels: Vec<&str> = MaterialType::ALL.iter().map(|t| t.label()).collect();
    let picked = Select::with_theme(&theme())
        .with_prompt("Material type")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(MaterialType::ALL[picked])
}

/// Progress bar fed by upload percentages.
pub fn upload_progress(file_name: &str) -> (ProgressBar, ProgressFn) {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:30.cyan/blue}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar.set_message(format!("Uploading {file_name}"));

    let handle = bar.clone();
    let progress: ProgressFn = Arc::new(move |pct| handle.set_position(u64::from(pct)));
    (bar, progress)
}
