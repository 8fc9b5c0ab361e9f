//! Terminal rendering of collections, pages and change notifications.

use client::{Dashboard, ListEvent, WeekCatalog, WeekPage};
use common::youtube;
use common::{Material, ThemeWeek, User, Video};
use console::{Alignment, measure_text_width, pad_str, style};
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::TryRecvError;

const MAX_COLUMN: usize = 40;

/// Left-aligned text table sized to its contents.
struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| measure_text_width(cell))
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN)
            })
            .collect()
    }

    fn print(&self, empty: &str) {
        if self.rows.is_empty() {
            println!("{}", style(empty).dim());
            return;
        }
        let widths = self.widths();
        println!("{}", style(line(self.headers.iter().copied(), &widths)).bold());
        for row in &self.rows {
            println!("{}", line(row.iter().map(String::as_str), &widths));
        }
    }
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, Some("…")).into_owned())
        .collect::<Vec<_>>()
        .join("  ")
}

fn day(raw: &str) -> String {
    common::models::theme_week::parse_day(raw)
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn yes(flag: bool) -> String {
    if flag { "yes".into() } else { String::new() }
}

pub fn users(users: &[User]) {
    let mut table = Table::new(&["ID", "USERNAME", "ADMIN", "CREATED"]);
    for user in users {
        table.row(vec![
            user.id.to_string(),
            user.username.clone(),
            yes(user.is_admin),
            user.created_at
                .map(|t| t.format("%d.%m.%Y").to_string())
                .unwrap_or_default(),
        ]);
    }
    table.print("No users.");
}

pub fn weeks(weeks: &[ThemeWeek]) {
    let mut table = Table::new(&["ID", "TITLE", "START", "END", "VIDEOS"]);
    for week in weeks {
        table.row(vec![
            week.id.to_string(),
            week.title.clone(),
            day(&week.start_date),
            day(&week.end_date),
            week.videos_count.to_string(),
        ]);
    }
    table.print("No theme weeks yet.");
}

pub fn videos(videos: &[Video]) {
    let mut table = Table::new(&["ID", "TITLE", "STUDENT", "WEEK", "YOUTUBE"]);
    for video in videos {
        table.row(vec![
            video.id.to_string(),
            video.title.clone(),
            video.student_name.clone(),
            video.theme_week_id.to_string(),
            video.youtube_url.clone(),
        ]);
    }
    table.print("No videos yet.");
}

pub fn materials(materials: &[Material]) {
    let mut table = Table::new(&["ID", "TITLE", "STUDENT", "TYPE", "WEEK", "WINNER", "URL"]);
    for m in materials {
        table.row(vec![
            m.id.to_string(),
            m.title.clone(),
            m.student_name.clone(),
            m.material_type.label().to_string(),
            m.theme_week_id.to_string(),
            if m.is_winner { "★".into() } else { String::new() },
            m.url.clone(),
        ]);
    }
    table.print("No materials yet.");
}

pub fn catalog(catalog: &WeekCatalog) {
    println!(
        "{} weeks, {} videos",
        style(catalog.total_weeks()).bold(),
        style(catalog.total_videos()).bold()
    );
    if let Some(latest) = catalog.latest() {
        println!("Latest: {}", style(&latest.title).cyan());
    }
    println!();
    weeks(catalog.weeks());
}

fn material_line(m: &Material) {
    println!(
        "  {} {} {}",
        style(&m.title).bold(),
        style(format!("by {}", m.student_name)).dim(),
        style(format!("[{}]", m.material_type.label())).dim()
    );
    if !m.description.is_empty() {
        println!("    {}", m.description);
    }
    match youtube::embed_url(&m.url) {
        Some(embed) if m.material_type == common::MaterialType::Youtube => {
            println!("    {embed}")
        }
        _ => println!("    {}", m.url),
    }
}

pub fn week_page(page: &WeekPage) {
    let week = &page.week;
    println!("{}", style(&week.title).bold().cyan());
    println!("{} – {}", day(&week.start_date), day(&week.end_date));
    if !week.description.is_empty() {
        println!("{}", week.description);
    }
    if !week.result_url.is_empty() {
        println!("Result video: {}", week.result_url);
    }

    println!();
    println!("{}", style("Winners").bold().yellow());
    let mut any = false;
    for m in page.winners() {
        any = true;
        material_line(m);
    }
    if !any {
        println!("  {}", style("No winners yet.").dim());
    }

    println!();
    println!("{}", style("Materials").bold());
    any = false;
    for m in page.others() {
        any = true;
        material_line(m);
    }
    if !any {
        println!("  {}", style("Nothing else submitted.").dim());
    }
}

pub fn dashboard(d: &Dashboard) {
    let mut table = Table::new(&["COLLECTION", "COUNT"]);
    table.row(vec!["Users".into(), d.users.to_string()]);
    table.row(vec!["Theme weeks".into(), d.weeks.to_string()]);
    table.row(vec!["Videos".into(), d.videos.to_string()]);
    table.row(vec!["Materials".into(), d.materials.to_string()]);
    table.row(vec!["Winners".into(), d.winners.to_string()]);
    table.print("");
}

pub fn user(user: &User) {
    let role = if user.is_admin { "administrator" } else { "participant" };
    println!("{} ({role}, #{})", style(&user.username).bold(), user.id);
}

/// Print every change a list has announced since the last drain.
pub fn changes<T: Clone>(events: &mut Receiver<ListEvent<T>>, describe: impl Fn(&T) -> String) {
    loop {
        match events.try_recv() {
            Ok(ListEvent::Added(item)) => success(&format!("Added {}", describe(&item))),
            Ok(ListEvent::Updated(item)) => success(&format!("Updated {}", describe(&item))),
            Ok(ListEvent::Removed(id)) => success(&format!("Deleted #{id}")),
            Ok(ListEvent::Failed(message)) => failure(&message),
            Ok(ListEvent::Loading | ListEvent::Loaded(_)) => {}
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

pub fn success(message: &str) {
    println!("{} {message}", style("✓").green());
}

pub fn failure(message: &str) {
    eprintln!("{} {message}", style("✗").red());
}
