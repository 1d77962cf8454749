//! Plain-text rendering of dashboard data.

use std::fmt::Write;

use serde_json::Value;

use super::models::{parse_timestamp, Material, Topic, UpdateDetail, UpdateSummary};

pub const NO_UPDATES: &str = "No updates found. Generate your first update!";
pub const NO_TOPICS: &str = "No topics found. Add your first topic!";
pub const NO_CHATS: &str = "No recent chats found.";
pub const NO_MATERIALS: &str = "No new research materials found.";
pub const NO_TOPIC_MATERIALS: &str = "No new materials found for this topic.";

const UNKNOWN_DATE: &str = "Unknown date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub title: String,
    pub subtitle: String,
}

fn format_date(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

fn format_datetime(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

pub fn update_items(updates: &[UpdateSummary]) -> Vec<ListItem> {
    updates
        .iter()
        .map(|update| ListItem {
            title: format!("Update from {}", format_date(&update.timestamp)),
            subtitle: format!(
                "{} chats, {} new materials",
                update.num_chats, update.num_updates
            ),
        })
        .collect()
}

pub fn topic_items(topics: &[Topic]) -> Vec<ListItem> {
    topics
        .iter()
        .map(|topic| ListItem {
            title: topic.name.clone(),
            subtitle: format!(
                "Last checked: {}, {} sources, {} new materials",
                format_date(&topic.last_updated),
                topic.sources.len(),
                topic.new_materials.len()
            ),
        })
        .collect()
}

fn render_items(items: &[ListItem], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{}\n  {}", item.title, item.subtitle);
    }
    out
}

pub fn render_updates(updates: &[UpdateSummary]) -> String {
    render_items(&update_items(updates), NO_UPDATES)
}

pub fn render_topics(topics: &[Topic]) -> String {
    render_items(&topic_items(topics), NO_TOPICS)
}

fn material_date(material: &Material) -> String {
    match &material.date {
        None | Some(Value::Null) => UNKNOWN_DATE.to_string(),
        Some(Value::String(raw)) if raw.is_empty() => UNKNOWN_DATE.to_string(),
        Some(Value::String(raw)) => parse_timestamp(raw)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| raw.clone()),
        Some(other) => other.to_string(),
    }
}

pub fn render_update_detail(detail: &UpdateDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Generated on {}", format_datetime(&detail.timestamp));

    let _ = writeln!(out, "\nRecent chats");
    if detail.chats.is_empty() {
        let _ = writeln!(out, "{}", NO_CHATS);
    }
    for chat in &detail.chats {
        let topics = if chat.topics.is_empty() {
            "No topics extracted".to_string()
        } else {
            chat.topics.join(", ")
        };
        let _ = writeln!(out, "{}", chat.title);
        let _ = writeln!(out, "  {}", format_datetime(&chat.created_at));
        let _ = writeln!(out, "  Topics: {}", topics);
        let _ = writeln!(out, "  Messages: {}", chat.messages.len());
    }

    let _ = writeln!(out, "\nResearch materials");
    if detail.topic_updates.is_empty() {
        let _ = writeln!(out, "{}", NO_MATERIALS);
    }
    for (topic, materials) in &detail.topic_updates {
        let _ = writeln!(out, "{}", topic);
        if materials.is_empty() {
            let _ = writeln!(out, "  {}", NO_TOPIC_MATERIALS);
            continue;
        }
        for material in materials {
            let _ = writeln!(
                out,
                "  {}",
                material.title.as_deref().unwrap_or("Untitled")
            );
            let _ = writeln!(out, "    Published: {}", material_date(material));
            let _ = writeln!(
                out,
                "    {}",
                material
                    .snippet
                    .as_deref()
                    .unwrap_or("No description available")
            );
            let _ = writeln!(out, "    {}", material.link.as_deref().unwrap_or("#"));
        }
    }

    out
}
