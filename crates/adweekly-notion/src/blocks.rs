//! Maps rendered report sections onto Notion block objects.

use adweekly_report::{Block, ReportDocument};
use serde_json::{json, Value};

/// Notion rejects rich text items longer than this.
const MAX_TEXT_CHARS: usize = 2000;

/// Flattened page body: each section heading followed by its blocks.
#[must_use]
pub fn page_children(document: &ReportDocument) -> Vec<Value> {
    let mut children = Vec::new();
    for (i, section) in document.sections.iter().enumerate() {
        if i > 0 {
            children.push(json!({ "object": "block", "type": "divider", "divider": {} }));
        }
        children.push(text_block("heading_2", &section.heading));
        children.extend(section.blocks.iter().map(block));
    }
    children
}

fn block(block: &Block) -> Value {
    match block {
        Block::Callout { icon, lines } => json!({
            "object": "block",
            "type": "callout",
            "callout": {
                "rich_text": rich_text(&lines.join("\n")),
                "icon": { "type": "emoji", "emoji": icon },
            }
        }),
        Block::Subheading { text } => text_block("heading_3", text),
        Block::Bullet { text } => text_block("bulleted_list_item", text),
        Block::Toggle { summary, details } => {
            let children: Vec<Value> = details
                .iter()
                .map(|d| text_block("bulleted_list_item", d))
                .collect();
            json!({
                "object": "block",
                "type": "toggle",
                "toggle": { "rich_text": rich_text(summary), "children": children }
            })
        }
    }
}

fn text_block(kind: &str, text: &str) -> Value {
    json!({
        "object": "block",
        "type": kind,
        kind: { "rich_text": rich_text(text) }
    })
}

fn rich_text(content: &str) -> Value {
    let truncated: String = content.chars().take(MAX_TEXT_CHARS).collect();
    json!([{ "type": "text", "text": { "content": truncated } }])
}

#[cfg(test)]
mod tests {
    use adweekly_report::{ReportProperties, ReportStatus, Section};
    use chrono::NaiveDate;

    use super::*;

    fn document(sections: Vec<Section>) -> ReportDocument {
        let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        ReportDocument {
            key: start,
            title: "Week of 2025-03-03".to_owned(),
            properties: ReportProperties {
                week_start: start,
                week_end: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
                total_spend: 0.0,
                total_impressions: 0,
                total_clicks: 0,
                total_conversions: 0,
                total_revenue: 0.0,
                avg_cpc: None,
                avg_ctr: None,
                avg_cpa: None,
                roas: None,
                campaign_count: 0,
                status: ReportStatus::NeedsReview,
            },
            sections,
        }
    }

    #[test]
    fn sections_become_headings_separated_by_dividers() {
        let doc = document(vec![
            Section {
                heading: "Weekly summary".to_owned(),
                blocks: vec![Block::Callout {
                    icon: "💰".to_owned(),
                    lines: vec!["Total spend: 1".to_owned(), "Clicks: 2".to_owned()],
                }],
            },
            Section {
                heading: "Audience insights".to_owned(),
                blocks: vec![
                    Block::Subheading {
                        text: "Age".to_owned(),
                    },
                    Block::Bullet {
                        text: "25-34".to_owned(),
                    },
                ],
            },
        ]);

        let children = page_children(&doc);
        let kinds: Vec<&str> = children.iter().map(|c| c["type"].as_str().unwrap()).collect();
        assert_eq!(
            kinds,
            ["heading_2", "callout", "divider", "heading_2", "heading_3", "bulleted_list_item"]
        );
        assert_eq!(
            children[1]["callout"]["rich_text"][0]["text"]["content"],
            "Total spend: 1\nClicks: 2"
        );
        assert_eq!(children[1]["callout"]["icon"]["emoji"], "💰");
    }

    #[test]
    fn toggle_nests_details_as_bullets() {
        let doc = document(vec![Section {
            heading: "Campaign performance".to_owned(),
            blocks: vec![Block::Toggle {
                summary: "Sale | Spend: 10".to_owned(),
                details: vec!["Impressions: 100".to_owned()],
            }],
        }]);
        let children = page_children(&doc);
        let toggle = &children[1]["toggle"];
        assert_eq!(toggle["rich_text"][0]["text"]["content"], "Sale | Spend: 10");
        assert_eq!(toggle["children"][0]["type"], "bulleted_list_item");
    }

    #[test]
    fn long_text_is_truncated() {
        let long = "x".repeat(MAX_TEXT_CHARS + 50);
        let value = rich_text(&long);
        assert_eq!(
            value[0]["text"]["content"].as_str().unwrap().chars().count(),
            MAX_TEXT_CHARS
        );
    }
}
