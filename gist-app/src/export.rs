use gist_common::ArticleResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

fn sections(result: &ArticleResult) -> impl Iterator<Item = (&'static str, &str)> {
    [
        ("Summary", result.summary.as_str()),
        ("Key Insights", result.insights.as_str()),
        ("Sentiment", result.sentiment.as_str()),
        ("Translation", result.translation.as_str()),
    ]
    .into_iter()
    .filter(|(_, body)| !body.trim().is_empty())
}

pub fn render(result: &ArticleResult, format: ExportFormat) -> anyhow::Result<String> {
    let stamp = result.timestamp.format("%Y-%m-%d %H:%M UTC");
    let out = match format {
        ExportFormat::Json => serde_json::to_string_pretty(result)?,
        ExportFormat::Markdown => {
            let mut out = format!(
                "# {}\n\n**Source:** <{}>\n**Summarized:** {stamp}\n",
                result.title, result.url
            );
            for (heading, body) in sections(result) {
                out.push_str(&format!("\n## {heading}\n\n{}\n", body.trim_end()));
            }
            out
        }
        ExportFormat::Text => {
            let mut out = format!(
                "{}\n{}\nSource: {}\nSummarized: {stamp}\n",
                result.title,
                "=".repeat(result.title.chars().count()),
                result.url
            );
            for (heading, body) in sections(result) {
                out.push_str(&format!(
                    "\n{heading}\n{}\n{}\n",
                    "-".repeat(heading.len()),
                    body.trim_end()
                ));
            }
            out
        }
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> ArticleResult {
        ArticleResult {
            url: "https://news.test/a".into(),
            title: "Headline".into(),
            summary: "Short summary.".into(),
            insights: "• One".into(),
            sentiment: String::new(),
            translation: String::new(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn markdown_omits_empty_sections() {
        let md = render(&sample(), ExportFormat::Markdown).unwrap();
        assert_eq!(
            md,
            "# Headline\n\n**Source:** <https://news.test/a>\n**Summarized:** 2024-05-01 09:30 UTC\n\
             \n## Summary\n\nShort summary.\n\
             \n## Key Insights\n\n• One\n"
        );
    }

    #[test]
    fn text_underlines_headings() {
        let txt = render(&sample(), ExportFormat::Text).unwrap();
        assert!(txt.starts_with("Headline\n========\nSource: https://news.test/a\n"));
        assert!(txt.contains("\nSummary\n-------\nShort summary.\n"));
        assert!(!txt.contains("Sentiment"));
    }

    #[test]
    fn json_round_trips() {
        let json = render(&sample(), ExportFormat::Json).unwrap();
        let back: ArticleResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
