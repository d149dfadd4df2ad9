//! Report widgets: bar charts and word clouds built from plain iced primitives.

use crate::Message;
use iced::widget::{column, container, progress_bar, row, text, Column, Row};
use iced::{theme, Alignment, Color, Element, Length, Theme};
use insight_engine::{RankedKeyword, SentimentAggregate, WordCloud};

pub const POSITIVE_COLOR: Color = Color::from_rgb(0.18, 0.62, 0.34);
pub const NEGATIVE_COLOR: Color = Color::from_rgb(0.80, 0.22, 0.22);

const CLOUD_DISPLAY_WORDS: usize = 40;
const CLOUD_WORDS_PER_ROW: usize = 5;
const CLOUD_MIN_SIZE: f32 = 12.0;
const CLOUD_MAX_SIZE: f32 = 36.0;

pub fn section_title<'a>(title: &str) -> Element<'a, Message, Theme> {
    text(title).size(20).into()
}

/// Horizontal bars for the positive and negative counts.
pub fn distribution<'a>(aggregate: &SentimentAggregate) -> Element<'a, Message, Theme> {
    let total = aggregate.total_count.max(1) as f32;

    let bar = |label: &str, count: usize, style: theme::ProgressBar| -> Element<'a, Message, Theme> {
        row![
            text(label).width(Length::Fixed(90.0)),
            progress_bar(0.0..=total, count as f32)
                .height(Length::Fixed(22.0))
                .style(style),
            text(count).width(Length::Fixed(50.0)),
        ]
        .spacing(10)
        .align_items(Alignment::Center)
        .into()
    };

    column![
        bar("Positive", aggregate.positive_count, theme::ProgressBar::Success),
        bar("Negative", aggregate.negative_count, theme::ProgressBar::Danger),
    ]
    .spacing(8)
    .into()
}

/// Keyword table with a bar per score. Lower scores are more relevant.
pub fn keyword_bars<'a>(keywords: &[RankedKeyword]) -> Element<'a, Message, Theme> {
    if keywords.is_empty() {
        return text("No keywords found").size(14).into();
    }

    let max_score = keywords
        .iter()
        .map(|k| k.score)
        .fold(f64::MIN_POSITIVE, f64::max) as f32;

    let header = row![
        text("Keyword").size(14).width(Length::Fixed(160.0)),
        text("Score").size(14).width(Length::Fixed(80.0)),
    ]
    .spacing(10);

    keywords
        .iter()
        .fold(Column::new().spacing(6).push(header), |col, keyword| {
            col.push(
                row![
                    text(&keyword.keyword).width(Length::Fixed(160.0)),
                    text(format!("{:.4}", keyword.display_score())).width(Length::Fixed(80.0)),
                    progress_bar(0.0..=max_score, keyword.score as f32)
                        .height(Length::Fixed(14.0)),
                ]
                .spacing(10)
                .align_items(Alignment::Center),
            )
        })
        .into()
}

/// Words laid out in rows, sized by relative frequency.
pub fn word_cloud<'a>(
    title: &str,
    cloud: &WordCloud,
    tint: Option<Color>,
) -> Element<'a, Message, Theme> {
    let body: Element<'a, Message, Theme> = if cloud.is_empty() {
        text("Not enough words").size(14).into()
    } else {
        let words: Vec<_> = cloud.words.iter().take(CLOUD_DISPLAY_WORDS).collect();
        words
            .chunks(CLOUD_WORDS_PER_ROW)
            .fold(Column::new().spacing(4), |col, chunk| {
                let line = chunk.iter().fold(Row::new().spacing(8), |line, word| {
                    let size = CLOUD_MIN_SIZE + (CLOUD_MAX_SIZE - CLOUD_MIN_SIZE) * word.weight;
                    let label = text(&word.word).size(size);
                    match tint {
                        Some(color) => line.push(label.style(color)),
                        None => line.push(label),
                    }
                });
                col.push(line.align_items(Alignment::End))
            })
            .into()
    };

    container(column![text(title).size(16), body].spacing(8))
        .padding(10)
        .width(Length::FillPortion(1))
        .style(theme::Container::Box)
        .into()
}

/// Bullet list of sample comments.
pub fn samples<'a>(title: &str, comments: &[String], tint: Color) -> Element<'a, Message, Theme> {
    let list = if comments.is_empty() {
        Column::new().push(text("None").size(14))
    } else {
        comments.iter().fold(Column::new().spacing(6), |col, comment| {
            col.push(text(format!("• {comment}")).size(14))
        })
    };

    container(column![text(title).size(16).style(tint), list].spacing(8))
        .padding(10)
        .width(Length::FillPortion(1))
        .style(theme::Container::Box)
        .into()
}
