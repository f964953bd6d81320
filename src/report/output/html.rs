//! Self-contained HTML report.
//!
//! Charts are Plotly.js figures: the traces and layouts are built here as
//! JSON and drawn client-side. The word cloud is a flow of sized words.
//! All user text goes through minijinja auto-escaping; figure JSON is
//! embedded with the `tojson` filter.

use minijinja::{Environment, context};
use serde::Serialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::report::{CountPoint, CountSeries, Report};

const TEMPLATE_NAME: &str = "report.html";
const TEMPLATE: &str = include_str!("templates/report.html");

/// Plotly.js bundle loaded by the page.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const MIN_FONT_PX: f64 = 12.0;
const MAX_FONT_PX: f64 = 56.0;

#[derive(Debug, Serialize)]
struct Figure {
    id: &'static str,
    title: &'static str,
    data: Value,
    layout: Value,
}

#[derive(Debug, Serialize)]
struct CloudWord<'a> {
    text: &'a str,
    count: usize,
    size: u32,
}

#[derive(Debug, Serialize)]
struct Bio {
    author: String,
    message_count: usize,
    emojis: String,
    words: String,
    duration: String,
}

/// Renders the full report page.
pub fn render_html(report: &Report) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    let template = env.get_template(TEMPLATE_NAME)?;

    let figures = vec![
        grouped_bars(
            "hourly",
            "Mensagens por Hora e Autor",
            "Hora do dia",
            &report.hourly,
        ),
        daily_lines(&report.daily),
        Figure {
            id: "weekday",
            title: "Mensagens por Dia da Semana",
            data: json!([bar_trace(None, &report.weekday.points)]),
            layout: layout("Dia da semana", false),
        },
        grouped_bars(
            "periods",
            "Mensagens por Período do Dia",
            "Período",
            &report.periods,
        ),
    ];

    let emoji_figure = report.emojis.data().map(|points| Figure {
        id: "emojis",
        title: "Top Emojis",
        data: json!([bar_trace(None, points)]),
        layout: layout("Emoji", false),
    });

    let cloud = report.word_cloud.data().map(|points| cloud_words(points));
    let bios: Vec<Bio> = report
        .biographies
        .iter()
        .map(|b| Bio {
            author: b.author.clone(),
            message_count: b.message_count,
            emojis: b.emoji_summary(),
            words: b.word_summary(),
            duration: b.duration.describe(),
        })
        .collect();

    let html = template.render(context! {
        plotly_cdn => PLOTLY_CDN,
        summary => &report.summary,
        first_message => report.summary.first_message.map(|t| t.format("%d/%m/%Y %H:%M").to_string()),
        last_message => report.summary.last_message.map(|t| t.format("%d/%m/%Y %H:%M").to_string()),
        figures => figures,
        emoji_figure => emoji_figure,
        emoji_notice => report.emojis.notice(),
        cloud => cloud,
        cloud_notice => report.word_cloud.notice(),
        bios => bios,
    })?;
    Ok(html)
}

fn layout(x_title: &str, grouped: bool) -> Value {
    let mut layout = json!({
        "xaxis": { "title": { "text": x_title }, "type": "category" },
        "yaxis": { "title": { "text": "Mensagens" } },
        "margin": { "t": 30 },
        "legend": { "orientation": "h" },
    });
    if grouped {
        layout["barmode"] = json!("group");
    }
    layout
}

fn bar_trace(name: Option<&str>, points: &[CountPoint]) -> Value {
    let x: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
    let y: Vec<usize> = points.iter().map(|p| p.count).collect();
    let mut trace = json!({ "type": "bar", "x": x, "y": y });
    if let Some(name) = name {
        trace["name"] = json!(name);
    }
    trace
}

fn grouped_bars(
    id: &'static str,
    title: &'static str,
    x_title: &str,
    series: &[CountSeries],
) -> Figure {
    let data: Vec<Value> = series
        .iter()
        .map(|s| bar_trace(Some(&s.name), &s.points))
        .collect();
    Figure {
        id,
        title,
        data: Value::Array(data),
        layout: layout(x_title, true),
    }
}

fn daily_lines(series: &[CountSeries]) -> Figure {
    let data: Vec<Value> = series
        .iter()
        .map(|s| {
            let x: Vec<&str> = s.points.iter().map(|p| p.label.as_str()).collect();
            let y: Vec<usize> = s.points.iter().map(|p| p.count).collect();
            json!({ "type": "scatter", "mode": "lines+markers", "name": s.name, "x": x, "y": y })
        })
        .collect();

    let mut layout = layout("Data", false);
    layout["xaxis"]["type"] = json!("date");
    Figure {
        id: "daily",
        title: "Mensagens por Dia e Autor",
        data: Value::Array(data),
        layout,
    }
}

/// Linear font scaling between the least and most frequent word.
fn cloud_words(points: &[CountPoint]) -> Vec<CloudWord<'_>> {
    let max = points.iter().map(|p| p.count).max().unwrap_or(1);
    let min = points.iter().map(|p| p.count).min().unwrap_or(1);
    let range = (max - min).max(1) as f64;

    points
        .iter()
        .map(|p| {
            let t = (p.count - min) as f64 / range;
            CloudWord {
                text: &p.label,
                count: p.count,
                size: (MIN_FONT_PX + t * (MAX_FONT_PX - MIN_FONT_PX)).round() as u32,
            }
        })
        .collect()
}
