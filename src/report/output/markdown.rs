//! Plain Markdown report, for terminals and pasting into notes.

use std::collections::HashMap;
use std::fmt::Write;

use crate::report::{CountPoint, CountSeries, Report, Section};

/// Renders the report as Markdown tables, one section per chart.
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    out.push_str("# 📊 Análise de Conversa do WhatsApp\n\n");
    if let Some(source) = &summary.source {
        let _ = writeln!(out, "Arquivo: `{source}`  ");
    }
    let _ = writeln!(out, "Mensagens: {}  ", summary.messages);
    let _ = writeln!(out, "Participantes: {}  ", summary.authors.join(", "));
    if let (Some(first), Some(last)) = (summary.first_message, summary.last_message) {
        let _ = writeln!(
            out,
            "Período: {} a {}",
            first.format("%d/%m/%Y %H:%M"),
            last.format("%d/%m/%Y %H:%M")
        );
    }
    out.push('\n');

    out.push_str("## 🕐 Mensagens por Hora\n\n");
    let hours: Vec<String> = (0..24).map(|h| h.to_string()).collect();
    push_grouped_table(&mut out, "Hora", &hours, &report.hourly);

    out.push_str("## 📅 Mensagens por Dia\n\n");
    let mut dates: Vec<String> = report
        .daily
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.label.clone()))
        .collect();
    dates.sort();
    dates.dedup();
    push_grouped_table(&mut out, "Data", &dates, &report.daily);

    out.push_str("## 📆 Mensagens por Dia da Semana\n\n");
    push_point_table(&mut out, "Dia", &report.weekday.points);

    out.push_str("## 🌓 Mensagens por Período do Dia\n\n");
    let periods: Vec<String> = report
        .periods
        .first()
        .map(|s| s.points.iter().map(|p| p.label.clone()).collect())
        .unwrap_or_default();
    push_grouped_table(&mut out, "Período", &periods, &report.periods);

    out.push_str("## 😀 Emojis Mais Usados\n\n");
    push_section(&mut out, &report.emojis, |out, points| {
        push_point_table(out, "Emoji", points);
    });

    out.push_str("## ☁️ Nuvem de Palavras\n\n");
    push_section(&mut out, &report.word_cloud, |out, points| {
        let words: Vec<String> = points
            .iter()
            .map(|p| format!("{} ({})", p.label, p.count))
            .collect();
        out.push_str(&words.join(", "));
        out.push_str("\n\n");
    });

    out.push_str("## 🧑 Mini-Biografias\n\n");
    for bio in &report.biographies {
        out.push_str(&bio.render_markdown());
        out.push('\n');
    }

    out
}

fn push_section<F>(out: &mut String, section: &Section<Vec<CountPoint>>, render: F)
where
    F: FnOnce(&mut String, &[CountPoint]),
{
    match section {
        Section::Chart { data } => render(out, data),
        Section::Empty { notice } => {
            let _ = writeln!(out, "_{notice}_\n");
        }
    }
}

fn push_point_table(out: &mut String, label: &str, points: &[CountPoint]) {
    let _ = writeln!(out, "| {label} | Mensagens |");
    out.push_str("|---|---:|\n");
    for p in points {
        let _ = writeln!(out, "| {} | {} |", escape_cell(&p.label), p.count);
    }
    out.push('\n');
}

/// One row per row label, one column per series; missing bins read as 0.
fn push_grouped_table(out: &mut String, label: &str, rows: &[String], series: &[CountSeries]) {
    let _ = write!(out, "| {label} |");
    for s in series {
        let _ = write!(out, " {} |", escape_cell(&s.name));
    }
    out.push('\n');
    out.push_str("|---|");
    for _ in series {
        out.push_str("---:|");
    }
    out.push('\n');

    let lookups: Vec<HashMap<&str, usize>> = series
        .iter()
        .map(|s| s.points.iter().map(|p| (p.label.as_str(), p.count)).collect())
        .collect();

    for row in rows {
        let _ = write!(out, "| {row} |");
        for counts in &lookups {
            let _ = write!(out, " {} |", counts.get(row.as_str()).copied().unwrap_or(0));
        }
        out.push('\n');
    }
    out.push('\n');
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
