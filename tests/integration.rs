//! Integration tests: zip archive in, report out.

use std::io::{Cursor, Write};

use zapmetrics::prelude::*;
use zapmetrics::report::{LITTLE_TEXT_NOTICE, NO_EMOJI_NOTICE};
use zapmetrics::text::count_unique_emojis;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const SAMPLE: &str = "1/1/24, 9:00 AM - Alice: Hello 😀\n1/1/24, 9:05 AM - Bob: Hi there";

fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn analyze_zip(entries: &[(&str, &[u8])]) -> Result<Analysis> {
    Analyzer::default().analyze_archive(Cursor::new(zip_archive(entries)))
}

// ============================================================================
// End-to-end example
// ============================================================================

#[test]
fn test_two_message_example() {
    let analysis = analyze_zip(&[("WhatsApp Chat with Bob.txt", SAMPLE.as_bytes())]).unwrap();
    let records = analysis.records.records();

    assert_eq!(records.len(), 2);
    let alice = &records[0];
    assert_eq!(alice.author, "Alice");
    assert_eq!(alice.hour(), 9);
    assert_eq!(alice.period(), Period::Manha);
    assert_eq!(alice.period().label(), "Manhã");
    assert_eq!(count_unique_emojis(&alice.message), vec!['😀']);

    assert_eq!(
        analysis.report.summary.source.as_deref(),
        Some("WhatsApp Chat with Bob.txt")
    );
}

#[test]
fn test_cleaned_length_policy_includes_there() {
    // "there" is five characters after cleaning, "Hi" two
    let analysis = analyze_zip(&[("chat.txt", SAMPLE.as_bytes())]).unwrap();
    let bob = &analysis.report.biographies[1];

    assert_eq!(bob.author, "Bob");
    assert_eq!(bob.frequent_words, vec!["there".to_string()]);
}

#[test]
fn test_cleaned_length_policy_excludes_punctuated_short_words() {
    // raw "oi!!" has four characters but cleans to "oi"
    let text = "1/1/24, 9:00 AM - Ana: oi!! oi!! beleza";
    let analysis = analyze_zip(&[("chat.txt", text.as_bytes())]).unwrap();

    assert_eq!(
        analysis.report.biographies[0].frequent_words,
        vec!["beleza".to_string()]
    );
}

// ============================================================================
// Archive handling
// ============================================================================

#[test]
fn test_archive_without_txt_is_archive_error() {
    let err = analyze_zip(&[("IMG-20240101-WA0001.jpg", b"\xff\xd8\xff")]).unwrap_err();
    assert!(err.is_archive_format());
    assert_eq!(err.user_message(), "Nenhum arquivo .txt encontrado no ZIP");
}

#[test]
fn test_empty_archive_is_archive_error() {
    let err = analyze_zip(&[]).unwrap_err();
    assert!(matches!(err, ZapError::NoChatFile { .. }));
}

#[test]
fn test_media_before_chat_is_skipped() {
    let analysis = analyze_zip(&[
        ("PTT-20240101-WA0001.opus", b"OggS"),
        ("chat.txt", SAMPLE.as_bytes()),
    ])
    .unwrap();
    assert_eq!(analysis.records.len(), 2);
}

#[test]
fn test_non_utf8_chat_is_decode_error() {
    let latin1 = b"1/1/24, 9:00 AM - Jo\xe3o: ol\xe1";
    let err = analyze_zip(&[("chat.txt", latin1)]).unwrap_err();
    assert!(err.is_decode());
    assert!(!err.is_archive_format());
}

#[test]
fn test_chat_over_size_limit_is_archive_error() {
    let zip = zip_archive(&[("chat.txt", SAMPLE.repeat(100).as_bytes())]);
    let analyzer = Analyzer::new(AnalyzerConfig::new().with_max_chat_bytes(SAMPLE.len()));
    let err = analyzer.analyze_archive(Cursor::new(zip)).unwrap_err();

    assert!(matches!(err, ZapError::ChatTooLarge { .. }));
    assert!(err.is_archive_format());
}

#[test]
fn test_text_without_messages_is_empty_result() {
    let err = analyze_zip(&[("chat.txt", b"Messages are end-to-end encrypted.")]).unwrap_err();
    assert!(err.is_empty_result());
    assert_eq!(err.user_message(), "Nenhuma mensagem encontrada.");
}

#[test]
fn test_analyze_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.zip");
    std::fs::write(&path, zip_archive(&[("chat.txt", SAMPLE.as_bytes())])).unwrap();

    let analysis = Analyzer::default().analyze_file(&path).unwrap();
    assert_eq!(analysis.report.summary.authors, ["Alice", "Bob"]);
}

// ============================================================================
// Parsing behaviour through the whole pipeline
// ============================================================================

#[test]
fn test_multiline_and_trailing_lines() {
    let text = "\
05/03/2024, 10:00 PM - Alice: primeira linha
segunda linha
05/03/2024, 10:01 PM - Bob: resposta
linha final sem cabeçalho";
    let analysis = analyze_zip(&[("chat.txt", text.as_bytes())]).unwrap();
    let records = analysis.records.records();

    assert_eq!(records[0].message, "primeira linha\nsegunda linha");
    assert_eq!(records[1].message, "resposta\nlinha final sem cabeçalho");
    assert_eq!(records[0].period(), Period::Noite);
}

#[test]
fn test_invalid_dates_are_dropped() {
    let text = "\
31/02/2024, 9:00 AM - Alice: data impossível
01/03/2024, 9:00 AM - Bob: data válida";
    let analysis = analyze_zip(&[("chat.txt", text.as_bytes())]).unwrap();

    assert_eq!(analysis.records.len(), 1);
    assert_eq!(analysis.records.records()[0].author, "Bob");
    assert_eq!(analysis.report.summary.parse.dropped_timestamps, 1);
}

#[test]
fn test_month_first_exports() {
    let text = "12/31/23, 11:59 PM - Alice: feliz ano novo";
    let config = AnalyzerConfig::new().with_date_order(DateOrder::MonthFirst);
    let analysis = Analyzer::new(config)
        .analyze_archive(Cursor::new(zip_archive(&[("chat.txt", text.as_bytes())])))
        .unwrap();

    let record = &analysis.records.records()[0];
    assert_eq!(record.year_month(), "2023-12");
    assert_eq!(record.hour(), 23);
}

// ============================================================================
// Report sections
// ============================================================================

#[test]
fn test_duration_identical_for_every_author() {
    let text = "\
10/01/2022, 8:00 AM - Alice: começamos aqui
15/06/2023, 8:00 AM - Bob: meio do caminho
13/03/2024, 8:00 AM - Carla: chegamos";
    let analysis = analyze_zip(&[("chat.txt", text.as_bytes())]).unwrap();
    let bios = &analysis.report.biographies;

    assert_eq!(bios.len(), 3);
    assert!(bios.iter().all(|b| b.duration == bios[0].duration));
    assert_eq!(
        bios[0].duration,
        CalendarSpan {
            years: 2,
            months: 2,
            days: 3
        }
    );
}

#[test]
fn test_short_text_skips_word_cloud() {
    let text = "1/1/24, 9:00 AM - Ana: oi\n1/1/24, 9:01 AM - Bia: olá";
    let report = analyze_zip(&[("chat.txt", text.as_bytes())]).unwrap().report;

    assert_eq!(report.word_cloud.notice(), Some(LITTLE_TEXT_NOTICE));
    assert_eq!(report.emojis.notice(), Some(NO_EMOJI_NOTICE));
    // the remaining charts still render
    assert_eq!(report.hourly.len(), 2);
    assert_eq!(report.weekday.total(), 2);
}

#[test]
fn test_word_cloud_threshold_is_configurable() {
    let text = "1/1/24, 9:00 AM - Ana: bom dia";
    let config = AnalyzerConfig::new().with_min_cloud_chars(5);
    let report = Analyzer::new(config).analyze(text).unwrap().report;
    assert!(report.word_cloud.data().is_some());
}

#[test]
fn test_top_emojis_limited_and_ranked() {
    let mut lines = Vec::new();
    let emojis = [
        "😀", "😁", "😂", "🤣", "😃", "😄", "😅", "😆", "😉", "😊", "😋", "😎", "😍", "😘", "🥰",
        "😗", "😙",
    ];
    for (i, emoji) in emojis.iter().enumerate() {
        lines.push(format!("1/1/24, 9:{:02} AM - Ana: {emoji}", i));
    }
    lines.push("1/1/24, 10:00 AM - Ana: 😙 de novo".to_string());

    let report = Analyzer::default().analyze(&lines.join("\n")).unwrap().report;
    let top = report.emojis.data().unwrap();
    assert_eq!(top.len(), 15);
    assert_eq!(top[0].label, "😙");
    assert_eq!(top[0].count, 2);
    assert_eq!(top[1].label, "😀");
}

#[test]
fn test_every_format_renders_archive() {
    let analysis = analyze_zip(&[("chat.txt", SAMPLE.as_bytes())]).unwrap();
    for format in OutputFormat::all() {
        let out = to_format_string(&analysis, *format).unwrap();
        assert!(out.contains("Bob"), "{format} output should name Bob");
    }
}
