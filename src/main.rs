//! # zapmetrics CLI
//!
//! Command-line interface for the zapmetrics library.

use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use zapmetrics::ZapError;
use zapmetrics::cli::{AnalyzeArgs, Args, Command, ServeArgs};
use zapmetrics::config::ServeConfig;
use zapmetrics::format::{OutputFormat, write_format, write_to_format};
use zapmetrics::report::{Analysis, Analyzer};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ZapError> {
    let args = <Args as ClapParser>::parse();
    let env_config = ServeConfig::from_env();
    init_tracing(&env_config);

    match args.command {
        Command::Analyze(analyze) => run_analyze(&analyze),
        Command::Serve(serve) => run_serve(&serve, env_config),
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(config: &ServeConfig) {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match config.log_level.parse::<EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: ZAPMETRICS_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    config.log_level, e
                );
                EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(io::stderr);

    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn run_analyze(args: &AnalyzeArgs) -> Result<(), ZapError> {
    let total_start = Instant::now();
    let format = args.resolved_format();
    let analyzer = Analyzer::new(args.analyzer_config());

    // Without -o the report owns stdout; progress goes to stderr
    let to_stdout = args.output.is_none();
    let say = |line: String| {
        if to_stdout {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    };

    say(format!("📊 zapmetrics v{}", env!("CARGO_PKG_VERSION")));
    say("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".to_string());
    say(format!("📂 Input:   {}", args.input));
    if let Some(output) = &args.output {
        say(format!("💾 Output:  {}", output));
    }
    say(format!("📄 Format:  {}", format));
    say(String::new());

    say("⏳ Analyzing chat...".to_string());
    let analysis_start = Instant::now();
    let analysis = analyzer.analyze_file(Path::new(&args.input))?;
    say(format!(
        "   Found {} messages from {} participants ({:.2}s)",
        analysis.report.summary.messages,
        analysis.report.summary.authors.len(),
        analysis_start.elapsed().as_secs_f64()
    ));
    let dropped = analysis.report.summary.parse.dropped_timestamps;
    if dropped > 0 {
        say(format!("⚠️  Skipped {} messages with invalid dates", dropped));
    }

    write_output(&analysis, args.output.as_deref(), format)?;

    let total_time = total_start.elapsed();
    say(String::new());
    match &args.output {
        Some(output) => say(format!("✅ Done! Report saved to {}", output)),
        None => say("✅ Done!".to_string()),
    }
    say(String::new());
    say("⚡ Performance:".to_string());
    say(format!("   Total time:  {:.2}s", total_time.as_secs_f64()));
    let msgs_per_sec = analysis.report.summary.messages as f64 / total_time.as_secs_f64();
    say(format!("   Throughput:  {:.0} messages/sec", msgs_per_sec));

    Ok(())
}

fn write_output(
    analysis: &Analysis,
    output: Option<&str>,
    format: OutputFormat,
) -> Result<(), ZapError> {
    match output {
        Some(path) => write_to_format(analysis, path, format),
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_format(analysis, &mut lock, format)?;
            lock.flush()?;
            Ok(())
        }
    }
}

fn run_serve(args: &ServeArgs, env_config: ServeConfig) -> Result<(), ZapError> {
    let config = args.apply(env_config);
    let analyzer = args.analyzer_config();

    println!("📊 zapmetrics v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("🌐 Upload UI: http://{}", config.bind_address);
    if config.metrics_active() {
        println!("📈 Metrics:   http://0.0.0.0:{}/metrics", config.metrics_port);
    } else {
        println!("📈 Metrics:   disabled");
    }
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(zapmetrics::server::serve(config, analyzer))
}
