use std::fs;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use tracing::Level;

use zlang::core::{print_error_message, print_info_message, translate_page};
use zlang::env::{EnvVar, LogLevel, NoColor};
use zlang::translation::TranslatorConfig;

const STDOUT_PATH: &str = "-";

#[derive(Parser, Debug)]
#[command(
    name = "zlang",
    version,
    about = "Translate <zlang key=\"...\"> elements of an HTML page from a JSON dictionary"
)]
struct Cli {
    /// HTML file path or URL
    #[arg(required_unless_present = "print_config")]
    target: Option<String>,

    /// Language code to translate to (defaults to the page's zlangu script attribute)
    #[arg(short, long)]
    lang: Option<String>,

    /// Dictionary location, resolved relative to the page
    #[arg(short, long)]
    dictionary: Option<String>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Network request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Custom User-Agent string
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Write output to <file>, use - for STDOUT
    #[arg(short, long, default_value = STDOUT_PATH)]
    output: String,

    /// Suppress the summary and all log output below errors
    #[arg(short, long)]
    silent: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut TranslatorConfig) {
        if let Some(lang) = &self.lang {
            config.language = Some(lang.clone());
        }
        if let Some(dictionary) = &self.dictionary {
            config.dictionary = dictionary.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = Some(user_agent.clone());
        }
    }
}

fn init_logging(silent: bool, use_color: bool) {
    let level = if silent {
        Level::ERROR
    } else {
        LogLevel::get_or_default("warn".to_string())
            .parse()
            .unwrap_or(Level::WARN)
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(use_color)
        .with_target(false)
        .init();
}

fn write_output(path: &str, data: &[u8]) -> io::Result<()> {
    if path == STDOUT_PATH {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()
    } else {
        fs::write(path, data)
    }
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let use_color = !NoColor::get_or_default(false);
    init_logging(cli.silent, use_color);

    let mut config = match TranslatorConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error_message(&e.to_string(), use_color);
            process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if cli.print_config {
        match config.to_toml_string() {
            Ok(toml) => print!("{toml}"),
            Err(e) => {
                print_error_message(&e.to_string(), use_color);
                process::exit(1);
            }
        }
        return;
    }

    // Guaranteed by clap unless --print-config was given
    let Some(target) = cli.target.as_deref() else {
        process::exit(2);
    };

    let page = match translate_page(target, &config).await {
        Ok(page) => page,
        Err(e) => {
            print_error_message(&e.to_string(), use_color);
            process::exit(1);
        }
    };

    if let Err(e) = write_output(&cli.output, &page.data) {
        print_error_message(&format!("Failed to write output: {e}"), use_color);
        process::exit(1);
    }

    if !cli.silent {
        print_info_message(&format!(
            "translated {} of {} element(s) to '{}' ({} unresolved, {} skipped)",
            page.stats.translated,
            page.stats.targets,
            page.language,
            page.stats.unresolved,
            page.stats.skipped
        ));
    }
}
