use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tabasaran_mt::dictionary::DEFAULT_SUGGEST_LIMIT;
use tabasaran_mt::{
    Direction, DictionaryService, InMemoryLexicon, LexiconEntry, OllamaRefiner, Refiner, Settings,
    TranslateRequest, TranslationService,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("tabasaran-mt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Dictionary-driven Tabasaran ⇄ Russian translation")
        .subcommand_required(true)
        .arg(
            Arg::new("lexicon")
                .long("lexicon")
                .short('l')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Lexicon JSON file (default: $LEXICON_PATH or data/dictionary.json)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .help("Print results as JSON")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate a text word by word, optionally refined by an LLM")
                .arg(
                    Arg::new("text")
                        .help("Text to translate")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("direction")
                        .long("direction")
                        .short('d')
                        .help("tab-rus or rus-tab")
                        .default_value("tab-rus"),
                )
                .arg(
                    Arg::new("llm")
                        .long("llm")
                        .help("Refine the result with the LLM server ($LLM_SERVER_URL)")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .short('v')
                        .help("Show how every word was resolved")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("lookup")
                .about("Look a Tabasaran word up in the dictionary")
                .arg(Arg::new("word").required(true).index(1))
                .arg(
                    Arg::new("reverse")
                        .long("reverse")
                        .short('r')
                        .help("Search Russian translations instead of headwords")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no-fuzzy")
                        .long("no-fuzzy")
                        .help("Only exact headword matches")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("suggest")
                .about("Headwords starting with a prefix")
                .arg(Arg::new("prefix").required(true).index(1))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .short('n')
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                ),
        )
        .subcommand(Command::new("health").about("Check the lexicon and the LLM server"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let Some((command, sub)) = matches.subcommand() else {
        return Err("No command given".into());
    };

    // global flags are accepted before or after the subcommand
    let mut settings = Settings::from_env()?;
    if let Some(path) = sub
        .get_one::<PathBuf>("lexicon")
        .or_else(|| matches.get_one::<PathBuf>("lexicon"))
    {
        settings.lexicon_path = path.clone();
    }
    let json = sub.get_flag("json") || matches.get_flag("json");

    let lexicon = Arc::new(InMemoryLexicon::load(&settings.lexicon_path)?);

    match command {
        "translate" => translate(sub, lexicon, &settings, json).await,
        "lookup" => lookup(sub, lexicon, &settings, json),
        "suggest" => suggest(sub, lexicon, &settings, json),
        "health" => health(lexicon, &settings, json).await,
        other => Err(format!("Unknown command '{}'", other).into()),
    }
}

async fn translate(
    matches: &ArgMatches,
    lexicon: Arc<InMemoryLexicon>,
    settings: &Settings,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = matches
        .get_one::<String>("text")
        .map(String::as_str)
        .unwrap_or_default();
    let direction: Direction = matches
        .get_one::<String>("direction")
        .map(String::as_str)
        .unwrap_or_default()
        .parse()?;
    let use_llm = matches.get_flag("llm");

    let request = TranslateRequest::new(text, direction, use_llm);
    request.validate(settings.max_text_length)?;

    let mut service = TranslationService::from_settings(lexicon, settings);
    if use_llm {
        let refiner = OllamaRefiner::from_settings(settings)?;
        info!("Using {:?} for refinement", refiner);
        service = service.with_refiner(Arc::new(refiner));
    }

    let response = service.translate(&request).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if matches.get_flag("verbose") {
        println!("📝 {} ({})", response.original_text, response.direction);
        for word in &response.words {
            let marker = if word.is_unknown { "❓" } else { "✅" };
            println!(
                "   {} {:<16} → {:<32} {:.2}",
                marker,
                word.source_token,
                word.translations.join(", "),
                word.confidence
            );
        }
        println!(
            "🌍 coverage {:.0}%, LLM {}",
            response.coverage() * 100.0,
            if response.llm_used { "used" } else { "not used" }
        );
        println!();
    }
    println!("{}", response.translated_text);
    Ok(())
}

fn print_entry(entry: &LexiconEntry) {
    let part_of_speech = entry
        .part_of_speech
        .as_deref()
        .map(|p| format!(" ({})", p))
        .unwrap_or_default();
    println!(
        "[{}] {}{}: {}",
        entry.id,
        entry.headword,
        part_of_speech,
        entry.translations.join(", ")
    );
    for example in &entry.examples {
        println!("    {} — {}", example.tabasaran, example.russian);
    }
}

fn lookup(
    matches: &ArgMatches,
    lexicon: Arc<InMemoryLexicon>,
    settings: &Settings,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let word = matches
        .get_one::<String>("word")
        .map(String::as_str)
        .unwrap_or_default();
    let dictionary = DictionaryService::from_settings(lexicon, settings);

    let response = if matches.get_flag("reverse") {
        dictionary.search_reverse(word)
    } else {
        dictionary.lookup(word, !matches.get_flag("no-fuzzy"))
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if response.results.is_empty() {
        println!("No entries for \"{}\"", response.query);
    } else {
        for entry in &response.results {
            print_entry(entry);
        }
    }
    Ok(())
}

fn suggest(
    matches: &ArgMatches,
    lexicon: Arc<InMemoryLexicon>,
    settings: &Settings,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let prefix = matches
        .get_one::<String>("prefix")
        .map(String::as_str)
        .unwrap_or_default();
    let limit = matches
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(DEFAULT_SUGGEST_LIMIT);

    let response = DictionaryService::from_settings(lexicon, settings).suggest(prefix, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        for suggestion in &response.suggestions {
            println!("{}", suggestion);
        }
    }
    Ok(())
}

async fn health(
    lexicon: Arc<InMemoryLexicon>,
    settings: &Settings,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let refiner = OllamaRefiner::from_settings(settings)?;
    let llm_available = refiner.is_available().await;
    let entries = DictionaryService::new(lexicon).entry_count();

    if json {
        let status = serde_json::json!({
            "status": "ok",
            "lexicon_entries": entries,
            "llm_server": settings.llm_server_url,
            "llm_model": settings.llm_model,
            "llm_available": llm_available,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("📚 Lexicon: {} entries ({})", entries, settings.lexicon_path.display());
        println!(
            "🤖 LLM {} at {}: {}",
            settings.llm_model,
            settings.llm_server_url,
            if llm_available { "available" } else { "unavailable" }
        );
    }
    Ok(())
}
