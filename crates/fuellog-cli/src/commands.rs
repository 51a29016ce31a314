//! Command handlers

use crate::cli::{Cli, Commands, EntryArgs};
use crate::output;
use chrono::Utc;
use fuellog_app::app::{
    edit_entry, export_csv, export_csv_file, import_csv_file, locations, log_rows,
    preview_import, record_entry, scan_into_draft, trend_report, EntryDraft, ImportMode,
};
use fuellog_app::config::Config;
use fuellog_app::repository::open_log_book;
use fuellog_infra::csv_codec::parse_timestamp;
use fuellog_infra::transfer::{default_export_name, read_csv_file};
use fuellog_infra::weather::{WeatherClient, WeatherSource};
use fuellog_infra::JsonFileStorage;
use fuellog_store::LogBook;
use fuellog_types::{ConfigError, Error, OutputFormat, Result};
use fuellog_vision::{validate_image, GeminiBackend};
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match &cli.command {
        Commands::Add { entry, no_weather } => {
            cmd_add(&config, output_format, entry, *no_weather)
        }

        Commands::Scan {
            image,
            entry,
            dry_run,
            no_weather,
        } => cmd_scan(&config, output_format, image, entry, *dry_run, *no_weather),

        Commands::Edit { id, entry } => cmd_edit(&config, output_format, id, entry),

        Commands::Delete { id } => cmd_delete(&config, id),

        Commands::Clear { yes } => cmd_clear(&config, *yes),

        Commands::List { limit } => {
            let book = open_log_book(&config)?;
            output::print_rows(output_format, &log_rows(&book, *limit), &config)
        }

        Commands::Stats => {
            let book = open_log_book(&config)?;
            output::print_summary(output_format, &book.summary(), &config)
        }

        Commands::Trend => {
            let book = open_log_book(&config)?;
            output::print_trend(output_format, &trend_report(&book), &config)
        }

        Commands::Locations => {
            let book = open_log_book(&config)?;
            output::print_locations(output_format, &locations(&book), &config)
        }

        Commands::Export { output } => cmd_export(&config, output.clone()),

        Commands::Import {
            file,
            replace,
            dry_run,
        } => cmd_import(&config, output_format, file, *replace, *dry_run),

        Commands::Config {
            show,
            set,
            set_output,
            set_api_key,
            set_model,
            set_weather,
            reset,
        } => cmd_config(
            *show,
            set,
            *set_output,
            set_api_key.clone(),
            set_model.clone(),
            *set_weather,
            *reset,
        ),
    }
}

/// Turn command-line fields into a draft. Nothing is required here.
fn draft_from_args(args: &EntryArgs) -> Result<EntryDraft> {
    let timestamp = match args.date.as_deref() {
        Some(text) => Some(
            parse_timestamp(text)
                .ok_or_else(|| Error::InvalidEntry(format!("unrecognized date: {}", text)))?,
        ),
        None => None,
    };

    Ok(EntryDraft {
        timestamp,
        odometer: args.odometer,
        volume: args.gallons,
        unit_price: args.price,
        total_cost: args.total,
        location: args.location.clone(),
        latitude: args.lat,
        longitude: args.lon,
        ..Default::default()
    })
}

fn weather_client(config: &Config, no_weather: bool) -> Option<WeatherClient> {
    if no_weather || !config.weather_enabled {
        return None;
    }
    Some(
        WeatherClient::new(config.request_timeout())
            .with_fahrenheit(config.temperature_fahrenheit),
    )
}

fn vision_backend(config: &Config) -> Result<GeminiBackend> {
    let api_key = config.api_key().ok_or_else(|| {
        Error::Vision(
            "no API key configured; run `fuel-log config --set-api-key <KEY>` or set GEMINI_API_KEY"
                .to_string(),
        )
    })?;
    Ok(GeminiBackend::new(api_key, config.request_timeout())
        .with_model(Some(config.vision_model.clone())))
}

/// Accept a full id or a unique prefix of one
fn resolve_id(book: &LogBook<JsonFileStorage>, id: &str) -> Result<String> {
    if book.get(id).is_some() {
        return Ok(id.to_string());
    }

    let matches: Vec<&str> = book
        .records()
        .iter()
        .map(|r| r.id.as_str())
        .filter(|candidate| !id.is_empty() && candidate.starts_with(id))
        .collect();

    match matches.as_slice() {
        [single] => Ok(single.to_string()),
        [] => Err(Error::RecordNotFound(id.to_string())),
        _ => Err(Error::InvalidEntry(format!(
            "id prefix {} matches {} records",
            id,
            matches.len()
        ))),
    }
}

fn cmd_add(
    config: &Config,
    output_format: OutputFormat,
    entry: &EntryArgs,
    no_weather: bool,
) -> Result<()> {
    let mut book = open_log_book(config)?;
    let draft = draft_from_args(entry)?;
    let client = weather_client(config, no_weather);

    let record = record_entry(
        &mut book,
        draft,
        client.as_ref().map(|c| c as &dyn WeatherSource),
        Utc::now(),
    )?;

    output::print_saved(output_format, &record, config)
}

fn cmd_scan(
    config: &Config,
    output_format: OutputFormat,
    image: &Path,
    entry: &EntryArgs,
    dry_run: bool,
    no_weather: bool,
) -> Result<()> {
    let mime_type = validate_image(image)?;
    debug!(path = %image.display(), mime_type, "photo accepted");
    let backend = vision_backend(config)?;
    debug!(model = backend.model(), "using vision backend");

    let draft = draft_from_args(entry)?;
    let (reading, draft) = scan_into_draft(&backend, image, draft)?;

    if dry_run {
        return output::print_scan(output_format, &reading, &draft);
    }

    let mut book = open_log_book(config)?;
    let client = weather_client(config, no_weather);
    let record = record_entry(
        &mut book,
        draft,
        client.as_ref().map(|c| c as &dyn WeatherSource),
        Utc::now(),
    )
    .map_err(|e| match e {
        Error::InvalidEntry(msg) => Error::InvalidEntry(format!(
            "{} (scan read: {}; pass the missing values as flags)",
            msg,
            reading.label()
        )),
        other => other,
    })?;

    output::print_saved(output_format, &record, config)
}

fn cmd_edit(
    config: &Config,
    output_format: OutputFormat,
    id: &str,
    entry: &EntryArgs,
) -> Result<()> {
    let changes = draft_from_args(entry)?;
    if changes == EntryDraft::default() {
        return Err(Error::InvalidEntry("nothing to change".to_string()));
    }

    let mut book = open_log_book(config)?;
    let id = resolve_id(&book, id)?;
    let record = edit_entry(&mut book, &id, changes)?;

    output::print_saved(output_format, &record, config)
}

fn cmd_delete(config: &Config, id: &str) -> Result<()> {
    let mut book = open_log_book(config)?;
    let id = resolve_id(&book, id)?;
    let removed = book.delete(&id)?;
    println!("Deleted {} ({} {})", removed.id, removed.odometer, config.distance_unit);
    Ok(())
}

fn cmd_clear(config: &Config, yes: bool) -> Result<()> {
    let mut book = open_log_book(config)?;
    if !yes {
        println!(
            "This deletes all {} records. Re-run with --yes to confirm.",
            book.len()
        );
        return Ok(());
    }

    let removed = book.clear()?;
    println!("Deleted {} records", removed);
    Ok(())
}

fn cmd_export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let book = open_log_book(config)?;

    let Some(path) = output else {
        print!("{}", export_csv(&book));
        return Ok(());
    };

    let path = if path.is_dir() {
        path.join(default_export_name(Utc::now()))
    } else {
        path
    };
    let count = export_csv_file(&book, &path)?;
    println!("Exported {} records to {}", count, path.display());
    Ok(())
}

fn cmd_import(
    config: &Config,
    output_format: OutputFormat,
    file: &Path,
    replace: bool,
    dry_run: bool,
) -> Result<()> {
    if dry_run {
        let text = read_csv_file(file)?;
        let (rows, summary) = preview_import(&text, Utc::now());
        return output::print_import_preview(output_format, &rows, &summary);
    }

    let mode = if replace {
        ImportMode::Replace
    } else {
        ImportMode::Append
    };
    let mut book = open_log_book(config)?;
    let summary = import_csv_file(&mut book, file, mode)?;
    output::print_import(output_format, &summary)
}

fn cmd_config(
    show: bool,
    set: &[String],
    set_output: Option<OutputFormat>,
    set_api_key: Option<String>,
    set_model: Option<String>,
    set_weather: Option<bool>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    for pair in set {
        let (key, value) = pair.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
            key: pair.clone(),
            value: String::new(),
        })?;
        config.set(key.trim(), value.trim())?;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(api_key) = set_api_key {
        config.vision_api_key = Some(api_key);
        modified = true;
    }

    if let Some(model) = set_model {
        config.vision_model = model;
        modified = true;
    }

    if let Some(enabled) = set_weather {
        config.weather_enabled = enabled;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
