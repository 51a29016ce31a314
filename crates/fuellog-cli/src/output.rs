//! Output formatting module

use chrono::{DateTime, Local, Utc};
use fuellog_app::app::{EntryDraft, ImportSummary, LogRow, TrendReport};
use fuellog_app::config::Config;
use fuellog_domain::service::{LocationVisit, LogSummary, TrendPoint};
use fuellog_infra::weather::weather_description;
use fuellog_types::{FuelLogRecord, NewFuelLog, OutputFormat, Result, ScanReading};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn local_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn or_dash(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

pub fn print_saved(
    output_format: OutputFormat,
    record: &FuelLogRecord,
    config: &Config,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(record);
    }

    println!("\nSaved Fill-up");
    println!("=============");
    println!("ID:           {}", record.id);
    println!("Date:         {}", local_time(&record.timestamp));
    println!("Odometer:     {} {}", record.odometer, config.distance_unit);
    println!("Volume:       {:.3} {}", record.volume, config.volume_unit);
    println!(
        "Price:        {}{:.3}/{}",
        config.currency, record.unit_price, config.volume_unit
    );
    println!("Total:        {}{:.2}", config.currency, record.total_cost);

    if let Some(ref location) = record.location {
        println!("Location:     {}", location);
    }
    if let Some((lat, lon)) = record.coordinates() {
        println!("Coordinates:  {:.5}, {:.5}", lat, lon);
    }
    if let (Some(temp), Some(code)) = (record.weather_temperature, record.weather_code) {
        let unit = if config.temperature_fahrenheit { "F" } else { "C" };
        println!("Weather:      {:.0}°{} {}", temp, unit, weather_description(code));
    }

    Ok(())
}

pub fn print_rows(output_format: OutputFormat, rows: &[LogRow], config: &Config) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(rows);
    }

    if rows.is_empty() {
        println!("No fill-ups recorded yet.");
        return Ok(());
    }

    println!(
        "{:<8}  {:<16}  {:>10}  {:>8}  {:>7}  {:>8}  {:>7}  Location",
        "ID",
        "Date",
        "Odometer",
        config.volume_unit,
        "Price",
        "Total",
        config.economy_unit()
    );
    println!("{}", "-".repeat(90));

    for row in rows {
        let r = &row.record;
        println!(
            "{:<8}  {:<16}  {:>10}  {:>8.3}  {:>7.3}  {:>8.2}  {:>7}  {}",
            short_id(&r.id),
            local_time(&r.timestamp),
            r.odometer,
            r.volume,
            r.unit_price,
            r.total_cost,
            or_dash(row.economy, 1),
            r.location.as_deref().unwrap_or("")
        );
    }

    Ok(())
}

pub fn print_summary(
    output_format: OutputFormat,
    summary: &LogSummary,
    config: &Config,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(summary);
    }

    let economy_unit = config.economy_unit();
    println!("\nFuel Log Statistics");
    println!("===================");
    println!("Fill-ups:        {}", summary.entry_count);
    println!("Total spend:     {}{:.2}", config.currency, summary.total_spend);
    println!("Total volume:    {:.3} {}", summary.total_volume, config.volume_unit);
    println!(
        "Avg price:       {}{}",
        config.currency,
        or_dash(summary.average_unit_price, 3)
    );

    println!("\n--- Economy ({}) ---", economy_unit);
    println!("Average:         {}", or_dash(summary.average_economy, 2));
    println!("Best:            {}", or_dash(summary.best_economy, 2));
    println!("Worst:           {}", or_dash(summary.worst_economy, 2));

    println!("\n--- Distance ---");
    println!(
        "Covered:         {} {}",
        or_dash(summary.distance_span, 1),
        config.distance_unit
    );
    println!(
        "Cost per {}:     {}{}",
        config.distance_unit,
        config.currency,
        or_dash(summary.cost_per_distance, 3)
    );
    println!("Latest odometer: {}", or_dash(summary.latest_odometer, 1));

    Ok(())
}

fn print_series(title: &str, points: &[TrendPoint], decimals: usize) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.chars().count()));
    if points.is_empty() {
        println!("(not enough data)");
        return;
    }
    for point in points {
        println!("{}  {:.*}", local_time(&point.timestamp), decimals, point.value);
    }
}

pub fn print_trend(
    output_format: OutputFormat,
    report: &TrendReport,
    config: &Config,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(report);
    }

    print_series(&format!("Fuel Economy ({})", config.economy_unit()), &report.economy, 2);
    print_series(
        &format!("Price ({}/{})", config.currency, config.volume_unit),
        &report.price,
        3,
    );
    Ok(())
}

pub fn print_locations(
    output_format: OutputFormat,
    visits: &[LocationVisit],
    config: &Config,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(visits);
    }

    if visits.is_empty() {
        println!("No fill-ups with coordinates.");
        return Ok(());
    }

    for visit in visits {
        println!(
            "{}  {:>10.5}, {:>11.5}  {}{:.2}  {}",
            local_time(&visit.timestamp),
            visit.latitude,
            visit.longitude,
            config.currency,
            visit.total_cost,
            visit.label.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

pub fn print_import(output_format: OutputFormat, summary: &ImportSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(summary);
    }

    if summary.replaced > 0 {
        println!("Replaced {} existing records", summary.replaced);
    }
    println!("imported {}, skipped {}", summary.imported, summary.skipped);
    Ok(())
}

#[derive(Serialize)]
struct ImportPreview<'a> {
    summary: &'a ImportSummary,
    rows: &'a [NewFuelLog],
}

pub fn print_import_preview(
    output_format: OutputFormat,
    rows: &[NewFuelLog],
    summary: &ImportSummary,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&ImportPreview { summary, rows });
    }

    println!("Dry run - nothing saved");
    for row in rows {
        println!(
            "{}  {:>10}  {:>8.3}  {:>8.2}  {}",
            local_time(&row.timestamp),
            row.odometer,
            row.volume,
            row.total_cost,
            row.location.as_deref().unwrap_or("")
        );
    }
    println!("would import {}, skipped {}", summary.imported, summary.skipped);
    Ok(())
}

#[derive(Serialize)]
struct ScanPreview<'a> {
    reading: &'a ScanReading,
    draft: &'a EntryDraft,
}

pub fn print_scan(
    output_format: OutputFormat,
    reading: &ScanReading,
    draft: &EntryDraft,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(&ScanPreview { reading, draft });
    }

    println!("\nScan Result");
    println!("===========");
    println!("Display:      {}", reading.label());
    println!("Odometer:     {}", or_dash(draft.odometer, 1));
    println!("Volume:       {}", or_dash(draft.volume, 3));
    println!("Price:        {}", or_dash(draft.unit_price, 3));
    println!("Total:        {}", or_dash(draft.total_cost, 2));
    if reading.is_empty() {
        println!("\nNothing could be read from the photo.");
    }
    Ok(())
}
