use color_eyre::Result;
use parkmap_core::fetch::fetch_all;
use parkmap_core::lot::OccupancySample;
use parkmap_core::resolve::resolve;
use parkmap_core::{distance_km, Coord, OccupancyStatus, ParkingLot, Thresholds};
use parkmap_tui::db::record_snapshot;
use parkmap_tui::net::Services;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub json: bool,
    pub near: Option<Coord>,
    pub search: Option<String>,
    pub history: Option<String>,
}

/// Run the application in headless mode (no UI)
pub async fn run_headless(
    services: &Services,
    pool: Option<&SqlitePool>,
    options: &HeadlessOptions,
) -> Result<()> {
    if let Some(park_no) = &options.history {
        let samples = services.lots.fetch_history(park_no).await?;
        return if options.json {
            render_history_json(&samples)
        } else {
            render_history_text(park_no, &samples);
            Ok(())
        };
    }

    let settings = &services.settings;
    let lots = fetch_all(&services.lots, settings.page_size, &settings.retry).await;
    if lots.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "No parking data available from {}",
            settings.lots_url
        ));
    }

    if let Some(pool) = pool {
        let recorded_at = chrono::Utc::now().to_rfc3339();
        match record_snapshot(pool, &lots, &recorded_at).await {
            Ok(inserted) => log::info!("recorded {inserted} new occupancy readings"),
            Err(e) => log::warn!("failed to record occupancy snapshot: {e}"),
        }
    }

    let focus = match (&options.near, &options.search) {
        (Some(near), _) => Some(*near),
        (None, Some(text)) => Some(resolve(&services.geocoder, text).await?),
        (None, None) => None,
    };

    let summary = build_summary(&lots, &settings.thresholds, focus, settings.radius_km);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_summary_text(&summary);
    }
    Ok(())
}

#[derive(Debug, serde::Serialize)]
pub struct HeadlessSummary {
    pub total_lots: usize,
    pub total_free: i64,
    pub by_status: Vec<(String, usize)>,
    pub focus: Option<Coord>,
    pub radius_km: Option<f64>,
    pub lots: Vec<HeadlessLot>,
}

#[derive(Debug, serde::Serialize)]
pub struct HeadlessLot {
    pub park_no: String,
    pub name: String,
    pub free: i64,
    pub total: i64,
    pub percentage: Option<f64>,
    pub status: String,
    pub distance_km: Option<f64>,
    pub update_time: String,
}

/// Counts every lot by status. With a focus point, only lots within
/// `radius_km` of it are listed, nearest first.
pub fn build_summary(
    lots: &[ParkingLot],
    thresholds: &Thresholds,
    focus: Option<Coord>,
    radius_km: f64,
) -> HeadlessSummary {
    let by_status = OccupancyStatus::ALL
        .iter()
        .map(|status| {
            let count = lots
                .iter()
                .filter(|lot| lot.status(thresholds) == *status)
                .count();
            (status.as_str().to_string(), count)
        })
        .collect();

    let mut listed: Vec<HeadlessLot> = lots
        .iter()
        .map(|lot| HeadlessLot {
            park_no: lot.park_no.clone(),
            name: lot.parking_name.clone(),
            free: lot.free_quantity,
            total: lot.total_quantity,
            percentage: lot.percentage_free(),
            status: lot.status(thresholds).as_str().to_string(),
            distance_km: focus.map(|center| distance_km(center, lot.position())),
            update_time: lot.update_time.clone(),
        })
        .filter(|lot| lot.distance_km.map_or(true, |distance| distance <= radius_km))
        .collect();

    if focus.is_some() {
        listed.sort_by(|a, b| {
            a.distance_km
                .unwrap_or(f64::MAX)
                .total_cmp(&b.distance_km.unwrap_or(f64::MAX))
        });
    }

    HeadlessSummary {
        total_lots: lots.len(),
        total_free: lots.iter().map(|lot| lot.free_quantity.max(0)).sum(),
        by_status,
        focus,
        radius_km: focus.map(|_| radius_km),
        lots: listed,
    }
}

fn render_summary_text(summary: &HeadlessSummary) {
    println!("\nParking Availability");
    println!("====================");
    println!("Total lots: {}", summary.total_lots);
    println!("Free spaces: {}", summary.total_free);

    println!("\nLots by Status:");
    for (status, count) in &summary.by_status {
        println!("- {status}: {count}");
    }

    match (summary.focus, summary.radius_km) {
        (Some(focus), Some(radius)) => {
            println!("\nWithin {radius:.1} km of {focus}:");
        }
        _ => println!("\nAll Lots:"),
    }
    if summary.lots.is_empty() {
        println!("(none)");
    }
    for lot in &summary.lots {
        let distance = lot
            .distance_km
            .map_or_else(String::new, |km| format!(" | {km:.2} km"));
        println!(
            "- {} | {} | {}/{} | {}{}",
            lot.park_no, lot.name, lot.free, lot.total, lot.status, distance
        );
    }
}

fn render_history_text(park_no: &str, samples: &[OccupancySample]) {
    println!("\nHistory of lot {park_no}");
    println!("==================");
    if samples.is_empty() {
        println!("(no readings)");
    }
    for sample in samples {
        println!(
            "- {} | {}/{}",
            sample.update_time, sample.free_quantity, sample.total_quantity
        );
    }
}

fn render_history_json(samples: &[OccupancySample]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(samples)?);
    Ok(())
}
