use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use log::{error, info};

use fishing_planner::config::PlannerConfig;
use fishing_planner::domain::commands::calendar::CalendarMonthQuery;
use fishing_planner::initialize_backend;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = PlannerConfig::load()?;
    let state = initialize_backend(&config)?;
    let today = Local::now().date_naive();

    match args.first().map(String::as_str) {
        None | Some("summary") => {
            let stats = state.trip_store.stats();
            println!(
                "{} trips ({} planned, {} completed)",
                stats.total, stats.planned, stats.completed
            );
            for trip in state.trip_store.upcoming_trips(today) {
                println!(
                    "  {}  {:<24} {:<20} {}",
                    trip.date,
                    trip.name,
                    trip.location,
                    trip.fishing_type
                );
            }
        }
        Some("calendar") => {
            let (month, year) = match args.get(1) {
                Some(arg) => parse_month_arg(arg)?,
                None => (today.month(), today.year()),
            };
            let query = CalendarMonthQuery {
                month,
                year,
                today,
                selected: None,
            };
            let calendar = state
                .calendar_service
                .generate_calendar_month(&query, &state.trip_store.trips())?;

            println!("{} {}", state.calendar_service.month_name(month), year);
            println!(" Su  Mo  Tu  We  Th  Fr  Sa");
            for week in calendar.weeks() {
                let row: Vec<String> = week
                    .iter()
                    .map(|day| {
                        let marker = if day.trip_count > 0 { '*' } else { ' ' };
                        if day.is_current_month {
                            format!("{:>3}{}", day.day, marker)
                        } else {
                            "    ".to_string()
                        }
                    })
                    .collect();
                println!("{}", row.concat());
            }
        }
        Some("export") => {
            let export = state.export_service.export_trips_csv(&state.trip_store.trips())?;
            info!("Exported {} trips", export.trip_count);
            print!("{}", export.csv_content);
        }
        Some(other) => {
            anyhow::bail!("unknown command '{}'; expected summary, calendar [YYYY-MM] or export", other);
        }
    }

    Ok(())
}

fn parse_month_arg(arg: &str) -> Result<(u32, i32)> {
    let date = NaiveDate::parse_from_str(&format!("{}-01", arg), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("expected YYYY-MM, got '{}'", arg))?;
    Ok((date.month(), date.year()))
}
