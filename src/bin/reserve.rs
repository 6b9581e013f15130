//! Stand-in for the booking flow: inserts one reservation from the command
//! line so the daemon has something to remind about.
//!
//! Usage:
//!   reserve <resource> <YYYY-MM-DD> "<H:MM AM - H:MM PM>" <email> <item=qty> [item=qty ...]

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use dotenvy::dotenv;
use log::info;

use courtside::core::Config;
use courtside::scheduler::timeparse;
use courtside::store::{ReservationItem, SqliteStore};

fn parse_item(spec: &str) -> Result<ReservationItem> {
    let (name, qty) = spec
        .split_once('=')
        .with_context(|| format!("item '{spec}' is not in name=qty form"))?;
    let quantity: i64 = qty
        .parse()
        .with_context(|| format!("item '{spec}' has a non-numeric quantity"))?;
    Ok(ReservationItem {
        name: name.to_string(),
        quantity,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 5 {
        bail!(
            "usage: reserve <resource> <YYYY-MM-DD> \"<H:MM AM - H:MM PM>\" <email> <item=qty> [item=qty ...]"
        );
    }

    let resource = &args[0];
    let date = NaiveDate::parse_from_str(&args[1], "%Y-%m-%d")
        .with_context(|| format!("'{}' is not a YYYY-MM-DD date", args[1]))?;
    let time_range = &args[2];
    let recipient = &args[3];

    // Reject a range the daemon would only ever skip.
    if timeparse::parse_time_range(time_range).is_none() {
        bail!("'{time_range}' does not look like \"10:00 AM - 12:00 PM\"");
    }

    let items = args[4..]
        .iter()
        .map(|spec| parse_item(spec))
        .collect::<Result<Vec<_>>>()?;

    // Daemon and reserve tool share DATABASE_PATH; mail settings are not
    // needed here, so skip full config when they are absent.
    let database_path = match Config::from_env() {
        Ok(config) => config.database_path,
        Err(_) => std::env::var("DATABASE_PATH").unwrap_or_else(|_| "reservations.db".to_string()),
    };

    let store = SqliteStore::open(&database_path)?;
    let id = store
        .add_reservation(resource, date, time_range, recipient, &items)
        .await?;

    info!("Created reservation {id}: {resource} on {date}, {time_range} for {recipient}");
    info!("Store now holds {} reservation(s)", store.count().await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        let item = parse_item("Ball Pump=2").unwrap();
        assert_eq!(item.name, "Ball Pump");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_parse_item_rejects_bad_specs() {
        assert!(parse_item("Ball Pump").is_err());
        assert!(parse_item("Ball Pump=two").is_err());
    }
}
