//! Books the first open slots of a parking against a running backend.
//!
//! Reads `PARKLY_API_URL` (and optionally `PARKLY_API_TOKEN`) plus
//! `PARKLY_USER_ID`, `PARKLY_PARKING_ID` and `PARKLY_VEHICLE_ID` from the
//! environment or a `.env` file.

use dotenv::dotenv;
use log::info;
use parkly::prelude::*;
use std::env;

fn env_id(name: &str) -> Result<i64, Box<dyn std::error::Error>> {
    let raw = env::var(name).map_err(|_| format!("{} must be set", name))?;
    Ok(raw.parse()?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    pretty_env_logger::init();

    let parkly = Parkly::from_env()?;
    println!("Using parkly backend at {}", parkly.url);

    let user_id = env_id("PARKLY_USER_ID")?;
    let parking_id = env_id("PARKLY_PARKING_ID")?;
    let vehicle_id = env_id("PARKLY_VEHICLE_ID")?;

    let profile = match parkly.profiles().find_by_user_id(user_id).await? {
        Some(profile) => profile,
        None => {
            println!("No profile for user {}", user_id);
            return Ok(());
        }
    };
    println!("Booking as {} (profile {})", profile.full_name(), profile.id);

    let listing = parkly.parkings().get(parking_id).await?;
    let calendar = parkly.schedules().calendar(parking_id).await?;
    let booked = parkly.reservations().list_for_host(listing.profile_id).await?;

    for day in &calendar.days {
        println!(
            "{}: {} open, {} taken",
            day.day, day.available, day.unavailable
        );
    }

    let selected: Vec<Schedule> = calendar
        .bookable(&booked)
        .into_iter()
        .take(2)
        .cloned()
        .collect();
    if selected.is_empty() {
        println!("Nothing left to book on parking {}", parking_id);
        return Ok(());
    }

    let outcome = parkly
        .reservations()
        .reserve_slots(GuestContext::from(&profile), &listing, vehicle_id, &selected)
        .await?;

    for reservation in &outcome.succeeded {
        println!(
            "Reserved {} {}-{}: {}h for {:.2}",
            reservation.reservation_date,
            reservation.start_time,
            reservation.end_time,
            reservation.hours_registered,
            reservation.total_fare
        );
    }
    for failure in &outcome.failed {
        println!("Slot #{} was not reserved: {}", failure.index, failure.reason);
    }
    info!(
        "{} of {} reservations created",
        outcome.succeeded_count(),
        outcome.attempted()
    );

    Ok(())
}
