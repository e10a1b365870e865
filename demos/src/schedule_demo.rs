//! Previews how an availability window is cut into hourly slots and what
//! each slot would cost. Runs offline.
//!
//! Usage: schedule_demo [YYYY-MM-DD] [HH:MM] [HH:MM] [price]

use chrono::{Local, NaiveDate, NaiveTime};
use parkly_domain::prelude::*;
use parkly_domain::total_fare;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let day = match args.first() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
        None => Local::now().date_naive(),
    };
    let start = NaiveTime::parse_from_str(args.get(1).map_or("08:00", String::as_str), "%H:%M")?;
    let end = NaiveTime::parse_from_str(args.get(2).map_or("11:30", String::as_str), "%H:%M")?;
    let price: f64 = args.get(3).map_or("15", String::as_str).parse()?;

    let form = ScheduleForm::new(day, start, end);
    let problems = form.messages_now();
    if !problems.is_empty() {
        for problem in &problems {
            println!("invalid window: {}", problem);
        }
        return Ok(());
    }

    let window = SlotWindow::try_new(day, start, end)?;
    println!("Window {} {}-{} yields {} slots at {:.2}/h", day, start, end, window.len(), price);

    let mut fares = Vec::new();
    for slot in &window {
        let fare = Fare::for_slot(&slot, price)?;
        println!(
            "  {}-{}  {:>3} min  billed {}h  {:>8.2}",
            slot.start,
            slot.end,
            slot.duration().num_minutes(),
            fare.hours_registered,
            fare.total_fare
        );
        fares.push(fare);
    }

    let total = total_fare(&fares);
    println!(
        "Booking every slot: {}h, {:.2}",
        total.hours_registered, total.total_fare
    );

    Ok(())
}
