/// quick start - interest on a balance for a range of dates
use monetary_rs::chrono::NaiveDate;
use monetary_rs::{
    Amount, Compounding, DateRange, DayCountConvention, LeadingDays, Rate, RoundingPolicy,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 15).ok_or("invalid date")?;
    let end = NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("invalid date")?;
    let range = DateRange::new(start, end)?;

    // 10,000.00 at 5%, split into whole years, months and days
    for convention in [
        DayCountConvention::ActualDays,
        DayCountConvention::ActualPeriods,
        DayCountConvention::EqualMonths,
    ] {
        let interest = convention.interest(
            range,
            Amount::from_minor(1_000_000),
            Rate::from_percentage(5),
            Compounding::None,
            LeadingDays::ToMonthStart,
            RoundingPolicy::HalfEven,
        )?;
        println!("{:?}: {}", convention, interest);
    }

    Ok(())
}
