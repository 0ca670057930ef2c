/// running interest on an account with a deposit and a rate change
use monetary_rs::chrono::NaiveDate;
use monetary_rs::{
    Amount, BalanceChange, Compounding, DayCountConvention, InterestConfig, LeadingDays, Rate,
    RoundingPolicy, RunningInterestScheduler,
};

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, &'static str> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or("invalid date")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = RunningInterestScheduler::new(InterestConfig::new(
        DayCountConvention::ActualPeriods,
        Compounding::Monthly,
        LeadingDays::Off,
        RoundingPolicy::HalfEven,
    ));

    let ledger = scheduler.run_with_changes(
        date(2022, 12, 8)?,
        Amount::from_minor(130_000),
        Rate::from_percentage(5),
        &[
            BalanceChange::deposit(date(2023, 1, 12)?, Amount::from_minor(5_000)),
            BalanceChange::withdrawal(date(2023, 4, 3)?, Amount::from_minor(20_000)),
        ],
        date(2023, 6, 8)?,
    )?;

    for entry in ledger.entries() {
        println!(
            "{} .. {}  {:?}  {:>6}  {:>8}",
            entry.period.start(),
            entry.period.end(),
            entry.kind,
            entry.interest,
            entry.balance_after
        );
    }
    println!("total interest: {}", ledger.total_interest());
    println!("final balance:  {}", ledger.final_balance());

    Ok(())
}
