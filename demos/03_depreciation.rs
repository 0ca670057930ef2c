/// depreciation of an asset whose replacement cost is revised twice
use monetary_rs::chrono::NaiveDate;
use monetary_rs::{
    Amount, DepreciationTerms, LinearDepreciation, ReplacementCostDepreciation, Revaluation,
    RoundingPolicy,
};

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate, &'static str> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or("invalid date")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let terms = DepreciationTerms::new(
        Amount::from_minor(120_000),
        date(2023, 1, 1)?,
        date(2023, 1, 1)?,
        6,
        Amount::ZERO,
    )?;

    let linear = LinearDepreciation::new(RoundingPolicy::HalfEven).schedule(terms)?;
    println!("linear:");
    for entry in linear.entries() {
        println!("  {}  {:>7}  {:>7}", entry.date, entry.depreciation, entry.book_value);
    }

    let replacement = ReplacementCostDepreciation::new(RoundingPolicy::HalfEven).schedule(
        terms,
        &[
            Revaluation {
                date: date(2024, 1, 1)?,
                replacement_cost: Amount::from_minor(140_000),
            },
            Revaluation {
                date: date(2025, 1, 1)?,
                replacement_cost: Amount::from_minor(132_000),
            },
        ],
    )?;
    println!("replacement cost:");
    for entry in replacement.entries() {
        println!(
            "  {}  {:>7}  {:>7}  {:>7}",
            entry.date, entry.gross_value, entry.depreciation, entry.book_value
        );
    }
    for correction in replacement.corrections() {
        println!(
            "  correction {}  {:>6}  yearly {} -> {}",
            correction.date, correction.amount, correction.previous_yearly, correction.new_yearly
        );
    }

    Ok(())
}
