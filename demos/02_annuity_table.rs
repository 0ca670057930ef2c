/// annuity repayment table for a small loan
use monetary_rs::{Amount, AnnuityGenerator, Decimal, Rate, RoundingPolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let generator = AnnuityGenerator::new(RoundingPolicy::HalfEven);

    // 1,200.00 over 6 months at 1% per month
    let schedule = generator.build_schedule(
        Amount::from_minor(120_000),
        Rate::from_decimal(Decimal::new(1, 2)),
        6,
    )?;

    println!("period  payment  interest  principal  remaining");
    for row in schedule.rows() {
        println!(
            "{:>6}  {:>7}  {:>8}  {:>9}  {:>9}",
            row.period, row.payment, row.interest, row.principal, row.remaining
        );
    }
    println!("total interest: {}", schedule.total_interest());
    println!("total paid:     {}", schedule.total_paid());

    Ok(())
}
