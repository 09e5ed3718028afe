/// quick start - compute a payment plan for a debt
use debt_tracker_rs::{compute_payment_plan, Money};
use debt_tracker_rs::chrono::NaiveDate;
use debt_tracker_rs::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1,200 borrowed at 12% a year, paid back over 12 months
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let plan = compute_payment_plan(Money::from_major(1_200), Decimal::from(12), 12, start)?;

    for item in &plan {
        println!("{}  {}", item.payment_date, item.payment_amount.round_dp(2));
    }

    Ok(())
}
