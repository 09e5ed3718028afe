/// submit debt - build a draft, preview its plan and show the body sent to the service
use debt_tracker_rs::{
    DebtDraft, DebtRecord, Money, PlanMethod, SafeTimeProvider, TimeSource,
};
use debt_tracker_rs::chrono::{TimeZone, Utc};
use debt_tracker_rs::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== debt submission ===\n");

    // pin "today" so the output is reproducible
    let today = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).single().ok_or("bad timestamp")?;
    let time = SafeTimeProvider::new(TimeSource::Test(today));

    let draft = DebtDraft::builder()
        .name("Used car")
        .lender_name("Credit union")
        .principal_amount(Money::from_major(8_000))
        .annual_interest_rate_percent(Decimal::new(95, 1))
        .installment_count(6)
        .description("starts on the 31st, so short months clamp")
        .build_with_time(&time)?;

    // stage 1: the stored rule next to a standard annuity
    let flat = draft.compute_plan_with(PlanMethod::CompoundedFlat)?;
    let annuity = draft.compute_plan_with(PlanMethod::EqualInstallments)?;
    println!("stage 1: plan comparison");
    println!("------------------------");
    println!("compounded flat:    {} / month, {} interest",
        flat.monthly_payment().unwrap_or_default().round_dp(2),
        flat.total_interest().round_dp(2));
    println!("equal installments: {} / month, {} interest\n",
        annuity.monthly_payment().unwrap_or_default().round_dp(2),
        annuity.total_interest().round_dp(2));

    // stage 2: the request body, exactly as the gateway would post it
    let record = DebtRecord::from_draft(draft, flat.into_items());
    println!("stage 2: POST /finance/debt body");
    println!("--------------------------------");
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
