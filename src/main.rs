use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use debt_tracker_rs::{
    AuthGateway, ClientConfig, DebtBook, DebtDraft, DebtGateway, DebtRecord, DraftField,
    FileTokenStore, HttpTransport, PaymentPlan, PlanMethod, ReqwestTransport, Result,
    SafeTimeProvider, TimeSource, TokenStore,
};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MethodArg {
    /// compound over the whole term, split evenly (the rule debts are stored with)
    CompoundedFlat,
    /// standard annuity against a declining balance
    EqualInstallments,
}

impl From<MethodArg> for PlanMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::CompoundedFlat => PlanMethod::CompoundedFlat,
            MethodArg::EqualInstallments => PlanMethod::EqualInstallments,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "debt-tracker", version, about = "Track personal debts and their monthly payment plans")]
struct Cli {
    /// json config file (defaults and DEBT_TRACKER_* variables otherwise)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "DEBT_TRACKER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DEBT_TRACKER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// forget the stored session
    Logout,
    /// list your debts
    List,
    /// create a debt and submit its payment plan
    Create {
        #[command(flatten)]
        debt: DebtArgs,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        lender: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// preview a payment plan without contacting the service
    Plan {
        #[command(flatten)]
        debt: DebtArgs,
        #[arg(long, value_enum, default_value = "compounded-flat")]
        method: MethodArg,
    },
}

#[derive(clap::Args, Debug)]
struct DebtArgs {
    /// principal amount
    #[arg(long)]
    amount: String,
    /// annual interest rate in percent
    #[arg(long, default_value = "0")]
    rate: String,
    /// number of monthly installments
    #[arg(long)]
    installments: String,
    /// YYYY-MM-DD; the first payment falls one month later (default: today)
    #[arg(long)]
    start: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ClientConfig::from_json_file(path)?,
        None => ClientConfig::from_env()?,
    };
    let time = SafeTimeProvider::new(TimeSource::System);

    match cli.command {
        Command::Plan { debt, method } => {
            let draft = draft_from_args(&debt, &time)?;
            let plan = draft.compute_plan_with(method.into())?;
            print_plan(&plan);
        }
        Command::Register { name, email, password } => {
            let (transport, tokens) = connect(&config)?;
            let auth = AuthGateway::new(transport, tokens);
            let session = auth.register(&name, &email, &password).await?;
            if session.token.is_some() {
                println!("registered and logged in as {email}");
            } else {
                println!("registered {email}; run `debt-tracker login` to continue");
            }
        }
        Command::Login { email, password } => {
            let (transport, tokens) = connect(&config)?;
            let auth = AuthGateway::new(transport, tokens);
            auth.login(&email, &password).await?;
            println!("logged in as {email}");
        }
        Command::Logout => {
            let (transport, tokens) = connect(&config)?;
            AuthGateway::new(transport, tokens).logout()?;
            println!("logged out");
        }
        Command::List => {
            let (transport, tokens) = connect(&config)?;
            let mut book = DebtBook::new(DebtGateway::new(transport, tokens));
            let debts = book.refresh().await?;
            if debts.is_empty() {
                println!("no debts found");
            }
            for debt in debts {
                print_debt_line(debt);
            }
        }
        Command::Create { debt, name, lender, description } => {
            let mut draft = draft_from_args(&debt, &time)?;
            draft.apply(DraftField::Name, &name)?;
            draft.apply(DraftField::LenderName, &lender)?;
            draft.apply(DraftField::Description, &description)?;

            let (transport, tokens) = connect(&config)?;
            let mut book = DebtBook::new(DebtGateway::new(transport, tokens));
            let created = book.create(draft).await?;
            print_debt_line(&created);
            for item in &created.payment_plan {
                println!("  {}  {:>14}", item.payment_date, item.payment_amount.round_dp(2).to_string());
            }
        }
    }

    Ok(())
}

fn connect(config: &ClientConfig) -> Result<(Arc<dyn HttpTransport>, Arc<dyn TokenStore>)> {
    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_path()));
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(config)?);
    log::debug!("using {}", config.api_base_url);
    Ok((transport, tokens))
}

/// fill a draft the way the web form does, one raw field at a time
fn draft_from_args(args: &DebtArgs, time: &SafeTimeProvider) -> Result<DebtDraft> {
    let mut draft = DebtDraft::blank(time.now().date_naive());
    draft.apply(DraftField::PrincipalAmount, &args.amount)?;
    draft.apply(DraftField::InterestRate, &args.rate)?;
    draft.apply(DraftField::InstallmentCount, &args.installments)?;
    if let Some(start) = &args.start {
        draft.apply(DraftField::PaymentStart, start)?;
    }
    Ok(draft)
}

fn print_plan(plan: &PaymentPlan) {
    println!("{:<4} {:<12} {:>14}", "#", "date", "amount");
    for (i, item) in plan.items.iter().enumerate() {
        println!("{:<4} {:<12} {:>14}", i + 1, item.payment_date.to_string(), item.payment_amount.round_dp(2).to_string());
    }
    println!();
    println!("total paid:     {}", plan.total_payment().round_dp(2));
    println!("total interest: {}", plan.total_interest().round_dp(2));
}

fn print_debt_line(debt: &DebtRecord) {
    println!(
        "{}  {} - {}  {} at {}% over {} months from {}",
        debt.id.as_deref().unwrap_or("-"),
        debt.name,
        debt.lender_name,
        debt.principal_amount.round_dp(2),
        debt.annual_interest_rate_percent.normalize(),
        debt.installment_count,
        debt.payment_start_date,
    );
}
