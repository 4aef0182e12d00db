use crate::infra::{demo_catalog, demo_repositories, parse_date, read_json, DEMO_ACCOUNT};
use chrono::{Duration, NaiveDate};
use clap::Args;
use ftpr_intake::config::AppConfig;
use ftpr_intake::error::AppError;
use ftpr_intake::workflows::ftpr::{
    Account, AccountId, CatalogImporter, ExistingCase, FixedClock, FtprIntakeService,
    IntakeClock, IntakeEngine, IntakePolicy, IntakeRequest, IntakeServiceError, SubmissionForm,
    SubsidyType, SystemClock,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Submission form as JSON
    #[arg(long)]
    pub(crate) submission: PathBuf,
    /// Filing account (price table and referral code) as JSON
    #[arg(long)]
    pub(crate) account: PathBuf,
    /// Tenant roster CSV export
    #[arg(long)]
    pub(crate) catalog: PathBuf,
    /// Cases already on record for the account, as a JSON array
    #[arg(long)]
    pub(crate) ledger: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today in the configured intake zone.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today in the configured intake zone.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        submission,
        account,
        catalog,
        ledger,
        today,
    } = args;

    let policy = AppConfig::load()?.intake;
    let submission: SubmissionForm = read_json(&submission)?;
    let account: Account = read_json(&account)?;
    let catalog = CatalogImporter::from_path(&catalog, SubsidyType::standard_catalog())?;
    let ledger: Vec<ExistingCase> = match ledger {
        Some(path) => read_json(&path)?,
        None => Vec::new(),
    };
    let today = today.unwrap_or_else(|| SystemClock::from_policy(&policy).today());

    let decision = IntakeEngine::new(&policy).decide(IntakeRequest {
        submission: &submission,
        account: Some(&account),
        catalog: &catalog,
        ledger: &ledger,
        today,
    });

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

struct Scenario {
    label: &'static str,
    form: SubmissionForm,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policy = AppConfig::load()?.intake;
    let today = args
        .today
        .unwrap_or_else(|| SystemClock::from_policy(&policy).today());

    let (accounts, cases) = demo_repositories();
    let service = FtprIntakeService::with_clock(
        Arc::new(accounts),
        Arc::new(cases),
        Arc::new(demo_catalog()),
        Arc::new(FixedClock(today)),
        policy.clone(),
    );
    let account_id = AccountId(DEMO_ACCOUNT.to_string());

    println!("FTPR intake demo (today {today}, account {account_id})");
    for scenario in scenarios(today, &policy) {
        println!("\n{}", scenario.label);
        match service.submit(Some(&account_id), scenario.form) {
            Ok(record) => {
                let view = record.status_view();
                println!(
                    "- Admitted as {} ({}), amount owed {}, price {}",
                    view.case_id, view.status, view.amount_owed, view.price
                );
                println!(
                    "  Supporting document required: {}",
                    if view.document_required { "yes" } else { "no" }
                );
            }
            Err(IntakeServiceError::Rejected(violations)) => {
                println!("- Rejected with {} violation(s)", violations.len());
                for violation in &violations {
                    println!("  - {violation}");
                }
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn scenarios(today: NaiveDate, policy: &IntakePolicy) -> Vec<Scenario> {
    let eviction = policy.earliest_eviction_date(today);
    let base = |tenant: &str, amount: &str| SubmissionForm {
        tenant_id: Some(tenant.to_string()),
        no_right_of_redemption: false,
        amount_owed: Some(amount.to_string()),
        court_case_number: Some("CV-2026-0412".to_string()),
        warrant_order_date: Some((today - Duration::days(10)).format("%Y-%m-%d").to_string()),
        scheduled_eviction_date: Some(eviction.format("%Y-%m-%d").to_string()),
        signer_name: Some("Dana Whitfield".to_string()),
        supporting_document: None,
    };

    vec![
        Scenario {
            label: "A. Non-subsidized tenant with referral discount",
            form: base("t-alvarez", "500"),
        },
        Scenario {
            label: "B. Subsidized tenant on the default subsidy type",
            form: base("t-brooks", "950"),
        },
        Scenario {
            label: "C. Section 8 tenant without a supporting document",
            form: base("t-chen", "1000"),
        },
        Scenario {
            label: "D. Tenant with an unpaid case already in review",
            form: base("t-dubois", "1300"),
        },
        Scenario {
            label: "E. Subsidized tenant owing thirteen months of rent",
            form: SubmissionForm {
                supporting_document: Some("hap-contract.pdf".to_string()),
                ..base("t-evans", "13000")
            },
        },
    ]
}
