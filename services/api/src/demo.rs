use crate::infra::{
    InMemoryApplicationRepository, InMemoryJobRepository, InMemoryPrincipalRepository,
};
use chrono::{Duration, Local};
use clap::Args;
use joblane::config::AuthConfig;
use joblane::error::AppError;
use joblane::marketplace::catalog::JobDraft;
use joblane::marketplace::identity::{Registration, Role};
use joblane::marketplace::ledger::Decision;
use joblane::marketplace::{ApplicationViewScope, Marketplace};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Days until the demo posting's deadline (negative to demo an expired posting)
    #[arg(long, default_value_t = 14)]
    pub(crate) deadline_days: i64,
    /// Optional substring filter applied when listing the demo catalog
    #[arg(long)]
    pub(crate) filter: Option<String>,
}

type DemoMarketplace = Marketplace<
    InMemoryPrincipalRepository,
    InMemoryJobRepository,
    InMemoryApplicationRepository,
>;

fn demo_marketplace() -> DemoMarketplace {
    let auth = AuthConfig {
        token_secret: "joblane-demo-secret".to_string(),
        access_ttl_minutes: 30,
        refresh_ttl_minutes: 24 * 60,
    };
    Marketplace::new(
        Arc::new(InMemoryPrincipalRepository::default()),
        Arc::new(InMemoryJobRepository::default()),
        Arc::new(InMemoryApplicationRepository::default()),
        &auth,
    )
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let marketplace = demo_marketplace();
    let today = Local::now().date_naive();

    println!("Job marketplace demo");

    let employer = marketplace
        .identity
        .register(Registration {
            email: "hiring@acme.example".to_string(),
            password: "demo-password".to_string(),
            roles: vec![Role::Employer],
            company_name: Some("Acme Robotics".to_string()),
        })?;
    let candidate = marketplace
        .identity
        .register(Registration {
            email: "dev@candidate.example".to_string(),
            password: "demo-password".to_string(),
            roles: vec![Role::Candidate],
            company_name: None,
        })?;
    println!("  registered employer {} and candidate {}", employer.id.0, candidate.id.0);

    let job = marketplace
        .catalog
        .create_job(
            &employer,
            JobDraft {
                title: "Backend Engineer".to_string(),
                description: "Own the marketplace ledger services.".to_string(),
                location: "Remote".to_string(),
                salary_range: "90000-120000 USD".to_string(),
                deadline: Some(today + Duration::days(args.deadline_days)),
                category: Some("Engineering".to_string()),
            },
        )?;
    println!("  posted {} '{}' (deadline {})", job.id.0, job.title, job.deadline);

    let listed = marketplace
        .catalog
        .list_views(args.filter.as_deref(), today)?;
    println!("  catalog lists {} posting(s) for the given filter", listed.len());

    match marketplace.ledger.apply(&candidate, &job.id) {
        Ok(application) => {
            println!("  candidate applied: {} ({})", application.id.0, application.status.label());

            if let Err(duplicate) = marketplace.ledger.apply(&candidate, &job.id) {
                println!("  second apply rejected: {duplicate}");
            }

            let settled = marketplace
                .ledger
                .decide(&employer, &application.id, Decision::Accept)?;
            println!("  employer accepted: {} ({})", settled.id.0, settled.status.label());

            if let Err(repeat) = marketplace
                .ledger
                .decide(&employer, &application.id, Decision::Reject)
            {
                println!("  repeat decision rejected: {repeat}");
            }
        }
        Err(expired) => {
            // Reached with a negative --deadline-days.
            println!("  apply rejected: {expired}");
        }
    }

    let candidate_view = marketplace
        .queries
        .applications_for(&candidate, Some(ApplicationViewScope::Candidate))?;
    let employer_view = marketplace
        .queries
        .applications_for(&employer, Some(ApplicationViewScope::Employer))?;
    println!(
        "  scoped views: candidate sees {}, employer sees {}",
        candidate_view.len(),
        employer_view.len()
    );

    Ok(())
}
