use crate::infra::{InMemoryApplicantRepository, RecordingNotifier};
use admission_portal::admissions::{AdmissionService, ApplicationSubmission, DecisionOutcome};
use admission_portal::error::AppError;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Course name used for the sample applications
    #[arg(long, default_value = "Computer Science")]
    pub(crate) course: String,
    /// Leave the sample applications pending instead of deciding them
    #[arg(long)]
    pub(crate) skip_decisions: bool,
}

/// Walk the full workflow against in-memory infrastructure: register two
/// applicants, review the listing, decide both, and show the notices that
/// would have been emailed.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryApplicantRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = AdmissionService::new(repository, notifier.clone());

    println!("== Admission portal demo ==");

    let samples = [
        ("Ana Silva", "ana@example.edu", "555-0100"),
        ("Ben Okafor", "ben@example.edu", "555-0101"),
    ];
    let mut submitted = Vec::new();
    for (name, email, phone) in samples {
        let record = service
            .submit(ApplicationSubmission {
                name: name.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                course: args.course.clone(),
            })
            .await?;
        println!(
            "registered #{} {} ({}) -> {}",
            record.id.0,
            record.name,
            record.course,
            record.status.label()
        );
        submitted.push(record);
    }

    println!("\n-- Admin review listing (newest first) --");
    for record in service.list().await? {
        println!(
            "#{} {} <{}> {} [{}]",
            record.id.0,
            record.name,
            record.email,
            record.course,
            record.status.label()
        );
    }

    if !args.skip_decisions {
        println!("\n-- Decisions --");
        for (record, outcome) in submitted
            .iter()
            .zip([DecisionOutcome::Approved, DecisionOutcome::Rejected])
        {
            let decided = service.decide(record.id, outcome).await?;
            println!(
                "#{} {} -> {}",
                decided.id.0,
                decided.name,
                decided.status.label()
            );
        }

        println!("\n-- Outbound notifications --");
        for notice in notifier.notices() {
            println!("to: {}", notice.recipient);
            println!("subject: {}", notice.subject);
            println!("body: {}\n", notice.body);
        }
    }

    Ok(())
}
