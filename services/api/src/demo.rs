use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::infra::{FilesystemPhotoStore, TextReportRenderer};
use officehub::applications::{ApplicationService, StatusOutcome, SubmitOutcome};
use officehub::auth::AdminGate;
use officehub::config::AppConfig;
use officehub::error::AppError;
use officehub::identity::{
    bootstrap_admin, FavoriteAddOutcome, IdentityService, NewUserProfile, RegistrationOutcome,
};
use officehub::offices::OfficeDraft;
use officehub::offices::OfficeService;
use officehub::reporting::ReportService;
use officehub::store::MemoryStore;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the rendered report to this file instead of stdout
    #[arg(long)]
    pub(crate) report_out: Option<PathBuf>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;

    let store = Arc::new(MemoryStore::default());
    let admin = bootstrap_admin(store.as_ref(), &config.admin)?;
    let gate = Arc::new(AdminGate::new(admin.token.clone()));
    let photos = Arc::new(FilesystemPhotoStore::new(
        std::env::temp_dir().join("officehub-demo-photos"),
    ));

    let identity = IdentityService::new(store.clone(), gate.clone());
    let offices = OfficeService::new(store.clone(), photos, gate.clone());
    let applications = ApplicationService::new(store.clone(), gate.clone());
    let report = ReportService::new(store, Arc::new(TextReportRenderer), gate);

    println!("Office rental backend demo");
    println!("Administrator: {} (token {})", admin.email, admin.token.as_str());

    let tenant = match identity.register(profile("jane@example.com", "111-222-3333"))? {
        RegistrationOutcome::Created(view) => view,
        other => {
            println!("  Registration rejected: {other:?}");
            return Ok(());
        }
    };
    println!("\nRegistered tenant {} {}", tenant.first_name, tenant.last_name);

    match identity.register(profile("jane@example.com", "999-000-1111"))? {
        RegistrationOutcome::DuplicateEmail => {
            println!("  Re-registration with the same email correctly rejected")
        }
        other => println!("  Unexpected duplicate outcome: {other:?}"),
    }

    let loft = offices.create(draft("Harbor Loft", 85.0, 2400.0)).map_err(demo_io)?;
    let studio = offices.create(draft("Canal Studio", 32.0, 1150.0)).map_err(demo_io)?;
    println!("\nCreated offices: {} and {}", loft.name, studio.name);

    match identity.add_favorite(&tenant.token, loft.id) {
        Ok(FavoriteAddOutcome::Added) => println!("  {} favorited {}", tenant.first_name, loft.name),
        other => println!("  Unexpected favorite outcome: {other:?}"),
    }
    if let Ok(FavoriteAddOutcome::AlreadyFavorite) = identity.add_favorite(&tenant.token, loft.id) {
        println!("  Second favorite call reports existing membership");
    }

    match applications.submit(&tenant.token, loft.id) {
        SubmitOutcome::Submitted => println!("\nApplication submitted for {}", loft.name),
        other => println!("\nUnexpected submission outcome: {other:?}"),
    }
    if applications.submit(&tenant.token, loft.id) == SubmitOutcome::AlreadySubmitted {
        println!("  Duplicate submission correctly rejected");
    }
    if applications.submit(&admin.token, studio.id) == SubmitOutcome::AdminRefused {
        println!("  Administrator submission correctly refused");
    }

    let pending = applications.list_all();
    if let Some(first) = pending.first() {
        match applications.set_status(first.id, 2) {
            Some(StatusOutcome::Accepted) => println!("  Application {} accepted", first.id.0),
            other => println!("  Unexpected status outcome: {other:?}"),
        }
    }

    let rendered = report
        .export()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    match args.report_out {
        Some(path) => {
            std::fs::write(&path, &rendered.bytes)?;
            println!("\nReport written to {}", path.display());
        }
        None => {
            println!("\n{}", String::from_utf8_lossy(&rendered.bytes));
        }
    }

    Ok(())
}

fn profile(email: &str, tel: &str) -> NewUserProfile {
    NewUserProfile {
        last_name: "Doe".to_string(),
        first_name: "Jane".to_string(),
        tel: tel.to_string(),
        age: 32,
        email: email.to_string(),
        password: "hunter2hunter2".to_string(),
    }
}

fn draft(name: &str, area: f64, price: f64) -> OfficeDraft {
    OfficeDraft {
        name: name.to_string(),
        address: "Pier 4".to_string(),
        options: "open plan".to_string(),
        description: "demo listing".to_string(),
        area,
        price,
        photos: Vec::new(),
    }
}

fn demo_io(err: officehub::offices::OfficeServiceError) -> AppError {
    AppError::Io(std::io::Error::other(err.to_string()))
}
