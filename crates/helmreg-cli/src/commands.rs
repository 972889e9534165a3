//! CLI subcommands implementing the presentation-facing contract.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not
//! debug output). Email validation happens here, before calls reach the
//! store; so does the authority role check for `find` and `verify`.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Subcommand, ValueEnum};

use helmreg_core::Config;
use helmreg_store::{
    DocumentKind, Registration, RegistrationUpdate, Role, Store, User, VerificationStatus,
};

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and its empty registration, then log in
    Register {
        /// Email address for the new account
        email: String,
    },
    /// Log in with a registered email
    Login {
        /// Email address of an existing account
        email: String,
    },
    /// Log out and clear the persisted session
    Logout,
    /// Show who is logged in and their role
    Whoami,
    /// Show the active user's registration
    Show,
    /// Update registration details
    Update(UpdateArgs),
    /// Attach a document image to the active registration
    Attach {
        /// Which of the five document slots to fill
        #[arg(value_enum)]
        kind: DocKindArg,
        /// Image file to store inline
        file: PathBuf,
    },
    /// Look up a registration by helmet id (authority only)
    Find {
        /// Helmet id to search for (case-insensitive)
        helmet_id: String,
    },
    /// Approve or reject a registration by helmet id (authority only)
    Verify {
        /// Helmet id of the registration to verify
        helmet_id: String,
        #[arg(value_enum)]
        status: StatusArg,
    },
    /// Insert the demo authority account and sample record
    Seed,
}

/// Flags for the owner-mutable registration fields. Omitted flags leave
/// their fields untouched.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    helmet_id: Option<String>,
    #[arg(long)]
    owner_name: Option<String>,
    #[arg(long)]
    phone_number: Option<String>,
    #[arg(long)]
    bike_registration: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DocKindArg {
    Aadhar,
    License,
    VehicleReg,
    Rc,
    Insurance,
}

impl From<DocKindArg> for DocumentKind {
    fn from(arg: DocKindArg) -> Self {
        match arg {
            DocKindArg::Aadhar => Self::AadharCard,
            DocKindArg::License => Self::DriversLicense,
            DocKindArg::VehicleReg => Self::VehicleRegistration,
            DocKindArg::Rc => Self::Rc,
            DocKindArg::Insurance => Self::Insurance,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StatusArg {
    Approved,
    Rejected,
}

impl From<StatusArg> for VerificationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Approved => Self::Approved,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

/// Execute a subcommand against the open store.
pub async fn run(store: &mut Store, config: &Config, command: Command) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match command {
        Command::Register { email } => {
            validate_email(&email)?;
            let user = store.session.register(&mut store.registry, &email).await?;
            writeln!(out, "Registered {} as {}.", user.email, user.id)?;
        }
        Command::Login { email } => {
            validate_email(&email)?;
            let user = store.session.login(&store.registry, &email).await?;
            let role = Role::for_email(&user.email, &config.auth.authority_domain);
            writeln!(out, "Logged in as {} ({}).", user.email, role_name(role))?;
        }
        Command::Logout => {
            store.session.logout().await?;
            writeln!(out, "Logged out.")?;
        }
        Command::Whoami => match store.session.current_user() {
            Some(user) => {
                let role = Role::for_email(&user.email, &config.auth.authority_domain);
                writeln!(out, "{} ({})", user.email, role_name(role))?;
            }
            None => writeln!(out, "Not logged in.")?,
        },
        Command::Show => {
            let user_id = require_login(store)?.id.clone();
            match store.registry.get_by_user_id(&user_id) {
                Some(record) => print_registration(&mut out, record)?,
                None => writeln!(out, "No registration on file.")?,
            }
        }
        Command::Update(args) => {
            let user_id = require_login(store)?.id.clone();
            let update = RegistrationUpdate {
                helmet_id: args.helmet_id,
                owner_name: args.owner_name,
                phone_number: args.phone_number,
                bike_registration: args.bike_registration,
                email: args.email,
            };
            if update.helmet_id.is_none()
                && update.owner_name.is_none()
                && update.phone_number.is_none()
                && update.bike_registration.is_none()
                && update.email.is_none()
            {
                anyhow::bail!("nothing to update; pass at least one field flag");
            }
            store.registry.update_details(&user_id, update).await?;
            writeln!(out, "Registration updated.")?;
        }
        Command::Attach { kind, file } => {
            let user_id = require_login(store)?.id.clone();
            let image = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let kind = DocumentKind::from(kind);
            store.registry.attach_document(&user_id, kind, &image).await?;
            writeln!(out, "{kind} attached ({} bytes).", image.len())?;
        }
        Command::Find { helmet_id } => {
            require_authority(store, config)?;
            match store.registry.get_by_helmet_id(&helmet_id) {
                Some(record) => print_registration(&mut out, record)?,
                None => writeln!(out, "No registration matches helmet id \"{helmet_id}\".")?,
            }
        }
        Command::Verify { helmet_id, status } => {
            require_authority(store, config)?;
            let status = VerificationStatus::from(status);
            store
                .registry
                .set_verification_status(&helmet_id, status)
                .await?;
            writeln!(out, "Helmet {helmet_id} marked {status}.")?;
        }
        Command::Seed => {
            store.registry.seed_demo().await?;
            writeln!(out, "Demo records seeded.")?;
        }
    }
    Ok(())
}

fn require_login(store: &Store) -> anyhow::Result<&User> {
    store
        .session
        .current_user()
        .ok_or_else(|| anyhow::anyhow!("not logged in; run `helmreg login` first"))
}

fn require_authority(store: &Store, config: &Config) -> anyhow::Result<()> {
    let user = require_login(store)?;
    if Role::for_email(&user.email, &config.auth.authority_domain) == Role::Authority {
        Ok(())
    } else {
        anyhow::bail!("{} is not an authority account", user.email)
    }
}

fn validate_email(email: &str) -> anyhow::Result<()> {
    let valid = matches!(
        email.split_once('@'),
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.starts_with('.')
    );
    if !valid {
        anyhow::bail!("\"{email}\" is not a valid email address");
    }
    Ok(())
}

const fn role_name(role: Role) -> &'static str {
    match role {
        Role::Authority => "authority",
        Role::Owner => "owner",
    }
}

fn print_registration(out: &mut impl Write, record: &Registration) -> io::Result<()> {
    writeln!(out, "{:<12}{}", "User ID:", record.id)?;
    writeln!(out, "{:<12}{}", "Helmet ID:", or_dash(&record.helmet_id))?;
    writeln!(out, "{:<12}{}", "Owner:", or_dash(&record.owner_name))?;
    writeln!(out, "{:<12}{}", "Phone:", or_dash(&record.phone_number))?;
    writeln!(out, "{:<12}{}", "Email:", record.email)?;
    writeln!(out, "{:<12}{}", "Bike reg:", or_dash(&record.bike_registration))?;
    writeln!(out, "{:<12}{}", "Status:", record.verification_status)?;
    writeln!(out, "Documents:")?;
    for doc in &record.documents {
        writeln!(out, "  [{}] {}", if doc.uploaded { 'x' } else { ' ' }, doc.kind)?;
    }
    Ok(())
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_plain_addresses() {
        assert!(validate_email("rider@example.com").is_ok());
        assert!(validate_email("officer@police.gov").is_ok());
    }

    #[test]
    fn email_validation_rejects_malformed_input() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("rider@").is_err());
    }

    #[test]
    fn doc_kind_args_cover_all_five_slots() {
        let mapped = [
            DocumentKind::from(DocKindArg::Aadhar),
            DocumentKind::from(DocKindArg::License),
            DocumentKind::from(DocKindArg::VehicleReg),
            DocumentKind::from(DocKindArg::Rc),
            DocumentKind::from(DocKindArg::Insurance),
        ];
        assert_eq!(mapped, DocumentKind::ALL);
    }
}
