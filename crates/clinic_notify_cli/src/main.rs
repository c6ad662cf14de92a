//! Operator tooling for the clinic notification store.
//!
//! # Responsibility
//! - `check`: print one client with its appointments and notifications.
//! - `seed`: load the sample appointment set for a client.
//!
//! Both commands go through the public `DataStore` contract only.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use clinic_notify_core::config::DB_PATH_ENV;
use clinic_notify_core::model::templates::encode_templates;
use clinic_notify_core::{
    default_log_level, init_logging, ClientId, DataStore, NewAppointment, StoreConfig,
};
use log::info;
use std::io::Write;
use std::path::PathBuf;

/// (patient, phone, document, date, time, consultation type)
const SAMPLE_APPOINTMENTS: [(&str, &str, &str, &str, &str, &str); 5] = [
    ("João Silva", "(11) 99999-9999", "11122233344", "2025-05-20", "14:30", "Consulta"),
    ("Maria Santos", "(11) 88888-8888", "55566677788", "2025-05-21", "10:00", "Consulta"),
    ("Pedro Oliveira", "(11) 77777-7777", "99900011122", "2025-05-22", "15:45", "Exame"),
    ("Ana Costa", "(11) 66666-6666", "33344455566", "2025-05-23", "09:15", "Procedimento"),
    ("Carlos Souza", "(11) 55555-5555", "77788899900", "2025-05-24", "11:30", "Consulta"),
];

#[derive(Debug, Parser)]
#[command(name = "clinic-notify", version, about = "Inspect and seed the clinic notification store")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = DB_PATH_ENV, default_value = "database.sqlite")]
    db: PathBuf,

    /// Enforce declared foreign keys on every connection.
    #[arg(long, global = true)]
    foreign_keys: bool,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a client with its appointments and their notifications.
    Check {
        #[arg(long, default_value_t = 1)]
        client_id: ClientId,
    },
    /// Insert the sample appointment set for a client.
    Seed {
        #[arg(long)]
        client_id: ClientId,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let config = StoreConfig::new(&cli.db).with_foreign_keys(cli.foreign_keys);
    let store = DataStore::open(config)
        .with_context(|| format!("failed to open store at `{}`", cli.db.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Check { client_id } => check(&store, client_id, &mut out),
        Command::Seed { client_id } => seed(&store, client_id, &mut out),
    }
}

fn check(store: &DataStore, client_id: ClientId, out: &mut impl Write) -> Result<()> {
    let Some(client) = store.get_client_by_id(client_id)? else {
        bail!("client {client_id} not found");
    };

    writeln!(out, "\n=== Clients ===")?;
    writeln!(out, "Client Name: {}", client.name)?;
    writeln!(out, "CNPJ: {}", client.business_id)?;
    let templates = encode_templates(&client.templates)
        .with_context(|| format!("failed to encode templates of client {client_id}"))?;
    writeln!(out, "WhatsApp Templates: {templates}")?;

    writeln!(out, "\n=== Appointments ===")?;
    for appointment in store.get_appointments_by_client(client_id)? {
        writeln!(out, "\nPatient: {}", appointment.name)?;
        writeln!(out, "Date: {} at {}", appointment.date, appointment.time)?;
        writeln!(out, "Type: {}", appointment.consultation_type)?;
        writeln!(out, "Phone: {}", appointment.phone)?;
        writeln!(out, "Document ID: {}", appointment.document_id)?;

        for notification in store.get_notifications_by_appointment(appointment.id)? {
            writeln!(out, "Notification Status: {}", notification.status)?;
            writeln!(
                out,
                "Template Used: {}",
                notification.template_used.as_deref().unwrap_or("-")
            )?;
            writeln!(out, "Message Type: {}", notification.message_type)?;
            if notification.is_responded() {
                writeln!(
                    out,
                    "Response: {}",
                    notification.response.as_deref().unwrap_or("-")
                )?;
                writeln!(
                    out,
                    "Response Time: {}",
                    notification.response_at.as_deref().unwrap_or("-")
                )?;
            }
        }
    }
    Ok(())
}

fn seed(store: &DataStore, client_id: ClientId, out: &mut impl Write) -> Result<()> {
    for (name, phone, document_id, date, time, consultation_type) in SAMPLE_APPOINTMENTS {
        store.add_appointment(&NewAppointment {
            client_id,
            name: name.to_string(),
            phone: phone.to_string(),
            document_id: document_id.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            consultation_type: consultation_type.to_string(),
        })?;
    }
    info!(
        "event=seed module=cli status=ok client_id={} count={}",
        client_id,
        SAMPLE_APPOINTMENTS.len()
    );
    writeln!(
        out,
        "seeded {} appointments for client {client_id}",
        SAMPLE_APPOINTMENTS.len()
    )?;
    Ok(())
}
