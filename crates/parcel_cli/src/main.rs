//! Demo driver for the parcel tracker.
//!
//! # Responsibility
//! - Run the register / update / list / delete flow against a database file.
//! - Keep output line-oriented for quick local checks.
//!
//! Usage: `parcel_cli [DB_PATH]`. Logging is enabled when `PARCEL_LOG_DIR`
//! names an absolute directory; `PARCEL_LOG_LEVEL` overrides the level.

use log::error;
use parcel_core::db::open_db;
use parcel_core::{
    core_version, default_log_level, init_logging, ClientId, Parcel, ParcelService,
    ParcelStatus, ServiceError, SqliteParcelStore,
};
use std::error::Error;
use std::process::ExitCode;

const DEFAULT_DB_PATH: &str = "tracker.db";
const DEMO_CLIENT: ClientId = 1;
const DEMO_ADDRESS: &str = "Psd, Moscow, Sinichkina str, 2, 34";
const DEMO_NEW_ADDRESS: &str = "Saratov, Veselaya str, 8, 12";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("PARCEL_LOG_DIR") {
        let level =
            std::env::var("PARCEL_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    match run(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &str) -> Result<(), Box<dyn Error>> {
    println!("parcel_core version={}", core_version());

    let conn = open_db(db_path)?;
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn)?);

    let parcel = service.register(DEMO_CLIENT, DEMO_ADDRESS)?;
    println!("registered {}", describe(&parcel));

    service.change_address(parcel.number, DEMO_NEW_ADDRESS)?;
    println!("parcel {} address -> {}", parcel.number, DEMO_NEW_ADDRESS);

    if let Some(status) = service.next_status(parcel.number)? {
        println!("parcel {} status -> {}", parcel.number, status);
    }

    print_client_parcels(&service, DEMO_CLIENT)?;

    match service.delete(parcel.number) {
        Ok(()) => println!("parcel {} deleted", parcel.number),
        Err(ServiceError::StatusLocked { number, status }) => {
            println!("parcel {number} kept: status is {status}")
        }
        Err(err) => return Err(err.into()),
    }

    let second = service.register(DEMO_CLIENT, DEMO_ADDRESS)?;
    println!("registered {}", describe(&second));
    service.delete(second.number)?;
    println!("parcel {} deleted", second.number);

    print_client_parcels(&service, DEMO_CLIENT)?;
    Ok(())
}

fn print_client_parcels(
    service: &ParcelService<SqliteParcelStore<'_>>,
    client: ClientId,
) -> Result<(), ServiceError> {
    let parcels = service.client_parcels(client)?;
    println!("client {client} parcels: {}", parcels.len());
    for parcel in &parcels {
        println!("  {}", describe(parcel));
    }
    Ok(())
}

fn describe(parcel: &Parcel) -> String {
    let note = if parcel.status == ParcelStatus::Registered {
        " (editable)"
    } else {
        ""
    };
    format!(
        "#{} client={} status={} address=\"{}\" created_at={}{}",
        parcel.number, parcel.client, parcel.status, parcel.address, parcel.created_at, note
    )
}
