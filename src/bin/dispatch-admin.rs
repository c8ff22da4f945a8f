use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Arg, ArgMatches, Command};
use serde::Serialize;

use dispatch_admin::api::Notification;
use dispatch_admin::auth::{AuthOutcome, FileStorage, LoginFlow, SessionStore};
use dispatch_admin::{ClientOptions, DispatchClient, Error, Result};

fn cli() -> Command<'static> {
    let page = || Arg::new("page").long("page").takes_value(true).value_name("N");
    let limit = || Arg::new("limit").long("limit").takes_value(true).value_name("N");
    let phone = || {
        Arg::new("phone")
            .short('p')
            .long("phone")
            .takes_value(true)
            .value_name("NUMBER")
            .help("Admin phone number")
            .required(true)
    };

    Command::new("dispatch-admin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Administer the taxi dispatch backend from a terminal")
        .subcommand_required(true)
        .arg(
            Arg::new("state-dir")
                .long("state-dir")
                .takes_value(true)
                .value_name("DIR")
                .default_value(".dispatch-admin")
                .help("Directory holding the persisted session"),
        )
        .subcommand(Command::new("login").about("Request an OTP").arg(phone()))
        .subcommand(
            Command::new("verify").about("Verify an OTP and sign in").arg(phone()).arg(
                Arg::new("otp")
                    .short('o')
                    .long("otp")
                    .takes_value(true)
                    .value_name("CODE")
                    .required(true),
            ),
        )
        .subcommand(Command::new("logout").about("Forget the persisted session"))
        .subcommand(Command::new("whoami").about("Show the signed-in admin"))
        .subcommand(Command::new("customers").about("List customers").arg(page()).arg(limit()))
        .subcommand(Command::new("drivers").about("List drivers"))
        .subcommand(Command::new("rides").about("List rides").arg(page()).arg(limit()))
        .subcommand(Command::new("stats").about("Dashboard counters"))
        .subcommand(
            Command::new("notify-all")
                .about("Send a notification to every rider and driver")
                .arg(Arg::new("title").long("title").takes_value(true).required(true))
                .arg(Arg::new("body").long("body").takes_value(true).required(true)),
        )
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn number<T>(matches: &ArgMatches, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match matches.value_of(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::invalid_input(format!("--{}: {}", name, e))),
        None => Ok(default),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .value_of(name)
        .ok_or_else(|| Error::invalid_input(format!("--{} is required", name)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let matches = cli().get_matches();
    let state_dir = matches.value_of("state-dir").unwrap_or(".dispatch-admin");

    let options = ClientOptions::from_env()?;
    let store = SessionStore::new(FileStorage::new(state_dir), &options.session_key);
    let client = DispatchClient::with_session_store(options, Arc::new(store));

    match matches.subcommand() {
        Some(("login", m)) => {
            let mut flow = LoginFlow::new(client);
            print(&flow.request_otp(required(m, "phone")?).await)
        }
        Some(("verify", m)) => {
            let mut flow = LoginFlow::with_pending_otp(client, required(m, "phone")?);
            print(&flow.verify_otp(required(m, "otp")?).await)
        }
        Some(("logout", _)) => {
            LoginFlow::new(client).logout();
            print(&AuthOutcome::success("Logged out"))
        }
        Some(("whoami", _)) => print(&client.session().current()),
        Some(("customers", m)) => {
            let page = number(m, "page", 1)?;
            let limit = number(m, "limit", 50)?;
            print(&client.list_customers(page, limit).await)
        }
        Some(("drivers", _)) => print(&client.list_drivers().await),
        Some(("rides", m)) => {
            let page = number(m, "page", 1)?;
            let limit = number(m, "limit", 10)?;
            print(&client.list_rides(page, limit).await)
        }
        Some(("stats", _)) => print(&client.dashboard_stats().await),
        Some(("notify-all", m)) => {
            let notification = Notification::new(required(m, "title")?, required(m, "body")?);
            print(&client.send_notification_to_all(&notification).await?)
        }
        _ => Ok(()),
    }
}
