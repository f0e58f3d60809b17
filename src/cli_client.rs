//! Simple command line client for the moisture api.
use std::{env, process};

use actix::System;
use awc::Client;
use serde_json::Value;

use moisture::common::{ErrorDetail, RegisterDevice, RegisterReading, SelectReadings};

const DEFAULT_URL: &str = "http://127.0.0.1:5000";
const RESPONSE_LIMIT: usize = 16 * 1024 * 1024;
const USAGE: &str = "usage: client [--url URL] device MAC [NICKNAME] [THRESHOLD]
       client [--url URL] reading MAC VALUE
       client [--url URL] readings MAC";

#[derive(Debug)]
enum Command {
    Device(RegisterDevice),
    Reading(RegisterReading),
    Readings(SelectReadings),
}

impl Command {
    fn path(&self) -> &'static str {
        match self {
            Command::Device(_) => "/register/device",
            Command::Reading(_) => "/register/reading",
            Command::Readings(_) => "/select/readings",
        }
    }
}

fn number(value: &str, what: &str) -> Result<f64, String> {
    value
        .parse()
        .map_err(|_| format!("{} is not a number: {}", what, value))
}

fn parse(args: &[String]) -> Result<(String, Command), String> {
    let mut args: Vec<&str> = args.iter().map(String::as_str).collect();
    let mut url = DEFAULT_URL.to_owned();
    if args.first() == Some(&"--url") {
        url = args.get(1).ok_or("--url needs a value")?.to_string();
        args.drain(..2);
    }

    let command = match args.as_slice() {
        ["device", mac, rest @ ..] if rest.len() <= 2 => Command::Device(RegisterDevice {
            mac: mac.to_string(),
            nickname: rest.get(0).map(|n| n.to_string()),
            danger_threshold: rest.get(1).map(|t| number(t, "threshold")).transpose()?,
        }),
        ["reading", mac, value] => Command::Reading(RegisterReading {
            mac: mac.to_string(),
            reading: number(value, "reading")?,
        }),
        ["readings", mac] => Command::Readings(SelectReadings {
            mac: mac.to_string(),
        }),
        _ => return Err(USAGE.to_owned()),
    };
    Ok((url, command))
}

async fn send(url: String, command: Command) -> Result<Value, String> {
    let client = Client::default();
    let req = client.post(format!("{}{}", url.trim_end_matches('/'), command.path()));
    let mut res = match &command {
        Command::Device(body) => req.send_json(body),
        Command::Reading(body) => req.send_json(body),
        Command::Readings(body) => req.send_json(body),
    }
    .await
    .map_err(|e| format!("{} unreachable: {}", url, e))?;

    let status = res.status();
    let body: Value = res
        .json()
        .limit(RESPONSE_LIMIT)
        .await
        .map_err(|e| e.to_string())?;
    if status.is_success() {
        return Ok(body);
    }
    let detail = serde_json::from_value::<ErrorDetail>(body.clone())
        .map(|e| e.detail)
        .unwrap_or_else(|_| body.to_string());
    Err(format!("{}: {}", status, detail))
}

fn main() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "awc=warn");
    }
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (url, command) = match parse(&args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    };
    log::debug!("{:?} -> {}", command, url);

    let mut sys = System::new("moisture-client");
    match sys.block_on(send(url, command)) {
        Ok(body) => println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        ),
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}
