// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Zuzia CLI
//!
//! Small front end over the library for poking at JSON APIs.

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use zuzia::{Client, RequestLogger, Response, ResponseData};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("zuzia=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let outcome = match args[1].as_str() {
        "get" => {
            if args.len() < 3 {
                eprintln!("Usage: zuzia get <url>");
                return ExitCode::from(1);
            }
            get(&args[2]).await
        }
        "post" => {
            if args.len() < 4 {
                eprintln!("Usage: zuzia post <url> <json>");
                return ExitCode::from(1);
            }
            post(&args[2], &args[3]).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("zuzia {}", zuzia::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Zuzia - HTTP client with plugins and interceptors

USAGE:
    zuzia <COMMAND> [ARGS]

COMMANDS:
    get <url>           Send a GET request and print the response
    post <url> <json>   Send a JSON body with POST and print the response
    help                Show this help message
    version             Show version information

EXAMPLES:
    zuzia get https://httpbin.org/get
    zuzia post https://httpbin.org/post '{{"name": "zuzia"}}'

Set RUST_LOG=zuzia=debug to trace every pipeline stage.
"#
    );
}

fn client() -> Client {
    let client = Client::default();
    let logger = RequestLogger::default();
    client.use_request_interceptor(logger.clone());
    client.use_response_interceptor(logger.clone());
    client.use_error_interceptor(logger);
    client
}

async fn get(url: &str) -> anyhow::Result<()> {
    let response = client()
        .get(url, None)
        .await
        .with_context(|| format!("GET {} failed", url))?;
    print_response(&response)
}

async fn post(url: &str, body: &str) -> anyhow::Result<()> {
    let body: serde_json::Value =
        serde_json::from_str(body).context("Request body is not valid JSON")?;
    let response = client()
        .post(url, body, None)
        .await
        .with_context(|| format!("POST {} failed", url))?;
    print_response(&response)
}

fn print_response(response: &Response) -> anyhow::Result<()> {
    println!("=== Response ===");
    println!("Status: {} {}", response.status, response.status_text);
    if let Some(content_type) = response.content_type() {
        println!("Content-Type: {}", content_type);
    }

    println!();
    match &response.data {
        ResponseData::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        ResponseData::Text(text) => println!("{}", text),
        ResponseData::Binary(bytes) => println!("<{} bytes>", bytes.len()),
    }

    Ok(())
}
