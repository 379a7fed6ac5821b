//! Raw GET/DELETE command implementations.

use anyhow::{Context, Result, bail};
use clap::Args;
use serde_json::Value;

use crate::cli::GlobalArgs;
use crate::commands::describe_request_error;
use crate::output;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Route relative to the base URL, or an absolute URL
    pub route: String,

    /// Query parameter as key=value (repeatable)
    #[arg(short, long = "query", value_parser = parse_query_pair)]
    pub query: Vec<(String, String)>,
}

impl RequestArgs {
    fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

pub async fn get(global: &GlobalArgs, args: RequestArgs) -> Result<()> {
    let store = global.session_store()?;
    let client = global.client(&store)?;

    let query = args.query_pairs();
    match client.get::<Value>(&args.route, &query).await {
        Ok(body) => print_body(&body),
        Err(e) => bail!(describe_request_error(e)),
    }
}

pub async fn delete(global: &GlobalArgs, args: RequestArgs) -> Result<()> {
    let store = global.session_store()?;
    let client = global.client(&store)?;

    let query = args.query_pairs();
    match client.delete::<Value>(&args.route, &query).await {
        Ok(body) => {
            if body.is_null() {
                output::success("Deleted");
                Ok(())
            } else {
                print_body(&body)
            }
        }
        Err(e) => bail!(describe_request_error(e)),
    }
}

fn print_body(body: &Value) -> Result<()> {
    output::json_pretty(body).context("Failed to print response")
}

fn parse_query_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_split_on_first_equals() {
        assert_eq!(
            parse_query_pair("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_query_pair("page=").unwrap(),
            ("page".to_string(), String::new())
        );
        assert!(parse_query_pair("page").is_err());
        assert!(parse_query_pair("=2").is_err());
    }
}
