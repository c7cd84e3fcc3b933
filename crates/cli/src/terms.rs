//! `meddebt terms` and `meddebt check` — built-in term lists.

use clap::Subcommand;
use serde::Serialize;

use meddebt_classify::matcher::term_hits;
use meddebt_classify::terms::{builtin, BUILTIN_NAMES};
use meddebt_classify::{FieldValue, MatchMethod, Matcher, TermSets};

use crate::CliError;

#[derive(Subcommand)]
pub enum TermsCommands {
    /// List built-in term lists with their sizes
    #[command(after_help = "\
Examples:
  meddebt terms list
  meddebt terms list --json")]
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the terms of one built-in list, one per line
    #[command(after_help = "\
Examples:
  meddebt terms show georgetown
  meddebt terms show guelph --json")]
    Show {
        /// Built-in list name
        name: String,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn cmd_terms(cmd: TermsCommands) -> Result<(), CliError> {
    match cmd {
        TermsCommands::List { json } => cmd_terms_list(json),
        TermsCommands::Show { name, json } => cmd_terms_show(&name, json),
    }
}

fn lookup(name: &str) -> Result<TermSets, CliError> {
    builtin(name).ok_or_else(|| {
        CliError::args(format!("unknown built-in term list: {name}"))
            .with_hint(format!("available: {}", BUILTIN_NAMES.join(", ")))
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))
}

#[derive(Serialize)]
struct ListEntry<'a> {
    name: &'a str,
    include: usize,
    exclude: usize,
}

fn cmd_terms_list(json: bool) -> Result<(), CliError> {
    let mut entries = Vec::with_capacity(BUILTIN_NAMES.len());
    for &name in BUILTIN_NAMES {
        let set = lookup(name)?;
        entries.push(ListEntry {
            name,
            include: set.include.len(),
            exclude: set.exclude.len(),
        });
    }

    if json {
        println!("{}", to_json(&entries)?);
        return Ok(());
    }

    for e in &entries {
        println!("{:<20} {:>3} include  {:>3} exclude", e.name, e.include, e.exclude);
    }
    Ok(())
}

fn cmd_terms_show(name: &str, json: bool) -> Result<(), CliError> {
    let set = lookup(name)?;

    if json {
        println!("{}", to_json(&set)?);
        return Ok(());
    }

    // Terms may carry meaningful surrounding spaces, so they are quoted.
    println!("# include ({})", set.include.len());
    for term in &set.include {
        println!("{term:?}");
    }
    println!("# exclude ({})", set.exclude.len());
    for term in &set.exclude {
        println!("{term:?}");
    }
    Ok(())
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    text: &'a str,
    terms: &'a str,
    method: MatchMethod,
    use_exclusions: bool,
    matched: bool,
    include_hits: Vec<&'a str>,
    exclude_hits: Vec<&'a str>,
}

pub fn cmd_check(
    text: &str,
    terms_name: &str,
    method: MatchMethod,
    no_exclude: bool,
    json: bool,
) -> Result<(), CliError> {
    let set = lookup(terms_name)?;
    let exclude: &[String] = if no_exclude { &[] } else { &set.exclude };

    let matched = Matcher::compile(method, &set.include, exclude).matches(&FieldValue::from(text));
    let output = CheckOutput {
        text,
        terms: terms_name,
        method,
        use_exclusions: !no_exclude,
        matched,
        include_hits: term_hits(method, text, &set.include),
        exclude_hits: term_hits(method, text, exclude),
    };

    if json {
        println!("{}", to_json(&output)?);
        return Ok(());
    }

    println!("{}", if output.matched { "match" } else { "no match" });
    if !output.include_hits.is_empty() {
        println!("  include: {}", output.include_hits.join(", "));
    }
    if !output.exclude_hits.is_empty() {
        println!("  exclude: {}", output.exclude_hits.join(", "));
    }
    Ok(())
}
