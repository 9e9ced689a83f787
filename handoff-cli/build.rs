use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the subcommands from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const OFFLINE_COMMANDS: &[(&str, &str)] = &[
    ("convert", "Convert between document formats"),
    ("title", "Print the handoff page title for a day"),
    ("template", "Print the storage markup of a new handoff page"),
];

const REMOTE_COMMANDS: &[(&str, &str)] = &[
    ("list", "List handoff pages under the parent page"),
    ("show", "Print a page as text"),
    ("update", "Replace a page body with the contents of a file"),
    ("create", "Create today's handoff page from the template"),
    ("delete", "Delete a page"),
    ("yesterday", "Find yesterday's handoff pages"),
    ("status", "Show the current user and write access to the parent page"),
];

const FORMATS: &[&str] = &["storage", "text"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("handoff")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Create, edit and convert shift handoff pages")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("wait-online")
                .long("wait-online")
                .global(true)
                .action(ArgAction::SetTrue),
        );

    for (name, about) in OFFLINE_COMMANDS.iter().chain(REMOTE_COMMANDS) {
        let mut sub = Command::new(*name).about(*about);
        if *name == "convert" {
            sub = sub
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_parser(clap::builder::PossibleValuesParser::new(FORMATS)),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_parser(clap::builder::PossibleValuesParser::new(FORMATS)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                );
        }
        cmd = cmd.subcommand(sub);
    }

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "handoff", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "handoff", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "handoff", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
