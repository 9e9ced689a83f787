// Command-line interface for shift handoff pages
//
// This binary is the shell around handoff-text (the editor model and the markup conversions) and
// handoff-cli's library (the content store and session glue).
//
// Offline commands never touch the network:
//  handoff convert <input> --to <format> [--from <format>] [--output <file>]
//  handoff title [--manager <name>] [--date <YYYY-MM-DD>]
//  handoff template [--date <YYYY-MM-DD>]
//
// Remote commands need confluence.base_url, confluence.parent_page_id and confluence.token:
//  handoff list [filter]
//  handoff show <id> [--markup]
//  handoff update <id> <file> [--from <format>] [--title <title>]   (storage files are sent unchanged)
//  handoff create [--title <title>] [--manager <name>]
//  handoff delete <id> --yes
//  handoff yesterday [--manager <name>]
//  handoff status
//
// Configuration is layered: built-in defaults, ./handoff.toml, --config <path>, then HANDOFF_*
// environment variables.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use handoff_cli::connectivity::wait_for_connectivity;
use handoff_cli::{pages, ConfluenceStore, ContentStore, PageSummary, Session, UreqTransport};
use handoff_config::{HandoffConfig, Loader};
use handoff_text::formats::StorageFormat;
use handoff_text::{Document, Format, FormatRegistry};
use std::fs;

type RemoteSession = Session<ConfluenceStore<UreqTransport>>;

fn build_cli() -> Command {
    Command::new("handoff")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Create, edit and convert shift handoff pages")
        .long_about(
            "handoff manages the daily shift handoff pages kept under one parent page.\n\n\
            Offline commands:\n  \
            - convert:  Convert between storage markup and plain text\n  \
            - title:    Print today's handoff title\n  \
            - template: Print the body of a new handoff page\n\n\
            Remote commands (need confluence.base_url, parent_page_id and token):\n  \
            - list, show, update, create, delete, yesterday, status\n\n\
            Examples:\n  \
            handoff convert page.html --to text          # Read a saved page as text\n  \
            handoff create --manager Alex                # Create today's page\n  \
            handoff update 12345 notes.txt               # Replace a page body from text",
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a handoff.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("wait-online")
                .long("wait-online")
                .help("Wait for the network before remote commands")
                .long_help(
                    "Poll connectivity.probe_url (or confluence.base_url) before running a remote\n\
                    command, for up to connectivity.timeout_secs.",
                )
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats")
                .long_about(
                    "Convert documents between formats.\n\n\
                    Supported formats:\n  \
                    - storage: Page storage markup (.storage, .xhtml, .html)\n  \
                    - text:    Plain text (.txt, .text)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Converting from storage keeps text only; formatting is dropped.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("title")
                .about("Print the handoff page title for a day")
                .arg(manager_arg())
                .arg(date_arg()),
        )
        .subcommand(
            Command::new("template")
                .about("Print the storage markup of a new handoff page")
                .arg(date_arg()),
        )
        .subcommand(
            Command::new("list")
                .about("List handoff pages under the parent page")
                .arg(
                    Arg::new("filter")
                        .help("Only titles containing this text (case-insensitive)")
                        .index(1),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Print a page as text")
                .arg(id_arg())
                .arg(
                    Arg::new("markup")
                        .long("markup")
                        .help("Print the raw storage markup instead of text")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Replace a page body with the contents of a file")
                .arg(id_arg())
                .arg(
                    Arg::new("file")
                        .help("File holding the new body")
                        .required(true)
                        .index(2)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Format of the file (auto-detected from file extension if not specified). Storage markup is sent unchanged")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("New page title (keeps the current one if not specified)"),
                ),
        )
        .subcommand(
            Command::new("create")
                .about("Create today's handoff page from the template")
                .arg(
                    Arg::new("title")
                        .long("title")
                        .help("Page title (defaults to DD-MM-YYYY_Handoff_<manager>)"),
                )
                .arg(manager_arg())
                .arg(date_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a page")
                .arg(id_arg())
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .help("Confirm the deletion")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("yesterday")
                .about("Find yesterday's handoff pages")
                .arg(manager_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("status").about("Show the current user and write access to the parent page"),
        )
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .help("Output file path (defaults to stdout)")
        .value_hint(ValueHint::FilePath)
}

fn id_arg() -> Arg {
    Arg::new("id").help("Page id").required(true).index(1)
}

fn manager_arg() -> Arg {
    Arg::new("manager")
        .long("manager")
        .help("Manager name (defaults to handoff.manager_name)")
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .value_name("YYYY-MM-DD")
        .help("Day to use instead of today")
        .value_parser(parse_date)
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print results as JSON")
        .action(ArgAction::SetTrue)
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    if let Err(err) = run(&matches) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()))?;
    let wait_online = matches.get_flag("wait-online");

    match matches.subcommand() {
        Some(("convert", sub)) => handle_convert_command(sub),
        Some(("title", sub)) => {
            let manager = manager_from(sub, &config);
            let title = pages::handoff_title(&config.handoff, day_from(sub), manager)?;
            println!("{title}");
            Ok(())
        }
        Some(("template", sub)) => {
            println!("{}", pages::initial_body(&config.handoff, day_from(sub))?);
            Ok(())
        }
        Some(("list", sub)) => {
            let filter = sub.get_one::<String>("filter").map_or("", |s| s.as_str());
            let session = connect(config, wait_online)?;
            let found = session.search(filter).context("listing handoff pages")?;
            print_pages(&session, &found, sub.get_flag("json"))
        }
        Some(("show", sub)) => {
            let id = required(sub, "id")?;
            let mut session = connect(config, wait_online)?;
            handle_show_command(&mut session, id, sub.get_flag("markup"))
        }
        Some(("update", sub)) => {
            let id = required(sub, "id")?;
            let file = required(sub, "file")?;
            let from = detect_format(file, sub.get_one::<String>("from"))?;
            let title = sub.get_one::<String>("title").map(|s| s.as_str());
            let body = read_update_body(file, &from)?;
            let mut session = connect(config, wait_online)?;
            handle_update_command(&mut session, id, body, title)
        }
        Some(("create", sub)) => {
            let manager = sub.get_one::<String>("manager").map(|s| s.as_str());
            let title = sub.get_one::<String>("title").map(|s| s.as_str());
            let day = day_from(sub);
            let mut session = connect(config, wait_online)?;
            let created = session
                .create(title, manager, day)
                .context("creating handoff page")?;
            if created.existed {
                println!("Page already exists: {} (id {})", created.title, created.id);
            } else {
                println!("Created page: {} (id {})", created.title, created.id);
            }
            println!("{}", session.page_url(&created.id));
            Ok(())
        }
        Some(("delete", sub)) => {
            let id = required(sub, "id")?;
            if !sub.get_flag("yes") {
                bail!("refusing to delete page {id} without --yes");
            }
            let mut session = connect(config, wait_online)?;
            session
                .delete(id)
                .with_context(|| format!("deleting page {id}"))?;
            println!("Deleted page {id}");
            Ok(())
        }
        Some(("yesterday", sub)) => {
            let manager = manager_from(sub, &config).map(str::to_string);
            let session = connect(config, wait_online)?;
            let found = session
                .yesterdays_handoffs(manager.as_deref(), today())
                .context("looking up yesterday's handoff")?;
            if found.is_empty() && !sub.get_flag("json") {
                match &manager {
                    Some(manager) => println!("No handoff page found for {manager} yesterday"),
                    None => println!("No handoff page found for yesterday"),
                }
                return Ok(());
            }
            print_pages(&session, &found, sub.get_flag("json"))
        }
        Some(("status", _)) => handle_status_command(connect(config, wait_online)?),
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given, see --help"),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .with_context(|| format!("missing argument <{name}>"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn day_from(matches: &ArgMatches) -> NaiveDate {
    matches
        .get_one::<NaiveDate>("date")
        .copied()
        .unwrap_or_else(today)
}

fn manager_from<'a>(matches: &'a ArgMatches, config: &'a HandoffConfig) -> Option<&'a str> {
    matches
        .get_one::<String>("manager")
        .map(|s| s.as_str())
        .or(config.handoff.manager())
}

/// Use `--from` if given, else the format registered for the file's extension.
fn detect_format(path: &str, explicit: Option<&String>) -> Result<String> {
    if let Some(format) = explicit {
        return Ok(format.clone());
    }
    FormatRegistry::default()
        .detect_format_from_filename(path)
        .with_context(|| format!("could not detect format from filename '{path}', use --from"))
}

fn handle_convert_command(matches: &ArgMatches) -> Result<()> {
    let input = required(matches, "input")?;
    let to = required(matches, "to")?;
    let from = detect_format(input, matches.get_one::<String>("from"))?;
    let registry = FormatRegistry::default();

    registry.get(&from)?;
    registry.get(to)?;

    let source = fs::read_to_string(input).with_context(|| format!("reading '{input}'"))?;
    let doc = registry.parse(&source, &from).context("parse error")?;
    let output = registry.serialize(&doc, to).context("serialization error")?;

    match matches.get_one::<String>("output") {
        Some(path) => fs::write(path, output).with_context(|| format!("writing '{path}'"))?,
        None => print!("{output}"),
    }
    Ok(())
}

fn handle_show_command(session: &mut RemoteSession, id: &str, markup: bool) -> Result<()> {
    if markup {
        let page = session
            .store()
            .fetch_page(id)
            .with_context(|| format!("fetching page {id}"))?;
        println!("{}", page.storage);
        return Ok(());
    }
    let page = session
        .open(id)
        .with_context(|| format!("fetching page {id}"))?;
    println!("# {} (version {})", page.title, page.version);
    print!("{}", handoff_text::formats::TextFormat.serialize(page.editor.document())?);
    Ok(())
}

/// New page body for `update`.
enum UpdateBody {
    /// Storage markup, written as is.
    Markup(String),
    /// Anything else, rendered through the editor model.
    Document(Document),
}

fn read_update_body(file: &str, from: &str) -> Result<UpdateBody> {
    let source = fs::read_to_string(file).with_context(|| format!("reading '{file}'"))?;
    if source.trim().is_empty() {
        bail!("'{file}' is empty, page content cannot be empty");
    }
    if from == StorageFormat.name() {
        return Ok(UpdateBody::Markup(source));
    }
    let doc = FormatRegistry::default()
        .parse(&source, from)
        .context("parse error")?;
    Ok(UpdateBody::Document(doc))
}

fn handle_update_command(
    session: &mut RemoteSession,
    id: &str,
    body: UpdateBody,
    title: Option<&str>,
) -> Result<()> {
    session
        .open(id)
        .with_context(|| format!("fetching page {id}"))?;
    if let Some(title) = title {
        session.rename(title)?;
    }
    let saved = match body {
        UpdateBody::Markup(markup) => session.save_markup(&markup),
        UpdateBody::Document(doc) => {
            session.replace_document(doc)?;
            session.save()
        }
    };
    let version = saved.with_context(|| format!("updating page {id}"))?;
    println!("Updated page {id} to version {version}");
    println!("{}", session.page_url(id));
    Ok(())
}

fn handle_status_command(session: RemoteSession) -> Result<()> {
    let parent_id = session.config().confluence.parent_page_id.clone();
    let user = session.store().current_user().context("fetching current user")?;
    let parent = session
        .store()
        .fetch_page(&parent_id)
        .with_context(|| format!("fetching parent page {parent_id}"))?;
    let writable = session
        .store()
        .can_write(&parent_id)
        .context("checking write permission")?;

    println!("User:        {user}");
    println!("Parent page: {} ({})", parent.title, session.page_url(&parent_id));
    println!("Space:       {}", parent.space_key.as_deref().unwrap_or("-"));
    println!("Write access: {}", if writable { "yes" } else { "no" });
    Ok(())
}

fn print_pages(session: &RemoteSession, found: &[PageSummary], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(found)?);
        return Ok(());
    }
    for page in found {
        println!("{}\tv{}\t{}", page.id, page.version, page.title);
        println!("\t{}", session.page_url(&page.id));
    }
    Ok(())
}

fn connect(config: HandoffConfig, wait_online: bool) -> Result<RemoteSession> {
    config.require_remote()?;
    let transport = if config.confluence.verify_tls {
        UreqTransport::new(config.confluence.timeout())
    } else {
        log::warn!("TLS certificate verification is disabled for {}", config.confluence.base_url);
        UreqTransport::without_tls_verification(config.confluence.timeout())?
    };

    if wait_online {
        let probe_url = config.probe_url().to_string();
        let online = wait_for_connectivity(
            || transport.probe(&probe_url),
            config.connectivity.timeout(),
            config.connectivity.interval(),
        );
        if !online {
            bail!(
                "no connection to {probe_url} after {}s",
                config.connectivity.timeout_secs
            );
        }
    }

    let store = ConfluenceStore::new(
        &config.confluence.base_url,
        &config.confluence.token,
        transport,
    )?
    .with_page_size(config.confluence.page_size);
    Ok(Session::new(config, store))
}

fn load_cli_config(explicit_path: Option<&str>) -> Result<HandoffConfig> {
    let loader = Loader::new().with_optional_file("handoff.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .with_environment()
        .build()
        .context("failed to load configuration")
}
