//! mdc CLI: query the hieroglyphic sign database and the modifier algebra.

use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use mdc_model::config::DatabaseConfig;
use mdc_model::mdc::{Modifier, ModifierState};
use mdc_model::paths::MdcPaths;
use mdc_model::signs::{
    CompositeSignDatabase, PhoneticLevel, SignCode, SignDatabase, SignVariant, VariantFilter,
};

#[derive(Parser)]
#[command(name = "mdc", version, about = "Hieroglyphic sign database and MdC tools")]
struct Cli {
    /// Configuration file (defaults to $XDG_CONFIG_HOME/mdc-model/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// User sign-definition file, overriding the configured one.
    #[arg(long, global = true)]
    user_file: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sign codes in Gardiner order.
    Codes {
        /// Restrict to one family (e.g. "G", "Aa").
        #[arg(long)]
        family: Option<String>,

        /// Restrict to signs carrying this tag.
        #[arg(long)]
        tag: Option<String>,
    },

    /// Show everything known about one sign.
    Describe {
        /// Sign code, in any case (e.g. "g1").
        code: String,
    },

    /// List variants of a sign.
    Variants {
        code: String,

        /// Relation filter: all, linguistic, full, graphical.
        #[arg(long, default_value = "all")]
        filter: VariantFilter,
    },

    /// Resolve a phonetic value to candidate signs.
    Possibilities {
        value: String,

        /// Phonetic level: keyboard, palette, informative, mdc.
        #[arg(long, default_value = "palette")]
        level: PhoneticLevel,
    },

    /// List signs usable for a Gardiner code, user glyphs included.
    Suitable { code: String },

    /// Fold modifier tokens (e.g. `r1 \80 red`) into a modifier state.
    Modifiers {
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// Report whether the user sign-definition file is valid.
    Check,
}

#[derive(Serialize)]
struct SignReport {
    code: SignCode,
    family: Option<&'static str>,
    description: String,
    always_displayed: bool,
    tags: BTreeSet<String>,
    values: Vec<String>,
    contains: Vec<SignCode>,
    contained_in: Vec<SignCode>,
    declared_variants: BTreeSet<SignVariant>,
    variants: BTreeSet<SignCode>,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    user_file: Option<String>,
    valid: bool,
    message: &'a str,
    distribution_signs: usize,
    user_signs: usize,
}

fn load_config(cli: &Cli) -> Result<DatabaseConfig> {
    let mut config = match &cli.config {
        Some(path) => DatabaseConfig::load(path)?,
        None => match MdcPaths::resolve() {
            Ok(paths) if paths.config_file().exists() => {
                DatabaseConfig::load(&paths.config_file())?
            }
            _ => DatabaseConfig::default(),
        },
    };
    if let Some(user_file) = &cli.user_file {
        config.user_file = Some(user_file.clone());
        config.load_user_file = true;
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn print_codes<'a>(json: bool, codes: impl IntoIterator<Item = &'a SignCode>) -> Result<()> {
    let codes: Vec<&SignCode> = codes.into_iter().collect();
    if json {
        return print_json(&codes);
    }
    if codes.is_empty() {
        println!("No signs.");
    }
    for code in codes {
        println!("{code}");
    }
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Pure modifier folding needs no database.
    if let Commands::Modifiers { tokens } = &cli.command {
        let modifiers = tokens
            .iter()
            .map(|t| t.parse::<Modifier>())
            .collect::<Result<Vec<_>, _>>()?;
        let state = ModifierState::from_modifiers(&modifiers);
        if cli.json {
            return print_json(&state);
        }
        println!("angle:    {}", state.angle());
        println!("reversed: {}", state.is_reversed());
        println!("scale:    {}", state.scale());
        for (name, value) in state.generic() {
            match value {
                Some(v) => println!("{name}:  {v}"),
                None => println!("{name}:  set"),
            }
        }
        println!("mdc:      {state}");
        return Ok(());
    }

    let config = load_config(&cli)?;
    let db = CompositeSignDatabase::open(&config)?;
    if !db.is_user_file_valid() {
        eprintln!("warning: user sign file ignored: {}", db.user_file_message());
    }

    match cli.command {
        Commands::Codes { family, tag } => {
            let codes = match (&family, &tag) {
                (Some(f), Some(t)) => db.signs_with_tag_in_family(t, f),
                (Some(f), None) => db.codes_for_family(f, true),
                (None, Some(t)) => db
                    .all_codes()
                    .into_iter()
                    .filter(|c| db.tags_for_sign(c).contains(t))
                    .collect(),
                (None, None) => db.all_codes(),
            };
            print_codes(cli.json, &codes)?;
        }

        Commands::Describe { code } => {
            let code = db.canonical_code(&code);
            let report = SignReport {
                family: code.family().map(|f| f.code),
                description: db.description_for(&code),
                always_displayed: db.is_always_displayed(&code),
                tags: db.tags_for_sign(&code),
                values: db.values_for(&code),
                contains: db.signs_in(&code),
                contained_in: db.signs_containing(&code),
                declared_variants: db.declared_variants(&code),
                variants: db.variants(&code, VariantFilter::All),
                code,
            };
            if cli.json {
                return print_json(&report);
            }
            println!("Sign: {}", report.code);
            println!("  family:      {}", report.family.unwrap_or("-"));
            println!("  description: {}", report.description);
            println!("  always shown: {}", report.always_displayed);
            println!("  tags:        {}", join(&report.tags));
            println!("  values:      {}", report.values.join(", "));
            println!("  contains:    {}", join(&report.contains));
            println!("  part of:     {}", join(&report.contained_in));
            println!("  variants:    {}", join(&report.variants));
        }

        Commands::Variants { code, filter } => {
            let code = db.canonical_code(&code);
            print_codes(cli.json, &db.variants(&code, filter))?;
        }

        Commands::Possibilities { value, level } => {
            let list = db.possibilities_for(&value, level);
            if cli.json {
                return print_json(&list);
            }
            print_codes(false, &list)?;
        }

        Commands::Suitable { code } => {
            let list = db.suitable_signs_for_code(&code);
            if cli.json {
                return print_json(&list);
            }
            print_codes(false, &list)?;
        }

        Commands::Check => {
            let report = CheckReport {
                user_file: config
                    .resolve_user_file(MdcPaths::resolve().ok().as_ref())
                    .map(|p| p.display().to_string()),
                valid: db.is_user_file_valid(),
                message: db.user_file_message(),
                distribution_signs: db.distribution().len(),
                user_signs: db.user().len(),
            };
            if cli.json {
                return print_json(&report);
            }
            println!(
                "user file:  {}",
                report.user_file.as_deref().unwrap_or("(disabled)")
            );
            println!("valid:      {}", report.valid);
            if !report.valid {
                println!("message:    {}", report.message);
            }
            println!(
                "signs:      {} distribution, {} user",
                report.distribution_signs, report.user_signs
            );
        }

        Commands::Modifiers { .. } => {}
    }

    Ok(())
}

fn join<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
