mod terminal;

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::info;
use zerobot_core::core_api::host::{copy_with_notice, delete_with_confirm, rename_with_prompt};
use zerobot_core::core_api::{EditorHost, NoticeKind, ProfileStore, Slot};
use zerobot_core::document::Document;
use zerobot_core::kind::SectionKind;
use zerobot_render::{
    JsonIndent, TextRenderOptions, render_document, render_overview_with_options,
    render_summary_json_selected,
};

use crate::terminal::TerminalHost;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Indent width of written files
    #[arg(
        long,
        global = true,
        value_name = "2|4",
        default_value = "2",
        value_parser = parse_indent
    )]
    indent: JsonIndent,
    /// Raise log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

/// 1-based profile position as shown by `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ProfileNumber(usize);

impl ProfileNumber {
    fn index(self) -> usize {
        self.0 - 1
    }
}

#[derive(Debug, Args)]
struct TransferArgs {
    /// File the profiles are taken from
    #[arg(long, value_name = "FILE")]
    from: PathBuf,
    /// File that receives them
    #[arg(long, value_name = "FILE")]
    to: PathBuf,
    #[arg(long, value_name = "SECTION", value_parser = parse_section)]
    section: SectionKind,
    #[arg(long, value_name = "PATH")]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct EditArgs {
    #[arg(value_name = "FILE")]
    path: PathBuf,
    #[arg(long, value_name = "SECTION", value_parser = parse_section)]
    section: SectionKind,
    #[arg(long, value_name = "PATH")]
    output: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the profile sections of a file
    List {
        #[arg(value_name = "FILE")]
        path: PathBuf,
        #[arg(long)]
        json: bool,
        #[arg(long, value_name = "SECTION", value_parser = parse_section)]
        section: Option<SectionKind>,
        /// Also list the monsters of each targeting profile
        #[arg(long)]
        entries: bool,
    },
    /// Copy one profile into the same section of another file
    Copy {
        #[command(flatten)]
        transfer: TransferArgs,
        #[arg(long, value_name = "N", value_parser = parse_profile_number)]
        profile: ProfileNumber,
    },
    /// Append every profile of a section to another file
    Merge {
        #[command(flatten)]
        transfer: TransferArgs,
    },
    /// Overwrite a section of another file with this one
    Replace {
        #[command(flatten)]
        transfer: TransferArgs,
    },
    /// Rename a profile, asking for the name when --name is omitted
    Rename {
        #[command(flatten)]
        edit: EditArgs,
        #[arg(long, value_name = "N", value_parser = parse_profile_number)]
        profile: ProfileNumber,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a profile
    Delete {
        #[command(flatten)]
        edit: EditArgs,
        #[arg(long, value_name = "N", value_parser = parse_profile_number)]
        profile: ProfileNumber,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Move a profile to another position in its section
    Move {
        #[command(flatten)]
        edit: EditArgs,
        #[arg(long = "from-index", value_name = "N", value_parser = parse_profile_number)]
        from_index: ProfileNumber,
        #[arg(long = "to-index", value_name = "N", value_parser = parse_profile_number)]
        to_index: ProfileNumber,
    },
    /// Sort targeting monster lists by name, or the enabled scripts
    Sort {
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Only sort this targeting profile
        #[arg(long, value_name = "N", value_parser = parse_profile_number)]
        profile: Option<ProfileNumber>,
        /// Sort the enabled scripts instead of the targeting lists
        #[arg(long)]
        scripts: bool,
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
    },
    /// Copy one profile's payload over another profile's payload
    Paste {
        #[arg(long, value_name = "FILE")]
        from: PathBuf,
        #[arg(long = "from-profile", value_name = "N", value_parser = parse_profile_number)]
        from_profile: ProfileNumber,
        #[arg(long, value_name = "FILE")]
        to: PathBuf,
        #[arg(long = "to-profile", value_name = "N", value_parser = parse_profile_number)]
        to_profile: ProfileNumber,
        #[arg(long, value_name = "SECTION", value_parser = parse_section)]
        section: SectionKind,
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut store = ProfileStore::new();
    match cli.command {
        Command::List {
            path,
            json,
            section,
            entries,
        } => {
            load(&mut store, Slot::First, &path);
            let document = store.document(Slot::First).expect("loaded above");
            print_listing(document, json, section, entries);
        }
        Command::Copy { transfer, profile } => {
            load_pair(&mut store, &transfer.from, &transfer.to);
            let mut host = TerminalHost::stdin(true);
            copy_with_notice(
                &mut store,
                &mut host,
                Slot::First,
                Slot::Second,
                transfer.section,
                profile.index(),
            )
            .unwrap_or_else(|_| process::exit(1));
            write_output(&store, Slot::Second, &transfer.output, cli.indent);
        }
        Command::Merge { transfer } => {
            load_pair(&mut store, &transfer.from, &transfer.to);
            let appended = store
                .merge_section(Slot::First, Slot::Second, transfer.section)
                .unwrap_or_else(|e| fail("Error merging section", e));
            println!("Merged {appended} {} profiles", transfer.section);
            write_output(&store, Slot::Second, &transfer.output, cli.indent);
        }
        Command::Replace { transfer } => {
            load_pair(&mut store, &transfer.from, &transfer.to);
            store
                .replace_section(Slot::First, Slot::Second, transfer.section)
                .unwrap_or_else(|e| fail("Error replacing section", e));
            println!("Replaced {} section", transfer.section);
            write_output(&store, Slot::Second, &transfer.output, cli.indent);
        }
        Command::Rename {
            edit,
            profile,
            name,
        } => {
            load(&mut store, Slot::First, &edit.path);
            let mut host = TerminalHost::stdin(false);
            let renamed = match name {
                Some(name) => Some(rename_with_name(
                    &mut store, &mut host, &edit, profile, &name,
                )),
                None => rename_with_prompt(
                    &mut store,
                    &mut host,
                    Slot::First,
                    edit.section,
                    profile.index(),
                )
                .unwrap_or_else(|_| process::exit(1)),
            };
            if renamed.is_none() {
                println!("Rename cancelled");
                return;
            }
            write_output(&store, Slot::First, &edit.output, cli.indent);
        }
        Command::Delete { edit, profile, yes } => {
            load(&mut store, Slot::First, &edit.path);
            let mut host = TerminalHost::stdin(yes);
            let removed = delete_with_confirm(
                &mut store,
                &mut host,
                Slot::First,
                edit.section,
                profile.index(),
            )
            .unwrap_or_else(|_| process::exit(1));
            if removed.is_none() {
                println!("Nothing deleted");
                return;
            }
            write_output(&store, Slot::First, &edit.output, cli.indent);
        }
        Command::Move {
            edit,
            from_index,
            to_index,
        } => {
            load(&mut store, Slot::First, &edit.path);
            store
                .reorder_profile(
                    Slot::First,
                    edit.section,
                    from_index.index(),
                    to_index.index(),
                )
                .unwrap_or_else(|e| fail("Error moving profile", e));
            println!(
                "Moved {} profile {} to position {}",
                edit.section, from_index.0, to_index.0
            );
            write_output(&store, Slot::First, &edit.output, cli.indent);
        }
        Command::Sort {
            path,
            profile,
            scripts,
            output,
        } => {
            load(&mut store, Slot::First, &path);
            if let Some(profile) = profile {
                store
                    .sort_profile_targets(Slot::First, profile.index())
                    .unwrap_or_else(|e| fail("Error sorting targets", e));
                println!("Sorted targets of profile {}", profile.0);
            } else if !scripts {
                let sorted = store
                    .sort_targeting_lists(Slot::First)
                    .unwrap_or_else(|e| fail("Error sorting targets", e));
                println!("Sorted {sorted} targeting lists");
            }
            if scripts {
                let changed = store
                    .sort_enabled_scripts(Slot::First)
                    .unwrap_or_else(|e| fail("Error sorting scripts", e));
                if changed {
                    println!("Sorted enabled scripts");
                } else {
                    println!("Enabled scripts already sorted");
                }
            }
            write_output(&store, Slot::First, &output, cli.indent);
        }
        Command::Paste {
            from,
            from_profile,
            to,
            to_profile,
            section,
            output,
        } => {
            load_pair(&mut store, &from, &to);
            store
                .copy_to_clipboard(Slot::First, section, from_profile.index())
                .unwrap_or_else(|e| fail("Error copying profile", e));
            store
                .paste_from_clipboard(Slot::Second, section, to_profile.index())
                .unwrap_or_else(|e| fail("Error pasting profile", e));
            println!(
                "Pasted {section} profile {} over profile {}",
                from_profile.0, to_profile.0
            );
            write_output(&store, Slot::Second, &output, cli.indent);
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn parse_indent(raw: &str) -> Result<JsonIndent, String> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .and_then(JsonIndent::from_width)
        .ok_or_else(|| format!("invalid indent '{raw}'; expected 2 or 4"))
}

fn parse_section(raw: &str) -> Result<SectionKind, String> {
    SectionKind::parse_user_input(raw).ok_or_else(|| {
        format!("invalid section '{raw}'; expected targeting, magic-shooter, equipment or healing")
    })
}

fn parse_profile_number(raw: &str) -> Result<ProfileNumber, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("profile numbers start at 1".to_string()),
        Ok(n) => Ok(ProfileNumber(n)),
        Err(_) => Err(format!("invalid profile number '{raw}'")),
    }
}

fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("{context}: {err}");
    process::exit(1);
}

fn load(store: &mut ProfileStore, slot: Slot, path: &Path) {
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });
    store.load_bytes(slot, bytes).unwrap_or_else(|e| {
        eprintln!("Error parsing profile file: {}", path.display());
        eprintln!("  {e}");
        process::exit(1);
    });
}

fn load_pair(store: &mut ProfileStore, from: &Path, to: &Path) {
    load(store, Slot::First, from);
    load(store, Slot::Second, to);
}

fn rename_with_name<H: EditorHost>(
    store: &mut ProfileStore,
    host: &mut H,
    edit: &EditArgs,
    profile: ProfileNumber,
    name: &str,
) -> String {
    store
        .rename_profile(Slot::First, edit.section, profile.index(), name)
        .unwrap_or_else(|e| {
            host.notify(&e.message, NoticeKind::Error);
            process::exit(1);
        });
    let name = name.trim().to_string();
    host.notify(
        &format!("Renamed {} profile {} to \"{name}\"", edit.section, profile.0),
        NoticeKind::Success,
    );
    name
}

fn write_output(store: &ProfileStore, slot: Slot, path: &Path, indent: JsonIndent) {
    let document = store.document(slot).expect("loaded above");
    let mut rendered = render_document(document, indent).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    rendered.push('\n');
    fs::write(path, rendered).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {e}", path.display());
        process::exit(1);
    });
    info!("wrote {}", path.display());
    println!("Wrote {}", path.display());
}

fn print_listing(document: &Document, json: bool, section: Option<SectionKind>, entries: bool) {
    if json {
        let summary = render_summary_json_selected(document, section);
        let rendered = serde_json::to_string_pretty(&summary).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
        return;
    }

    print!(
        "{}",
        render_overview_with_options(
            document,
            TextRenderOptions {
                verbose: entries,
                section,
            },
        )
    );
}
