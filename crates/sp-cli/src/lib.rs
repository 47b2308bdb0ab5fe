use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use sp_core::{Command, CommandCatalog, Control, Detail};
use sp_fs::{config_path, load_catalog, load_config, save_config, Config};
use sp_search::{modified, Listing, SearchState};
use sp_settings::{builtin_catalog, Settings};

/// Column where the breadcrumb starts in list rows.
const NAME_WIDTH: usize = 28;

#[derive(Parser)]
#[command(name = "searchplus", version, about = "Search settings screens by keyword")]
struct Cli {
    /// Load commands from a YAML catalog instead of the built-in one.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Change a setting (FIELD=VALUE or GROUP.MEMBER=VALUE). With `show` and
    /// `reset` the change is made after the screen opens.
    #[arg(long = "set", value_name = "FIELD=VALUE", global = true)]
    set: Vec<String>,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Show the suggested commands (the default).
    Suggested,
    /// Search commands by keyword.
    Search {
        /// Words that must all appear in a command's keywords.
        query: Vec<String>,
    },
    /// List every command, marking modified ones with `*`.
    List,
    /// Show the settings sections of a command.
    Show {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Reset a command's settings to their defaults.
    Reset {
        name: Vec<String>,
        /// Reset every command.
        #[arg(long, conflicts_with = "name")]
        all: bool,
    },
    /// List commands whose settings differ from their defaults.
    Modified,
    /// Print every stored setting.
    Values,
    /// Show or change the saved configuration.
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long)]
    log_level: Option<String>,
    /// Breadcrumb depth on suggested rows (0 shows the full path).
    #[arg(long)]
    grid_depth: Option<usize>,
    /// YAML catalog to use when `--catalog` is not given.
    #[arg(long, value_name = "PATH", conflicts_with = "builtin")]
    default_catalog: Option<PathBuf>,
    /// Go back to the built-in catalog.
    #[arg(long)]
    builtin: bool,
}

impl ConfigArgs {
    /// Apply the requested changes. Returns whether anything changed.
    fn apply(&self, config: &mut Config) -> bool {
        let before = config.clone();
        if let Some(level) = &self.log_level {
            config.log_level.clone_from(level);
        }
        if let Some(depth) = self.grid_depth {
            config.grid_depth = depth;
        }
        if let Some(path) = &self.default_catalog {
            config.catalog = Some(path.clone());
        }
        if self.builtin {
            config.catalog = None;
        }
        *config != before
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config().context("failed to load config")?;
    init_logging(&config);

    let command = cli.command.unwrap_or(CliCommand::Suggested);
    let mut out = io::stdout().lock();
    if let CliCommand::Config(changes) = command {
        if changes.apply(&mut config) {
            save_config(&config).context("failed to save config")?;
            info!("saved config to {}", config_path()?.display());
        }
        return print_config(&config, &mut out);
    }

    let catalog_path = cli.catalog.as_deref().or(config.catalog.as_deref());
    let catalog = open_catalog(catalog_path)?;
    let mut settings = Settings::from_catalog(&catalog);
    execute(command, &catalog, &mut settings, &cli.set, &config, &mut out)
}

fn init_logging(config: &Config) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();
}

fn open_catalog(path: Option<&Path>) -> Result<CommandCatalog> {
    match path {
        Some(path) => {
            info!("using catalog {}", path.display());
            load_catalog(path).with_context(|| format!("failed to load catalog {}", path.display()))
        }
        None => builtin_catalog().context("built-in catalog is invalid"),
    }
}

fn execute(
    command: CliCommand,
    catalog: &CommandCatalog,
    settings: &mut Settings,
    assignments: &[String],
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    // Screens open before the edits so their saved values are recorded first.
    let opens_screen = matches!(command, CliCommand::Show { .. } | CliCommand::Reset { all: false, .. });
    if !opens_screen {
        apply(catalog, settings, assignments)?;
    }
    match command {
        CliCommand::Suggested => show_listing(&SearchState::new(), catalog, config, out),
        CliCommand::Search { query } => {
            let mut state = SearchState::new();
            state.activate();
            state.set_query(query.join(" "));
            show_listing(&state, catalog, config, out)
        }
        CliCommand::List => list_commands(catalog, settings, out),
        CliCommand::Show { name } => {
            let command = find(catalog, &name)?;
            let mut detail = command.open_detail(settings);
            apply(catalog, settings, assignments)?;
            detail.refresh(settings);
            show_detail(command, &detail, settings, out)
        }
        CliCommand::Reset { all: true, .. } => {
            catalog.reset_all(settings);
            writeln!(out, "Reset all {} commands.", catalog.len())?;
            list_modified(catalog, settings, out)
        }
        CliCommand::Reset { name, all: false } => {
            if name.is_empty() {
                bail!("name a command to reset, or pass --all");
            }
            let command = find(catalog, &name)?;
            let detail = command.open_detail(settings);
            apply(catalog, settings, assignments)?;
            reset_one(command, &detail, settings, out)?;
            list_modified(catalog, settings, out)
        }
        CliCommand::Modified => list_modified(catalog, settings, out),
        CliCommand::Values => list_values(settings, out),
        CliCommand::Config(_) => bail!("`config` does not take a catalog"),
    }
}

fn apply(catalog: &CommandCatalog, settings: &mut Settings, assignments: &[String]) -> Result<()> {
    for assignment in assignments {
        settings
            .assign(catalog, assignment)
            .with_context(|| format!("invalid --set `{assignment}`"))?;
    }
    Ok(())
}

fn find<'a>(catalog: &'a CommandCatalog, name: &[String]) -> Result<&'a Command> {
    let name = name.join(" ");
    catalog
        .find(&name)
        .ok_or_else(|| anyhow!("no command named `{name}`"))
}

fn show_listing(
    state: &SearchState,
    catalog: &CommandCatalog,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    match state.listing(catalog) {
        Listing::Suggested(commands) => {
            for command in commands {
                writeln!(out, "{}", row(command.name(), &command.path_label(Some(config.grid_depth))))?;
            }
        }
        Listing::Prompt => writeln!(out, "Type a command to search settings.")?,
        Listing::Results(commands) => {
            for command in commands {
                writeln!(out, "{}", row(command.name(), &command.path_label(None)))?;
            }
        }
        Listing::NoResults => writeln!(out, "No commands match `{}`.", state.query().trim())?,
    }
    Ok(())
}

fn list_commands(catalog: &CommandCatalog, settings: &Settings, out: &mut impl Write) -> Result<()> {
    for command in catalog {
        let marker = if command.is_at_default(settings) { ' ' } else { '*' };
        writeln!(out, "{marker} {}", row(command.name(), &command.path_label(None)))?;
    }
    Ok(())
}

fn list_modified(catalog: &CommandCatalog, settings: &Settings, out: &mut impl Write) -> Result<()> {
    let commands = modified(catalog, settings);
    if commands.is_empty() {
        writeln!(out, "All settings are at their defaults.")?;
    }
    for command in commands {
        writeln!(out, "{}", row(command.name(), &command.path_label(None)))?;
    }
    Ok(())
}

fn list_values(settings: &Settings, out: &mut impl Write) -> Result<()> {
    for (field, value) in settings.iter() {
        writeln!(out, "{field} = {value}")?;
    }
    Ok(())
}

fn print_config(config: &Config, out: &mut impl Write) -> Result<()> {
    writeln!(out, "log_level: {}", config.log_level)?;
    writeln!(out, "grid_depth: {}", config.grid_depth)?;
    match &config.catalog {
        Some(path) => writeln!(out, "catalog: {}", path.display())?,
        None => writeln!(out, "catalog: built-in")?,
    }
    Ok(())
}

fn show_detail(
    command: &Command,
    detail: &Detail<'_>,
    settings: &Settings,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{}", command.name())?;
    let path = command.path_label(None);
    if !path.is_empty() {
        writeln!(out, "{path}")?;
    }
    let state = if detail.is_at_default(settings) { "at defaults" } else { "modified" };
    writeln!(out, "{state}")?;

    for section in detail.sections() {
        writeln!(out)?;
        if !section.header.is_empty() {
            writeln!(out, "{}", section.header)?;
        }
        for control in &section.content {
            writeln!(out, "  {}", describe(control))?;
        }
        if !section.footer.is_empty() {
            writeln!(out, "  {}", section.footer)?;
        }
    }
    Ok(())
}

fn reset_one(
    command: &Command,
    detail: &Detail<'_>,
    settings: &mut Settings,
    out: &mut impl Write,
) -> Result<()> {
    if detail.is_at_default(settings) {
        writeln!(out, "{} was already at its defaults.", command.name())?;
        return Ok(());
    }
    detail.reset(settings);
    info!("reset `{}`", command.name());
    writeln!(out, "Reset {}.", command.name())?;
    Ok(())
}

/// Name padded to [`NAME_WIDTH`], then the breadcrumb. Long names still get
/// one space before the breadcrumb.
fn row(name: &str, label: &str) -> String {
    let width = NAME_WIDTH - 1;
    format!("{name:<width$} {label}").trim_end().to_string()
}

fn describe(control: &Control) -> String {
    match control {
        Control::Toggle { label, on, .. } => format!("{label}: {}", if *on { "on" } else { "off" }),
        Control::Picker {
            label,
            options,
            selected,
            ..
        } => format!("{label}: {selected} ({})", options.join(" | ")),
        Control::Stepper {
            label,
            min,
            max,
            value,
            ..
        } => format!("{label}: {value} ({min}-{max})"),
        Control::TextField { label, text, .. } => format!("{label}: \"{text}\""),
        Control::ToggleGroup { label, flags, .. } => format!("{label}: {flags}"),
        Control::Note { text } => text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn run_with(command: CliCommand, assignments: &[&str]) -> Result<String> {
        let catalog = builtin_catalog()?;
        let mut settings = Settings::from_catalog(&catalog);
        let assignments: Vec<String> = assignments.iter().map(|a| (*a).to_string()).collect();
        let mut buffer = Vec::new();
        execute(command, &catalog, &mut settings, &assignments, &Config::default(), &mut buffer)?;
        Ok(String::from_utf8(buffer).expect("utf8 output"))
    }

    fn search(words: &[&str]) -> CliCommand {
        CliCommand::Search {
            query: words.iter().map(|word| (*word).to_string()).collect(),
        }
    }

    fn named(name: &str) -> Vec<String> {
        name.split(' ').map(str::to_string).collect()
    }

    fn reset(name: &str) -> CliCommand {
        CliCommand::Reset {
            name: named(name),
            all: false,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "searchplus",
            "show",
            "Account",
            "Privacy",
            "--set",
            "private_account=on",
        ])
        .expect("parse");
        assert_eq!(cli.set, vec!["private_account=on"]);
        assert!(matches!(cli.command, Some(CliCommand::Show { name }) if name == named("Account Privacy")));
    }

    #[test]
    fn reset_rejects_name_with_all() {
        assert!(Cli::try_parse_from(["searchplus", "reset", "Bio", "--all"]).is_err());
    }

    #[test]
    fn config_rejects_catalog_with_builtin() {
        let parsed = Cli::try_parse_from([
            "searchplus",
            "config",
            "--default-catalog",
            "commands.yaml",
            "--builtin",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn search_rows_snapshot() {
        let output = run_with(search(&["priv"]), &[]).expect("search");
        insta::assert_snapshot!("search_priv", output.trim_end());
    }

    #[test]
    fn show_notifications_snapshot() {
        let output = run_with(
            CliCommand::Show {
                name: named("notifications"),
            },
            &["likes.others=off"],
        )
        .expect("show");
        insta::assert_snapshot!("show_notifications", output.trim_end());
    }

    #[test]
    fn show_edit_username_snapshot() {
        let output = run_with(
            CliCommand::Show {
                name: named("edit username"),
            },
            &["username=jane"],
        )
        .expect("show");
        insta::assert_snapshot!("show_edit_username", output.trim_end());
    }

    #[test]
    fn empty_search_prompts() {
        let output = run_with(search(&[]), &[]).expect("search");
        assert_eq!(output, "Type a command to search settings.\n");
    }

    #[test]
    fn unmatched_search_says_so() {
        let output = run_with(search(&["zzz"]), &[]).expect("search");
        assert_eq!(output, "No commands match `zzz`.\n");
    }

    #[test]
    fn suggested_uses_grid_depth() {
        let output = run_with(CliCommand::Suggested, &[]).expect("suggested");
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], row("Edit Bio", "Profile"));
        assert!(lines.contains(&row("Change Number", "Settings → Account").as_str()));
        assert!(lines.contains(&row("Comment Privacy", "Settings → Privacy").as_str()));
    }

    #[test]
    fn long_names_keep_a_space_before_the_breadcrumb() {
        let name = "A Command Name Longer Than The Column";
        assert_eq!(row(name, "Settings"), format!("{name} Settings"));
        assert_eq!(row("Bio", ""), "Bio");
    }

    #[test]
    fn list_marks_modified_commands() {
        let output = run_with(CliCommand::List, &["auto_login=on"]).expect("list");
        let marked: Vec<_> = output.lines().filter(|line| line.starts_with('*')).collect();
        assert_eq!(marked, vec![format!("* {}", row("Auto Login", "Settings → Security"))]);
    }

    #[test]
    fn invalid_picker_choice_is_rejected() {
        let result = run_with(CliCommand::List, &["allow_comments=Friends"]);
        assert!(result.unwrap_err().to_string().contains("allow_comments=Friends"));
    }

    #[test]
    fn values_lists_stored_settings() {
        let output = run_with(CliCommand::Values, &["bio=hello"]).expect("values");
        assert!(output.contains("allow_messages = People I Follow Only\n"));
        assert!(output.contains("bio = hello\n"));
    }

    #[test]
    fn reset_reports_remaining_changes() {
        let output = run_with(reset("Auto Login"), &["auto_login=on", "private_account=on"])
            .expect("reset");
        let expected = format!(
            "Reset Auto Login.\n{}\n",
            row("Account Privacy", "Settings → Privacy")
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn reset_reverts_edits_made_after_opening() {
        let output = run_with(reset("Edit Username"), &["username=jane"]).expect("reset");
        assert_eq!(output, "Reset Edit Username.\nAll settings are at their defaults.\n");
    }

    #[test]
    fn reset_all_clears_everything() {
        let output = run_with(
            CliCommand::Reset {
                name: Vec::new(),
                all: true,
            },
            &["bio=hello", "live_videos=off"],
        )
        .expect("reset");
        assert_eq!(
            output,
            "Reset all 12 commands.\nAll settings are at their defaults.\n"
        );
    }

    #[test]
    fn reset_without_target_fails() {
        let result = run_with(
            CliCommand::Reset {
                name: Vec::new(),
                all: false,
            },
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_command_fails() {
        let result = run_with(
            CliCommand::Show {
                name: named("Volume"),
            },
            &[],
        );
        assert!(result.unwrap_err().to_string().contains("Volume"));
    }

    #[test]
    fn config_changes_are_detected() {
        let mut config = Config::default();
        assert!(!ConfigArgs::default().apply(&mut config));

        let changes = ConfigArgs {
            grid_depth: Some(0),
            default_catalog: Some(PathBuf::from("commands.yaml")),
            ..ConfigArgs::default()
        };
        assert!(changes.apply(&mut config));
        assert!(!changes.apply(&mut config));

        let mut buffer = Vec::new();
        print_config(&config, &mut buffer).expect("print");
        let printed = String::from_utf8(buffer).expect("utf8 output");
        assert_eq!(printed, "log_level: warn\ngrid_depth: 0\ncatalog: commands.yaml\n");

        let back = ConfigArgs {
            builtin: true,
            ..ConfigArgs::default()
        };
        assert!(back.apply(&mut config));
        assert_eq!(config.catalog, None);
    }
}
