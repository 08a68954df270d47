//! Command Execution
//!
//! Every command except `presets` runs through a [`SessionStore`]: load the
//! cabinet, trigger at most one action, print the resulting view.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use tracing::debug;

use cabinet_core::{
    ActionOutcome, AppType, CabinetApi, ColorScheme, FileClipboard, HttpApiClient, NewPreset, Phase,
    PresetFormat, PresetId, SessionStore, StoreView,
};

use crate::render::{describe_outcome, render, render_preset_list, render_protocols, render_with};
use crate::theme::Theme;

/// Cabinet commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show profile, protocols, SNI and presets
    Show,

    /// List available protocols
    Protocols,

    /// Switch the active VPN protocol
    Protocol {
        /// Protocol name, e.g. `vless`
        name: String,
    },

    /// Change the SNI of the active profile
    Sni {
        /// One of the profile's available SNIs
        value: String,
    },

    /// List presets straight from the backend
    Presets,

    /// Create, open or delete a connection preset
    #[command(subcommand)]
    Preset(PresetCommand),
}

/// Preset subcommands
#[derive(Subcommand, Debug)]
pub enum PresetCommand {
    /// Create a preset
    Create {
        /// Preset name
        #[arg(long, default_value = "My preset")]
        name: String,

        /// Client application
        #[arg(long, value_enum, default_value = "v2ray")]
        app: AppArg,

        /// Config format
        #[arg(long, value_enum, default_value = "vless_uri")]
        format: FormatArg,
    },

    /// Delete a preset
    Delete {
        /// Preset id
        id: i64,

        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a preset's config
    Open {
        /// Preset id
        id: i64,

        /// Also write the config to this file
        #[arg(long, value_name = "PATH")]
        copy_to: Option<PathBuf>,
    },
}

/// Client application accepted by `preset create --app`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AppArg {
    /// V2RayNG / Nekobox
    V2ray,
    /// Clash / Hiddify
    Clash,
}

impl From<AppArg> for AppType {
    fn from(arg: AppArg) -> Self {
        match arg {
            AppArg::V2ray => Self::V2ray,
            AppArg::Clash => Self::Clash,
        }
    }
}

/// Config format accepted by `preset create --format`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// A `vless://` share URI
    #[value(name = "vless_uri")]
    VlessUri,
}

impl From<FormatArg> for PresetFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::VlessUri => Self::VlessUri,
        }
    }
}

/// How results are printed
#[derive(Clone, Copy, Debug)]
pub struct Output {
    /// Print JSON instead of text
    pub json: bool,
    /// Host color scheme for text output, `None` for plain text
    pub color: Option<ColorScheme>,
}

impl Output {
    /// Colors only when allowed and stdout is a terminal
    pub fn new(json: bool, scheme: ColorScheme, no_color: bool, is_terminal: bool) -> Self {
        Self {
            json,
            color: (!no_color && is_terminal).then_some(scheme),
        }
    }

    fn theme(&self) -> Theme {
        self.color.map_or_else(Theme::plain, Theme::for_scheme)
    }
}

/// Run one command to completion
pub async fn run(command: Command, client: HttpApiClient, output: &Output) -> Result<ExitCode> {
    if let Command::Presets = command {
        let presets = client
            .list_presets()
            .await
            .context("Failed to list presets")?;
        if output.json {
            println!("{}", serde_json::to_string_pretty(&presets)?);
        } else {
            print!("{}", render_preset_list(&presets, &output.theme()));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let protocols_only = matches!(command, Command::Protocols);
    let store = SessionStore::new(client);

    store.load().await;
    if store.phase() != Phase::Ready {
        print_view(&store.view(), protocols_only, output)?;
        return Ok(ExitCode::FAILURE);
    }

    let outcome = match command {
        Command::Show | Command::Protocols | Command::Presets => ActionOutcome::Applied,
        Command::Protocol { name } => store.switch_protocol(&name).await,
        Command::Sni { value } => store.update_sni(&value).await,
        Command::Preset(PresetCommand::Create { name, app, format }) => {
            let draft = NewPreset::new(name)
                .with_app_type(app.into())
                .with_format(format.into());
            store.create_preset(&draft).await
        }
        Command::Preset(PresetCommand::Delete { id, yes }) => {
            let id = PresetId(id);
            let prompt = delete_prompt(&store.view(), id);
            if !yes && !confirm(&prompt, &mut io::stdin().lock(), &mut io::stderr())? {
                eprintln!("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }
            store.delete_preset(id).await
        }
        Command::Preset(PresetCommand::Open { id, copy_to }) => {
            let outcome = store.open_preset(PresetId(id)).await;
            match copy_to {
                Some(path) if outcome.is_applied() => {
                    debug!(path = %path.display(), "Copying preset config");
                    store.copy_preview(&FileClipboard::new(path)).await
                }
                _ => outcome,
            }
        }
    };

    if let Some(note) = describe_outcome(&outcome) {
        eprintln!("{note}");
    }
    print_view(&store.view(), protocols_only, output)?;

    Ok(if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_view(view: &StoreView, protocols_only: bool, output: &Output) -> Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else if protocols_only && view.phase == Phase::Ready {
        print!("{}", render_protocols(view, &output.theme()));
    } else if let Some(scheme) = output.color {
        print!("{}", render(view, scheme));
    } else {
        print!("{}", render_with(view, &Theme::plain()));
    }
    Ok(())
}

/// Confirmation question for deleting `id`
fn delete_prompt(view: &StoreView, id: PresetId) -> String {
    view.session
        .as_ref()
        .and_then(|s| s.preset(id))
        .map_or_else(
            || format!("Delete preset #{id}?"),
            |p| format!("Delete preset \"{}\" (#{id})?", p.name),
        )
}

/// Ask a yes/no question; anything but `y`/`yes` is a no
fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}
