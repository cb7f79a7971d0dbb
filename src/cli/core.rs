//! Shell context, dispatch, and error reporting.

use std::{io, sync::Arc, time::Duration};

use bizbalance_config::{Config, ConfigError, ConfigManager};
use bizbalance_core::{CoreError, InsightError};
use bizbalance_insight::{api_key_from_env, GeminiProvider, GeminiSettings};
use bizbalance_storage_json::{JsonStateStorage, StoragePaths};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use strsim::levenshtein;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cli::{
        commands,
        output::{self, OutputPreferences},
        registry::{CommandEntry, CommandRegistry},
    },
    core::DashboardManager,
    currency::CurrencyFormat,
    errors::AppError,
    utils::app_data_dir,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Fatal shell failures; these end the session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::App(AppError::Config(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::App(AppError::Core(err))
    }
}

impl From<InsightError> for CliError {
    fn from(err: InsightError) -> Self {
        CliError::App(AppError::Insight(err))
    }
}

/// Recoverable command failures; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Insight(#[from] InsightError),
    #[error(transparent)]
    App(#[from] AppError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub dashboard: DashboardManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub currency: CurrencyFormat,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let base = app_data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "configuration unreadable, using defaults");
                Config::default()
            }
        };
        apply_output_preferences(&config, mode);

        let data_root = config.resolve_data_root(&base);
        let storage = JsonStateStorage::new(StoragePaths::under(&data_root))?;
        let settings = GeminiSettings::new(api_key_from_env(), config.insight_model.clone())
            .with_endpoint(config.insight_endpoint.clone())
            .with_timeout(Duration::from_secs(config.insight_timeout_secs));
        let provider = GeminiProvider::new(settings)?;
        let dashboard =
            DashboardManager::open(Box::new(storage), config.default_formula, Arc::new(provider));
        info!(data_root = %data_root.display(), mode = ?mode, "shell started");

        Ok(Self {
            mode,
            registry,
            dashboard,
            currency: CurrencyFormat::new(&config.currency, &config.locale),
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        let pending = if self.dashboard.insight().is_pending() {
            "*"
        } else {
            ""
        };
        format!("bizbalance[{}{}]> ", self.dashboard.mode(), pending)
    }

    /// Every accepted spelling paired with the canonical command it runs.
    pub(crate) fn command_spellings(&self) -> Vec<(&'static str, &'static str)> {
        self.registry
            .names()
            .filter_map(|name| self.registry.get(name).map(|entry| (name, entry.name)))
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Announces an insight that finished in the background.
    pub(crate) fn poll_background(&mut self) {
        if self.dashboard.poll_insight() {
            output::success("Insight ready. Run `insight show` to read it.");
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(CommandError::from)
    }

    /// Shows a warning and, in an interactive session, holds until it is dismissed.
    pub(crate) fn acknowledge(&self, message: impl std::fmt::Display) -> CommandResult {
        output::warning(message);
        if let Some(prompt) = acknowledge_prompt(self.mode) {
            Input::<String>::with_theme(&self.theme)
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;
        }
        Ok(())
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    /// Re-derives output and currency settings after the config changed.
    pub(crate) fn apply_config(&mut self) {
        apply_output_preferences(&self.config, self.mode);
        self.currency = CurrencyFormat::new(&self.config.currency, &self.config.locale);
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        self.currency.format(amount)
    }
}

fn acknowledge_prompt(mode: CliMode) -> Option<&'static str> {
    match mode {
        CliMode::Interactive => Some("Press Enter to continue"),
        CliMode::Script => None,
    }
}

fn apply_output_preferences(config: &Config, mode: CliMode) {
    output::set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
    });
}
