//! CLI интерфейс для grantplan
//!
//! Предоставляет командную строку для построения и проверки планов грантов

use crate::catalog::Project;
use crate::common::EngineConfig;
use crate::engine::GrantEngine;
use crate::synthesizer::{JsonSynthesizer, SynthesisInput, Synthesizer};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Файл конфигурации, который ищется в текущей директории
const DEFAULT_CONFIG_FILE: &str = "grantplan.toml";

/// grantplan - планирование грантов по матрице доступа
#[derive(Parser)]
#[command(name = "grantplan")]
#[command(about = "Resolves a declarative access matrix into an ordered grant plan")]
#[command(version)]
pub struct Cli {
    /// Конфигурационный файл
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Уровень детализации логирования
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Построить план грантов
    Plan {
        /// JSON файл проекта
        #[arg(short, long)]
        project: PathBuf,

        /// Только одно окружение
        #[arg(short, long)]
        environment: Option<String>,

        /// Файл для результата (по умолчанию stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Проверить проект без вывода плана
    Check {
        /// JSON файл проекта
        #[arg(short, long)]
        project: PathBuf,
    },

    /// Управление конфигурацией
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Показать информацию о системе
    Info,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Показать итоговую конфигурацию
    Show,

    /// Записать конфигурацию по умолчанию
    Init {
        /// Путь к файлу
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Перезаписать существующий файл
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }

    /// Загружает конфигурацию: файл, затем переменные окружения, затем флаги
    pub fn load_config(&self) -> Result<EngineConfig> {
        let config = match &self.config {
            Some(path) => EngineConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                EngineConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => EngineConfig::default(),
        };

        let mut config = config.merge(EngineConfig::from_env()?);
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Выполняет команду
    pub fn execute(&self, config: &EngineConfig) -> Result<()> {
        match &self.command {
            Some(Commands::Plan {
                project,
                environment,
                output,
            }) => self.plan(config, project, environment.as_deref(), output.as_deref()),
            Some(Commands::Check { project }) => self.check(config, project),
            Some(Commands::Config { action }) => self.handle_config_command(config, action),
            Some(Commands::Info) => self.show_info(config),
            None => {
                println!("grantplan {}", crate::VERSION);
                println!("Use --help for usage");
                Ok(())
            }
        }
    }

    fn plan(
        &self,
        config: &EngineConfig,
        project: &Path,
        environment: Option<&str>,
        output: Option<&Path>,
    ) -> Result<()> {
        let project = load_project(project)?;
        let engine = GrantEngine::new(config.clone())?;

        let inputs: Vec<SynthesisInput> = match environment {
            Some(name) => {
                let plan = engine.plan_environment(&project, name)?;
                report_issues(plan.issues.iter());
                vec![engine.synthesis_input(&plan)]
            }
            None => {
                let plan = engine.plan(&project)?;
                report_issues(plan.all_issues());
                plan.environments
                    .iter()
                    .map(|plan| engine.synthesis_input(plan))
                    .collect()
            }
        };

        let synthesizer = JsonSynthesizer::pretty();
        let mut rendered = Vec::with_capacity(inputs.len());
        for input in &inputs {
            rendered.push(synthesizer.synthesize(input)?);
        }
        let text = if rendered.len() == 1 {
            rendered.remove(0)
        } else {
            format!("[\n{}\n]", rendered.join(",\n"))
        };

        match output {
            Some(path) => {
                std::fs::write(path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                log::info!("План записан в {}", path.display());
            }
            None => println!("{}", text),
        }

        Ok(())
    }

    fn check(&self, config: &EngineConfig, project: &Path) -> Result<()> {
        let project = load_project(project)?;
        let engine = GrantEngine::new(config.clone())?;
        let plan = engine.plan(&project)?;

        let issues = plan.all_issues().count();
        report_issues(plan.all_issues());
        for environment in &plan.environments {
            println!(
                "{}: {} grants in {} waves",
                environment.environment,
                environment.grants.len(),
                environment.wave_count()
            );
        }

        if issues > 0 {
            bail!("{} access cell issue(s) found", issues);
        }
        Ok(())
    }

    fn handle_config_command(&self, config: &EngineConfig, action: &ConfigCommands) -> Result<()> {
        match action {
            ConfigCommands::Show => {
                print!("{}", toml::to_string_pretty(config)?);
            }
            ConfigCommands::Init { path, force } => {
                if path.exists() && !force {
                    bail!("{} already exists (use --force to overwrite)", path.display());
                }
                EngineConfig::default().to_file(path)?;
                println!("Wrote {}", path.display());
            }
        }
        Ok(())
    }

    fn show_info(&self, config: &EngineConfig) -> Result<()> {
        println!("grantplan {}", crate::VERSION);
        println!("Version pin: {}", config.version_pin);
        println!("Parent grant policy: {}", config.parent_grant_policy);
        println!(
            "Shares-excluded kinds: {}",
            config
                .shares_excluded_kinds
                .iter()
                .map(|kind| kind.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("OS: {}", std::env::consts::OS);
        println!("Arch: {}", std::env::consts::ARCH);
        Ok(())
    }
}

fn load_project(path: &Path) -> Result<Project> {
    Project::from_file(path).with_context(|| format!("failed to load project {}", path.display()))
}

fn report_issues<'a>(issues: impl Iterator<Item = &'a crate::common::CellError>) {
    for issue in issues {
        eprintln!("warning: {}", issue);
    }
}
