use anyhow::{bail, Context, Result};
use axum::http::StatusCode;
use log::{debug, info};
use std::fs;
use std::sync::Arc;

use crate::ai::{CompletionBackend, OpenAiClient, PromptBuilder, SystemInstruction};
use crate::cli::{Commands, OutputFormatter, Spinner};
use crate::config::{DefaultConfig, Settings};
use crate::context::ReferenceStore;
use crate::server::{self, Gateway};

pub struct CommandHandler {
    settings: Settings,
    reference: ReferenceStore,
    formatter: OutputFormatter,
}

impl CommandHandler {
    pub fn new(settings: Settings, use_colors: bool) -> Self {
        let reference = ReferenceStore::new(settings.reference.path.clone());
        let formatter = OutputFormatter::new(use_colors);

        Self {
            settings,
            reference,
            formatter,
        }
    }

    pub async fn handle_command(&mut self, command: Commands) -> Result<String> {
        match command {
            Commands::Serve { host, port } => self.handle_serve(host, port).await,
            Commands::Ask { message } => self.handle_ask(&message).await,
            Commands::Prompt => Ok(self.system_instruction().to_string()),
            Commands::Config => self.handle_config(),
            Commands::Init => self.handle_init(),
            Commands::Doctor => self.handle_doctor().await,
            Commands::Version => Ok(version_info()),
        }
    }

    /// Reference context is read once here; the result is immutable afterwards.
    fn system_instruction(&self) -> SystemInstruction {
        let reference = self.reference.load();
        PromptBuilder::new().build_system_instruction(&reference)
    }

    fn build_gateway(&self) -> Result<Gateway> {
        let client = OpenAiClient::new(&self.settings)?;
        let backend: Arc<dyn CompletionBackend> = Arc::new(client);
        Ok(Gateway::new(self.system_instruction(), backend))
    }

    async fn handle_serve(&mut self, host: Option<String>, port: Option<u16>) -> Result<String> {
        if let Some(host) = host {
            self.settings.server.host = host;
        }
        if let Some(port) = port {
            self.settings.server.port = port;
        }

        let gateway = Arc::new(self.build_gateway()?);
        info!(
            "System instruction ready ({} chars, reference {})",
            gateway.instruction().len(),
            self.reference.path().display()
        );

        server::serve(&self.settings.server.host, self.settings.server.port, gateway).await?;
        Ok(String::new())
    }

    async fn handle_ask(&self, message: &str) -> Result<String> {
        let gateway = self.build_gateway()?;

        let spinner = Spinner::new("Asking the repair assistant...");
        let (status, response) = gateway.ask(message).await;
        spinner.stop();

        debug!("Ask finished with status {status}");
        if status == StatusCode::BAD_REQUEST {
            bail!("{}", response.text());
        }

        Ok(self.formatter.format_response(&response))
    }

    fn handle_config(&self) -> Result<String> {
        Ok(format!(
            "{}\n\
            - Config file: {}\n\
            - Listen address: {}:{}\n\
            - Completion service: {}\n\
            - Model: {}\n\
            - API key: {}\n\
            - Reference file: {}",
            self.formatter.format_heading("Pitstop Configuration:"),
            self.settings.get_config_path()?.display(),
            self.settings.server.host,
            self.settings.server.port,
            self.settings.upstream.base_url,
            self.settings.upstream.model,
            self.settings.masked_api_key(),
            self.reference.path().display(),
        ))
    }

    fn handle_init(&self) -> Result<String> {
        let config_path = self.settings.get_config_path()?;

        if config_path.exists() {
            return Ok(self.formatter.format_info(&format!(
                "Config already exists at {}",
                config_path.display()
            )));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&config_path, DefaultConfig::create_default_config_file())
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        Ok(self
            .formatter
            .format_success(&format!("Wrote {}", config_path.display())))
    }

    async fn handle_doctor(&self) -> Result<String> {
        let spinner = Spinner::new("Running diagnostics...");
        let mut diagnostics = Vec::new();

        let config_path = self.settings.get_config_path()?;
        diagnostics.push(self.formatter.format_check(
            config_path.exists(),
            &format!("Config file {}", config_path.display()),
        ));

        let has_key = self.settings.upstream.api_key.is_some();
        diagnostics.push(self.formatter.format_check(
            has_key,
            if has_key {
                "API key configured"
            } else {
                "API key missing (set OPENAI_API_KEY)"
            },
        ));

        let reference_path = self.reference.path().display().to_string();
        if self.reference.exists() {
            let reference = self.reference.load();
            diagnostics.push(self.formatter.format_check(
                true,
                &format!("Reference file {reference_path} ({} bytes)", reference.len()),
            ));
        } else {
            diagnostics.push(self.formatter.format_warning(&format!(
                "Reference file {reference_path} not found, answering without reference notes"
            )));
        }

        let client = OpenAiClient::new(&self.settings)?;
        match client.verify_connection().await {
            Ok(()) => diagnostics.push(
                self.formatter
                    .format_check(true, &format!("Completion service {}", client.base_url())),
            ),
            Err(e) => diagnostics.push(self.formatter.format_check(
                false,
                &format!("Completion service {}: {e}", client.base_url()),
            )),
        }

        spinner.stop();
        Ok(format!(
            "{}\n{}",
            self.formatter.format_heading("Pitstop Health Check:"),
            diagnostics.join("\n")
        ))
    }

    pub fn format_error(&self, message: &str) -> String {
        self.formatter.format_error(message)
    }
}

pub fn version_info() -> String {
    format!(
        "pitstop {}\nRust version: {}\nPlatform: {}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("PITSTOP_RUSTC_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
