use crate::config::Settings;

pub struct DefaultConfig;

impl DefaultConfig {
    pub fn create_default_config_file() -> String {
        r#"# Environment variables OPENAI_API_KEY, PORT, OPENAI_BASE_URL, OPENAI_MODEL
# and PITSTOP_REFERENCE override the values below.

[server]
host = "0.0.0.0"
port = 5000

[upstream]
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
# api_key = "sk-..."

[reference]
# Optional notes (known faults, labour rates, part prices) appended to the
# system instruction. A missing file is ignored.
path = "extra_context.txt"
"#
        .to_string()
    }

    pub fn get_default_settings() -> Settings {
        Settings::default()
    }
}
