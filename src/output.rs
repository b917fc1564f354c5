use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `CAMPAIGN_IMPORT_QUIET=1` (or `true`) suppresses human-facing output
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("CAMPAIGN_IMPORT_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// How the final report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "human" => Ok(OutputMode::Human),
            "json" => Ok(OutputMode::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}
