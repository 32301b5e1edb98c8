//! rstechlens command line: detect a site's stack, then ask the model about it
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rstechlens::config::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MODEL, DEFAULT_SECRETS_PATH,
};
use rstechlens::{
    ConfigManager, GeminiClient, GlobalConfig, IconTable, KnowledgeBaseLoader, ReportRenderer,
    Secrets, Summarizer, TechDetector, TextGenerator,
};

const EXIT_SUCCESS: u8 = 0;
// Exit code for a page that could not be fetched
const EXIT_FETCH_FAILED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "rstechlens", version, about = "Detect a website's technology stack and get an AI analysis of it")]
struct Cli {
    /// Website URL to analyze
    url: String,

    /// Knowledge base JSON file ({"category": {"keyword": "Technology"}}); built-in if omitted
    #[arg(short = 'k', long, value_name = "FILE")]
    knowledge_base: Option<PathBuf>,

    /// Secrets file holding [api_keys].GEMINI_API_KEY
    #[arg(long, value_name = "FILE", default_value = DEFAULT_SECRETS_PATH)]
    secrets: PathBuf,

    /// Page fetch timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    timeout: u64,

    /// Text-generation model
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Text-generation API base URL
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Only detect; skip the AI analysis (no credential needed)
    #[arg(long)]
    no_ai: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Save the AI analysis as a text file
    #[arg(short = 'o', long, value_name = "FILE", num_args = 0..=1, default_missing_value = "analysis.txt")]
    save: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "rstechlens=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    // 1. Configuration
    let mut builder = ConfigManager::custom()
        .secrets_path(&cli.secrets)
        .http_timeout(cli.timeout)
        .model(&cli.model)
        .api_base_url(&cli.api_base_url);
    if let Some(path) = &cli.knowledge_base {
        builder = builder.knowledge_base_file(path);
    }
    let config = builder.build();

    // 2. Startup-fatal loading: knowledge base, then credential
    let kb = KnowledgeBaseLoader::load(&config)
        .await
        .context("cannot start without a valid knowledge base")?;
    let generator = load_generator(&cli, &config).await?;
    let detector = TechDetector::with_knowledge_base(Arc::new(kb), config)?;

    execute(&cli, &detector, generator, &mut std::io::stdout()).await
}

/// The text generator for this run, or `None` with `--no-ai` (no credential is read then)
async fn load_generator(cli: &Cli, config: &GlobalConfig) -> anyhow::Result<Option<Arc<dyn TextGenerator>>> {
    if cli.no_ai {
        if cli.save.is_some() {
            warn!("--save has no effect together with --no-ai");
        }
        return Ok(None);
    }
    let secrets = Secrets::load(&config.secrets_path)
        .await
        .context("cannot start without an API credential (pass --no-ai to only detect)")?;
    Ok(Some(Arc::new(GeminiClient::from_config(config, &secrets))))
}

/// Detect, analyze once, print to `out` and optionally save. Returns the exit code.
async fn execute(
    cli: &Cli,
    detector: &TechDetector,
    generator: Option<Arc<dyn TextGenerator>>,
    out: &mut dyn Write,
) -> anyhow::Result<u8> {
    let icons = IconTable::builtin();
    let renderer = ReportRenderer::new(&icons);

    // 1. Detect; a fetch failure stops here
    let detection = match detector.detect(&cli.url).await {
        Ok(detection) => detection,
        Err(e) => {
            error!("Fetch failed: {}", e);
            eprintln!("error: could not fetch {}: {}", e.url(), e);
            return Ok(EXIT_FETCH_FAILED);
        }
    };
    if !cli.json {
        write!(out, "{}", renderer.render_detection(&cli.url, &detection))?;
    }

    // 2. Analyze once; display and save share the same text
    let summarizer = generator.map(Summarizer::new);
    let session = summarizer.as_ref().map(|s| s.session(&detection, &cli.url));
    let analysis = match &session {
        Some(session) => Some(session.analysis().await.context("AI analysis failed")?),
        None => None,
    };

    if cli.json {
        let output = json!({
            "url": cli.url,
            "detected": detection,
            "analysis": analysis.map(|a| a.as_str()),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else if let Some(analysis) = analysis {
        write!(out, "\n{}", renderer.render_analysis(analysis))?;
    }

    // 3. Save
    if let (Some(path), Some(analysis)) = (&cli.save, analysis) {
        tokio::fs::write(path, analysis.as_str())
            .await
            .with_context(|| format!("failed to save analysis to {}", path.display()))?;
        info!("Analysis saved to {}", path.display());
        eprintln!("Analysis saved to {}", path.display());
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use clap::CommandFactory;
    use reqwest::Client;
    use rstechlens::{AnalysisText, PageFetcher, TlResult};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ANALYSIS: &str = "A React storefront.\n\nChosen for its component model.";

    struct CountingGenerator {
        calls: AtomicUsize,
    }

    impl CountingGenerator {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, _prompt: &str) -> TlResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ANALYSIS.to_string())
        }
    }

    fn detector() -> TechDetector {
        let kb = KnowledgeBaseLoader::from_json_str(r#"{"frontend": {"react": "React"}}"#).unwrap();
        let timeout = Duration::from_secs(5);
        let client = Client::builder().no_proxy().timeout(timeout).build().unwrap();
        TechDetector::with_fetcher(
            Arc::new(kb),
            PageFetcher::with_client(client, timeout),
            GlobalConfig::default(),
        )
    }

    async fn react_page() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<script src="/react.js"></script>"#))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rstechlens").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults_and_save_flag() {
        let cli = Cli::try_parse_from(["rstechlens", "https://example.com", "--save"]).unwrap();
        assert_eq!(cli.url, "https://example.com");
        assert_eq!(cli.timeout, 10);
        assert_eq!(cli.model, "gemini-2.5-flash");
        assert_eq!(cli.save, Some(PathBuf::from("analysis.txt")));
        assert!(!cli.no_ai);

        let cli = Cli::try_parse_from(["rstechlens", "https://a.test", "--no-ai", "-o", "out.txt", "-t", "3"]).unwrap();
        assert!(cli.no_ai);
        assert_eq!(cli.save, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.timeout, 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_exits_without_analysis() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let generator = CountingGenerator::new();
        let url = format!("http://{}/", addr);
        let cli = parse(&[url.as_str()]);
        let mut out = Vec::new();

        let code = execute(&cli, &detector(), Some(generator.clone()), &mut out).await.unwrap();
        assert_eq!(code, EXIT_FETCH_FAILED);
        assert_eq!(generator.calls(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_no_ai_needs_no_credential() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let server = react_page().await;
        let uri = server.uri();
        let cli = parse(&[uri.as_str(), "--no-ai", "--secrets", missing.to_str().unwrap()]);
        let config = ConfigManager::custom().secrets_path(&cli.secrets).build();

        let generator = load_generator(&cli, &config).await.unwrap();
        assert!(generator.is_none());

        let mut out = Vec::new();
        let code = execute(&cli, &detector(), generator, &mut out).await.unwrap();
        assert_eq!(code, EXIT_SUCCESS);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("React"));
        assert!(!printed.contains("AI analysis"));
    }

    #[tokio::test]
    async fn test_saved_analysis_is_the_displayed_one() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("analysis.txt");
        let server = react_page().await;
        let uri = server.uri();
        let cli = parse(&[uri.as_str(), "--save", saved.to_str().unwrap()]);
        let generator = CountingGenerator::new();
        let mut out = Vec::new();

        let code = execute(&cli, &detector(), Some(generator.clone()), &mut out).await.unwrap();
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(generator.calls(), 1);

        let icons = IconTable::builtin();
        let displayed = ReportRenderer::new(&icons).render_analysis(&AnalysisText::new(ANALYSIS));
        assert!(String::from_utf8(out).unwrap().ends_with(&displayed));
        assert_eq!(std::fs::read_to_string(&saved).unwrap(), ANALYSIS);
    }

    #[tokio::test]
    async fn test_json_output_carries_detection_and_analysis() {
        let server = react_page().await;
        let uri = server.uri();
        let cli = parse(&[uri.as_str(), "--json"]);
        let generator = CountingGenerator::new();
        let mut out = Vec::new();

        execute(&cli, &detector(), Some(generator.clone()), &mut out).await.unwrap();
        let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["detected"], json!({"frontend": ["React"]}));
        assert_eq!(printed["analysis"], ANALYSIS);
        assert_eq!(generator.calls(), 1);
    }
}
