use anyhow::Result;
use story2prompts::backend::create_backend;
use story2prompts::clipboard::ClipboardChain;
use story2prompts::config::Config;
use story2prompts::session;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            eprintln!("Please ensure 'config.yml' exists with valid API settings.");
            return Err(e);
        }
    };

    // Missing sipId is a precondition failure, not a request failure:
    // bail out before anything touches the network.
    let sip_id = std::env::args().nth(1).filter(|s| !s.trim().is_empty());
    let Some(sip_id) = sip_id else {
        eprintln!("Missing sipId");
        eprintln!("Usage: story2prompts <SIP_ID>");
        std::process::exit(2);
    };

    let backend = create_backend(&config)?;
    let clipboard = ClipboardChain::system();

    session::run(&sip_id, backend, clipboard).await
}
