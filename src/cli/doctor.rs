// src/cli/doctor.rs — Backend connectivity check

use std::time::Duration;

use crate::chat::HttpChatBackend;
use crate::infra::config::Config;

pub async fn run_doctor(config: &Config) -> anyhow::Result<()> {
    let base_url = config.backend.resolved_base_url();
    let backend = HttpChatBackend::new(
        base_url.clone(),
        Duration::from_secs(config.backend.timeout_seconds),
    );

    {
        use std::io::Write;
        print!("checking {base_url}/api/health ... ");
        std::io::stdout().flush().ok();
    }
    match backend.health().await {
        Ok(()) => {
            println!("ok");
            Ok(())
        }
        Err(e) => {
            println!("failed");
            Err(anyhow::anyhow!("backend health check failed: {e}"))
        }
    }
}
