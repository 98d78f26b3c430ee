use crate::cli::actions::Action;
use crate::wgsltoy::new;
use anyhow::Result;
use tracing::info;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, dsn, secret } => {
            let mut redacted = Url::parse(&dsn)?;

            if redacted.password().is_some() {
                let _ = redacted.set_password(Some("redacted"));
            }

            info!("Starting server, database: {redacted}");

            new(port, dsn, secret).await?;
        }
    }

    Ok(())
}
