use std::path::Path;

use error_stack::ResultExt;
use google_sheets4::oauth2::{self, authenticator::Authenticator};
use google_sheets4::{hyper, hyper_rustls};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Could not read the OAuth client secret file")]
    ReadSecret,
    #[error("Could not create an authenticator")]
    BuildAuthenticator,
}

/// Installed-flow authenticator with tokens cached on disk. A missing or
/// stale token cache triggers the interactive browser flow; later runs reuse
/// the persisted tokens without user interaction.
pub async fn auth(
    credentials_file: &Path,
    token_cache_file: &Path,
    client: hyper::Client<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>,
) -> error_stack::Result<
    Authenticator<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>,
    AuthError,
> {
    let secret: oauth2::ApplicationSecret = oauth2::read_application_secret(credentials_file)
        .await
        .change_context(AuthError::ReadSecret)
        .attach_printable_lazy(|| {
            format!(
                "provide a valid OAuth client secret at '{}' to enable spreadsheet access",
                credentials_file.display()
            )
        })?;

    oauth2::InstalledFlowAuthenticator::with_client(
        secret,
        oauth2::InstalledFlowReturnMethod::HTTPRedirect,
        client,
    )
    .persist_tokens_to_disk(token_cache_file)
    .build()
    .await
    .change_context(AuthError::BuildAuthenticator)
}
