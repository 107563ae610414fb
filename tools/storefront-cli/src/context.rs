//! Everything a command needs: resolved config, output and working directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use turbo_data::{FetchClient, ReqwestTransport};
use turbo_storefront::cart::CartClient;
use turbo_storefront::StorefrontConfig;

use crate::output::Output;

/// File names probed in each directory, first match wins.
const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

pub struct Context {
    pub config: StorefrontConfig,
    /// `None` when running on built-in defaults.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
}

impl Context {
    /// Use `explicit` if given (and fail if it cannot be read), otherwise
    /// search from the cwd towards the filesystem root.
    pub fn load(explicit: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let found = match explicit {
            Some(path) => {
                let path = PathBuf::from(path);
                Some((StorefrontConfig::load(&path)?, path))
            }
            None => Self::find_config(&cwd),
        };
        let (config, config_path) = match found {
            Some((config, path)) => {
                output.debug(&format!("Using config {}", path.display()));
                (config, Some(path))
            }
            None => (StorefrontConfig::default(), None),
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    fn find_config(start: &Path) -> Option<(StorefrontConfig, PathBuf)> {
        start
            .ancestors()
            .flat_map(|dir| CONFIG_NAMES.iter().map(move |name| dir.join(name)))
            .filter(|candidate| candidate.is_file())
            .find_map(|candidate| match StorefrontConfig::load(&candidate) {
                Ok(config) => Some((config, candidate)),
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "skipping unreadable config");
                    None
                }
            })
    }

    /// HTTP client for the configured cart API. A `base_url` override takes
    /// precedence over the config file.
    pub fn http(&self, base_url: Option<&str>) -> Result<FetchClient> {
        let transport = ReqwestTransport::with_timeout(self.config.api.timeout())
            .context("Failed to build HTTP client")?;
        let client = FetchClient::from_shared(Arc::new(transport));
        Ok(match base_url {
            Some(url) => client.with_base_url(url),
            None => client.with_base_url(self.config.api.base_url.clone()),
        })
    }

    /// Cart client honouring the same `base_url` override as [`Context::http`].
    pub fn cart_client(&self, base_url: Option<&str>) -> Result<CartClient> {
        let mut api = self.config.api.clone();
        if let Some(url) = base_url {
            api.base_url = url.to_string();
        }
        Ok(CartClient::new(self.http(None)?, &api))
    }

    pub fn resolve_path(&self, path: &str) -> PathBuf {
        self.cwd.join(path)
    }
}
