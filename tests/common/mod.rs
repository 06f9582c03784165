//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::Path;
use tempfile::TempDir;
use tokio::net::TcpListener;

use proxy_admin::config::AdminServiceConfig;
use proxy_admin::{HttpServer, Shutdown};

/// A running admin server over a temporary config root.
pub struct TestServer {
    pub addr: SocketAddr,
    pub root: TempDir,
    shutdown: Shutdown,
}

impl TestServer {
    /// Start a server over a seeded root; `configure` tweaks the config first.
    pub async fn start(configure: impl FnOnce(&mut AdminServiceConfig)) -> Self {
        let root = tempfile::tempdir().unwrap();
        seed_fixture(root.path());

        let mut config = AdminServiceConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.sites.root = root.path().to_path_buf();
        config.reload.program = "true".to_string();
        config.reload.args = Vec::new();
        configure(&mut config);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server = HttpServer::new(config);
        let server_shutdown = shutdown.subscribe();

        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        Self {
            addr,
            root,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// `00-upstream.conf` at the root and `locations/static.conf` below it.
pub fn seed_fixture(root: &Path) {
    std::fs::write(root.join("00-upstream.conf"), "upstream {}").unwrap();
    std::fs::create_dir(root.join("locations")).unwrap();
    std::fs::write(root.join("locations/static.conf"), "location /static {}").unwrap();
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Configure the reload command as `sh -c <script>`.
#[allow(dead_code)]
pub fn reload_script(config: &mut AdminServiceConfig, script: &str) {
    config.reload.program = "sh".to_string();
    config.reload.args = vec!["-c".to_string(), script.to_string()];
}
