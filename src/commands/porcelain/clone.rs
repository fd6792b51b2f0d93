use crate::areas::repository::Repository;
use crate::artifacts::checkout::materializer::{MaterializeStats, Materializer};
use crate::artifacts::core::config::FetchConfig;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::pack::decoder::PackDecoder;
use crate::artifacts::protocol::client::RemoteClient;
use anyhow::Context;

impl Repository {
    /// Fetch everything `url` advertises and check out its head commit here
    ///
    /// The target must be empty. A failed clone removes whatever it wrote.
    pub async fn clone_remote(&mut self, url: &str, config: &FetchConfig) -> anyhow::Result<()> {
        if !self.workspace().is_empty()? {
            anyhow::bail!(
                "destination path {} already exists and is not an empty directory",
                self.path().display()
            );
        }

        let (head, objects, stats) = match self.fetch_and_checkout(url, config).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(path = %self.path().display(), "removing partial clone");
                if let Err(cleanup) = self.workspace().clear() {
                    tracing::warn!(error = %cleanup, "failed to remove partial clone");
                }
                return Err(e);
            }
        };

        tracing::info!(
            %head,
            files = stats.files,
            directories = stats.directories,
            skipped = stats.skipped,
            "checkout complete"
        );
        writeln!(
            self.writer(),
            "Cloned {url} into {} ({objects} objects, {} files)",
            self.path().display(),
            stats.files
        )?;

        Ok(())
    }

    async fn fetch_and_checkout(
        &self,
        url: &str,
        config: &FetchConfig,
    ) -> anyhow::Result<(ObjectId, usize, MaterializeStats)> {
        self.create_git_dir()?;

        let client = RemoteClient::new(url, config)?;

        tracing::info!(url = client.url(), "discovering refs");
        let wants = client
            .discover_refs()
            .await
            .with_context(|| format!("failed to discover refs at {url}"))?;
        let head = *wants.first().context("remote advertised no refs")?;

        tracing::info!(wants = wants.len(), "requesting packfile");
        let pack = client
            .request_packfile(&wants)
            .await
            .with_context(|| format!("failed to fetch packfile from {url}"))?;

        tracing::info!(bytes = pack.len(), "decoding packfile");
        let graph = PackDecoder::with_store(self.database())
            .decode(&pack)
            .context("failed to decode packfile")?;

        tracing::info!(%head, "checking out head commit");
        let stats = Materializer::new(&graph, config.max_tree_depth)
            .materialize(&head, self.workspace())
            .with_context(|| format!("failed to check out {head}"))?;
        self.refs().update_head(&head)?;

        Ok((head, graph.len(), stats))
    }
}
