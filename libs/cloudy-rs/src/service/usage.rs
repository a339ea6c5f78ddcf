use crate::Cloudy;
use crate::model::api::GetStatsRequest;
use crate::model::errors::CloudResult;
use crate::model::usage::{StorageStats, UsageMetrics};

impl Cloudy {
    /// Storage accounting, served through the stats cache slot (a shorter
    /// freshness window than listings, since every mutation moves it).
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_usage(&self, force: bool) -> CloudResult<UsageMetrics> {
        let token = self.bearer().await?;
        let client = self.client.clone();

        let stats: StorageStats = self
            .caches
            .stats
            .get_or_fetch(force, move || async move {
                Ok(client.request(Some(&token), GetStatsRequest {}).await?)
            })
            .await?;

        Ok(stats.into())
    }
}
