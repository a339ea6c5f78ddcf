use serde::{Deserialize, Serialize};

/// Storage accounting as reported by the server. Cached client-side for a few
/// seconds, see the stats slot in [crate::service::cache].
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub used: u64,
    pub total: u64,
    #[serde(default)]
    pub files: u64,
}

impl StorageStats {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.used as f64 / self.total as f64) * 100.0
    }
}

#[derive(Serialize, Debug, PartialEq, Clone)]
pub struct UsageMetrics {
    pub server_usage: UsageItemMetric,
    pub data_cap: UsageItemMetric,
    pub file_count: u64,
}

#[derive(Serialize, PartialEq, Eq, Debug, Clone)]
pub struct UsageItemMetric {
    pub exact: u64,
    pub readable: String,
}

impl From<StorageStats> for UsageMetrics {
    fn from(stats: StorageStats) -> Self {
        UsageMetrics {
            server_usage: UsageItemMetric {
                exact: stats.used,
                readable: bytes_to_human(stats.used),
            },
            data_cap: UsageItemMetric { exact: stats.total, readable: bytes_to_human(stats.total) },
            file_count: stats.files,
        }
    }
}

pub fn bytes_to_human(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if value.fract() == 0.0 {
        format!("{} {}", value as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod unit_tests {
    use crate::model::usage::{StorageStats, bytes_to_human};

    #[test]
    fn bytes_to_human_kb() {
        assert_eq!(bytes_to_human(2000), "2 KB".to_string());
    }

    #[test]
    fn bytes_to_human_mb() {
        assert_eq!(bytes_to_human(2000000), "2 MB".to_string());
    }

    #[test]
    fn bytes_to_human_gb() {
        assert_eq!(bytes_to_human(2000000000), "2 GB".to_string());
    }

    #[test]
    fn bytes_to_human_fractional() {
        assert_eq!(bytes_to_human(2500), "2.5 KB".to_string());
        assert_eq!(bytes_to_human(999), "999 B".to_string());
    }

    #[test]
    fn percentage() {
        let stats = StorageStats { used: 1, total: 4, files: 0 };
        assert!((stats.percentage() - 25.0).abs() < f64::EPSILON);

        let empty = StorageStats { used: 0, total: 0, files: 0 };
        assert_eq!(empty.percentage(), 0.0);
    }
}
