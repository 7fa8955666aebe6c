//! Data models returned by the NZBGet JSON-RPC API.
//!
//! Field names on the wire are case-sensitive and mostly PascalCase, with a
//! few irregular spellings (`NZBID`, `UrlStatus`, `URL`) renamed explicitly.
//!
//! Sizes above 4 GiB are reported as two 32-bit halves (`*SizeLo` and
//! `*SizeHi`) plus a precomputed megabyte figure (`*SizeMB`). The halves are
//! kept as separate fields; [`combine_size`] joins them when a byte-exact
//! value is needed.
//!
//! Every record decodes leniently: a field the server does not send takes its
//! default, so older and newer server versions both decode. A field with the
//! wrong JSON type is still an error.

use serde::{Deserialize, Serialize};

use crate::status::{
    DeleteStatus, DupeMode, ExParStatus, GroupStatus, LogKind, MarkStatus, MoveStatus, ParStatus,
    ScriptStatus, UnpackStatus, UrlStatus,
};
use crate::time::Timestamp;

/// Join a low/high 32-bit pair into a 64-bit byte count.
///
/// Only the low 32 bits of each half are used.
pub fn combine_size(lo: i64, hi: i64) -> u64 {
    ((hi as u64 & 0xFFFF_FFFF) << 32) | (lo as u64 & 0xFFFF_FFFF)
}

/// A single file inside a queued nzb, as returned by `listfiles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct File {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "NZBID")]
    pub nzb_id: i64,
    /// May include the full path if the client sent one when queueing.
    #[serde(rename = "NZBFilename")]
    pub nzb_filename: String,
    /// nzb name without path and extension.
    #[serde(rename = "NZBName")]
    pub nzb_name: String,
    pub subject: String,
    /// Parsed from the subject until the first article body is read.
    pub filename: String,
    pub filename_confirmed: bool,
    pub dest_dir: String,
    pub file_size_lo: i64,
    pub file_size_hi: i64,
    pub remaining_size_lo: i64,
    pub remaining_size_hi: i64,
    pub paused: bool,
    pub post_time: Timestamp,
    pub active_downloads: i64,
    /// 0..=1000; divide by 10 for a percentage.
    pub progress: i64,
}

impl File {
    pub fn file_size(&self) -> u64 {
        combine_size(self.file_size_lo, self.file_size_hi)
    }

    pub fn remaining_size(&self) -> u64 {
        combine_size(self.remaining_size_lo, self.remaining_size_hi)
    }
}

/// Name/value pair used for post-processing parameters and config options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The `[name, value]` tuple form some calls expect instead of an object.
    pub fn to_pair(&self) -> [&str; 2] {
        [self.name.as_str(), self.value.as_str()]
    }
}

/// Outcome of one post-processing script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PerScriptStatus {
    pub name: String,
    pub status: ScriptStatus,
}

/// Per-news-server article counts for one download.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServerStats {
    #[serde(rename = "ServerID")]
    pub server_id: i64,
    pub success_articles: i64,
    pub failed_articles: i64,
}

/// A download in the queue, as returned by `listgroups`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Group {
    #[serde(rename = "NZBID")]
    pub nzb_id: i64,
    pub remaining_size_lo: i64,
    pub remaining_size_hi: i64,
    #[serde(rename = "RemainingSizeMB")]
    pub remaining_size_mb: i64,
    pub paused_size_lo: i64,
    pub paused_size_hi: i64,
    #[serde(rename = "PausedSizeMB")]
    pub paused_size_mb: i64,
    pub remaining_file_count: i64,
    pub remaining_par_count: i64,
    pub max_priority: i64,
    pub active_downloads: i64,
    pub status: GroupStatus,
    #[serde(rename = "NZBName")]
    pub nzb_name: String,
    /// `NZB` or `URL`.
    pub kind: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "NZBFilename")]
    pub nzb_filename: String,
    pub dest_dir: String,
    pub final_dir: String,
    pub category: String,
    pub par_status: ParStatus,
    pub ex_par_status: ExParStatus,
    pub unpack_status: UnpackStatus,
    pub move_status: MoveStatus,
    pub script_status: ScriptStatus,
    pub delete_status: DeleteStatus,
    pub mark_status: MarkStatus,
    pub url_status: UrlStatus,
    pub file_size_lo: i64,
    pub file_size_hi: i64,
    #[serde(rename = "FileSizeMB")]
    pub file_size_mb: i64,
    pub file_count: i64,
    pub min_post_time: Timestamp,
    pub max_post_time: Timestamp,
    pub total_articles: i64,
    pub success_articles: i64,
    pub failed_articles: i64,
    /// Per-mille, 0..=1000.
    pub health: i64,
    pub critical_health: i64,
    pub dupe_score: i64,
    pub dupe_key: String,
    pub dupe_mode: DupeMode,
    pub downloaded_size_lo: i64,
    pub downloaded_size_hi: i64,
    #[serde(rename = "DownloadedSizeMB")]
    pub downloaded_size_mb: i64,
    pub download_time_sec: i64,
    pub post_total_time_sec: i64,
    pub par_time_sec: i64,
    pub repair_time_sec: i64,
    pub unpack_time_sec: i64,
    pub message_count: i64,
    pub extra_par_blocks: i64,
    pub parameters: Vec<Parameter>,
    pub script_statuses: Vec<PerScriptStatus>,
    pub server_stats: Vec<ServerStats>,
    pub post_info_text: String,
    /// Per-mille progress of the current post-processing stage.
    pub post_stage_progress: i64,
    pub post_stage_time_sec: i64,
}

impl Group {
    pub fn file_size(&self) -> u64 {
        combine_size(self.file_size_lo, self.file_size_hi)
    }

    pub fn remaining_size(&self) -> u64 {
        combine_size(self.remaining_size_lo, self.remaining_size_hi)
    }
}

/// A finished (or deleted) download, as returned by `history`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct History {
    #[serde(rename = "NZBID")]
    pub nzb_id: i64,
    pub name: String,
    pub remaining_file_count: i64,
    pub history_time: Timestamp,
    /// Combined verdict such as `SUCCESS/ALL` or `FAILURE/PAR`.
    pub status: String,
    #[serde(rename = "NZBName")]
    pub nzb_name: String,
    pub kind: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "NZBFilename")]
    pub nzb_filename: String,
    pub dest_dir: String,
    pub final_dir: String,
    pub category: String,
    pub par_status: ParStatus,
    pub ex_par_status: ExParStatus,
    pub unpack_status: UnpackStatus,
    pub move_status: MoveStatus,
    pub script_status: ScriptStatus,
    pub delete_status: DeleteStatus,
    pub mark_status: MarkStatus,
    pub url_status: UrlStatus,
    pub file_size_lo: i64,
    pub file_size_hi: i64,
    #[serde(rename = "FileSizeMB")]
    pub file_size_mb: i64,
    pub file_count: i64,
    pub min_post_time: Timestamp,
    pub max_post_time: Timestamp,
    pub total_articles: i64,
    pub success_articles: i64,
    pub failed_articles: i64,
    pub health: i64,
    pub critical_health: i64,
    pub dupe_score: i64,
    pub dupe_key: String,
    pub dupe_mode: DupeMode,
    pub downloaded_size_lo: i64,
    pub downloaded_size_hi: i64,
    #[serde(rename = "DownloadedSizeMB")]
    pub downloaded_size_mb: i64,
    pub download_time_sec: i64,
    pub post_total_time_sec: i64,
    pub par_time_sec: i64,
    pub repair_time_sec: i64,
    pub unpack_time_sec: i64,
    pub message_count: i64,
    pub extra_par_blocks: i64,
    pub retry_data: bool,
    pub parameters: Vec<Parameter>,
    pub script_statuses: Vec<PerScriptStatus>,
    pub server_stats: Vec<ServerStats>,
}

impl History {
    pub fn file_size(&self) -> u64 {
        combine_size(self.file_size_lo, self.file_size_hi)
    }
}

/// Activity flag for one configured news server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NewsServer {
    #[serde(rename = "ID")]
    pub id: i64,
    pub active: bool,
}

/// Server-wide snapshot returned by `status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Status {
    pub remaining_size_lo: i64,
    pub remaining_size_hi: i64,
    #[serde(rename = "RemainingSizeMB")]
    pub remaining_size_mb: i64,
    pub forced_size_lo: i64,
    pub forced_size_hi: i64,
    #[serde(rename = "ForcedSizeMB")]
    pub forced_size_mb: i64,
    pub downloaded_size_lo: i64,
    pub downloaded_size_hi: i64,
    #[serde(rename = "DownloadedSizeMB")]
    pub downloaded_size_mb: i64,
    pub month_size_lo: i64,
    pub month_size_hi: i64,
    #[serde(rename = "MonthSizeMB")]
    pub month_size_mb: i64,
    pub day_size_lo: i64,
    pub day_size_hi: i64,
    #[serde(rename = "DaySizeMB")]
    pub day_size_mb: i64,
    pub article_cache_lo: i64,
    pub article_cache_hi: i64,
    #[serde(rename = "ArticleCacheMB")]
    pub article_cache_mb: i64,
    /// Bytes per second.
    pub download_rate: i64,
    pub average_download_rate: i64,
    /// Bytes per second; 0 means unlimited.
    pub download_limit: i64,
    pub thread_count: i64,
    pub post_job_count: i64,
    pub url_count: i64,
    pub up_time_sec: i64,
    pub download_time_sec: i64,
    pub free_disk_space_lo: i64,
    pub free_disk_space_hi: i64,
    #[serde(rename = "FreeDiskSpaceMB")]
    pub free_disk_space_mb: i64,
    pub server_time: Timestamp,
    pub resume_time: Timestamp,
    pub queue_script_count: i64,
    pub feed_active: bool,
    pub download_paused: bool,
    pub server_stand_by: bool,
    pub post_paused: bool,
    pub scan_paused: bool,
    pub quota_reached: bool,
    pub news_servers: Vec<NewsServer>,
}

impl Status {
    pub fn remaining_size(&self) -> u64 {
        combine_size(self.remaining_size_lo, self.remaining_size_hi)
    }

    pub fn free_disk_space(&self) -> u64 {
        combine_size(self.free_disk_space_lo, self.free_disk_space_hi)
    }
}

/// One line of the server or per-download log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LogEntry {
    #[serde(rename = "ID")]
    pub id: i64,
    pub time: Timestamp,
    pub kind: LogKind,
    pub text: String,
}

/// Config template of the program itself or of one extension script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConfigTemplate {
    /// Script name such as `videosort/VideoSort.py`; empty for the program
    /// itself, which is always the first record.
    pub name: String,
    pub display_name: String,
    pub post_script: bool,
    pub scan_script: bool,
    pub queue_script: bool,
    pub scheduler_script: bool,
    /// Multi-line template content.
    pub template: String,
}

/// Downloaded volume in one time slot of a [`ServerVolume`] histogram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BytesPer {
    pub size_lo: i64,
    pub size_hi: i64,
    #[serde(rename = "SizeMB")]
    pub size_mb: i64,
}

impl BytesPer {
    pub fn size(&self) -> u64 {
        combine_size(self.size_lo, self.size_hi)
    }
}

/// Download volume statistics for one news server, from `servervolumes`.
///
/// The record with `server_id == 0` holds the totals over all servers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServerVolume {
    #[serde(rename = "ServerID")]
    pub server_id: i64,
    pub data_time: Timestamp,
    pub total_size_lo: i64,
    pub total_size_hi: i64,
    #[serde(rename = "TotalSizeMB")]
    pub total_size_mb: i64,
    pub custom_size_lo: i64,
    pub custom_size_hi: i64,
    #[serde(rename = "CustomSizeMB")]
    pub custom_size_mb: i64,
    pub custom_time: Timestamp,
    /// Last 60 seconds.
    pub bytes_per_seconds: Vec<BytesPer>,
    /// Last 60 minutes.
    pub bytes_per_minutes: Vec<BytesPer>,
    /// Last 24 hours.
    pub bytes_per_hours: Vec<BytesPer>,
    /// Since installation.
    pub bytes_per_days: Vec<BytesPer>,
    pub sec_slot: i64,
    pub min_slot: i64,
    pub hour_slot: i64,
    pub day_slot: i64,
    /// Calendar day the first `bytes_per_days` slot corresponds to.
    pub first_day: i64,
}

impl ServerVolume {
    pub fn total_size(&self) -> u64 {
        combine_size(self.total_size_lo, self.total_size_hi)
    }
}

/// Input for `append`.
///
/// Built with [`AppendInput::new`] and the `with_*` setters; unset fields use
/// the server's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppendInput {
    /// Name the download is queued under. Should end in `.nzb`.
    pub filename: String,
    /// Base64-encoded nzb content, or a URL for the server to fetch.
    pub content: String,
    pub category: String,
    pub priority: i64,
    pub add_to_top: bool,
    pub add_paused: bool,
    pub dupe_key: String,
    pub dupe_score: i64,
    pub dupe_mode: DupeMode,
    pub parameters: Vec<Parameter>,
}

impl AppendInput {
    /// Create an input for the given filename and content.
    pub fn new(filename: &str, content: &str) -> Self {
        Self {
            filename: filename.to_string(),
            content: content.to_string(),
            dupe_mode: DupeMode::SCORE,
            ..Default::default()
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    /// Set the queue priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Queue in paused state.
    pub fn paused(mut self) -> Self {
        self.add_paused = true;
        self
    }

    /// Put the download at the top of the queue.
    pub fn at_top(mut self) -> Self {
        self.add_to_top = true;
        self
    }

    /// Set duplicate-check key, score and mode.
    pub fn with_dupe(mut self, key: &str, score: i64, mode: DupeMode) -> Self {
        self.dupe_key = key.to_string();
        self.dupe_score = score;
        self.dupe_mode = mode;
        self
    }

    /// Add a post-processing parameter.
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters.push(Parameter::new(name, value));
        self
    }
}
