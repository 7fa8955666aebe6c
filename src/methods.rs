//! Typed wrappers for the NZBGet API methods.
//!
//! Each wrapper supplies the remote method name and its positional argument
//! list to [`NzbGet::call`]. Argument order and arity follow the server's
//! API reference at <https://nzbget.com/documentation/api/>.

use crate::models::{AppendInput, ConfigTemplate, File, Group, History, LogEntry, Parameter, ServerVolume, Status};
use crate::rpc::{NzbGet, RpcError};
use crate::status::{EditCommand, LogKind};

impl NzbGet {
    /// Server version string, e.g. `"21.1"`.
    pub async fn version(&self) -> Result<String, RpcError> {
        self.call("version", ()).await
    }

    /// Stop the server process.
    pub async fn shutdown(&self) -> Result<bool, RpcError> {
        self.call("shutdown", ()).await
    }

    /// Reload the configuration and restart the server in place.
    pub async fn reload(&self) -> Result<bool, RpcError> {
        self.call("reload", ()).await
    }

    /// Server status snapshot.
    pub async fn status(&self) -> Result<Status, RpcError> {
        self.call("status", ()).await
    }

    /// Queued downloads.
    ///
    /// `number_of_log_entries` is accepted for compatibility with old server
    /// versions and is normally 0.
    pub async fn list_groups(&self, number_of_log_entries: i64) -> Result<Vec<Group>, RpcError> {
        self.call("listgroups", (number_of_log_entries,)).await
    }

    /// Files of one queued download, or of all downloads when `nzb_id` is 0.
    pub async fn list_files(&self, nzb_id: i64) -> Result<Vec<File>, RpcError> {
        self.call("listfiles", (0, 0, nzb_id)).await
    }

    /// Download history. `hidden` includes records hidden by duplicate
    /// handling.
    pub async fn history(&self, hidden: bool) -> Result<Vec<History>, RpcError> {
        self.call("history", (hidden,)).await
    }

    /// Queue a new download and return its NZBID.
    ///
    /// Post-processing parameters go over the wire as `[name, value]` pairs.
    /// A non-positive NZBID means the server refused the nzb.
    pub async fn append(&self, input: &AppendInput) -> Result<i64, RpcError> {
        let parameters: Vec<[&str; 2]> = input.parameters.iter().map(Parameter::to_pair).collect();

        self.call(
            "append",
            (
                &input.filename,
                &input.content,
                &input.category,
                input.priority,
                input.add_to_top,
                input.add_paused,
                &input.dupe_key,
                input.dupe_score,
                &input.dupe_mode,
                parameters,
            ),
        )
        .await
    }

    /// Apply an edit command to queue or history items.
    pub async fn edit_queue(
        &self,
        command: &EditCommand,
        param: &str,
        ids: &[i64],
    ) -> Result<bool, RpcError> {
        self.call("editqueue", (command, param, ids)).await
    }

    /// Scan the incoming nzb directory now.
    pub async fn scan(&self) -> Result<bool, RpcError> {
        self.call("scan", ()).await
    }

    /// Server log entries.
    ///
    /// The server accepts only one of the two: either `start_id` (entries
    /// with ID >= start_id) or `limit` (the last `limit` entries). The other
    /// must be 0.
    pub async fn log(&self, start_id: i64, limit: i64) -> Result<Vec<LogEntry>, RpcError> {
        self.call("log", (start_id, limit)).await
    }

    /// Append a line to the server log.
    pub async fn write_log(&self, kind: &LogKind, text: &str) -> Result<bool, RpcError> {
        self.call("writelog", (kind, text)).await
    }

    /// Log entries of one download. Same `start_id`/`limit` rule as
    /// [`log`](Self::log).
    pub async fn load_log(&self, nzb_id: i64, start_id: i64, limit: i64) -> Result<Vec<LogEntry>, RpcError> {
        self.call("loadlog", (nzb_id, start_id, limit)).await
    }

    /// Per-server download volume statistics. The first record holds the
    /// totals over all servers.
    pub async fn server_volumes(&self) -> Result<Vec<ServerVolume>, RpcError> {
        self.call("servervolumes", ()).await
    }

    /// Reset a volume counter. `counter` is `"CUSTOM"` for the custom
    /// counter; `server_id` 0 resets all servers.
    pub async fn reset_server_volume(&self, server_id: i64, counter: &str) -> Result<bool, RpcError> {
        self.call("resetservervolume", (server_id, counter)).await
    }

    /// Set the download speed limit in KB/s; 0 disables the limit.
    pub async fn rate(&self, limit_kbs: i64) -> Result<bool, RpcError> {
        self.call("rate", (limit_kbs,)).await
    }

    pub async fn pause_download(&self) -> Result<bool, RpcError> {
        self.call("pausedownload", ()).await
    }

    pub async fn resume_download(&self) -> Result<bool, RpcError> {
        self.call("resumedownload", ()).await
    }

    pub async fn pause_post(&self) -> Result<bool, RpcError> {
        self.call("pausepost", ()).await
    }

    pub async fn resume_post(&self) -> Result<bool, RpcError> {
        self.call("resumepost", ()).await
    }

    pub async fn pause_scan(&self) -> Result<bool, RpcError> {
        self.call("pausescan", ()).await
    }

    pub async fn resume_scan(&self) -> Result<bool, RpcError> {
        self.call("resumescan", ()).await
    }

    /// Resume downloading after `seconds`. Downloading must already be
    /// paused.
    pub async fn schedule_resume(&self, seconds: i64) -> Result<bool, RpcError> {
        self.call("scheduleresume", (seconds,)).await
    }

    /// Options currently in effect.
    pub async fn config(&self) -> Result<Vec<Parameter>, RpcError> {
        self.call("config", ()).await
    }

    /// Options as stored in the config file, which may differ from those in
    /// effect until the next reload.
    pub async fn load_config(&self) -> Result<Vec<Parameter>, RpcError> {
        self.call("loadconfig", ()).await
    }

    /// Write options to the config file. The file is replaced as a whole, so
    /// pass the complete option list.
    pub async fn save_config(&self, options: &[Parameter]) -> Result<bool, RpcError> {
        self.call("saveconfig", (options,)).await
    }

    /// Config templates of the program and installed scripts.
    pub async fn config_templates(&self, load_from_disk: bool) -> Result<Vec<ConfigTemplate>, RpcError> {
        self.call("configtemplates", (load_from_disk,)).await
    }
}
